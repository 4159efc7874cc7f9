//! Font rasterization service
//!
//! The loader talks to fonts through [`FontRasterizer`] / [`FontFace`]. The
//! engine ships a pure Rust implementation backed by `fontdue`. Values
//! crossing the trait use the 26.6 fixed point convention of classic
//! rasterizers so the loader's pixel conversions stay the same whatever the
//! backend.

use super::error::{TextError, TextResult};
use crate::foundation::math::IVec2;
use fontdue::{Font, FontSettings};
use std::path::{Path, PathBuf};

/// A glyph bitmap produced by a face
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterizedGlyph {
    /// Bitmap width in pixels
    pub width: u32,
    /// Bitmap height in pixels
    pub height: u32,
    /// Offset from baseline origin to the bitmap's top-left corner
    pub bearing: IVec2,
    /// Horizontal advance in 1/64 pixel units
    pub advance_raw: u32,
    /// Coverage values, `width * height` bytes, top row first
    pub coverage: Vec<u8>,
}

/// Face-wide vertical metrics at the selected size, 26.6 fixed point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeMetrics {
    /// Ascender
    pub ascender: i32,
    /// Descender (negative below the baseline)
    pub descender: i32,
}

/// An opened font face with its pixel size selected
pub trait FontFace {
    /// Rasterize the glyph for `code`; an error skips that code only
    fn rasterize(&mut self, code: u8) -> Result<RasterizedGlyph, String>;

    /// Vertical metrics at the selected size
    fn size_metrics(&self) -> SizeMetrics;
}

/// Opens font faces at a pixel size
pub trait FontRasterizer {
    /// Face type produced by this rasterizer
    type Face: FontFace;

    /// Open the face stored at `path` at `pixel_size` (square pixels)
    ///
    /// Fails with [`TextError::FontOpen`] when the file cannot be read or is
    /// not a font, and with [`TextError::FaceLoad`] when the face itself
    /// cannot be loaded.
    fn open_face(&self, path: &Path, pixel_size: u32) -> TextResult<Self::Face>;
}

/// Rasterizer backed by `fontdue`
#[derive(Debug, Clone, Copy, Default)]
pub struct FontdueRasterizer {
    face_index: u32,
    skip_unmapped: bool,
}

impl FontdueRasterizer {
    /// Rasterizer for the first face of a file, rendering `.notdef` for unmapped codes
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a face inside a font collection
    pub fn with_face_index(mut self, face_index: u32) -> Self {
        self.face_index = face_index;
        self
    }

    /// Treat codes without a cmap entry as rasterization failures
    pub fn with_skip_unmapped(mut self, skip_unmapped: bool) -> Self {
        self.skip_unmapped = skip_unmapped;
        self
    }
}

impl FontRasterizer for FontdueRasterizer {
    type Face = FontdueFace;

    fn open_face(&self, path: &Path, pixel_size: u32) -> TextResult<FontdueFace> {
        let data = std::fs::read(path).map_err(|e| TextError::FontOpen {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let format = FontFormat::sniff(&data).ok_or_else(|| TextError::FontOpen {
            path: path.to_path_buf(),
            reason: "not a TrueType/OpenType font".to_string(),
        })?;

        let face_load_error = |reason: String| TextError::FaceLoad {
            path: PathBuf::from(path),
            reason,
        };

        if pixel_size == 0 {
            return Err(face_load_error("pixel size must be non-zero".to_string()));
        }

        let px = pixel_size as f32;
        let settings = FontSettings {
            collection_index: self.face_index,
            scale: px,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(data, settings)
            .map_err(|e| face_load_error(format!("{format:?} face {}: {e}", self.face_index)))?;

        let line_metrics = font
            .horizontal_line_metrics(px)
            .ok_or_else(|| face_load_error("face has no horizontal line metrics".to_string()))?;

        log::debug!(
            "Opened {:?} face {} from {} at {}px",
            format,
            self.face_index,
            path.display(),
            pixel_size
        );

        Ok(FontdueFace {
            font,
            px,
            skip_unmapped: self.skip_unmapped,
            size_metrics: SizeMetrics {
                ascender: to_fixed(line_metrics.ascent),
                descender: to_fixed(line_metrics.descent),
            },
        })
    }
}

/// Face opened by [`FontdueRasterizer`]
pub struct FontdueFace {
    font: Font,
    px: f32,
    skip_unmapped: bool,
    size_metrics: SizeMetrics,
}

impl FontFace for FontdueFace {
    fn rasterize(&mut self, code: u8) -> Result<RasterizedGlyph, String> {
        let ch = char::from(code);
        if self.skip_unmapped && code != 0 && self.font.lookup_glyph_index(ch) == 0 {
            return Err("no glyph mapped for this code".to_string());
        }

        let (metrics, coverage) = self.font.rasterize(ch, self.px);
        if coverage.len() != metrics.width * metrics.height {
            return Err(format!(
                "bitmap holds {} bytes for a {}x{} glyph",
                coverage.len(),
                metrics.width,
                metrics.height
            ));
        }

        let width = u32::try_from(metrics.width).map_err(|e| e.to_string())?;
        let height = u32::try_from(metrics.height).map_err(|e| e.to_string())?;
        let top = metrics.ymin + i32::try_from(metrics.height).map_err(|e| e.to_string())?;
        let advance_raw = u32::try_from(to_fixed(metrics.advance_width)).unwrap_or(0);

        Ok(RasterizedGlyph {
            width,
            height,
            bearing: IVec2::new(metrics.xmin, top),
            advance_raw,
            coverage,
        })
    }

    fn size_metrics(&self) -> SizeMetrics {
        self.size_metrics
    }
}

/// Container formats accepted before handing bytes to the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFormat {
    /// TrueType outlines (`00 01 00 00`, `true` or `typ1`)
    TrueType,
    /// OpenType with CFF outlines (`OTTO`)
    OpenType,
    /// TrueType/OpenType collection (`ttcf`)
    Collection,
}

impl FontFormat {
    /// Identify a font container from its first four bytes
    pub fn sniff(data: &[u8]) -> Option<Self> {
        let magic: [u8; 4] = data.get(..4)?.try_into().ok()?;
        match &magic {
            [0x00, 0x01, 0x00, 0x00] | b"true" | b"typ1" => Some(Self::TrueType),
            b"OTTO" => Some(Self::OpenType),
            b"ttcf" => Some(Self::Collection),
            _ => None,
        }
    }
}

/// Pixels to 26.6 fixed point, rounded to the nearest 1/64
fn to_fixed(value: f32) -> i32 {
    (value * 64.0).round() as i32
}
