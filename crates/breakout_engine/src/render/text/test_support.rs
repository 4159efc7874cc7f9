//! Synthetic font faces for tests

use super::error::{TextError, TextResult};
use super::rasterizer::{FontFace, FontRasterizer, RasterizedGlyph, SizeMetrics};
use crate::foundation::math::IVec2;
use std::path::{Path, PathBuf};

/// DejaVu Sans Mono shipped with the crate for tests against a real face
pub fn fixture_font_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("resources/fonts/DejaVuSansMono.ttf")
}

/// Rasterizer producing deterministic box glyphs without reading any file
#[derive(Debug, Clone)]
pub struct SyntheticRasterizer {
    monospace_advance: Option<u32>,
    failing: Vec<u8>,
    unopenable: bool,
}

impl SyntheticRasterizer {
    /// Every code advances by `advance_px`
    pub fn monospace(advance_px: u32) -> Self {
        Self {
            monospace_advance: Some(advance_px),
            failing: Vec::new(),
            unopenable: false,
        }
    }

    /// Advance grows with the code value
    pub fn proportional() -> Self {
        Self {
            monospace_advance: None,
            failing: Vec::new(),
            unopenable: false,
        }
    }

    /// Codes whose rasterization fails
    pub fn failing(mut self, codes: &[u8]) -> Self {
        self.failing.extend_from_slice(codes);
        self
    }

    /// Every open fails as if the file were missing
    pub fn unopenable(mut self) -> Self {
        self.unopenable = true;
        self
    }
}

impl FontRasterizer for SyntheticRasterizer {
    type Face = SyntheticFace;

    fn open_face(&self, path: &Path, pixel_size: u32) -> TextResult<SyntheticFace> {
        if self.unopenable {
            return Err(TextError::FontOpen {
                path: path.to_path_buf(),
                reason: "synthetic open failure".to_string(),
            });
        }
        Ok(SyntheticFace {
            rasterizer: self.clone(),
            pixel_size,
        })
    }
}

/// Face of a [`SyntheticRasterizer`]
pub struct SyntheticFace {
    rasterizer: SyntheticRasterizer,
    pixel_size: u32,
}

impl SyntheticFace {
    fn ascent(&self) -> i32 {
        (self.pixel_size * 3 / 4) as i32
    }
}

impl FontFace for SyntheticFace {
    fn rasterize(&mut self, code: u8) -> Result<RasterizedGlyph, String> {
        if self.rasterizer.failing.contains(&code) {
            return Err("synthetic rasterization failure".to_string());
        }

        let advance_px = self
            .rasterizer
            .monospace_advance
            .unwrap_or_else(|| 4 + u32::from(code % 7));
        let width = advance_px.saturating_sub(2);
        // Lowercase letters are x-height and descend slightly
        let (height, top) = if code.is_ascii_lowercase() {
            (self.ascent() as u32, self.ascent() - 3)
        } else {
            (self.ascent() as u32, self.ascent())
        };

        Ok(RasterizedGlyph {
            width,
            height,
            bearing: IVec2::new(1, top),
            advance_raw: advance_px << 6,
            coverage: vec![0xff; (width * height) as usize],
        })
    }

    fn size_metrics(&self) -> SizeMetrics {
        let descent = (self.pixel_size / 4) as i32;
        SizeMetrics {
            ascender: self.ascent() << 6,
            descender: -descent << 6,
        }
    }
}
