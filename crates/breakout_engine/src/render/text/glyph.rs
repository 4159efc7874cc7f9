//! Cached glyphs and face-wide metrics
//!
//! A [`GlyphStore`] maps ASCII codes to glyph metrics plus the GPU texture
//! holding the glyph's coverage bitmap. The store owns the textures, so
//! dropping or replacing it releases them.

use crate::foundation::math::IVec2;
use crate::render::gl::{DrawContext, GpuTexture};
use std::collections::BTreeMap;
use std::fmt;

/// Number of character codes cached per face (ASCII)
pub const GLYPH_CODE_COUNT: u8 = 128;

/// Size and positioning metrics of one rasterized glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMetrics {
    /// Bitmap size in pixels
    pub size: IVec2,
    /// Offset from the pen's baseline origin to the bitmap's top-left corner
    pub bearing: IVec2,
    /// Horizontal advance in 1/64 pixel units
    pub advance_raw: u32,
}

impl GlyphMetrics {
    /// Advance in whole pixels (`advance_raw >> 6`)
    pub fn advance_px(&self) -> u32 {
        self.advance_raw >> 6
    }
}

/// A cached glyph: metrics and the texture that owns its bitmap
pub struct Glyph<C: DrawContext> {
    code: u8,
    metrics: GlyphMetrics,
    texture: GpuTexture<C>,
}

impl<C: DrawContext> Glyph<C> {
    /// Bundle a rasterized glyph with its uploaded texture
    pub fn new(code: u8, metrics: GlyphMetrics, texture: GpuTexture<C>) -> Self {
        Self { code, metrics, texture }
    }

    /// Character code
    pub fn code(&self) -> u8 {
        self.code
    }

    /// Glyph metrics
    pub fn metrics(&self) -> &GlyphMetrics {
        &self.metrics
    }

    /// Texture holding the coverage bitmap
    pub fn texture(&self) -> &GpuTexture<C> {
        &self.texture
    }
}

impl<C: DrawContext> fmt::Debug for Glyph<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Glyph")
            .field("code", &self.code)
            .field("metrics", &self.metrics)
            .field("texture", &self.texture)
            .finish()
    }
}

/// Read access to glyph metrics by character
///
/// Layout only needs metrics, so it is written against this trait rather
/// than against a store that owns GPU textures.
pub trait GlyphLookup {
    /// Metrics for `ch`, `None` when the character is not cached
    fn glyph_metrics(&self, ch: char) -> Option<&GlyphMetrics>;
}

/// Write-once mapping from character code to cached glyph
pub struct GlyphStore<C: DrawContext> {
    glyphs: BTreeMap<u8, Glyph<C>>,
}

impl<C: DrawContext> GlyphStore<C> {
    /// Create an empty store
    pub fn new() -> Self {
        Self { glyphs: BTreeMap::new() }
    }

    /// Insert a glyph; a later insert for the same code replaces the earlier one
    pub fn insert(&mut self, glyph: Glyph<C>) {
        self.glyphs.insert(glyph.code, glyph);
    }

    /// Glyph for `ch`, `None` for non-ASCII or uncached characters
    pub fn get(&self, ch: char) -> Option<&Glyph<C>> {
        ascii_code(ch).and_then(|code| self.glyphs.get(&code))
    }

    /// Glyph for a raw code
    pub fn get_code(&self, code: u8) -> Option<&Glyph<C>> {
        self.glyphs.get(&code)
    }

    /// Whether `ch` is cached
    pub fn contains(&self, ch: char) -> bool {
        self.get(ch).is_some()
    }

    /// Number of cached glyphs
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Cached glyphs in code order
    pub fn iter(&self) -> impl Iterator<Item = &Glyph<C>> {
        self.glyphs.values()
    }
}

impl<C: DrawContext> Default for GlyphStore<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: DrawContext> GlyphLookup for GlyphStore<C> {
    fn glyph_metrics(&self, ch: char) -> Option<&GlyphMetrics> {
        self.get(ch).map(Glyph::metrics)
    }
}

impl<C: DrawContext> fmt::Debug for GlyphStore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphStore")
            .field("len", &self.glyphs.len())
            .finish()
    }
}

#[cfg(test)]
impl GlyphLookup for BTreeMap<char, GlyphMetrics> {
    fn glyph_metrics(&self, ch: char) -> Option<&GlyphMetrics> {
        self.get(&ch)
    }
}

/// Code for `ch` if it falls in the cached ASCII range
pub fn ascii_code(ch: char) -> Option<u8> {
    u8::try_from(u32::from(ch))
        .ok()
        .filter(|code| *code < GLYPH_CODE_COUNT)
}

/// Face-wide metrics in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontMetrics {
    /// Requested nominal pixel size
    pub pixel_size: u32,
    /// Maximum rise above the baseline
    pub ascent: i32,
    /// Maximum drop below the baseline (usually negative)
    pub descent: i32,
}

impl FontMetrics {
    /// Build from 26.6 fixed point ascender/descender values
    pub fn from_fixed(pixel_size: u32, ascender_26_6: i32, descender_26_6: i32) -> Self {
        Self {
            pixel_size,
            ascent: ascender_26_6 >> 6,
            descent: descender_26_6 >> 6,
        }
    }

    /// Distance between baselines at `scale`
    pub fn line_height(&self, scale: f32) -> f32 {
        (self.ascent - self.descent) as f32 * scale
    }
}
