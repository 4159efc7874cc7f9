//! Text layout engine
//!
//! Converts text strings into positioned glyph quads. Drawing and
//! measurement both walk the same [`TextLayout`] iterator, so the quads a
//! string is drawn with and the bounds reported for it cannot disagree.
//!
//! # Layout Coordinate System
//!
//! - Origin is the pen position passed by the caller, in screen pixels
//! - +X axis points right
//! - +Y axis points down; `y` is the top of the baseline anchor glyph
//! - Texture `v = 0` is the top row of the glyph bitmap

use super::glyph::{GlyphLookup, GlyphMetrics};
use crate::render::gl::resource::{QUAD_VERTEX_COUNT, QUAD_VERTEX_FLOATS};

/// Interleaved `(x, y, u, v)` vertices of one glyph quad
pub type QuadVertices = [[f32; QUAD_VERTEX_FLOATS]; QUAD_VERTEX_COUNT];

/// Screen-space rectangle covered by one glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuad {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl GlyphQuad {
    /// Two triangles covering the quad, in draw order
    #[rustfmt::skip]
    pub fn vertices(&self) -> QuadVertices {
        let Self { x, y, w, h } = *self;
        [
            [x,     y + h, 0.0, 1.0],
            [x + w, y,     1.0, 0.0],
            [x,     y,     0.0, 0.0],

            [x,     y + h, 0.0, 1.0],
            [x + w, y + h, 1.0, 1.0],
            [x + w, y,     1.0, 0.0],
        ]
    }
}

/// Place one glyph at the pen position
///
/// `anchor` is the baseline reference glyph: every glyph is shifted so that
/// the tops of anchor-height glyphs line up with `pen_y`.
pub fn layout_glyph(
    glyph: &GlyphMetrics,
    pen_x: f32,
    pen_y: f32,
    anchor: &GlyphMetrics,
    scale: f32,
) -> GlyphQuad {
    GlyphQuad {
        x: pen_x + glyph.bearing.x as f32 * scale,
        y: pen_y + (anchor.bearing.y - glyph.bearing.y) as f32 * scale,
        w: glyph.size.x as f32 * scale,
        h: glyph.size.y as f32 * scale,
    }
}

/// Pen displacement after drawing `glyph`
pub fn glyph_advance(glyph: &GlyphMetrics, scale: f32) -> f32 {
    glyph.advance_px() as f32 * scale
}

/// A glyph placed by [`TextLayout`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph {
    /// Character being drawn
    pub ch: char,
    /// Quad covering the glyph bitmap
    pub quad: GlyphQuad,
}

/// Iterator placing every cached character of a string
///
/// Characters without cached metrics are skipped without advancing the pen.
pub struct TextLayout<'a, L: GlyphLookup + ?Sized> {
    glyphs: &'a L,
    anchor: &'a GlyphMetrics,
    chars: std::str::Chars<'a>,
    pen_x: f32,
    pen_y: f32,
    scale: f32,
}

impl<'a, L: GlyphLookup + ?Sized> TextLayout<'a, L> {
    /// Start laying out `text` with the pen at `(x, y)`
    pub fn new(glyphs: &'a L, anchor: &'a GlyphMetrics, text: &'a str, x: f32, y: f32, scale: f32) -> Self {
        Self {
            glyphs,
            anchor,
            chars: text.chars(),
            pen_x: x,
            pen_y: y,
            scale,
        }
    }

    /// Current pen x; after exhaustion this is the end of the line
    pub fn pen_x(&self) -> f32 {
        self.pen_x
    }
}

impl<L: GlyphLookup + ?Sized> Iterator for TextLayout<'_, L> {
    type Item = PlacedGlyph;

    fn next(&mut self) -> Option<PlacedGlyph> {
        for ch in self.chars.by_ref() {
            let Some(glyph) = self.glyphs.glyph_metrics(ch) else {
                continue;
            };
            let quad = layout_glyph(glyph, self.pen_x, self.pen_y, self.anchor, self.scale);
            self.pen_x += glyph_advance(glyph, self.scale);
            return Some(PlacedGlyph { ch, quad });
        }
        None
    }
}

/// Sum of advances of the cached characters of `text`
pub fn measure_width<L: GlyphLookup + ?Sized>(glyphs: &L, text: &str, scale: f32) -> f32 {
    text.chars()
        .filter_map(|ch| glyphs.glyph_metrics(ch))
        .map(|glyph| glyph_advance(glyph, scale))
        .sum()
}

/// Bounding box of laid out text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBounds {
    /// Minimum X coordinate
    pub min_x: f32,
    /// Minimum Y coordinate
    pub min_y: f32,
    /// Maximum X coordinate
    pub max_x: f32,
    /// Maximum Y coordinate
    pub max_y: f32,
}

impl TextBounds {
    /// Zero-sized box at a point
    pub fn empty_at(x: f32, y: f32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    /// Calculate width of bounding box
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Calculate height of bounding box
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// `(left, top, width, height)`
    pub fn to_rect(&self) -> (f32, f32, f32, f32) {
        (self.min_x, self.min_y, self.width(), self.height())
    }

    fn include(&mut self, quad: &GlyphQuad) {
        self.min_x = self.min_x.min(quad.x);
        self.min_y = self.min_y.min(quad.y);
        self.max_x = self.max_x.max(quad.x + quad.w);
        self.max_y = self.max_y.max(quad.y + quad.h);
    }
}

impl From<GlyphQuad> for TextBounds {
    fn from(quad: GlyphQuad) -> Self {
        Self {
            min_x: quad.x,
            min_y: quad.y,
            max_x: quad.x + quad.w,
            max_y: quad.y + quad.h,
        }
    }
}

/// Bounding box of every quad `text` would be drawn with
///
/// Returns a zero-sized box at `(x, y)` when no glyph is emitted.
pub fn measure_bounds<L: GlyphLookup + ?Sized>(
    glyphs: &L,
    anchor: &GlyphMetrics,
    text: &str,
    x: f32,
    y: f32,
    scale: f32,
) -> TextBounds {
    let mut placed = TextLayout::new(glyphs, anchor, text, x, y, scale);
    let Some(first) = placed.next() else {
        return TextBounds::empty_at(x, y);
    };

    placed.fold(TextBounds::from(first.quad), |mut bounds, glyph| {
        bounds.include(&glyph.quad);
        bounds
    })
}
