//! Text renderer façade
//!
//! Owns the glyph set of one font, the reusable quad buffer and a shared
//! handle to the text shader. Drawing issues one textured-quad draw per
//! glyph; measuring never touches the GPU.

use super::atlas_loader::{GlyphAtlasLoader, LoadReport, DEFAULT_BASELINE_ANCHOR};
use super::error::{TextError, TextResult};
use super::glyph::{FontMetrics, GlyphMetrics, GlyphStore};
use super::layout::{measure_bounds, measure_width, TextBounds, TextLayout};
use super::rasterizer::FontRasterizer;
use crate::foundation::math::{screen_orthographic, Mat4, Vec3};
use crate::render::gl::resource::QUAD_VERTEX_COUNT;
use crate::render::gl::{DrawContext, QuadBuffer, ShaderProgram};
use std::path::Path;
use std::rc::Rc;

/// Uniform holding the glyph sampler's texture unit
pub const TEXT_SAMPLER_UNIFORM: &str = "text";
/// Uniform holding the projection matrix
pub const PROJECTION_UNIFORM: &str = "projection";
/// Uniform holding the RGB text color
pub const TEXT_COLOR_UNIFORM: &str = "textColor";

/// Renders strings of one font as textured quads
pub struct TextRenderer<C: DrawContext> {
    context: Rc<C>,
    shader: Rc<ShaderProgram<C>>,
    quad_buffer: QuadBuffer<C>,
    glyphs: GlyphStore<C>,
    metrics: FontMetrics,
    baseline_anchor: char,
    viewport: (u32, u32),
}

impl<C: DrawContext> TextRenderer<C> {
    /// Create a renderer with no font loaded
    ///
    /// Points the shader's `text` sampler at texture unit 0 and allocates
    /// the quad buffer.
    pub fn new(
        context: &Rc<C>,
        shader: Rc<ShaderProgram<C>>,
        viewport_width: u32,
        viewport_height: u32,
    ) -> TextResult<Self> {
        shader.activate().set_integer(TEXT_SAMPLER_UNIFORM, 0);
        let quad_buffer = QuadBuffer::new(context)?;
        log::debug!("Text renderer created with shader '{}'", shader.name());

        Ok(Self {
            context: Rc::clone(context),
            shader,
            quad_buffer,
            glyphs: GlyphStore::new(),
            metrics: FontMetrics::default(),
            baseline_anchor: DEFAULT_BASELINE_ANCHOR,
            viewport: (viewport_width, viewport_height),
        })
    }

    /// Use a different baseline anchor for subsequent loads
    pub fn with_baseline_anchor(mut self, anchor: char) -> Self {
        self.baseline_anchor = anchor;
        self
    }

    /// Use a different baseline anchor for the next load
    ///
    /// The current glyph set keeps being laid out against the new anchor, so
    /// callers normally follow this with [`Self::load`].
    pub fn set_baseline_anchor(&mut self, anchor: char) {
        self.baseline_anchor = anchor;
    }

    /// Load `font` at `font_size`, replacing the current glyph set
    ///
    /// On error the current glyphs and metrics are kept. On success the
    /// previous glyph textures are released.
    pub fn load<R: FontRasterizer>(
        &mut self,
        rasterizer: &R,
        font: impl AsRef<Path>,
        font_size: u32,
    ) -> TextResult<LoadReport> {
        let loaded = GlyphAtlasLoader::new(rasterizer)
            .with_baseline_anchor(self.baseline_anchor)
            .load(&self.context, font, font_size)?;

        if !self.glyphs.is_empty() {
            log::debug!("Releasing {} glyph textures of the previous font", self.glyphs.len());
        }
        self.glyphs = loaded.glyphs;
        self.metrics = loaded.metrics;

        Ok(LoadReport {
            glyph_count: self.glyphs.len(),
            warnings: loaded.warnings,
        })
    }

    /// Draw `text` with its first pen position at `(x, y)`
    ///
    /// `y` is the top of the baseline anchor glyph. Characters without a
    /// cached glyph are skipped. Leaves texture 0 and vertex array 0 bound.
    pub fn render_text(
        &self,
        text: &str,
        x: f32,
        y: f32,
        scale: f32,
        color: Vec3,
        projection: &Mat4,
    ) -> TextResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let anchor = self.anchor_metrics()?;

        self.shader
            .activate()
            .set_matrix4(PROJECTION_UNIFORM, projection)
            .set_vector3f(TEXT_COLOR_UNIFORM, &color);
        self.context.active_texture_unit(0);
        self.context.bind_vertex_array(Some(self.quad_buffer.vertex_array()));

        for placed in TextLayout::new(&self.glyphs, anchor, text, x, y, scale) {
            let Some(glyph) = self.glyphs.get(placed.ch) else {
                continue;
            };
            self.context.bind_texture(Some(glyph.texture().raw()));
            self.quad_buffer.upload(&placed.quad.vertices());
            self.context.draw_triangles(0, QUAD_VERTEX_COUNT as i32);
        }

        self.context.bind_vertex_array(None);
        self.context.bind_texture(None);
        Ok(())
    }

    /// Draw `text` with the viewport's screen-space projection
    pub fn render_text_default(&self, text: &str, x: f32, y: f32, scale: f32, color: Vec3) -> TextResult<()> {
        self.render_text(text, x, y, scale, color, &self.projection())
    }

    /// Horizontal advance of `text` in pixels
    pub fn measure_text_width(&self, text: &str, scale: f32) -> f32 {
        measure_width(&self.glyphs, text, scale)
    }

    /// Bounding box of the quads `render_text` would draw
    ///
    /// A string with no cached characters yields a zero-sized box at `(x, y)`.
    pub fn measure_rendered_text_bounds(&self, text: &str, x: f32, y: f32, scale: f32) -> TextResult<TextBounds> {
        if text.is_empty() {
            return Ok(TextBounds::empty_at(x, y));
        }
        let anchor = self.anchor_metrics()?;
        Ok(measure_bounds(&self.glyphs, anchor, text, x, y, scale))
    }

    /// Distance between baselines at `scale`
    pub fn line_height(&self, scale: f32) -> f32 {
        self.metrics.line_height(scale)
    }

    /// Pixel size of the loaded font, 0 before the first load
    pub fn font_size(&self) -> u32 {
        self.metrics.pixel_size
    }

    /// Face-wide metrics of the loaded font
    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    /// Cached glyphs
    pub fn glyphs(&self) -> &GlyphStore<C> {
        &self.glyphs
    }

    /// Baseline anchor character
    pub fn baseline_anchor(&self) -> char {
        self.baseline_anchor
    }

    /// Shader used for drawing
    pub fn shader(&self) -> &Rc<ShaderProgram<C>> {
        &self.shader
    }

    /// Viewport size used for [`Self::projection`]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Update the viewport after a resize
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    /// Screen-space orthographic projection for the viewport
    pub fn projection(&self) -> Mat4 {
        screen_orthographic(self.viewport.0, self.viewport.1)
    }

    fn anchor_metrics(&self) -> TextResult<&GlyphMetrics> {
        self.glyphs
            .get(self.baseline_anchor)
            .map(|glyph| glyph.metrics())
            .ok_or(TextError::MissingBaselineAnchor(self.baseline_anchor))
    }
}
