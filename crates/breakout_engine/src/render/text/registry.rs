//! Named text renderer registry
//!
//! The application context owns one registry and passes it to whatever
//! needs to draw text, so fonts loaded at startup can be addressed by name
//! ("hud", "menu") from anywhere in the game. Instances live until they are
//! destroyed explicitly or the registry is dropped; teardown walks names in
//! sorted order.

use super::atlas_loader::{LoadReport, DEFAULT_BASELINE_ANCHOR};
use super::config::TextRenderConfig;
use super::error::{TextError, TextResult};
use super::rasterizer::FontRasterizer;
use super::text_renderer::TextRenderer;
use crate::render::gl::{DrawContext, ShaderProgram};
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

/// Owner of every named [`TextRenderer`]
pub struct TextRendererRegistry<C: DrawContext> {
    context: Rc<C>,
    shader: Rc<ShaderProgram<C>>,
    baseline_anchor: char,
    renderers: BTreeMap<String, TextRenderer<C>>,
}

impl<C: DrawContext> TextRendererRegistry<C> {
    /// Create an empty registry whose renderers share `shader`
    pub fn new(context: &Rc<C>, shader: Rc<ShaderProgram<C>>) -> Self {
        Self {
            context: Rc::clone(context),
            shader,
            baseline_anchor: DEFAULT_BASELINE_ANCHOR,
            renderers: BTreeMap::new(),
        }
    }

    /// Baseline anchor given to renderers created from now on
    pub fn with_baseline_anchor(mut self, anchor: char) -> Self {
        self.baseline_anchor = anchor;
        self
    }

    /// Create or reload the renderer called `name`
    ///
    /// A first load for `name` creates the renderer and only registers it
    /// once the font loaded. Later loads reload the same instance in place
    /// with the registry's current baseline anchor; a failed reload leaves
    /// the renderer as it was.
    pub fn load_named<R: FontRasterizer>(
        &mut self,
        rasterizer: &R,
        name: &str,
        font: impl AsRef<Path>,
        pixel_size: u32,
        viewport_width: u32,
        viewport_height: u32,
    ) -> TextResult<&mut TextRenderer<C>> {
        self.load_named_with_report(rasterizer, name, font, pixel_size, viewport_width, viewport_height)
            .map(|(renderer, _)| renderer)
    }

    /// Like [`Self::load_named`], also returning the per-glyph warnings
    pub fn load_named_with_report<R: FontRasterizer>(
        &mut self,
        rasterizer: &R,
        name: &str,
        font: impl AsRef<Path>,
        pixel_size: u32,
        viewport_width: u32,
        viewport_height: u32,
    ) -> TextResult<(&mut TextRenderer<C>, LoadReport)> {
        if self.renderers.contains_key(name) {
            let anchor = self.baseline_anchor;
            let renderer = self.get_named_mut(name)?;
            let previous_anchor = renderer.baseline_anchor();
            renderer.set_baseline_anchor(anchor);
            let report = match renderer.load(rasterizer, font, pixel_size) {
                Ok(report) => report,
                Err(e) => {
                    renderer.set_baseline_anchor(previous_anchor);
                    return Err(e);
                }
            };
            renderer.set_viewport(viewport_width, viewport_height);
            log::debug!("Reloaded text renderer '{name}'");
            return Ok((renderer, report));
        }

        let mut renderer = TextRenderer::new(&self.context, Rc::clone(&self.shader), viewport_width, viewport_height)?
            .with_baseline_anchor(self.baseline_anchor);
        let report = renderer.load(rasterizer, font, pixel_size)?;
        log::debug!("Registered text renderer '{name}'");

        let renderer = self.renderers.entry(name.to_string()).or_insert(renderer);
        Ok((renderer, report))
    }

    /// Load every font listed in `config`, stopping at the first failure
    pub fn load_from_config<R: FontRasterizer>(
        &mut self,
        rasterizer: &R,
        config: &TextRenderConfig,
    ) -> TextResult<Vec<(String, LoadReport)>> {
        config.validate()?;
        self.baseline_anchor = config.baseline_anchor;

        config
            .fonts
            .iter()
            .map(|font| {
                let (_, report) = self.load_named_with_report(
                    rasterizer,
                    &font.name,
                    &font.path,
                    font.pixel_size,
                    config.viewport_width,
                    config.viewport_height,
                )?;
                Ok((font.name.clone(), report))
            })
            .collect()
    }

    /// Renderer registered under `name`
    pub fn get_named(&self, name: &str) -> TextResult<&TextRenderer<C>> {
        self.renderers
            .get(name)
            .ok_or_else(|| TextError::NotFound(name.to_string()))
    }

    /// Mutable renderer registered under `name`
    pub fn get_named_mut(&mut self, name: &str) -> TextResult<&mut TextRenderer<C>> {
        self.renderers
            .get_mut(name)
            .ok_or_else(|| TextError::NotFound(name.to_string()))
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.renderers.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.renderers.keys().map(String::as_str)
    }

    /// Number of registered renderers
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    /// Whether no renderer is registered
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Destroy the renderer called `name`, releasing its GPU resources
    pub fn destroy(&mut self, name: &str) -> TextResult<()> {
        if self.renderers.remove(name).is_none() {
            return Err(TextError::NotFound(name.to_string()));
        }
        log::debug!("Destroyed text renderer '{name}'");
        Ok(())
    }

    /// Destroy every renderer in name order
    pub fn destroy_all(&mut self) {
        while let Some((name, renderer)) = self.renderers.pop_first() {
            drop(renderer);
            log::debug!("Destroyed text renderer '{name}'");
        }
    }
}

impl<C: DrawContext> Drop for TextRendererRegistry<C> {
    fn drop(&mut self) {
        self.destroy_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::gl::HeadlessContext;
    use crate::render::text::config::FontConfig;
    use crate::render::text::test_support::SyntheticRasterizer;

    fn registry(context: &Rc<HeadlessContext>) -> TextRendererRegistry<HeadlessContext> {
        let program = context.create_program();
        TextRendererRegistry::new(context, Rc::new(ShaderProgram::from_raw(context, program, "text")))
    }

    #[test]
    fn test_get_returns_loaded_instance() {
        let context = Rc::new(HeadlessContext::new());
        let rasterizer = SyntheticRasterizer::monospace(10);
        let mut registry = registry(&context);

        let loaded: *const TextRenderer<HeadlessContext> =
            registry.load_named(&rasterizer, "hud", "hud.ttf", 24, 800, 600).unwrap();
        let fetched = registry.get_named("hud").unwrap();

        assert!(std::ptr::eq(loaded, fetched));
        assert_eq!(fetched.glyphs().len(), 128);
        assert_eq!(fetched.font_size(), 24);
        assert_eq!(fetched.viewport(), (800, 600));
    }

    #[test]
    fn test_missing_name_is_not_found() {
        let context = Rc::new(HeadlessContext::new());
        let mut registry = registry(&context);

        assert!(matches!(registry.get_named("missing"), Err(TextError::NotFound(name)) if name == "missing"));
        assert!(matches!(registry.get_named_mut("missing"), Err(TextError::NotFound(_))));
        assert!(matches!(registry.destroy("missing"), Err(TextError::NotFound(_))));
    }

    #[test]
    fn test_reload_keeps_instance() {
        let context = Rc::new(HeadlessContext::new());
        let rasterizer = SyntheticRasterizer::monospace(10);
        let mut registry = registry(&context);

        let first: *const TextRenderer<HeadlessContext> =
            registry.load_named(&rasterizer, "menu", "menu.ttf", 16, 800, 600).unwrap();
        let second: *const TextRenderer<HeadlessContext> =
            registry.load_named(&rasterizer, "menu", "menu.ttf", 32, 1024, 768).unwrap();

        assert!(std::ptr::eq(first, second));
        let menu = registry.get_named("menu").unwrap();
        assert_eq!(menu.font_size(), 32);
        assert_eq!(menu.viewport(), (1024, 768));
        assert_eq!(registry.len(), 1);
        assert_eq!(context.live_texture_count(), 128);
    }

    #[test]
    fn test_failed_first_load_registers_nothing() {
        let context = Rc::new(HeadlessContext::new());
        let mut registry = registry(&context);

        let result = registry.load_named(&SyntheticRasterizer::monospace(10).unopenable(), "hud", "hud.ttf", 24, 800, 600);
        assert!(matches!(result, Err(TextError::FontOpen { .. })));
        assert!(!registry.contains("hud"));
        assert_eq!(context.live_buffer_count(), 0);
    }

    #[test]
    fn test_load_from_config() {
        let context = Rc::new(HeadlessContext::new());
        let rasterizer = SyntheticRasterizer::monospace(10).failing(&[5, b'X']);
        let mut registry = registry(&context);
        let config = TextRenderConfig::default()
            .with_font(FontConfig::new("menu", "menu.ttf", 32))
            .with_font(FontConfig::new("hud", "hud.ttf", 24));

        let reports = registry.load_from_config(&rasterizer, &config).unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|(_, report)| report.warnings.len() == 2));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["hud", "menu"]);
        assert_eq!(registry.get_named("menu").unwrap().font_size(), 32);

        let anchored = TextRenderConfig {
            baseline_anchor: 'X',
            ..config
        };
        let mut fresh = self::registry(&context);
        let result = fresh.load_from_config(&rasterizer, &anchored);
        assert!(fresh.is_empty());
        assert!(matches!(result, Err(TextError::MissingBaselineAnchor('X'))));
    }

    #[test]
    fn test_config_anchor_applies_to_registered_fonts() {
        let context = Rc::new(HeadlessContext::new());
        let rasterizer = SyntheticRasterizer::monospace(10);
        let mut registry = registry(&context);
        registry.load_named(&rasterizer, "hud", "hud.ttf", 24, 800, 600).unwrap();
        assert_eq!(registry.get_named("hud").unwrap().baseline_anchor(), 'H');

        let config = TextRenderConfig {
            baseline_anchor: 'x',
            ..TextRenderConfig::default()
        }
        .with_font(FontConfig::new("hud", "hud.ttf", 24))
        .with_font(FontConfig::new("menu", "menu.ttf", 16));
        registry.load_from_config(&rasterizer, &config).unwrap();

        assert_eq!(registry.get_named("hud").unwrap().baseline_anchor(), 'x');
        assert_eq!(registry.get_named("menu").unwrap().baseline_anchor(), 'x');
    }

    #[test]
    fn test_failed_reload_keeps_anchor() {
        let context = Rc::new(HeadlessContext::new());
        let mut registry = registry(&context);
        registry
            .load_named(&SyntheticRasterizer::monospace(10), "hud", "hud.ttf", 24, 800, 600)
            .unwrap();

        let mut registry = registry.with_baseline_anchor('x');
        let result = registry.load_named(&SyntheticRasterizer::monospace(10).failing(b"x"), "hud", "hud.ttf", 32, 1024, 768);
        assert!(matches!(result, Err(TextError::MissingBaselineAnchor('x'))));

        let hud = registry.get_named("hud").unwrap();
        assert_eq!(hud.baseline_anchor(), 'H');
        assert_eq!(hud.font_size(), 24);
        assert_eq!(hud.viewport(), (800, 600));
        assert!(hud.measure_rendered_text_bounds("Hi", 0.0, 0.0, 1.0).is_ok());
    }

    #[test]
    fn test_destroy_releases_gpu_objects() {
        let context = Rc::new(HeadlessContext::new());
        let rasterizer = SyntheticRasterizer::monospace(10);
        let mut registry = registry(&context);
        registry.load_named(&rasterizer, "hud", "hud.ttf", 24, 800, 600).unwrap();
        registry.load_named(&rasterizer, "menu", "menu.ttf", 16, 800, 600).unwrap();
        assert_eq!(context.live_texture_count(), 256);

        registry.destroy("hud").unwrap();
        assert_eq!(context.live_texture_count(), 128);

        registry.destroy_all();
        assert!(registry.is_empty());
        assert_eq!(context.live_texture_count(), 0);
        assert_eq!(context.live_buffer_count(), 0);
    }

    #[test]
    fn test_drop_tears_down_everything() {
        let context = Rc::new(HeadlessContext::new());
        let rasterizer = SyntheticRasterizer::proportional();
        {
            let mut registry = registry(&context);
            registry.load_named(&rasterizer, "hud", "hud.ttf", 24, 800, 600).unwrap();
        }
        assert_eq!(context.live_texture_count(), 0);
        assert_eq!(context.live_vertex_array_count(), 0);
    }
}
