//! Glyph atlas loading
//!
//! Opens a face, rasterizes the 128 ASCII codes into one texture each and
//! collects the face metrics. A face that cannot be opened aborts the load;
//! a glyph that cannot be rasterized is skipped and reported.

use super::error::{TextError, TextResult};
use super::glyph::{ascii_code, FontMetrics, Glyph, GlyphMetrics, GlyphStore, GLYPH_CODE_COUNT};
use super::rasterizer::{FontFace, FontRasterizer, RasterizedGlyph};
use crate::foundation::math::IVec2;
use crate::render::gl::{DrawContext, GpuTexture, TextureSampling};
use std::path::Path;
use std::rc::Rc;

/// Default baseline anchor character
pub const DEFAULT_BASELINE_ANCHOR: char = 'H';

/// Result of a successful load
pub struct LoadedFont<C: DrawContext> {
    /// Cached glyphs
    pub glyphs: GlyphStore<C>,
    /// Face-wide metrics
    pub metrics: FontMetrics,
    /// Per-glyph failures that were skipped
    pub warnings: Vec<TextError>,
}

/// Summary of a load handed back to callers
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Number of glyphs cached
    pub glyph_count: usize,
    /// Per-glyph failures ([`TextError::GlyphRasterize`]) that were skipped
    pub warnings: Vec<TextError>,
}

impl LoadReport {
    /// Whether every code rasterized
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// One-shot loader turning a font file into a [`GlyphStore`]
pub struct GlyphAtlasLoader<'a, R: FontRasterizer> {
    rasterizer: &'a R,
    baseline_anchor: char,
}

impl<'a, R: FontRasterizer> GlyphAtlasLoader<'a, R> {
    /// Loader using `rasterizer` and the default `'H'` anchor
    pub fn new(rasterizer: &'a R) -> Self {
        Self {
            rasterizer,
            baseline_anchor: DEFAULT_BASELINE_ANCHOR,
        }
    }

    /// Require a different baseline anchor glyph
    pub fn with_baseline_anchor(mut self, anchor: char) -> Self {
        self.baseline_anchor = anchor;
        self
    }

    /// Load the face at `path` at `pixel_size`
    ///
    /// Textures created before a failure are released when the partial
    /// store is dropped. Leaves texture 0 bound.
    pub fn load<C: DrawContext>(
        &self,
        context: &Rc<C>,
        path: impl AsRef<Path>,
        pixel_size: u32,
    ) -> TextResult<LoadedFont<C>> {
        let path = path.as_ref();
        if ascii_code(self.baseline_anchor).is_none() {
            return Err(TextError::MissingBaselineAnchor(self.baseline_anchor));
        }

        // The face only lives for this call
        let mut face = self.rasterizer.open_face(path, pixel_size)?;

        let mut glyphs = GlyphStore::new();
        let mut warnings = Vec::new();
        let uploaded = (0..GLYPH_CODE_COUNT).try_for_each(|code| {
            let rasterized = match face.rasterize(code) {
                Ok(rasterized) => rasterized,
                Err(reason) => {
                    log::warn!("Skipping glyph {code:#04x} from {}: {reason}", path.display());
                    warnings.push(TextError::GlyphRasterize { code, reason });
                    return Ok(());
                }
            };
            glyphs.insert(upload_glyph(context, code, &rasterized)?);
            Ok::<(), TextError>(())
        });
        context.bind_texture(None);
        uploaded?;

        if !glyphs.contains(self.baseline_anchor) {
            return Err(TextError::MissingBaselineAnchor(self.baseline_anchor));
        }

        let size_metrics = face.size_metrics();
        let metrics = FontMetrics::from_fixed(pixel_size, size_metrics.ascender, size_metrics.descender);

        log::info!(
            "Loaded {} glyphs from {} at {}px (ascent {}, descent {}, {} skipped)",
            glyphs.len(),
            path.display(),
            pixel_size,
            metrics.ascent,
            metrics.descent,
            warnings.len()
        );

        Ok(LoadedFont { glyphs, metrics, warnings })
    }
}

fn upload_glyph<C: DrawContext>(context: &Rc<C>, code: u8, rasterized: &RasterizedGlyph) -> TextResult<Glyph<C>> {
    let texture = GpuTexture::new_r8(
        context,
        rasterized.width,
        rasterized.height,
        &rasterized.coverage,
        TextureSampling::GLYPH,
    )?;

    let metrics = GlyphMetrics {
        size: IVec2::new(rasterized.width as i32, rasterized.height as i32),
        bearing: rasterized.bearing,
        advance_raw: rasterized.advance_raw,
    };
    Ok(Glyph::new(code, metrics, texture))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::gl::{GlCall, HeadlessContext};
    use crate::render::text::test_support::SyntheticRasterizer;

    #[test]
    fn test_loads_all_ascii_codes() {
        let context = Rc::new(HeadlessContext::new());
        let rasterizer = SyntheticRasterizer::monospace(10);

        let loaded = GlyphAtlasLoader::new(&rasterizer).load(&context, "mono.ttf", 16).unwrap();
        assert_eq!(loaded.glyphs.len(), 128);
        assert!(loaded.warnings.is_empty());
        assert_eq!(context.live_texture_count(), 128);
        assert_eq!(context.bound_texture(), None);
        assert_eq!(loaded.metrics.pixel_size, 16);
        assert_eq!(loaded.metrics.ascent, 12);
        assert_eq!(loaded.metrics.descent, -4);
    }

    #[test]
    fn test_textures_use_glyph_sampling() {
        let context = Rc::new(HeadlessContext::new());
        let rasterizer = SyntheticRasterizer::monospace(10);
        let _loaded = GlyphAtlasLoader::new(&rasterizer).load(&context, "mono.ttf", 16).unwrap();

        let created: Vec<_> = context
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                GlCall::CreateTexture { sampling, .. } => Some(sampling),
                _ => None,
            })
            .collect();
        assert_eq!(created.len(), 128);
        assert!(created.iter().all(|s| *s == TextureSampling::GLYPH));
    }

    #[test]
    fn test_failed_glyph_is_skipped() {
        let context = Rc::new(HeadlessContext::new());
        let rasterizer = SyntheticRasterizer::monospace(10).failing(&[5]);

        let loaded = GlyphAtlasLoader::new(&rasterizer).load(&context, "mono.ttf", 16).unwrap();
        assert_eq!(loaded.glyphs.len(), 127);
        assert!(loaded.glyphs.get_code(5).is_none());
        assert_eq!(loaded.warnings.len(), 1);
        assert!(matches!(loaded.warnings[0], TextError::GlyphRasterize { code: 5, .. }));
    }

    #[test]
    fn test_missing_anchor_fails_and_releases_textures() {
        let context = Rc::new(HeadlessContext::new());
        let rasterizer = SyntheticRasterizer::monospace(10).failing(&[b'H']);

        let result = GlyphAtlasLoader::new(&rasterizer).load(&context, "mono.ttf", 16);
        assert!(matches!(result, Err(TextError::MissingBaselineAnchor('H'))));
        assert_eq!(context.live_texture_count(), 0);
    }

    #[test]
    fn test_custom_anchor() {
        let context = Rc::new(HeadlessContext::new());
        let rasterizer = SyntheticRasterizer::monospace(10).failing(&[b'H']);

        let loaded = GlyphAtlasLoader::new(&rasterizer)
            .with_baseline_anchor('X')
            .load(&context, "mono.ttf", 16)
            .unwrap();
        assert_eq!(loaded.glyphs.len(), 127);

        let result = GlyphAtlasLoader::new(&rasterizer)
            .with_baseline_anchor('é')
            .load(&context, "mono.ttf", 16);
        assert!(matches!(result, Err(TextError::MissingBaselineAnchor('é'))));
    }

    #[test]
    fn test_gpu_failure_aborts_load() {
        let context = Rc::new(HeadlessContext::new());
        context.set_fail_texture_creation(true);
        let rasterizer = SyntheticRasterizer::monospace(10);

        let result = GlyphAtlasLoader::new(&rasterizer).load(&context, "mono.ttf", 16);
        assert!(matches!(result, Err(TextError::Gpu(_))));
        assert_eq!(context.bound_texture(), None);
    }

    #[test]
    fn test_open_failure_propagates() {
        let context = Rc::new(HeadlessContext::new());
        let rasterizer = SyntheticRasterizer::monospace(10).unopenable();

        let result = GlyphAtlasLoader::new(&rasterizer).load(&context, "missing.ttf", 16);
        assert!(matches!(result, Err(TextError::FontOpen { .. })));
        assert!(context.calls().is_empty());
    }

    #[test]
    fn test_reload_is_deterministic() {
        let context = Rc::new(HeadlessContext::new());
        let rasterizer = SyntheticRasterizer::proportional();
        let loader = GlyphAtlasLoader::new(&rasterizer);

        let first = loader.load(&context, "sans.ttf", 24).unwrap();
        let second = loader.load(&context, "sans.ttf", 24).unwrap();
        let first_metrics: Vec<_> = first.glyphs.iter().map(|g| (g.code(), *g.metrics())).collect();
        let second_metrics: Vec<_> = second.glyphs.iter().map(|g| (g.code(), *g.metrics())).collect();
        assert_eq!(first_metrics, second_metrics);
        assert_eq!(first.metrics, second.metrics);
    }
}
