//! Text rendering configuration
//!
//! Describes the fonts an application wants registered at startup together
//! with the options the loader and rasterizer take.
//!
//! ```toml
//! viewport_width = 800
//! viewport_height = 600
//! baseline_anchor = "H"
//!
//! [[fonts]]
//! name = "hud"
//! path = "resources/fonts/ocraext.ttf"
//! pixel_size = 24
//! ```

use super::atlas_loader::DEFAULT_BASELINE_ANCHOR;
use super::glyph::ascii_code;
use super::rasterizer::FontdueRasterizer;
use crate::config::{Config, ConfigError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One named font to load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontConfig {
    /// Registry name
    pub name: String,
    /// Font file path
    pub path: String,
    /// Nominal pixel size
    pub pixel_size: u32,
}

impl FontConfig {
    /// Create a font entry
    pub fn new(name: impl Into<String>, path: impl Into<String>, pixel_size: u32) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            pixel_size,
        }
    }
}

/// Text subsystem configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextRenderConfig {
    /// Viewport width used for the default projection
    pub viewport_width: u32,
    /// Viewport height used for the default projection
    pub viewport_height: u32,
    /// Glyph whose top edge aligns every line
    pub baseline_anchor: char,
    /// Face index inside font collections
    pub face_index: u32,
    /// Skip codes the font has no glyph for instead of drawing `.notdef`
    pub skip_unmapped_glyphs: bool,
    /// Fonts to register
    pub fonts: Vec<FontConfig>,
}

impl Default for TextRenderConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800,
            viewport_height: 600,
            baseline_anchor: DEFAULT_BASELINE_ANCHOR,
            face_index: 0,
            skip_unmapped_glyphs: false,
            fonts: Vec::new(),
        }
    }
}

impl Config for TextRenderConfig {}

impl TextRenderConfig {
    /// Add a font entry
    pub fn with_font(mut self, font: FontConfig) -> Self {
        self.fonts.push(font);
        self
    }

    /// Check values that parse but cannot be loaded
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "viewport must be non-zero, got {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }
        if ascii_code(self.baseline_anchor).is_none() {
            return Err(ConfigError::Invalid(format!(
                "baseline anchor '{}' is outside the cached ASCII range",
                self.baseline_anchor
            )));
        }

        let mut names = BTreeSet::new();
        for font in &self.fonts {
            if font.pixel_size == 0 {
                return Err(ConfigError::Invalid(format!("font '{}' has pixel size 0", font.name)));
            }
            if !names.insert(font.name.as_str()) {
                return Err(ConfigError::Invalid(format!("font name '{}' is used twice", font.name)));
            }
        }
        Ok(())
    }

    /// `fontdue` rasterizer configured from these options
    pub fn rasterizer(&self) -> FontdueRasterizer {
        FontdueRasterizer::new()
            .with_face_index(self.face_index)
            .with_skip_unmapped(self.skip_unmapped_glyphs)
    }
}
