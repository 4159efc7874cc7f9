//! Error taxonomy of the text subsystem

use crate::config::ConfigError;
use crate::render::gl::GpuError;
use std::path::PathBuf;

/// Result type for text operations
pub type TextResult<T> = Result<T, TextError>;

/// Errors that can occur while loading fonts or laying out text
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// Font resource could not be read or is not a font file
    #[error("Failed to open font '{}': {reason}", .path.display())]
    FontOpen {
        /// Requested font path
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// Font file was recognised but the face or size could not be loaded
    #[error("Failed to load face from '{}': {reason}", .path.display())]
    FaceLoad {
        /// Requested font path
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// A single glyph could not be rasterized; recorded, never fatal to a load
    #[error("Failed to rasterize glyph {code:#04x}: {reason}")]
    GlyphRasterize {
        /// Character code that was skipped
        code: u8,
        /// Underlying cause
        reason: String,
    },

    /// The glyph used as the vertical alignment reference is not cached
    #[error("Baseline anchor glyph '{0}' is not available in the loaded face")]
    MissingBaselineAnchor(char),

    /// Registry lookup for a name that was never loaded
    #[error("No text renderer registered under '{0}'")]
    NotFound(String),

    /// Draw context failure while creating GPU resources
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),

    /// Text configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
