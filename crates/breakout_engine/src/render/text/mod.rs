//! Text rendering system
//!
//! Glyph caching, text layout, and text rendering for a single ASCII face
//! per renderer.

pub mod atlas_loader;
pub mod config;
pub mod error;
pub mod glyph;
pub mod layout;
pub mod rasterizer;
pub mod registry;
pub mod text_renderer;

#[cfg(test)]
pub(crate) mod test_support;

pub use atlas_loader::*;
pub use config::*;
pub use error::*;
pub use glyph::*;
pub use layout::*;
pub use rasterizer::*;
pub use registry::*;
pub use text_renderer::*;
