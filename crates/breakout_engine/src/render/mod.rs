//! Rendering module
//!
//! The OpenGL-style draw context and the text pipeline built on it.

pub mod gl;
pub mod text;

pub use gl::{DrawContext, GlowContext, GpuError, GpuResult, HeadlessContext, ShaderProgram};
pub use text::{TextError, TextRenderer, TextRendererRegistry, TextResult};
