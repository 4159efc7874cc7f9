//! Draw context abstraction for the OpenGL-style rendering path
//!
//! GPU state (bound texture, vertex array, active program) is global and
//! shared with the rest of the pipeline. Everything the text system needs
//! from it goes through the [`DrawContext`] capability trait, so layout and
//! measurement stay pure and a [`HeadlessContext`] can stand in for a real
//! GPU in tools and tests.

pub mod glow_context;
pub mod headless;
pub mod resource;
pub mod shader;

pub use glow_context::GlowContext;
pub use headless::{GlCall, HeadlessContext};
pub use resource::{GpuTexture, QuadBuffer};
pub use shader::ShaderProgram;

use crate::foundation::math::{Mat4, Vec3};
use std::fmt::Debug;

/// Result type for draw context operations
pub type GpuResult<T> = Result<T, GpuError>;

/// Errors reported by a draw context
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    /// Texture object could not be created or filled
    #[error("Failed to create texture: {0}")]
    TextureCreation(String),

    /// Vertex buffer or vertex array could not be created
    #[error("Failed to create buffer: {0}")]
    BufferCreation(String),
}

/// Sampling state applied to a texture at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSampling {
    /// Clamp S and T to the edge instead of repeating
    pub clamp_to_edge: bool,
    /// Linear (`true`) or nearest (`false`) filtering for min and mag
    pub linear_filter: bool,
}

impl TextureSampling {
    /// Clamp-to-edge wrapping with linear min/mag filtering
    pub const GLYPH: Self = Self {
        clamp_to_edge: true,
        linear_filter: true,
    };
}

/// Vertex attribute layout of a float-only vertex buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    /// Shader attribute location
    pub location: u32,
    /// Number of floats per vertex
    pub components: i32,
}

/// Capability interface over the global GPU state used by the text pipeline
///
/// Methods take `&self` because the underlying API is a global state
/// machine. Handles are plain copyable values; ownership lives in the RAII
/// wrappers of [`resource`].
pub trait DrawContext {
    /// Texture handle
    type Texture: Copy + Debug + PartialEq;
    /// Buffer handle
    type Buffer: Copy + Debug + PartialEq;
    /// Vertex array handle
    type VertexArray: Copy + Debug + PartialEq;
    /// Compiled shader program handle
    type Program: Copy + Debug + PartialEq;

    /// Create a single-channel 8-bit texture from tightly packed rows
    ///
    /// The new texture is left bound to the 2D target.
    fn create_texture_r8(
        &self,
        width: u32,
        height: u32,
        pixels: &[u8],
        sampling: TextureSampling,
    ) -> GpuResult<Self::Texture>;

    /// Release a texture
    fn delete_texture(&self, texture: Self::Texture);

    /// Bind a texture to the 2D target of the active unit, `None` unbinds
    fn bind_texture(&self, texture: Option<Self::Texture>);

    /// Select the active texture unit (0-based)
    fn active_texture_unit(&self, unit: u32);

    /// Create a vertex array object
    fn create_vertex_array(&self) -> GpuResult<Self::VertexArray>;

    /// Release a vertex array object
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);

    /// Bind a vertex array, `None` unbinds
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);

    /// Create a dynamic array buffer of `byte_len` bytes and describe its layout
    ///
    /// The layout is recorded in the currently bound vertex array. The
    /// buffer is unbound again before returning.
    fn create_dynamic_buffer(&self, byte_len: usize, layout: VertexLayout) -> GpuResult<Self::Buffer>;

    /// Overwrite a byte range of a buffer without reallocating it
    fn update_buffer(&self, buffer: Self::Buffer, offset: usize, data: &[u8]);

    /// Release a buffer
    fn delete_buffer(&self, buffer: Self::Buffer);

    /// Draw `count` vertices as triangles from the bound vertex array
    fn draw_triangles(&self, first: i32, count: i32);

    /// Make a program current, `None` clears it
    fn use_program(&self, program: Option<Self::Program>);

    /// Set an integer uniform on the current program
    fn set_uniform_i32(&self, program: Self::Program, name: &str, value: i32);

    /// Set a 4x4 matrix uniform (column-major) on the current program
    fn set_uniform_mat4(&self, program: Self::Program, name: &str, value: &Mat4);

    /// Set a 3-component vector uniform on the current program
    fn set_uniform_vec3(&self, program: Self::Program, name: &str, value: &Vec3);
}
