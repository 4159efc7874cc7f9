//! RAII wrappers for GPU objects created through a [`DrawContext`]
//!
//! Each wrapper keeps an `Rc` to its context and releases the object on
//! drop, so replacing a glyph set releases the previous textures without
//! any manual bookkeeping.

use super::{DrawContext, GpuResult, TextureSampling, VertexLayout};
use std::fmt;
use std::rc::Rc;

/// Exclusively owned GPU texture
pub struct GpuTexture<C: DrawContext> {
    context: Rc<C>,
    raw: C::Texture,
    width: u32,
    height: u32,
}

impl<C: DrawContext> GpuTexture<C> {
    /// Upload a single-channel coverage bitmap as a new texture
    pub fn new_r8(
        context: &Rc<C>,
        width: u32,
        height: u32,
        pixels: &[u8],
        sampling: TextureSampling,
    ) -> GpuResult<Self> {
        let raw = context.create_texture_r8(width, height, pixels, sampling)?;
        Ok(Self {
            context: Rc::clone(context),
            raw,
            width,
            height,
        })
    }

    /// Raw handle, valid for as long as `self` lives
    pub fn raw(&self) -> C::Texture {
        self.raw
    }

    /// Texture dimensions in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl<C: DrawContext> Drop for GpuTexture<C> {
    fn drop(&mut self) {
        self.context.delete_texture(self.raw);
    }
}

impl<C: DrawContext> fmt::Debug for GpuTexture<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpuTexture")
            .field("raw", &self.raw)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Floats per text vertex: 2 position + 2 texture coordinate
pub const QUAD_VERTEX_FLOATS: usize = 4;

/// Vertices per glyph quad (two triangles)
pub const QUAD_VERTEX_COUNT: usize = 6;

/// Reusable vertex array + dynamic buffer sized for exactly one quad
///
/// Allocated once per renderer; every glyph overwrites the same range.
pub struct QuadBuffer<C: DrawContext> {
    context: Rc<C>,
    vertex_array: C::VertexArray,
    buffer: C::Buffer,
}

impl<C: DrawContext> QuadBuffer<C> {
    /// Byte size of one quad
    pub const BYTE_LEN: usize = QUAD_VERTEX_COUNT * QUAD_VERTEX_FLOATS * std::mem::size_of::<f32>();

    /// Create the vertex array and buffer and record the attribute layout
    ///
    /// Leaves vertex array 0 bound.
    pub fn new(context: &Rc<C>) -> GpuResult<Self> {
        let vertex_array = context.create_vertex_array()?;
        context.bind_vertex_array(Some(vertex_array));
        let buffer = context.create_dynamic_buffer(
            Self::BYTE_LEN,
            VertexLayout {
                location: 0,
                components: QUAD_VERTEX_FLOATS as i32,
            },
        );
        context.bind_vertex_array(None);

        let buffer = match buffer {
            Ok(buffer) => buffer,
            Err(e) => {
                context.delete_vertex_array(vertex_array);
                return Err(e);
            }
        };

        Ok(Self {
            context: Rc::clone(context),
            vertex_array,
            buffer,
        })
    }

    /// Vertex array holding the quad layout
    pub fn vertex_array(&self) -> C::VertexArray {
        self.vertex_array
    }

    /// Overwrite the quad with new vertices
    pub fn upload(&self, vertices: &[[f32; QUAD_VERTEX_FLOATS]; QUAD_VERTEX_COUNT]) {
        self.context
            .update_buffer(self.buffer, 0, bytemuck::cast_slice(vertices.as_slice()));
    }
}

impl<C: DrawContext> Drop for QuadBuffer<C> {
    fn drop(&mut self) {
        self.context.delete_buffer(self.buffer);
        self.context.delete_vertex_array(self.vertex_array);
    }
}
