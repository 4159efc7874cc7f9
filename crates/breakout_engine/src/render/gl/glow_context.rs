//! OpenGL implementation of [`DrawContext`] on top of `glow`
//!
//! Every call requires the wrapped GL context to be current on the calling
//! thread. `glow` marks all entry points `unsafe` for that reason; the
//! wrapper upholds it by construction (it is only created from a context
//! the caller made current, and `Rc` keeps it on one thread).

use super::{DrawContext, GpuError, GpuResult, TextureSampling, VertexLayout};
use crate::foundation::math::{Mat4, Vec3};
use glow::HasContext;

/// OpenGL 3.3 core draw context
pub struct GlowContext {
    gl: glow::Context,
}

impl GlowContext {
    /// Wrap a loaded `glow` context
    ///
    /// The context must be current on this thread for the lifetime of the
    /// returned value.
    pub fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    /// Access the raw `glow` context for the rest of the pipeline
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }
}

impl DrawContext for GlowContext {
    type Texture = glow::Texture;
    type Buffer = glow::Buffer;
    type VertexArray = glow::VertexArray;
    type Program = glow::Program;

    fn create_texture_r8(
        &self,
        width: u32,
        height: u32,
        pixels: &[u8],
        sampling: TextureSampling,
    ) -> GpuResult<Self::Texture> {
        let wrap = if sampling.clamp_to_edge {
            glow::CLAMP_TO_EDGE
        } else {
            glow::REPEAT
        };
        let filter = if sampling.linear_filter {
            glow::LINEAR
        } else {
            glow::NEAREST
        };

        unsafe {
            let texture = self.gl.create_texture().map_err(GpuError::TextureCreation)?;
            // Glyph rows are tightly packed single bytes
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::R8 as i32,
                width as i32,
                height as i32,
                0,
                glow::RED,
                glow::UNSIGNED_BYTE,
                Some(pixels),
            );
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap as i32);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap as i32);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, filter as i32);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, filter as i32);
            Ok(texture)
        }
    }

    fn delete_texture(&self, texture: Self::Texture) {
        unsafe { self.gl.delete_texture(texture) }
    }

    fn bind_texture(&self, texture: Option<Self::Texture>) {
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, texture) }
    }

    fn active_texture_unit(&self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) }
    }

    fn create_vertex_array(&self) -> GpuResult<Self::VertexArray> {
        unsafe { self.gl.create_vertex_array().map_err(GpuError::BufferCreation) }
    }

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        unsafe { self.gl.delete_vertex_array(vertex_array) }
    }

    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        unsafe { self.gl.bind_vertex_array(vertex_array) }
    }

    fn create_dynamic_buffer(&self, byte_len: usize, layout: VertexLayout) -> GpuResult<Self::Buffer> {
        let stride = layout.components * std::mem::size_of::<f32>() as i32;
        unsafe {
            let buffer = self.gl.create_buffer().map_err(GpuError::BufferCreation)?;
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_size(glow::ARRAY_BUFFER, byte_len as i32, glow::DYNAMIC_DRAW);
            self.gl.enable_vertex_attrib_array(layout.location);
            self.gl.vertex_attrib_pointer_f32(layout.location, layout.components, glow::FLOAT, false, stride, 0);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            Ok(buffer)
        }
    }

    fn update_buffer(&self, buffer: Self::Buffer, offset: usize, data: &[u8]) {
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_sub_data_u8_slice(glow::ARRAY_BUFFER, offset as i32, data);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(glow::TRIANGLES, first, count) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { self.gl.use_program(program) }
    }

    fn set_uniform_i32(&self, program: Self::Program, name: &str, value: i32) {
        unsafe {
            let location = self.gl.get_uniform_location(program, name);
            self.gl.uniform_1_i32(location.as_ref(), value);
        }
    }

    fn set_uniform_mat4(&self, program: Self::Program, name: &str, value: &Mat4) {
        unsafe {
            let location = self.gl.get_uniform_location(program, name);
            // nalgebra storage is column-major, as GL expects
            self.gl.uniform_matrix_4_f32_slice(location.as_ref(), false, value.as_slice());
        }
    }

    fn set_uniform_vec3(&self, program: Self::Program, name: &str, value: &Vec3) {
        unsafe {
            let location = self.gl.get_uniform_location(program, name);
            self.gl.uniform_3_f32(location.as_ref(), value.x, value.y, value.z);
        }
    }
}
