//! Call-recording draw context without a GPU
//!
//! Hands out sequential handles, tracks bind state and live objects, and
//! keeps a log of every call. Used by `font_probe` to measure text on
//! machines without a display and by the test suites to verify the exact
//! sequence of GPU work.

use super::{DrawContext, GpuError, GpuResult, TextureSampling, VertexLayout};
use crate::foundation::math::{Mat4, Vec3};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

/// Handle type used by [`HeadlessContext`] for every object kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeadlessHandle(pub u32);

/// One recorded draw context call
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    /// Texture created
    CreateTexture {
        /// New handle
        texture: HeadlessHandle,
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
        /// Sampling state
        sampling: TextureSampling,
    },
    /// Texture released
    DeleteTexture(HeadlessHandle),
    /// Texture bound (`None` = 0)
    BindTexture(Option<HeadlessHandle>),
    /// Active texture unit selected
    ActiveTexture(u32),
    /// Vertex array created
    CreateVertexArray(HeadlessHandle),
    /// Vertex array released
    DeleteVertexArray(HeadlessHandle),
    /// Vertex array bound (`None` = 0)
    BindVertexArray(Option<HeadlessHandle>),
    /// Dynamic buffer created
    CreateDynamicBuffer {
        /// New handle
        buffer: HeadlessHandle,
        /// Allocated size
        byte_len: usize,
        /// Attribute location
        location: u32,
        /// Floats per vertex
        components: i32,
    },
    /// Sub-range buffer update
    UpdateBuffer {
        /// Target buffer
        buffer: HeadlessHandle,
        /// Byte offset
        offset: usize,
        /// Uploaded data reinterpreted as floats
        floats: Vec<f32>,
    },
    /// Buffer released
    DeleteBuffer(HeadlessHandle),
    /// Triangle draw
    DrawTriangles {
        /// First vertex
        first: i32,
        /// Vertex count
        count: i32,
    },
    /// Program made current
    UseProgram(Option<HeadlessHandle>),
    /// Integer uniform set
    UniformI32(String, i32),
    /// Matrix uniform set
    UniformMat4(String, Mat4),
    /// Vector uniform set
    UniformVec3(String, Vec3),
}

/// Draw context that records calls instead of talking to a GPU
#[derive(Debug, Default)]
pub struct HeadlessContext {
    next_handle: Cell<u32>,
    calls: RefCell<Vec<GlCall>>,
    live_textures: RefCell<BTreeSet<HeadlessHandle>>,
    live_buffers: RefCell<BTreeSet<HeadlessHandle>>,
    live_vertex_arrays: RefCell<BTreeSet<HeadlessHandle>>,
    bound_texture: Cell<Option<HeadlessHandle>>,
    bound_vertex_array: Cell<Option<HeadlessHandle>>,
    current_program: Cell<Option<HeadlessHandle>>,
    fail_texture_creation: Cell<bool>,
}

impl HeadlessContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a program handle standing in for a compiled shader
    pub fn create_program(&self) -> HeadlessHandle {
        self.allocate()
    }

    /// Make subsequent texture creation fail, to exercise error paths
    pub fn set_fail_texture_creation(&self, fail: bool) {
        self.fail_texture_creation.set(fail);
    }

    /// Snapshot of every recorded call
    pub fn calls(&self) -> Vec<GlCall> {
        self.calls.borrow().clone()
    }

    /// Forget recorded calls, keeping live objects and bind state
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Number of triangle draws recorded
    pub fn draw_call_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, GlCall::DrawTriangles { .. }))
            .count()
    }

    /// Vertices of the most recent buffer update, grouped per vertex
    pub fn last_buffer_upload(&self) -> Option<Vec<[f32; 4]>> {
        self.buffer_uploads().pop()
    }

    /// Vertices of every buffer update in order, grouped per vertex
    pub fn buffer_uploads(&self) -> Vec<Vec<[f32; 4]>> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                GlCall::UpdateBuffer { floats, .. } => Some(
                    floats
                        .chunks_exact(4)
                        .map(|v| [v[0], v[1], v[2], v[3]])
                        .collect(),
                ),
                _ => None,
            })
            .collect()
    }

    /// Texture currently bound (`None` = 0)
    pub fn bound_texture(&self) -> Option<HeadlessHandle> {
        self.bound_texture.get()
    }

    /// Vertex array currently bound (`None` = 0)
    pub fn bound_vertex_array(&self) -> Option<HeadlessHandle> {
        self.bound_vertex_array.get()
    }

    /// Program currently in use
    pub fn current_program(&self) -> Option<HeadlessHandle> {
        self.current_program.get()
    }

    /// Textures created and not yet released
    pub fn live_texture_count(&self) -> usize {
        self.live_textures.borrow().len()
    }

    /// Buffers created and not yet released
    pub fn live_buffer_count(&self) -> usize {
        self.live_buffers.borrow().len()
    }

    /// Vertex arrays created and not yet released
    pub fn live_vertex_array_count(&self) -> usize {
        self.live_vertex_arrays.borrow().len()
    }

    fn allocate(&self) -> HeadlessHandle {
        // Handle 0 means "unbound" in GL, start at 1
        let id = self.next_handle.get() + 1;
        self.next_handle.set(id);
        HeadlessHandle(id)
    }

    fn record(&self, call: GlCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl DrawContext for HeadlessContext {
    type Texture = HeadlessHandle;
    type Buffer = HeadlessHandle;
    type VertexArray = HeadlessHandle;
    type Program = HeadlessHandle;

    fn create_texture_r8(
        &self,
        width: u32,
        height: u32,
        pixels: &[u8],
        sampling: TextureSampling,
    ) -> GpuResult<Self::Texture> {
        if self.fail_texture_creation.get() {
            return Err(GpuError::TextureCreation("texture creation disabled".to_string()));
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(GpuError::TextureCreation(format!(
                "expected {expected} bytes for {width}x{height}, got {}",
                pixels.len()
            )));
        }

        let texture = self.allocate();
        self.live_textures.borrow_mut().insert(texture);
        self.bound_texture.set(Some(texture));
        self.record(GlCall::CreateTexture { texture, width, height, sampling });
        Ok(texture)
    }

    fn delete_texture(&self, texture: Self::Texture) {
        self.live_textures.borrow_mut().remove(&texture);
        if self.bound_texture.get() == Some(texture) {
            self.bound_texture.set(None);
        }
        self.record(GlCall::DeleteTexture(texture));
    }

    fn bind_texture(&self, texture: Option<Self::Texture>) {
        self.bound_texture.set(texture);
        self.record(GlCall::BindTexture(texture));
    }

    fn active_texture_unit(&self, unit: u32) {
        self.record(GlCall::ActiveTexture(unit));
    }

    fn create_vertex_array(&self) -> GpuResult<Self::VertexArray> {
        let vertex_array = self.allocate();
        self.live_vertex_arrays.borrow_mut().insert(vertex_array);
        self.record(GlCall::CreateVertexArray(vertex_array));
        Ok(vertex_array)
    }

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        self.live_vertex_arrays.borrow_mut().remove(&vertex_array);
        if self.bound_vertex_array.get() == Some(vertex_array) {
            self.bound_vertex_array.set(None);
        }
        self.record(GlCall::DeleteVertexArray(vertex_array));
    }

    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        self.bound_vertex_array.set(vertex_array);
        self.record(GlCall::BindVertexArray(vertex_array));
    }

    fn create_dynamic_buffer(&self, byte_len: usize, layout: VertexLayout) -> GpuResult<Self::Buffer> {
        let buffer = self.allocate();
        self.live_buffers.borrow_mut().insert(buffer);
        self.record(GlCall::CreateDynamicBuffer {
            buffer,
            byte_len,
            location: layout.location,
            components: layout.components,
        });
        Ok(buffer)
    }

    fn update_buffer(&self, buffer: Self::Buffer, offset: usize, data: &[u8]) {
        let floats = data
            .chunks_exact(4)
            .map(|bytes| f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            .collect();
        self.record(GlCall::UpdateBuffer { buffer, offset, floats });
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        self.live_buffers.borrow_mut().remove(&buffer);
        self.record(GlCall::DeleteBuffer(buffer));
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        self.record(GlCall::DrawTriangles { first, count });
    }

    fn use_program(&self, program: Option<Self::Program>) {
        self.current_program.set(program);
        self.record(GlCall::UseProgram(program));
    }

    fn set_uniform_i32(&self, _program: Self::Program, name: &str, value: i32) {
        self.record(GlCall::UniformI32(name.to_string(), value));
    }

    fn set_uniform_mat4(&self, _program: Self::Program, name: &str, value: &Mat4) {
        self.record(GlCall::UniformMat4(name.to_string(), *value));
    }

    fn set_uniform_vec3(&self, _program: Self::Program, name: &str, value: &Vec3) {
        self.record(GlCall::UniformVec3(name.to_string(), *value));
    }
}
