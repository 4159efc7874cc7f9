//! Opaque handle to an already compiled shader program

use super::DrawContext;
use crate::foundation::math::{Mat4, Vec3};
use std::rc::Rc;

/// Compiled GPU program exposing named uniform setters
///
/// Compilation and linking happen elsewhere; this handle does not own the
/// program object and never deletes it.
pub struct ShaderProgram<C: DrawContext> {
    context: Rc<C>,
    program: C::Program,
    name: String,
}

impl<C: DrawContext> ShaderProgram<C> {
    /// Wrap an existing program handle
    pub fn from_raw(context: &Rc<C>, program: C::Program, name: impl Into<String>) -> Self {
        Self {
            context: Rc::clone(context),
            program,
            name: name.into(),
        }
    }

    /// Make this program current
    pub fn activate(&self) -> &Self {
        self.context.use_program(Some(self.program));
        self
    }

    /// Set an integer uniform (texture units, flags)
    pub fn set_integer(&self, name: &str, value: i32) -> &Self {
        self.context.set_uniform_i32(self.program, name, value);
        self
    }

    /// Set a 4x4 matrix uniform
    pub fn set_matrix4(&self, name: &str, value: &Mat4) -> &Self {
        self.context.set_uniform_mat4(self.program, name, value);
        self
    }

    /// Set a 3-component vector uniform
    pub fn set_vector3f(&self, name: &str, value: &Vec3) -> &Self {
        self.context.set_uniform_vec3(self.program, name, value);
        self
    }

    /// Name the program was registered under
    pub fn name(&self) -> &str {
        &self.name
    }
}
