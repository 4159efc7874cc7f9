//! # Breakout Engine
//!
//! Text rendering core of a Breakout-style 2D game engine.
//!
//! ## Features
//!
//! - **Glyph caching**: the 128 ASCII glyphs of a face rasterized into one
//!   texture each, with per-glyph bearing and advance
//! - **Textured-quad text**: strings drawn through a reusable vertex buffer
//!   with pixel-accurate advance and baseline alignment
//! - **Measurement**: width and rendered bounds without touching the GPU
//! - **Named fonts**: a registry owned by the application context
//! - **Backends**: OpenGL via `glow`, plus a headless recorder for tools and tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use breakout_engine::prelude::*;
//! use std::rc::Rc;
//!
//! fn draw_hud(gl: glow::Context, text_program: glow::Program) -> Result<(), TextError> {
//!     let context = Rc::new(GlowContext::new(gl));
//!     let shader = Rc::new(ShaderProgram::from_raw(&context, text_program, "text"));
//!     let mut fonts = TextRendererRegistry::new(&context, shader);
//!
//!     let rasterizer = FontdueRasterizer::new();
//!     fonts.load_named(&rasterizer, "hud", "resources/fonts/ocraext.ttf", 24, 800, 600)?;
//!
//!     let hud = fonts.get_named("hud")?;
//!     hud.render_text_default("Lives: 3", 5.0, 5.0, 1.0, Vec3::new(1.0, 1.0, 1.0))?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        foundation::math::{Mat4, Vec2, Vec3},
        render::gl::{DrawContext, GlowContext, HeadlessContext, ShaderProgram},
        render::text::{
            FontConfig, FontdueRasterizer, LoadReport, TextBounds, TextError, TextRenderConfig,
            TextRenderer, TextRendererRegistry, TextResult,
        },
    };
}
