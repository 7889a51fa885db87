//! # Rendering System
//!
//! The runtime does not draw anything itself. It talks to a rendering backend
//! through the [`Renderer`] trait and mirrors its game-object tree into the
//! backend's [`SceneGraph`] container.
//!
//! ## Architecture
//!
//! - **Renderer**: owns the output surface and the play/pause state of the loop
//! - **SceneGraph**: the backend's container of renderable nodes (see `scene::scene_graph`)
//! - **HeadlessRenderer**: a window-less backend for tools, tests, and servers

pub mod color;
pub mod headless;

pub use color::Color;
pub use headless::HeadlessRenderer;

use thiserror::Error;

use crate::scene::SceneGraph;

/// Size of the surface a renderer draws into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Canvas {
    /// Create a canvas description
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Rendering backend consumed by the game
pub trait Renderer {
    /// The surface input is bound to
    fn canvas(&self) -> Canvas;

    /// Create the backend's scene container for a new scene
    fn create_scene_graph(&mut self, background: Color) -> Box<dyn SceneGraph>;

    /// Start (or resume) the render loop
    fn play(&mut self);

    /// Halt the render loop without tearing anything down
    fn pause(&mut self);

    /// Whether the loop is currently running
    fn is_playing(&self) -> bool;

    /// Draw one frame of `graph`
    fn render(&mut self, graph: &dyn SceneGraph) -> Result<(), RenderError>;
}

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Renderer options were rejected
    #[error("Invalid renderer options: {0}")]
    InvalidOptions(String),

    /// Backend failed to draw a frame
    #[error("Frame failed: {0}")]
    FrameFailed(String),
}
