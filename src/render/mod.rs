//! Rendering module
//!
//! The engine never talks to a graphics API. [`RenderSystem`] turns the scene
//! into [`DrawCommand`]s in screen space and hands them to whatever
//! [`Renderer`] the platform layer provides.

mod system;

use glam::Vec2;

use crate::assets::{AssetHandle, Shader, Texture};

pub use system::{DESTROY_STAGE_TEXTURES, RenderStats, RenderSystem};

/// Draw order; later layers cover earlier ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Blocks,
    Overlay,
    Sprites,
}

/// One textured quad in screen space
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub layer: Layer,
    pub shader: AssetHandle<Shader>,
    pub texture: AssetHandle<Texture>,
    /// Lower-left corner in pixels, origin bottom-left
    pub position: Vec2,
    pub size: Vec2,
}

/// Backend that puts quads on screen
pub trait Renderer {
    /// Queue a quad for this frame
    fn draw(&mut self, command: DrawCommand);

    /// Finish the frame
    fn present(&mut self);
}

/// Renderer that keeps the last presented frame, for headless runs and tests
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pending: Vec<DrawCommand>,
    frame: Vec<DrawCommand>,
    frames: u64,
}

impl RecordingRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands of the last presented frame, in submission order
    #[must_use]
    pub fn frame(&self) -> &[DrawCommand] {
        &self.frame
    }

    /// Number of frames presented
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, command: DrawCommand) {
        self.pending.push(command);
    }

    fn present(&mut self) {
        self.frame = std::mem::take(&mut self.pending);
        self.frames += 1;
    }
}
