//! Rendering seam
//!
//! The viewer does not rasterize anything itself. Each frame it hands a
//! [`FrameView`] (graph, active camera, surface) to a [`RenderBackend`]; the
//! [`RenderDriver`] owns the loop around it.

pub mod driver;
pub mod headless;
#[cfg(feature = "winit")]
pub mod window;

pub use driver::RenderDriver;
pub use headless::{FrameRecord, HeadlessBackend};
#[cfg(feature = "winit")]
pub use window::WindowedBackend;

use crate::errors::Result;
use crate::input::SurfaceRect;
use crate::scene::{Camera, Node, NodeId, SceneGraph};

/// Read-only snapshot of what to draw this frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub graph: &'a SceneGraph,
    pub camera: &'a Camera,
    pub surface: SurfaceRect,
    pub pixel_ratio: f32,
    pub frame_index: u64,
}

impl<'a> FrameView<'a> {
    /// Physical size of the render target.
    #[must_use]
    pub fn physical_size(&self) -> (u32, u32) {
        let w = (self.surface.width * self.pixel_ratio).round().max(1.0);
        let h = (self.surface.height * self.pixel_ratio).round().max(1.0);
        (w as u32, h as u32)
    }

    /// Nodes that produce pixels: visible in the hierarchy and not carrying
    /// an invisible material.
    pub fn drawable_nodes(&self) -> impl Iterator<Item = (NodeId, &'a Node)> + 'a {
        let graph = self.graph;
        graph.iter().filter(move |(id, node)| {
            node.material.is_none_or(|m| m.visible) && graph.is_visible_in_hierarchy(*id)
        })
    }
}

pub trait RenderBackend {
    /// Called whenever the surface box or pixel ratio changes.
    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) -> Result<()>;

    /// Draws one frame.
    fn render(&mut self, frame: &FrameView<'_>) -> Result<()>;
}
