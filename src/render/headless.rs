use glam::Vec3;

use crate::errors::Result;
use crate::render::{FrameView, RenderBackend};

/// Summary of one frame handed to the [`HeadlessBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub frame_index: u64,
    pub drawable_nodes: usize,
    pub camera_position: Vec3,
    pub physical_size: (u32, u32),
}

/// Backend that records frames instead of drawing them.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    frames: Vec<FrameRecord>,
    size: (u32, u32),
    pixel_ratio: f32,
    keep: usize,
}

impl HeadlessBackend {
    /// Keeps at most `keep` records, dropping the oldest.
    #[must_use]
    pub fn new(keep: usize) -> Self {
        Self {
            frames: Vec::new(),
            size: (0, 0),
            pixel_ratio: 1.0,
            keep: keep.max(1),
        }
    }

    #[must_use]
    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<&FrameRecord> {
        self.frames.last()
    }

    /// Size from the last resize, in physical pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[must_use]
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }
}

impl RenderBackend for HeadlessBackend {
    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) -> Result<()> {
        self.size = (width, height);
        self.pixel_ratio = pixel_ratio;
        Ok(())
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<()> {
        if self.frames.len() >= self.keep.max(1) {
            self.frames.remove(0);
        }
        self.frames.push(FrameRecord {
            frame_index: frame.frame_index,
            drawable_nodes: frame.drawable_nodes().count(),
            camera_position: frame.camera.position(),
            physical_size: frame.physical_size(),
        });
        Ok(())
    }
}
