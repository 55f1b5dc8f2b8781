use std::sync::Arc;

use winit::window::Window;

use crate::errors::{Error, Result};
use crate::render::{FrameView, RenderBackend};

/// Frames between title refreshes.
const TITLE_INTERVAL: u64 = 30;

/// Backend bound to a winit window.
///
/// It owns the window handle and tracks its size; frames are summarized in the
/// window title. A GPU rasterizer plugs in by implementing [`RenderBackend`]
/// against the same window.
#[derive(Debug)]
pub struct WindowedBackend {
    title: String,
    window: Option<Arc<Window>>,
    size: (u32, u32),
}

impl WindowedBackend {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            window: None,
            size: (0, 0),
        }
    }

    pub fn attach(&mut self, window: Arc<Window>) {
        let size = window.inner_size();
        self.size = (size.width, size.height);
        self.window = Some(window);
    }

    #[must_use]
    pub fn window(&self) -> Option<&Arc<Window>> {
        self.window.as_ref()
    }
}

impl RenderBackend for WindowedBackend {
    fn resize(&mut self, width: u32, height: u32, _pixel_ratio: f32) -> Result<()> {
        self.size = (width, height);
        Ok(())
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<()> {
        let window = self
            .window
            .as_ref()
            .ok_or_else(|| Error::Render("no window attached".into()))?;

        if frame.frame_index % TITLE_INTERVAL == 0 {
            window.set_title(&format!(
                "{} | {} drawables | {}x{}",
                self.title,
                frame.drawable_nodes().count(),
                self.size.0,
                self.size.1
            ));
        }
        Ok(())
    }
}
