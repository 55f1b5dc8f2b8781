//! Winit-based runner
//!
//! Opens a window, feeds its events to a [`Viewer`] and drives one
//! [`RenderDriver`] frame per `RedrawRequested`.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use myth_compare::app::winit::App;
//! use myth_compare::viewer::{Viewer, ViewerConfig};
//!
//! fn main() -> myth_compare::errors::Result<()> {
//!     let config = ViewerConfig::from_json_file("compare.json")?;
//!     let viewer = Viewer::new(config, Arc::new(MyGltfLoader::default()))?;
//!     App::new().with_title("Motion compare").run(viewer)
//! }
//! ```

use std::sync::Arc;

use tokio::runtime::Runtime;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
pub use winit::window::{Window, WindowId};

use crate::errors::{Error, Result};
use crate::input::SurfaceRect;
use crate::render::{RenderDriver, WindowedBackend};
use crate::scene::DEFAULT_CAMERA;
use crate::viewer::{Viewer, ViewerEvent};

pub mod input_adapter;

use input_adapter::{KeyCommand, PointerTracker, translate_key};

/// Application builder.
pub struct App {
    title: String,
    width: f64,
    height: f64,
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: "Myth Compare".into(),
            width: 1280.0,
            height: 720.0,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Starts every configured load, then runs the event loop until the
    /// window closes.
    pub fn run(self, mut viewer: Viewer) -> Result<()> {
        let _ = env_logger::try_init();

        let loads = load_runtime()?;
        for load in viewer.load_all() {
            loads.spawn(load);
        }

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut runner = AppRunner {
            driver: RenderDriver::new(WindowedBackend::new(self.title.clone())),
            app: self,
            window: None,
            viewer,
            pointer: PointerTracker::new(1.0),
            _loads: loads,
        };
        event_loop.run_app(&mut runner).map_err(Error::from)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Runtime for model loads. Loads run off the event-loop thread; their
/// results come back through the viewer's completion channel.
fn load_runtime() -> Result<Runtime> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("myth-compare-loader")
        .enable_all()
        .build()?;
    Ok(runtime)
}

struct AppRunner {
    app: App,
    window: Option<Arc<Window>>,
    viewer: Viewer,
    driver: RenderDriver<WindowedBackend>,
    pointer: PointerTracker,
    _loads: Runtime,
}

impl AppRunner {
    fn sync_surface(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let scale_factor = window.scale_factor();
        let logical = window.inner_size().to_logical::<f32>(scale_factor);
        self.viewer.resize(
            SurfaceRect::from_size(logical.width, logical.height),
            scale_factor as f32,
        );
        self.pointer.set_scale_factor(scale_factor);
    }

    fn handle_key(&mut self, command: KeyCommand) {
        match command {
            KeyCommand::TogglePlayback => {
                self.viewer.toggle_playback();
            }
            KeyCommand::Activate(slot) => {
                if let Err(err) = self.viewer.activate(slot) {
                    log::debug!("{err}");
                }
            }
            KeyCommand::NextCamera => {
                let names = self.viewer.camera_names();
                let current = self.viewer.stage().active_camera_name();
                let next = names
                    .iter()
                    .position(|n| *n == current)
                    .map_or(0, |i| (i + 1) % names.len());
                let name = names.get(next).map_or(DEFAULT_CAMERA, String::as_str);
                self.viewer.set_camera(name);
            }
        }
    }

    fn redraw(&mut self) {
        let report = self.driver.frame(&mut self.viewer);
        for event in &report.events {
            match event {
                ViewerEvent::LoadFailed { slot, message } => {
                    log::warn!("Viewport {slot} could not be loaded: {message}");
                }
                other => log::info!("{other:?}"),
            }
        }
    }
}

impl ApplicationHandler for AppRunner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(&self.app.title)
            .with_inner_size(winit::dpi::LogicalSize::new(self.app.width, self.app.height));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        self.driver.backend_mut().attach(Arc::clone(&window));
        self.window = Some(window);
        self.sync_surface();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        for pointer_event in self.pointer.translate(&event) {
            self.viewer.push_pointer(pointer_event);
        }

        match event {
            WindowEvent::CloseRequested => {
                self.viewer.teardown();
                event_loop.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                self.sync_surface();
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state.is_pressed() && !event.repeat =>
            {
                if let Some(command) = translate_key(event.physical_key) {
                    self.handle_key(command);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
