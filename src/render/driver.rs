//! The shared render loop body.

#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Duration;

use crate::errors::Result;
use crate::render::RenderBackend;
use crate::utils::{FpsCounter, Timer};
use crate::viewer::{FrameReport, Viewer};

/// Runs one viewer tick plus one backend frame per call.
///
/// A failing frame never stops the loop: the error is counted, logged at
/// `error` the first time and at `debug` afterwards, and the next call runs
/// normally.
#[derive(Debug)]
pub struct RenderDriver<B: RenderBackend> {
    backend: B,
    timer: Timer,
    fps: FpsCounter,
    failures: u64,
    surface_size: Option<((u32, u32), f32)>,
}

impl<B: RenderBackend> RenderDriver<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            timer: Timer::new(),
            fps: FpsCounter::new(),
            failures: 0,
            surface_size: None,
        }
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Number of frames that failed to render so far.
    #[must_use]
    pub fn failure_count(&self) -> u64 {
        self.failures
    }

    #[must_use]
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Frame driven by the wall clock.
    pub fn frame(&mut self, viewer: &mut Viewer) -> FrameReport {
        self.timer.tick();
        self.run(viewer)
    }

    /// Frame driven by an explicit delta, in seconds.
    pub fn frame_with_delta(&mut self, viewer: &mut Viewer, dt: f32) -> FrameReport {
        let dt = if dt.is_finite() { dt.clamp(0.0, 3600.0) } else { 0.0 };
        self.timer.advance(Duration::from_secs_f32(dt));
        self.run(viewer)
    }

    fn run(&mut self, viewer: &mut Viewer) -> FrameReport {
        let report = viewer.tick(self.timer.dt_seconds());

        if let Some(fps) = self.fps.update(self.timer.delta) {
            log::debug!("FPS: {fps:.1}");
        }

        if let Err(err) = self.render(viewer) {
            self.failures += 1;
            if self.failures == 1 {
                log::error!("Frame {} failed: {err}", self.timer.frame_count);
            } else {
                log::debug!(
                    "Frame {} failed ({} failures so far): {err}",
                    self.timer.frame_count,
                    self.failures
                );
            }
        }

        report
    }

    fn render(&mut self, viewer: &Viewer) -> Result<()> {
        let view = viewer.frame_view();
        let current = (view.physical_size(), view.pixel_ratio);
        if self.surface_size != Some(current) {
            let ((width, height), ratio) = current;
            self.backend.resize(width, height, ratio)?;
            self.surface_size = Some(current);
        }
        self.backend.render(&view)
    }
}
