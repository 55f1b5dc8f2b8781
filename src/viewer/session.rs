use std::collections::VecDeque;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::errors::{Error, Result};
use crate::input::{PointerEvent, SurfaceRect};
use crate::render::FrameView;
use crate::scene::Stage;
use crate::viewer::config::ViewerConfig;
use crate::viewer::context::PlaybackContext;
use crate::viewer::events::{FrameReport, ViewerEvent};
use crate::viewer::loader::{LoadCompletion, LoadQueue, ModelLoader};
use crate::viewer::orchestrator::{InstallRequest, ViewportOrchestrator};
use crate::viewer::timeline::TimelineController;

/// The comparison viewer.
///
/// All state mutation happens inside [`tick`](Self::tick) and the explicit
/// control methods, on one thread. Pointer events are queued and interpreted
/// in arrival order at the start of the next tick; loads complete on any
/// executor and are installed by the tick that sees them.
pub struct Viewer {
    config: ViewerConfig,
    stage: Stage,
    surface: SurfaceRect,
    pixel_ratio: f32,
    timeline: TimelineController,
    orchestrator: ViewportOrchestrator,
    loader: Arc<dyn ModelLoader>,
    loads: LoadQueue,
    pointer_queue: VecDeque<PointerEvent>,
    events: Vec<ViewerEvent>,
    framed: bool,
    frame_index: u64,
}

impl std::fmt::Debug for Viewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer")
            .field("active", &self.orchestrator.active_index())
            .field("contexts", &self.orchestrator.len())
            .field("state", &self.timeline.state())
            .field("frame_index", &self.frame_index)
            .finish_non_exhaustive()
    }
}

impl Viewer {
    pub fn new(config: ViewerConfig, loader: Arc<dyn ModelLoader>) -> Result<Self> {
        config.validate()?;

        let timeline = TimelineController::new(config.playback_speed, config.max_frame_delta)
            .with_playing(config.start_playing);

        Ok(Self {
            config,
            stage: Stage::new(),
            surface: SurfaceRect::default(),
            pixel_ratio: 1.0,
            timeline,
            orchestrator: ViewportOrchestrator::new(),
            loader,
            loads: LoadQueue::new(),
            pointer_queue: VecDeque::new(),
            events: Vec::new(),
            framed: false,
            frame_index: 0,
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    #[must_use]
    pub fn timeline(&self) -> &TimelineController {
        &self.timeline
    }

    #[must_use]
    pub fn orchestrator(&self) -> &ViewportOrchestrator {
        &self.orchestrator
    }

    #[must_use]
    pub fn surface(&self) -> SurfaceRect {
        self.surface
    }

    #[must_use]
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.orchestrator.active_index()
    }

    #[must_use]
    pub fn active(&self) -> Option<&PlaybackContext> {
        self.orchestrator.active()
    }

    #[must_use]
    pub fn context(&self, slot: usize) -> Option<&PlaybackContext> {
        self.orchestrator.context(slot)
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.timeline.is_playing()
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        self.timeline.progress(self.orchestrator.active())
    }

    // === Loading ===

    /// Starts loading `url` into `slot`. The returned future must be driven
    /// to completion by the host (any executor); the result is installed by
    /// the next [`tick`](Self::tick) after it finishes.
    pub fn load(&mut self, slot: usize, url: &str) -> Result<BoxFuture<'static, ()>> {
        let count = self.config.viewports.len();
        if slot >= count {
            return Err(Error::SlotOutOfRange { index: slot, count });
        }
        Ok(self.loads.request(slot, url, &self.loader))
    }

    /// Starts loading every configured viewport from its configured url.
    pub fn load_all(&mut self) -> Vec<BoxFuture<'static, ()>> {
        let urls: Vec<String> = self
            .config
            .viewports
            .iter()
            .map(|v| v.url.clone())
            .collect();
        urls.iter()
            .enumerate()
            .map(|(slot, url)| self.loads.request(slot, url, &self.loader))
            .collect()
    }

    fn install_completed_loads(&mut self) {
        for completion in self.loads.drain() {
            self.install(completion);
        }
    }

    fn install(&mut self, completion: LoadCompletion) {
        let LoadCompletion {
            slot,
            generation,
            url,
            result,
        } = completion;

        if !self.loads.is_current(slot, generation) {
            log::debug!("Discarding stale load of '{url}' for slot {slot} (generation {generation})");
            return;
        }

        let outcome = result.and_then(|model| {
            let viewport = self
                .config
                .viewports
                .get(slot)
                .ok_or(Error::SlotOutOfRange {
                    index: slot,
                    count: self.config.viewports.len(),
                })?;
            let request = InstallRequest {
                slot,
                url: &url,
                frame_range: viewport.frame_range,
                label: &viewport.label,
                frame_rate: self.config.frame_rate,
            };
            let was_active = self.orchestrator.active_index();
            let size = self.orchestrator.install(
                &request,
                model,
                self.timeline.is_playing(),
                &mut self.stage,
            )?;
            Ok((size, was_active))
        });

        match outcome {
            Ok((size, was_active)) => {
                if !self.framed {
                    self.frame_camera(size);
                }
                self.events.push(ViewerEvent::Loaded { slot });
                if was_active.is_none() {
                    self.events.push(ViewerEvent::Activated { slot });
                }
            }
            Err(err) => {
                log::error!("Failed to load slot {slot} from '{url}': {err}");
                self.events.push(ViewerEvent::LoadFailed {
                    slot,
                    message: err.to_string(),
                });
            }
        }
    }

    fn frame_camera(&mut self, size: f32) {
        self.stage.frame(size);
        if let Some(pose) = self.config.camera {
            let (eye, target, up) = pose.eye_target_up();
            self.stage.look_from(eye, target, up);
        }
        self.framed = true;
    }

    // === Input ===

    /// Queues a pointer event for the next tick.
    pub fn push_pointer(&mut self, event: PointerEvent) {
        self.pointer_queue.push_back(event);
    }

    fn process_pointer_queue(&mut self) {
        while let Some(event) = self.pointer_queue.pop_front() {
            let events = self.orchestrator.handle_pointer(
                &event,
                &self.surface,
                &mut self.stage,
                self.timeline.is_playing(),
            );
            self.events.extend(events);
        }
    }

    // === Playback controls ===

    /// Play/pause toggle. Returns the new play state.
    pub fn toggle_playback(&mut self) -> bool {
        if self.timeline.toggle(self.orchestrator.active_mut()) {
            self.events.push(ViewerEvent::PlaybackToggled {
                playing: self.timeline.is_playing(),
            });
        }
        self.timeline.is_playing()
    }

    /// Pauses playback if it is running.
    pub fn pause(&mut self) {
        if self.timeline.pause(self.orchestrator.active_mut()) {
            self.events.push(ViewerEvent::PlaybackToggled { playing: false });
        }
    }

    /// Makes `slot` the active context. Handing activation to another slot
    /// pauses playback; swap-on-click goes through the orchestrator and keeps
    /// the play flag.
    pub fn activate(&mut self, slot: usize) -> Result<bool> {
        if self.orchestrator.context(slot).is_some() && self.active_index() != Some(slot) {
            self.pause();
        }
        let changed =
            self.orchestrator
                .activate(slot, self.timeline.is_playing(), &mut self.stage.graph)?;
        if changed {
            self.events.push(ViewerEvent::Activated { slot });
        }
        Ok(changed)
    }

    /// Seeks the active context to `progress` (0..1) and pauses. A no-op on
    /// an empty clip or before anything is loaded.
    pub fn seek(&mut self, progress: f32) -> Result<()> {
        let was_playing = self.timeline.is_playing();
        match self
            .timeline
            .seek(progress, self.orchestrator.active_mut(), &mut self.stage.graph)
        {
            Err(err) if err.is_silent() => return Ok(()),
            other => other?,
        }
        if was_playing && !self.timeline.is_playing() {
            self.events.push(ViewerEvent::PlaybackToggled { playing: false });
        }
        Ok(())
    }

    /// Progress bar pressed at `progress`.
    pub fn begin_scrub(&mut self, progress: f32) -> Result<()> {
        self.seek(progress)
    }

    /// Progress bar dragged to `progress`.
    pub fn scrub_to(&mut self, progress: f32) -> Result<()> {
        self.seek(progress)
    }

    /// Progress bar released at `progress`. Always leaves playback paused.
    pub fn end_scrub(&mut self, progress: f32) -> Result<()> {
        self.seek(progress)?;
        self.pause();
        Ok(())
    }

    // === Cameras ===

    #[must_use]
    pub fn camera_names(&self) -> Vec<String> {
        self.stage.camera_names()
    }

    pub fn set_camera(&mut self, name: &str) -> bool {
        self.stage.set_camera(name)
    }

    // === Frame ===

    /// Updates the surface box and pixel ratio; projections follow.
    pub fn resize(&mut self, surface: SurfaceRect, pixel_ratio: f32) {
        self.surface = surface;
        if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            self.pixel_ratio = pixel_ratio;
        }
        if !surface.is_empty() {
            self.stage.resize(surface.aspect());
        }
    }

    /// One synchronous pass: install finished loads, interpret queued input,
    /// advance the active timeline by `dt` wall-clock seconds, refresh
    /// matrices.
    pub fn tick(&mut self, dt: f32) -> FrameReport {
        self.install_completed_loads();
        self.process_pointer_queue();

        let dt = self.timeline.tick(
            dt,
            self.orchestrator.active_mut(),
            &mut self.stage.graph,
        );
        self.stage.update();
        self.frame_index += 1;

        FrameReport {
            active: self.orchestrator.active_index(),
            progress: self.progress(),
            is_playing: self.timeline.is_playing(),
            dt,
            events: std::mem::take(&mut self.events),
        }
    }

    /// Snapshot for the render backend.
    #[must_use]
    pub fn frame_view(&self) -> FrameView<'_> {
        FrameView {
            graph: &self.stage.graph,
            camera: self.stage.camera(),
            surface: self.surface,
            pixel_ratio: self.pixel_ratio,
            frame_index: self.frame_index,
        }
    }

    /// Disposes every context and pauses. Pending loads are invalidated.
    pub fn teardown(&mut self) {
        self.timeline.pause(None);
        self.orchestrator.dispose_all(&mut self.stage.graph);
        self.loads = LoadQueue::new();
        self.pointer_queue.clear();
        self.framed = false;
        log::info!("Viewer torn down");
    }
}
