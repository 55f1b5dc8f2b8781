//! Global clock and the Playing/Paused state machine.

use crate::errors::{Error, Result};
use crate::scene::SceneGraph;
use crate::viewer::config::{DEFAULT_MAX_FRAME_DELTA, DEFAULT_PLAYBACK_SPEED};
use crate::viewer::context::PlaybackContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Playing,
    Paused,
}

/// One play flag shared by every context; only the active context advances.
#[derive(Debug, Clone)]
pub struct TimelineController {
    state: PlayState,
    playback_speed: f32,
    max_frame_delta: f32,
}

impl Default for TimelineController {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYBACK_SPEED, DEFAULT_MAX_FRAME_DELTA)
    }
}

impl TimelineController {
    #[must_use]
    pub fn new(playback_speed: f32, max_frame_delta: f32) -> Self {
        Self {
            state: PlayState::Paused,
            playback_speed,
            max_frame_delta,
        }
    }

    /// Initial state, before any context exists.
    #[must_use]
    pub fn with_playing(mut self, playing: bool) -> Self {
        self.state = if playing {
            PlayState::Playing
        } else {
            PlayState::Paused
        };
        self
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> PlayState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    #[inline]
    #[must_use]
    pub fn playback_speed(&self) -> f32 {
        self.playback_speed
    }

    pub fn set_playback_speed(&mut self, speed: f32) -> Result<()> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "playback speed must be positive, got {speed}"
            )));
        }
        self.playback_speed = speed;
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn max_frame_delta(&self) -> f32 {
        self.max_frame_delta
    }

    /// Clamps a wall-clock delta into `[0, max_frame_delta]`.
    #[must_use]
    pub fn clamp_delta(&self, dt: f32) -> f32 {
        if dt.is_nan() {
            return 0.0;
        }
        dt.clamp(0.0, self.max_frame_delta)
    }

    /// User toggle. No-op (returns `false`) when there is no active context
    /// or its clip is empty. Returns whether the state changed.
    pub fn toggle(&mut self, active: Option<&mut PlaybackContext>) -> bool {
        let Some(ctx) = active else {
            return false;
        };
        if ctx.duration() <= 0.0 {
            log::debug!("Ignoring play toggle on an empty clip");
            return false;
        }

        self.state = match self.state {
            PlayState::Playing => PlayState::Paused,
            PlayState::Paused => PlayState::Playing,
        };
        ctx.sync_playing(self.is_playing());
        log::debug!("Playback {:?}", self.state);
        true
    }

    /// Forces the paused state. Returns whether the state changed.
    pub fn pause(&mut self, active: Option<&mut PlaybackContext>) -> bool {
        if let Some(ctx) = active {
            ctx.sync_playing(false);
        }
        let changed = self.state == PlayState::Playing;
        self.state = PlayState::Paused;
        changed
    }

    /// Advances the active context by the clamped, speed-scaled delta.
    /// Returns the clamped wall-clock delta.
    pub fn tick(
        &mut self,
        dt: f32,
        active: Option<&mut PlaybackContext>,
        graph: &mut SceneGraph,
    ) -> f32 {
        let dt = self.clamp_delta(dt);
        if let Some(ctx) = active {
            ctx.advance(dt * self.playback_speed, self.is_playing(), graph);
        }
        dt
    }

    /// Seeks the active context and pauses playback.
    ///
    /// An empty clip yields [`Error::EmptyClip`], which callers drop silently.
    pub fn seek(
        &mut self,
        progress: f32,
        active: Option<&mut PlaybackContext>,
        graph: &mut SceneGraph,
    ) -> Result<()> {
        let Some(ctx) = active else {
            return Ok(());
        };
        ctx.seek(progress, graph)?;
        self.state = PlayState::Paused;
        Ok(())
    }

    /// Progress of the active context, 0 when there is none.
    #[must_use]
    pub fn progress(&self, active: Option<&PlaybackContext>) -> f32 {
        active.map_or(0.0, PlaybackContext::progress)
    }
}
