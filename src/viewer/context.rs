//! Playback context: one viewport's content, decorations, mixer and clip.

use std::sync::Arc;

use glam::Vec3;
use uuid::Uuid;

use crate::animation::{AnimationClip, AnimationMixer};
use crate::errors::{Error, Result};
use crate::scene::{NodeId, SceneGraph};
use crate::viewer::layout::{Decorations, HANDLE_DRAG_COLOR, HANDLE_IDLE_COLOR};

/// The per-viewport playback unit.
///
/// The context does not own the global play flag; operations that depend on
/// it take `playing` from the [`TimelineController`](crate::viewer::TimelineController).
#[derive(Debug)]
pub struct PlaybackContext {
    id: Uuid,
    slot: usize,
    content: NodeId,
    decorations: Decorations,
    mixer: AnimationMixer,
    clip: Option<Arc<AnimationClip>>,
    is_active: bool,
    size: f32,
    label: String,
}

impl PlaybackContext {
    /// Wraps already-installed scene nodes. The context starts inactive with
    /// its decorations hidden.
    pub fn new(
        slot: usize,
        content: NodeId,
        decorations: Decorations,
        size: f32,
        label: impl Into<String>,
        graph: &mut SceneGraph,
    ) -> Self {
        decorations.set_visible(graph, false);
        Self {
            id: Uuid::new_v4(),
            slot,
            content,
            decorations,
            mixer: AnimationMixer::new(content),
            clip: None,
            is_active: false,
            size,
            label: label.into(),
        }
    }

    /// Unique per installed context; a reload yields a new id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn slot(&self) -> usize {
        self.slot
    }

    #[inline]
    #[must_use]
    pub fn content(&self) -> NodeId {
        self.content
    }

    #[inline]
    #[must_use]
    pub fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn clip(&self) -> Option<&Arc<AnimationClip>> {
        self.clip.as_ref()
    }

    /// Clip duration in seconds, 0 when no clip is set.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.clip.as_ref().map_or(0.0, |c| c.duration)
    }

    /// Accumulated (unwrapped) mixer time.
    #[must_use]
    pub fn mixer_time(&self) -> f32 {
        self.mixer.time()
    }

    /// Replaces the clip, rewinds to 0 and applies the rest pose.
    pub fn set_clip(&mut self, clip: Arc<AnimationClip>, playing: bool, graph: &mut SceneGraph) {
        self.mixer.stop_all();
        let action = self.mixer.clip_action(&clip, graph);
        action.reset();
        action.paused = !playing;
        log::debug!(
            "Slot {}: clip '{}' ({:.3}s, {} bound tracks)",
            self.slot,
            clip.name,
            clip.duration,
            action.bindings.len()
        );
        self.clip = Some(clip);
        self.mixer.set_time(0.0, graph);
    }

    /// Advances the mixer. No-op unless the context is active and playing.
    pub fn advance(&mut self, scaled_dt: f32, playing: bool, graph: &mut SceneGraph) {
        if !self.is_active || !playing || self.duration() <= 0.0 {
            return;
        }
        self.mixer.set_paused(false);
        self.mixer.update(scaled_dt, graph);
    }

    /// Jumps to `progress` (clamped to 0..1) of the clip and applies the pose
    /// immediately. Leaves the actions paused.
    pub fn seek(&mut self, progress: f32, graph: &mut SceneGraph) -> Result<()> {
        let duration = self.duration();
        if duration <= 0.0 {
            return Err(Error::EmptyClip);
        }
        let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        self.mixer.set_paused(true);
        self.mixer.set_time(progress * duration, graph);
        Ok(())
    }

    /// Progress through the current loop, in `0..=1`.
    ///
    /// A positive time sitting exactly on a loop boundary reads as 1, so a
    /// seek to the end reads back as the end.
    #[must_use]
    pub fn progress(&self) -> f32 {
        let duration = self.duration();
        if duration <= 0.0 {
            return 0.0;
        }
        let time = self.mixer.time();
        let wrapped = time.rem_euclid(duration);
        if wrapped == 0.0 && time > 0.0 {
            1.0
        } else {
            wrapped / duration
        }
    }

    /// Mirrors the global play flag onto the mixer's actions.
    pub fn sync_playing(&mut self, playing: bool) {
        self.mixer.set_paused(!playing);
    }

    pub fn activate(&mut self, playing: bool, graph: &mut SceneGraph) {
        self.is_active = true;
        self.decorations.set_visible(graph, true);
        self.sync_playing(playing);
    }

    /// Hides the decorations, pauses and returns to the rest pose.
    pub fn deactivate(&mut self, graph: &mut SceneGraph) {
        self.is_active = false;
        self.decorations.set_visible(graph, false);
        self.decorations.set_handle_color(graph, HANDLE_IDLE_COLOR);
        self.mixer.set_paused(true);
        self.mixer.set_time(0.0, graph);
    }

    #[must_use]
    pub fn position(&self, graph: &SceneGraph) -> Vec3 {
        graph
            .get(self.content)
            .map_or(Vec3::ZERO, |n| n.transform.position)
    }

    /// Moves the content and its decorations together.
    pub fn set_position(&mut self, position: Vec3, graph: &mut SceneGraph) {
        let Some(node) = graph.get_mut(self.content) else {
            return;
        };
        let delta = position - node.transform.position;
        node.transform.position = position;
        self.decorations.translate(graph, delta);
    }

    /// Rotates the content around the vertical axis.
    pub fn rotate_yaw(&mut self, delta: f32, graph: &mut SceneGraph) {
        if let Some(node) = graph.get_mut(self.content) {
            node.transform.rotate_yaw(delta);
        }
    }

    #[must_use]
    pub fn yaw(&self, graph: &SceneGraph) -> f32 {
        graph.get(self.content).map_or(0.0, |n| n.transform.yaw())
    }

    /// Handle center and outer radius, for the next slot's link line.
    #[must_use]
    pub fn link_anchor(&self, graph: &SceneGraph) -> Option<(Vec3, f32)> {
        let center = self.decorations.handle_center(graph)?;
        Some((center, self.decorations.handle_outer_radius))
    }

    /// Points this context's link line at `previous`, see [`Decorations::connect`].
    pub fn connect_link(&mut self, previous: Option<(Vec3, f32)>, graph: &mut SceneGraph) {
        self.decorations.connect(graph, self.slot, previous);
    }

    pub fn set_dragging(&self, dragging: bool, graph: &mut SceneGraph) {
        let color = if dragging {
            HANDLE_DRAG_COLOR
        } else {
            HANDLE_IDLE_COLOR
        };
        self.decorations.set_handle_color(graph, color);
    }

    /// Whether `node` is the content root or lies beneath it.
    #[must_use]
    pub fn owns(&self, node: NodeId, graph: &SceneGraph) -> bool {
        node == self.content || graph.is_ancestor(self.content, node)
    }

    /// Removes the content subtree and the decorations from the graph.
    pub fn dispose(self, graph: &mut SceneGraph) {
        self.decorations.remove(graph);
        let removed = graph.remove_subtree(self.content);
        log::debug!(
            "Slot {}: disposed context {} ({removed} content nodes)",
            self.slot,
            self.id
        );
    }
}
