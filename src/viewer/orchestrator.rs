//! Viewport orchestration
//!
//! Owns the playback contexts (one per slot), the active index and the
//! pointer gesture state machine:
//!
//! ```text
//!   Idle ──down on active handle──▶ Dragging ──up / context deactivated──▶ Idle
//! ```
//!
//! Pointer events are only interpreted once at least one context exists.

use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::sync::Arc;

use glam::{Quat, Vec3};
use smallvec::SmallVec;

use crate::animation::{AnimationClip, extract_clamped};
use crate::errors::{Error, Result};
use crate::input::{PointerEvent, PointerKind, PointerResolver, SurfaceRect};
use crate::scene::{Node, NodeId, SceneGraph, Stage};
use crate::viewer::context::PlaybackContext;
use crate::viewer::events::ViewerEvent;
use crate::viewer::layout::{Decorations, slot_origin};
use crate::viewer::loader::LoadedModel;

/// Pointer gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging { slot: usize, previous_angle: f32 },
}

/// Parameters for installing one slot.
#[derive(Debug, Clone)]
pub struct InstallRequest<'a> {
    pub slot: usize,
    pub url: &'a str,
    pub frame_range: Option<[u32; 2]>,
    pub label: &'a str,
    pub frame_rate: f32,
}

#[derive(Debug, Default)]
pub struct ViewportOrchestrator {
    contexts: Vec<Option<PlaybackContext>>,
    active: Option<usize>,
    gesture: Gesture,
    selection: Option<usize>,
    layout_unit: Option<f32>,
}

impl ViewportOrchestrator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of installed contexts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.iter().flatten().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    #[must_use]
    pub fn active(&self) -> Option<&PlaybackContext> {
        self.context(self.active?)
    }

    pub fn active_mut(&mut self) -> Option<&mut PlaybackContext> {
        let index = self.active?;
        self.context_mut(index)
    }

    #[must_use]
    pub fn context(&self, slot: usize) -> Option<&PlaybackContext> {
        self.contexts.get(slot)?.as_ref()
    }

    pub fn context_mut(&mut self, slot: usize) -> Option<&mut PlaybackContext> {
        self.contexts.get_mut(slot)?.as_mut()
    }

    pub fn contexts(&self) -> impl Iterator<Item = &PlaybackContext> {
        self.contexts.iter().flatten()
    }

    #[inline]
    #[must_use]
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Slot picked by the last pointer-down that missed every handle.
    #[inline]
    #[must_use]
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// Builds a context from `model` and installs it into `request.slot`,
    /// replacing any previous one.
    ///
    /// Everything fallible runs before the stage is touched, so on error the
    /// slot keeps its previous state. Returns the content size.
    pub fn install(
        &mut self,
        request: &InstallRequest<'_>,
        model: LoadedModel,
        playing: bool,
        stage: &mut Stage,
    ) -> Result<f32> {
        let clip = select_clip(request, &model.clips)?;
        let slot = request.slot;

        // 1. 构建节点: wrapper (slot position, yaw) -> pivot (centering) -> content
        let graph = &mut stage.graph;
        let wrapper = graph.add(Node::group().with_name(format!("content_{slot}")));
        let pivot = graph.add_child(wrapper, Node::group().with_name(format!("pivot_{slot}")));
        graph.import(model.scene, Some(pivot));
        graph.update_world_matrices();

        let (size, offset) = match graph.world_bounds(wrapper) {
            Some(bounds) if bounds.diagonal() > 0.0 => {
                let center = bounds.center();
                (bounds.diagonal(), Vec3::new(-center.x, -bounds.min.y, -center.z))
            }
            _ => {
                log::warn!("Slot {slot}: content has no measurable bounds, assuming unit size");
                (1.0, Vec3::ZERO)
            }
        };
        if let Some(node) = graph.get_mut(pivot) {
            node.transform.position = offset;
        }

        let unit = *self.layout_unit.get_or_insert(size);
        let position = slot_origin(slot, unit);
        if let Some(node) = graph.get_mut(wrapper) {
            node.transform.position = position;
            node.transform.rotation = Quat::from_rotation_y(-FRAC_PI_2);
        }

        let decorations = Decorations::build(graph, wrapper, slot, position, size, request.label);

        stage.register_cameras(wrapper);

        // 2. 替换旧的 context
        if self.contexts.len() <= slot {
            self.contexts.resize_with(slot + 1, || None);
        }
        if let Some(old) = self.contexts[slot].take() {
            log::info!("Slot {slot}: replacing previous content");
            if matches!(self.gesture, Gesture::Dragging { slot: s, .. } if s == slot) {
                self.gesture = Gesture::Idle;
            }
            old.dispose(&mut stage.graph);
        }

        let mut ctx = PlaybackContext::new(
            slot,
            wrapper,
            decorations,
            size,
            request.label,
            &mut stage.graph,
        );
        ctx.set_clip(Arc::new(clip), playing, &mut stage.graph);

        let becomes_active = self.active.is_none_or(|a| a == slot);
        if becomes_active {
            ctx.activate(playing, &mut stage.graph);
            self.active = Some(slot);
        }
        self.contexts[slot] = Some(ctx);
        self.relink(&mut stage.graph);

        log::info!(
            "Slot {slot}: installed '{}' (size {size:.3}, active: {becomes_active})",
            request.url
        );
        Ok(size)
    }

    /// Hands activation to `index`. No-op when it is already active.
    /// Returns whether the active context changed.
    pub fn activate(&mut self, index: usize, playing: bool, graph: &mut SceneGraph) -> Result<bool> {
        if self.context(index).is_none() {
            return Err(Error::SlotOutOfRange {
                index,
                count: self.contexts.len(),
            });
        }
        if self.active == Some(index) {
            return Ok(false);
        }

        if let Some(previous) = self.active
            && let Some(ctx) = self.context_mut(previous)
        {
            ctx.deactivate(graph);
        }
        self.end_drag(graph);
        self.active = Some(index);
        if let Some(ctx) = self.context_mut(index) {
            ctx.activate(playing, graph);
        }

        log::debug!("Activated slot {index}");
        Ok(true)
    }

    /// Exchanges the ground position of `index` and the active context.
    /// Rotation and clip stay with each context.
    pub fn swap_with_active(&mut self, index: usize, graph: &mut SceneGraph) -> Result<()> {
        let Some(active) = self.active else {
            return Ok(());
        };
        let (Some(a), Some(b)) = (self.context(active), self.context(index)) else {
            return Err(Error::SlotOutOfRange {
                index,
                count: self.contexts.len(),
            });
        };
        let pa = a.position(graph);
        let pb = b.position(graph);

        if let Some(ctx) = self.context_mut(active) {
            ctx.set_position(Vec3::new(pb.x, pa.y, pb.z), graph);
        }
        if let Some(ctx) = self.context_mut(index) {
            ctx.set_position(Vec3::new(pa.x, pb.y, pa.z), graph);
        }
        self.relink(graph);
        Ok(())
    }

    /// Re-points every link line from the previous slot's handle to its own.
    fn relink(&mut self, graph: &mut SceneGraph) {
        for slot in 1..self.contexts.len() {
            let previous = match self.context(slot - 1) {
                Some(ctx) => ctx.link_anchor(graph),
                None => None,
            };
            if let Some(ctx) = self.context_mut(slot) {
                ctx.connect_link(previous, graph);
            }
        }
    }

    /// Context whose content position is closest to `x` along world X.
    #[must_use]
    pub fn nearest_by_x(&self, x: f32, graph: &SceneGraph) -> Option<usize> {
        self.contexts
            .iter()
            .flatten()
            .map(|ctx| (ctx.slot(), (ctx.position(graph).x - x).abs()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(slot, _)| slot)
    }

    /// Context whose content contains `node`.
    #[must_use]
    pub fn owner_of(&self, node: NodeId, graph: &SceneGraph) -> Option<usize> {
        self.contexts
            .iter()
            .flatten()
            .find(|ctx| ctx.owns(node, graph))
            .map(PlaybackContext::slot)
    }

    fn handle_owner(&self, node: NodeId) -> Option<usize> {
        self.contexts
            .iter()
            .flatten()
            .find(|ctx| ctx.decorations().handle == node)
            .map(PlaybackContext::slot)
    }

    fn is_decoration(&self, node: NodeId) -> bool {
        self.contexts
            .iter()
            .flatten()
            .any(|ctx| ctx.decorations().contains(node))
    }

    /// Interprets one queued pointer event.
    pub fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        surface: &SurfaceRect,
        stage: &mut Stage,
        playing: bool,
    ) -> SmallVec<[ViewerEvent; 2]> {
        let mut events = SmallVec::new();
        let Some(active) = self.active else {
            return events;
        };

        if event.kind == PointerKind::Up {
            self.end_drag(&mut stage.graph);
            return events;
        }
        if event.kind == PointerKind::Move && self.gesture == Gesture::Idle {
            return events;
        }

        stage.update();
        let Some(hit) = PointerResolver::resolve(event, surface, stage.camera(), &stage.graph)
        else {
            return events;
        };
        let graph = &mut stage.graph;

        match event.kind {
            PointerKind::Down => {
                if let Some(slot) = self.handle_owner(hit.node)
                    && let Some(ctx) = self.context(slot)
                    && ctx.is_active()
                {
                    ctx.set_dragging(true, graph);
                    let previous_angle = bearing(ctx.position(graph), hit.point);
                    self.gesture = Gesture::Dragging {
                        slot,
                        previous_angle,
                    };
                    log::trace!("Rotation drag started on slot {slot}");
                } else {
                    self.selection = self.nearest_by_x(hit.point.x, graph);
                }
            }
            PointerKind::Move => {
                let Gesture::Dragging {
                    slot,
                    previous_angle,
                } = self.gesture
                else {
                    return events;
                };
                let Some(ctx) = self.context_mut(slot).filter(|c| c.is_active()) else {
                    log::debug!("Dropping rotation drag on inactive slot {slot}");
                    self.gesture = Gesture::Idle;
                    return events;
                };

                let angle = bearing(ctx.position(graph), hit.point);
                ctx.rotate_yaw(-wrap_angle(angle - previous_angle), graph);
                self.gesture = Gesture::Dragging {
                    slot,
                    previous_angle: angle,
                };
            }
            PointerKind::Click => {
                if hit.node == stage.ground() || self.is_decoration(hit.node) {
                    return events;
                }
                let graph = &mut stage.graph;
                let target = self
                    .owner_of(hit.node, graph)
                    .or_else(|| self.nearest_by_x(hit.point.x, graph));
                let Some(target) = target.filter(|&t| t != active) else {
                    return events;
                };

                if let Err(err) = self.swap_with_active(target, graph) {
                    log::warn!("Swap failed: {err}");
                    return events;
                }
                if matches!(self.activate(target, playing, graph), Ok(true)) {
                    events.push(ViewerEvent::Swapped {
                        from: active,
                        to: target,
                    });
                    events.push(ViewerEvent::Activated { slot: target });
                }
            }
            PointerKind::Up => {}
        }

        events
    }

    fn end_drag(&mut self, graph: &mut SceneGraph) {
        if let Gesture::Dragging { slot, .. } = self.gesture {
            if let Some(ctx) = self.context(slot) {
                ctx.set_dragging(false, graph);
            }
            log::trace!("Rotation drag ended on slot {slot}");
        }
        self.gesture = Gesture::Idle;
    }

    /// Removes every context from the graph.
    pub fn dispose_all(&mut self, graph: &mut SceneGraph) {
        for ctx in self.contexts.drain(..).flatten() {
            ctx.dispose(graph);
        }
        self.active = None;
        self.gesture = Gesture::Idle;
        self.selection = None;
        self.layout_unit = None;
    }
}

/// Clip for `request`: the first clip of the model, cut to the configured
/// frame range. A range past the clip asserts in debug builds and is clamped
/// otherwise. A zero-length clip is installed as is; playback controls
/// ignore it.
fn select_clip(request: &InstallRequest<'_>, clips: &[AnimationClip]) -> Result<AnimationClip> {
    let master = clips
        .first()
        .ok_or_else(|| Error::NoClips(request.url.to_string()))?;
    if master.is_empty() {
        log::warn!(
            "Asset '{}': clip '{}' has zero duration, playback disabled",
            request.url,
            master.name
        );
        return Ok(master.clone());
    }
    match request.frame_range {
        Some([start, end]) => {
            debug_assert!(
                start < end && end <= master.frame_count(request.frame_rate),
                "frame range [{start}, {end}) does not fit clip '{}' of '{}'",
                master.name,
                request.url
            );
            extract_clamped(master, start, end, request.frame_rate)
        }
        None => Ok(master.clone()),
    }
}

/// Bearing of `point` around `center` in the ground plane.
fn bearing(center: Vec3, point: Vec3) -> f32 {
    (point.z - center.z).atan2(point.x - center.x)
}

/// Folds an angle difference into `(-PI, PI]`.
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}
