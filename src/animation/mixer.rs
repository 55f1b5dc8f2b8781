use std::sync::Arc;

use glam::Vec3;

use crate::animation::action::{AnimationAction, TrackValue};
use crate::animation::binder::Binder;
use crate::animation::binding::TargetPath;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeId, SceneGraph};

/// Evaluates the actions bound to one content root and writes the sampled
/// pose into the scene graph.
#[derive(Debug, Clone)]
pub struct AnimationMixer {
    root: NodeId,
    actions: Vec<AnimationAction>,
    time: f32,
}

impl AnimationMixer {
    #[must_use]
    pub fn new(root: NodeId) -> Self {
        Self {
            root,
            actions: Vec::new(),
            time: 0.0,
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Accumulated mixer time. Never wrapped.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[must_use]
    pub fn actions(&self) -> &[AnimationAction] {
        &self.actions
    }

    /// Returns the action for `clip`, creating and binding it on first use.
    pub fn clip_action(
        &mut self,
        clip: &Arc<AnimationClip>,
        graph: &SceneGraph,
    ) -> &mut AnimationAction {
        let index = match self
            .actions
            .iter()
            .position(|a| Arc::ptr_eq(a.clip(), clip))
        {
            Some(index) => index,
            None => {
                let mut action = AnimationAction::new(Arc::clone(clip));
                action.bindings = Binder::bind(graph, self.root, clip);
                self.actions.push(action);
                self.actions.len() - 1
            }
        };
        &mut self.actions[index]
    }

    /// Drops every action and rewinds the mixer clock.
    pub fn stop_all(&mut self) {
        self.actions.clear();
        self.time = 0.0;
    }

    pub fn set_paused(&mut self, paused: bool) {
        for action in &mut self.actions {
            action.paused = paused;
        }
    }

    /// Jumps every action to `time` and applies the pose immediately.
    pub fn set_time(&mut self, time: f32, graph: &mut SceneGraph) {
        self.time = time;
        for action in &mut self.actions {
            action.time = time;
        }
        self.apply(graph);
    }

    /// Advances by `dt` and applies the pose.
    pub fn update(&mut self, dt: f32, graph: &mut SceneGraph) {
        self.time += dt;
        for action in &mut self.actions {
            action.update(dt);
        }
        self.apply(graph);
    }

    /// Writes the current pose of every action. Paused actions are applied
    /// too, so a seek while paused is visible.
    pub fn apply(&mut self, graph: &mut SceneGraph) {
        for action in &mut self.actions {
            for i in 0..action.bindings.len() {
                let binding = action.bindings[i];
                let Some(value) = action.sample_track(binding.track_index) else {
                    continue;
                };
                let Some(node) = graph.get_mut(binding.node) else {
                    continue;
                };

                match (value, binding.target) {
                    (TrackValue::Vector3(v), TargetPath::Translation) => {
                        node.transform.position = v;
                    }
                    (TrackValue::Vector3(v), TargetPath::Scale) => node.transform.scale = v,
                    (TrackValue::Quaternion(q), TargetPath::Rotation) => {
                        node.transform.rotation = q.normalize();
                    }
                    (TrackValue::Scalar(s), TargetPath::UniformScale) => {
                        node.transform.scale = Vec3::splat(s);
                    }
                    _ => {}
                }
            }
        }
    }
}
