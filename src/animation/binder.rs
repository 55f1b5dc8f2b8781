use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeId, SceneGraph};

pub struct Binder;

impl Binder {
    /// Resolves the clip's tracks to nodes under `root` by node name.
    /// Tracks whose node cannot be found are skipped.
    #[must_use]
    pub fn bind(graph: &SceneGraph, root: NodeId, clip: &AnimationClip) -> Vec<PropertyBinding> {
        let names = graph.name_index(root);
        let mut bindings = Vec::with_capacity(clip.tracks.len());

        for (track_index, track) in clip.tracks.iter().enumerate() {
            match names.get(track.meta.node_name.as_str()) {
                Some(&node) => bindings.push(PropertyBinding {
                    track_index,
                    node,
                    target: track.meta.target,
                }),
                None => log::debug!(
                    "Clip '{}': no node named '{}', track {track_index} left unbound",
                    clip.name,
                    track.meta.node_name
                ),
            }
        }

        bindings
    }
}
