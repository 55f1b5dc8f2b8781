use crate::scene::NodeId;

/// Defines the target property for animation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPath {
    Translation,  // Maps to transform.position
    Rotation,     // Maps to transform.rotation
    Scale,        // Maps to transform.scale
    UniformScale, // Scalar track, splatted into transform.scale
}

/// Binding relationship: maps track `track_index` from a clip to the target
/// property of `node` in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub node: NodeId,
    pub target: TargetPath,
}
