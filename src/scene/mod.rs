//! 场景图系统模块
//!
//! - Node / NodeKind: tagged scene nodes with parent-child links
//! - Transform: TRS with cached matrices
//! - SceneGraph: the node arena
//! - Camera: projection and picking rays
//! - Stage: the shared graph, ground plane and active camera

pub mod bounds;
pub mod camera;
pub mod graph;
pub mod node;
pub mod stage;
pub mod transform;

pub use bounds::{Aabb, Ray};
pub use camera::{Camera, ProjectionType};
pub use graph::SceneGraph;
pub use node::{Material, Node, NodeKind};
pub use stage::{DEFAULT_CAMERA, Stage};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeId;
}
