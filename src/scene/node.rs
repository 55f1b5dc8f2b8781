use glam::{Affine3A, Vec3};

use crate::scene::NodeId;
use crate::scene::bounds::Aabb;
use crate::scene::camera::Camera;
use crate::scene::transform::Transform;

/// What a node draws or represents.
///
/// Geometry is kept analytic: meshes are reduced to their local bounds, rings
/// lie flat in the node's local XZ plane, planes are square in local XZ.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Group,
    Mesh { bounds: Aabb },
    Ring { inner_radius: f32, outer_radius: f32 },
    Line { start: Vec3, end: Vec3 },
    Label { text: String },
    Plane { half_extent: f32 },
    Camera(Box<Camera>),
    Light,
}

impl NodeKind {
    /// Kinds that can be hit by a pointer ray.
    #[must_use]
    pub fn is_pickable(&self) -> bool {
        matches!(
            self,
            NodeKind::Mesh { .. } | NodeKind::Ring { .. } | NodeKind::Plane { .. }
        )
    }
}

/// Surface appearance. `visible == false` hides the surface from rendering
/// while the node stays pickable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub visible: bool,
}

impl Material {
    #[must_use]
    pub fn from_hex(hex: u32) -> Self {
        Self {
            color: hex_to_rgb(hex),
            visible: true,
        }
    }

    #[must_use]
    pub fn invisible() -> Self {
        Self {
            color: Vec3::ONE,
            visible: false,
        }
    }
}

#[must_use]
pub fn hex_to_rgb(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
    let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
    let b = (hex & 0xFF) as f32 / 255.0;
    Vec3::new(r, g, b)
}

/// A scene node.
///
/// # Hierarchy
///
/// Nodes form a tree through parent-child relationships. Parents own their
/// children; `parent` is a plain id back-reference. Use the
/// [`SceneGraph`](crate::scene::SceneGraph) methods to keep both sides in sync.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,

    // === Core Hierarchy ===
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,

    pub transform: Transform,
    pub visible: bool,
    pub material: Option<Material>,
}

impl Node {
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: String::new(),
            kind,
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
            material: None,
        }
    }

    #[must_use]
    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_position(&self) -> Vec3 {
        self.transform.world_position()
    }
}
