//! Slot layout and per-context decorations (rotation handle, link line, label).

use glam::Vec3;
use smallvec::SmallVec;

use crate::scene::{Material, Node, NodeId, NodeKind, SceneGraph};

pub const HANDLE_IDLE_COLOR: u32 = 0xC5_9C_F4;
pub const HANDLE_DRAG_COLOR: u32 = 0x00_FF_00;

/// Slot spacing as a multiple of the layout unit.
pub const SLOT_SPACING: f32 = 1.3;

/// Horizontal placement of `slot` for a layout unit of `unit`.
#[must_use]
pub fn slot_origin(slot: usize, unit: f32) -> Vec3 {
    Vec3::new(slot as f32 * unit * SLOT_SPACING, 0.0, 0.0)
}

/// `(inner, outer)` ring radii for a content of `size`.
#[must_use]
pub fn handle_radii(slot: usize, size: f32) -> (f32, f32) {
    if slot == 0 {
        (size * 0.25, size * 0.28)
    } else {
        (size * 0.15, size * 0.18)
    }
}

/// Auxiliary markers owned by one playback context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decorations {
    pub handle: NodeId,
    pub link: Option<NodeId>,
    pub label: NodeId,
    pub handle_outer_radius: f32,
}

impl Decorations {
    /// Builds the markers for a content sitting at `anchor` (its ground point).
    /// The link line is added later by [`connect`](Self::connect), once the
    /// previous slot is known.
    pub fn build(
        graph: &mut SceneGraph,
        content: NodeId,
        slot: usize,
        anchor: Vec3,
        size: f32,
        label: &str,
    ) -> Self {
        let (inner, outer) = handle_radii(slot, size);
        let ground_anchor = Vec3::new(anchor.x, 0.0, anchor.z);

        let handle = graph.add(
            Node::new(NodeKind::Ring {
                inner_radius: inner,
                outer_radius: outer,
            })
            .with_name(format!("handle_{slot}"))
            .with_position(ground_anchor)
            .with_material(Material::from_hex(HANDLE_IDLE_COLOR)),
        );

        let label = graph.add_child(
            content,
            Node::new(NodeKind::Label {
                text: label.to_string(),
            })
            .with_name(format!("label_{slot}"))
            .with_position(Vec3::new(-1.0, 0.0, 0.0)),
        );

        Self {
            handle,
            link: None,
            label,
            handle_outer_radius: outer,
        }
    }

    #[must_use]
    pub fn ids(&self) -> SmallVec<[NodeId; 3]> {
        let mut ids = SmallVec::new();
        ids.push(self.handle);
        ids.extend(self.link);
        ids.push(self.label);
        ids
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.ids().contains(&id)
    }

    pub fn set_visible(&self, graph: &mut SceneGraph, visible: bool) {
        for id in self.ids() {
            graph.set_visible(id, visible);
        }
    }

    /// Ground-level center of the rotation handle.
    #[must_use]
    pub fn handle_center(&self, graph: &SceneGraph) -> Option<Vec3> {
        graph.get(self.handle).map(|n| n.transform.position)
    }

    /// Moves the handle by `delta`. The label follows its content; the link
    /// is re-pointed by [`connect`](Self::connect).
    pub fn translate(&self, graph: &mut SceneGraph, delta: Vec3) {
        if let Some(node) = graph.get_mut(self.handle) {
            node.transform.position += delta;
        }
    }

    /// Points the link line from `previous` (handle center and outer radius
    /// of the previous slot) to this handle, creating the line on first use.
    /// `None` removes the line. A new line takes the handle's visibility.
    pub fn connect(&mut self, graph: &mut SceneGraph, slot: usize, previous: Option<(Vec3, f32)>) {
        let (Some((prev_center, prev_outer)), Some(center)) = (previous, self.handle_center(graph))
        else {
            if let Some(link) = self.link.take() {
                graph.remove_subtree(link);
            }
            return;
        };

        let dir = (center - prev_center).normalize_or(Vec3::X);
        let line = NodeKind::Line {
            start: prev_center + dir * prev_outer,
            end: center - dir * self.handle_outer_radius,
        };

        if let Some(node) = self.link.and_then(|id| graph.get_mut(id)) {
            node.kind = line;
            return;
        }
        let visible = graph.get(self.handle).is_some_and(|n| n.visible);
        let mut node = Node::new(line)
            .with_name(format!("link_{slot}"))
            .with_material(Material::from_hex(HANDLE_IDLE_COLOR));
        node.visible = visible;
        self.link = Some(graph.add(node));
    }

    pub fn set_handle_color(&self, graph: &mut SceneGraph, hex: u32) {
        if let Some(node) = graph.get_mut(self.handle) {
            node.material = Some(Material::from_hex(hex));
        }
    }

    /// Removes the root-level markers. The label goes with its content.
    pub fn remove(&self, graph: &mut SceneGraph) {
        graph.remove_subtree(self.handle);
        if let Some(link) = self.link {
            graph.remove_subtree(link);
        }
    }
}
