//! 场景图 (Scene Graph)
//!
//! Arena of [`Node`]s keyed by [`NodeId`]. Parents own their children; a child
//! only stores its parent's id. Every viewport's content, its decorations and
//! the shared ground live in one graph so a single camera and ray caster see
//! all of them.

use glam::Affine3A;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::scene::NodeId;
use crate::scene::bounds::Aabb;
use crate::scene::node::{Node, NodeKind};

#[derive(Debug, Default, Clone)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Node>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Inserts `node` as a new root.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = self.nodes.insert(node);
        self.roots.push(id);
        id
    }

    /// Inserts `node` under `parent`. Falls back to a root when `parent` is gone.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        if !self.nodes.contains_key(parent) {
            log::warn!("Parent node not found, inserting as root");
            return self.add(node);
        }

        node.parent = Some(parent);
        let id = self.nodes.insert(node);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(id);
        }
        id
    }

    /// Re-parents `child` under `parent`, detaching it from its old parent.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) {
        if child == parent || self.is_ancestor(child, parent) {
            log::warn!("Cannot attach a node beneath itself");
            return;
        }
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            log::error!("Node not found during attach");
            return;
        }

        // 1. Detach from old
        self.unlink(child);

        // 2. Attach to new
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    /// Turns `child` into a root node.
    pub fn detach(&mut self, child: NodeId) {
        if !self.nodes.contains_key(child) {
            return;
        }
        self.unlink(child);
        self.roots.push(child);
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = None;
            c.transform.mark_dirty();
        }
    }

    fn unlink(&mut self, id: NodeId) {
        let parent = self.nodes.get(id).and_then(|n| n.parent);
        if let Some(p) = parent {
            if let Some(n) = self.nodes.get_mut(p) {
                n.children.retain(|&c| c != id);
            }
        } else {
            self.roots.retain(|&r| r != id);
        }
    }

    /// Removes `id` and all its descendants. Returns the number of nodes removed.
    pub fn remove_subtree(&mut self, id: NodeId) -> usize {
        if !self.nodes.contains_key(id) {
            return 0;
        }
        self.unlink(id);

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        removed
    }

    /// Depth-first list of `root` and everything beneath it.
    #[must_use]
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(current) {
                out.push(current);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    #[must_use]
    pub fn find_by_name(&self, root: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|&id| self.nodes.get(id).is_some_and(|n| n.name == name))
    }

    /// Name lookup table for the subtree under `root`. The first node in
    /// depth-first order wins on duplicate names.
    #[must_use]
    pub fn name_index(&self, root: NodeId) -> FxHashMap<&str, NodeId> {
        let mut map = FxHashMap::default();
        for id in self.descendants(root) {
            if let Some(node) = self.nodes.get(id)
                && !node.name.is_empty()
            {
                map.entry(node.name.as_str()).or_insert(id);
            }
        }
        map
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.nodes.get(id).and_then(|n| n.parent);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.nodes.get(p).and_then(|n| n.parent);
        }
        false
    }

    /// The topmost ancestor of `id` (itself when it is a root).
    #[must_use]
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(p) = self.nodes.get(current).and_then(|n| n.parent) {
            current = p;
        }
        current
    }

    /// A node counts as visible only when it and every ancestor are.
    #[must_use]
    pub fn is_visible_in_hierarchy(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            match self.nodes.get(c) {
                Some(node) if node.visible => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.visible = visible;
        }
    }

    /// Recomputes world matrices, parents first. A subtree is only touched when
    /// its own transform or an ancestor's changed.
    pub fn update_world_matrices(&mut self) {
        let mut stack: Vec<(NodeId, Affine3A, bool)> = self
            .roots
            .iter()
            .rev()
            .map(|&r| (r, Affine3A::IDENTITY, false))
            .collect();

        while let Some((id, parent_world, parent_changed)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };

            let local_changed = node.transform.update_local_matrix();
            let changed = local_changed || parent_changed;
            if changed {
                let world = parent_world * node.transform.local_matrix;
                node.transform.set_world_matrix(world);
            }

            let world = node.transform.world_matrix;
            stack.extend(node.children.iter().rev().map(|&c| (c, world, changed)));
        }
    }

    /// World-space bounds of all meshes under `root`. World matrices must be
    /// current.
    #[must_use]
    pub fn world_bounds(&self, root: NodeId) -> Option<Aabb> {
        self.descendants(root)
            .into_iter()
            .filter_map(|id| {
                let node = self.nodes.get(id)?;
                match &node.kind {
                    NodeKind::Mesh { bounds } => Some(bounds.transform(node.world_matrix())),
                    _ => None,
                }
            })
            .reduce(|a, b| a.union(&b))
    }

    /// Moves every node of `other` into this graph. Its roots are placed under
    /// `parent`, or become roots here when `parent` is `None`. Returns the new
    /// ids of `other`'s roots.
    pub fn import(&mut self, other: SceneGraph, parent: Option<NodeId>) -> Vec<NodeId> {
        let SceneGraph {
            nodes: mut other_nodes,
            roots: other_roots,
        } = other;

        // 1. 先插入所有节点，记录新旧映射
        let mut remap: FxHashMap<NodeId, NodeId> = FxHashMap::default();
        let mut pending = Vec::with_capacity(other_nodes.len());
        for (old_id, mut node) in other_nodes.drain() {
            let old_parent = node.parent.take();
            let old_children = std::mem::take(&mut node.children);
            node.transform.mark_dirty();
            let new_id = self.nodes.insert(node);
            remap.insert(old_id, new_id);
            pending.push((new_id, old_parent, old_children));
        }

        // 2. 再修复父子关系
        for (new_id, old_parent, old_children) in pending {
            let new_parent = old_parent.and_then(|p| remap.get(&p).copied());
            let new_children: Vec<NodeId> = old_children
                .iter()
                .filter_map(|c| remap.get(c).copied())
                .collect();
            if let Some(node) = self.nodes.get_mut(new_id) {
                node.parent = new_parent;
                node.children = new_children;
            }
        }

        let new_roots: Vec<NodeId> = other_roots
            .iter()
            .filter_map(|r| remap.get(r).copied())
            .collect();

        for &root in &new_roots {
            match parent {
                Some(p) if self.nodes.contains_key(p) => {
                    if let Some(pn) = self.nodes.get_mut(p) {
                        pn.children.push(root);
                    }
                    if let Some(n) = self.nodes.get_mut(root) {
                        n.parent = Some(p);
                    }
                }
                _ => self.roots.push(root),
            }
        }

        new_roots
    }
}
