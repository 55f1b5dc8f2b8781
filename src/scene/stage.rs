//! The shared stage: one scene graph, one ground plane and the camera set.

use glam::Vec3;

use crate::scene::camera::Camera;
use crate::scene::graph::SceneGraph;
use crate::scene::node::{Material, Node, NodeKind};
use crate::scene::NodeId;

/// Name under which the built-in camera is listed.
pub const DEFAULT_CAMERA: &str = "[default]";

const GROUND_HALF_EXTENT: f32 = 1.0e4;
/// The ground sits this far below y = 0 so handles lying on the floor win ray ties.
const GROUND_DEPTH: f32 = 1.0e-3;

#[derive(Debug)]
pub struct Stage {
    pub graph: SceneGraph,
    default_camera: Camera,
    active_camera: Option<NodeId>,
    ground: NodeId,
    unnamed_cameras: usize,
}

impl Stage {
    #[must_use]
    pub fn new() -> Self {
        let mut graph = SceneGraph::new();
        let ground = graph.add(
            Node::new(NodeKind::Plane {
                half_extent: GROUND_HALF_EXTENT,
            })
            .with_name("ground")
            .with_position(Vec3::new(0.0, -GROUND_DEPTH, 0.0))
            .with_material(Material::invisible()),
        );

        let mut default_camera =
            Camera::new_perspective(60.0, 1.0, 0.01, 1000.0).with_name(DEFAULT_CAMERA);
        default_camera.look_from(Vec3::new(0.0, 1.0, 5.0), Vec3::ZERO, Vec3::Y);

        Self {
            graph,
            default_camera,
            active_camera: None,
            ground,
            unnamed_cameras: 0,
        }
    }

    /// The invisible pick catcher just below y = 0.
    #[inline]
    #[must_use]
    pub fn ground(&self) -> NodeId {
        self.ground
    }

    /// The camera used for both rendering and picking.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        self.active_camera
            .and_then(|id| match &self.graph.get(id)?.kind {
                NodeKind::Camera(camera) => Some(camera.as_ref()),
                _ => None,
            })
            .unwrap_or(&self.default_camera)
    }

    #[must_use]
    pub fn default_camera(&self) -> &Camera {
        &self.default_camera
    }

    pub fn default_camera_mut(&mut self) -> &mut Camera {
        &mut self.default_camera
    }

    #[must_use]
    pub fn active_camera_name(&self) -> String {
        self.camera().name.to_string()
    }

    /// `[default]` followed by every camera found in loaded content.
    #[must_use]
    pub fn camera_names(&self) -> Vec<String> {
        let mut names = vec![DEFAULT_CAMERA.to_string()];
        names.extend(self.graph.iter().filter_map(|(_, node)| match &node.kind {
            NodeKind::Camera(camera) => Some(camera.name.to_string()),
            _ => None,
        }));
        names
    }

    /// Switches the active camera by name. Returns `false` for unknown names.
    pub fn set_camera(&mut self, name: &str) -> bool {
        if name == DEFAULT_CAMERA {
            self.active_camera = None;
            log::info!("Switched to default camera");
            return true;
        }

        let found = self.graph.iter().find_map(|(id, node)| match &node.kind {
            NodeKind::Camera(camera) if camera.name == name => Some(id),
            _ => None,
        });

        match found {
            Some(id) => {
                self.active_camera = Some(id);
                log::info!("Switched to camera '{name}'");
                true
            }
            None => {
                log::warn!("No camera named '{name}'");
                false
            }
        }
    }

    /// Names unnamed cameras under `root` and matches them to the current aspect.
    pub fn register_cameras(&mut self, root: NodeId) {
        let aspect = self.default_camera.aspect;
        for id in self.graph.descendants(root) {
            let Some(node) = self.graph.get_mut(id) else {
                continue;
            };
            let NodeKind::Camera(camera) = &mut node.kind else {
                continue;
            };

            if camera.name.is_empty() || camera.name == "Camera" {
                let name = if node.name.is_empty() {
                    let name = format!("VIEWER__camera_{}", self.unnamed_cameras);
                    self.unnamed_cameras += 1;
                    name
                } else {
                    node.name.clone()
                };
                camera.name = name.into();
            }
            camera.set_aspect(aspect);
        }
    }

    #[must_use]
    pub fn has_content_lights(&self) -> bool {
        self.graph
            .iter()
            .any(|(_, node)| matches!(node.kind, NodeKind::Light))
    }

    /// Matches every camera's projection to the surface aspect ratio.
    pub fn resize(&mut self, aspect: f32) {
        self.default_camera.set_aspect(aspect);
        let ids: Vec<NodeId> = self.graph.iter().map(|(id, _)| id).collect();
        for id in ids {
            if let Some(node) = self.graph.get_mut(id)
                && let NodeKind::Camera(camera) = &mut node.kind
            {
                camera.set_aspect(aspect);
            }
        }
    }

    /// Places the default camera to frame content of the given size.
    pub fn frame(&mut self, size: f32) {
        let size = if size.is_finite() && size > 0.0 { size } else { 1.0 };
        self.default_camera.set_clip_planes(size / 100.0, size * 100.0);
        self.default_camera.look_from(
            Vec3::new(size, size * 0.5, size * 1.2),
            Vec3::new(size * 0.2, size * 0.4, -size * 0.5),
            Vec3::Y,
        );
    }

    pub fn look_from(&mut self, position: Vec3, target: Vec3, up: Vec3) {
        self.default_camera.look_from(position, target, up);
    }

    /// Refreshes world matrices and the view of the active embedded camera.
    pub fn update(&mut self) {
        self.graph.update_world_matrices();

        let Some(id) = self.active_camera else {
            return;
        };
        match self.graph.get_mut(id) {
            Some(node) => {
                let world = *node.world_matrix();
                if let NodeKind::Camera(camera) = &mut node.kind {
                    camera.update_view_projection(&world);
                }
            }
            None => {
                log::info!("Active camera was removed, falling back to default");
                self.active_camera = None;
            }
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}
