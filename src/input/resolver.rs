//! Pointer-to-scene resolution by ray casting.

use glam::Vec3;

use crate::input::pointer::{PointerEvent, PointerTarget, SurfaceRect};
use crate::scene::{Camera, NodeId, NodeKind, Ray, SceneGraph};

/// Closest hit of a pointer ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub node: NodeId,
    pub point: Vec3,
    pub distance: f32,
}

/// Stateless ray caster. The surface rectangle is passed on every call, so
/// layout changes between frames are always picked up.
#[derive(Debug, Default, Clone, Copy)]
pub struct PointerResolver;

impl PointerResolver {
    /// Resolves `event` against every pickable, visible node of `graph`.
    #[must_use]
    pub fn resolve(
        event: &PointerEvent,
        surface: &SurfaceRect,
        camera: &Camera,
        graph: &SceneGraph,
    ) -> Option<Intersection> {
        if event.target != PointerTarget::Surface {
            return None;
        }
        let ndc = surface.to_ndc(event.position)?;
        let ray = camera.ray_from_ndc(ndc);
        if ray.direction == Vec3::ZERO {
            return None;
        }
        let hit = Self::cast(&ray, graph);
        if hit.is_none() {
            log::trace!("Pointer at {} hit nothing", event.position);
        }
        hit
    }

    /// Nearest intersection along `ray`. World matrices must be current.
    #[must_use]
    pub fn cast(ray: &Ray, graph: &SceneGraph) -> Option<Intersection> {
        let mut best: Option<Intersection> = None;

        for (id, node) in graph.iter() {
            if !node.kind.is_pickable() || !graph.is_visible_in_hierarchy(id) {
                continue;
            }

            let world = node.world_matrix();
            let distance = match &node.kind {
                NodeKind::Mesh { bounds } => bounds.transform(world).intersect_ray(ray),
                NodeKind::Ring {
                    inner_radius,
                    outer_radius,
                } => intersect_flat(ray, world, |local| {
                    let r = local.x.hypot(local.z);
                    r >= *inner_radius && r <= *outer_radius
                }),
                NodeKind::Plane { half_extent } => intersect_flat(ray, world, |local| {
                    local.x.abs() <= *half_extent && local.z.abs() <= *half_extent
                }),
                _ => None,
            };

            if let Some(distance) = distance
                && best.is_none_or(|b| distance < b.distance)
            {
                best = Some(Intersection {
                    node: id,
                    point: ray.at(distance),
                    distance,
                });
            }
        }

        best
    }
}

/// Hits the node's local XZ plane, then tests the local hit point with `inside`.
fn intersect_flat(
    ray: &Ray,
    world: &glam::Affine3A,
    inside: impl Fn(Vec3) -> bool,
) -> Option<f32> {
    let origin = Vec3::from(world.translation);
    let normal = world.transform_vector3(Vec3::Y).normalize_or_zero();
    if normal == Vec3::ZERO {
        return None;
    }
    let distance = ray.intersect_plane(origin, normal)?;
    let local = world.inverse().transform_point3(ray.at(distance));
    inside(local).then_some(distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Node;

    #[test]
    fn ring_hole_is_not_hit() {
        let mut graph = SceneGraph::new();
        let ring = graph.add(Node::new(NodeKind::Ring {
            inner_radius: 1.0,
            outer_radius: 2.0,
        }));
        graph.update_world_matrices();

        let through_hole = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        assert!(PointerResolver::cast(&through_hole, &graph).is_none());

        let on_band = Ray::new(Vec3::new(1.5, 5.0, 0.0), Vec3::NEG_Y);
        let hit = PointerResolver::cast(&on_band, &graph);
        assert_eq!(hit.map(|h| h.node), Some(ring));
    }
}
