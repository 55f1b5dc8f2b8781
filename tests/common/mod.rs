//! Shared fixtures: procedural models and a viewer wired to an in-memory loader.

#![allow(dead_code)]

use std::sync::Arc;

use glam::{Vec2, Vec3};

use myth_compare::animation::{
    AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData,
};
use myth_compare::input::SurfaceRect;
use myth_compare::scene::{Aabb, Node, NodeKind, SceneGraph};
use myth_compare::viewer::{
    CameraPose, InMemoryLoader, LoadedModel, Viewer, ViewerConfig, ViewportConfig,
};

pub const EPSILON: f32 = 1e-5;

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

pub fn approx_tol(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() < tolerance
}

/// Height of the test figure's body box.
pub const BODY_HEIGHT: f32 = 2.0;

/// Linear ramp moving the "arm" node along +X over `duration` seconds.
pub fn arm_clip(name: &str, duration: f32) -> AnimationClip {
    AnimationClip::new(
        name,
        vec![Track::new(
            "arm",
            TargetPath::Translation,
            TrackData::Vector3(KeyframeTrack::new(
                vec![0.0, duration],
                vec![Vec3::ZERO, Vec3::X],
                InterpolationMode::Linear,
            )),
        )],
    )
}

/// A standing box ("body", 0.6 x 2 x 0.6, feet at y = 0) with an animated
/// "arm" child, shipping one clip of `duration` seconds.
pub fn figure(duration: f32) -> LoadedModel {
    let mut scene = SceneGraph::new();
    let body = scene.add(
        Node::new(NodeKind::Mesh {
            bounds: Aabb::new(Vec3::new(-0.3, 0.0, -0.3), Vec3::new(0.3, BODY_HEIGHT, 0.3)),
        })
        .with_name("body"),
    );
    scene.add_child(
        body,
        Node::group()
            .with_name("arm")
            .with_position(Vec3::new(0.0, 1.5, 0.0)),
    );
    LoadedModel::new(scene, vec![arm_clip("walk", duration)])
}

/// A camera far enough back to see slots 0..=2 of [`figure`] models.
pub fn overview_pose() -> CameraPose {
    CameraPose::LookAt {
        position: Vec3::new(3.0, 2.0, 12.0),
        target: Vec3::new(3.0, 1.0, 0.0),
    }
}

pub const SURFACE: SurfaceRect = SurfaceRect {
    x: 0.0,
    y: 0.0,
    width: 800.0,
    height: 600.0,
};

/// Config and loader for one figure per duration, urls `model_{i}.glb`.
pub fn setup(durations: &[f32]) -> (ViewerConfig, InMemoryLoader) {
    let mut loader = InMemoryLoader::new();
    let mut viewports = Vec::new();
    for (i, &duration) in durations.iter().enumerate() {
        let url = format!("model_{i}.glb");
        loader.insert(url.clone(), figure(duration));
        viewports.push(ViewportConfig::new(url).with_label(format!("take {i}")));
    }
    let config = ViewerConfig {
        viewports,
        camera: Some(overview_pose()),
        ..ViewerConfig::default()
    };
    (config, loader)
}

/// Viewer with every configured load driven to completion and installed.
pub fn loaded_viewer(durations: &[f32]) -> Viewer {
    let (config, loader) = setup(durations);
    viewer_from(config, loader)
}

pub fn viewer_from(config: ViewerConfig, loader: InMemoryLoader) -> Viewer {
    let mut viewer = Viewer::new(config, Arc::new(loader)).expect("valid config");
    viewer.resize(SURFACE, 1.0);
    for load in viewer.load_all() {
        pollster::block_on(load);
    }
    viewer.tick(0.0);
    viewer
}

/// Client coordinates of a world point under the viewer's current camera.
pub fn screen_of(viewer: &Viewer, world: Vec3) -> Vec2 {
    let ndc = viewer
        .stage()
        .camera()
        .view_projection_matrix()
        .project_point3(world);
    let surface = viewer.surface();
    Vec2::new(
        surface.x + (ndc.x + 1.0) * 0.5 * surface.width,
        surface.y + (1.0 - ndc.y) * 0.5 * surface.height,
    )
}

/// World position of slot `slot`'s body center.
pub fn body_center(viewer: &Viewer, slot: usize) -> Vec3 {
    let ctx = viewer.context(slot).expect("slot installed");
    ctx.position(&viewer.stage().graph) + Vec3::new(0.0, BODY_HEIGHT * 0.5, 0.0)
}
