//! Desktop window comparing two takes.
//!
//! Space toggles playback, 1-9 activate a slot, C cycles cameras.
//! An optional JSON config path overrides the viewport list; urls other than
//! `mem://left` and `mem://right` report a failed load.

use std::sync::Arc;

use glam::Vec3;
use myth_compare::app::winit::App;
use myth_compare::prelude::*;

fn figure(duration: f32, lift: f32) -> LoadedModel {
    let mut scene = SceneGraph::new();
    let body = scene.add(
        Node::new(NodeKind::Mesh {
            bounds: Aabb::new(Vec3::new(-0.3, 0.0, -0.3), Vec3::new(0.3, 1.8, 0.3)),
        })
        .with_name("body"),
    );
    scene.add_child(body, Node::group().with_name("knee"));

    let lift = Track::new(
        "knee",
        TargetPath::Translation,
        TrackData::Vector3(KeyframeTrack::new(
            vec![0.0, duration * 0.5, duration],
            vec![Vec3::ZERO, Vec3::new(0.0, lift, 0.2), Vec3::ZERO],
            InterpolationMode::Linear,
        )),
    );
    LoadedModel::new(scene, vec![AnimationClip::new("lift", vec![lift])])
}

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => ViewerConfig::from_json_file(path)?,
        None => ViewerConfig {
            viewports: vec![
                ViewportConfig::new("mem://left").with_label("left"),
                ViewportConfig::new("mem://right").with_label("right"),
            ],
            ..ViewerConfig::default()
        },
    };

    let loader = InMemoryLoader::new()
        .with("mem://left", figure(2.0, 0.6))
        .with("mem://right", figure(2.4, 0.5));
    let viewer = Viewer::new(config, Arc::new(loader))?;

    App::new().with_title("Motion compare").run(viewer)?;
    Ok(())
}
