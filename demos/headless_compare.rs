//! Three takes of the same motion compared side by side, without a window.
//!
//! Run with `RUST_LOG=info cargo run --example headless_compare`.

use std::sync::Arc;

use glam::{Quat, Vec3};
use myth_compare::prelude::*;

/// A box figure whose "arm" swings around the shoulder.
fn swinging_figure(duration: f32, amplitude: f32) -> LoadedModel {
    let mut scene = SceneGraph::new();
    let body = scene.add(
        Node::new(NodeKind::Mesh {
            bounds: Aabb::new(Vec3::new(-0.3, 0.0, -0.2), Vec3::new(0.3, 1.8, 0.2)),
        })
        .with_name("body"),
    );
    scene.add_child(
        body,
        Node::new(NodeKind::Mesh {
            bounds: Aabb::new(Vec3::new(0.0, -0.1, -0.1), Vec3::new(0.7, 0.1, 0.1)),
        })
        .with_name("arm")
        .with_position(Vec3::new(0.3, 1.5, 0.0)),
    );

    let swing = Track::new(
        "arm",
        TargetPath::Rotation,
        TrackData::Quaternion(KeyframeTrack::new(
            vec![0.0, duration * 0.5, duration],
            vec![
                Quat::IDENTITY,
                Quat::from_rotation_z(amplitude),
                Quat::IDENTITY,
            ],
            InterpolationMode::Linear,
        )),
    );
    LoadedModel::new(scene, vec![AnimationClip::new("swing", vec![swing])])
}

const CONFIG: &str = r#"{
    "viewports": [
        { "url": "mem://reference", "label": "reference" },
        { "url": "mem://take-1", "frame_range": [12, 60], "label": "take 1" },
        { "url": "mem://take-2", "frame_range": [0, 48], "label": "take 2" }
    ],
    "playback_speed": 1.0,
    "start_playing": true
}"#;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // 1. 准备模型
    let loader = InMemoryLoader::new()
        .with("mem://reference", swinging_figure(2.0, 1.2))
        .with("mem://take-1", swinging_figure(3.0, 1.0))
        .with("mem://take-2", swinging_figure(2.5, 1.4));

    // 2. 创建 Viewer 并加载
    let config = ViewerConfig::from_json_str(CONFIG)?;
    let mut viewer = Viewer::new(config, Arc::new(loader))?;
    viewer.resize(SurfaceRect::from_size(1280.0, 720.0), 1.0);
    for load in viewer.load_all() {
        pollster::block_on(load);
    }

    // 3. 驱动渲染循环
    let mut driver = RenderDriver::new(HeadlessBackend::new(4));
    for frame in 0..180 {
        let report = driver.frame_with_delta(&mut viewer, 1.0 / 60.0);
        for event in &report.events {
            println!("frame {frame:>3}: {event:?}");
        }

        // Hand control to the next take every second. Activation pauses,
        // so resume on the new take.
        if frame % 60 == 59 {
            let next = report.active.map_or(0, |slot| (slot + 1) % 3);
            viewer.activate(next)?;
            viewer.toggle_playback();
        }
    }

    // 4. 汇总
    println!();
    for ctx in viewer.orchestrator().contexts() {
        println!(
            "slot {} '{}': clip {:.3}s, time {:.3}s, progress {:.2}, active {}",
            ctx.slot(),
            ctx.label(),
            ctx.duration(),
            ctx.mixer_time(),
            ctx.progress(),
            ctx.is_active()
        );
    }
    if let Some(frame) = driver.backend().last_frame() {
        println!(
            "last frame #{}: {} drawables at {:?}",
            frame.frame_index, frame.drawable_nodes, frame.physical_size
        );
    }
    println!("render failures: {}", driver.failure_count());

    viewer.teardown();
    Ok(())
}
