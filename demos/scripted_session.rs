//! A scripted pointer session: swap two subjects by clicking, rotate the
//! active one by dragging its ring, then scrub the progress bar.
//!
//! Run with `RUST_LOG=debug cargo run --example scripted_session`.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use myth_compare::prelude::*;
use myth_compare::viewer::layout::handle_radii;

fn figure(duration: f32) -> LoadedModel {
    let mut scene = SceneGraph::new();
    let body = scene.add(
        Node::new(NodeKind::Mesh {
            bounds: Aabb::new(Vec3::new(-0.3, 0.0, -0.3), Vec3::new(0.3, 2.0, 0.3)),
        })
        .with_name("body"),
    );
    scene.add_child(body, Node::group().with_name("hand"));

    let reach = Track::new(
        "hand",
        TargetPath::Translation,
        TrackData::Vector3(KeyframeTrack::new(
            vec![0.0, duration],
            vec![Vec3::new(0.3, 1.4, 0.0), Vec3::new(0.3, 1.4, 0.8)],
            InterpolationMode::Linear,
        )),
    );
    LoadedModel::new(scene, vec![AnimationClip::new("reach", vec![reach])])
}

/// Client coordinates of `world` under the viewer's camera.
fn to_screen(viewer: &Viewer, world: Vec3) -> Vec2 {
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

fn click(viewer: &mut Viewer, at: Vec2) {
    viewer.push_pointer(PointerEvent::down(at.x, at.y));
    viewer.push_pointer(PointerEvent::up(at.x, at.y));
    viewer.push_pointer(PointerEvent::click(at.x, at.y));
}

fn print_state(step: &str, viewer: &Viewer) {
    println!("== {step}");
    for ctx in viewer.orchestrator().contexts() {
        let graph = &viewer.stage().graph;
        println!(
            "   slot {} '{}' at {:?}, yaw {:+.2}, progress {:.2}{}",
            ctx.slot(),
            ctx.label(),
            ctx.position(graph),
            ctx.yaw(graph),
            ctx.progress(),
            if ctx.is_active() { " (active)" } else { "" }
        );
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let loader = InMemoryLoader::new()
        .with("mem://a", figure(2.0))
        .with("mem://b", figure(3.0));
    let config = ViewerConfig {
        viewports: vec![
            ViewportConfig::new("mem://a").with_label("A"),
            ViewportConfig::new("mem://b").with_label("B"),
        ],
        camera: Some(CameraPose::LookAt {
            position: Vec3::new(2.0, 3.0, 9.0),
            target: Vec3::new(2.0, 1.0, 0.0),
        }),
        ..ViewerConfig::default()
    };

    let mut viewer = Viewer::new(config, Arc::new(loader))?;
    viewer.resize(SurfaceRect::new(0.0, 40.0, 960.0, 540.0), 2.0);
    for load in viewer.load_all() {
        pollster::block_on(load);
    }
    viewer.tick(0.0);
    print_state("loaded", &viewer);

    // 1. Click subject B: it takes A's place and becomes active.
    let b = viewer
        .context(1)
        .map(|ctx| ctx.position(&viewer.stage().graph) + Vec3::Y)
        .unwrap_or_default();
    let at = to_screen(&viewer, b);
    click(&mut viewer, at);
    viewer.tick(0.0);
    print_state("after clicking B", &viewer);

    // 2. Drag B's ring a quarter turn around its center.
    if let Some(ctx) = viewer.active() {
        let graph = &viewer.stage().graph;
        let center = ctx.position(graph);
        let (inner, outer) = handle_radii(ctx.slot(), ctx.size());
        let radius = (inner + outer) * 0.5;
        let start = to_screen(&viewer, center + Vec3::new(0.0, 0.0, radius));
        let end = to_screen(&viewer, center + Vec3::new(radius, 0.0, 0.0));
        let mid = to_screen(
            &viewer,
            center + Vec3::new(radius, 0.0, radius) * std::f32::consts::FRAC_1_SQRT_2,
        );

        viewer.push_pointer(PointerEvent::down(start.x, start.y));
        viewer.push_pointer(PointerEvent::moved(mid.x, mid.y));
        viewer.push_pointer(PointerEvent::moved(end.x, end.y));
        viewer.push_pointer(PointerEvent::up(end.x, end.y));
    }
    viewer.tick(0.0);
    print_state("after dragging the ring", &viewer);

    // 3. Play for a while, then scrub.
    viewer.toggle_playback();
    for _ in 0..30 {
        viewer.tick(1.0 / 30.0);
    }
    print_state("after one second of playback", &viewer);

    viewer.begin_scrub(0.2)?;
    viewer.scrub_to(0.6)?;
    viewer.end_scrub(0.75)?;
    let report = viewer.tick(1.0 / 30.0);
    print_state("after scrubbing", &viewer);
    println!("   playing: {}, events: {:?}", report.is_playing, report.events);

    viewer.teardown();
    Ok(())
}
