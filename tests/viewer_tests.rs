//! Viewer Integration Tests
//!
//! Tests for:
//! - Installing several viewports, exactly one active
//! - Activation, seeking and the shared play flag
//! - Pointer gestures: pick-to-swap, handle drag rotation, inert clicks
//! - Load races: stale generations, failures, executor independence
//! - Cameras and teardown

mod common;

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::Vec3;

use common::{
    SURFACE, approx, approx_tol, body_center, figure, loaded_viewer, screen_of, setup,
    viewer_from,
};
use myth_compare::errors::Error;
use myth_compare::input::{PointerEvent, PointerTarget};
use myth_compare::scene::{DEFAULT_CAMERA, Node, NodeKind};
use myth_compare::viewer::layout::handle_radii;
use myth_compare::viewer::{
    Gesture, InMemoryLoader, LoadedModel, Viewer, ViewerConfig, ViewerEvent, ViewportConfig,
};

fn active_count(viewer: &Viewer) -> usize {
    viewer
        .orchestrator()
        .contexts()
        .filter(|ctx| ctx.is_active())
        .count()
}

fn click_at(viewer: &mut Viewer, world: Vec3) -> Vec<ViewerEvent> {
    let p = screen_of(viewer, world);
    viewer.push_pointer(PointerEvent::down(p.x, p.y));
    viewer.push_pointer(PointerEvent::up(p.x, p.y));
    viewer.push_pointer(PointerEvent::click(p.x, p.y));
    viewer.tick(0.0).events
}

/// A point on the front of slot `slot`'s rotation handle.
fn handle_point(viewer: &Viewer, slot: usize) -> Vec3 {
    let ctx = viewer.context(slot).unwrap();
    let (inner, outer) = handle_radii(slot, ctx.size());
    let center = viewer
        .stage()
        .graph
        .get(ctx.decorations().handle)
        .unwrap()
        .world_position();
    center + Vec3::new(0.0, 0.0, (inner + outer) * 0.5)
}

/// Start and end of slot `slot`'s link line.
fn link_ends(viewer: &Viewer, slot: usize) -> Option<(Vec3, Vec3)> {
    let link = viewer.context(slot)?.decorations().link?;
    match &viewer.stage().graph.get(link)?.kind {
        NodeKind::Line { start, end } => Some((*start, *end)),
        _ => None,
    }
}

/// Asserts that slot `slot`'s link runs from the rim of the previous slot's
/// handle to the rim of its own.
fn assert_link_joins_neighbours(viewer: &Viewer, slot: usize) {
    let graph = &viewer.stage().graph;
    let (prev_center, prev_outer) = viewer.context(slot - 1).unwrap().link_anchor(graph).unwrap();
    let (center, outer) = viewer.context(slot).unwrap().link_anchor(graph).unwrap();
    let (start, end) = link_ends(viewer, slot).expect("link line");

    assert!(approx_tol((start - prev_center).length(), prev_outer, 1e-4), "start {start}");
    assert!(approx_tol((end - center).length(), outer, 1e-4), "end {end}");
    let along = (center - prev_center).normalize();
    assert!(approx_tol((end - start).normalize().dot(along), 1.0, 1e-4));
}

// ============================================================================
// Installation & Activation
// ============================================================================

#[test]
fn three_viewports_install_with_one_active() {
    let viewer = loaded_viewer(&[2.0, 3.0, 1.5]);

    assert_eq!(viewer.orchestrator().len(), 3);
    assert_eq!(viewer.active_index(), Some(0));
    assert_eq!(active_count(&viewer), 1);
    assert!(!viewer.is_playing());
}

#[test]
fn first_install_reports_loaded_and_activated() {
    let (config, loader) = setup(&[2.0, 3.0]);
    let mut viewer = Viewer::new(config, Arc::new(loader)).unwrap();
    for load in viewer.load_all() {
        pollster::block_on(load);
    }
    let report = viewer.tick(0.0);

    assert!(report.events.contains(&ViewerEvent::Loaded { slot: 0 }));
    assert!(report.events.contains(&ViewerEvent::Loaded { slot: 1 }));
    assert!(report.events.contains(&ViewerEvent::Activated { slot: 0 }));
    assert!(!report.events.contains(&ViewerEvent::Activated { slot: 1 }));
    assert_eq!(report.active, Some(0));
}

#[test]
fn slots_are_laid_out_along_x() {
    let viewer = loaded_viewer(&[2.0, 3.0, 1.5]);
    let graph = &viewer.stage().graph;
    let x: Vec<f32> = (0..3)
        .map(|slot| viewer.context(slot).unwrap().position(graph).x)
        .collect();
    assert!(x[0] < x[1] && x[1] < x[2], "{x:?}");
}

#[test]
fn only_active_decorations_are_visible() {
    let viewer = loaded_viewer(&[2.0, 3.0, 1.5]);
    let graph = &viewer.stage().graph;
    for ctx in viewer.orchestrator().contexts() {
        let visible = graph.is_visible_in_hierarchy(ctx.decorations().handle);
        assert_eq!(visible, ctx.is_active(), "slot {}", ctx.slot());
    }
}

#[test]
fn activate_then_seek_drives_only_that_context() {
    let mut viewer = loaded_viewer(&[2.0, 3.0, 1.5]);

    assert!(viewer.activate(1).unwrap());
    viewer.seek(0.5).unwrap();

    let ctx = viewer.context(1).unwrap();
    assert!(approx(ctx.mixer_time(), 1.5));
    assert!(approx(ctx.progress(), 0.5));
    assert!(approx(viewer.progress(), 0.5));
    assert!(approx(viewer.context(0).unwrap().mixer_time(), 0.0));
    assert_eq!(active_count(&viewer), 1);
}

#[test]
fn activating_the_active_slot_is_noop() {
    let mut viewer = loaded_viewer(&[2.0, 3.0]);
    assert!(!viewer.activate(0).unwrap());
}

#[test]
fn activating_unknown_slot_fails() {
    let mut viewer = loaded_viewer(&[2.0]);
    assert!(matches!(
        viewer.activate(5),
        Err(Error::SlotOutOfRange { index: 5, .. })
    ));
}

#[test]
fn only_active_context_advances() {
    let mut viewer = loaded_viewer(&[2.0, 3.0, 1.5]);
    assert!(viewer.toggle_playback());

    let report = viewer.tick(0.2);
    assert!(report.is_playing);
    assert!(approx(viewer.context(0).unwrap().mixer_time(), 0.1));
    assert!(approx(viewer.context(1).unwrap().mixer_time(), 0.0));
    assert!(approx(viewer.context(2).unwrap().mixer_time(), 0.0));
}

#[test]
fn switching_active_rewinds_previous_and_pauses() {
    let mut viewer = loaded_viewer(&[2.0, 3.0]);
    viewer.toggle_playback();
    viewer.tick(0.2);

    assert!(viewer.activate(1).unwrap());
    let report = viewer.tick(0.2);

    assert!(!report.is_playing);
    assert!(
        report
            .events
            .contains(&ViewerEvent::PlaybackToggled { playing: false })
    );
    assert!(report.events.contains(&ViewerEvent::Activated { slot: 1 }));
    assert!(approx(viewer.context(0).unwrap().mixer_time(), 0.0));
    assert!(approx(viewer.context(1).unwrap().mixer_time(), 0.0));
}

#[test]
fn resuming_after_activation_drives_new_context() {
    let mut viewer = loaded_viewer(&[2.0, 3.0]);
    viewer.toggle_playback();
    viewer.activate(1).unwrap();

    assert!(viewer.toggle_playback());
    viewer.tick(0.2);
    assert!(approx(viewer.context(1).unwrap().mixer_time(), 0.1));
    assert!(approx(viewer.context(0).unwrap().mixer_time(), 0.0));
}

#[test]
fn activating_while_paused_reports_no_toggle() {
    let mut viewer = loaded_viewer(&[2.0, 3.0]);
    viewer.tick(0.0);

    viewer.activate(1).unwrap();
    let report = viewer.tick(0.0);
    assert!(
        !report
            .events
            .iter()
            .any(|e| matches!(e, ViewerEvent::PlaybackToggled { .. }))
    );
}

#[test]
fn seek_pauses_and_reports_toggle() {
    let mut viewer = loaded_viewer(&[2.0]);
    viewer.toggle_playback();
    viewer.tick(0.0);

    viewer.seek(0.25).unwrap();
    let report = viewer.tick(0.1);

    assert!(!report.is_playing);
    assert!(approx(report.progress, 0.25));
    assert!(
        report
            .events
            .contains(&ViewerEvent::PlaybackToggled { playing: false })
    );
}

#[test]
fn scrub_gesture_ends_paused() {
    let mut viewer = loaded_viewer(&[2.0]);
    viewer.toggle_playback();

    viewer.begin_scrub(0.1).unwrap();
    viewer.scrub_to(0.6).unwrap();
    viewer.end_scrub(0.8).unwrap();

    assert!(!viewer.is_playing());
    assert!(approx(viewer.progress(), 0.8));
}

#[test]
fn controls_before_load_are_inert() {
    let (config, loader) = setup(&[2.0]);
    let mut viewer = Viewer::new(config, Arc::new(loader)).unwrap();

    assert!(!viewer.toggle_playback());
    viewer.seek(0.5).unwrap();
    let report = viewer.tick(0.1);
    assert_eq!(report.active, None);
    assert!(approx(report.progress, 0.0));
}

#[test]
fn empty_clip_ignores_toggle_and_seek() {
    let mut loader = InMemoryLoader::new();
    let mut model = figure(2.0);
    model.clips[0] = myth_compare::animation::AnimationClip::new("still", vec![]);
    loader.insert("still.glb", model);
    let config = ViewerConfig {
        viewports: vec![ViewportConfig::new("still.glb")],
        ..ViewerConfig::default()
    };
    let mut viewer = viewer_from(config, loader);

    assert_eq!(viewer.active_index(), Some(0));
    assert!(!viewer.toggle_playback());
    assert!(viewer.seek(0.5).is_ok());
    let report = viewer.tick(0.1);
    assert!(!report.is_playing);
    assert!(approx(report.progress, 0.0));
    assert!(report.events.is_empty());
}

// ============================================================================
// Pointer Gestures
// ============================================================================

#[test]
fn click_on_other_content_swaps_and_activates() {
    let mut viewer = loaded_viewer(&[2.0, 3.0, 1.5]);
    viewer.toggle_playback();
    let graph = &viewer.stage().graph;
    let before_0 = viewer.context(0).unwrap().position(graph);
    let before_2 = viewer.context(2).unwrap().position(graph);

    let target = body_center(&viewer, 2);
    let events = click_at(&mut viewer, target);

    assert_eq!(viewer.active_index(), Some(2));
    assert_eq!(active_count(&viewer), 1);
    assert!(viewer.is_playing(), "swap must not change the play flag");
    assert!(events.contains(&ViewerEvent::Swapped { from: 0, to: 2 }));
    assert!(events.contains(&ViewerEvent::Activated { slot: 2 }));

    let graph = &viewer.stage().graph;
    let after_0 = viewer.context(0).unwrap().position(graph);
    let after_2 = viewer.context(2).unwrap().position(graph);
    assert!((after_2 - before_0).length() < 1e-5);
    assert!((after_0 - before_2).length() < 1e-5);
}

#[test]
fn swap_moves_handle_with_content() {
    let mut viewer = loaded_viewer(&[2.0, 3.0]);
    let target = body_center(&viewer, 1);
    click_at(&mut viewer, target);

    let ctx = viewer.context(1).unwrap();
    let graph = &viewer.stage().graph;
    let handle = graph.get(ctx.decorations().handle).unwrap().transform.position;
    let content = ctx.position(graph);
    assert!(approx(handle.x, content.x));
    assert!(approx(handle.z, content.z));
}

#[test]
fn click_on_active_content_changes_nothing() {
    let mut viewer = loaded_viewer(&[2.0, 3.0]);
    let yaw = viewer.context(0).unwrap().yaw(&viewer.stage().graph);

    let target = body_center(&viewer, 0);
    let events = click_at(&mut viewer, target);

    assert_eq!(viewer.active_index(), Some(0));
    assert!(events.is_empty());
    let after = viewer.context(0).unwrap().yaw(&viewer.stage().graph);
    assert!(approx(yaw, after), "down/up on content must not rotate");
}

#[test]
fn click_on_empty_ground_changes_nothing() {
    let mut viewer = loaded_viewer(&[2.0, 3.0]);
    let events = click_at(&mut viewer, Vec3::new(1.4, 0.0, 3.0));
    assert_eq!(viewer.active_index(), Some(0));
    assert!(events.is_empty());
}

#[test]
fn pointer_outside_surface_is_ignored() {
    let mut viewer = loaded_viewer(&[2.0, 3.0]);
    let p = screen_of(&viewer, body_center(&viewer, 1));
    viewer.push_pointer(PointerEvent::click(p.x, p.y).with_target(PointerTarget::Other));
    viewer.tick(0.0);
    assert_eq!(viewer.active_index(), Some(0));
}

#[test]
fn handle_drag_rotates_active_content() {
    let mut viewer = loaded_viewer(&[2.0, 3.0]);
    let yaw_before = viewer.context(0).unwrap().yaw(&viewer.stage().graph);
    let center = viewer.context(0).unwrap().position(&viewer.stage().graph);

    let start = screen_of(&viewer, handle_point(&viewer, 0));
    viewer.push_pointer(PointerEvent::down(start.x, start.y));
    viewer.tick(0.0);
    assert!(matches!(
        viewer.orchestrator().gesture(),
        Gesture::Dragging { slot: 0, .. }
    ));

    // Quarter turn: from +Z of the center to +X.
    let end = screen_of(&viewer, center + Vec3::new(1.0, 0.0, 0.0));
    viewer.push_pointer(PointerEvent::moved(end.x, end.y));
    viewer.push_pointer(PointerEvent::up(end.x, end.y));
    viewer.tick(0.0);

    assert_eq!(viewer.orchestrator().gesture(), Gesture::Idle);
    let yaw_after = viewer.context(0).unwrap().yaw(&viewer.stage().graph);
    assert!(
        approx_tol(yaw_after - yaw_before, FRAC_PI_2, 1e-2),
        "yaw {yaw_before} -> {yaw_after}"
    );
}

#[test]
fn drag_is_dropped_when_its_context_is_deactivated() {
    let mut viewer = loaded_viewer(&[2.0, 3.0]);
    let yaw_before = viewer.context(0).unwrap().yaw(&viewer.stage().graph);
    let center = viewer.context(0).unwrap().position(&viewer.stage().graph);

    let start = screen_of(&viewer, handle_point(&viewer, 0));
    viewer.push_pointer(PointerEvent::down(start.x, start.y));
    viewer.tick(0.0);
    assert!(matches!(
        viewer.orchestrator().gesture(),
        Gesture::Dragging { slot: 0, .. }
    ));

    viewer.activate(1).unwrap();
    let end = screen_of(&viewer, center + Vec3::new(1.0, 0.0, 0.0));
    viewer.push_pointer(PointerEvent::moved(end.x, end.y));
    viewer.tick(0.0);

    assert_eq!(viewer.orchestrator().gesture(), Gesture::Idle);
    let yaw_after = viewer.context(0).unwrap().yaw(&viewer.stage().graph);
    assert!(approx(yaw_before, yaw_after), "yaw {yaw_before} -> {yaw_after}");
}

#[test]
fn move_without_drag_is_ignored() {
    let mut viewer = loaded_viewer(&[2.0]);
    let yaw = viewer.context(0).unwrap().yaw(&viewer.stage().graph);
    let p = screen_of(&viewer, Vec3::new(1.0, 0.0, 0.0));
    viewer.push_pointer(PointerEvent::moved(p.x, p.y));
    viewer.tick(0.0);
    assert!(approx(yaw, viewer.context(0).unwrap().yaw(&viewer.stage().graph)));
}

#[test]
fn pointer_down_elsewhere_selects_nearest_content() {
    let mut viewer = loaded_viewer(&[2.0, 3.0, 1.5]);
    let near_two = body_center(&viewer, 2) + Vec3::new(0.2, -1.0, 1.5);
    let p = screen_of(&viewer, near_two);
    viewer.push_pointer(PointerEvent::down(p.x, p.y));
    viewer.push_pointer(PointerEvent::up(p.x, p.y));
    viewer.tick(0.0);

    assert_eq!(viewer.orchestrator().selection(), Some(2));
    assert_eq!(viewer.active_index(), Some(0));
}

#[test]
fn picking_follows_surface_offset() {
    let mut viewer = loaded_viewer(&[2.0, 3.0]);
    let mut shifted = SURFACE;
    shifted.x = 100.0;
    shifted.y = 50.0;
    viewer.resize(shifted, 2.0);

    let target = body_center(&viewer, 1);
    click_at(&mut viewer, target);
    assert_eq!(viewer.active_index(), Some(1));
}

// ============================================================================
// Link Lines
// ============================================================================

#[test]
fn links_join_consecutive_handles() {
    let viewer = loaded_viewer(&[2.0, 3.0, 1.5]);
    assert!(link_ends(&viewer, 0).is_none());
    assert_link_joins_neighbours(&viewer, 1);
    assert_link_joins_neighbours(&viewer, 2);
}

#[test]
fn links_follow_handles_after_swap() {
    let mut viewer = loaded_viewer(&[2.0, 3.0, 1.5]);
    let target = body_center(&viewer, 2);
    click_at(&mut viewer, target);
    assert_eq!(viewer.active_index(), Some(2));

    assert_link_joins_neighbours(&viewer, 1);
    assert_link_joins_neighbours(&viewer, 2);
}

#[test]
fn out_of_order_install_links_once_previous_arrives() {
    let (config, loader) = setup(&[2.0, 3.0]);
    let mut viewer = Viewer::new(config, Arc::new(loader)).unwrap();
    viewer.resize(SURFACE, 1.0);

    pollster::block_on(viewer.load(1, "model_1.glb").unwrap());
    viewer.tick(0.0);
    assert!(link_ends(&viewer, 1).is_none());

    pollster::block_on(viewer.load(0, "model_0.glb").unwrap());
    viewer.tick(0.0);
    assert_link_joins_neighbours(&viewer, 1);

    let ctx = viewer.context(1).unwrap();
    let link = ctx.decorations().link.unwrap();
    assert_eq!(
        viewer.stage().graph.is_visible_in_hierarchy(link),
        ctx.is_active()
    );
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn stale_load_is_discarded() {
    let (config, mut loader) = setup(&[2.0]);
    loader.insert("other.glb", figure(5.0));
    let mut viewer = Viewer::new(config, Arc::new(loader)).unwrap();

    let first = viewer.load(0, "model_0.glb").unwrap();
    let second = viewer.load(0, "other.glb").unwrap();
    // The newer request finishes first; the older one arrives late.
    pollster::block_on(second);
    pollster::block_on(first);
    viewer.tick(0.0);

    let ctx = viewer.context(0).unwrap();
    assert!(approx(ctx.duration(), 5.0));
    assert_eq!(viewer.orchestrator().len(), 1);
}

#[test]
fn failed_load_keeps_previous_content() {
    let mut viewer = loaded_viewer(&[2.0]);
    let id = viewer.context(0).unwrap().id();
    let nodes = viewer.stage().graph.len();

    let load = viewer.load(0, "missing.glb").unwrap();
    pollster::block_on(load);
    let report = viewer.tick(0.0);

    assert!(
        report
            .events
            .iter()
            .any(|e| matches!(e, ViewerEvent::LoadFailed { slot: 0, .. }))
    );
    assert_eq!(viewer.context(0).unwrap().id(), id);
    assert_eq!(viewer.stage().graph.len(), nodes);
}

#[test]
fn model_without_clips_fails_to_install() {
    let (config, mut loader) = setup(&[2.0]);
    loader.insert("model_0.glb", LoadedModel::new(figure(1.0).scene, vec![]));
    let viewer = viewer_from(config, loader);
    assert!(viewer.context(0).is_none());
    assert_eq!(viewer.active_index(), None);
}

#[test]
fn reload_replaces_context_in_place() {
    let mut viewer = loaded_viewer(&[2.0, 3.0]);
    let old_id = viewer.context(1).unwrap().id();
    let nodes = viewer.stage().graph.len();

    let load = viewer.load(1, "model_0.glb").unwrap();
    pollster::block_on(load);
    viewer.tick(0.0);

    let ctx = viewer.context(1).unwrap();
    assert_ne!(ctx.id(), old_id);
    assert!(approx(ctx.duration(), 2.0));
    assert!(!ctx.is_active());
    assert_eq!(viewer.stage().graph.len(), nodes);
}

#[test]
fn load_out_of_range_slot_fails() {
    let (config, loader) = setup(&[2.0]);
    let mut viewer = Viewer::new(config, Arc::new(loader)).unwrap();
    assert!(matches!(
        viewer.load(3, "model_0.glb"),
        Err(Error::SlotOutOfRange { index: 3, count: 1 })
    ));
}

#[test]
fn frame_range_cuts_the_clip() {
    let (mut config, loader) = setup(&[2.0]);
    config.viewports[0] = config.viewports[0].clone().with_frame_range(12, 36);
    let viewer = viewer_from(config, loader);
    let ctx = viewer.context(0).unwrap();
    assert!(approx(ctx.duration(), 1.0));
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "does not fit clip")]
fn frame_range_past_the_clip_asserts_in_debug() {
    let (mut config, loader) = setup(&[2.0]);
    config.viewports[0] = config.viewports[0].clone().with_frame_range(12, 500);
    viewer_from(config, loader);
}

#[test]
#[cfg(not(debug_assertions))]
fn frame_range_past_the_clip_is_clamped_in_release() {
    let (mut config, loader) = setup(&[2.0]);
    config.viewports[0] = config.viewports[0].clone().with_frame_range(12, 500);
    let viewer = viewer_from(config, loader);
    assert!(approx(viewer.context(0).unwrap().duration(), 1.5));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn loads_complete_on_any_executor() {
    let (config, loader) = setup(&[2.0, 3.0, 1.5]);
    let mut viewer = Viewer::new(config, Arc::new(loader)).unwrap();

    let handles: Vec<_> = viewer.load_all().into_iter().map(tokio::spawn).collect();
    for handle in handles {
        handle.await.unwrap();
    }
    viewer.tick(0.0);

    assert_eq!(viewer.orchestrator().len(), 3);
    assert_eq!(active_count(&viewer), 1);
}

// ============================================================================
// Cameras & Teardown
// ============================================================================

#[test]
fn embedded_cameras_are_selectable() {
    let (config, mut loader) = setup(&[2.0]);
    let mut model = figure(2.0);
    let root = model.scene.roots()[0];
    model.scene.add_child(
        root,
        Node::new(NodeKind::Camera(Box::new(
            myth_compare::scene::Camera::new_perspective(50.0, 1.0, 0.1, 100.0),
        )))
        .with_name("closeup"),
    );
    loader.insert("model_0.glb", model);
    let mut viewer = viewer_from(config, loader);

    let names = viewer.camera_names();
    assert_eq!(names[0], DEFAULT_CAMERA);
    assert!(names.iter().any(|n| n == "closeup"));

    assert!(viewer.set_camera("closeup"));
    assert_eq!(viewer.stage().active_camera_name(), "closeup");
    assert!(!viewer.set_camera("nope"));
    assert!(viewer.set_camera(DEFAULT_CAMERA));
}

#[test]
fn teardown_clears_everything() {
    let mut viewer = loaded_viewer(&[2.0, 3.0]);
    viewer.toggle_playback();
    viewer.teardown();

    assert!(viewer.orchestrator().is_empty());
    assert!(!viewer.is_playing());
    // Only the ground plane is left.
    assert_eq!(viewer.stage().graph.len(), 1);
}
