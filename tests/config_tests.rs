//! Viewer Configuration Tests
//!
//! Tests for:
//! - JSON defaults for omitted fields
//! - Both camera pose forms
//! - Validation failures surfaced as InvalidConfig / Json errors

use glam::Vec3;

use myth_compare::errors::Error;
use myth_compare::viewer::{CameraPose, ViewerConfig, ViewportConfig};
use myth_compare::viewer::config::{
    DEFAULT_FRAME_RATE, DEFAULT_MAX_FRAME_DELTA, DEFAULT_PLAYBACK_SPEED,
};

#[test]
fn minimal_json_takes_defaults() {
    let config = ViewerConfig::from_json_str(r#"{ "viewports": [{ "url": "a.glb" }] }"#).unwrap();

    assert_eq!(config.viewports, vec![ViewportConfig::new("a.glb")]);
    assert!((config.frame_rate - DEFAULT_FRAME_RATE).abs() < f32::EPSILON);
    assert!((config.playback_speed - DEFAULT_PLAYBACK_SPEED).abs() < f32::EPSILON);
    assert!((config.max_frame_delta - DEFAULT_MAX_FRAME_DELTA).abs() < f32::EPSILON);
    assert!(!config.start_playing);
    assert!(config.camera.is_none());
}

#[test]
fn full_json_round_trips_fields() {
    let json = r#"{
        "viewports": [
            { "url": "std.glb", "frame_range": [0, 48], "label": "std" },
            { "url": "try.glb", "frame_range": [12, 60], "label": "try 1" }
        ],
        "frame_rate": 30.0,
        "playback_speed": 1.0,
        "start_playing": true,
        "camera": { "position": [3.0, 1.5, 4.0], "target": [0.0, 1.0, 0.0] }
    }"#;
    let config = ViewerConfig::from_json_str(json).unwrap();

    assert_eq!(config.viewports.len(), 2);
    assert_eq!(
        config.viewports[1],
        ViewportConfig::new("try.glb")
            .with_frame_range(12, 60)
            .with_label("try 1")
    );
    assert!((config.frame_rate - 30.0).abs() < f32::EPSILON);
    assert!(config.start_playing);
    assert_eq!(
        config.camera,
        Some(CameraPose::LookAt {
            position: Vec3::new(3.0, 1.5, 4.0),
            target: Vec3::new(0.0, 1.0, 0.0),
        })
    );
}

#[test]
fn matrix_camera_pose_parses() {
    let json = r#"{
        "viewports": [{ "url": "a.glb" }],
        "camera": { "matrix": [0, 1, 5, 0, 1, 0, 0, 1, 0] }
    }"#;
    let config = ViewerConfig::from_json_str(json).unwrap();
    let (eye, target, up) = config.camera.unwrap().eye_target_up();

    assert_eq!(eye, Vec3::new(0.0, 1.0, 5.0));
    assert_eq!(target, Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(up, Vec3::Y);
}

#[test]
fn degenerate_up_falls_back_to_y() {
    let pose = CameraPose::Matrix {
        matrix: [0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    };
    assert_eq!(pose.eye_target_up().2, Vec3::Y);
}

#[test]
fn empty_viewport_list_is_rejected() {
    let err = ViewerConfig::from_json_str("{}").unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[test]
fn non_positive_rates_are_rejected() {
    for field in ["frame_rate", "playback_speed", "max_frame_delta"] {
        let json = format!(r#"{{ "viewports": [{{ "url": "a.glb" }}], "{field}": 0.0 }}"#);
        let err = ViewerConfig::from_json_str(&json).unwrap_err();
        assert!(
            matches!(&err, Error::InvalidConfig(msg) if msg.contains(field)),
            "{field}: {err}"
        );
    }
}

#[test]
fn empty_frame_range_is_rejected() {
    let json = r#"{ "viewports": [{ "url": "a.glb", "frame_range": [10, 10] }] }"#;
    let err = ViewerConfig::from_json_str(json).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(msg) if msg.contains("viewport 0")));
}

#[test]
fn malformed_json_is_a_json_error() {
    let err = ViewerConfig::from_json_str(r#"{ "viewports": "#).unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = ViewerConfig::from_json_file("/nonexistent/viewer.json").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn config_serializes_back_to_equal_value() {
    let config = ViewerConfig {
        viewports: vec![ViewportConfig::new("a.glb").with_frame_range(0, 24)],
        camera: Some(CameraPose::LookAt {
            position: Vec3::new(1.0, 2.0, 3.0),
            target: Vec3::ZERO,
        }),
        ..ViewerConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(ViewerConfig::from_json_str(&json).unwrap(), config);
}
