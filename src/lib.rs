//! Multi-viewport animation comparison viewer.
//!
//! Several animated subjects share one stage, one camera and one render loop.
//! Exactly one of them is *active*: it receives playback controls, scrubbing
//! and rotation gestures, and it is the only one whose clock advances.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use myth_compare::prelude::*;
//!
//! let config = ViewerConfig::from_json_str(json)?;
//! let mut viewer = Viewer::new(config, Arc::new(loader))?;
//! for load in viewer.load_all() {
//!     pollster::block_on(load);
//! }
//!
//! let mut driver = RenderDriver::new(HeadlessBackend::new(8));
//! let report = driver.frame_with_delta(&mut viewer, 1.0 / 60.0);
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animation;
pub mod app;
pub mod errors;
pub mod input;
pub mod render;
pub mod scene;
pub mod utils;
pub mod viewer;

pub use animation::{AnimationClip, AnimationMixer, extract, extract_clamped};
pub use errors::{Error, Result};
pub use input::{PointerEvent, PointerKind, PointerResolver, SurfaceRect};
pub use render::{HeadlessBackend, RenderBackend, RenderDriver};
pub use scene::{Camera, Node, NodeId, NodeKind, SceneGraph, Stage};
pub use viewer::{
    FrameReport, LoadedModel, ModelLoader, PlaybackContext, TimelineController, Viewer,
    ViewerConfig, ViewerEvent, ViewportOrchestrator,
};

pub mod prelude {
    pub use crate::animation::{
        AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData,
    };
    pub use crate::errors::{Error, Result};
    pub use crate::input::{PointerEvent, SurfaceRect};
    pub use crate::render::{HeadlessBackend, RenderBackend, RenderDriver};
    pub use crate::scene::{Aabb, Node, NodeKind, SceneGraph};
    pub use crate::viewer::{
        CameraPose, FrameReport, InMemoryLoader, LoadedModel, ModelLoader, Viewer, ViewerConfig,
        ViewerEvent, ViewportConfig,
    };
}
