//! Keyframe animation: tracks, clips, sub-clip extraction and the per-content
//! mixer.

mod values;
pub mod action;
pub mod binder;
pub mod binding;
pub mod clip;
pub mod mixer;
pub mod subclip;
pub mod tracks;

pub use action::{AnimationAction, TrackValue};
pub use binder::Binder;
pub use binding::{PropertyBinding, TargetPath};
pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use mixer::AnimationMixer;
pub use subclip::{extract, extract_clamped};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack, TIME_EPSILON};
pub use values::Interpolatable;
