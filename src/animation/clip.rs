use glam::{Quat, Vec3};

use crate::animation::binding::TargetPath;
use crate::animation::tracks::{KeyframeTrack, TIME_EPSILON};

#[derive(Debug, Clone, PartialEq)]
pub struct TrackMeta {
    pub node_name: String,
    pub target: TargetPath,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
    Scalar(KeyframeTrack<f32>),
}

impl TrackData {
    #[must_use]
    pub fn end_time(&self) -> f32 {
        match self {
            TrackData::Vector3(track) => track.end_time(),
            TrackData::Quaternion(track) => track.end_time(),
            TrackData::Scalar(track) => track.end_time(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            TrackData::Vector3(track) => track.len(),
            TrackData::Quaternion(track) => track.len(),
            TrackData::Scalar(track) => track.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// See [`KeyframeTrack::slice`].
    #[must_use]
    pub fn slice(&self, start: f32, end: f32) -> Self {
        match self {
            TrackData::Vector3(track) => TrackData::Vector3(track.slice(start, end)),
            TrackData::Quaternion(track) => TrackData::Quaternion(track.slice(start, end)),
            TrackData::Scalar(track) => TrackData::Scalar(track.slice(start, end)),
        }
    }
}

/// A track plus the node property it animates.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub meta: TrackMeta,
    pub data: TrackData,
}

impl Track {
    #[must_use]
    pub fn new(node_name: impl Into<String>, target: TargetPath, data: TrackData) -> Self {
        Self {
            meta: TrackMeta {
                node_name: node_name.into(),
                target,
            },
            data,
        }
    }
}

/// An immutable, named set of keyframe tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Builds a clip whose duration is the last keyframe time across all tracks.
    #[must_use]
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let duration = tracks
            .iter()
            .map(|t| t.data.end_time())
            .fold(0.0_f32, f32::max);

        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    /// Builds a clip with an explicit duration (sub-clips keep their window length
    /// even when the last keyframe sits earlier).
    #[must_use]
    pub fn with_duration(name: impl Into<String>, duration: f32, tracks: Vec<Track>) -> Self {
        Self {
            name: name.into(),
            duration: duration.max(0.0),
            tracks,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.duration <= 0.0
    }

    /// Number of whole frames needed to cover the clip at `frame_rate`.
    ///
    /// A trailing partial frame counts as a frame, so `[0, frame_count)`
    /// always spans every keyframe.
    #[must_use]
    pub fn frame_count(&self, frame_rate: f32) -> u32 {
        if frame_rate <= 0.0 || self.duration <= 0.0 {
            return 0;
        }
        (self.duration * frame_rate - TIME_EPSILON).ceil().max(0.0) as u32
    }
}
