use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::{
    binding::PropertyBinding,
    clip::{AnimationClip, TrackData},
    tracks::KeyframeCursor,
};

/// Playback state of one looping clip bound to one content root.
///
/// `time` only ever accumulates; the sampling time is derived from it by
/// [`local_time`](Self::local_time). Looping therefore never jumps the
/// accumulator backwards and progress readouts stay continuous across wrap
/// points.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub paused: bool,

    pub bindings: Vec<PropertyBinding>,

    pub(crate) track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            paused: false,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    /// Advances the accumulator. No-op while paused or on an empty clip.
    pub fn update(&mut self, dt: f32) {
        if self.paused || self.clip.duration <= 0.0 {
            return;
        }
        self.time += dt;
    }

    /// Time used for sampling, folded into `[0, duration]`.
    ///
    /// A positive time landing exactly on a multiple of the duration maps to
    /// `duration`, so seeking to the end shows the last pose.
    #[must_use]
    pub fn local_time(&self) -> f32 {
        let duration = self.clip.duration;
        if duration <= 0.0 {
            return 0.0;
        }

        let t = self.time.rem_euclid(duration);
        if t == 0.0 && self.time > 0.0 { duration } else { t }
    }

    /// Rewinds the accumulator and unpauses.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.paused = false;
    }

    /// Samples track `track_index` at the current local time.
    pub fn sample_track(&mut self, track_index: usize) -> Option<TrackValue> {
        let time = self.local_time();
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.track_cursors.get_mut(track_index)?;

        match &track.data {
            TrackData::Vector3(t) => t.sample_with_cursor(time, cursor).map(TrackValue::Vector3),
            TrackData::Quaternion(t) => t
                .sample_with_cursor(time, cursor)
                .map(TrackValue::Quaternion),
            TrackData::Scalar(t) => t.sample_with_cursor(time, cursor).map(TrackValue::Scalar),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackValue {
    Vector3(Vec3),
    Quaternion(Quat),
    Scalar(f32),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::binding::TargetPath;
    use crate::animation::clip::Track;
    use crate::animation::tracks::{InterpolationMode, KeyframeTrack};

    fn two_second_clip() -> Arc<AnimationClip> {
        let track = KeyframeTrack::new(
            vec![0.0, 2.0],
            vec![0.0_f32, 1.0],
            InterpolationMode::Linear,
        );
        Arc::new(AnimationClip::new(
            "ramp",
            vec![Track::new("n", TargetPath::UniformScale, TrackData::Scalar(track))],
        ))
    }

    #[test]
    fn loop_keeps_accumulating_past_duration() {
        let mut action = AnimationAction::new(two_second_clip());
        action.update(2.5);
        assert!((action.time - 2.5).abs() < 1e-6);
        assert!((action.local_time() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn exact_end_samples_last_pose() {
        let mut action = AnimationAction::new(two_second_clip());
        action.time = 2.0;
        assert!((action.local_time() - 2.0).abs() < 1e-6);
        assert_eq!(action.sample_track(0), Some(TrackValue::Scalar(1.0)));
    }

    #[test]
    fn negative_time_wraps_from_the_end() {
        let mut action = AnimationAction::new(two_second_clip());
        action.time = -0.5;
        assert!((action.local_time() - 1.5).abs() < 1e-6);
    }
}
