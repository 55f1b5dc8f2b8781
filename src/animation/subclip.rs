//! Sub-clip extraction
//!
//! Cuts a frame interval `[start, end)` out of a master clip and re-bases it
//! so the result starts at time 0. The output duration is always
//! `(end - start) / frame_rate`, independent of where the keyframes fall.

use crate::animation::clip::{AnimationClip, Track};
use crate::errors::{Error, Result};

/// Extracts frames `[start_frame, end_frame)` of `clip`.
///
/// Fails with [`Error::InvalidRange`] when `start_frame >= end_frame` or
/// `end_frame` lies past the clip's last frame. Pure and deterministic: the
/// same inputs always produce bit-identical tracks.
pub fn extract(
    clip: &AnimationClip,
    start_frame: u32,
    end_frame: u32,
    frame_rate: f32,
) -> Result<AnimationClip> {
    if frame_rate <= 0.0 || !frame_rate.is_finite() {
        return Err(Error::InvalidConfig(format!(
            "frame rate must be positive, got {frame_rate}"
        )));
    }

    let frame_count = clip.frame_count(frame_rate);
    if start_frame >= end_frame || end_frame > frame_count {
        return Err(Error::InvalidRange {
            start: start_frame,
            end: end_frame,
            frame_count,
        });
    }

    Ok(slice_frames(clip, start_frame, end_frame, frame_rate))
}

/// Lenient variant of [`extract`]: bounds are clamped into the clip instead
/// of rejected. Only an empty clip (or a bad frame rate) still fails.
pub fn extract_clamped(
    clip: &AnimationClip,
    start_frame: u32,
    end_frame: u32,
    frame_rate: f32,
) -> Result<AnimationClip> {
    if frame_rate <= 0.0 || !frame_rate.is_finite() {
        return Err(Error::InvalidConfig(format!(
            "frame rate must be positive, got {frame_rate}"
        )));
    }

    let frame_count = clip.frame_count(frame_rate);
    if frame_count == 0 {
        return Err(Error::EmptyClip);
    }

    let end = end_frame.clamp(1, frame_count);
    let start = start_frame.min(end - 1);
    if (start, end) != (start_frame, end_frame) {
        log::warn!(
            "Clamped frame range [{start_frame}, {end_frame}) to [{start}, {end}) for clip '{}' ({frame_count} frames)",
            clip.name
        );
    }

    Ok(slice_frames(clip, start, end, frame_rate))
}

fn slice_frames(clip: &AnimationClip, start: u32, end: u32, frame_rate: f32) -> AnimationClip {
    let t0 = start as f32 / frame_rate;
    let t1 = end as f32 / frame_rate;

    let tracks = clip
        .tracks
        .iter()
        .map(|track| Track {
            meta: track.meta.clone(),
            data: track.data.slice(t0, t1),
        })
        .collect();

    let duration = (end - start) as f32 / frame_rate;
    AnimationClip::with_duration(format!("{}[{start}..{end})", clip.name), duration, tracks)
}
