use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
    CubicSpline,
}

/// Keyframes closer than this (in seconds) are treated as the same instant
/// when slicing a track.
pub const TIME_EPSILON: f32 = 1e-5;

const MAX_SCAN_OFFSET: usize = 3;

/// Remembers the segment used by the previous sample so sequential playback
/// finds the next keyframe in O(1).
#[derive(Debug, Clone, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    pub values: Vec<T>, // For CubicSpline, length is times.len() * 3
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time of the last keyframe, or 0 for an empty track.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Stateless sample. Returns `None` for an empty track.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let next_idx = self.times.partition_point(|&t| t <= time);
        let idx = next_idx.saturating_sub(1);
        Some(self.sample_at_frame(idx, time))
    }

    /// Samples using `cursor` as a starting hint, falling back to binary
    /// search when the playhead jumped (scrubbing, loop wrap).
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        let len = self.times.len();
        match len {
            0 => return None,
            1 => return Some(*self.value_at(0)),
            _ => {}
        }

        let i = cursor.last_index.min(len - 1);

        let found_index = if time >= self.times[i] {
            // Forward: normal playback
            (0..=MAX_SCAN_OFFSET).find_map(|offset| {
                let idx = i + offset;
                if idx >= len - 1 {
                    return Some(len - 1);
                }
                (time < self.times[idx + 1]).then_some(idx)
            })
        } else {
            // Backward: only a short hop, anything else is a jump
            (1..=MAX_SCAN_OFFSET)
                .take_while(|&offset| offset <= i)
                .map(|offset| i - offset)
                .find(|&idx| time >= self.times[idx])
        };

        let index = found_index.unwrap_or_else(|| {
            self.times
                .partition_point(|&t| t <= time)
                .saturating_sub(1)
        });
        cursor.last_index = index;

        Some(self.sample_at_frame(index, time))
    }

    /// Keyframe value, skipping the tangents of cubic tracks.
    #[inline]
    #[must_use]
    pub fn value_at(&self, index: usize) -> &T {
        match self.interpolation {
            InterpolationMode::CubicSpline => &self.values[index * 3 + 1],
            _ => &self.values[index],
        }
    }

    /// Normalized position of `time` inside the segment starting at `index`.
    fn segment_param(&self, index: usize, time: f32) -> (f32, f32) {
        let t0 = self.times[index];
        let dt = self.times[index + 1] - t0;
        let t = if dt > 1e-6 { (time - t0) / dt } else { 0.0 };
        (t.clamp(0.0, 1.0), dt)
    }

    fn sample_at_frame(&self, index: usize, time: f32) -> T {
        let len = self.times.len();

        if index >= len - 1 {
            return *self.value_at(len - 1);
        }
        if index == 0 && time <= self.times[0] {
            return *self.value_at(0);
        }

        let next_idx = index + 1;
        let (t, dt) = self.segment_param(index, time);

        match self.interpolation {
            InterpolationMode::Step => *self.value_at(index),
            InterpolationMode::Linear => {
                T::interpolate_linear(*self.value_at(index), *self.value_at(next_idx), t)
            }
            InterpolationMode::CubicSpline => {
                let (v0, out0, in1, v1) = self.cubic_segment(index);
                T::interpolate_cubic(v0, out0, in1, v1, t, dt)
            }
        }
    }

    fn cubic_segment(&self, index: usize) -> (T, T, T, T) {
        let i_prev = index * 3;
        let i_next = (index + 1) * 3;
        (
            self.values[i_prev + 1],
            self.values[i_prev + 2],
            self.values[i_next],
            self.values[i_next + 1],
        )
    }

    /// Slope of a cubic track at `time`. Flat outside the keyed range.
    fn cubic_slope(&self, time: f32) -> T {
        let len = self.times.len();
        if len < 2 || time < self.times[0] || time > self.times[len - 1] {
            return T::ZERO_TANGENT;
        }
        let index = self
            .times
            .partition_point(|&t| t <= time)
            .saturating_sub(1)
            .min(len - 2);
        let (t, dt) = self.segment_param(index, time);
        let (v0, out0, in1, v1) = self.cubic_segment(index);
        T::cubic_tangent(v0, out0, in1, v1, t, dt)
    }

    fn push_sampled_key(&self, out: &mut Self, source_time: f32, local_time: f32) {
        let Some(value) = self.sample(source_time) else {
            return;
        };
        out.times.push(local_time);
        if self.interpolation == InterpolationMode::CubicSpline {
            let slope = self.cubic_slope(source_time);
            out.values.extend_from_slice(&[slope, value, slope]);
        } else {
            out.values.push(value);
        }
    }

    fn push_source_key(&self, out: &mut Self, index: usize, local_time: f32) {
        out.times.push(local_time);
        if self.interpolation == InterpolationMode::CubicSpline {
            out.values.extend_from_slice(&self.values[index * 3..index * 3 + 3]);
        } else {
            out.values.push(self.values[index]);
        }
    }

    /// Cuts the window `[start, end]` (seconds) out of this track and
    /// re-bases it to begin at 0.
    ///
    /// Source keyframes inside the window are copied verbatim. When a window
    /// edge does not fall on a keyframe, a key is synthesized there by
    /// sampling the source curve (cubic tracks also get the curve's slope as
    /// tangents, so the shape is preserved).
    #[must_use]
    pub fn slice(&self, start: f32, end: f32) -> Self {
        let mut out = Self::new(Vec::new(), Vec::new(), self.interpolation);
        if self.is_empty() {
            return out;
        }

        let first_time = self.times[0];
        let last_time = self.end_time();
        // Outside the keyed range the curve is flat, so edges there need no key.
        let within_keys = |t: f32| t > first_time + TIME_EPSILON && t < last_time - TIME_EPSILON;

        let first = self.times.partition_point(|&t| t < start - TIME_EPSILON);
        let starts_on_key = self
            .times
            .get(first)
            .is_some_and(|&t| (t - start).abs() <= TIME_EPSILON);
        if within_keys(start) && !starts_on_key {
            self.push_sampled_key(&mut out, start, 0.0);
        }

        for index in first..self.times.len() {
            let t = self.times[index];
            if t > end + TIME_EPSILON {
                break;
            }
            self.push_source_key(&mut out, index, (t - start).max(0.0));
        }

        let ends_on_key = out
            .times
            .last()
            .is_some_and(|&t| (t - (end - start)).abs() <= TIME_EPSILON);
        if within_keys(end) && !ends_on_key {
            self.push_sampled_key(&mut out, end, end - start);
        }

        if out.is_empty() {
            // Window misses every keyframe: hold the clamped value.
            self.push_sampled_key(&mut out, start, 0.0);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> KeyframeTrack<f32> {
        KeyframeTrack::new(
            vec![0.0, 1.0, 2.0],
            vec![0.0, 10.0, 20.0],
            InterpolationMode::Linear,
        )
    }

    #[test]
    fn slice_on_keyframes_copies_them() {
        let sliced = ramp().slice(1.0, 2.0);
        assert_eq!(sliced.times, vec![0.0, 1.0]);
        assert_eq!(sliced.values, vec![10.0, 20.0]);
    }

    #[test]
    fn slice_between_keyframes_synthesizes_edges() {
        let sliced = ramp().slice(0.5, 1.5);
        assert_eq!(sliced.times, vec![0.0, 0.5, 1.0]);
        assert!((sliced.values[0] - 5.0).abs() < 1e-5);
        assert!((sliced.values[1] - 10.0).abs() < 1e-5);
        assert!((sliced.values[2] - 15.0).abs() < 1e-5);
    }

    #[test]
    fn cursor_recovers_after_backward_jump() {
        let track = ramp();
        let mut cursor = KeyframeCursor::default();
        let late = track.sample_with_cursor(1.9, &mut cursor).unwrap();
        assert!((late - 19.0).abs() < 1e-4);
        assert_eq!(cursor.last_index, 1);
        let early = track.sample_with_cursor(0.5, &mut cursor).unwrap();
        assert!((early - 5.0).abs() < 1e-5);
        assert_eq!(cursor.last_index, 0);
    }
}
