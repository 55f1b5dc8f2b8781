//! Viewer configuration
//!
//! Loaded from JSON. Every field has a default, so `{}` plus a viewport list
//! is a complete config:
//!
//! ```json
//! {
//!   "viewports": [
//!     { "url": "models/reference.glb", "frame_range": [0, 48], "label": "std" },
//!     { "url": "models/attempt.glb", "frame_range": [12, 60], "label": "try 1" }
//!   ],
//!   "playback_speed": 0.5,
//!   "camera": { "position": [3.0, 1.5, 4.0], "target": [0.0, 1.0, 0.0] }
//! }
//! ```

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

pub const DEFAULT_FRAME_RATE: f32 = 24.0;
pub const DEFAULT_PLAYBACK_SPEED: f32 = 0.5;
pub const DEFAULT_MAX_FRAME_DELTA: f32 = 0.25;

/// One viewport slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub url: String,
    /// Frame interval `[L, R)` cut from the first clip. `None` plays the whole clip.
    #[serde(default)]
    pub frame_range: Option<[u32; 2]>,
    #[serde(default)]
    pub label: String,
}

impl ViewportConfig {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            frame_range: None,
            label: String::new(),
        }
    }

    #[must_use]
    pub fn with_frame_range(mut self, start: u32, end: u32) -> Self {
        self.frame_range = Some([start, end]);
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Initial camera placement. Either a look-at pair or a flat 9-element array
/// holding position, target and up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CameraPose {
    LookAt { position: Vec3, target: Vec3 },
    Matrix { matrix: [f32; 9] },
}

impl CameraPose {
    /// `(position, target, up)`.
    #[must_use]
    pub fn eye_target_up(&self) -> (Vec3, Vec3, Vec3) {
        match *self {
            CameraPose::LookAt { position, target } => (position, target, Vec3::Y),
            CameraPose::Matrix { matrix: m } => {
                let up = Vec3::new(m[6], m[7], m[8]).normalize_or_zero();
                (
                    Vec3::new(m[0], m[1], m[2]),
                    Vec3::new(m[3], m[4], m[5]),
                    if up == Vec3::ZERO { Vec3::Y } else { up },
                )
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub viewports: Vec<ViewportConfig>,
    pub frame_rate: f32,
    pub playback_speed: f32,
    pub start_playing: bool,
    /// Upper bound on the per-tick wall-clock delta, in seconds.
    pub max_frame_delta: f32,
    pub camera: Option<CameraPose>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            viewports: Vec::new(),
            frame_rate: DEFAULT_FRAME_RATE,
            playback_speed: DEFAULT_PLAYBACK_SPEED,
            start_playing: false,
            max_frame_delta: DEFAULT_MAX_FRAME_DELTA,
            camera: None,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading viewer config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.viewports.is_empty() {
            return Err(Error::InvalidConfig("at least one viewport is required".into()));
        }
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "frame_rate must be positive, got {}",
                self.frame_rate
            )));
        }
        if !(self.playback_speed.is_finite() && self.playback_speed > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "playback_speed must be positive, got {}",
                self.playback_speed
            )));
        }
        if !(self.max_frame_delta.is_finite() && self.max_frame_delta > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "max_frame_delta must be positive, got {}",
                self.max_frame_delta
            )));
        }
        for (slot, viewport) in self.viewports.iter().enumerate() {
            if let Some([start, end]) = viewport.frame_range
                && start >= end
            {
                return Err(Error::InvalidConfig(format!(
                    "viewport {slot}: frame range [{start}, {end}) is empty"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_pose_splits_into_vectors() {
        let pose = CameraPose::Matrix {
            matrix: [1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
        };
        let (eye, target, up) = pose.eye_target_up();
        assert_eq!(eye, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(target, Vec3::ZERO);
        assert_eq!(up, Vec3::Z);
    }
}
