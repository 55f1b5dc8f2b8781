//! Error Types
//!
//! This module defines the error types used throughout the viewer.
//!
//! # Overview
//!
//! The main error type [`Error`] covers the failure modes of the comparison
//! viewer:
//! - Asset loading failures reported by the external model loader
//! - Invalid frame ranges handed to the sub-clip extractor
//! - Playback requests against zero-length clips
//! - Configuration and surface errors
//!
//! # Propagation
//!
//! Not every error is worth surfacing. [`Error::is_silent`] marks the
//! variants that are expected during normal interaction (an empty clip being
//! scrubbed, for instance); callers drop those without logging.
//!
//! ```rust,ignore
//! use myth_compare::errors::{Error, Result};
//!
//! fn scrub(ctx: &mut PlaybackContext, p: f32) -> Result<()> {
//!     match ctx.seek(p, graph) {
//!         Err(e) if e.is_silent() => Ok(()),
//!         other => other,
//!     }
//! }
//! ```

use thiserror::Error;

/// The main error type for the comparison viewer.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The model loader could not fetch or decode an asset.
    #[error("Failed to load '{url}': {reason}")]
    Load {
        /// The requested asset location
        url: String,
        /// Human readable cause reported by the loader
        reason: String,
    },

    /// The loaded asset has no animation clip to drive.
    #[error("Asset '{0}' contains no animation clips")]
    NoClips(String),

    // ========================================================================
    // Animation Errors
    // ========================================================================
    /// Frame bounds passed to the sub-clip extractor are out of order or out of range.
    #[error("Invalid frame range [{start}, {end}) for a clip of {frame_count} frames")]
    InvalidRange {
        /// First frame (inclusive)
        start: u32,
        /// Last frame (exclusive)
        end: u32,
        /// Number of frames available in the source clip
        frame_count: u32,
    },

    /// Playback or seeking was requested on a zero-length clip.
    #[error("Clip has zero duration")]
    EmptyClip,

    // ========================================================================
    // Viewport Errors
    // ========================================================================
    /// A viewport slot index does not exist.
    #[error("Viewport slot {index} out of range (count: {count})")]
    SlotOutOfRange {
        /// The invalid index
        index: usize,
        /// Number of configured slots
        count: usize,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// The viewer configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ========================================================================
    // Rendering & Platform Errors
    // ========================================================================
    /// The render backend rejected a frame.
    #[error("Render error: {0}")]
    Render(String),

    /// Event loop error (winit).
    #[cfg(feature = "winit")]
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

impl Error {
    /// Builds a [`Error::Load`] from any displayable cause.
    pub fn load(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::Load {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns `true` for errors that are part of normal interaction and
    /// should be swallowed without logging.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        matches!(self, Error::EmptyClip)
    }
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
