//! Utility Module
//!
//! - [`Timer`]: frame clock, wall-clock or explicitly driven
//! - [`FpsCounter`]: frame rate measurement

pub mod fps_counter;
pub mod time;

pub use fps_counter::FpsCounter;
pub use time::Timer;
