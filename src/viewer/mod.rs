//! Multi-viewport comparison viewer
//!
//! - [`PlaybackContext`]: one viewport's content, decorations and mixer
//! - [`TimelineController`]: the shared play flag and clock
//! - [`ViewportOrchestrator`]: activation, swapping and pointer gestures
//! - [`Viewer`]: ties them to loading, configuration and the frame tick

pub mod config;
pub mod context;
pub mod events;
pub mod layout;
pub mod loader;
pub mod orchestrator;
mod session;
pub mod timeline;

pub use config::{CameraPose, ViewerConfig, ViewportConfig};
pub use context::PlaybackContext;
pub use events::{FrameReport, ViewerEvent};
pub use layout::Decorations;
pub use loader::{InMemoryLoader, LoadedModel, ModelLoader};
pub use orchestrator::{Gesture, InstallRequest, ViewportOrchestrator};
pub use session::Viewer;
pub use timeline::{PlayState, TimelineController};
