/// Notifications for the surrounding UI, drained once per tick.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    Loaded { slot: usize },
    LoadFailed { slot: usize, message: String },
    Activated { slot: usize },
    PlaybackToggled { playing: bool },
    Swapped { from: usize, to: usize },
}

/// What the UI needs after a tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub active: Option<usize>,
    /// Progress of the active context, `0..=1`.
    pub progress: f32,
    pub is_playing: bool,
    /// Clamped wall-clock delta used for this tick, in seconds.
    pub dt: f32,
    pub events: Vec<ViewerEvent>,
}
