//! Platform-agnostic pointer events
//!
//! Platform adapters (the winit runner, tests, a web host) translate their
//! native events into these types and queue them on the viewer.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Click,
}

/// Element the event was dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerTarget {
    #[default]
    Surface,
    Other,
}

/// One pointer event in client coordinates (logical pixels, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Vec2,
    pub target: PointerTarget,
}

impl PointerEvent {
    #[must_use]
    pub fn new(kind: PointerKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            target: PointerTarget::Surface,
        }
    }

    #[must_use]
    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Down, Vec2::new(x, y))
    }

    #[must_use]
    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Move, Vec2::new(x, y))
    }

    #[must_use]
    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Up, Vec2::new(x, y))
    }

    #[must_use]
    pub fn click(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Click, Vec2::new(x, y))
    }

    #[must_use]
    pub fn with_target(mut self, target: PointerTarget) -> Self {
        self.target = target;
        self
    }
}

/// Bounding rectangle of the render surface in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    #[must_use]
    pub fn aspect(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width / self.height
        }
    }

    /// Client position to normalized device coordinates (y up, -1..1).
    /// `None` for a collapsed surface.
    #[must_use]
    pub fn to_ndc(&self, position: Vec2) -> Option<Vec2> {
        if self.is_empty() {
            return None;
        }
        Some(Vec2::new(
            (position.x - self.x) / self.width * 2.0 - 1.0,
            -((position.y - self.y) / self.height) * 2.0 + 1.0,
        ))
    }
}

impl Default for SurfaceRect {
    fn default() -> Self {
        Self::from_size(1.0, 1.0)
    }
}
