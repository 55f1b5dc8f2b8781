//! Winit 输入事件适配器
//!
//! Translates winit window events into the viewer's pointer events and
//! keyboard commands.

use glam::Vec2;
use smallvec::SmallVec;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::input::{PointerEvent, PointerKind, PointerTarget};

/// Keyboard shortcuts understood by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    TogglePlayback,
    Activate(usize),
    NextCamera,
}

#[must_use]
pub fn translate_key(physical_key: PhysicalKey) -> Option<KeyCommand> {
    let PhysicalKey::Code(code) = physical_key else {
        return None;
    };

    let command = match code {
        KeyCode::Space => KeyCommand::TogglePlayback,
        KeyCode::KeyC => KeyCommand::NextCamera,
        KeyCode::Digit1 => KeyCommand::Activate(0),
        KeyCode::Digit2 => KeyCommand::Activate(1),
        KeyCode::Digit3 => KeyCommand::Activate(2),
        KeyCode::Digit4 => KeyCommand::Activate(3),
        KeyCode::Digit5 => KeyCommand::Activate(4),
        KeyCode::Digit6 => KeyCommand::Activate(5),
        KeyCode::Digit7 => KeyCommand::Activate(6),
        KeyCode::Digit8 => KeyCommand::Activate(7),
        KeyCode::Digit9 => KeyCommand::Activate(8),
        _ => return None,
    };
    Some(command)
}

/// Tracks the cursor so button events can carry a position.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    position: Vec2,
    scale_factor: f64,
}

impl PointerTracker {
    #[must_use]
    pub fn new(scale_factor: f64) -> Self {
        Self {
            position: Vec2::ZERO,
            scale_factor,
        }
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    /// Logical cursor position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Pointer events produced by `event`, in dispatch order.
    pub fn translate(&mut self, event: &WindowEvent) -> SmallVec<[PointerEvent; 2]> {
        let mut out = SmallVec::new();
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(self.scale_factor);
                self.position = Vec2::new(logical.x, logical.y);
                out.push(PointerEvent::new(PointerKind::Move, self.position));
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    out.push(PointerEvent::new(PointerKind::Down, self.position));
                }
                ElementState::Released => {
                    out.push(PointerEvent::new(PointerKind::Up, self.position));
                    out.push(PointerEvent::new(PointerKind::Click, self.position));
                }
            },
            WindowEvent::CursorLeft { .. } => {
                out.push(
                    PointerEvent::new(PointerKind::Up, self.position)
                        .with_target(PointerTarget::Other),
                );
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = *scale_factor;
            }
            _ => {}
        }
        out
    }
}
