//! Pointer gestures and keyboard events → discrete controller buttons.

pub mod aggregator;
pub mod dpad;

pub use aggregator::InputAggregator;
pub use dpad::resolve_direction;

use std::sync::Mutex;

use crate::core::console::{self, Button, Console};

/// Phase of a pointer gesture on one on-screen control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    Down,
    Move,
    Up,
    Cancel,
}

impl GesturePhase {
    /// Down and Move keep a control held; Up and Cancel release it.
    pub const fn is_held(self) -> bool {
        matches!(self, GesturePhase::Down | GesturePhase::Move)
    }
}

/// A pointer event in the local coordinates of the control it targets
/// (origin at the control's top-left corner).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gesture {
    pub phase: GesturePhase,
    pub x: f32,
    pub y: f32,
}

impl Gesture {
    pub const fn new(phase: GesturePhase, x: f32, y: f32) -> Self {
        Self { phase, x, y }
    }
}

/// Size of the control a gesture targets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlBounds {
    pub width: f32,
    pub height: f32,
}

impl ControlBounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Map a local position to [-0.5, 0.5] on both axes (0 at the center).
    /// Returns `None` for a control with no area.
    pub fn normalize(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some((x / self.width - 0.5, y / self.height - 0.5))
    }
}

/// Anything that accepts button set operations.
///
/// Sinks are write-only: the aggregator never reads button state back.
pub trait ButtonSink {
    fn set_button(&mut self, button: Button, pressed: bool);
}

impl<C: Console + ?Sized> ButtonSink for std::sync::Arc<Mutex<C>> {
    fn set_button(&mut self, button: Button, pressed: bool) {
        console::lock(self).set_button(button, pressed);
    }
}
