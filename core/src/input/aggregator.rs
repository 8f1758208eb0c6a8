use crate::core::console::Button;
use crate::input::{ButtonSink, ControlBounds, Gesture, dpad::resolve_direction};

/// Converts gestures and key events into button set operations.
///
/// Every call is forwarded to the sink immediately, so input latency is
/// bounded by event dispatch rather than by the frame cadence.
pub struct InputAggregator<S: ButtonSink> {
    sink: S,
}

impl<S: ButtonSink> InputAggregator<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Handle a gesture on the d-pad control.
    ///
    /// Release (Up/Cancel) clears all four directions. Press and move clear
    /// all four and then assert exactly one, so a diagonal drag never holds
    /// two directions at once.
    pub fn dpad(&mut self, gesture: Gesture, bounds: ControlBounds) {
        self.clear_directions();
        if !gesture.phase.is_held() {
            return;
        }
        if let Some((x, y)) = bounds.normalize(gesture.x, gesture.y) {
            self.sink.set_button(resolve_direction(x, y), true);
        }
    }

    /// Handle a gesture on a single-button control (A, B, Select, Start).
    pub fn button(&mut self, button: Button, gesture: Gesture) {
        self.sink.set_button(button, gesture.phase.is_held());
    }

    /// Handle a keyboard key bound to `button`.
    ///
    /// Pressing a direction releases the other three first.
    pub fn key(&mut self, button: Button, pressed: bool) {
        if pressed && button.is_direction() {
            for other in Button::DIRECTIONS {
                if other != button {
                    self.sink.set_button(other, false);
                }
            }
        }
        self.sink.set_button(button, pressed);
    }

    /// Release every button.
    pub fn release_all(&mut self) {
        for button in Button::ALL {
            self.sink.set_button(button, false);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn clear_directions(&mut self) {
        for dir in Button::DIRECTIONS {
            self.sink.set_button(dir, false);
        }
    }
}
