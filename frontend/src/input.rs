use std::collections::HashMap;

use neso_core::core::console::Button;
use neso_core::input::{ButtonSink, ControlBounds, Gesture, GesturePhase, InputAggregator};
use sdl2::keyboard::Scancode;
use tracing::warn;

use crate::config::KeyBindings;

/// Maps SDL scancodes to controller buttons.
pub struct KeyMap {
    map: HashMap<Scancode, Button>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Build from configured scancode names. Unknown names are skipped
    /// with a warning so one typo does not disable the keyboard.
    pub fn from_bindings(bindings: &KeyBindings) -> Self {
        let mut km = Self::new();
        for button in Button::ALL {
            let name = bindings.get(button);
            match Scancode::from_name(name) {
                Some(sc) => km.bind(sc, button),
                None => warn!(key = name, button = button.name(), "unknown key name"),
            }
        }
        km
    }

    pub fn bind(&mut self, scancode: Scancode, button: Button) {
        self.map.insert(scancode, button);
    }

    pub fn get(&self, scancode: Scancode) -> Option<Button> {
        self.map.get(&scancode).copied()
    }
}

/// An on-screen control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Dpad,
    Button(Button),
}

/// Axis-aligned area in window coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn bounds(&self) -> ControlBounds {
        ControlBounds::new(self.width, self.height)
    }

    /// Position relative to the region's top-left corner.
    pub fn local(&self, x: f32, y: f32) -> (f32, f32) {
        (x - self.x, y - self.y)
    }
}

/// Where the touch controls sit for a given window size.
///
/// D-pad bottom-left, B and A bottom-right, Select and Start bottom-center,
/// all sized from the window's shorter side.
#[derive(Clone, Debug)]
pub struct TouchLayout {
    regions: Vec<(Control, Region)>,
}

impl TouchLayout {
    pub fn for_window(width: f32, height: f32) -> Self {
        let unit = width.min(height) / 4.0;
        let margin = unit / 8.0;
        let pad = unit * 1.25;
        let btn = unit / 2.0;
        let bottom = height - margin;

        let regions = vec![
            (Control::Dpad, Region::new(margin, bottom - pad, pad, pad)),
            (
                Control::Button(Button::A),
                Region::new(width - margin - btn, bottom - 2.0 * btn, btn, btn),
            ),
            (
                Control::Button(Button::B),
                Region::new(width - 2.0 * (margin + btn), bottom - btn, btn, btn),
            ),
            (
                Control::Button(Button::Select),
                Region::new(width / 2.0 - btn - margin / 2.0, bottom - btn / 2.0, btn, btn / 2.0),
            ),
            (
                Control::Button(Button::Start),
                Region::new(width / 2.0 + margin / 2.0, bottom - btn / 2.0, btn, btn / 2.0),
            ),
        ];
        Self { regions }
    }

    pub fn hit(&self, x: f32, y: f32) -> Option<(Control, Region)> {
        self.regions.iter().copied().find(|(_, r)| r.contains(x, y))
    }

    pub fn regions(&self) -> &[(Control, Region)] {
        &self.regions
    }
}

/// Identifies one pointer: the mouse, or a single finger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerId {
    Mouse,
    Finger(i64),
}

/// A gesture ready for the aggregator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Routed {
    pub control: Control,
    pub gesture: Gesture,
    pub bounds: ControlBounds,
}

impl Routed {
    pub fn dispatch<S: ButtonSink>(self, input: &mut InputAggregator<S>) {
        match self.control {
            Control::Dpad => input.dpad(self.gesture, self.bounds),
            Control::Button(button) => input.button(button, self.gesture),
        }
    }
}

/// Tracks which control each pointer pressed.
///
/// A pointer is captured by the control it went down on and keeps
/// reporting to it, in that control's coordinates, until it lifts.
#[derive(Default)]
pub struct PointerCapture {
    captured: HashMap<PointerId, (Control, Region)>,
}

impl PointerCapture {
    /// Route a pointer event at window position (`x`, `y`).
    ///
    /// Returns `None` for a press outside every control and for motion of
    /// a pointer that is not captured.
    pub fn route(
        &mut self,
        id: PointerId,
        phase: GesturePhase,
        x: f32,
        y: f32,
        layout: &TouchLayout,
    ) -> Option<Routed> {
        let (control, region) = match phase {
            GesturePhase::Down => {
                let hit = layout.hit(x, y)?;
                self.captured.insert(id, hit);
                hit
            }
            GesturePhase::Move => *self.captured.get(&id)?,
            GesturePhase::Up | GesturePhase::Cancel => self.captured.remove(&id)?,
        };
        let (lx, ly) = region.local(x, y);
        Some(Routed {
            control,
            gesture: Gesture::new(phase, lx, ly),
            bounds: region.bounds(),
        })
    }

    /// Drop every capture; the caller releases the buttons.
    pub fn clear(&mut self) {
        self.captured.clear();
    }

    pub fn is_captured(&self, id: PointerId) -> bool {
        self.captured.contains_key(&id)
    }
}
