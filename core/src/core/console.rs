use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::error::LoadError;

/// Native display width in pixels.
pub const SCREEN_WIDTH: u32 = 256;
/// Native display height in pixels.
pub const SCREEN_HEIGHT: u32 = 240;

/// One of the eight controller buttons. The discriminant is the bit index
/// the console uses for its button state vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Button {
    A = 0,
    B = 1,
    Select = 2,
    Start = 3,
    Up = 4,
    Down = 5,
    Left = 6,
    Right = 7,
}

impl Button {
    /// All buttons in bit order.
    pub const ALL: [Button; 8] = [
        Button::A,
        Button::B,
        Button::Select,
        Button::Start,
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
    ];

    /// The four d-pad directions.
    pub const DIRECTIONS: [Button; 4] = [Button::Up, Button::Down, Button::Left, Button::Right];

    /// Bit index (0..=7) in the controller state vector.
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Button for a bit index, if in range.
    pub fn from_bit(bit: u8) -> Option<Self> {
        Self::ALL.get(bit as usize).copied()
    }

    pub const fn is_direction(self) -> bool {
        matches!(self, Button::Up | Button::Down | Button::Left | Button::Right)
    }

    /// Human-readable name, also used as the config key.
    pub const fn name(self) -> &'static str {
        match self {
            Button::A => "a",
            Button::B => "b",
            Button::Select => "select",
            Button::Start => "start",
            Button::Up => "up",
            Button::Down => "down",
            Button::Left => "left",
            Button::Right => "right",
        }
    }
}

/// The stepped emulation core driven by the playback scheduler.
///
/// A console owns its CPU/PPU/APU state and an internal audio sample buffer.
/// The scheduler never looks inside: it steps whole frames, copies pixels
/// out, drains PCM bytes, and latches button state. Implementations must not
/// panic on any of these calls; the scheduler has no recovery path for a
/// faulting core.
///
/// Consoles are shared between the video loop (on the host thread) and the
/// audio streamer (on its own thread) behind a [`SharedConsole`] lock, so
/// they must be `Send`.
pub trait Console: Send {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    /// Load a program image and reset. The bytes are opaque to the scheduler.
    fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError>;

    /// Advance the machine by exactly one video frame's worth of cycles.
    fn step_frame(&mut self);

    /// Copy the current picture into `buffer`.
    ///
    /// The buffer holds `SCREEN_WIDTH * SCREEN_HEIGHT` pixels, row-major,
    /// one `0xAARRGGBB` value per pixel.
    fn render_into(&self, buffer: &mut [u32]);

    /// Latch one controller button. Called per event, not per frame.
    fn set_button(&mut self, button: Button, pressed: bool);

    /// Fill level of the internal audio buffer as a percentage (0..=100).
    fn audio_buffer_level(&self) -> u32;

    /// Move up to `out.len()` buffered 8-bit unsigned PCM samples into `out`.
    /// Returns the number of bytes written; 0 means the buffer is empty.
    fn drain_audio_samples(&mut self, out: &mut [u8]) -> usize;

    /// Reset the machine to its power-on state, keeping the loaded program.
    fn reset(&mut self);
}

impl<C: Console + ?Sized> Console for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        (**self).load_program(program)
    }

    fn step_frame(&mut self) {
        (**self).step_frame()
    }

    fn render_into(&self, buffer: &mut [u32]) {
        (**self).render_into(buffer)
    }

    fn set_button(&mut self, button: Button, pressed: bool) {
        (**self).set_button(button, pressed)
    }

    fn audio_buffer_level(&self) -> u32 {
        (**self).audio_buffer_level()
    }

    fn drain_audio_samples(&mut self, out: &mut [u8]) -> usize {
        (**self).drain_audio_samples(out)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// A console shared between the frame loop and the audio streamer.
///
/// Every collaborator call takes the lock for the duration of that call
/// only. Neither loop holds it across a sleep or a sink write.
pub type SharedConsole<C> = Arc<Mutex<C>>;

/// Wrap a console for sharing.
pub fn share<C: Console>(console: C) -> SharedConsole<C> {
    Arc::new(Mutex::new(console))
}

/// Lock a shared console, recovering the guard if a previous holder panicked.
pub fn lock<C: ?Sized>(console: &Mutex<C>) -> MutexGuard<'_, C> {
    console.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The 256x240 pixel grid the frame loop renders into.
///
/// Allocated once and overwritten in place every tick.
pub struct Framebuffer {
    pixels: Box<[u32]>,
}

impl Framebuffer {
    pub const WIDTH: u32 = SCREEN_WIDTH;
    pub const HEIGHT: u32 = SCREEN_HEIGHT;
    pub const LEN: usize = (SCREEN_WIDTH * SCREEN_HEIGHT) as usize;

    pub fn new() -> Self {
        Self {
            pixels: vec![0; Self::LEN].into_boxed_slice(),
        }
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Pixel at (x, y). Panics if out of range.
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[(y * Self::WIDTH + x) as usize]
    }

    /// One row of pixels.
    pub fn row(&self, y: u32) -> &[u32] {
        let start = (y * Self::WIDTH) as usize;
        &self.pixels[start..start + Self::WIDTH as usize]
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_bits_match_controller_layout() {
        assert_eq!(Button::A.bit(), 0);
        assert_eq!(Button::Start.bit(), 3);
        assert_eq!(Button::Right.bit(), 7);
        for (i, b) in Button::ALL.iter().enumerate() {
            assert_eq!(b.bit() as usize, i);
            assert_eq!(Button::from_bit(i as u8), Some(*b));
        }
        assert_eq!(Button::from_bit(8), None);
    }

    #[test]
    fn only_dpad_buttons_are_directions() {
        let dirs: Vec<_> = Button::ALL.iter().filter(|b| b.is_direction()).collect();
        assert_eq!(dirs.len(), 4);
        assert!(!Button::Select.is_direction());
    }

    #[test]
    fn framebuffer_rows_are_row_major() {
        let mut fb = Framebuffer::new();
        assert_eq!(fb.pixels().len(), 256 * 240);
        fb.pixels_mut()[256 + 3] = 0xFF00_FF00;
        assert_eq!(fb.pixel(3, 1), 0xFF00_FF00);
        assert_eq!(fb.row(1)[3], 0xFF00_FF00);
        assert_eq!(fb.row(0)[3], 0);
    }
}
