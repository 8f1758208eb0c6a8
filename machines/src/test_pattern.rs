use neso_core::core::console::{Button, Console, SCREEN_HEIGHT, SCREEN_WIDTH};
use neso_core::core::error::LoadError;
use neso_core::device::AudioRing;
use neso_core::device::audio_ring::SILENCE;

use crate::registry::ConsoleEntry;

/// Output sample rate of the tone generator.
pub const SAMPLE_RATE: u32 = 44_100;
/// Frames per second the generator assumes when sizing audio bursts.
pub const FRAME_RATE: u32 = 60;
/// Samples pushed into the ring per stepped frame.
pub const SAMPLES_PER_FRAME: u32 = SAMPLE_RATE / FRAME_RATE;

/// Largest program image accepted.
pub const MAX_PROGRAM_SIZE: usize = 1 << 20;

/// Peak deviation from silence while A is held.
const TONE_AMPLITUDE: u8 = 48;

// Bottom strip of button lamps
const LAMP_SIZE: u32 = 16;
const LAMP_TOP: u32 = SCREEN_HEIGHT - 24;
const LAMP_LEFT: u32 = 8;
const LAMP_PITCH: u32 = 30;
const LAMP_ON: u32 = 0xFFFF_FFFF;
const LAMP_OFF: u32 = 0xFF40_4040;

/// SMPTE-ish bar colors, rotated by the program seed.
const BARS: [u32; 8] = [
    0xFFC0_C0C0, // gray
    0xFFC0_C000, // yellow
    0xFF00_C0C0, // cyan
    0xFF00_C000, // green
    0xFFC0_00C0, // magenta
    0xFFC0_0000, // red
    0xFF00_00C0, // blue
    0xFF10_1010, // black
];

/// Diagnostic console: scrolling color bars, one lamp per held button, and
/// a square-wave tone whose pitch follows the d-pad (audible while A is
/// held).
///
/// It stands in for a real emulation core when exercising the playback
/// scheduler: every frame step produces exactly one frame's worth of audio
/// into an [`AudioRing`], which is the burst pattern the streamer's warmup
/// cushion is designed around.
pub struct TestPatternConsole {
    frame: u64,
    buttons: u8,
    ring: AudioRing,
    phase: u32, // samples since reset, drives the square wave
    seed: u8,
    program_len: usize,
}

impl TestPatternConsole {
    pub fn new() -> Self {
        Self {
            frame: 0,
            buttons: 0,
            ring: AudioRing::new(),
            phase: 0,
            seed: 0,
            program_len: 0,
        }
    }

    /// Frames stepped since the last reset.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Button state vector, bit N = [`Button::bit`].
    pub fn buttons(&self) -> u8 {
        self.buttons
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.buttons & (1 << button.bit()) != 0
    }

    /// Size of the loaded program, 0 if none.
    pub fn program_len(&self) -> usize {
        self.program_len
    }

    /// Tone frequency for the current d-pad state.
    pub fn tone_hz(&self) -> u32 {
        if self.is_pressed(Button::Up) {
            880
        } else if self.is_pressed(Button::Right) {
            660
        } else if self.is_pressed(Button::Left) {
            330
        } else if self.is_pressed(Button::Down) {
            220
        } else {
            440
        }
    }

    fn generate_audio(&mut self) {
        let period = (SAMPLE_RATE / self.tone_hz()).max(2);
        let amplitude = if self.is_pressed(Button::A) {
            TONE_AMPLITUDE
        } else {
            0
        };
        for _ in 0..SAMPLES_PER_FRAME {
            let high = self.phase % period < period / 2;
            let sample = if high {
                SILENCE + amplitude
            } else {
                SILENCE - amplitude
            };
            self.ring.push(sample);
            self.phase = self.phase.wrapping_add(1);
        }
    }

    fn bar_color(&self, x: u32) -> u32 {
        let scrolled = (x as u64 + self.frame) % SCREEN_WIDTH as u64;
        let bar = (scrolled as u32 * BARS.len() as u32 / SCREEN_WIDTH) as usize;
        BARS[(bar + self.seed as usize) % BARS.len()]
    }

    fn lamp_at(&self, x: u32, y: u32) -> Option<u32> {
        if !(LAMP_TOP..LAMP_TOP + LAMP_SIZE).contains(&y) || x < LAMP_LEFT {
            return None;
        }
        let offset = x - LAMP_LEFT;
        let index = offset / LAMP_PITCH;
        if index >= 8 || offset % LAMP_PITCH >= LAMP_SIZE {
            return None;
        }
        let lit = self.buttons & (1 << index) != 0;
        Some(if lit { LAMP_ON } else { LAMP_OFF })
    }
}

impl Default for TestPatternConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TestPatternConsole {
    fn name(&self) -> &str {
        "pattern"
    }

    fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.is_empty() {
            return Err(LoadError::Empty);
        }
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(LoadError::TooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        self.seed = program.iter().fold(0u8, |acc, &b| acc.wrapping_add(b)) % BARS.len() as u8;
        self.program_len = program.len();
        self.reset();
        Ok(())
    }

    fn step_frame(&mut self) {
        self.frame += 1;
        self.generate_audio();
    }

    fn render_into(&self, buffer: &mut [u32]) {
        let width = SCREEN_WIDTH as usize;
        for (y, row) in buffer
            .chunks_exact_mut(width)
            .take(SCREEN_HEIGHT as usize)
            .enumerate()
        {
            for (x, pixel) in row.iter_mut().enumerate() {
                let (x, y) = (x as u32, y as u32);
                *pixel = self.lamp_at(x, y).unwrap_or_else(|| self.bar_color(x));
            }
        }
    }

    fn set_button(&mut self, button: Button, pressed: bool) {
        if pressed {
            self.buttons |= 1 << button.bit();
        } else {
            self.buttons &= !(1 << button.bit());
        }
    }

    fn audio_buffer_level(&self) -> u32 {
        self.ring.level_percent()
    }

    fn drain_audio_samples(&mut self, out: &mut [u8]) -> usize {
        self.ring.read(out)
    }

    fn reset(&mut self) {
        self.frame = 0;
        self.phase = 0;
        self.ring.clear();
    }
}

// ---------------------------------------------------------------------------
// Console registry
// ---------------------------------------------------------------------------

fn create_console() -> Box<dyn Console> {
    Box::new(TestPatternConsole::new())
}

inventory::submit! {
    ConsoleEntry::new(
        "pattern",
        "color bars, button lamps and a d-pad controlled tone",
        create_console,
    )
}
