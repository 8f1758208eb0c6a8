#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use neso_core::core::console::{Button, Console, Framebuffer};
use neso_core::core::error::LoadError;
use neso_core::playback::{AudioSink, DisplaySurface, Rect};

/// Console double driven by scripted buffer levels and drain sizes.
///
/// Once a script runs dry, levels read as `idle_level` and drains return 0.
#[derive(Default)]
pub struct ScriptedConsole {
    pub levels: RefCell<VecDeque<u32>>,
    pub drains: VecDeque<usize>,
    pub idle_level: u32,
    pub steps: u32,
    pub renders: Cell<u32>,
    pub level_queries: Cell<u32>,
    pub drain_calls: u32,
    pub largest_drain_request: usize,
    pub buttons: [bool; 8],
    pub program: Option<Vec<u8>>,
}

impl ScriptedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_levels(mut self, levels: &[u32]) -> Self {
        self.levels = RefCell::new(levels.iter().copied().collect());
        self
    }

    pub fn with_drains(mut self, drains: &[usize]) -> Self {
        self.drains = drains.iter().copied().collect();
        self
    }

    pub fn with_idle_level(mut self, level: u32) -> Self {
        self.idle_level = level;
        self
    }

    /// Pixel value rendered after `steps` frames.
    pub fn frame_color(steps: u32) -> u32 {
        0xFF00_0000 | steps
    }
}

impl Console for ScriptedConsole {
    fn name(&self) -> &str {
        "scripted"
    }

    fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.is_empty() {
            return Err(LoadError::Empty);
        }
        self.program = Some(program.to_vec());
        Ok(())
    }

    fn step_frame(&mut self) {
        self.steps += 1;
    }

    fn render_into(&self, buffer: &mut [u32]) {
        self.renders.set(self.renders.get() + 1);
        buffer.fill(Self::frame_color(self.steps));
    }

    fn set_button(&mut self, button: Button, pressed: bool) {
        self.buttons[button.bit() as usize] = pressed;
    }

    fn audio_buffer_level(&self) -> u32 {
        self.level_queries.set(self.level_queries.get() + 1);
        self.levels.borrow_mut().pop_front().unwrap_or(self.idle_level)
    }

    fn drain_audio_samples(&mut self, out: &mut [u8]) -> usize {
        self.drain_calls += 1;
        self.largest_drain_request = self.largest_drain_request.max(out.len());
        let n = self.drains.pop_front().unwrap_or(0).min(out.len());
        out[..n].fill(0x80);
        n
    }

    fn reset(&mut self) {
        self.steps = 0;
    }
}

/// Non-blocking sink that records the size of every write. Clones share
/// the same log.
#[derive(Clone, Default)]
pub struct RecordingSink {
    writes: Arc<Mutex<Vec<usize>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<usize> {
        self.writes.lock().unwrap().clone()
    }

    pub fn total_bytes(&self) -> usize {
        self.writes.lock().unwrap().iter().sum()
    }
}

impl AudioSink for RecordingSink {
    fn write(&mut self, samples: &[u8]) {
        self.writes.lock().unwrap().push(samples.len());
    }
}

/// One recorded `present` call.
#[derive(Clone, Debug, PartialEq)]
pub struct Presented {
    pub src: Rect,
    pub dst: Rect,
    pub background: u32,
    pub first_pixel: u32,
}

/// Display surface double. `size = None` simulates an unavailable surface.
pub struct FakeSurface {
    pub size: Option<(u32, u32)>,
    pub acquires: u32,
    pub presented: Vec<Presented>,
}

impl FakeSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Some((width, height)),
            acquires: 0,
            presented: Vec::new(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            size: None,
            acquires: 0,
            presented: Vec::new(),
        }
    }
}

impl DisplaySurface for FakeSurface {
    fn acquire(&mut self) -> Option<(u32, u32)> {
        self.acquires += 1;
        self.size
    }

    fn present(&mut self, frame: &Framebuffer, src: Rect, dst: Rect, background: u32) {
        self.presented.push(Presented {
            src,
            dst,
            background,
            first_pixel: frame.pixel(0, 0),
        });
    }
}
