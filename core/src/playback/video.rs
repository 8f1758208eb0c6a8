use std::sync::Arc;

use crate::core::console::{self, Console, Framebuffer, SharedConsole};
use crate::core::state::{PlaybackState, RunState};

/// Opaque black, the default letterbox fill.
pub const DEFAULT_BACKGROUND: u32 = 0xFF00_0000;

/// Axis-aligned rectangle in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole native frame.
    pub const fn frame() -> Self {
        Self::new(0, 0, Framebuffer::WIDTH, Framebuffer::HEIGHT)
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Where the 256x240 frame lands inside a `width` x `height` surface.
///
/// The frame is scaled uniformly by min(width/256, height/240) and centered;
/// the bars left over on either axis are the caller's background fill.
pub fn letterbox(width: u32, height: u32) -> Rect {
    let scale = f32::min(
        width as f32 / Framebuffer::WIDTH as f32,
        height as f32 / Framebuffer::HEIGHT as f32,
    );
    let w = ((Framebuffer::WIDTH as f32 * scale) as u32).min(width);
    let h = ((Framebuffer::HEIGHT as f32 * scale) as u32).min(height);
    let left = (width - w) / 2;
    let top = (height - h) / 2;
    Rect::new(left as i32, top as i32, w, h)
}

/// A display surface the frame loop presents to.
///
/// `acquire` and `present` form one critical section within a single tick:
/// the loop calls `present` at most once, right after a successful
/// `acquire`, and never holds the surface between ticks.
pub trait DisplaySurface {
    /// Lock the surface for drawing and report its size in pixels.
    /// `None` when the surface is momentarily unavailable.
    fn acquire(&mut self) -> Option<(u32, u32)>;

    /// Fill the surface with `background`, draw `src` of `frame` scaled into
    /// `dst`, and commit. Failures are the surface's to swallow.
    fn present(&mut self, frame: &Framebuffer, src: Rect, dst: Rect, background: u32);
}

/// Result of one frame loop tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Not running: nothing stepped, nothing drawn.
    Idle,
    /// Stepped and rendered, but the surface was unavailable.
    Skipped,
    /// Stepped, rendered and presented.
    Presented,
}

impl FrameOutcome {
    /// True if the console advanced a frame this tick.
    pub const fn stepped(self) -> bool {
        !matches!(self, FrameOutcome::Idle)
    }
}

/// Fixed-cadence video loop body: step, render, letterbox, present.
///
/// The loop does not own a timer; the host calls [`FrameLoop::tick`] each
/// time its [`Cadence`](crate::playback::Cadence) fires and re-arms the
/// cadence afterwards whatever the outcome.
pub struct FrameLoop<C: Console> {
    console: SharedConsole<C>,
    state: Arc<PlaybackState>,
    framebuffer: Framebuffer,
    background: u32,
    frames: u64,
}

impl<C: Console> FrameLoop<C> {
    pub fn new(console: SharedConsole<C>, state: Arc<PlaybackState>, background: u32) -> Self {
        Self {
            console,
            state,
            framebuffer: Framebuffer::new(),
            background,
            frames: 0,
        }
    }

    pub fn tick<S: DisplaySurface + ?Sized>(&mut self, surface: &mut S) -> FrameOutcome {
        if self.state.snapshot() != RunState::Running {
            return FrameOutcome::Idle;
        }

        {
            let mut console = console::lock(&self.console);
            console.step_frame();
            console.render_into(self.framebuffer.pixels_mut());
        }
        self.frames += 1;

        let Some((width, height)) = surface.acquire() else {
            return FrameOutcome::Skipped;
        };
        let dst = letterbox(width, height);
        if dst.is_empty() {
            return FrameOutcome::Skipped;
        }
        surface.present(&self.framebuffer, Rect::frame(), dst, self.background);
        FrameOutcome::Presented
    }

    /// Frames stepped since the loop was created.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The most recently rendered frame.
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn set_background(&mut self, background: u32) {
        self.background = background;
    }
}
