mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::{FakeSurface, ScriptedConsole};
use neso_core::core::console;
use neso_core::core::state::PlaybackState;
use neso_core::playback::{
    Cadence, DEFAULT_BACKGROUND, FRAME_PERIOD, FrameLoop, FrameOutcome, Rect, letterbox,
};

fn setup() -> (
    FrameLoop<ScriptedConsole>,
    neso_core::core::SharedConsole<ScriptedConsole>,
    Arc<PlaybackState>,
) {
    let shared = console::share(ScriptedConsole::new());
    let state = Arc::new(PlaybackState::new());
    let frame_loop = FrameLoop::new(shared.clone(), state.clone(), DEFAULT_BACKGROUND);
    (frame_loop, shared, state)
}

#[test]
fn test_stopped_tick_is_idle() {
    let (mut frames, shared, _state) = setup();
    let mut surface = FakeSurface::new(256, 240);

    assert_eq!(frames.tick(&mut surface), FrameOutcome::Idle);
    let c = console::lock(&shared);
    assert_eq!(c.steps, 0);
    assert_eq!(c.renders.get(), 0);
    assert_eq!(surface.acquires, 0);
    assert!(surface.presented.is_empty());
}

#[test]
fn test_paused_tick_is_idle() {
    let (mut frames, shared, state) = setup();
    state.set_running(true);
    state.set_paused(true);
    let mut surface = FakeSurface::new(256, 240);

    for _ in 0..3 {
        assert_eq!(frames.tick(&mut surface), FrameOutcome::Idle);
    }
    assert_eq!(console::lock(&shared).steps, 0);
    assert!(surface.presented.is_empty());
}

#[test]
fn test_running_tick_steps_renders_presents() {
    let (mut frames, shared, state) = setup();
    state.set_running(true);
    let mut surface = FakeSurface::new(1000, 480);

    assert_eq!(frames.tick(&mut surface), FrameOutcome::Presented);
    {
        let c = console::lock(&shared);
        assert_eq!(c.steps, 1);
        assert_eq!(c.renders.get(), 1);
    }

    let p = &surface.presented[0];
    assert_eq!(p.src, Rect::frame());
    assert_eq!(p.dst, letterbox(1000, 480));
    assert_eq!(p.dst, Rect::new(244, 0, 512, 480));
    assert_eq!(p.background, DEFAULT_BACKGROUND);
    assert_eq!(p.first_pixel, ScriptedConsole::frame_color(1));
}

#[test]
fn test_framebuffer_is_reused_in_place() {
    let (mut frames, _shared, state) = setup();
    state.set_running(true);
    let mut surface = FakeSurface::new(256, 240);

    let before = frames.framebuffer().pixels().as_ptr();
    frames.tick(&mut surface);
    frames.tick(&mut surface);
    assert_eq!(frames.framebuffer().pixels().as_ptr(), before);
    assert_eq!(frames.framebuffer().pixel(255, 239), ScriptedConsole::frame_color(2));
}

#[test]
fn test_unavailable_surface_skips_silently() {
    let (mut frames, shared, state) = setup();
    state.set_running(true);
    let mut surface = FakeSurface::unavailable();

    assert_eq!(frames.tick(&mut surface), FrameOutcome::Skipped);
    assert_eq!(frames.tick(&mut surface), FrameOutcome::Skipped);
    // The console still advanced; the dropped frames are not retried.
    assert_eq!(console::lock(&shared).steps, 2);
    assert!(surface.presented.is_empty());

    surface.size = Some((512, 480));
    assert_eq!(frames.tick(&mut surface), FrameOutcome::Presented);
    assert_eq!(surface.presented.len(), 1);
    assert_eq!(surface.presented[0].first_pixel, ScriptedConsole::frame_color(3));
}

#[test]
fn test_zero_area_surface_skips() {
    let (mut frames, _shared, state) = setup();
    state.set_running(true);
    let mut surface = FakeSurface::new(0, 0);
    assert_eq!(frames.tick(&mut surface), FrameOutcome::Skipped);
    assert!(surface.presented.is_empty());
}

#[test]
fn test_custom_background() {
    let (mut frames, _shared, state) = setup();
    state.set_running(true);
    frames.set_background(0xFF20_2020);
    let mut surface = FakeSurface::new(300, 300);
    frames.tick(&mut surface);
    assert_eq!(surface.presented[0].background, 0xFF20_2020);
}

#[test]
fn test_pause_window_renders_nothing() {
    // Ticks at a steady 16 ms; state flips Running -> Paused -> Running.
    let (mut frames, shared, state) = setup();
    state.set_running(true);
    let mut surface = FakeSurface::new(256, 240);

    let t0 = Instant::now();
    let mut cadence = Cadence::new(FRAME_PERIOD, t0);
    let mut outcomes = Vec::new();
    for i in 0..9u32 {
        let now = t0 + FRAME_PERIOD * i;
        match i {
            3 => {
                state.set_paused(true);
            }
            6 => {
                state.set_paused(false);
            }
            _ => {}
        }
        assert!(cadence.due(now));
        outcomes.push(frames.tick(&mut surface));
        cadence.rearm(now);
    }

    use FrameOutcome::{Idle, Presented};
    assert_eq!(
        outcomes,
        vec![Presented, Presented, Presented, Idle, Idle, Idle, Presented, Presented, Presented]
    );
    assert_eq!(console::lock(&shared).steps, 6);
    assert_eq!(frames.frames(), 6);
    // Frames resume from where they stopped: no skipped-ahead steps.
    assert_eq!(surface.presented[3].first_pixel, ScriptedConsole::frame_color(4));
}

#[test]
fn test_cadence_rearms_regardless_of_outcome() {
    let (mut frames, _shared, state) = setup();
    let mut surface = FakeSurface::unavailable();
    let t0 = Instant::now();
    let mut cadence = Cadence::new(Duration::from_millis(16), t0);

    // Idle tick
    assert_eq!(frames.tick(&mut surface), FrameOutcome::Idle);
    cadence.rearm(t0);
    assert_eq!(cadence.next_deadline(), t0 + Duration::from_millis(16));

    // Skipped tick
    state.set_running(true);
    let t1 = cadence.next_deadline();
    assert_eq!(frames.tick(&mut surface), FrameOutcome::Skipped);
    cadence.rearm(t1);
    assert_eq!(cadence.next_deadline(), t1 + Duration::from_millis(16));
}
