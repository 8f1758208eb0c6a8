use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use neso_core::core::console::{self, Console, Framebuffer, SharedConsole};
use neso_core::input::{GesturePhase, InputAggregator};
use neso_core::playback::{Cadence, FrameOutcome, Session};
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Scancode;
use sdl2::mouse::MouseButton;
use tracing::{debug, info, warn};

use crate::audio;
use crate::config::Config;
use crate::input::{KeyMap, PointerCapture, PointerId, TouchLayout};
use crate::rom_path;
use crate::video::Video;

/// SDL reports mouse events synthesized from touches with this id.
const TOUCH_MOUSE_ID: u32 = u32::MAX;

/// Frames-per-second over a sliding one-second window.
struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Count a stepped frame; returns true when the displayed value changed.
    fn record(&mut self, now: Instant) -> bool {
        self.frames += 1;
        let elapsed = now.duration_since(self.window_start);
        if elapsed < Duration::from_secs(1) {
            return false;
        }
        self.fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        true
    }

    fn text(&self) -> String {
        format!("{:.1}", self.fps)
    }
}

type BoxedConsole = Box<dyn Console>;

/// Everything the event handler touches.
struct Host<'a> {
    session: &'a Session<BoxedConsole>,
    video: Video,
    input: InputAggregator<SharedConsole<BoxedConsole>>,
    capture: PointerCapture,
    layout: TouchLayout,
    key_map: KeyMap,
    background: u32,
}

enum Flow {
    Continue,
    Quit,
}

impl Host<'_> {
    fn handle(&mut self, event: Event, last_frame: &Framebuffer) -> Flow {
        match event {
            Event::Quit { .. }
            | Event::KeyDown {
                scancode: Some(Scancode::Escape),
                ..
            } => return Flow::Quit,

            Event::KeyDown {
                scancode: Some(Scancode::P),
                repeat: false,
                ..
            } => {
                self.session.state().toggle_paused();
            }

            Event::KeyDown {
                scancode: Some(sc),
                repeat: false,
                ..
            } => {
                if let Some(button) = self.key_map.get(sc) {
                    self.input.key(button, true);
                }
            }

            Event::KeyUp {
                scancode: Some(sc), ..
            } => {
                if let Some(button) = self.key_map.get(sc) {
                    self.input.key(button, false);
                }
            }

            Event::Window { win_event, .. } => self.window_event(win_event, last_frame),

            Event::MouseButtonDown {
                which,
                mouse_btn: MouseButton::Left,
                x,
                y,
                ..
            } if which != TOUCH_MOUSE_ID => {
                self.pointer(PointerId::Mouse, GesturePhase::Down, x as f32, y as f32);
            }

            Event::MouseMotion { which, x, y, .. } if which != TOUCH_MOUSE_ID => {
                self.pointer(PointerId::Mouse, GesturePhase::Move, x as f32, y as f32);
            }

            Event::MouseButtonUp {
                which,
                mouse_btn: MouseButton::Left,
                x,
                y,
                ..
            } if which != TOUCH_MOUSE_ID => {
                self.pointer(PointerId::Mouse, GesturePhase::Up, x as f32, y as f32);
            }

            Event::FingerDown { finger_id, x, y, .. } => {
                self.finger(finger_id, GesturePhase::Down, x, y);
            }

            Event::FingerMotion { finger_id, x, y, .. } => {
                self.finger(finger_id, GesturePhase::Move, x, y);
            }

            Event::FingerUp { finger_id, x, y, .. } => {
                self.finger(finger_id, GesturePhase::Up, x, y);
            }

            Event::DropFile { filename, .. } => self.load(&filename),

            _ => {}
        }
        Flow::Continue
    }

    fn window_event(&mut self, event: WindowEvent, last_frame: &Framebuffer) {
        let state = self.session.state();
        match event {
            WindowEvent::Shown | WindowEvent::Restored => {
                state.set_running(true);
            }
            WindowEvent::Hidden | WindowEvent::Minimized => {
                state.set_running(false);
            }
            WindowEvent::Exposed => {
                state.set_running(true);
                if !state.is_running() {
                    self.video.redraw(last_frame, self.background);
                }
            }
            WindowEvent::SizeChanged(..) => {
                let (w, h) = self.video.window_size();
                self.layout = TouchLayout::for_window(w, h);
                if !state.is_running() {
                    self.video.redraw(last_frame, self.background);
                }
            }
            WindowEvent::FocusLost => {
                self.capture.clear();
                self.input.release_all();
            }
            _ => {}
        }
    }

    fn pointer(&mut self, id: PointerId, phase: GesturePhase, x: f32, y: f32) {
        if let Some(routed) = self.capture.route(id, phase, x, y, &self.layout) {
            routed.dispatch(&mut self.input);
        }
    }

    /// Finger positions arrive normalized to the window.
    fn finger(&mut self, finger_id: i64, phase: GesturePhase, x: f32, y: f32) {
        let (w, h) = self.video.window_size();
        self.pointer(PointerId::Finger(finger_id), phase, x * w, y * h);
    }

    fn load(&mut self, path: &str) {
        let program = match rom_path::load_program(Path::new(path)) {
            Ok(program) => program,
            Err(e) => {
                warn!(error = %e, "cannot read dropped file");
                return;
            }
        };
        self.capture.clear();
        // load errors are logged by the session
        let _ = self.session.load_program(&program);
    }
}

/// Open a window, stream audio, and drive `session` until the user quits.
///
/// Returns the console once everything is torn down.
pub fn run(mut session: Session<BoxedConsole>, config: &Config) -> Result<Option<BoxedConsole>> {
    let sdl_context = sdl2::init().map_err(|e| anyhow!(e)).context("SDL init")?;
    let sdl_video = sdl_context
        .video()
        .map_err(|e| anyhow!(e))
        .context("SDL video")?;

    let title = format!("neso - {}", console::lock(session.console()).name());
    let video = Video::new(&sdl_video, &title, config.video.scale)
        .map_err(|e| anyhow!(e))
        .context("create window")?;

    let audio_device = if config.audio.enabled {
        match sdl_context.audio().and_then(|sdl_audio| {
            audio::init(
                &sdl_audio,
                config.audio.sample_rate,
                config.audio.queue_samples,
            )
        }) {
            Ok((device, sink, fade_out)) => {
                session.spawn_audio(sink, config.audio.timing())?;
                Some((device, fade_out))
            }
            Err(e) => {
                warn!(error = %e, "audio unavailable, continuing without sound");
                None
            }
        }
    } else {
        None
    };

    let mut event_pump = sdl_context
        .event_pump()
        .map_err(|e| anyhow!(e))
        .context("SDL event pump")?;

    let (w, h) = video.window_size();
    let mut frames = session.frame_loop(config.video.background);
    let mut host = Host {
        session: &session,
        video,
        input: session.input(),
        capture: PointerCapture::default(),
        layout: TouchLayout::for_window(w, h),
        key_map: KeyMap::from_bindings(&config.keys),
        background: config.video.background,
    };

    let mut cadence = Cadence::new(config.frame_period(), Instant::now());
    let mut fps = FpsCounter::new(Instant::now());
    host.session.state().set_running(true);
    info!("entering main loop");

    'main: loop {
        let wait = cadence.remaining(Instant::now());
        let first = if wait.is_zero() {
            event_pump.poll_event()
        } else {
            event_pump.wait_event_timeout(wait.as_millis().max(1) as u32)
        };
        let pending = first.into_iter().chain(std::iter::from_fn(|| event_pump.poll_event()));
        for event in pending {
            if let Flow::Quit = host.handle(event, frames.framebuffer()) {
                break 'main;
            }
        }

        let now = Instant::now();
        if !cadence.due(now) {
            continue;
        }
        let outcome = frames.tick(&mut host.video);
        if outcome == FrameOutcome::Skipped {
            debug!("surface unavailable, frame not presented");
        }
        let now = Instant::now();
        if config.video.show_fps && outcome.stepped() && fps.record(now) {
            host.video.set_fps_text(Some(fps.text()));
        }
        cadence.rearm(now);
    }

    info!(frames = frames.frames(), "leaving main loop");
    host.input.release_all();
    drop(frames);
    drop(host);

    // Stop the streamer while the device still drains the queue, then fade.
    let console = session.shutdown();
    if let Some((device, fade_out)) = audio_device {
        fade_out.store(true, std::sync::atomic::Ordering::Relaxed);
        std::thread::sleep(audio::fade_out_duration());
        drop(device);
    }
    Ok(console)
}
