//! Audio streaming controller.
//!
//! The console produces PCM in bursts (one frame's worth per video tick)
//! into its own ring; the sink consumes it at a fixed sample rate. The
//! streamer moves chunks between the two on a dedicated thread, using only
//! the ring's fill level as its signal:
//!
//! - while not running it idles and forgets any warmup;
//! - before writing anything it waits for the ring to reach a cushion
//!   threshold, so a resumed stream does not underrun immediately;
//! - once warmed up, the blocking sink write is the only pacing;
//! - an empty drain counts as starvation and re-arms the cushion rather than
//!   writing a partial chunk.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use thread_priority::{ThreadPriority, set_current_thread_priority};
use tracing::{debug, trace, warn};

use crate::core::console::{self, Console, SharedConsole};
use crate::core::state::{PlaybackState, RunState};

/// Blocking, rate-paced PCM output (8-bit unsigned mono).
///
/// `write` returns once the device has room for all of `samples`; the time
/// spent blocked is what paces the streamer.
pub trait AudioSink {
    fn write(&mut self, samples: &[u8]);
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn write(&mut self, samples: &[u8]) {
        (**self).write(samples)
    }
}

/// Polling intervals and thresholds for the streamer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioTiming {
    /// Sleep while stopped or paused.
    pub idle_poll: Duration,
    /// Sleep while waiting for the cushion to fill.
    pub warmup_poll: Duration,
    /// Sleep after an empty drain.
    pub starvation_backoff: Duration,
    /// Console buffer level (percent) required before the first write.
    pub warmup_threshold: u32,
    /// Capacity of the chunk buffer, in bytes.
    pub chunk_bytes: usize,
}

impl Default for AudioTiming {
    fn default() -> Self {
        Self {
            idle_poll: Duration::from_millis(20),
            warmup_poll: Duration::from_millis(10),
            starvation_backoff: Duration::from_millis(5),
            warmup_threshold: 30,
            chunk_bytes: 512,
        }
    }
}

/// What one streamer iteration did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioStep {
    /// Not running; warmup cleared.
    Idle,
    /// Waiting for the cushion; the console reported `level`.
    Filling { level: u32 },
    /// Drained and wrote this many bytes.
    Wrote(usize),
    /// Drain came back empty; warmup cleared.
    Starved,
}

impl AudioStep {
    /// How long to sleep before the next iteration. `None` after a write:
    /// the blocking sink already paced the loop.
    pub fn backoff(self, timing: &AudioTiming) -> Option<Duration> {
        match self {
            AudioStep::Idle => Some(timing.idle_poll),
            AudioStep::Filling { .. } => Some(timing.warmup_poll),
            AudioStep::Wrote(_) => None,
            AudioStep::Starved => Some(timing.starvation_backoff),
        }
    }
}

/// Drains console PCM into an [`AudioSink`].
pub struct AudioStreamer<C: Console, S: AudioSink> {
    console: SharedConsole<C>,
    sink: S,
    state: Arc<PlaybackState>,
    timing: AudioTiming,
    chunk: Box<[u8]>,
    warmed_up: bool,
}

impl<C: Console, S: AudioSink> AudioStreamer<C, S> {
    pub fn new(
        console: SharedConsole<C>,
        sink: S,
        state: Arc<PlaybackState>,
        timing: AudioTiming,
    ) -> Self {
        let chunk = vec![0u8; timing.chunk_bytes.max(1)].into_boxed_slice();
        Self {
            console,
            sink,
            state,
            timing,
            chunk,
            warmed_up: false,
        }
    }

    /// Run one iteration of the streaming state machine.
    pub fn poll(&mut self) -> AudioStep {
        if self.state.snapshot() != RunState::Running {
            self.warmed_up = false;
            return AudioStep::Idle;
        }

        if !self.warmed_up {
            let level = console::lock(&self.console).audio_buffer_level();
            if level < self.timing.warmup_threshold {
                return AudioStep::Filling { level };
            }
            trace!(level, "audio cushion filled");
            self.warmed_up = true;
        }

        // Drain under the lock, write after releasing it.
        let read = console::lock(&self.console).drain_audio_samples(&mut self.chunk);
        let read = read.min(self.chunk.len());
        if read > 0 {
            self.sink.write(&self.chunk[..read]);
            AudioStep::Wrote(read)
        } else {
            trace!("audio starved");
            self.warmed_up = false;
            AudioStep::Starved
        }
    }

    /// Stream until the session is destroyed, then hand back the sink.
    pub fn run(mut self) -> S {
        request_max_priority();
        debug!(timing = ?self.timing, "audio streamer started");
        while !self.state.is_destroyed() {
            let step = self.poll();
            if let Some(delay) = step.backoff(&self.timing) {
                thread::sleep(delay);
            }
        }
        debug!("audio streamer stopped");
        self.sink
    }

    pub fn warmed_up(&self) -> bool {
        self.warmed_up
    }

    pub fn timing(&self) -> &AudioTiming {
        &self.timing
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// Ask the OS to schedule the current thread ahead of normal work. Missing
/// permissions are common (e.g. no rtprio on Linux) and only cost jitter.
fn request_max_priority() {
    if let Err(err) = set_current_thread_priority(ThreadPriority::Max) {
        warn!(error = ?err, "could not raise audio thread priority");
    }
}
