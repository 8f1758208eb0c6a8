use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam::channel::{Receiver, Sender};
use neso_core::device::audio_ring::SILENCE;
use neso_core::playback::AudioSink;
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

/// Number of samples over which to fade in/out (~5.8 ms at 44.1 kHz).
const FADE_SAMPLES: u32 = 256;

/// SDL device callback: pulls 8-bit unsigned mono samples from the queue,
/// playing silence when the queue runs dry.
pub struct AudioPlayer {
    queue: Receiver<u8>,
    fade_in_pos: u32,
    fading_out: Arc<AtomicBool>,
    fade_out_pos: u32,
}

fn scale(sample: u8, gain: f32) -> u8 {
    let centered = sample as f32 - SILENCE as f32;
    (SILENCE as f32 + centered * gain) as u8
}

impl AudioCallback for AudioPlayer {
    type Channel = u8;
    fn callback(&mut self, out: &mut [u8]) {
        for sample in out.iter_mut() {
            let raw = self.queue.try_recv().unwrap_or(SILENCE);

            if self.fade_in_pos < FADE_SAMPLES {
                // Ramp up from silence at startup
                let gain = self.fade_in_pos as f32 / FADE_SAMPLES as f32;
                *sample = scale(raw, gain);
                self.fade_in_pos += 1;
            } else if self.fading_out.load(Ordering::Relaxed) {
                // Ramp down to silence at shutdown
                if self.fade_out_pos < FADE_SAMPLES {
                    let gain = 1.0 - (self.fade_out_pos as f32 / FADE_SAMPLES as f32);
                    *sample = scale(raw, gain);
                    self.fade_out_pos += 1;
                } else {
                    *sample = SILENCE;
                }
            } else {
                *sample = raw;
            }
        }
    }
}

/// Blocking sink feeding the device callback through a bounded queue.
///
/// `write` blocks while the queue is full, so the streamer runs at the
/// device's consumption rate. Once the device is closed the queue is
/// disconnected and writes return immediately.
pub struct QueueSink {
    queue: Sender<u8>,
}

impl AudioSink for QueueSink {
    fn write(&mut self, samples: &[u8]) {
        for &sample in samples {
            if self.queue.send(sample).is_err() {
                return;
            }
        }
    }
}

/// Handle for signalling the audio callback to fade out before shutdown.
pub type FadeOut = Arc<AtomicBool>;

/// Open SDL2 audio playback (8-bit unsigned mono).
///
/// Returns the running device (must be kept alive), the sink half of the
/// sample queue for the streamer, and a fade-out signal for clean shutdown.
pub fn init(
    sdl_audio: &sdl2::AudioSubsystem,
    sample_rate: u32,
    queue_samples: usize,
) -> Result<(AudioDevice<AudioPlayer>, QueueSink, FadeOut), String> {
    let (tx, rx) = crossbeam::channel::bounded(queue_samples.max(1));
    let fade_out: FadeOut = Arc::new(AtomicBool::new(false));

    let desired_spec = AudioSpecDesired {
        freq: Some(sample_rate as i32),
        channels: Some(1),
        samples: Some(512), // ~11.6 ms at 44100 Hz
    };

    let fading_out = Arc::clone(&fade_out);
    let device = sdl_audio.open_playback(None, &desired_spec, move |_spec| AudioPlayer {
        queue: rx,
        fade_in_pos: 0,
        fading_out,
        fade_out_pos: 0,
    })?;
    device.resume();

    Ok((device, QueueSink { queue: tx }, fade_out))
}

/// Duration to sleep after signalling fade-out, allowing the callback
/// to ramp down before the device is closed.
pub fn fade_out_duration() -> std::time::Duration {
    // FADE_SAMPLES at 44100 Hz is about 5.8 ms; round up to 10 ms.
    std::time::Duration::from_millis(10)
}
