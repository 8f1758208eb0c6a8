use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use crate::core::console::{self, Console, SharedConsole};
use crate::core::error::{LoadError, SessionError};
use crate::core::state::PlaybackState;
use crate::input::InputAggregator;
use crate::playback::audio::{AudioSink, AudioStreamer, AudioTiming};
use crate::playback::video::FrameLoop;

/// One playback session: a console, its run/pause state, and the audio
/// thread streaming from it.
///
/// The session owns the console for its whole lifetime. [`Session::shutdown`]
/// stops the audio thread and hands the console back so the caller decides
/// when it is torn down; dropping the session stops the thread as well.
pub struct Session<C: Console + 'static> {
    console: Option<SharedConsole<C>>,
    state: Arc<PlaybackState>,
    audio: Option<JoinHandle<()>>,
}

impl<C: Console + 'static> Session<C> {
    pub fn new(console: C) -> Self {
        info!(console = console.name(), "session created");
        Self {
            console: Some(console::share(console)),
            state: Arc::new(PlaybackState::new()),
            audio: None,
        }
    }

    /// Start streaming audio to `sink` on a dedicated thread.
    pub fn spawn_audio<S>(&mut self, sink: S, timing: AudioTiming) -> Result<(), SessionError>
    where
        S: AudioSink + Send + 'static,
    {
        if self.audio.is_some() {
            return Err(SessionError::AudioAlreadyRunning);
        }
        let streamer = AudioStreamer::new(self.console().clone(), sink, self.state.clone(), timing);
        let handle = thread::Builder::new()
            .name("neso-audio".into())
            .spawn(move || {
                streamer.run();
            })?;
        self.audio = Some(handle);
        Ok(())
    }

    pub fn console(&self) -> &SharedConsole<C> {
        // Only `shutdown` takes the console, and it consumes the session.
        match &self.console {
            Some(console) => console,
            None => unreachable!("console taken before shutdown"),
        }
    }

    pub fn state(&self) -> &Arc<PlaybackState> {
        &self.state
    }

    /// A frame loop bound to this session's console and state.
    pub fn frame_loop(&self, background: u32) -> FrameLoop<C> {
        FrameLoop::new(self.console().clone(), self.state.clone(), background)
    }

    /// An input aggregator writing into this session's console.
    pub fn input(&self) -> InputAggregator<SharedConsole<C>> {
        InputAggregator::new(self.console().clone())
    }

    /// Load a new program. Playback is paused for the duration of the load,
    /// all buttons are released, and the previous pause state is restored.
    pub fn load_program(&self, program: &[u8]) -> Result<(), LoadError> {
        let was_paused = self.state.is_paused();
        self.state.set_paused(true);
        let result = {
            let mut console = console::lock(self.console());
            let result = console.load_program(program);
            for button in crate::core::console::Button::ALL {
                console.set_button(button, false);
            }
            result
        };
        self.state.set_paused(was_paused);
        match &result {
            Ok(()) => info!(bytes = program.len(), "program loaded"),
            Err(err) => warn!(error = %err, "program rejected"),
        }
        result
    }

    /// Stop everything and return the console.
    ///
    /// Returns `None` if a frame loop or input aggregator from this session
    /// is still alive; the console is then torn down when the last of them
    /// is dropped.
    pub fn shutdown(mut self) -> Option<C> {
        self.stop_audio();
        let console = self.console.take()?;
        let console = Arc::try_unwrap(console).ok()?;
        info!("session shut down");
        Some(console.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }

    fn stop_audio(&mut self) {
        self.state.set_running(false);
        self.state.destroy();
        if let Some(handle) = self.audio.take()
            && handle.join().is_err()
        {
            warn!("audio thread panicked");
        }
    }
}

impl<C: Console + 'static> Drop for Session<C> {
    fn drop(&mut self) {
        self.stop_audio();
    }
}
