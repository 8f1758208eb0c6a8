//! Process-wide run/pause state shared by the frame loop, the audio
//! streamer and the host UI.
//!
//! The state is a single atomic bitfield read with relaxed ordering. Readers
//! never block and may observe a change one polling interval late; both
//! loops are built to tolerate that (at worst one extra idle iteration).

use std::sync::atomic::{AtomicU8, Ordering};

use tracing::debug;

const RUNNING: u8 = 1 << 0;
const PAUSED: u8 = 1 << 1;
const DESTROYED: u8 = 1 << 2;

/// Snapshot of the playback state as seen by one loop iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// No display surface (not yet created, or torn down).
    Stopped,
    /// Surface live, stepping and audio active.
    Running,
    /// Surface live, stepping and audio halted, resources kept.
    Paused,
}

/// Shared run/pause cell plus the destroy signal.
///
/// `running` tracks the display surface lifecycle and `paused` tracks
/// explicit user pauses; the two are independent, so a pause requested while
/// the surface is gone still holds when the surface comes back.
#[derive(Debug, Default)]
pub struct PlaybackState {
    bits: AtomicU8,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state. Destroyed sessions report `Stopped`.
    pub fn snapshot(&self) -> RunState {
        decode(self.bits.load(Ordering::Relaxed))
    }

    /// True only when both loops should be producing output.
    pub fn is_running(&self) -> bool {
        self.snapshot() == RunState::Running
    }

    /// Surface became available (`true`) or was torn down (`false`).
    ///
    /// Returns whether the call changed anything. Repeating the current
    /// value is a no-op.
    pub fn set_running(&self, running: bool) -> bool {
        self.update(RUNNING, running)
    }

    /// Explicit pause/resume. Returns whether the call changed anything.
    pub fn set_paused(&self, paused: bool) -> bool {
        self.update(PAUSED, paused)
    }

    /// Flip the pause flag, returning the new value.
    pub fn toggle_paused(&self) -> bool {
        let prev = self.bits.fetch_xor(PAUSED, Ordering::Relaxed);
        let now = prev ^ PAUSED;
        debug!(from = ?decode(prev), to = ?decode(now), "run state changed");
        now & PAUSED != 0
    }

    pub fn is_paused(&self) -> bool {
        self.bits.load(Ordering::Relaxed) & PAUSED != 0
    }

    /// Permanently stop the session. The audio streamer exits its loop on
    /// the next iteration; pause/resume no longer matter.
    pub fn destroy(&self) {
        let prev = self.bits.fetch_or(DESTROYED, Ordering::Relaxed);
        if prev & DESTROYED == 0 {
            debug!("playback destroyed");
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.bits.load(Ordering::Relaxed) & DESTROYED != 0
    }

    fn update(&self, flag: u8, set: bool) -> bool {
        let prev = if set {
            self.bits.fetch_or(flag, Ordering::Relaxed)
        } else {
            self.bits.fetch_and(!flag, Ordering::Relaxed)
        };
        let changed = (prev & flag != 0) != set;
        if changed {
            let now = if set { prev | flag } else { prev & !flag };
            debug!(from = ?decode(prev), to = ?decode(now), "run state changed");
        }
        changed
    }
}

fn decode(bits: u8) -> RunState {
    if bits & DESTROYED != 0 || bits & RUNNING == 0 {
        RunState::Stopped
    } else if bits & PAUSED != 0 {
        RunState::Paused
    } else {
        RunState::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_stopped() {
        let state = PlaybackState::new();
        assert_eq!(state.snapshot(), RunState::Stopped);
        assert!(!state.is_destroyed());
    }

    #[test]
    fn surface_lifecycle() {
        let state = PlaybackState::new();
        assert!(state.set_running(true));
        assert_eq!(state.snapshot(), RunState::Running);
        assert!(state.set_running(false));
        assert_eq!(state.snapshot(), RunState::Stopped);
    }

    #[test]
    fn pause_and_resume() {
        let state = PlaybackState::new();
        state.set_running(true);
        assert!(state.set_paused(true));
        assert_eq!(state.snapshot(), RunState::Paused);
        assert!(state.set_paused(false));
        assert_eq!(state.snapshot(), RunState::Running);
    }

    #[test]
    fn repeated_pause_is_noop() {
        let state = PlaybackState::new();
        state.set_running(true);
        assert!(state.set_paused(true));
        assert!(!state.set_paused(true));
        assert!(!state.set_paused(true));
        assert_eq!(state.snapshot(), RunState::Paused);
    }

    #[test]
    fn repeated_resume_is_noop() {
        let state = PlaybackState::new();
        state.set_running(true);
        assert!(!state.set_paused(false));
        assert!(!state.set_running(true));
        assert_eq!(state.snapshot(), RunState::Running);
    }

    #[test]
    fn pause_while_stopped_applies_when_surface_returns() {
        let state = PlaybackState::new();
        state.set_paused(true);
        assert_eq!(state.snapshot(), RunState::Stopped);
        state.set_running(true);
        assert_eq!(state.snapshot(), RunState::Paused);
    }

    #[test]
    fn toggle_flips_pause() {
        let state = PlaybackState::new();
        state.set_running(true);
        assert!(state.toggle_paused());
        assert!(state.is_paused());
        assert!(!state.toggle_paused());
        assert_eq!(state.snapshot(), RunState::Running);
    }

    #[test]
    fn destroyed_reports_stopped() {
        let state = PlaybackState::new();
        state.set_running(true);
        state.destroy();
        assert!(state.is_destroyed());
        assert_eq!(state.snapshot(), RunState::Stopped);
        state.set_paused(false);
        assert_eq!(state.snapshot(), RunState::Stopped);
    }
}
