//! The two playback loops and the session that ties them to a console.

pub mod audio;
pub mod cadence;
pub mod session;
pub mod video;

pub use audio::{AudioSink, AudioStep, AudioStreamer, AudioTiming};
pub use cadence::{Cadence, FRAME_PERIOD};
pub use session::Session;
pub use video::{DEFAULT_BACKGROUND, DisplaySurface, FrameLoop, FrameOutcome, Rect, letterbox};
