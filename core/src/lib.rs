pub mod core;
pub mod device;
pub mod input;
pub mod playback;

pub mod prelude {
    pub use crate::core::console::{Button, Console, Framebuffer, SharedConsole};
    pub use crate::core::{LoadError, PlaybackState, RunState};
    pub use crate::input::{ButtonSink, ControlBounds, Gesture, GesturePhase, InputAggregator};
    pub use crate::playback::{
        AudioSink, AudioTiming, Cadence, DisplaySurface, FrameLoop, FrameOutcome, Rect, Session,
    };
}
