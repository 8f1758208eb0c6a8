pub mod console;
pub mod error;
pub mod state;

pub use console::{Button, Console, Framebuffer, SCREEN_HEIGHT, SCREEN_WIDTH, SharedConsole};
pub use error::{LoadError, SessionError};
pub use state::{PlaybackState, RunState};
