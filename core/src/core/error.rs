use thiserror::Error;

/// Why a console refused a program image.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("program image is empty")]
    Empty,
    #[error("program image too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },
    #[error("program rejected: {0}")]
    Rejected(String),
}

/// Failures starting or stopping a playback session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("audio streaming is already running")]
    AudioAlreadyRunning,
    #[error("failed to spawn audio thread: {0}")]
    SpawnAudio(#[from] std::io::Error),
}
