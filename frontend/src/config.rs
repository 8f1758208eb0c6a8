//! Front-end settings from `config.toml`.
//!
//! Every field has a default, so a partial file (or none at all) is valid.

use std::path::{Path, PathBuf};
use std::time::Duration;

use neso_core::core::console::Button;
use neso_core::playback::{AudioTiming, DEFAULT_BACKGROUND};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub video: VideoConfig,
    pub audio: AudioConfig,
    pub keys: KeyBindings,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct VideoConfig {
    /// Initial window size as a multiple of 256x240.
    pub scale: u32,
    pub frame_period_ms: u64,
    /// Letterbox fill, 0xAARRGGBB.
    pub background: u32,
    pub show_fps: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            scale: 3,
            frame_period_ms: 16,
            background: DEFAULT_BACKGROUND,
            show_fps: false,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub sample_rate: u32,
    /// Samples buffered between the streamer and the device callback.
    pub queue_samples: usize,
    pub chunk_bytes: usize,
    pub warmup_threshold: u32,
    pub idle_poll_ms: u64,
    pub warmup_poll_ms: u64,
    pub starvation_backoff_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        let timing = AudioTiming::default();
        Self {
            enabled: true,
            sample_rate: 44_100,
            queue_samples: 4096,
            chunk_bytes: timing.chunk_bytes,
            warmup_threshold: timing.warmup_threshold,
            idle_poll_ms: timing.idle_poll.as_millis() as u64,
            warmup_poll_ms: timing.warmup_poll.as_millis() as u64,
            starvation_backoff_ms: timing.starvation_backoff.as_millis() as u64,
        }
    }
}

impl AudioConfig {
    pub fn timing(&self) -> AudioTiming {
        AudioTiming {
            idle_poll: Duration::from_millis(self.idle_poll_ms),
            warmup_poll: Duration::from_millis(self.warmup_poll_ms),
            starvation_backoff: Duration::from_millis(self.starvation_backoff_ms),
            warmup_threshold: self.warmup_threshold,
            chunk_bytes: self.chunk_bytes.max(1),
        }
    }
}

/// SDL scancode names (as accepted by `Scancode::from_name`) per button.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeyBindings {
    pub a: String,
    pub b: String,
    pub select: String,
    pub start: String,
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            a: "X".into(),
            b: "Z".into(),
            select: "Right Shift".into(),
            start: "Return".into(),
            up: "Up".into(),
            down: "Down".into(),
            left: "Left".into(),
            right: "Right".into(),
        }
    }
}

impl KeyBindings {
    pub fn get(&self, button: Button) -> &str {
        match button {
            Button::A => &self.a,
            Button::B => &self.b,
            Button::Select => &self.select,
            Button::Start => &self.start,
            Button::Up => &self.up,
            Button::Down => &self.down,
            Button::Left => &self.left,
            Button::Right => &self.right,
        }
    }
}

impl Config {
    /// Load from `path` if given (must exist), else from the default
    /// location if present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_millis(self.video.frame_period_ms.max(1))
    }
}

/// `<config dir>/neso/config.toml`, e.g. `~/.config/neso/config.toml`.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("neso").join("config.toml"))
}
