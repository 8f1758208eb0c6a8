pub mod audio_ring;

pub use audio_ring::AudioRing;
