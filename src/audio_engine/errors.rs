//! Audio-specific error types.

use thiserror::Error;

/// Errors that can occur while loading audio files.
#[derive(Debug, Error)]
pub enum SampleLoadError {
    /// Failed to open the audio file.
    #[error("failed to open file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode the audio file.
    #[error("failed to decode audio file: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    /// Failed to create resampler.
    #[error("failed to create resampler: {0}")]
    ResamplerConstruction(#[from] rubato::ResamplerConstructionError),

    /// Failed to resample audio.
    #[error("failed to resample audio: {0}")]
    Resample(#[from] rubato::ResampleError),

    /// Audio file has no default track.
    #[error("audio file has no default track")]
    NoDefaultTrack,

    /// Audio file is missing sample rate information.
    #[error("audio file is missing a sample rate")]
    MissingSampleRate,

    /// Audio file is missing channel information.
    #[error("audio file is missing channel information")]
    MissingChannels,

    /// Unsupported channel mapping configuration.
    #[error(
        "unsupported channel mapping: file has {file_channels} channels, output has {output_channels} channels"
    )]
    UnsupportedChannels {
        /// Number of channels in the source file.
        file_channels: usize,
        /// Number of channels expected for output.
        output_channels: usize,
    },
}

/// Errors raised by the [`AudioEngine`](crate::audio_engine::AudioEngine) control surface.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no audio output device found")]
    NoDevice,

    #[error("no default output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to create audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("audio engine already running")]
    AlreadyRunning,

    #[error("audio engine not initialized")]
    NotRunning,

    #[error("pad id out of range (expected 0..{max}, got {id})")]
    PadOutOfRange { id: usize, max: usize },

    #[error("volume out of range: {0}")]
    VolumeOutOfRange(f32),

    /// The ring buffer to the audio thread had no room left.
    #[error("failed to send {0} - buffer may be full")]
    QueueFull(&'static str),

    #[error("failed to acquire producer lock")]
    LockPoisoned,

    #[error(transparent)]
    SampleLoad(#[from] SampleLoadError),
}
