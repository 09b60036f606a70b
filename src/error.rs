//! Error types for the audio core.
//!
//! None of these cross the [`Transport`](crate::Transport) boundary: the
//! transport logs and absorbs them, leaving only its on/off state visible.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetroError {
    #[error("no default output device available")]
    NoDevice,
    #[error("failed to query output config: {0}")]
    OutputConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(String),
    #[error("audio context is closed")]
    ContextClosed,
    #[error("voice queue is full")]
    QueueFull,
    #[error("voice limit reached ({0} active)")]
    VoiceLimit(usize),
    #[error("invalid voice parameter: {0}")]
    InvalidVoice(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, RetroError>;
