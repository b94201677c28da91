//! Error types for the fallible edges of the engine.
//!
//! The MIDI and render paths never fail: malformed messages and voice
//! exhaustion are ignored. Only bringing up the host audio session can go
//! wrong, and those failures are reported here.

use thiserror::Error;

/// Errors raised while bringing up the audio session.
#[derive(Debug, Error)]
pub enum Error {
    /// The host has no default output device.
    #[error("no default output device available")]
    NoOutputDevice,

    /// The device offers a sample format the session cannot render into.
    #[error("unsupported sample format: {0}")]
    UnsupportedSampleFormat(String),

    /// The session already handed its synthesizer to a running stream.
    #[error("audio session already started")]
    AlreadyStarted,

    /// Querying the device configuration failed.
    #[cfg(feature = "cpal")]
    #[error("failed to fetch default output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    /// Creating the output stream failed.
    #[cfg(feature = "cpal")]
    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    /// Starting the output stream failed.
    #[cfg(feature = "cpal")]
    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

pub type Result<T> = std::result::Result<T, Error>;
