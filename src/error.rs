//! Crate-level error type.
//!
//! Each subsystem has its own `thiserror` enum; [`RecorderError`] wraps them
//! and [`ErrorKind`] gives the coarse classification used for reporting.

use std::fmt;

use thiserror::Error;

use crate::audio::{CaptureError, WavError};
use crate::config::ConfigError;

/// Coarse failure classes.  Every kind is fatal; none is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input device could not be opened or started.
    DeviceUnavailable,
    /// A blocking read errored or returned short.
    ReadFailure,
    /// The output file could not be created or written.
    Io,
    /// The configuration or sample format does not describe a usable
    /// stream or file.
    InvalidConfig,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::DeviceUnavailable => "device unavailable",
            ErrorKind::ReadFailure => "read failure",
            ErrorKind::Io => "I/O error",
            ErrorKind::InvalidConfig => "invalid config",
        };
        f.write_str(name)
    }
}

/// Any failure of a record-and-write run.
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Wav(#[from] WavError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RecorderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecorderError::Capture(e) => e.kind(),
            RecorderError::Wav(e) => e.kind(),
            RecorderError::Config(ConfigError::Io(_)) => ErrorKind::Io,
            RecorderError::Config(_) => ErrorKind::InvalidConfig,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::CaptureState;

    #[test]
    fn kinds_follow_wrapped_error() {
        let e: RecorderError = CaptureError::NoDevice.into();
        assert_eq!(e.kind(), ErrorKind::DeviceUnavailable);

        let e: RecorderError = CaptureError::ShortRead { expected: 4, got: 2 }.into();
        assert_eq!(e.kind(), ErrorKind::ReadFailure);

        let e: RecorderError = WavError::UnsupportedSampleWidth(3).into();
        assert_eq!(e.kind(), ErrorKind::InvalidConfig);

        let e: RecorderError = CaptureError::InvalidState {
            from: CaptureState::Closed,
            to: CaptureState::Recording,
        }
        .into();
        assert_eq!(e.kind(), ErrorKind::DeviceUnavailable);

        let e: RecorderError = ConfigError::ZeroBufferSize.into();
        assert_eq!(e.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn display_is_transparent() {
        let e: RecorderError = CaptureError::NoDevice.into();
        assert_eq!(e.to_string(), "no input device found on the default audio host");
        assert_eq!(e.kind().to_string(), "device unavailable");
    }
}
