//! Fixed-profile microphone recorder.
//!
//! Captures one second of 16 kHz mono 16-bit PCM from the default input
//! device in 3 200-frame buffers and writes it to `test.wav`.
//!
//! - [`audio`]: input sources, the capture loop and WAV encoding.
//! - [`config`]: the capture profile and its TOML persistence.
//! - [`recorder`]: capture-then-encode orchestration.
//! - [`error`]: crate-level error and failure classification.

pub mod audio;
pub mod config;
pub mod error;
pub mod recorder;

pub use error::{ErrorKind, RecorderError};
pub use recorder::Recorder;
