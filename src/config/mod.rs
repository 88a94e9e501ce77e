//! Configuration module for the WAV recorder.
//!
//! Provides `RecorderConfig` (top-level settings), the capture and output
//! sub-configs, and TOML persistence via `RecorderConfig::load_from` /
//! `RecorderConfig::save_to`.

pub mod settings;

pub use settings::{CaptureConfig, ConfigError, OutputConfig, RecorderConfig, SampleFormat};
