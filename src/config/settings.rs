//! Recorder settings structs, defaults and TOML persistence.
//!
//! The defaults describe the fixed capture profile: 16 kHz, mono, 16-bit
//! signed PCM, 3 200-frame buffers, one second, written to `test.wav`.
//! Every struct implements `Serialize`, `Deserialize`, `Default` and `Clone`
//! so a profile can be round-tripped through a TOML file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors raised while validating or persisting a [`RecorderConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("sample rate must be greater than zero")]
    ZeroSampleRate,

    #[error("channel count must be greater than zero")]
    ZeroChannels,

    #[error("buffer size must be greater than zero frames")]
    ZeroBufferSize,

    #[error("duration must be a positive number of seconds, got {0}")]
    InvalidDuration(f64),

    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialise config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ---------------------------------------------------------------------------
// SampleFormat
// ---------------------------------------------------------------------------

/// PCM sample encoding requested from the input device.
///
/// Only linear 16-bit signed PCM is captured; the enum keeps the sample width
/// derivable from the format rather than stored separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    /// Signed 16-bit little-endian integer samples.
    #[default]
    I16,
}

impl SampleFormat {
    /// Bytes used to encode one sample.
    ///
    /// ```
    /// use wav_recorder::config::SampleFormat;
    ///
    /// assert_eq!(SampleFormat::I16.sample_width_bytes(), 2);
    /// ```
    pub fn sample_width_bytes(self) -> u16 {
        match self {
            SampleFormat::I16 => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// CaptureConfig
// ---------------------------------------------------------------------------

/// Input stream parameters and recording length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Frames captured per second (Hz).
    pub sample_rate: u32,
    /// Interleaved channels per frame.
    pub channels: u16,
    /// Sample encoding.
    pub sample_format: SampleFormat,
    /// Frames delivered by each blocking read.
    pub buffer_size: u32,
    /// Requested recording length in seconds.  The captured length is
    /// rounded down to a whole number of buffers.
    pub duration_secs: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            channels: 1,
            sample_format: SampleFormat::I16,
            buffer_size: 3_200,
            duration_secs: 1.0,
        }
    }
}

impl CaptureConfig {
    /// Number of blocking reads needed for the requested duration:
    /// `floor(sample_rate / buffer_size * duration_secs)`.
    ///
    /// Non-integral results truncate toward zero, so the captured duration
    /// may be shorter than requested.
    ///
    /// ```
    /// use wav_recorder::config::CaptureConfig;
    ///
    /// let mut cfg = CaptureConfig::default();
    /// assert_eq!(cfg.iterations(), 5);
    ///
    /// cfg.duration_secs = 1.1; // 5.5 reads → 5
    /// assert_eq!(cfg.iterations(), 5);
    /// ```
    pub fn iterations(&self) -> usize {
        if self.buffer_size == 0 || !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return 0;
        }
        let reads = self.sample_rate as f64 / self.buffer_size as f64 * self.duration_secs;
        reads.floor() as usize
    }

    /// Bytes used to encode one sample.
    pub fn sample_width_bytes(&self) -> u16 {
        self.sample_format.sample_width_bytes()
    }

    /// Bytes in one frame (one sample per channel).
    pub fn bytes_per_frame(&self) -> usize {
        self.sample_width_bytes() as usize * self.channels as usize
    }

    /// Exact byte length of every buffer returned by a read.
    pub fn bytes_per_buffer(&self) -> usize {
        self.buffer_size as usize * self.bytes_per_frame()
    }

    /// Duration actually captured once [`iterations`](Self::iterations)
    /// reads have completed.
    pub fn captured_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        (self.iterations() * self.buffer_size as usize) as f64 / self.sample_rate as f64
    }

    /// Reject parameters that cannot describe a stream.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.channels == 0 {
            return Err(ConfigError::ZeroChannels);
        }
        if self.buffer_size == 0 {
            return Err(ConfigError::ZeroBufferSize);
        }
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(ConfigError::InvalidDuration(self.duration_secs));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// OutputConfig
// ---------------------------------------------------------------------------

/// Where the finished WAV file goes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output file, relative paths resolve against the working directory.
    /// An existing file is overwritten.
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("test.wav"),
        }
    }
}

// ---------------------------------------------------------------------------
// RecorderConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level recorder configuration.
///
/// # Persistence
///
/// ```rust,no_run
/// use std::path::Path;
/// use wav_recorder::config::RecorderConfig;
///
/// // Returns Default when the file is missing
/// let path = Path::new("recorder.toml");
/// let config = RecorderConfig::load_from(path).unwrap();
/// config.save_to(path).unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Stream parameters and duration.
    pub capture: CaptureConfig,
    /// Output file settings.
    pub output: OutputConfig,
}

impl RecorderConfig {
    /// Validate all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capture.validate()
    }

    /// Load from an explicit path.
    ///
    /// Returns `Ok(RecorderConfig::default())` when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_values_match_fixed_profile() {
        let cfg = RecorderConfig::default();

        assert_eq!(cfg.capture.sample_rate, 16_000);
        assert_eq!(cfg.capture.channels, 1);
        assert_eq!(cfg.capture.sample_format, SampleFormat::I16);
        assert_eq!(cfg.capture.buffer_size, 3_200);
        assert_eq!(cfg.capture.duration_secs, 1.0);
        assert_eq!(cfg.output.path, PathBuf::from("test.wav"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn default_profile_reads_five_buffers_of_6400_bytes() {
        let cfg = CaptureConfig::default();
        assert_eq!(cfg.iterations(), 5);
        assert_eq!(cfg.sample_width_bytes(), 2);
        assert_eq!(cfg.bytes_per_buffer(), 6_400);
        assert_eq!(cfg.iterations() * cfg.bytes_per_buffer(), 32_000);
    }

    #[test]
    fn iterations_truncate_toward_zero() {
        let mut cfg = CaptureConfig::default();

        cfg.duration_secs = 1.1;
        assert_eq!(cfg.iterations(), 5);

        cfg.duration_secs = 1.19;
        assert_eq!(cfg.iterations(), 5);

        cfg.duration_secs = 0.1; // 0.5 reads
        assert_eq!(cfg.iterations(), 0);

        cfg.duration_secs = 2.0;
        assert_eq!(cfg.iterations(), 10);
    }

    #[test]
    fn captured_secs_reflects_truncation() {
        let mut cfg = CaptureConfig::default();
        cfg.duration_secs = 1.1;
        assert!((cfg.captured_secs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn bytes_per_buffer_scales_with_channels() {
        let cfg = CaptureConfig {
            channels: 2,
            ..CaptureConfig::default()
        };
        assert_eq!(cfg.bytes_per_frame(), 4);
        assert_eq!(cfg.bytes_per_buffer(), 12_800);
    }

    #[test]
    fn validate_rejects_bad_parameters() {
        let base = CaptureConfig::default();

        let cfg = CaptureConfig {
            sample_rate: 0,
            ..base.clone()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroSampleRate)));

        let cfg = CaptureConfig {
            channels: 0,
            ..base.clone()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroChannels)));

        let cfg = CaptureConfig {
            buffer_size: 0,
            ..base.clone()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroBufferSize)));
        assert_eq!(cfg.iterations(), 0);

        let cfg = CaptureConfig {
            duration_secs: 0.0,
            ..base.clone()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidDuration(_))));

        let cfg = CaptureConfig {
            duration_secs: -1.0,
            ..base.clone()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidDuration(_))));

        let cfg = CaptureConfig {
            duration_secs: f64::NAN,
            ..base
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidDuration(_))));
    }

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("recorder.toml");

        let mut original = RecorderConfig::default();
        original.capture.duration_secs = 2.5;
        original.output.path = PathBuf::from("out/clip.wav");
        original.save_to(&path).expect("save");

        let loaded = RecorderConfig::load_from(&path).expect("load");
        assert_eq!(loaded.capture.sample_rate, 16_000);
        assert_eq!(loaded.capture.buffer_size, 3_200);
        assert_eq!(loaded.capture.sample_format, SampleFormat::I16);
        assert_eq!(loaded.capture.duration_secs, 2.5);
        assert_eq!(loaded.output.path, PathBuf::from("out/clip.wav"));
    }

    #[test]
    fn sample_format_serialises_lowercase() {
        let text = toml::to_string_pretty(&RecorderConfig::default()).expect("serialise");
        assert!(text.contains("sample_format = \"i16\""));
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = RecorderConfig::load_from(&path).expect("should not error");
        assert_eq!(config.capture.iterations(), 5);
        assert_eq!(config.output.path, PathBuf::from("test.wav"));
    }

    #[test]
    fn load_rejects_invalid_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("bad.toml");

        let mut cfg = RecorderConfig::default();
        cfg.capture.duration_secs = -3.0;
        cfg.save_to(&path).expect("save");

        assert!(matches!(
            RecorderConfig::load_from(&path),
            Err(ConfigError::InvalidDuration(_))
        ));
    }

    #[test]
    fn load_rejects_malformed_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("garbage.toml");
        std::fs::write(&path, "capture = [not toml").expect("write");

        assert!(matches!(
            RecorderConfig::load_from(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
