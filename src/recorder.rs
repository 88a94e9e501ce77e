//! Record-and-write orchestrator.
//!
//! ```text
//! Recorder::run()
//!   ├─ validate config
//!   ├─ record(source, capture)   → Recording     [capture stage]
//!   └─ write_wav(output.path)    → WavSummary    [encode stage]
//! ```
//!
//! The capture stage runs to completion before the encode stage starts; a
//! failed capture never touches the output file.

use crate::audio::{record, write_wav, AudioSource, WavSummary};
use crate::config::RecorderConfig;
use crate::error::RecorderError;

/// Runs one capture followed by one encode with a fixed configuration.
pub struct Recorder {
    config: RecorderConfig,
}

impl Recorder {
    /// Validate `config` and build a recorder around it.
    pub fn new(config: RecorderConfig) -> Result<Self, RecorderError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Capture from `source` and write the WAV file, overwriting any file
    /// already at the output path.
    pub fn run(&self, source: &mut dyn AudioSource) -> Result<WavSummary, RecorderError> {
        let recording = record(source, &self.config.capture)?;
        let summary = write_wav(&self.config.output.path, &recording)?;
        Ok(summary)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{read_wav, MockSource};
    use crate::config::CaptureConfig;
    use crate::error::ErrorKind;
    use tempfile::tempdir;

    fn recorder_at(path: std::path::PathBuf, duration_secs: f64) -> Recorder {
        let mut config = RecorderConfig::default();
        config.capture.duration_secs = duration_secs;
        config.output.path = path;
        Recorder::new(config).expect("valid config")
    }

    #[test]
    fn default_run_writes_32000_byte_payload() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("test.wav");
        let recorder = recorder_at(path.clone(), 1.0);

        let mut src = MockSource::new();
        let summary = recorder.run(&mut src).expect("run");

        assert_eq!(src.reads, 5);
        assert_eq!(summary.data_bytes, 32_000);
        assert_eq!(summary.channels, 1);
        assert_eq!(summary.sample_width, 2);
        assert_eq!(summary.frame_rate, 16_000);

        let wave = read_wav(&path).expect("read");
        assert_eq!(wave.payload.len(), 32_000);
        assert_eq!(wave.channels, 1);
        assert_eq!(wave.sample_width, 2);
        assert_eq!(wave.frame_rate, 16_000);
    }

    #[test]
    fn payload_round_trips_byte_for_byte() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("test.wav");
        let config = CaptureConfig::default();

        let mut capture_src = MockSource::new();
        let expected = record(&mut capture_src, &config).expect("record").concat();

        let mut src = MockSource::new();
        recorder_at(path.clone(), 1.0).run(&mut src).expect("run");

        assert_eq!(read_wav(&path).expect("read").payload, expected);
    }

    #[test]
    fn second_run_overwrites_first() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("test.wav");

        recorder_at(path.clone(), 3.0)
            .run(&mut MockSource::new())
            .expect("first run");
        let first_len = std::fs::metadata(&path).expect("stat").len();
        assert_eq!(read_wav(&path).expect("read").payload.len(), 96_000);

        recorder_at(path.clone(), 1.0)
            .run(&mut MockSource::new())
            .expect("second run");
        let second_len = std::fs::metadata(&path).expect("stat").len();

        assert_eq!(first_len - second_len, 64_000);
        assert_eq!(read_wav(&path).expect("read").payload.len(), 32_000);
    }

    #[test]
    fn fractional_duration_matches_whole_second() {
        let dir = tempdir().expect("temp dir");
        let a = dir.path().join("a.wav");
        let b = dir.path().join("b.wav");

        recorder_at(a.clone(), 1.0).run(&mut MockSource::new()).expect("run");
        recorder_at(b.clone(), 1.1).run(&mut MockSource::new()).expect("run");

        assert_eq!(
            std::fs::read(&a).expect("a"),
            std::fs::read(&b).expect("b")
        );
    }

    #[test]
    fn read_failure_writes_no_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("test.wav");

        let mut src = MockSource::short_read_at(4);
        let err = recorder_at(path.clone(), 1.0).run(&mut src).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ReadFailure);
        assert_eq!(src.closes, 1);
        assert!(!path.exists());
    }

    #[test]
    fn device_unavailable_writes_no_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("test.wav");

        let err = recorder_at(path.clone(), 1.0)
            .run(&mut MockSource::unavailable())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DeviceUnavailable);
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_output_is_io_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("no-such-dir").join("test.wav");

        let err = recorder_at(path, 1.0)
            .run(&mut MockSource::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn invalid_config_rejected_up_front() {
        let mut config = RecorderConfig::default();
        config.capture.duration_secs = 0.0;

        let err = Recorder::new(config).err().expect("should fail");
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }
}
