//! Audio pipeline: input source → fixed-length capture → WAV file.
//!
//! # Pipeline
//!
//! ```text
//! CpalSource (cpal callback → mpsc) → record() → Recording → write_wav()
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use wav_recorder::audio::{record, write_wav, CpalSource};
//! use wav_recorder::config::RecorderConfig;
//!
//! let config = RecorderConfig::default();
//! let mut source = CpalSource::new();
//! let recording = record(&mut source, &config.capture).unwrap();
//! let summary = write_wav(&config.output.path, &recording).unwrap();
//! println!("wrote {} bytes to {}", summary.data_bytes, summary.path.display());
//! ```

pub mod capture;
pub mod cpal_source;
pub mod frame;
pub mod source;
pub mod wav;

pub use capture::{record, CaptureError, CaptureState};
pub use cpal_source::CpalSource;
pub use frame::{FrameBuffer, Recording};
pub use source::AudioSource;
pub use wav::{read_wav, write_wav, WavError, WavSummary, WaveFile};

// test-only re-export so other modules' tests can drive the capture loop
// without a device.
#[cfg(test)]
pub use source::MockSource;
