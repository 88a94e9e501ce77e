//! WAV encoding and read-back via `hound`.
//!
//! [`write_wav`] materialises the whole [`Recording`] payload in memory,
//! then writes a canonical PCM WAV file whose header sizes are derived from
//! the payload actually written.  An existing file at the path is truncated.
//! [`read_wav`] loads a file back for verification.

use std::path::{Path, PathBuf};

use hound::{WavReader, WavSpec, WavWriter};
use thiserror::Error;

use crate::audio::frame::Recording;
use crate::error::ErrorKind;

// ---------------------------------------------------------------------------
// WavError
// ---------------------------------------------------------------------------

/// Errors raised while writing or reading a WAV file.
#[derive(Debug, Error)]
pub enum WavError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("unsupported sample width: {0} bytes")]
    UnsupportedSampleWidth(u16),
}

impl WavError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WavError::Write { .. } | WavError::Read { .. } => ErrorKind::Io,
            WavError::UnsupportedSampleWidth(_) => ErrorKind::InvalidConfig,
        }
    }
}

// ---------------------------------------------------------------------------
// WavSummary / WaveFile
// ---------------------------------------------------------------------------

/// What [`write_wav`] put on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct WavSummary {
    pub path: PathBuf,
    pub channels: u16,
    /// Bytes per sample.
    pub sample_width: u16,
    /// Frames per second (Hz).
    pub frame_rate: u32,
    /// Length of the data chunk in bytes.
    pub data_bytes: usize,
    pub frames: usize,
    pub duration_secs: f64,
}

/// A WAV file loaded back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveFile {
    pub channels: u16,
    /// Bytes per sample.
    pub sample_width: u16,
    /// Frames per second (Hz).
    pub frame_rate: u32,
    /// Little-endian PCM payload.
    pub payload: Vec<u8>,
}

impl WaveFile {
    /// Number of frames in the payload.
    pub fn frames(&self) -> usize {
        let frame_bytes = self.sample_width as usize * self.channels as usize;
        if frame_bytes == 0 {
            return 0;
        }
        self.payload.len() / frame_bytes
    }
}

// ---------------------------------------------------------------------------
// write_wav / read_wav
// ---------------------------------------------------------------------------

/// Write `recording` to `path` as 16-bit PCM WAV.
///
/// The channel count, sample width and frame rate come from the recording;
/// the data-chunk length is whatever the concatenated payload measures.  The
/// writer is finalised before returning so the header is complete.
///
/// # Errors
///
/// [`WavError::Write`] when the file cannot be created or written, or
/// [`WavError::UnsupportedSampleWidth`] for anything but 2-byte samples.
pub fn write_wav(path: &Path, recording: &Recording) -> Result<WavSummary, WavError> {
    if recording.sample_width() != 2 {
        return Err(WavError::UnsupportedSampleWidth(recording.sample_width()));
    }

    let spec = WavSpec {
        channels: recording.channels(),
        sample_rate: recording.sample_rate(),
        bits_per_sample: recording.sample_width() * 8,
        sample_format: hound::SampleFormat::Int,
    };

    let payload = recording.concat();
    let write_err = |source: hound::Error| WavError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = WavWriter::create(path, spec).map_err(write_err)?;
    for pair in payload.chunks_exact(2) {
        writer
            .write_sample(i16::from_le_bytes([pair[0], pair[1]]))
            .map_err(write_err)?;
    }
    writer.finalize().map_err(write_err)?;

    let summary = WavSummary {
        path: path.to_path_buf(),
        channels: recording.channels(),
        sample_width: recording.sample_width(),
        frame_rate: recording.sample_rate(),
        data_bytes: payload.len(),
        frames: recording.frame_count(),
        duration_secs: recording.duration_secs(),
    };

    log::info!(
        "WAV written: {} ({} bytes, {:.2}s)",
        summary.path.display(),
        summary.data_bytes,
        summary.duration_secs
    );
    Ok(summary)
}

/// Load a 16-bit PCM WAV file.
pub fn read_wav(path: &Path) -> Result<WaveFile, WavError> {
    let read_err = |source: hound::Error| WavError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = WavReader::open(path).map_err(read_err)?;
    let spec = reader.spec();
    if spec.bits_per_sample != 16 || spec.sample_format != hound::SampleFormat::Int {
        return Err(WavError::UnsupportedSampleWidth(spec.bits_per_sample / 8));
    }

    let mut payload = Vec::with_capacity(reader.len() as usize * 2);
    for sample in reader.samples::<i16>() {
        payload.extend_from_slice(&sample.map_err(read_err)?.to_le_bytes());
    }

    Ok(WaveFile {
        channels: spec.channels,
        sample_width: spec.bits_per_sample / 8,
        frame_rate: spec.sample_rate,
        payload,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
