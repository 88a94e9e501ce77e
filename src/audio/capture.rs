//! Fixed-length capture loop.
//!
//! [`record`] opens an [`AudioSource`], performs
//! [`CaptureConfig::iterations`] blocking reads of `buffer_size` frames each,
//! and returns them as a [`Recording`].  The source is wrapped in an
//! [`OpenStream`] guard so it is closed on every exit path, including a
//! failed read.

use std::fmt;

use thiserror::Error;

use crate::audio::frame::{FrameBuffer, Recording};
use crate::audio::source::AudioSource;
use crate::config::CaptureConfig;
use crate::error::ErrorKind;

// ---------------------------------------------------------------------------
// CaptureState
// ---------------------------------------------------------------------------

/// Lifecycle of a capture stream.
///
/// ```text
/// Unopened ──open──▶ Recording ──close──▶ Closed
/// ```
///
/// Transitions are strictly linear; there is no re-entry and no pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// No stream has been opened yet.
    Unopened,
    /// The stream is running and reads are allowed.
    Recording,
    /// The stream has been stopped and the device released.
    Closed,
}

impl CaptureState {
    /// Move to `next`, rejecting anything but the forward edge.
    ///
    /// ```
    /// use wav_recorder::audio::CaptureState;
    ///
    /// let mut state = CaptureState::Unopened;
    /// assert!(state.transition(CaptureState::Recording).is_ok());
    /// assert!(state.transition(CaptureState::Recording).is_err());
    /// assert!(state.transition(CaptureState::Closed).is_ok());
    /// assert!(state.transition(CaptureState::Recording).is_err());
    /// ```
    pub fn transition(&mut self, next: CaptureState) -> Result<(), CaptureError> {
        let allowed = matches!(
            (*self, next),
            (CaptureState::Unopened, CaptureState::Recording)
                | (CaptureState::Recording, CaptureState::Closed)
        );
        if !allowed {
            return Err(CaptureError::InvalidState {
                from: *self,
                to: next,
            });
        }
        *self = next;
        Ok(())
    }

    /// Short label for log messages.
    pub fn label(&self) -> &'static str {
        match self {
            CaptureState::Unopened => "unopened",
            CaptureState::Recording => "recording",
            CaptureState::Closed => "closed",
        }
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors that can occur while opening, reading or closing an input stream.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("failed to stop audio stream: {0}")]
    PauseStream(#[from] cpal::PauseStreamError),

    #[error("short read: expected {expected} bytes, got {got}")]
    ShortRead { expected: usize, got: usize },

    #[error("audio stream error: {0}")]
    Stream(String),

    #[error("audio stream disconnected before the read completed")]
    Disconnected,

    #[error("invalid capture state transition: {from} -> {to}")]
    InvalidState { from: CaptureState, to: CaptureState },

    #[error("cannot read: stream is {0}")]
    NotRecording(CaptureState),
}

impl CaptureError {
    /// Classify the failure: problems opening or driving the device,
    /// including a rejected attempt to (re)open the stream, are
    /// [`ErrorKind::DeviceUnavailable`]; problems with the data are
    /// [`ErrorKind::ReadFailure`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            CaptureError::NoDevice
            | CaptureError::BuildStream(_)
            | CaptureError::PlayStream(_)
            | CaptureError::PauseStream(_)
            | CaptureError::InvalidState {
                to: CaptureState::Recording,
                ..
            } => ErrorKind::DeviceUnavailable,
            CaptureError::ShortRead { .. }
            | CaptureError::Stream(_)
            | CaptureError::Disconnected
            | CaptureError::InvalidState { .. }
            | CaptureError::NotRecording(_) => ErrorKind::ReadFailure,
        }
    }
}

// ---------------------------------------------------------------------------
// OpenStream
// ---------------------------------------------------------------------------

/// RAII guard over an opened [`AudioSource`].
///
/// Dropping the guard while still recording closes the source, so the device
/// is released even when the capture loop bails out with `?`.
struct OpenStream<'a> {
    source: &'a mut dyn AudioSource,
    state: CaptureState,
}

impl<'a> OpenStream<'a> {
    fn open(source: &'a mut dyn AudioSource, config: &CaptureConfig) -> Result<Self, CaptureError> {
        let mut state = CaptureState::Unopened;
        source.open(config)?;
        state.transition(CaptureState::Recording)?;
        Ok(Self { source, state })
    }

    fn read(&mut self, frames: usize) -> Result<FrameBuffer, CaptureError> {
        if self.state != CaptureState::Recording {
            return Err(CaptureError::NotRecording(self.state));
        }
        self.source.read(frames)
    }

    fn close(mut self) -> Result<(), CaptureError> {
        self.state.transition(CaptureState::Closed)?;
        self.source.close()
    }
}

impl Drop for OpenStream<'_> {
    fn drop(&mut self) {
        if self.state == CaptureState::Recording {
            self.state = CaptureState::Closed;
            if let Err(e) = self.source.close() {
                log::warn!("failed to close audio stream after error: {e}");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// record
// ---------------------------------------------------------------------------

/// Capture `config.iterations()` buffers of `config.buffer_size` frames.
///
/// Reads are strictly sequential and the returned [`Recording`] preserves
/// read order.  A buffer of the wrong length aborts the capture with
/// [`CaptureError::ShortRead`]; nothing captured so far is returned.
///
/// # Errors
///
/// Any [`CaptureError`] from the source.  The source is closed before the
/// error is returned.
pub fn record(
    source: &mut dyn AudioSource,
    config: &CaptureConfig,
) -> Result<Recording, CaptureError> {
    let iterations = config.iterations();
    let frames = config.buffer_size as usize;
    let expected = config.bytes_per_buffer();

    if iterations == 0 {
        log::warn!(
            "{:.3}s is shorter than one {}-frame buffer; recording will be empty",
            config.duration_secs,
            frames
        );
    }

    let mut stream = OpenStream::open(source, config)?;
    log::info!(
        "Recording started ({} Hz, {} ch, {:.2}s)",
        config.sample_rate,
        config.channels,
        config.captured_secs()
    );
    log::debug!(
        "requested {:.3}s, capturing {:.3}s in {} reads of {} frames",
        config.duration_secs,
        config.captured_secs(),
        iterations,
        frames
    );

    let mut recording = Recording::new(
        config.sample_rate,
        config.channels,
        config.sample_width_bytes(),
    );

    for i in 0..iterations {
        let buffer = stream.read(frames)?;
        if buffer.len() != expected {
            return Err(CaptureError::ShortRead {
                expected,
                got: buffer.len(),
            });
        }
        log::debug!("read {}/{} ({} bytes)", i + 1, iterations, buffer.len());
        recording.push(buffer);
    }

    if let Err(e) = stream.close() {
        log::warn!("failed to close audio stream: {e}");
    }
    log::info!("Recording finished ({} buffers)", recording.buffer_count());

    Ok(recording)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
