//! Blocking microphone input via `cpal`.
//!
//! cpal delivers audio through a callback on its own thread.  [`CpalSource`]
//! forwards each callback block over an mpsc channel and the calling thread
//! reassembles them into reads of exactly the requested frame count, so the
//! capture loop sees a plain blocking `read`.

use std::collections::VecDeque;
use std::sync::mpsc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::audio::capture::{CaptureError, CaptureState};
use crate::audio::frame::FrameBuffer;
use crate::audio::source::AudioSource;
use crate::config::{CaptureConfig, SampleFormat};

// ---------------------------------------------------------------------------
// StreamMessage
// ---------------------------------------------------------------------------

/// What the cpal callbacks send to the reading thread.
#[derive(Debug)]
enum StreamMessage {
    /// Interleaved samples from one data callback.
    Samples(Vec<i16>),
    /// Error reported by the error callback.
    Error(String),
}

// ---------------------------------------------------------------------------
// CpalSource
// ---------------------------------------------------------------------------

/// [`AudioSource`] backed by the default input device of the default cpal
/// host.
///
/// The source is single-use: once closed it cannot be reopened.
///
/// # Example
///
/// ```rust,no_run
/// use wav_recorder::audio::{record, CpalSource};
/// use wav_recorder::config::CaptureConfig;
///
/// let mut source = CpalSource::new();
/// let recording = record(&mut source, &CaptureConfig::default()).unwrap();
/// assert_eq!(recording.total_bytes(), 32_000);
/// ```
pub struct CpalSource {
    stream: Option<cpal::Stream>,
    rx: Option<mpsc::Receiver<StreamMessage>>,
    /// Samples received but not yet handed out by `read`.
    pending: VecDeque<i16>,
    channels: usize,
    state: CaptureState,
}

impl CpalSource {
    /// Create an unopened source.  The device is resolved by
    /// [`AudioSource::open`].
    pub fn new() -> Self {
        Self {
            stream: None,
            rx: None,
            pending: VecDeque::new(),
            channels: 1,
            state: CaptureState::Unopened,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CaptureState {
        self.state
    }
}

impl Default for CpalSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSource for CpalSource {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CaptureError> {
        if self.state != CaptureState::Unopened {
            return Err(CaptureError::InvalidState {
                from: self.state,
                to: CaptureState::Recording,
            });
        }

        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(CaptureError::NoDevice)?;

        log::info!(
            "Using audio input device: {}",
            device.name().unwrap_or_else(|_| "<unnamed>".into())
        );

        let stream_config = stream_config(config);

        let (tx, rx) = mpsc::channel::<StreamMessage>();
        let err_tx = tx.clone();

        let stream = match config.sample_format {
            SampleFormat::I16 => device.build_input_stream(
                &stream_config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    // Ignore send errors; the reader is gone once closed.
                    let _ = tx.send(StreamMessage::Samples(data.to_vec()));
                },
                move |err: cpal::StreamError| {
                    log::error!("cpal stream error: {err}");
                    let _ = err_tx.send(StreamMessage::Error(err.to_string()));
                },
                None, // no timeout
            )?,
        };

        stream.play()?;

        log::debug!(
            "Input stream open: {} Hz, {} ch, {:?}, {} frames/read",
            config.sample_rate,
            config.channels,
            config.sample_format,
            config.buffer_size
        );

        self.state.transition(CaptureState::Recording)?;
        self.stream = Some(stream);
        self.rx = Some(rx);
        self.pending.clear();
        self.channels = config.channels as usize;
        Ok(())
    }

    fn read(&mut self, frames: usize) -> Result<FrameBuffer, CaptureError> {
        if self.state != CaptureState::Recording {
            return Err(CaptureError::NotRecording(self.state));
        }
        let rx = self.rx.as_ref().ok_or(CaptureError::Disconnected)?;
        let samples = take_samples(rx, &mut self.pending, frames * self.channels)?;
        Ok(FrameBuffer::from_i16_samples(&samples))
    }

    fn close(&mut self) -> Result<(), CaptureError> {
        if self.state != CaptureState::Recording {
            return Ok(());
        }
        self.state.transition(CaptureState::Closed)?;

        self.rx = None;
        self.pending.clear();
        match self.stream.take() {
            // Dropping the stream releases the device even if pause fails.
            Some(stream) => stream.pause().map_err(CaptureError::from),
            None => Ok(()),
        }
    }
}

/// Stream parameters for `config`.
///
/// The host keeps its default callback size; `buffer_size` only sets how
/// many frames each [`AudioSource::read`] returns.
fn stream_config(config: &CaptureConfig) -> cpal::StreamConfig {
    cpal::StreamConfig {
        channels: config.channels,
        sample_rate: cpal::SampleRate(config.sample_rate),
        buffer_size: cpal::BufferSize::Default,
    }
}

/// Block on `rx` until `pending` holds at least `wanted` samples, then split
/// off exactly `wanted` of them.  Leftover samples stay queued for the next
/// read.
fn take_samples(
    rx: &mpsc::Receiver<StreamMessage>,
    pending: &mut VecDeque<i16>,
    wanted: usize,
) -> Result<Vec<i16>, CaptureError> {
    while pending.len() < wanted {
        match rx.recv() {
            Ok(StreamMessage::Samples(block)) => pending.extend(block),
            Ok(StreamMessage::Error(e)) => return Err(CaptureError::Stream(e)),
            Err(_) => return Err(CaptureError::Disconnected),
        }
    }
    Ok(pending.drain(..wanted).collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
