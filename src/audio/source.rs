//! Audio input capability.
//!
//! [`AudioSource`] is the seam between the capture loop and a concrete
//! backend: one lifecycle pair (`open` / `close`) and one blocking operation
//! (`read` exactly N frames).  [`crate::audio::CpalSource`] is the production
//! implementation; [`MockSource`] (available under `#[cfg(test)]`) produces
//! deterministic samples so the capture loop can be tested without hardware.

use crate::audio::capture::CaptureError;
use crate::audio::frame::FrameBuffer;
use crate::config::CaptureConfig;

// ---------------------------------------------------------------------------
// AudioSource trait
// ---------------------------------------------------------------------------

/// Object-safe interface for blocking PCM input.
///
/// # Contract
///
/// - `open` is called once before any `read`.
/// - `read(frames)` blocks until `frames` frames are available and returns
///   exactly `frames × sample_width × channels` bytes.
/// - `close` stops the stream and releases the device.  It is called once,
///   including when a read has failed.
pub trait AudioSource {
    /// Open and start an input stream with the given parameters.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CaptureError>;

    /// Block until `frames` frames have been captured and return them.
    fn read(&mut self, frames: usize) -> Result<FrameBuffer, CaptureError>;

    /// Stop the stream and release the device.
    fn close(&mut self) -> Result<(), CaptureError>;
}

// Compile-time assertion: &mut dyn AudioSource must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: &mut dyn AudioSource) {}
};

// ---------------------------------------------------------------------------
// MockSource  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a ramp of sample values without touching any
/// audio device.
///
/// Sample `n` (counting from the first read) has the value `n as i16`
/// (wrapping), so the order of buffers in a recording is observable.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockSource {
    /// Number of successful `open` calls.
    pub opens: usize,
    /// Number of `close` calls.
    pub closes: usize,
    /// Number of `read` calls, including failed ones.
    pub reads: usize,
    /// Frame sizes requested by each `read`.
    pub requested: Vec<usize>,
    channels: usize,
    next_sample: i16,
    fail_open: bool,
    short_read_at: Option<usize>,
}

#[cfg(test)]
impl MockSource {
    /// A source that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A source whose `open` fails as if the device were missing.
    pub fn unavailable() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }

    /// A source whose `read` number `index` (0-based) returns one frame
    /// fewer than requested.
    pub fn short_read_at(index: usize) -> Self {
        Self {
            short_read_at: Some(index),
            ..Self::default()
        }
    }
}

#[cfg(test)]
impl AudioSource for MockSource {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CaptureError> {
        if self.fail_open {
            return Err(CaptureError::BuildStream(
                cpal::BuildStreamError::DeviceNotAvailable,
            ));
        }
        self.channels = config.channels as usize;
        self.opens += 1;
        Ok(())
    }

    fn read(&mut self, frames: usize) -> Result<FrameBuffer, CaptureError> {
        let index = self.reads;
        self.reads += 1;
        self.requested.push(frames);

        let frames = match self.short_read_at {
            Some(at) if at == index => frames.saturating_sub(1),
            _ => frames,
        };

        let samples: Vec<i16> = (0..frames * self.channels)
            .map(|_| {
                let s = self.next_sample;
                self.next_sample = self.next_sample.wrapping_add(1);
                s
            })
            .collect();
        Ok(FrameBuffer::from_i16_samples(&samples))
    }

    fn close(&mut self) -> Result<(), CaptureError> {
        self.closes += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
