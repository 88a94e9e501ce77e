//! Captured PCM buffers.
//!
//! A [`FrameBuffer`] is the byte image of one blocking read: exactly
//! `buffer_size × sample_width × channels` bytes of little-endian signed
//! 16-bit samples.  A [`Recording`] is the ordered sequence of those buffers;
//! read order is the only relationship between them.

// ---------------------------------------------------------------------------
// FrameBuffer
// ---------------------------------------------------------------------------

/// Immutable PCM bytes produced by one read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bytes: Vec<u8>,
}

impl FrameBuffer {
    /// Encode `samples` as little-endian 16-bit PCM.
    ///
    /// ```
    /// use wav_recorder::audio::FrameBuffer;
    ///
    /// let buf = FrameBuffer::from_i16_samples(&[1, -2]);
    /// assert_eq!(buf.as_bytes(), &[0x01, 0x00, 0xFE, 0xFF]);
    /// ```
    pub fn from_i16_samples(samples: &[i16]) -> Self {
        let mut bytes = Vec::with_capacity(samples.len() * 2);
        for sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        Self { bytes }
    }

    /// Raw PCM bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte length of the buffer.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Recording
// ---------------------------------------------------------------------------

/// Ordered sequence of [`FrameBuffer`]s plus the format needed to interpret
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    buffers: Vec<FrameBuffer>,
    sample_rate: u32,
    channels: u16,
    sample_width: u16,
}

impl Recording {
    /// Create an empty recording for the given format.
    pub fn new(sample_rate: u32, channels: u16, sample_width: u16) -> Self {
        Self {
            buffers: Vec::new(),
            sample_rate,
            channels,
            sample_width,
        }
    }

    /// Append the next buffer in read order.
    pub fn push(&mut self, buffer: FrameBuffer) {
        self.buffers.push(buffer);
    }

    /// Buffers in read order.
    pub fn buffers(&self) -> &[FrameBuffer] {
        &self.buffers
    }

    /// Number of reads that produced this recording.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Concatenate every buffer into one contiguous payload, preserving order.
    pub fn concat(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(self.total_bytes());
        for buffer in &self.buffers {
            payload.extend_from_slice(buffer.as_bytes());
        }
        payload
    }

    /// Total payload length in bytes.
    pub fn total_bytes(&self) -> usize {
        self.buffers.iter().map(FrameBuffer::len).sum()
    }

    /// Number of frames (one sample per channel) in the payload.
    pub fn frame_count(&self) -> usize {
        let frame_bytes = self.sample_width as usize * self.channels as usize;
        if frame_bytes == 0 {
            return 0;
        }
        self.total_bytes() / frame_bytes
    }

    /// Recorded duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Decode the payload back into interleaved `i16` samples, in order.
    pub fn samples(&self) -> impl Iterator<Item = i16> + '_ {
        self.buffers.iter().flat_map(|buffer| {
            buffer
                .as_bytes()
                .chunks_exact(2)
                .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Bytes per sample.
    pub fn sample_width(&self) -> u16 {
        self.sample_width
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
