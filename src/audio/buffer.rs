use crate::error::{RecorderError, Result};

/// Chunks received for a single channel, in arrival order
#[derive(Debug, Clone, Default)]
pub struct ChannelBuffer {
    chunks: Vec<Vec<f32>>,
    total_samples: usize,
}

impl ChannelBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: Vec<f32>) {
        self.total_samples += chunk.len();
        self.chunks.push(chunk);
    }

    /// Chunks in the order they were appended
    pub fn chunks(&self) -> &[Vec<f32>] {
        &self.chunks
    }

    /// Running sample count across all chunks
    pub fn len(&self) -> usize {
        self.total_samples
    }

    pub fn is_empty(&self) -> bool {
        self.total_samples == 0
    }
}

/// Per-channel accumulation of captured sample chunks
///
/// The buffer grows without bound for the duration of a capture. It does not
/// check that channels receive chunks of matching length; the session does
/// that before appending.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    channels: Vec<ChannelBuffer>,
}

impl SampleBuffer {
    pub fn new(channel_count: usize) -> Self {
        Self {
            channels: vec![ChannelBuffer::new(); channel_count],
        }
    }

    /// Append a chunk to one channel
    pub fn append(&mut self, channel_index: usize, chunk: Vec<f32>) -> Result<()> {
        let channels = self.channels.len();
        let channel = self
            .channels
            .get_mut(channel_index)
            .ok_or(RecorderError::ChannelOutOfRange {
                index: channel_index,
                channels,
            })?;

        channel.push(chunk);
        Ok(())
    }

    /// Drop every buffered chunk, keeping the channel layout
    pub fn clear(&mut self) {
        for channel in &mut self.channels {
            *channel = ChannelBuffer::new();
        }
    }

    /// Frames captured so far
    ///
    /// Fails with `InvariantViolation` if the channels have diverged.
    pub fn total_frames(&self) -> Result<usize> {
        let mut counts = self.channels.iter().map(ChannelBuffer::len);
        let first = counts.next().unwrap_or(0);

        for (index, count) in counts.enumerate() {
            if count != first {
                return Err(RecorderError::InvariantViolation(format!(
                    "channel {} holds {} frames but channel 0 holds {}",
                    index + 1,
                    count,
                    first
                )));
            }
        }

        Ok(first)
    }

    pub fn channel(&self, index: usize) -> Option<&ChannelBuffer> {
        self.channels.get(index)
    }

    pub fn channels(&self) -> &[ChannelBuffer] {
        &self.channels
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
