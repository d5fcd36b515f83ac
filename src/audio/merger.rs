// Channel merging for export
//
// Captured audio arrives as many small chunks per channel. Before export each
// channel is flattened into one contiguous array, and stereo captures are
// interleaved into a single [L0, R0, L1, R1, ...] stream for the encoder.

use tracing::debug;

use super::buffer::ChannelBuffer;
use crate::error::{RecorderError, Result};

/// Concatenate every chunk of a channel in arrival order
pub fn merge(buffer: &ChannelBuffer) -> Vec<f32> {
    let mut merged = Vec::with_capacity(buffer.len());
    for chunk in buffer.chunks() {
        merged.extend_from_slice(chunk);
    }

    debug!(
        "Merged {} chunks into {} samples",
        buffer.chunks().len(),
        merged.len()
    );

    merged
}

/// Interleave two equal-length channels into one stream
pub fn interleave(left: &[f32], right: &[f32]) -> Result<Vec<f32>> {
    if left.len() != right.len() {
        return Err(RecorderError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    let mut interleaved = Vec::with_capacity(left.len() + right.len());
    for (&l, &r) in left.iter().zip(right) {
        interleaved.push(l);
        interleaved.push(r);
    }

    Ok(interleaved)
}

/// Flatten per-channel arrays into the stream the encoder expects
///
/// Mono data is passed through untouched; stereo is interleaved.
pub fn to_stream(channels: Vec<Vec<f32>>) -> Result<Vec<f32>> {
    let mut channels = channels.into_iter();
    match (channels.next(), channels.next(), channels.next()) {
        (None, _, _) => Ok(Vec::new()),
        (Some(mono), None, _) => Ok(mono),
        (Some(left), Some(right), None) => interleave(&left, &right),
        (Some(_), Some(_), Some(_)) => Err(RecorderError::InvalidConfig(
            "only mono and stereo captures can be exported".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_concatenates_in_order() {
        let mut buffer = ChannelBuffer::new();
        buffer.push(vec![1.0, 2.0]);
        buffer.push(vec![]);
        buffer.push(vec![3.0]);

        assert_eq!(merge(&buffer), vec![1.0, 2.0, 3.0]);
        // Input untouched
        assert_eq!(buffer.chunks().len(), 3);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge(&ChannelBuffer::new()).is_empty());
    }

    #[test]
    fn test_interleave_even_odd_positions() {
        let left = vec![0.1, 0.2, 0.3];
        let right = vec![-0.1, -0.2, -0.3];
        let stream = interleave(&left, &right).unwrap();

        assert_eq!(stream.len(), 6);
        for i in 0..3 {
            assert_eq!(stream[2 * i], left[i]);
            assert_eq!(stream[2 * i + 1], right[i]);
        }
    }

    #[test]
    fn test_interleave_empty() {
        assert!(interleave(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_interleave_length_mismatch() {
        let err = interleave(&[0.0, 0.0], &[0.0]).unwrap_err();
        assert!(matches!(
            err,
            RecorderError::LengthMismatch { left: 2, right: 1 }
        ));
    }

    #[test]
    fn test_to_stream_mono_passthrough() {
        let mono = vec![0.5, -0.5];
        assert_eq!(to_stream(vec![mono.clone()]).unwrap(), mono);
    }

    #[test]
    fn test_to_stream_rejects_three_channels() {
        let channels = vec![vec![0.0], vec![0.0], vec![0.0]];
        assert!(to_stream(channels).is_err());
    }
}
