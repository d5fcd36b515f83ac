//! Error types for the capture and export core.
//!
//! Application code (config loading, file replay, CLI) uses `anyhow`;
//! everything that decides whether audio may be buffered or exported
//! returns [`RecorderError`] so callers can match on the failure kind.

use crate::session::SessionState;

pub type Result<T> = std::result::Result<T, RecorderError>;

#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    /// Operation attempted outside its allowed lifecycle state.
    #[error("cannot {operation} while session is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    /// Export target rate exceeds the source rate (upsampling is unsupported).
    #[error("cannot resample from {source_rate}Hz to {target_rate}Hz (upsampling unsupported)")]
    InvalidRate { source_rate: f64, target_rate: f64 },

    /// Two channel arrays that must line up have different lengths.
    #[error("channel length mismatch: {left} vs {right} samples")]
    LengthMismatch { left: usize, right: usize },

    /// Channel buffers diverged in total frame count. Export is refused.
    #[error("buffer invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid audio config: {0}")]
    InvalidConfig(String),

    #[error("channel index {index} out of range for {channels} channel(s)")]
    ChannelOutOfRange { index: usize, channels: usize },

    #[error("frame has {actual} channel(s), session expects {expected}")]
    ChannelCountMismatch { expected: usize, actual: usize },

    /// Capture too long for the 32-bit WAV size fields.
    #[error("{samples} samples exceed the WAV data size limit")]
    ExportTooLarge { samples: usize },

    #[error("unsupported container type: {0}")]
    UnsupportedContainer(String),

    #[error("export task failed: {0}")]
    ExportTask(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_display() {
        let err = RecorderError::InvalidState {
            operation: "start",
            state: SessionState::Stopped,
        };
        assert_eq!(err.to_string(), "cannot start while session is stopped");
    }

    #[test]
    fn test_invalid_rate_display() {
        let err = RecorderError::InvalidRate {
            source_rate: 16000.0,
            target_rate: 48000.0,
        };
        assert!(err.to_string().contains("16000Hz to 48000Hz"));
    }
}
