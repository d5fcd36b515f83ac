use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics about a recording session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Session identifier used in log lines
    pub session_id: String,

    /// Lifecycle state name (e.g. "recording")
    pub state: String,

    /// When the current capture started
    pub started_at: Option<DateTime<Utc>>,

    /// Frames buffered per channel
    pub frames: usize,

    /// Number of captured channels
    pub channels: u16,

    /// Buffered audio in seconds at the capture rate
    pub captured_secs: f64,

    /// Whether the last stop was triggered by silence
    pub auto_stopped: bool,
}
