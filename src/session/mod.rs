//! Recording session management
//!
//! This module provides the `RecordingSession` abstraction that manages:
//! - The capture lifecycle (ready, recording, stopped, aborted)
//! - Per-channel buffering of incoming frames
//! - Silence detection and auto-stop
//! - Export of the capture as a WAV file
//! - Lifecycle notifications and statistics

mod config;
mod events;
mod session;
mod silence;
mod state;
mod stats;

pub use config::{AudioConfig, RecorderSettings};
pub use events::{EventBus, SessionEvent};
pub use session::RecordingSession;
pub use silence::{peak_level_db, SilenceMonitor};
pub use state::SessionState;
pub use stats::SessionStats;
