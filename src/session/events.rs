use tokio::sync::mpsc;
use tracing::debug;

use crate::audio::WavFile;

/// Notifications emitted at session state transitions
///
/// These are advisory; nothing in the session waits on a listener.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Session initialized and ready to record
    Ready,
    /// Capture started
    Start,
    /// Buffers discarded, back to ready
    Reset,
    /// Session reached a terminal state and released its capture
    End,
    /// Export finished
    Data(WavFile),
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Start => "start",
            Self::Reset => "reset",
            Self::End => "end",
            Self::Data(_) => "data",
        }
    }
}

/// Fan-out of session events to every subscriber
#[derive(Debug, Default)]
pub struct EventBus {
    listeners: Vec<mpsc::UnboundedSender<SessionEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.push(tx);
        rx
    }

    /// Deliver an event, dropping listeners whose receiver has gone away
    pub fn emit(&mut self, event: SessionEvent) {
        debug!("Emitting '{}' to {} listener(s)", event.name(), self.listeners.len());
        self.listeners.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
