use std::fmt;

/// Lifecycle of a recording session
///
/// ```text
/// Uninitialized -> Ready -> Recording -> Stopped
///                    ^                      |
///                    +------- reset --------+
/// ```
///
/// `Aborted` can be entered from anywhere and skips export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Ready,
    Recording,
    Stopped,
    Aborted,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Recording => "recording",
            Self::Stopped => "stopped",
            Self::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::Aborted)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
