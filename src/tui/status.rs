//! Status bar messages for the preflight screen.
//!
//! Messages report the outcome of user actions (reloads, mode changes,
//! theme switches) and clear themselves after a configurable duration.

use std::time::{Duration, Instant};

/// Severity of a status bar message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusLevel {
    #[default]
    Info,
    Error,
}

/// Holds at most one status bar message with optional auto-clear.
#[derive(Debug, Clone, Default)]
pub struct StatusMessage {
    message: Option<(String, StatusLevel)>,
    set_at: Option<Instant>,
    auto_clear_after: Option<Duration>,
}

impl StatusMessage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a status message holder that clears after `duration`.
    #[must_use]
    pub const fn with_auto_clear(duration: Duration) -> Self {
        Self {
            message: None,
            set_at: None,
            auto_clear_after: Some(duration),
        }
    }

    pub fn info(&mut self, msg: impl Into<String>) {
        self.set(msg, StatusLevel::Info);
    }

    pub fn error(&mut self, msg: impl Into<String>) {
        self.set(msg, StatusLevel::Error);
    }

    fn set(&mut self, msg: impl Into<String>, level: StatusLevel) {
        self.message = Some((msg.into(), level));
        self.set_at = Some(Instant::now());
    }

    pub fn clear(&mut self) {
        self.message = None;
        self.set_at = None;
    }

    /// Drop the message if its auto-clear duration has elapsed.
    pub fn expire(&mut self) {
        if let (Some(set_at), Some(duration)) = (self.set_at, self.auto_clear_after) {
            if set_at.elapsed() >= duration {
                self.clear();
            }
        }
    }

    /// The current message without checking auto-clear.
    #[must_use]
    pub fn peek(&self) -> Option<(&str, StatusLevel)> {
        self.message.as_ref().map(|(m, level)| (m.as_str(), *level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_status_message_set_clear() {
        let mut status = StatusMessage::new();
        assert!(status.peek().is_none());

        status.error("Fetch failed");
        assert_eq!(status.peek(), Some(("Fetch failed", StatusLevel::Error)));

        status.clear();
        assert!(status.peek().is_none());
    }

    #[test]
    fn test_status_message_auto_clear() {
        let mut status = StatusMessage::with_auto_clear(Duration::from_millis(50));
        status.info("Reloaded");
        status.expire();
        assert!(status.peek().is_some());

        thread::sleep(Duration::from_millis(60));
        status.expire();
        assert!(status.peek().is_none());
    }

    #[test]
    fn test_status_message_no_auto_clear_default() {
        let mut status = StatusMessage::new();
        status.info("Sticky");
        thread::sleep(Duration::from_millis(10));
        status.expire();
        assert!(status.peek().is_some());
    }
}
