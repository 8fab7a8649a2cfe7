//! Notification state
//!
//! Holds at most one message; showing a new one replaces the old.

use std::time::{Duration, Instant};

/// How long a notification stays on screen
pub const DEFAULT_DURATION: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub shown_at: Instant,
    pub duration: Duration,
}

impl Notification {
    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= self.duration
    }
}

#[derive(Debug, Default)]
pub struct NotificationState {
    current: Option<Notification>,
}

impl NotificationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: &str) {
        self.show_for(message, DEFAULT_DURATION);
    }

    pub fn show_for(&mut self, message: &str, duration: Duration) {
        self.current = Some(Notification {
            message: message.to_string(),
            shown_at: Instant::now(),
            duration,
        });
    }

    /// The active notification, if it has not expired
    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref().filter(|n| !n.is_expired())
    }

    pub fn current_message(&self) -> Option<&str> {
        self.current().map(|n| n.message.as_str())
    }

    /// Drop an expired notification; returns true if one was removed
    pub fn clear_expired(&mut self) -> bool {
        if self.current.as_ref().is_some_and(Notification::is_expired) {
            self.current = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_sets_current_message() {
        let mut state = NotificationState::new();
        assert!(state.current().is_none());

        state.show("Saved");
        assert_eq!(state.current_message(), Some("Saved"));
    }

    #[test]
    fn test_new_message_replaces_old() {
        let mut state = NotificationState::new();
        state.show("first");
        state.show("second");
        assert_eq!(state.current_message(), Some("second"));
    }

    #[test]
    fn test_expired_notification_is_hidden_and_cleared() {
        let mut state = NotificationState::new();
        state.show_for("gone", Duration::ZERO);
        assert!(state.current().is_none());
        assert!(state.clear_expired());
        assert!(!state.clear_expired());
    }
}
