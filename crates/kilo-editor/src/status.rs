//! The status message shown on the message bar.
//!
//! A message remembers when it was set and disappears once it is older than
//! the configured timeout. Callers format the text themselves; the message
//! bar only ever sees a finished `String`.

use std::time::{Duration, Instant};

/// A timed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    text: String,
    set_at: Instant,
}

impl StatusMessage {
    /// A message set at `now`.
    #[must_use]
    pub fn new(text: impl Into<String>, now: Instant) -> Self {
        Self {
            text: text.into(),
            set_at: now,
        }
    }

    /// The message text.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the message is still fresh at `now`.
    #[must_use]
    pub fn is_visible(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.set_at) < timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn visible_when_fresh() {
        let t0 = Instant::now();
        let msg = StatusMessage::new("hi", t0);
        assert!(msg.is_visible(t0, TIMEOUT));
        assert!(msg.is_visible(t0 + Duration::from_millis(4999), TIMEOUT));
    }

    #[test]
    fn hidden_at_timeout() {
        let t0 = Instant::now();
        let msg = StatusMessage::new("hi", t0);
        assert!(!msg.is_visible(t0 + TIMEOUT, TIMEOUT));
        assert!(!msg.is_visible(t0 + Duration::from_secs(60), TIMEOUT));
    }

    #[test]
    fn clock_before_set_counts_as_fresh() {
        let t0 = Instant::now();
        let msg = StatusMessage::new("hi", t0 + Duration::from_secs(1));
        assert!(msg.is_visible(t0, TIMEOUT));
    }

    #[test]
    fn text_round_trip() {
        let msg = StatusMessage::new(format!("{} bytes written to disk", 12), Instant::now());
        assert_eq!(msg.text(), "12 bytes written to disk");
    }
}
