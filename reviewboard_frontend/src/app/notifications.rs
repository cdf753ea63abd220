use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::query::Clock;

pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub level: Level,
    pub text: String,
    shown_at: Instant,
}

/// Short-lived toasts shown under the top bar.
pub struct Notifications {
    items: Vec<Notification>,
    next_id: u64,
    clock: Arc<dyn Clock>,
}

impl Notifications {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            items: Vec::new(),
            next_id: 0,
            clock,
        }
    }

    pub fn push(&mut self, level: Level, text: impl Into<String>) {
        let text = text.into();
        // Same toast twice in a row just restarts its timer.
        if let Some(last) = self.items.last_mut() {
            if last.level == level && last.text == text {
                last.shown_at = self.clock.now();
                return;
            }
        }
        self.next_id += 1;
        self.items.push(Notification {
            id: self.next_id,
            level,
            text,
            shown_at: self.clock.now(),
        });
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(Level::Success, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(Level::Error, text);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(Level::Info, text);
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|n| n.id != id);
    }

    /// Drops expired toasts and returns how long until the next one expires.
    pub fn expire(&mut self) -> Option<Duration> {
        let now = self.clock.now();
        self.items
            .retain(|n| now.saturating_duration_since(n.shown_at) < NOTIFICATION_TTL);
        self.items
            .iter()
            .map(|n| NOTIFICATION_TTL.saturating_sub(now.saturating_duration_since(n.shown_at)))
            .min()
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ManualClock;

    #[test]
    fn toasts_expire_after_ttl() {
        let clock = Arc::new(ManualClock::default());
        let mut toasts = Notifications::new(clock.clone());
        toasts.success("Review liked");
        clock.advance(Duration::from_secs(3));
        toasts.error("Failed to post comment");

        assert_eq!(toasts.expire(), Some(Duration::from_secs(1)));
        clock.advance(Duration::from_secs(1));
        toasts.expire();
        let texts: Vec<_> = toasts.items().iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["Failed to post comment"]);
    }

    #[test]
    fn dismiss_removes_one() {
        let mut toasts = Notifications::new(Arc::new(ManualClock::default()));
        toasts.info("a");
        toasts.info("b");
        let first = toasts.items()[0].id;
        toasts.dismiss(first);
        assert_eq!(toasts.items().len(), 1);
        assert_eq!(toasts.items()[0].text, "b");
    }

    #[test]
    fn repeated_toast_is_not_stacked() {
        let mut toasts = Notifications::new(Arc::new(ManualClock::default()));
        toasts.error("Failed to like review");
        toasts.error("Failed to like review");
        assert_eq!(toasts.items().len(), 1);
    }
}
