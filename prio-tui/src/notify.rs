use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A transient, non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Error,
        }
    }
}

pub type NotificationTx = UnboundedSender<Notification>;
pub type NotificationRx = UnboundedReceiver<Notification>;

pub fn channel() -> (NotificationTx, NotificationRx) {
    mpsc::unbounded_channel()
}

const TOAST_TTL: Duration = Duration::from_secs(5);
const MAX_TOASTS: usize = 4;

#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub shown_at: Instant,
}

/// Notifications currently on screen, oldest first.
#[derive(Debug)]
pub struct Toasts {
    items: VecDeque<Toast>,
    ttl: Duration,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(TOAST_TTL)
    }
}

impl Toasts {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            ttl,
        }
    }

    pub fn push(&mut self, notification: Notification, now: Instant) {
        if self.items.len() == MAX_TOASTS {
            self.items.pop_front();
        }
        self.items.push_back(Toast {
            notification,
            shown_at: now,
        });
    }

    /// Drop toasts older than the TTL.
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items
            .retain(|toast| now.saturating_duration_since(toast.shown_at) < ttl);
    }

    pub fn dismiss_all(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_after_ttl() {
        let start = Instant::now();
        let mut toasts = Toasts::new(Duration::from_secs(2));
        toasts.push(Notification::info("Project created", "ok"), start);
        toasts.push(
            Notification::error("Error deleting project", "boom"),
            start + Duration::from_secs(1),
        );

        toasts.prune(start + Duration::from_millis(1500));
        assert_eq!(toasts.iter().count(), 2);

        toasts.prune(start + Duration::from_millis(2500));
        let left: Vec<_> = toasts.iter().map(|t| t.notification.title.as_str()).collect();
        assert_eq!(left, vec!["Error deleting project"]);

        toasts.prune(start + Duration::from_secs(4));
        assert!(toasts.is_empty());
    }

    #[test]
    fn oldest_toast_is_dropped_when_full() {
        let now = Instant::now();
        let mut toasts = Toasts::default();
        for i in 0..=MAX_TOASTS {
            toasts.push(Notification::info(format!("n{}", i), ""), now);
        }

        let titles: Vec<_> = toasts.iter().map(|t| t.notification.title.clone()).collect();
        assert_eq!(titles.len(), MAX_TOASTS);
        assert_eq!(titles[0], "n1");
    }
}
