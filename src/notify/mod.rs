/// Editor-facing notifications
///
/// Forms report outcomes through an injected [`Notifier`] instead of a global toast API.
/// [`NotificationLog`] keeps them for the admin UI to poll and mirrors each one to tracing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{collections::VecDeque, sync::Mutex};

/// Shown when an image input fires without a file
pub const NO_FILE_SELECTED: &str = "Lütfen bir dosya seçin.";
/// Prefix for upload failures, followed by the storage error
pub const IMAGE_UPLOAD_FAILED: &str = "Resim yüklenemedi. Hata: ";
/// Notifications retained by default before the oldest are dropped
pub const DEFAULT_LOG_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Sink for transient success/error messages
pub trait Notifier: Send + Sync {
    fn notify(&self, level: Level, message: &str);

    fn success(&self, message: &str) {
        self.notify(Level::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(Level::Error, message);
    }
}

/// Notifier that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Success => tracing::info!("✅ {}", message),
            Level::Error => tracing::warn!("❌ {}", message),
        }
    }
}

/// Notifier retaining the most recent messages until drained
///
/// Holds at most `capacity` entries; when full, the oldest is dropped.
#[derive(Debug)]
pub struct NotificationLog {
    entries: Mutex<VecDeque<Notification>>,
    capacity: usize,
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Copy of all retained notifications, oldest first
    pub fn snapshot(&self) -> Vec<Notification> {
        self.lock().iter().cloned().collect()
    }

    /// Remove and return all retained notifications
    pub fn drain(&self) -> Vec<Notification> {
        self.lock().drain(..).collect()
    }

    pub fn messages(&self, level: Level) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.message.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Notification>> {
        // A panic while pushing cannot leave the queue inconsistent.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, level: Level, message: &str) {
        TracingNotifier.notify(level, message);
        let mut entries = self.lock();
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(Notification {
            level,
            message: message.to_string(),
            at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_order_and_drains() {
        let log = NotificationLog::new();
        log.success("Proje Eklendi");
        log.error("Proje Silinemedi");

        assert_eq!(log.messages(Level::Error), vec!["Proje Silinemedi"]);
        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].level, Level::Success);
        assert!(log.snapshot().is_empty());
    }

    #[test]
    fn full_log_drops_the_oldest() {
        let log = NotificationLog::with_capacity(3);
        for n in 1..=5 {
            log.error(&format!("Resim yüklenemedi. Hata: {}", n));
        }

        let kept: Vec<String> = log.snapshot().into_iter().map(|n| n.message).collect();
        assert_eq!(
            kept,
            vec![
                "Resim yüklenemedi. Hata: 3",
                "Resim yüklenemedi. Hata: 4",
                "Resim yüklenemedi. Hata: 5",
            ]
        );
        assert_eq!(NotificationLog::new().capacity, DEFAULT_LOG_CAPACITY);
    }
}
