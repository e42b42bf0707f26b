use crate::domain::ports::{Notice, Notifier};
use std::sync::Mutex;

/// Prints notices to the terminal, the CLI's equivalent of an alert box.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match &notice {
            Notice::Info(message) => {
                tracing::info!("🔔 {}", message);
                println!("🔔 {}", message);
            }
            Notice::Error(message) => {
                tracing::warn!("❌ {}", message);
                eprintln!("❌ {}", message);
            }
        }
    }
}

/// Keeps every notice in memory. Used by session reports and tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices
            .lock()
            .ok()
            .and_then(|notices| notices.last().cloned())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notice::Info("first".to_string()));
        notifier.notify(Notice::Error("second".to_string()));

        assert_eq!(notifier.notices().len(), 2);
        assert_eq!(notifier.last(), Some(Notice::Error("second".to_string())));
    }
}
