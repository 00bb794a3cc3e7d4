//! Shared helpers for unit tests.

use std::sync::Mutex;

use crate::error::{Notification, Notifier};

/// Notifier that records everything it is told, for assertions.
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    pub notifications: Mutex<Vec<Notification>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(notification);
    }
}
