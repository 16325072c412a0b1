// src/notify.rs

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

impl NotificationLevel {
    /// Wire name used in the `showMessage` toast payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::Success => "success",
            NotificationLevel::Error => "error",
        }
    }
}

/// Transient user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Notification capability injected into the edit form component. Keeps the
/// component free of any ambient toast singleton.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NotificationLevel, message: &str);
}

/// Buffers notifications raised during one request so the handler can drain
/// them into a toast payload afterwards.
#[derive(Debug, Default)]
pub struct ToastQueue {
    queue: Mutex<Vec<Notification>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notification> {
        let mut queue = self
            .queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::take(&mut *queue)
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, level: NotificationLevel, message: &str) {
        let mut queue = self
            .queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        queue.push(Notification {
            level,
            message: message.to_string(),
        });
    }
}
