//! # Toasts
//!
//! Short-lived notifications. Each toast removes itself after the configured
//! duration; nothing here is persisted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Cart,
    Wishlist,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub title: Option<String>,
    pub message: String,
}

/// The notification queue. Clones share the same queue.
#[derive(Clone)]
pub struct Toasts {
    active: Arc<Mutex<Vec<Toast>>>,
    next_id: Arc<AtomicU64>,
    duration: Duration,
}

impl Toasts {
    pub fn new(duration: Duration) -> Self {
        Self {
            active: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            duration,
        }
    }

    /// Shows a toast and schedules its removal. Must be called inside a Tokio runtime.
    pub fn enqueue(&self, kind: ToastKind, title: Option<&str>, message: impl Into<String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push(Toast {
            id,
            kind,
            title: title.map(str::to_string),
            message: message.into(),
        });
        debug!(id, ?kind, "Toast shown");

        let toasts = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(toasts.duration).await;
            toasts.dismiss(id);
        });
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.enqueue(ToastKind::Success, None, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.enqueue(ToastKind::Error, None, message)
    }

    /// Removes a toast now. Returns whether it was still showing.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut active = self.lock();
        let before = active.len();
        active.retain(|toast| toast.id != id);
        active.len() < before
    }

    /// Toasts currently showing, oldest first.
    pub fn active(&self) -> Vec<Toast> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
