//! Transient notification queue.
//!
//! `ToastQueue` is a cheaply cloneable handle shared by whoever needs to
//! surface a message. Consumers register a subscriber callback and receive
//! the full list on every mutation. Toasts auto-dismiss after a fixed
//! duration; `sweep_expired` exposes the same expiry decision without a
//! timer for deterministic tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const DEFAULT_TOAST_DURATION_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    created_at: Instant,
}

type Subscriber = Box<dyn Fn(&[Toast]) + Send>;

#[derive(Clone)]
pub struct ToastQueue {
    toasts: Arc<Mutex<Vec<Toast>>>,
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
    next_id: Arc<AtomicU64>,
    duration: Duration,
}

impl ToastQueue {
    pub fn new(duration: Duration) -> Self {
        Self {
            toasts: Arc::new(Mutex::new(Vec::new())),
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            duration,
        }
    }

    /// Insert a toast at the front of the list (newest first) and return
    /// its id. When a tokio runtime is available, a timer task dismisses
    /// the toast after the configured duration.
    pub fn push(&self, message: impl Into<String>, severity: Severity) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let toast = Toast {
            id,
            message: message.into(),
            severity,
            created_at: Instant::now(),
        };

        {
            let mut toasts = self.locked_toasts();
            toasts.insert(0, toast);
        }
        self.notify();

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let queue = self.clone();
            let duration = self.duration;
            handle.spawn(async move {
                tokio::time::sleep(duration).await;
                queue.dismiss(id);
            });
        }

        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(message, Severity::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(message, Severity::Error)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.push(message, Severity::Warning)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.push(message, Severity::Info)
    }

    /// Remove the toast with the given id. Subscribers are notified
    /// synchronously; unknown ids are a no-op.
    pub fn dismiss(&self, id: u64) {
        let removed = {
            let mut toasts = self.locked_toasts();
            let before = toasts.len();
            toasts.retain(|t| t.id != id);
            toasts.len() != before
        };
        if removed {
            self.notify();
        }
    }

    /// Register a callback invoked with the current list on every mutation.
    pub fn subscribe(&self, f: impl Fn(&[Toast]) + Send + 'static) {
        match self.subscribers.lock() {
            Ok(mut subscribers) => subscribers.push(Box::new(f)),
            Err(poisoned) => poisoned.into_inner().push(Box::new(f)),
        }
    }

    /// Snapshot of the visible toasts, newest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.locked_toasts().clone()
    }

    /// Drop every toast older than the configured duration as of `now` and
    /// return how many were removed. This is the timer-free counterpart of
    /// the auto-dismiss task.
    pub fn sweep_expired(&self, now: Instant) -> usize {
        let removed = {
            let mut toasts = self.locked_toasts();
            let before = toasts.len();
            toasts.retain(|t| now.saturating_duration_since(t.created_at) < self.duration);
            before - toasts.len()
        };
        if removed > 0 {
            self.notify();
        }
        removed
    }

    fn notify(&self) {
        let snapshot = self.toasts();
        let subscribers = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        for subscriber in subscribers.iter() {
            subscriber(&snapshot);
        }
    }

    fn locked_toasts(&self) -> std::sync::MutexGuard<'_, Vec<Toast>> {
        match self.toasts.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_TOAST_DURATION_MS))
    }
}
