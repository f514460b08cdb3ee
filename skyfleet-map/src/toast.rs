use std::collections::VecDeque;

pub const TOAST_LIFETIME_SECS: f64 = 3.0;
pub const MAX_TOASTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub created_at: f64,
}

impl Toast {
    /// Remaining visibility in `[0, 1]`, used to fade the toast out.
    pub fn opacity(&self, now: f64) -> f32 {
        let remaining = (self.created_at + TOAST_LIFETIME_SECS - now) / TOAST_LIFETIME_SECS;
        remaining.clamp(0.0, 1.0) as f32
    }
}

/// Short-lived notifications, newest first.
#[derive(Debug, Default)]
pub struct Toasts {
    queue: VecDeque<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>, level: ToastLevel, now: f64) {
        self.queue.push_front(Toast {
            message: message.into(),
            level,
            created_at: now,
        });
        self.queue.truncate(MAX_TOASTS);
    }

    pub fn expire(&mut self, now: f64) {
        self.queue
            .retain(|toast| now - toast.created_at < TOAST_LIFETIME_SECS);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
