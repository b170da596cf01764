use std::time::Duration;

pub const SHORT_TOAST: Duration = Duration::from_millis(2000);
pub const LONG_TOAST: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
}

/// Transient message shown over the current page
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    remaining: Duration,
}

/// Holds at most one toast; a newer one replaces the old
#[derive(Debug, Default)]
pub struct Toasts {
    current: Option<Toast>,
}

impl Toasts {
    pub fn show(&mut self, message: impl Into<String>, level: ToastLevel, ttl: Duration) {
        self.current = Some(Toast {
            message: message.into(),
            level,
            remaining: ttl,
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(message, ToastLevel::Success, SHORT_TOAST);
    }

    /// Age the current toast by `dt`, dropping it once expired
    pub fn on_tick(&mut self, dt: Duration) {
        if let Some(toast) = self.current.as_mut() {
            toast.remaining = toast.remaining.saturating_sub(dt);
            if toast.remaining.is_zero() {
                self.current = None;
            }
        }
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }
}
