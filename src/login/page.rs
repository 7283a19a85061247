use std::time::Duration;
use thiserror::Error;

/// How long an error toast stays on screen.
pub const ERROR_TOAST_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    /// `None` keeps the toast until the page goes away.
    pub dismiss_after: Option<Duration>,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
            dismiss_after: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
            dismiss_after: Some(ERROR_TOAST_TTL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("navigation to {target} failed: {reason}")]
pub struct NavigationError {
    pub target: String,
    pub reason: String,
}

/// Side effects the login flow has on the page around the form.
pub trait Page {
    fn toast(&mut self, toast: Toast);

    /// Invalid-form feedback.
    fn shake(&mut self);

    /// Leave the login page.
    ///
    /// # Errors
    /// Returns an error if the target cannot be reached.
    fn navigate(&mut self, target: &str) -> Result<(), NavigationError>;
}

/// Page that records every effect; useful for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    pub toasts: Vec<Toast>,
    pub shakes: usize,
    pub location: Option<String>,
}

impl MemoryPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Page for MemoryPage {
    fn toast(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    fn shake(&mut self) {
        self.shakes += 1;
    }

    fn navigate(&mut self, target: &str) -> Result<(), NavigationError> {
        self.location = Some(target.to_string());
        Ok(())
    }
}
