//! Side effects fired when an operation settles.
//!
//! Implementations belong to whatever surface drives the client (a terminal,
//! a test harness). Effects may fire after the scope that triggered the
//! operation has gone away, so every method must be a harmless no-op in that
//! case.

use std::fmt;

/// Tone of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NotificationKind::Success => write!(f, "✓ {}", self.message),
            NotificationKind::Error => write!(f, "✗ {}", self.message),
        }
    }
}

/// Navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Landing page.
    Home,
}

impl View {
    /// Route path of the view.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
        }
    }
}

/// Receiver of operation side effects.
pub trait Effects: Send + Sync {
    /// Show a transient notification.
    fn notify(&self, notification: Notification);

    /// Discard everything on screen and load it again from the backend.
    fn reload(&self);

    /// Move to another view.
    fn navigate(&self, view: View);
}
