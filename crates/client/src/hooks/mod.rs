//! Backend operations with observable state and settlement side effects.
//!
//! Each named operation owns an [`Operation`], a small state machine
//! published on a [`watch`] channel:
//!
//! ```text
//! Idle -> Pending -> Succeeded(T)
//!                 -> Failed(message) -> Idle
//! ```
//!
//! Settling fires exactly one side effect, chosen by the operation's
//! [`Settlement`] rules. Triggering an operation that is already pending is
//! not refused here; views subscribe to the state and disable the control
//! while [`OperationState::is_pending`] holds.

mod my_restaurant;
mod my_user;
mod search;

pub use my_restaurant::MyRestaurantApi;
pub use my_user::MyUserApi;
pub use search::RestaurantSearchApi;

use tokio::sync::watch;
use tracing::debug;

use crate::effects::{Effects, Notification};
use crate::error::ApiError;

/// Observable state of one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OperationState<T> {
    /// Not triggered yet, or reset after a failure.
    #[default]
    Idle,
    /// Waiting for the credential or the backend.
    Pending,
    /// Settled successfully with the decoded response.
    Succeeded(T),
    /// Settled with an error; transient.
    Failed(String),
}

impl<T> OperationState<T> {
    /// Whether a trigger is in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// The last successful result, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Succeeded(data) => Some(data),
            _ => None,
        }
    }
}

/// What an operation does when it settles.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Settlement {
    /// Positive notification on success.
    pub success: Option<&'static str>,
    /// Force a full reload after the success notification.
    pub reload: bool,
    /// Surface failures as a notification.
    pub notify_errors: bool,
}

impl Settlement {
    /// A read: silent on success, notifies on failure.
    pub const fn read() -> Self {
        Self {
            success: None,
            reload: false,
            notify_errors: true,
        }
    }

    /// A write with a success message.
    pub const fn write(message: &'static str) -> Self {
        Self {
            success: Some(message),
            reload: false,
            notify_errors: true,
        }
    }

    /// A write whose result replaces what is on screen.
    pub const fn write_and_reload(message: &'static str) -> Self {
        Self {
            reload: true,
            ..Self::write(message)
        }
    }

    /// No notifications either way.
    pub const fn silent() -> Self {
        Self {
            success: None,
            reload: false,
            notify_errors: false,
        }
    }
}

/// State machine shared by every named operation.
#[derive(Debug)]
pub struct Operation<T> {
    state: watch::Sender<OperationState<T>>,
    settlement: Settlement,
}

impl<T: Clone> Operation<T> {
    pub(crate) fn new(settlement: Settlement) -> Self {
        Self {
            state: watch::Sender::new(OperationState::Idle),
            settlement,
        }
    }

    /// Observe state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<OperationState<T>> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> OperationState<T> {
        self.state.borrow().clone()
    }

    /// Whether a trigger is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.borrow().is_pending()
    }

    /// Return to `Idle`, dropping any retained result or error.
    pub fn reset(&self) {
        self.state.send_replace(OperationState::Idle);
    }

    pub(crate) fn begin(&self) {
        self.state.send_replace(OperationState::Pending);
    }

    /// Record the outcome and fire its side effect.
    pub(crate) fn settle<E: Effects + ?Sized>(
        &self,
        result: Result<T, ApiError>,
        effects: &E,
    ) -> Result<T, ApiError> {
        match result {
            Ok(value) => {
                self.state
                    .send_replace(OperationState::Succeeded(value.clone()));
                if let Some(message) = self.settlement.success {
                    effects.notify(Notification::success(message));
                    if self.settlement.reload {
                        effects.reload();
                    }
                }
                Ok(value)
            }
            Err(err) => {
                let message = err.to_string();
                debug!(error = %message, "Operation failed");
                self.state
                    .send_replace(OperationState::Failed(message.clone()));
                if self.settlement.notify_errors {
                    effects.notify(Notification::error(message));
                }
                // A stale error must not block the next attempt.
                self.reset();
                Err(err)
            }
        }
    }

    /// Report an input error without touching the backend or the state.
    pub(crate) fn reject<E: Effects + ?Sized>(&self, err: ApiError, effects: &E) -> ApiError {
        if self.settlement.notify_errors {
            effects.notify(Notification::error(err.to_string()));
        }
        err
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{Fired, Recorder};
    use super::*;

    #[test]
    fn test_success_with_reload_fires_notification_then_reload() {
        let op = Operation::new(Settlement::write_and_reload("User profile updated!"));
        let effects = Recorder::default();

        op.begin();
        assert!(op.is_pending());
        let value = op.settle(Ok(7), &effects).expect("settled ok");

        assert_eq!(value, 7);
        assert_eq!(op.state(), OperationState::Succeeded(7));
        assert_eq!(
            effects.take(),
            [
                Fired::Notify(Notification::success("User profile updated!")),
                Fired::Reload
            ]
        );
    }

    #[test]
    fn test_read_success_is_silent() {
        let op = Operation::new(Settlement::read());
        let effects = Recorder::default();

        op.begin();
        op.settle(Ok("user"), &effects).expect("settled ok");
        assert!(effects.take().is_empty());
        assert_eq!(op.state().data(), Some(&"user"));
    }

    #[test]
    fn test_failure_notifies_once_and_resets() {
        let op: Operation<u8> = Operation::new(Settlement::write("Restaurant created successfully!"));
        let effects = Recorder::default();
        let mut rx = op.subscribe();

        op.begin();
        let err = op
            .settle(Err(ApiError::request_failed("create restaurant")), &effects)
            .unwrap_err();

        assert!(matches!(err, ApiError::RequestFailed { .. }));
        assert_eq!(
            effects.take(),
            [Fired::Notify(Notification::error("Failed to create restaurant"))]
        );
        assert_eq!(op.state(), OperationState::Idle);
        assert!(rx.has_changed().unwrap_or(false));
        assert_eq!(*rx.borrow_and_update(), OperationState::Idle);
    }

    #[test]
    fn test_silent_failure() {
        let op: Operation<()> = Operation::new(Settlement::silent());
        let effects = Recorder::default();

        op.begin();
        let _ = op.settle(Err(ApiError::request_failed("create user")), &effects);
        assert!(effects.take().is_empty());
        assert_eq!(op.state(), OperationState::Idle);
    }
}
