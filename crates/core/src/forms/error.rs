//! Validation errors.

use thiserror::Error;

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field path, e.g. `menuItems[2].price`.
    pub field: String,
    /// Message shown next to the field.
    pub message: String,
}

/// One or more form fields failed validation.
///
/// Raised by the caller before any request is attempted; never produced by
/// the network layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", format_field_errors(.0))]
pub struct ValidationError(Vec<FieldError>);

impl ValidationError {
    /// The individual field errors, in form order.
    #[must_use]
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// Whether `field` was rejected.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Accumulates field errors while a form is checked.
#[derive(Debug, Default)]
pub(crate) struct Collector(Vec<FieldError>);

impl Collector {
    pub(crate) fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Record an error unless `value` has visible content; returns the trimmed value.
    pub(crate) fn require(&mut self, field: &str, value: &str, message: &str) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.push(field, message);
        }
        trimmed.to_owned()
    }

    pub(crate) fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError(self.0))
        }
    }

    /// Fail with the collected errors; callers only use this after a push.
    pub(crate) fn finish_err<T>(self) -> Result<T, ValidationError> {
        Err(ValidationError(self.0))
    }
}
