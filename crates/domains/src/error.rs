//! # Error
//!
//! Centralized error handling for the Threadit ecosystem.
//! Every failure a request can surface maps onto one of these variants; all
//! of them are recovered at the request boundary, none are fatal.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Requested entity does not exist (e.g., Community, Post, Comment, User).
    #[error("{0} not found: {1}")]
    NotFound(&'static str, String),

    /// Authenticated identity does not own the entity being mutated.
    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    /// Mutation attempted without a session.
    #[error("authentication required")]
    Unauthenticated,

    /// Submitted fields fail entity constraints. Carries field-level
    /// messages so the caller can annotate the original form; nothing was
    /// persisted.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// Resource already exists (e.g., duplicate community name).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (e.g., DB down, media store unwritable).
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// A specialized Result type for Threadit logic.
pub type Result<T> = std::result::Result<T, Error>;

/// One failed field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Accumulates per-field validation failures before any write happens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` when nothing was recorded, otherwise the accumulated
    /// failures as a single `Validation` error.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }

    /// Shorthand for a single-field failure.
    pub fn single(field: &'static str, message: impl Into<String>) -> Error {
        let mut errors = Self::new();
        errors.push(field, message);
        Error::Validation(errors)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for e in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_errors_are_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn accumulated_errors_become_validation() {
        let mut errors = FieldErrors::new();
        errors.push("title", "may not be empty");
        errors.push("content", "too long");
        match errors.into_result() {
            Err(Error::Validation(fields)) => {
                assert_eq!(fields.errors.len(), 2);
                assert_eq!(fields.errors[0].field, "title");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
