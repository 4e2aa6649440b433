//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and repository calls into use-case APIs.
//! - Recover validation failures into [`Outcome::Invalid`] so boundary
//!   layers can redisplay the form; everything else propagates as `Err`.

use crate::validation::FieldError;

pub mod account_service;
pub mod list_service;

/// Result of a form-style use case that passed the fatal-error layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Input accepted and persisted.
    Saved(T),
    /// Input rejected; nothing was written.
    Invalid(FieldError),
}

impl<T> Outcome<T> {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }

    pub fn saved(self) -> Option<T> {
        match self {
            Self::Saved(value) => Some(value),
            Self::Invalid(_) => None,
        }
    }

    pub fn field_error(&self) -> Option<&FieldError> {
        match self {
            Self::Saved(_) => None,
            Self::Invalid(err) => Some(err),
        }
    }
}
