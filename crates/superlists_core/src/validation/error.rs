//! Validation error taxonomy and user-facing messages.

use crate::repo::RepoError;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const EMPTY_ITEM_ERROR: &str = "You can't have an empty list item";
pub const DUPLICATE_ITEM_ERROR: &str = "You've already got this in your list";
pub const REQUIRED_FIELD_ERROR: &str = "This field is required.";
pub const INVALID_EMAIL_ERROR: &str = "Enter a valid email address.";
pub const NONEXISTENT_USER_EMAIL_ERROR: &str = "The email provided is not a valid user's email";
pub const SAME_EMAIL_ERROR: &str = "You can't share a list with yourself";

/// Form field carrying item text.
pub const ITEM_TEXT_FIELD: &str = "text";
/// Form field carrying the share recipient email.
pub const SHARE_WITH_FIELD: &str = "share_with";
/// Form field carrying an account email.
pub const EMAIL_FIELD: &str = "email";

/// User input rejected by a validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    EmptyItem,
    DuplicateItem,
    RequiredEmail,
    InvalidEmail,
    NonexistentUser,
    SelfShare,
}

impl ValidationError {
    /// Field the error is reported against by default.
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyItem | Self::DuplicateItem => ITEM_TEXT_FIELD,
            Self::RequiredEmail
            | Self::InvalidEmail
            | Self::NonexistentUser
            | Self::SelfShare => SHARE_WITH_FIELD,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::EmptyItem => EMPTY_ITEM_ERROR,
            Self::DuplicateItem => DUPLICATE_ITEM_ERROR,
            Self::RequiredEmail => REQUIRED_FIELD_ERROR,
            Self::InvalidEmail => INVALID_EMAIL_ERROR,
            Self::NonexistentUser => NONEXISTENT_USER_EMAIL_ERROR,
            Self::SelfShare => SAME_EMAIL_ERROR,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Error for ValidationError {}

/// Structured rejection handed back to the boundary for redisplay.
///
/// `input` is the raw value the user submitted, so the form can be shown
/// again with what was typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
    pub kind: ValidationError,
    pub input: String,
}

impl FieldError {
    pub fn new(kind: ValidationError, input: impl Into<String>) -> Self {
        Self {
            field: kind.field(),
            message: kind.message(),
            kind,
            input: input.into(),
        }
    }

    /// Reports the same error against a different form field.
    pub fn on_field(mut self, field: &'static str) -> Self {
        self.field = field;
        self
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Failure of a check that needs storage access or a target list.
#[derive(Debug)]
pub enum CheckError {
    /// Input was rejected; recoverable by the caller.
    Invalid(ValidationError),
    /// The check was invoked without the context it requires.
    InvalidState(&'static str),
    /// Lookup failed in storage.
    Repo(RepoError),
}

impl Display for CheckError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::InvalidState(details) => write!(f, "invalid validation state: {details}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CheckError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::InvalidState(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ValidationError> for CheckError {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}

impl From<RepoError> for CheckError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}
