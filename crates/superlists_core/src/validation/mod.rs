//! Field validation rules for list, item and share input.
//!
//! # Responsibility
//! - Turn raw user input into either a clean value or an enumerated
//!   `ValidationError` carrying the user-facing message.
//! - Compose checks in a fixed order so callers see the most basic failure
//!   first.
//!
//! # Invariants
//! - Validation never writes to storage.
//! - Misuse of the API (for example a share check with no target list) is
//!   reported as `CheckError::InvalidState`, never as a field error.

pub mod error;
pub mod item;
pub mod share;

pub use error::{
    CheckError, FieldError, ValidationError, DUPLICATE_ITEM_ERROR, EMAIL_FIELD,
    EMPTY_ITEM_ERROR, INVALID_EMAIL_ERROR, ITEM_TEXT_FIELD, NONEXISTENT_USER_EMAIL_ERROR,
    REQUIRED_FIELD_ERROR, SAME_EMAIL_ERROR, SHARE_WITH_FIELD,
};
