//! Item text rules.
//!
//! Whitespace trimming is a boundary concern; the core only rejects empty
//! text.

use crate::model::list::ListId;
use crate::repo::ListRepository;
use crate::validation::error::{CheckError, ValidationError};

/// Rejects empty item text.
pub fn validate_item_text(text: &str) -> Result<(), ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::EmptyItem);
    }
    Ok(())
}

/// Validates text for an item appended to an existing list.
///
/// Runs the empty check, then the per-list uniqueness pre-check. The
/// pre-check is advisory: the repository insert re-checks inside its write
/// transaction and storage holds the `UNIQUE(list, text)` constraint.
pub fn validate_item_for_list<R>(repo: &R, list_id: ListId, text: &str) -> Result<(), CheckError>
where
    R: ListRepository + ?Sized,
{
    validate_item_text(text)?;
    if repo.item_exists(list_id, text)? {
        return Err(CheckError::Invalid(ValidationError::DuplicateItem));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_item_text;
    use crate::validation::ValidationError;

    #[test]
    fn empty_text_is_rejected() {
        assert_eq!(validate_item_text(""), Err(ValidationError::EmptyItem));
    }

    #[test]
    fn whitespace_only_text_is_left_to_the_boundary() {
        assert_eq!(validate_item_text("  "), Ok(()));
    }
}
