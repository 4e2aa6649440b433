//! To-do item record.

use crate::model::list::ListId;
use crate::validation::item::validate_item_text;
use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one item.
pub type ItemId = Uuid;

/// A single to-do entry belonging to exactly one list.
///
/// `text` is unique within its list; the pair is enforced by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub list_id: ListId,
    pub text: String,
}

impl Item {
    /// Creates an item for `list_id` with a generated ID.
    ///
    /// # Errors
    /// - `ValidationError::EmptyItem` when `text` is empty.
    pub fn new(list_id: ListId, text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        validate_item_text(&text)?;
        Ok(Self {
            id: Uuid::new_v4(),
            list_id,
            text,
        })
    }
}
