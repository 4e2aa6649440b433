//! List aggregate: ordered items plus ownership and sharing.
//!
//! # Invariants
//! - `items` is kept in insertion order; that order is the display order.
//! - `items` is never empty for a list built by [`List::create`] or loaded
//!   from storage.
//! - `shared_with` has set semantics keyed by user ID.

use crate::model::item::Item;
use crate::model::user::{User, UserId};
use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ListId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    /// `None` for lists created anonymously.
    pub owner: Option<User>,
    pub items: Vec<Item>,
    pub shared_with: Vec<User>,
}

impl List {
    /// Builds a new list together with its first item.
    ///
    /// No uniqueness check applies here: a fresh list has nothing to collide
    /// with.
    ///
    /// # Errors
    /// - `ValidationError::EmptyItem` when `first_item_text` is empty.
    pub fn create(
        first_item_text: impl Into<String>,
        owner: Option<User>,
    ) -> Result<Self, ValidationError> {
        let id = Uuid::new_v4();
        let first_item = Item::new(id, first_item_text)?;
        Ok(Self {
            id,
            owner,
            items: vec![first_item],
            shared_with: Vec::new(),
        })
    }

    /// Text of the first item ever added.
    pub fn name(&self) -> Option<&str> {
        self.items.first().map(|item| item.text.as_str())
    }

    pub fn owner_email(&self) -> Option<&str> {
        self.owner.as_ref().map(|owner| owner.email.as_str())
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner.as_ref().is_some_and(|owner| owner.id == user_id)
    }

    /// Items paired with their 1-based display index.
    pub fn numbered_items(&self) -> impl Iterator<Item = (usize, &Item)> {
        self.items.iter().enumerate().map(|(idx, item)| (idx + 1, item))
    }

    pub fn is_shared_with(&self, user_id: UserId) -> bool {
        self.shared_with.iter().any(|user| user.id == user_id)
    }

    /// Adds `user` to the sharee set.
    ///
    /// Returns `false` when the user was already present.
    pub fn add_sharee(&mut self, user: User) -> bool {
        if self.is_shared_with(user.id) {
            return false;
        }
        self.shared_with.push(user);
        true
    }
}
