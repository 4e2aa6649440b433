//! User references and the resolved current-user capability.
//!
//! User records belong to the accounts collaborator. The core only needs the
//! stable ID and the email used for lookups and self-share checks.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type UserId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
        }
    }
}

/// Who is making the current call, as resolved by the session layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CurrentUser {
    #[default]
    Anonymous,
    Authenticated(User),
}

impl CurrentUser {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Anonymous => None,
        }
    }

    /// Owner to record on a list created by this caller.
    ///
    /// Anonymous callers create unowned lists.
    pub fn owner_for_new_list(&self) -> Option<User> {
        self.user().cloned()
    }
}
