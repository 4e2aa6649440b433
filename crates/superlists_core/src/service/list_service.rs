//! List use-case service.
//!
//! # Responsibility
//! - Create lists (owned when the caller is authenticated).
//! - Append items, share lists, and answer "which lists can this user see".
//!
//! # Invariants
//! - Each use case validates fully before its single write.
//! - A duplicate item is reported the same way whether the pre-check or the
//!   storage constraint caught it.
//! - Log events carry IDs and outcomes only, never item text or emails.

use crate::model::item::Item;
use crate::model::list::{List, ListId};
use crate::model::user::{CurrentUser, User, UserId};
use crate::repo::{ListFilter, ListRepository, ListSummary, RepoError, UserRepository};
use crate::service::Outcome;
use crate::validation::item::validate_item_for_list;
use crate::validation::share::clean_share_recipient;
use crate::validation::{CheckError, FieldError, ValidationError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ListServiceResult<T> = Result<T, ListServiceError>;

/// Fatal failures of list use cases.
#[derive(Debug)]
pub enum ListServiceError {
    ListNotFound(ListId),
    /// No user is registered under the requested email.
    UserNotFound(String),
    /// API misuse or a read-back that contradicts a completed write.
    InvalidState(&'static str),
    Repo(RepoError),
}

impl Display for ListServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ListNotFound(id) => write!(f, "list not found: {id}"),
            Self::UserNotFound(email) => write!(f, "user not found: {email}"),
            Self::InvalidState(details) => write!(f, "invalid state: {details}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ListServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ListServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: "list",
                id,
            } => Self::ListNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// How a visible list relates to the user who asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListRelation {
    Owned,
    Shared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleList {
    pub summary: ListSummary,
    pub relation: ListRelation,
}

/// Lists a user owns or was given access to, in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLists {
    pub user: User,
    pub lists: Vec<VisibleList>,
}

impl UserLists {
    pub fn owned(&self) -> impl Iterator<Item = &ListSummary> {
        self.with_relation(ListRelation::Owned)
    }

    pub fn shared(&self) -> impl Iterator<Item = &ListSummary> {
        self.with_relation(ListRelation::Shared)
    }

    pub fn contains(&self, list_id: ListId) -> bool {
        self.lists.iter().any(|visible| visible.summary.id == list_id)
    }

    fn with_relation(&self, relation: ListRelation) -> impl Iterator<Item = &ListSummary> {
        self.lists
            .iter()
            .filter(move |visible| visible.relation == relation)
            .map(|visible| &visible.summary)
    }
}

/// List service facade over list and user repositories.
pub struct ListService<L: ListRepository, U: UserRepository> {
    lists: L,
    users: U,
}

impl<L: ListRepository, U: UserRepository> ListService<L, U> {
    pub fn new(lists: L, users: U) -> Self {
        Self { lists, users }
    }

    /// Creates a list whose first item is `text`.
    ///
    /// The list is owned by `current_user` when authenticated and unowned
    /// otherwise. Only the empty-text rule applies.
    pub fn create_new_list(
        &self,
        text: &str,
        current_user: &CurrentUser,
    ) -> ListServiceResult<Outcome<List>> {
        let list = match List::create(text, current_user.owner_for_new_list()) {
            Ok(list) => list,
            Err(kind) => return Ok(reject("list_create", kind, text)),
        };

        self.lists.create_list(&list)?;
        info!(
            "event=list_create module=service status=ok list_id={} owned={}",
            list.id,
            list.owner.is_some()
        );

        self.lists
            .get_list(list.id)?
            .map(Outcome::Saved)
            .ok_or(ListServiceError::InvalidState(
                "created list not found in read-back",
            ))
    }

    /// Appends `text` to an existing list.
    ///
    /// # Errors
    /// - `ListNotFound` when `list_id` is unknown.
    pub fn add_item_to_list(&self, list_id: ListId, text: &str) -> ListServiceResult<Outcome<Item>> {
        if !self.lists.list_exists(list_id)? {
            return Err(ListServiceError::ListNotFound(list_id));
        }

        match validate_item_for_list(&self.lists, list_id, text) {
            Ok(()) => {}
            Err(CheckError::Invalid(kind)) => return Ok(reject("item_add", kind, text)),
            Err(CheckError::InvalidState(details)) => {
                return Err(ListServiceError::InvalidState(details))
            }
            Err(CheckError::Repo(err)) => return Err(err.into()),
        }

        let item = match Item::new(list_id, text) {
            Ok(item) => item,
            Err(kind) => return Ok(reject("item_add", kind, text)),
        };
        match self.lists.add_item(&item) {
            Ok(_) => {}
            Err(RepoError::DuplicateItem(_)) => {
                return Ok(reject("item_add", ValidationError::DuplicateItem, text))
            }
            Err(err) => return Err(err.into()),
        }

        info!(
            "event=item_add module=service status=ok list_id={list_id} item_id={}",
            item.id
        );
        Ok(Outcome::Saved(item))
    }

    /// Shares `list_id` with the user registered under `candidate_email`.
    ///
    /// Sharing with an existing sharee succeeds without adding a duplicate.
    pub fn share_list(
        &self,
        list_id: ListId,
        candidate_email: &str,
    ) -> ListServiceResult<Outcome<User>> {
        let list = self.require_list(list_id)?;

        let sharee = match clean_share_recipient(Some(&list), candidate_email, &self.users) {
            Ok(user) => user,
            Err(CheckError::Invalid(kind)) => {
                return Ok(reject("list_share", kind, candidate_email))
            }
            Err(CheckError::InvalidState(details)) => {
                return Err(ListServiceError::InvalidState(details))
            }
            Err(CheckError::Repo(err)) => return Err(err.into()),
        };

        let added = self.lists.add_sharee(list.id, sharee.id)?;
        info!(
            "event=list_share module=service status=ok list_id={} user_id={} newly_added={added}",
            list.id, sharee.id
        );
        Ok(Outcome::Saved(sharee))
    }

    /// Lists owned by or shared with the user registered under `email`.
    pub fn lists_for_user(&self, email: &str) -> ListServiceResult<UserLists> {
        let user = self
            .users
            .find_user_by_email(email)?
            .ok_or_else(|| ListServiceError::UserNotFound(email.to_string()))?;

        let lists = self
            .lists
            .query_lists(ListFilter::VisibleTo(user.id))?
            .into_iter()
            .map(|summary| VisibleList {
                relation: relation_for(&summary, user.id),
                summary,
            })
            .collect();

        Ok(UserLists { user, lists })
    }

    /// Loads one list with items in display order, owner and sharees.
    pub fn view_list(&self, list_id: ListId) -> ListServiceResult<List> {
        self.require_list(list_id)
    }

    fn require_list(&self, list_id: ListId) -> ListServiceResult<List> {
        self.lists
            .get_list(list_id)?
            .ok_or(ListServiceError::ListNotFound(list_id))
    }
}

fn relation_for(summary: &ListSummary, user_id: UserId) -> ListRelation {
    if summary.owner_id == Some(user_id) {
        ListRelation::Owned
    } else {
        ListRelation::Shared
    }
}

fn reject<T>(event: &str, kind: ValidationError, input: &str) -> Outcome<T> {
    warn!("event={event} module=service status=rejected reason={kind:?}");
    Outcome::Invalid(FieldError::new(kind, input))
}
