//! Core domain logic for Superlists.
//! This crate is the single source of truth for list, item and sharing
//! invariants.

pub mod db;
pub mod logging;
pub mod mail;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use logging::{default_log_level, init_logging, logging_status};
pub use mail::{LogMailer, MailError, Mailer, OutgoingEmail};
pub use model::item::{Item, ItemId};
pub use model::list::{List, ListId};
pub use model::user::{CurrentUser, User, UserId};
pub use repo::{
    ListFilter, ListRepository, ListSummary, RepoError, RepoResult, SqliteListRepository,
    SqliteUserRepository, UserRepository,
};
pub use service::account_service::{AccountService, AccountServiceError};
pub use service::list_service::{
    ListRelation, ListService, ListServiceError, ListServiceResult, UserLists, VisibleList,
};
pub use service::Outcome;
pub use validation::{CheckError, FieldError, ValidationError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
