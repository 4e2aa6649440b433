//! Account use-case service.
//!
//! Stands in for the accounts collaborator: registers users the list core
//! can resolve by email and sends login emails through a [`Mailer`].

use crate::mail::{recipient_domain, Mailer, OutgoingEmail, DEFAULT_FROM_EMAIL};
use crate::model::user::User;
use crate::repo::{RepoError, UserRepository};
use crate::service::Outcome;
use crate::validation::share::validate_email_syntax;
use crate::validation::{FieldError, EMAIL_FIELD};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const LOGIN_EMAIL_SUBJECT: &str = "Your login link for Superlists";
pub const LOGIN_EMAIL_BODY: &str = "body text tbc";

#[derive(Debug)]
pub enum AccountServiceError {
    Repo(RepoError),
    InvalidState(&'static str),
}

impl Display for AccountServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::InvalidState(details) => write!(f, "invalid account state: {details}"),
        }
    }
}

impl Error for AccountServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::InvalidState(_) => None,
        }
    }
}

impl From<RepoError> for AccountServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub struct AccountService<U: UserRepository, M: Mailer> {
    users: U,
    mailer: M,
}

impl<U: UserRepository, M: Mailer> AccountService<U, M> {
    pub fn new(users: U, mailer: M) -> Self {
        Self { users, mailer }
    }

    /// Registers `email`, or returns the user already registered under it.
    pub fn register_user(&self, email: &str) -> Result<Outcome<User>, AccountServiceError> {
        if let Err(kind) = validate_email_syntax(email) {
            return Ok(Outcome::Invalid(
                FieldError::new(kind, email).on_field(EMAIL_FIELD),
            ));
        }

        if let Some(existing) = self.users.find_user_by_email(email)? {
            return Ok(Outcome::Saved(existing));
        }

        let user = User::new(email);
        match self.users.create_user(&user) {
            Ok(_) => {
                info!(
                    "event=user_register module=service status=ok user_id={}",
                    user.id
                );
                Ok(Outcome::Saved(user))
            }
            // Lost a race with a concurrent registration of the same email.
            Err(RepoError::DuplicateUser) => self
                .users
                .find_user_by_email(email)?
                .map(Outcome::Saved)
                .ok_or(AccountServiceError::InvalidState(
                    "duplicate user email reported but no row found",
                )),
            Err(err) => Err(err.into()),
        }
    }

    /// Hands a login email for `email` to the mailer.
    ///
    /// Delivery failures are logged and not returned.
    pub fn send_login_email(&self, email: &str) {
        let message = OutgoingEmail {
            from: DEFAULT_FROM_EMAIL.to_string(),
            to: vec![email.to_string()],
            subject: LOGIN_EMAIL_SUBJECT.to_string(),
            body: LOGIN_EMAIL_BODY.to_string(),
        };

        match self.mailer.send(&message) {
            Ok(()) => info!(
                "event=login_email module=service status=ok recipient_domain={}",
                recipient_domain(email)
            ),
            Err(err) => warn!(
                "event=login_email module=service status=error recipient_domain={} error={err}",
                recipient_domain(email)
            ),
        }
    }
}
