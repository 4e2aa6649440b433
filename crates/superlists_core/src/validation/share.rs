//! Share-recipient rules.
//!
//! Checks run in a fixed order, each refining the previous one:
//! required, email syntax, existing user, not the list owner.

use crate::model::list::List;
use crate::model::user::User;
use crate::repo::UserRepository;
use crate::validation::error::{CheckError, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::IpAddr;

const MAX_EMAIL_CHARS: usize = 320;

static EMAIL_USER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?:[-!#$%&'*+/=?^_`{}|~0-9A-Za-z]+(?:\.[-!#$%&'*+/=?^_`{}|~0-9A-Za-z]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f!#-\[\]-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")$"#,
    )
    .expect("valid email user regex")
});
static EMAIL_DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+(?:[A-Za-z]{2,63}|xn--[A-Za-z0-9]{1,59})$",
    )
    .expect("valid email domain regex")
});
static EMAIL_LITERAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(?:IPv6:)?([A-Fa-f0-9:.]+)\]$").expect("valid email literal regex")
});

/// Checks that `email` is present and syntactically an email address.
///
/// The domain may be a hostname, `localhost`, a bracketed IP literal, or an
/// internationalized name that encodes to a valid hostname.
pub fn validate_email_syntax(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::RequiredEmail);
    }
    if email.chars().count() > MAX_EMAIL_CHARS {
        return Err(ValidationError::InvalidEmail);
    }

    let Some((user_part, domain_part)) = email.rsplit_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };
    if !EMAIL_USER_RE.is_match(user_part) {
        return Err(ValidationError::InvalidEmail);
    }
    if domain_part == "localhost" || is_valid_domain_part(domain_part) {
        return Ok(());
    }
    match idna::domain_to_ascii(domain_part) {
        Ok(ascii) if is_valid_domain_part(&ascii) => Ok(()),
        _ => Err(ValidationError::InvalidEmail),
    }
}

fn is_valid_domain_part(domain_part: &str) -> bool {
    if EMAIL_DOMAIN_RE.is_match(domain_part) {
        return true;
    }
    EMAIL_LITERAL_RE
        .captures(domain_part)
        .and_then(|caps| caps.get(1))
        .is_some_and(|literal| literal.as_str().parse::<IpAddr>().is_ok())
}

/// Resolves the user a list may be shared with.
///
/// # Errors
/// - `CheckError::InvalidState` when `for_list` is `None`; this is checked
///   before any input rule.
/// - `CheckError::Invalid` with `RequiredEmail`, `InvalidEmail`,
///   `NonexistentUser` or `SelfShare`, in that order.
/// - `CheckError::Repo` when the user lookup fails.
pub fn clean_share_recipient<U>(
    for_list: Option<&List>,
    candidate_email: &str,
    users: &U,
) -> Result<User, CheckError>
where
    U: UserRepository + ?Sized,
{
    let Some(list) = for_list else {
        return Err(CheckError::InvalidState(
            "share recipient validated without a target list",
        ));
    };

    validate_email_syntax(candidate_email)?;

    let user = users
        .find_user_by_email(candidate_email)?
        .ok_or(CheckError::Invalid(ValidationError::NonexistentUser))?;

    if list.owner_email() == Some(candidate_email) {
        return Err(CheckError::Invalid(ValidationError::SelfShare));
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::validate_email_syntax;
    use crate::validation::ValidationError;

    #[test]
    fn accepts_common_addresses() {
        for email in [
            "a@b.com",
            "edith@example.com",
            "first.last+tag@sub.example.co.uk",
            "dev@localhost",
            "user@[127.0.0.1]",
            "user@[IPv6:2001:db8::1]",
            "user@[::1]",
            "user@bücher.de",
            "\"john@doe\"@example.com",
        ] {
            assert_eq!(validate_email_syntax(email), Ok(()), "{email}");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in [
            "bademail",
            "not-an-email",
            "a@",
            "@b.com",
            "a@b",
            "a b@c.com",
            "a..b@c.com",
            "a@-b.com",
            "user@[999.0.0.1]",
            "user@[127.0.0.1",
            "user@bü cher.de",
            "\"unterminated@example.com",
        ] {
            assert_eq!(
                validate_email_syntax(email),
                Err(ValidationError::InvalidEmail),
                "{email}"
            );
        }
    }

    #[test]
    fn blank_is_reported_as_required() {
        assert_eq!(
            validate_email_syntax(""),
            Err(ValidationError::RequiredEmail)
        );
    }
}
