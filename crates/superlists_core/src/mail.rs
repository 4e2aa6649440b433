//! Outbound email collaborator.
//!
//! The core only composes messages and hands them to a [`Mailer`]; transport
//! lives outside the crate.

use log::info;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Sender address used for every message the core composes.
pub const DEFAULT_FROM_EMAIL: &str = "noreply@superlists";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailError(pub String);

impl Display for MailError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "mail delivery failed: {}", self.0)
    }
}

impl Error for MailError {}

pub trait Mailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

impl<T: Mailer + ?Sized> Mailer for &T {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        (**self).send(email)
    }
}

/// Mailer that records a metadata-only log event instead of delivering.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let domains = email
            .to
            .iter()
            .map(|address| recipient_domain(address))
            .collect::<Vec<_>>()
            .join(",");
        info!(
            "event=mail_send module=mail status=ok transport=log recipients={} recipient_domains={domains} body_chars={}",
            email.to.len(),
            email.body.chars().count()
        );
        Ok(())
    }
}

/// Domain part of an address, or `unknown` when there is none.
pub fn recipient_domain(address: &str) -> &str {
    match address.rsplit_once('@') {
        Some((_, domain)) if !domain.is_empty() => domain,
        _ => "unknown",
    }
}
