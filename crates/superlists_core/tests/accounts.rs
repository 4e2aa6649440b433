use std::cell::RefCell;
use superlists_core::db::open_db_in_memory;
use superlists_core::mail::DEFAULT_FROM_EMAIL;
use superlists_core::service::account_service::LOGIN_EMAIL_SUBJECT;
use superlists_core::validation::{EMAIL_FIELD, INVALID_EMAIL_ERROR};
use superlists_core::{
    AccountService, LogMailer, MailError, Mailer, OutgoingEmail, SqliteUserRepository,
    UserRepository, ValidationError,
};

#[derive(Default)]
struct RecordingMailer {
    sent: RefCell<Vec<OutgoingEmail>>,
    fail: bool,
}

impl Mailer for RecordingMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        self.sent.borrow_mut().push(email.clone());
        if self.fail {
            return Err(MailError("smtp unavailable".to_string()));
        }
        Ok(())
    }
}

#[test]
fn register_user_is_idempotent_per_email() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let service = AccountService::new(&users, LogMailer);

    let first = service.register_user("a@b.com").unwrap().saved().unwrap();
    let second = service.register_user("a@b.com").unwrap().saved().unwrap();
    assert_eq!(first, second);

    let stored = users.find_user_by_email("a@b.com").unwrap().unwrap();
    assert_eq!(stored, first);
    assert_eq!(users.get_user(first.id).unwrap(), Some(first));
}

#[test]
fn register_user_rejects_malformed_email_on_email_field() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let service = AccountService::new(&users, LogMailer);

    let outcome = service.register_user("bademail").unwrap();
    let err = outcome.field_error().unwrap();
    assert_eq!(err.kind, ValidationError::InvalidEmail);
    assert_eq!(err.field, EMAIL_FIELD);
    assert_eq!(err.message, INVALID_EMAIL_ERROR);
    assert_eq!(users.find_user_by_email("bademail").unwrap(), None);
}

#[test]
fn user_lookup_is_exact_match() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let service = AccountService::new(&users, LogMailer);
    service.register_user("Edith@example.com").unwrap();

    assert_eq!(users.find_user_by_email("edith@example.com").unwrap(), None);
}

#[test]
fn send_login_email_composes_message_for_recipient() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let mailer = RecordingMailer::default();
    let service = AccountService::new(&users, &mailer);

    service.send_login_email("edith@example.com");

    let sent = mailer.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["edith@example.com".to_string()]);
    assert_eq!(sent[0].from, DEFAULT_FROM_EMAIL);
    assert_eq!(sent[0].subject, LOGIN_EMAIL_SUBJECT);
}

#[test]
fn send_login_email_swallows_delivery_failures() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let mailer = RecordingMailer {
        fail: true,
        ..RecordingMailer::default()
    };
    let service = AccountService::new(&users, &mailer);

    service.send_login_email("edith@example.com");
    assert_eq!(mailer.sent.borrow().len(), 1);
}
