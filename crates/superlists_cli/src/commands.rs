//! Boundary adapter between parsed arguments and core use cases.
//!
//! # Responsibility
//! - Apply boundary input policy (trim raw text and emails).
//! - Resolve `--as` into a `CurrentUser` before calling the core.
//! - Render saved results, and hand field errors back for redisplay.

use crate::args::{Cli, Commands};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use superlists_core::db::{open_db, DbError};
use superlists_core::{
    AccountService, AccountServiceError, CurrentUser, FieldError, List, ListRelation,
    ListService, ListServiceError, LogMailer, Outcome, RepoError, SqliteListRepository,
    SqliteUserRepository, UserLists, UserRepository,
};

pub type CliResult<T> = Result<T, CliError>;

/// Fatal command failures.
#[derive(Debug)]
pub enum CliError {
    Db(DbError),
    Repo(RepoError),
    List(ListServiceError),
    Account(AccountServiceError),
    /// `--as` named an email nobody registered.
    UnknownCurrentUser(String),
    Io(std::io::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::List(err) => write!(f, "{err}"),
            Self::Account(err) => write!(f, "{err}"),
            Self::UnknownCurrentUser(email) => {
                write!(f, "cannot act as `{email}`: no such user")
            }
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::List(err) => Some(err),
            Self::Account(err) => Some(err),
            Self::UnknownCurrentUser(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ListServiceError> for CliError {
    fn from(value: ListServiceError) -> Self {
        Self::List(value)
    }
}

impl From<AccountServiceError> for CliError {
    fn from(value: AccountServiceError) -> Self {
        Self::Account(value)
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// How a command finished when no fatal error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandStatus {
    Done,
    Rejected(FieldError),
}

/// Runs the parsed command against the configured database.
pub fn execute(cli: &Cli, out: &mut dyn Write) -> CliResult<CommandStatus> {
    let conn = open_db(&cli.db)?;
    let users = SqliteUserRepository::try_new(&conn)?;
    let lists = SqliteListRepository::try_new(&conn)?;
    let current_user = resolve_current_user(&users, cli.as_user.as_deref())?;
    let list_service = ListService::new(&lists, &users);
    let account_service = AccountService::new(&users, LogMailer);

    match &cli.command {
        Commands::AddUser { email } => {
            let outcome = account_service.register_user(email.trim())?;
            finish(outcome, out, |user, out| {
                writeln!(out, "user {} <{}>", user.id, user.email)
            })
        }
        Commands::NewList { text } => {
            let outcome = list_service.create_new_list(text.trim(), &current_user)?;
            finish(outcome, out, |list, out| render_list(&list, out))
        }
        Commands::AddItem { list_id, text } => {
            let outcome = list_service.add_item_to_list(*list_id, text.trim())?;
            match outcome {
                Outcome::Saved(_) => {
                    render_list(&list_service.view_list(*list_id)?, out)?;
                    Ok(CommandStatus::Done)
                }
                Outcome::Invalid(err) => Ok(CommandStatus::Rejected(err)),
            }
        }
        Commands::Share { list_id, email } => {
            let outcome = list_service.share_list(*list_id, email.trim())?;
            finish(outcome, out, |user, out| {
                writeln!(out, "shared list {list_id} with {}", user.email)
            })
        }
        Commands::MyLists { email } => {
            let user_lists = list_service.lists_for_user(email.trim())?;
            render_user_lists(&user_lists, out)?;
            Ok(CommandStatus::Done)
        }
        Commands::Show { list_id } => {
            render_list(&list_service.view_list(*list_id)?, out)?;
            Ok(CommandStatus::Done)
        }
        Commands::SendLogin { email } => {
            account_service.send_login_email(email.trim());
            writeln!(out, "login email sent to {}", email.trim())?;
            Ok(CommandStatus::Done)
        }
    }
}

fn resolve_current_user<U: UserRepository>(
    users: &U,
    as_user: Option<&str>,
) -> CliResult<CurrentUser> {
    let Some(email) = as_user.map(str::trim) else {
        return Ok(CurrentUser::Anonymous);
    };
    users
        .find_user_by_email(email)?
        .map(CurrentUser::Authenticated)
        .ok_or_else(|| CliError::UnknownCurrentUser(email.to_string()))
}

fn finish<T>(
    outcome: Outcome<T>,
    out: &mut dyn Write,
    render: impl FnOnce(T, &mut dyn Write) -> std::io::Result<()>,
) -> CliResult<CommandStatus> {
    match outcome {
        Outcome::Saved(value) => {
            render(value, out)?;
            Ok(CommandStatus::Done)
        }
        Outcome::Invalid(err) => Ok(CommandStatus::Rejected(err)),
    }
}

fn render_list(list: &List, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "list {}", list.id)?;
    if let Some(owner_email) = list.owner_email() {
        writeln!(out, "List owner: {owner_email}")?;
    }
    for (index, item) in list.numbered_items() {
        writeln!(out, "{index}: {}", item.text)?;
    }
    if !list.shared_with.is_empty() {
        writeln!(out, "Shared with:")?;
        for sharee in &list.shared_with {
            writeln!(out, "- {}", sharee.email)?;
        }
    }
    Ok(())
}

fn render_user_lists(user_lists: &UserLists, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "lists for {}", user_lists.user.email)?;
    for visible in &user_lists.lists {
        let summary = &visible.summary;
        match visible.relation {
            ListRelation::Owned => writeln!(out, "{} {} [owned]", summary.id, summary.name)?,
            ListRelation::Shared => writeln!(
                out,
                "{} {} [shared by {}]",
                summary.id,
                summary.name,
                summary.owner_email.as_deref().unwrap_or("anonymous")
            )?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{execute, CliError, CommandStatus};
    use crate::args::Cli;
    use clap::Parser;
    use superlists_core::validation::{DUPLICATE_ITEM_ERROR, SAME_EMAIL_ERROR};

    fn run(db: &std::path::Path, args: &[&str]) -> (Result<CommandStatus, CliError>, String) {
        let mut argv = vec!["superlists", "--db", db.to_str().unwrap()];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        let mut out = Vec::new();
        let status = execute(&cli, &mut out);
        (status, String::from_utf8(out).unwrap())
    }

    fn list_id_from(output: &str) -> String {
        output
            .lines()
            .next()
            .and_then(|line| line.strip_prefix("list "))
            .unwrap()
            .to_string()
    }

    #[test]
    fn trims_input_and_reports_duplicates_as_field_errors() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("lists.db");

        let (status, output) = run(&db, &["new-list", "  Buy milk  "]);
        assert_eq!(status.unwrap(), CommandStatus::Done);
        assert!(output.contains("1: Buy milk\n"));
        let list_id = list_id_from(&output);

        let (status, output) = run(&db, &["add-item", list_id.as_str(), "Buy eggs"]);
        assert_eq!(status.unwrap(), CommandStatus::Done);
        assert!(output.contains("1: Buy milk\n2: Buy eggs\n"));

        let (status, _) = run(&db, &["add-item", list_id.as_str(), "Buy milk "]);
        match status.unwrap() {
            CommandStatus::Rejected(err) => {
                assert_eq!(err.field, "text");
                assert_eq!(err.message, DUPLICATE_ITEM_ERROR);
                assert_eq!(err.input, "Buy milk");
            }
            other => panic!("unexpected status: {other:?}"),
        }
    }

    #[test]
    fn owned_list_can_be_shared_and_shows_up_for_sharee() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("lists.db");
        run(&db, &["add-user", "a@b.com"]).0.unwrap();
        run(&db, &["add-user", "c@d.com"]).0.unwrap();

        let (status, output) = run(&db, &["--as", "a@b.com", "new-list", "Plan trip"]);
        assert_eq!(status.unwrap(), CommandStatus::Done);
        assert!(output.contains("List owner: a@b.com"));
        let list_id = list_id_from(&output);

        let (status, _) = run(&db, &["share", list_id.as_str(), "a@b.com"]);
        match status.unwrap() {
            CommandStatus::Rejected(err) => assert_eq!(err.message, SAME_EMAIL_ERROR),
            other => panic!("unexpected status: {other:?}"),
        }

        let (status, _) = run(&db, &["share", list_id.as_str(), "c@d.com"]);
        assert_eq!(status.unwrap(), CommandStatus::Done);

        let (status, output) = run(&db, &["my-lists", "c@d.com"]);
        assert_eq!(status.unwrap(), CommandStatus::Done);
        assert!(output.contains(&format!("{list_id} Plan trip [shared by a@b.com]")));
    }

    #[test]
    fn unknown_current_user_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("lists.db");

        let (status, _) = run(&db, &["--as", "ghost@example.com", "new-list", "x"]);
        assert!(matches!(status, Err(CliError::UnknownCurrentUser(_))));
    }
}
