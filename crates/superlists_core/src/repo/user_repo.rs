//! User lookups over the `users` table.
//!
//! The accounts collaborator owns user records; this repository gives the
//! core the narrow lookups it needs plus registration for that collaborator.

use crate::db::ensure_schema_ready;
use crate::model::user::{User, UserId};
use crate::repo::{is_unique_violation, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub trait UserRepository {
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Exact, case-sensitive match on the stored email.
    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
}

impl<T: UserRepository + ?Sized> UserRepository for &T {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        (**self).create_user(user)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        (**self).get_user(id)
    }

    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        (**self).find_user_by_email(email)
    }
}

pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        self.conn
            .execute(
                "INSERT INTO users (uuid, email) VALUES (?1, ?2);",
                params![user.id.to_string(), user.email.as_str()],
            )
            .map_err(|err| {
                if is_unique_violation(&err) {
                    RepoError::DuplicateUser
                } else {
                    err.into()
                }
            })?;
        Ok(user.id)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.conn
            .query_row(
                "SELECT uuid, email FROM users WHERE uuid = ?1;",
                [id.to_string()],
                read_user_columns,
            )
            .optional()?
            .map(parse_user)
            .transpose()
    }

    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.conn
            .query_row(
                "SELECT uuid, email FROM users WHERE email = ?1;",
                [email],
                read_user_columns,
            )
            .optional()?
            .map(parse_user)
            .transpose()
    }
}

fn read_user_columns(row: &Row<'_>) -> rusqlite::Result<(String, String)> {
    Ok((row.get("uuid")?, row.get("email")?))
}

fn parse_user((uuid_text, email): (String, String)) -> RepoResult<User> {
    Ok(User {
        id: parse_uuid(&uuid_text, "users.uuid")?,
        email,
    })
}
