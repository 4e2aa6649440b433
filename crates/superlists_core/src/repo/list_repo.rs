//! List repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist lists together with their items and sharees.
//! - Answer visibility queries (owned, shared, either) for a user.
//!
//! # Invariants
//! - A list and its first item are written in the same transaction.
//! - Item insert re-checks `(list, text)` inside an immediate transaction and
//!   maps a `UNIQUE` violation to `RepoError::DuplicateItem`.
//! - Items are read back ordered by insertion (`items.id`).

use crate::db::ensure_schema_ready;
use crate::model::item::{Item, ItemId};
use crate::model::list::{List, ListId};
use crate::model::user::{User, UserId};
use crate::repo::{is_unique_violation, parse_uuid, RepoError, RepoResult};
use crate::validation::item::validate_item_text;
use crate::validation::ValidationError;
use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Transaction, TransactionBehavior,
};

const LIST_SUMMARY_SELECT_SQL: &str = "SELECT
    l.uuid,
    l.owner_uuid,
    u.email AS owner_email,
    (
        SELECT i.text
        FROM items i
        WHERE i.list_uuid = l.uuid
        ORDER BY i.id ASC
        LIMIT 1
    ) AS name
FROM lists l
LEFT JOIN users u ON u.uuid = l.owner_uuid";

/// Which lists a query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    All,
    OwnedBy(UserId),
    SharedWith(UserId),
    /// Owned by or shared with the user.
    VisibleTo(UserId),
}

/// Read model for list overviews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSummary {
    pub id: ListId,
    /// Text of the first item.
    pub name: String,
    pub owner_id: Option<UserId>,
    pub owner_email: Option<String>,
}

pub trait ListRepository {
    /// Inserts the list, its items and sharees atomically.
    fn create_list(&self, list: &List) -> RepoResult<ListId>;
    /// Loads the full aggregate with items in display order and sharees
    /// sorted by email.
    fn get_list(&self, id: ListId) -> RepoResult<Option<List>>;
    fn list_exists(&self, id: ListId) -> RepoResult<bool>;
    fn item_exists(&self, list_id: ListId, text: &str) -> RepoResult<bool>;
    /// Appends one item after all existing items of its list.
    fn add_item(&self, item: &Item) -> RepoResult<ItemId>;
    /// Returns `false` when the user already was a sharee.
    fn add_sharee(&self, list_id: ListId, user_id: UserId) -> RepoResult<bool>;
    /// Lists matching `filter`, in creation order.
    fn query_lists(&self, filter: ListFilter) -> RepoResult<Vec<ListSummary>>;
}

impl<T: ListRepository + ?Sized> ListRepository for &T {
    fn create_list(&self, list: &List) -> RepoResult<ListId> {
        (**self).create_list(list)
    }

    fn get_list(&self, id: ListId) -> RepoResult<Option<List>> {
        (**self).get_list(id)
    }

    fn list_exists(&self, id: ListId) -> RepoResult<bool> {
        (**self).list_exists(id)
    }

    fn item_exists(&self, list_id: ListId, text: &str) -> RepoResult<bool> {
        (**self).item_exists(list_id, text)
    }

    fn add_item(&self, item: &Item) -> RepoResult<ItemId> {
        (**self).add_item(item)
    }

    fn add_sharee(&self, list_id: ListId, user_id: UserId) -> RepoResult<bool> {
        (**self).add_sharee(list_id, user_id)
    }

    fn query_lists(&self, filter: ListFilter) -> RepoResult<Vec<ListSummary>> {
        (**self).query_lists(filter)
    }
}

/// SQLite-backed list repository.
pub struct SqliteListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteListRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }

    fn begin_write(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl ListRepository for SqliteListRepository<'_> {
    fn create_list(&self, list: &List) -> RepoResult<ListId> {
        if list.items.is_empty() {
            return Err(RepoError::Validation(ValidationError::EmptyItem));
        }
        for item in &list.items {
            validate_item_text(&item.text)?;
            if item.list_id != list.id {
                return Err(RepoError::InvalidData(format!(
                    "item {} belongs to list {}, not {}",
                    item.id, item.list_id, list.id
                )));
            }
        }

        let list_uuid = list.id.to_string();
        let tx = self.begin_write()?;
        tx.execute(
            "INSERT INTO lists (uuid, owner_uuid) VALUES (?1, ?2);",
            params![
                list_uuid.as_str(),
                list.owner.as_ref().map(|owner| owner.id.to_string())
            ],
        )?;
        for item in &list.items {
            insert_item(&tx, item)?;
        }
        for sharee in &list.shared_with {
            tx.execute(
                "INSERT OR IGNORE INTO list_shares (list_uuid, user_uuid) VALUES (?1, ?2);",
                params![list_uuid.as_str(), sharee.id.to_string()],
            )?;
        }
        tx.commit()?;

        Ok(list.id)
    }

    fn get_list(&self, id: ListId) -> RepoResult<Option<List>> {
        let list_uuid = id.to_string();
        let header = self
            .conn
            .query_row(
                "SELECT l.owner_uuid, u.email AS owner_email
                 FROM lists l
                 LEFT JOIN users u ON u.uuid = l.owner_uuid
                 WHERE l.uuid = ?1;",
                [list_uuid.as_str()],
                |row| {
                    Ok((
                        row.get::<_, Option<String>>("owner_uuid")?,
                        row.get::<_, Option<String>>("owner_email")?,
                    ))
                },
            )
            .optional()?;

        let Some((owner_uuid, owner_email)) = header else {
            return Ok(None);
        };
        let owner = parse_owner(owner_uuid, owner_email)?.map(|(owner_id, email)| User {
            id: owner_id,
            email,
        });

        let items = load_items(self.conn, id)?;
        if items.is_empty() {
            return Err(RepoError::InvalidData(format!("list {id} has no items")));
        }

        Ok(Some(List {
            id,
            owner,
            items,
            shared_with: load_sharees(self.conn, list_uuid.as_str())?,
        }))
    }

    fn list_exists(&self, id: ListId) -> RepoResult<bool> {
        list_exists_on(self.conn, id)
    }

    fn item_exists(&self, list_id: ListId, text: &str) -> RepoResult<bool> {
        item_exists_on(self.conn, list_id, text)
    }

    fn add_item(&self, item: &Item) -> RepoResult<ItemId> {
        validate_item_text(&item.text)?;

        let tx = self.begin_write()?;
        if !list_exists_on(&tx, item.list_id)? {
            return Err(RepoError::NotFound {
                entity: "list",
                id: item.list_id,
            });
        }
        if item_exists_on(&tx, item.list_id, &item.text)? {
            return Err(RepoError::DuplicateItem(item.list_id));
        }
        insert_item(&tx, item)?;
        tx.commit()?;

        Ok(item.id)
    }

    fn add_sharee(&self, list_id: ListId, user_id: UserId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO list_shares (list_uuid, user_uuid) VALUES (?1, ?2);",
            params![list_id.to_string(), user_id.to_string()],
        )?;
        Ok(changed == 1)
    }

    fn query_lists(&self, filter: ListFilter) -> RepoResult<Vec<ListSummary>> {
        let mut sql = String::from(LIST_SUMMARY_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();

        match filter {
            ListFilter::All => {}
            ListFilter::OwnedBy(user_id) => {
                sql.push_str(" WHERE l.owner_uuid = ?1");
                bind_values.push(Value::Text(user_id.to_string()));
            }
            ListFilter::SharedWith(user_id) => {
                sql.push_str(
                    " WHERE EXISTS (
                        SELECT 1
                        FROM list_shares s
                        WHERE s.list_uuid = l.uuid
                          AND s.user_uuid = ?1
                    )",
                );
                bind_values.push(Value::Text(user_id.to_string()));
            }
            ListFilter::VisibleTo(user_id) => {
                sql.push_str(
                    " WHERE l.owner_uuid = ?1
                       OR EXISTS (
                        SELECT 1
                        FROM list_shares s
                        WHERE s.list_uuid = l.uuid
                          AND s.user_uuid = ?1
                    )",
                );
                bind_values.push(Value::Text(user_id.to_string()));
            }
        }
        sql.push_str(" ORDER BY l.id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get("uuid")?;
            let id = parse_uuid(&uuid_text, "lists.uuid")?;
            let name: Option<String> = row.get("name")?;
            let name =
                name.ok_or_else(|| RepoError::InvalidData(format!("list {id} has no items")))?;
            let owner = parse_owner(row.get("owner_uuid")?, row.get("owner_email")?)?;
            let (owner_id, owner_email) = match owner {
                Some((owner_id, email)) => (Some(owner_id), Some(email)),
                None => (None, None),
            };
            summaries.push(ListSummary {
                id,
                name,
                owner_id,
                owner_email,
            });
        }

        Ok(summaries)
    }
}

fn insert_item(conn: &Connection, item: &Item) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO items (uuid, list_uuid, text) VALUES (?1, ?2, ?3);",
        params![
            item.id.to_string(),
            item.list_id.to_string(),
            item.text.as_str()
        ],
    )
    .map_err(|err| {
        if is_unique_violation(&err) {
            RepoError::DuplicateItem(item.list_id)
        } else {
            err.into()
        }
    })?;
    Ok(())
}

fn list_exists_on(conn: &Connection, list_id: ListId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM lists WHERE uuid = ?1);",
        [list_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn item_exists_on(conn: &Connection, list_id: ListId, text: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM items
            WHERE list_uuid = ?1
              AND text = ?2
        );",
        params![list_id.to_string(), text],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn load_items(conn: &Connection, list_id: ListId) -> RepoResult<Vec<Item>> {
    let mut stmt = conn.prepare(
        "SELECT uuid, text
         FROM items
         WHERE list_uuid = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([list_id.to_string()])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        let uuid_text: String = row.get("uuid")?;
        items.push(Item {
            id: parse_uuid(&uuid_text, "items.uuid")?,
            list_id,
            text: row.get("text")?,
        });
    }
    Ok(items)
}

fn load_sharees(conn: &Connection, list_uuid: &str) -> RepoResult<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT u.uuid, u.email
         FROM list_shares s
         INNER JOIN users u ON u.uuid = s.user_uuid
         WHERE s.list_uuid = ?1
         ORDER BY u.email ASC;",
    )?;
    let mut rows = stmt.query([list_uuid])?;
    let mut sharees = Vec::new();
    while let Some(row) = rows.next()? {
        let uuid_text: String = row.get("uuid")?;
        sharees.push(User {
            id: parse_uuid(&uuid_text, "users.uuid")?,
            email: row.get("email")?,
        });
    }
    Ok(sharees)
}

fn parse_owner(
    owner_uuid: Option<String>,
    owner_email: Option<String>,
) -> RepoResult<Option<(UserId, String)>> {
    match (owner_uuid, owner_email) {
        (None, _) => Ok(None),
        (Some(uuid_text), Some(email)) => {
            Ok(Some((parse_uuid(&uuid_text, "lists.owner_uuid")?, email)))
        }
        (Some(uuid_text), None) => Err(RepoError::InvalidData(format!(
            "list owner `{uuid_text}` has no matching user row"
        ))),
    }
}
