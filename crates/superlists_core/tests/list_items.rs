use rusqlite::Connection;
use std::sync::{Arc, Barrier};
use std::thread;
use superlists_core::db::{open_db, open_db_in_memory};
use superlists_core::validation::{DUPLICATE_ITEM_ERROR, EMPTY_ITEM_ERROR, ITEM_TEXT_FIELD};
use superlists_core::{
    CurrentUser, Item, List, ListRepository, ListService, ListServiceError, Outcome, RepoError,
    SqliteListRepository, SqliteUserRepository, ValidationError,
};
use uuid::Uuid;

type SqliteListService<'conn> =
    ListService<SqliteListRepository<'conn>, SqliteUserRepository<'conn>>;

fn service_for(conn: &Connection) -> SqliteListService<'_> {
    ListService::new(
        SqliteListRepository::try_new(conn).unwrap(),
        SqliteUserRepository::try_new(conn).unwrap(),
    )
}

fn item_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM items;", [], |row| row.get(0))
        .unwrap()
}

fn texts(service: &SqliteListService<'_>, list_id: Uuid) -> Vec<String> {
    service
        .view_list(list_id)
        .unwrap()
        .items
        .into_iter()
        .map(|item| item.text)
        .collect()
}

#[test]
fn create_new_list_uses_text_as_name() {
    let conn = open_db_in_memory().unwrap();
    let service = service_for(&conn);
    for text in ["Buy milk", "a", "  padded  ", "Ünïcödé ✓"] {
        let list = service
            .create_new_list(text, &CurrentUser::Anonymous)
            .unwrap()
            .saved()
            .unwrap();
        assert_eq!(list.name(), Some(text));
        assert_eq!(list.items.len(), 1);
    }
}

#[test]
fn create_new_list_with_empty_text_saves_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = service_for(&conn);
    let outcome = service
        .create_new_list("", &CurrentUser::Anonymous)
        .unwrap();

    let err = outcome.field_error().unwrap();
    assert_eq!(err.kind, ValidationError::EmptyItem);
    assert_eq!(err.field, ITEM_TEXT_FIELD);
    assert_eq!(err.message, EMPTY_ITEM_ERROR);
    assert_eq!(err.input, "");

    let lists: i64 = conn
        .query_row("SELECT COUNT(*) FROM lists;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(lists, 0);
    assert_eq!(item_count(&conn), 0);
}

#[test]
fn add_item_appends_in_display_order() {
    let conn = open_db_in_memory().unwrap();
    let service = service_for(&conn);
    let list = service
        .create_new_list("Buy milk", &CurrentUser::Anonymous)
        .unwrap()
        .saved()
        .unwrap();

    let item = service
        .add_item_to_list(list.id, "Buy eggs")
        .unwrap()
        .saved()
        .unwrap();
    assert_eq!(item.list_id, list.id);
    assert_eq!(item.text, "Buy eggs");

    assert_eq!(texts(&service, list.id), vec!["Buy milk", "Buy eggs"]);
    assert_eq!(item_count(&conn), 2);

    let reloaded = service.view_list(list.id).unwrap();
    assert_eq!(reloaded.name(), Some("Buy milk"));
    let last = reloaded.numbered_items().last().unwrap();
    assert_eq!((last.0, last.1.text.as_str()), (2, "Buy eggs"));
}

#[test]
fn add_duplicate_item_is_rejected_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = service_for(&conn);
    let list = service
        .create_new_list("Buy milk", &CurrentUser::Anonymous)
        .unwrap()
        .saved()
        .unwrap();
    service.add_item_to_list(list.id, "Buy eggs").unwrap();

    let outcome = service.add_item_to_list(list.id, "Buy milk").unwrap();
    match outcome {
        Outcome::Invalid(err) => {
            assert_eq!(err.kind, ValidationError::DuplicateItem);
            assert_eq!(err.message, DUPLICATE_ITEM_ERROR);
            assert_eq!(err.input, "Buy milk");
        }
        Outcome::Saved(item) => panic!("duplicate saved: {item:?}"),
    }

    assert_eq!(texts(&service, list.id), vec!["Buy milk", "Buy eggs"]);
    assert_eq!(item_count(&conn), 2);
}

#[test]
fn duplicate_check_is_case_sensitive_and_scoped_per_list() {
    let conn = open_db_in_memory().unwrap();
    let service = service_for(&conn);
    let first = service
        .create_new_list("Buy milk", &CurrentUser::Anonymous)
        .unwrap()
        .saved()
        .unwrap();
    let second = service
        .create_new_list("Other", &CurrentUser::Anonymous)
        .unwrap()
        .saved()
        .unwrap();

    assert!(service.add_item_to_list(first.id, "buy milk").unwrap().is_saved());
    assert!(service.add_item_to_list(second.id, "Buy milk").unwrap().is_saved());
}

#[test]
fn add_empty_item_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = service_for(&conn);
    let list = service
        .create_new_list("Buy milk", &CurrentUser::Anonymous)
        .unwrap()
        .saved()
        .unwrap();

    let outcome = service.add_item_to_list(list.id, "").unwrap();
    assert_eq!(
        outcome.field_error().map(|err| err.kind),
        Some(ValidationError::EmptyItem)
    );
    assert_eq!(item_count(&conn), 1);
}

#[test]
fn add_item_to_unknown_list_is_fatal() {
    let conn = open_db_in_memory().unwrap();
    let service = service_for(&conn);
    let missing = Uuid::new_v4();
    let err = service.add_item_to_list(missing, "anything").unwrap_err();
    assert!(matches!(err, ListServiceError::ListNotFound(id) if id == missing));
}

#[test]
fn repository_insert_rechecks_uniqueness_inside_its_transaction() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::try_new(&conn).unwrap();
    let service = ListService::new(&repo, SqliteUserRepository::try_new(&conn).unwrap());
    let list = service
        .create_new_list("Buy milk", &CurrentUser::Anonymous)
        .unwrap()
        .saved()
        .unwrap();

    // Skips the service pre-check, as a concurrent writer would.
    let racing = Item::new(list.id, "Buy milk").unwrap();
    let err = repo.add_item(&racing).unwrap_err();
    assert!(matches!(err, RepoError::DuplicateItem(id) if id == list.id));
    assert_eq!(item_count(&conn), 1);
}

#[test]
fn repository_reports_unknown_list_on_insert() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::try_new(&conn).unwrap();

    let orphan = Item::new(Uuid::new_v4(), "lost").unwrap();
    let err = repo.add_item(&orphan).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "list", .. }));
}

#[test]
fn storage_constraint_rejects_duplicate_items_and_rolls_back_the_list() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::try_new(&conn).unwrap();

    let mut list = List::create("milk", None).unwrap();
    list.items.push(Item::new(list.id, "milk").unwrap());
    let err = repo.create_list(&list).unwrap_err();
    assert!(matches!(err, RepoError::DuplicateItem(id) if id == list.id));

    let lists: i64 = conn
        .query_row("SELECT COUNT(*) FROM lists;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(lists, 0);
    assert_eq!(item_count(&conn), 0);
    assert!(!repo.list_exists(list.id).unwrap());
}

#[test]
fn concurrent_duplicate_adds_store_one_item() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("race.sqlite3");
    let list_id = {
        let conn = open_db(&db_path).unwrap();
        service_for(&conn)
            .create_new_list("Buy milk", &CurrentUser::Anonymous)
            .unwrap()
            .saved()
            .unwrap()
            .id
    };

    let barrier = Arc::new(Barrier::new(2));
    let writers: Vec<_> = (0..2)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let db_path = db_path.clone();
            thread::spawn(move || {
                let conn = open_db(&db_path).unwrap();
                let repo = SqliteListRepository::try_new(&conn).unwrap();
                let item = Item::new(list_id, "Buy eggs").unwrap();
                barrier.wait();
                repo.add_item(&item)
            })
        })
        .collect();
    let results: Vec<_> = writers
        .into_iter()
        .map(|writer| writer.join().unwrap())
        .collect();

    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|result| matches!(result, Err(RepoError::DuplicateItem(id)) if *id == list_id)));

    let conn = open_db(&db_path).unwrap();
    assert_eq!(item_count(&conn), 2);
}
