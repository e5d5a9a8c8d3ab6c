use chrono::{TimeZone, Utc};

use serverdesk::model::{EntityRef, TodoStatus};
use serverdesk::{Desk, Error, FileStorage, MemoryStorage, NewTodo, StoragePort};

fn alpha_desk() -> Desk<MemoryStorage> {
    let mut desk = Desk::new(MemoryStorage::new());
    desk.add_server("Alpha").unwrap();
    desk
}

#[test]
fn added_server_loads_with_empty_lists() {
    let desk = alpha_desk();
    let store = desk.load();
    let record = store.get("Alpha").unwrap();
    assert!(record.todos.is_empty());
    assert!(record.staff.is_empty());
    assert!(record.logs.is_empty());
}

#[test]
fn duplicate_add_leaves_payload_untouched() {
    let mut desk = alpha_desk();
    let before = desk.storage().payload();
    let err = desk.add_server("Alpha").unwrap_err();
    assert!(matches!(err, Error::ServerExists(_)));
    assert_eq!(desk.storage().payload(), before);
}

#[test]
fn save_of_load_is_idempotent() {
    let mut desk = alpha_desk();
    desk.add_todo("Alpha", NewTodo::named("Patch")).unwrap();
    desk.add_staff("Alpha", "Ann", "Admin").unwrap();

    let first = desk.load();
    desk.storage().save_all(&first).unwrap();
    let second = desk.load();
    assert_eq!(first, second);
}

#[test]
fn dashboard_matches_completion() {
    let mut desk = alpha_desk();
    for name in ["One", "Two", "Three"] {
        desk.add_todo("Alpha", NewTodo::named(name)).unwrap();
    }
    desk.change_todo_status("Alpha", &EntityRef::Index(0), TodoStatus::Done)
        .unwrap();
    desk.change_todo_status("Alpha", &EntityRef::Index(1), TodoStatus::Done)
        .unwrap();
    desk.change_todo_status("Alpha", &EntityRef::Index(2), TodoStatus::InProgress)
        .unwrap();

    let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let dashboard = desk.board(None, now).dashboard.unwrap();
    assert_eq!((dashboard.completed, dashboard.total, dashboard.percentage), (2, 3, 67));
}

#[test]
fn overdue_only_for_open_todos() {
    let mut desk = alpha_desk();
    let mut old = NewTodo::named("Old");
    old.deadline = Some("2000-01-01".to_string());
    desk.add_todo("Alpha", old.clone()).unwrap();
    desk.add_todo("Alpha", old).unwrap();
    desk.change_todo_status("Alpha", &EntityRef::Index(0), TodoStatus::InProgress)
        .unwrap();
    desk.change_todo_status("Alpha", &EntityRef::Index(1), TodoStatus::Done)
        .unwrap();

    let board = desk.board(Some("Alpha"), Utc::now());
    assert!(board.todos[0].overdue);
    assert!(!board.todos[1].overdue);
}

#[test]
fn legacy_payload_loads_and_keeps_logs() {
    let legacy = r#"{
        "Alpha": {
            "todos": [
                { "name": "Opdater", "status": "Igang",
                  "priority": "Høj", "deadline": "2000-01-01" },
                { "name": "Ukendt", "status": "Parkeret" }
            ],
            "staff": [ { "name": "Ann", "rank": "Admin", "responsibilities": ["clean"] } ],
            "logs": ["kept"]
        }
    }"#;
    let mut desk = Desk::new(MemoryStorage::with_payload(legacy));
    let store = desk.load();
    let record = store.get("Alpha").unwrap();
    assert_eq!(record.todos[0].status, TodoStatus::InProgress);
    assert_eq!(record.todos[1].status, TodoStatus::NotStarted);
    assert!(record.todos[0].id.starts_with("todo-"));
    assert!(record.staff[0].id.starts_with("staff-"));

    desk.add_responsibility("Alpha", &EntityRef::Index(0), "cook")
        .unwrap();
    let store = desk.load();
    let record = store.get("Alpha").unwrap();
    assert_eq!(record.staff[0].responsibilities, vec!["clean", "cook"]);
    assert_eq!(record.logs, vec!["kept".to_string()]);
}

#[test]
fn file_backend_persists_across_handles() {
    let dir = tempfile::tempdir().unwrap();
    let mut first = Desk::new(FileStorage::in_dir(dir.path()));
    first.add_server("Alpha").unwrap();
    first.add_server("Beta").unwrap();
    first.add_todo("Beta", NewTodo::named("Patch")).unwrap();

    let mut second = Desk::new(FileStorage::in_dir(dir.path()));
    second.delete_server("Alpha").unwrap();

    let store = first.load();
    assert!(!store.contains("Alpha"));
    assert_eq!(store.get("Beta").unwrap().todos[0].name, "Patch");
    assert_eq!(
        first.feed().messages().collect::<Vec<_>>(),
        vec![
            "Server \"Alpha\" created.",
            "Server \"Beta\" created.",
            "Todo \"Patch\" added without a deadline.",
        ]
    );
    assert_eq!(second.feed().entries().len(), 1);
}

#[test]
fn ids_listed_for_legacy_records_stay_addressable() {
    let legacy = r#"{"Alpha": {
        "todos": [{"name": "patch", "status": "Igang", "deadline": null, "priority": null}],
        "staff": [{"name": "Ann", "rank": "Admin", "responsibilities": []}],
        "logs": []
    }}"#;
    let mut desk = Desk::new(MemoryStorage::with_payload(legacy));
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let first = desk.board(None, now);
    let second = desk.board(None, now);
    assert_eq!(first.todos[0].id, second.todos[0].id);
    assert_eq!(first.staff[0].id, second.staff[0].id);

    let todo_target: EntityRef = first.todos[0].id.parse().unwrap();
    let done = desk
        .change_todo_status("Alpha", &todo_target, TodoStatus::Done)
        .unwrap();
    assert_eq!(done.name, "patch");

    let staff_target: EntityRef = first.staff[0].id.parse().unwrap();
    let member = desk
        .add_responsibility("Alpha", &staff_target, "backups")
        .unwrap()
        .unwrap();
    assert_eq!(member.responsibilities, vec!["backups"]);
}
