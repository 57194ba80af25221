use lovesync_core::db::migrations::latest_version;
use lovesync_core::db::{open_db, open_db_in_memory, DbError};
use lovesync_core::{
    RepoError, RoomCode, RoomData, RoomRepository, SqliteRoomRepository, TogetherCategory,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "rooms");
    assert_column_exists(&conn, "rooms", "host_id");
    assert_column_exists(&conn, "rooms", "guest_id");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lovesync.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "rooms");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteRoomRepository::try_new(&conn)
        .err()
        .expect("unmigrated connection must be rejected");
    assert!(matches!(
        err,
        RepoError::Db(DbError::UnsupportedSchemaVersion { db_version: 0, .. })
    ));
}

#[test]
fn corrupted_document_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO rooms (code, document, host_id) VALUES ('ABCDEF', '{not json', 'h');",
        [],
    )
    .unwrap();

    let repo = SqliteRoomRepository::try_new(&conn).unwrap();
    let err = repo
        .get_room(&RoomCode::parse("abcdef").unwrap())
        .expect_err("undecodable document must fail");
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn legacy_todo_document_loads_with_completion_folded() {
    let conn = open_db_in_memory().unwrap();
    let mut document = serde_json::to_value(RoomData::new("h", "Ana", 500)).unwrap();
    document["todos"] = serde_json::json!([{
        "id": "7d1c9a52-3f0e-4c3b-9a51-2b8f1c1e0a11",
        "text": "Paint the hallway",
        "type": "we",
        "isCompleted": true,
        "isPinned": true,
        "createdAt": 1000
    }]);
    conn.execute(
        "INSERT INTO rooms (code, document, host_id) VALUES ('ABCDEF', ?1, 'h');",
        [document.to_string()],
    )
    .unwrap();

    let repo = SqliteRoomRepository::try_new(&conn).unwrap();
    let snapshot = repo
        .get_room(&RoomCode::parse("ABCDEF").unwrap())
        .unwrap()
        .expect("legacy room should load");
    let todo = &snapshot.room.todos[0];
    assert_eq!(todo.category, TogetherCategory::List);
    assert_eq!(todo.completed_at, Some(1000));
    assert!(!todo.is_pinned);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}

fn assert_column_exists(conn: &Connection, table_name: &str, column: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM pragma_table_info(?1) WHERE name = ?2);",
            [table_name, column],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "column {table_name}.{column} does not exist");
}
