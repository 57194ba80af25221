use lovesync_core::db::open_db_in_memory;
use lovesync_core::view::together::together_view;
use lovesync_core::{
    FixedClock, RoomCode, RoomData, RoomFeed, RoomService, SqliteRoomRepository, StickyContent,
    TogetherCategory,
};
use rusqlite::Connection;
use std::sync::Arc;

const T0: i64 = 1_700_000_000_000;

fn paired(conn: &Connection) -> (RoomService<SqliteRoomRepository<'_>>, Arc<FixedClock>, RoomCode) {
    let clock = Arc::new(FixedClock::new(T0));
    let service = RoomService::new(
        SqliteRoomRepository::try_new(conn).unwrap(),
        Arc::new(RoomFeed::new()),
    )
    .with_clock(clock.clone());
    let code = service.create_room("ana", "Ana").unwrap();
    service.join_room(code.as_str(), "ben", "Ben").unwrap();
    (service, clock, code)
}

fn doc(service: &RoomService<SqliteRoomRepository<'_>>, code: &RoomCode) -> RoomData {
    service.get_room(code.as_str()).unwrap().unwrap().room
}

#[test]
fn random_items_never_keep_a_deadline() {
    let conn = open_db_in_memory().unwrap();
    let (service, _clock, code) = paired(&conn);

    service
        .add_todo(code.as_str(), "sushi", TogetherCategory::Random, Some(T0 + 1))
        .unwrap();
    service
        .add_todo(code.as_str(), "passport", TogetherCategory::List, Some(T0 + 1))
        .unwrap();

    let room = doc(&service, &code);
    assert_eq!(room.todos[0].deadline, None);
    assert_eq!(room.todos[1].deadline, Some(T0 + 1));
}

#[test]
fn pinning_todo_mirrors_sticky_and_repinning_moves_it() {
    let conn = open_db_in_memory().unwrap();
    let (service, clock, code) = paired(&conn);
    let trip = service
        .add_todo(code.as_str(), "trip", TogetherCategory::List, Some(T0 + 5))
        .unwrap();
    let gift = service
        .add_todo(code.as_str(), "gift", TogetherCategory::List, None)
        .unwrap();

    assert_eq!(
        service.toggle_todo_pin(code.as_str(), "ana", trip).unwrap(),
        Some(true)
    );
    let room = doc(&service, &code);
    let mirror = room.stickies.iter().find(|s| s.origin_id == Some(trip)).unwrap();
    assert!(mirror.is_pinned);
    assert_eq!(mirror.deadline, Some(T0 + 5));

    clock.advance_ms(100);
    service.toggle_todo_pin(code.as_str(), "ben", gift).unwrap();

    let room = doc(&service, &code);
    room.validate().unwrap();
    let pinned: Vec<_> = room.todos.iter().filter(|t| t.is_pinned).map(|t| t.id).collect();
    assert_eq!(pinned, vec![gift]);
    assert_eq!(room.stickies.len(), 1);
    assert_eq!(room.stickies[0].origin_id, Some(gift));
    assert_eq!(room.stickies[0].user_id, "ben");
}

#[test]
fn unpinning_mirror_sticky_unpins_todo() {
    let conn = open_db_in_memory().unwrap();
    let (service, _clock, code) = paired(&conn);
    let trip = service
        .add_todo(code.as_str(), "trip", TogetherCategory::List, None)
        .unwrap();
    service.toggle_todo_pin(code.as_str(), "ana", trip).unwrap();
    let mirror_id = doc(&service, &code).stickies[0].id;

    assert_eq!(
        service
            .toggle_sticky_pin(code.as_str(), "ana", mirror_id)
            .unwrap(),
        Some(false)
    );
    assert!(!doc(&service, &code).todos[0].is_pinned);
}

#[test]
fn pinning_another_sticky_unpins_mirrored_todo() {
    let conn = open_db_in_memory().unwrap();
    let (service, _clock, code) = paired(&conn);
    let trip = service
        .add_todo(code.as_str(), "trip", TogetherCategory::List, None)
        .unwrap();
    service.toggle_todo_pin(code.as_str(), "ana", trip).unwrap();
    let note = service
        .add_sticky(
            code.as_str(),
            "ana",
            StickyContent::Note {
                text: "hello".into(),
            },
        )
        .unwrap();

    service.toggle_sticky_pin(code.as_str(), "ana", note).unwrap();

    let room = doc(&service, &code);
    assert!(!room.todos[0].is_pinned);
    room.validate().unwrap();
}

#[test]
fn completing_and_deleting_todos_remove_mirrors() {
    let conn = open_db_in_memory().unwrap();
    let (service, clock, code) = paired(&conn);
    let trip = service
        .add_todo(code.as_str(), "trip", TogetherCategory::List, None)
        .unwrap();
    let gift = service
        .add_todo(code.as_str(), "gift", TogetherCategory::List, None)
        .unwrap();

    service.toggle_todo_pin(code.as_str(), "ana", trip).unwrap();
    clock.advance_ms(50);
    assert!(service.complete_todo(code.as_str(), trip).unwrap());
    let room = doc(&service, &code);
    assert!(room.stickies.is_empty());
    assert_eq!(room.todos[0].completed_at, Some(T0 + 50));
    assert!(!room.todos[0].is_pinned);
    assert_eq!(
        service.toggle_todo_pin(code.as_str(), "ana", trip).unwrap(),
        None
    );

    service.toggle_todo_pin(code.as_str(), "ana", gift).unwrap();
    assert!(service.delete_todo(code.as_str(), gift).unwrap());
    let room = doc(&service, &code);
    assert!(room.stickies.is_empty());
    assert_eq!(room.todos.len(), 1);

    let view = together_view(&room);
    assert!(view.active.is_empty());
    assert_eq!(view.completed.len(), 1);
}
