use lovesync_core::db::open_db_in_memory;
use lovesync_core::view::goals::progress_percent;
use lovesync_core::view::tracker::{activity_stats, money_total};
use lovesync_core::{
    ActivityNature, FixedClock, MoneyEntryPatch, OccurrenceDetails, RoomCode, RoomData, RoomFeed,
    RoomService, RoomServiceError, SqliteRoomRepository, TogetherCategory,
};
use rusqlite::Connection;
use std::sync::Arc;

const T0: i64 = 1_700_000_000_000;

fn paired(conn: &Connection) -> (RoomService<SqliteRoomRepository<'_>>, RoomCode) {
    let service = RoomService::new(
        SqliteRoomRepository::try_new(conn).unwrap(),
        Arc::new(RoomFeed::new()),
    )
    .with_clock(Arc::new(FixedClock::new(T0)));
    let code = service.create_room("ana", "Ana").unwrap();
    service.join_room(code.as_str(), "ben", "Ben").unwrap();
    (service, code)
}

fn doc(service: &RoomService<SqliteRoomRepository<'_>>, code: &RoomCode) -> RoomData {
    service.get_room(code.as_str()).unwrap().unwrap().room
}

#[test]
fn activity_logs_append_and_drop_empty_fields() {
    let conn = open_db_in_memory().unwrap();
    let (service, code) = paired(&conn);
    let gym = service
        .add_activity(code.as_str(), "ana", " Gym ", ActivityNature::Session, Some("  "))
        .unwrap();

    service
        .log_activity(
            code.as_str(),
            gym,
            "ana",
            OccurrenceDetails {
                timestamp: T0 - 1_000,
                duration_minutes: Some(0),
                quantity: Some(0.0),
                note: Some("   ".into()),
                is_milestone: false,
            },
        )
        .unwrap()
        .unwrap();
    service
        .log_activity(
            code.as_str(),
            gym,
            "ben",
            OccurrenceDetails {
                timestamp: T0,
                duration_minutes: Some(45),
                is_milestone: true,
                ..OccurrenceDetails::default()
            },
        )
        .unwrap();
    assert_eq!(
        service
            .log_activity(code.as_str(), uuid::Uuid::new_v4(), "ana", OccurrenceDetails::default())
            .unwrap(),
        None
    );

    let room = doc(&service, &code);
    let activity = &room.activities[0];
    assert_eq!(activity.title, "Gym");
    assert_eq!(activity.project_unit, None);
    assert_eq!(activity.logs.len(), 2);
    let first = &activity.logs[0];
    assert_eq!(
        (first.duration_minutes, first.quantity, first.note.as_deref(), first.is_milestone),
        (None, None, None, None)
    );
    assert_eq!(activity.logs[1].duration_minutes, Some(45));

    let stats = activity_stats(activity, "ana");
    assert_eq!(stats.me.sessions, 1);
    assert_eq!(stats.partner.milestones, 1);

    assert!(service.delete_activity(code.as_str(), gym).unwrap());
    assert!(doc(&service, &code).activities.is_empty());
}

#[test]
fn stranger_cannot_log_activity() {
    let conn = open_db_in_memory().unwrap();
    let (service, code) = paired(&conn);
    let gym = service
        .add_activity(code.as_str(), "ana", "Gym", ActivityNature::Ongoing, None)
        .unwrap();

    let err = service
        .log_activity(code.as_str(), gym, "eve", OccurrenceDetails::default())
        .expect_err("non-member");
    assert!(matches!(err, RoomServiceError::NotMember { .. }));
}

#[test]
fn money_entries_add_edit_and_delete() {
    let conn = open_db_in_memory().unwrap();
    let (service, code) = paired(&conn);

    let salary = service
        .add_money_entry(code.as_str(), "ana", 250_000, "salary", Some(T0 - 10))
        .unwrap();
    let dinner = service
        .add_money_entry(code.as_str(), "ben", -4_200, " dinner ", None)
        .unwrap();

    let room = doc(&service, &code);
    assert_eq!(room.money[0].timestamp, T0 - 10);
    assert_eq!(room.money[1].timestamp, T0);
    assert_eq!(room.money[1].note, "dinner");
    assert_eq!(money_total(&room), 245_800);

    assert!(service
        .edit_money_entry(
            code.as_str(),
            dinner,
            MoneyEntryPatch {
                amount_cents: Some(-5_000),
                note: Some(" sushi ".into()),
                timestamp: None,
            },
        )
        .unwrap());
    let room = doc(&service, &code);
    assert_eq!(room.money[1].amount_cents, -5_000);
    assert_eq!(room.money[1].note, "sushi");
    assert_eq!(room.money[1].timestamp, T0);

    assert!(service.delete_money_entry(code.as_str(), salary).unwrap());
    assert!(!service
        .edit_money_entry(code.as_str(), salary, MoneyEntryPatch::default())
        .unwrap());
    assert_eq!(money_total(&doc(&service, &code)), -5_000);
}

#[test]
fn blank_money_note_is_rejected_on_add_and_edit() {
    let conn = open_db_in_memory().unwrap();
    let (service, code) = paired(&conn);

    let err = service
        .add_money_entry(code.as_str(), "ana", -300, "   ", None)
        .expect_err("blank note");
    assert!(matches!(err, RoomServiceError::Validation(_)));

    let entry = service
        .add_money_entry(code.as_str(), "ana", -300, "bus", None)
        .unwrap();
    let err = service
        .edit_money_entry(
            code.as_str(),
            entry,
            MoneyEntryPatch {
                note: Some(" ".into()),
                ..MoneyEntryPatch::default()
            },
        )
        .expect_err("blank note");
    assert!(matches!(err, RoomServiceError::Validation(_)));

    let room = doc(&service, &code);
    assert_eq!(room.money.len(), 1);
    assert_eq!(room.money[0].note, "bus");
}

#[test]
fn extreme_ledger_amounts_total_without_overflow() {
    let conn = open_db_in_memory().unwrap();
    let (service, code) = paired(&conn);
    service
        .add_money_entry(code.as_str(), "ana", i64::MAX, "lottery", None)
        .unwrap();
    service
        .add_money_entry(code.as_str(), "ben", 1, "change", None)
        .unwrap();

    assert_eq!(money_total(&doc(&service, &code)), i64::MAX);
}

#[test]
fn goal_completes_freezes_and_reward_is_claimed_once() {
    let conn = open_db_in_memory().unwrap();
    let (service, code) = paired(&conn);
    let goal = service
        .add_goal(code.as_str(), "Run 2x", 2, "Pizza night")
        .unwrap();

    let err = service
        .claim_reward(code.as_str(), goal)
        .expect_err("unfinished goal");
    assert!(matches!(err, RoomServiceError::GoalNotClaimable(id) if id == goal));

    assert_eq!(service.increment_goal(code.as_str(), goal).unwrap(), Some(false));
    assert_eq!(service.increment_goal(code.as_str(), goal).unwrap(), Some(true));
    let revision = service.get_room(code.as_str()).unwrap().unwrap().revision;
    assert_eq!(service.increment_goal(code.as_str(), goal).unwrap(), Some(true));
    assert_eq!(
        service.get_room(code.as_str()).unwrap().unwrap().revision,
        revision
    );

    let room = doc(&service, &code);
    assert_eq!(room.goals[0].current_count, 2);
    assert_eq!(progress_percent(&room.goals[0]), 100);

    let todo = service.claim_reward(code.as_str(), goal).unwrap();
    let room = doc(&service, &code);
    let reward = room.todos.iter().find(|t| t.id == todo).unwrap();
    assert_eq!(reward.text, "Reward: Pizza night");
    assert_eq!(reward.category, TogetherCategory::List);
    assert_eq!(reward.deadline, None);
    assert_eq!(room.goals[0].claimed_at, Some(T0));

    assert!(matches!(
        service.claim_reward(code.as_str(), goal),
        Err(RoomServiceError::GoalNotClaimable(_))
    ));
    assert!(service.delete_goal(code.as_str(), goal).unwrap());
    assert_eq!(service.increment_goal(code.as_str(), goal).unwrap(), None);
}

#[test]
fn zero_target_goal_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let (service, code) = paired(&conn);

    let err = service
        .add_goal(code.as_str(), "Nothing", 0, "None")
        .expect_err("zero target");
    assert!(matches!(err, RoomServiceError::Validation(_)));
    assert!(doc(&service, &code).goals.is_empty());
}
