//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose room use-cases to Dart via FRB as flat, string-typed calls.
//! - Hand room documents to Dart as camelCase JSON.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported inside the response envelope, never thrown.
//! - Enum inputs use the same snake_case spelling as the stored document.

use log::warn;
use lovesync_core::db::open_db;
use lovesync_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ActivityNature, InteractionKind, JoinOutcome, MoneyEntryPatch, Mood, OccurrenceDetails,
    RecordId, RoomFeed, RoomService, RoomSnapshot, ServiceResult, Signal, SqliteRoomRepository,
    StickyContent, TogetherCategory,
};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

const ROOM_DB_FILE_NAME: &str = "lovesync_rooms.sqlite3";
static ROOM_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static ROOM_FEED: OnceLock<Arc<RoomFeed>> = OnceLock::new();

type FfiRoomService<'conn> = RoomService<SqliteRoomRepository<'conn>>;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the room database location before first use.
///
/// # FFI contract
/// - Returns empty string on success.
/// - Fails once a different path is already in use.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "db path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = ROOM_DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "db path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Result envelope for mutating room calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Room code or created record ID, when the call produces one.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl RoomActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }

    fn from_result<T>(
        result: Result<T, String>,
        render: impl FnOnce(T) -> (&'static str, Option<String>),
    ) -> Self {
        match result {
            Ok(value) => {
                let (message, id) = render(value);
                Self::success(message, id)
            }
            Err(message) => Self::failure(message),
        }
    }
}

/// Result envelope for room reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshotResponse {
    pub ok: bool,
    /// `false` when the room does not exist (or was deleted).
    pub found: bool,
    /// For polling: whether the revision differs from the caller's.
    pub changed: bool,
    pub revision: i64,
    /// camelCase room document; omitted when unchanged or missing.
    pub document_json: Option<String>,
    pub message: String,
}

impl RoomSnapshotResponse {
    fn failure(message: String) -> Self {
        Self {
            ok: false,
            found: false,
            changed: false,
            revision: 0,
            document_json: None,
            message,
        }
    }

    fn missing(changed: bool) -> Self {
        Self {
            ok: true,
            found: false,
            changed,
            revision: 0,
            document_json: None,
            message: "Room not found.".to_string(),
        }
    }

    fn from_snapshot(snapshot: &RoomSnapshot, include_document: bool) -> Self {
        let document = if include_document {
            match serde_json::to_string(&snapshot.room) {
                Ok(json) => Some(json),
                Err(err) => return Self::failure(format!("room encode failed: {err}")),
            }
        } else {
            None
        };
        Self {
            ok: true,
            found: true,
            changed: include_document,
            revision: snapshot.revision,
            document_json: document,
            message: if include_document {
                "Room loaded.".to_string()
            } else {
                "No changes.".to_string()
            },
        }
    }
}

/// Creates a room; `id` carries the new room code.
#[flutter_rust_bridge::frb(sync)]
pub fn room_create(user_id: String, user_name: String) -> RoomActionResponse {
    let result = with_room_service("room_create", |service| {
        service.create_room(&user_id, &user_name)
    });
    RoomActionResponse::from_result(result, |code| ("Room created.", Some(code.to_string())))
}

/// Joins by user-typed code; `id` carries the normalized code.
#[flutter_rust_bridge::frb(sync)]
pub fn room_join(code: String, user_id: String, user_name: String) -> RoomActionResponse {
    let normalized = code.trim().to_uppercase();
    let result = with_room_service("room_join", |service| {
        service.join_room(&code, &user_id, &user_name)
    });
    RoomActionResponse::from_result(result, |outcome| {
        let message = match outcome {
            JoinOutcome::Host => "Welcome back, host.",
            JoinOutcome::Guest { rejoined: true } => "Welcome back.",
            JoinOutcome::Guest { rejoined: false } => "Joined room.",
        };
        (message, Some(normalized))
    })
}

/// Returns the room a returning user belongs to; `id` is `None` when none.
#[flutter_rust_bridge::frb(sync)]
pub fn room_for_user(user_id: String) -> RoomActionResponse {
    let result = with_room_service("room_for_user", |service| service.room_for_user(&user_id));
    RoomActionResponse::from_result(result, |code| match code {
        Some(code) => ("Room found.", Some(code.to_string())),
        None => ("No room for user.", None),
    })
}

/// Loads the full room document.
#[flutter_rust_bridge::frb(sync)]
pub fn room_get(code: String) -> RoomSnapshotResponse {
    match with_room_service("room_get", |service| service.get_room(&code)) {
        Ok(Some(snapshot)) => RoomSnapshotResponse::from_snapshot(&snapshot, true),
        Ok(None) => RoomSnapshotResponse::missing(false),
        Err(message) => RoomSnapshotResponse::failure(message),
    }
}

/// Cheap change check for polling clients.
///
/// # FFI contract
/// - `document_json` is present only when the stored revision differs from
///   `known_revision`.
/// - A deleted room reports `found=false` and `changed=true` for any
///   non-zero `known_revision`.
#[flutter_rust_bridge::frb(sync)]
pub fn room_poll(code: String, known_revision: i64) -> RoomSnapshotResponse {
    match with_room_service("room_poll", |service| service.get_room(&code)) {
        Ok(Some(snapshot)) => {
            RoomSnapshotResponse::from_snapshot(&snapshot, snapshot.revision != known_revision)
        }
        Ok(None) => RoomSnapshotResponse::missing(known_revision != 0),
        Err(message) => RoomSnapshotResponse::failure(message),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn room_delete(code: String) -> RoomActionResponse {
    let result = with_room_service("room_delete", |service| service.delete_room(&code));
    RoomActionResponse::from_result(result, |deleted| (removal_message(deleted), None))
}

/// Hard-resets room content while keeping the pairing.
#[flutter_rust_bridge::frb(sync)]
pub fn room_clear(code: String) -> RoomActionResponse {
    let result = with_room_service("room_clear", |service| service.clear_room(&code));
    RoomActionResponse::from_result(result, |()| ("Room cleared.", None))
}

/// `kind`: `water|sun|love|poke`.
#[flutter_rust_bridge::frb(sync)]
pub fn room_send_interaction(code: String, user_id: String, kind: String) -> RoomActionResponse {
    let result = parse_wire::<InteractionKind>("interaction", &kind).and_then(|kind| {
        with_room_service("room_send_interaction", |service| {
            service.send_interaction(&code, &user_id, kind)
        })
    });
    RoomActionResponse::from_result(result, |()| ("Sent.", None))
}

#[flutter_rust_bridge::frb(sync)]
pub fn profile_update(code: String, user_id: String, mood: String, note: String) -> RoomActionResponse {
    let result = parse_wire::<Mood>("mood", &mood).and_then(|mood| {
        with_room_service("profile_update", |service| {
            service.update_profile(&code, &user_id, mood, &note)
        })
    });
    RoomActionResponse::from_result(result, |()| ("Profile updated.", None))
}

/// Posts a sticky.
///
/// Input semantics:
/// - `kind=mood`: `value` is a mood name, `caption` optional.
/// - `kind=note`: `value` is the note text.
/// - `kind=signal`: `value` is a signal name.
#[flutter_rust_bridge::frb(sync)]
pub fn sticky_add(
    code: String,
    user_id: String,
    kind: String,
    value: String,
    caption: Option<String>,
) -> RoomActionResponse {
    let content = match kind.trim() {
        "mood" => parse_wire::<Mood>("mood", &value).map(|mood| StickyContent::Mood { mood, caption }),
        "note" => Ok(StickyContent::Note { text: value }),
        "signal" => parse_wire::<Signal>("signal", &value).map(|signal| StickyContent::Signal { signal }),
        other => Err(format!("unsupported sticky kind `{other}`; expected mood|note|signal")),
    };
    let result = content.and_then(|content| {
        with_room_service("sticky_add", |service| {
            service.add_sticky(&code, &user_id, content)
        })
    });
    RoomActionResponse::from_result(result, |id| ("Sticky posted.", Some(id.to_string())))
}

#[flutter_rust_bridge::frb(sync)]
pub fn sticky_delete(code: String, sticky_id: String) -> RoomActionResponse {
    let result = parse_record_id(&sticky_id).and_then(|id| {
        with_room_service("sticky_delete", |service| service.delete_sticky(&code, id))
    });
    RoomActionResponse::from_result(result, |deleted| (removal_message(deleted), None))
}

#[flutter_rust_bridge::frb(sync)]
pub fn sticky_toggle_pin(code: String, user_id: String, sticky_id: String) -> RoomActionResponse {
    let result = parse_record_id(&sticky_id).and_then(|id| {
        with_room_service("sticky_toggle_pin", |service| {
            service.toggle_sticky_pin(&code, &user_id, id)
        })
    });
    RoomActionResponse::from_result(result, |pinned| (pin_message(pinned), None))
}

#[flutter_rust_bridge::frb(sync)]
pub fn grocery_add(code: String, text: String) -> RoomActionResponse {
    let result = with_room_service("grocery_add", |service| service.add_grocery_item(&code, &text));
    RoomActionResponse::from_result(result, |id| ("Item added.", Some(id.to_string())))
}

#[flutter_rust_bridge::frb(sync)]
pub fn grocery_toggle(code: String, item_id: String) -> RoomActionResponse {
    let result = parse_record_id(&item_id).and_then(|id| {
        with_room_service("grocery_toggle", |service| service.toggle_grocery_item(&code, id))
    });
    RoomActionResponse::from_result(result, |checked| {
        let message = match checked {
            Some(true) => "Checked.",
            Some(false) => "Unchecked.",
            None => "Nothing to toggle.",
        };
        (message, None)
    })
}

/// `category`: `list|random`; `deadline_epoch_ms` is ignored for `random`.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_add(
    code: String,
    text: String,
    category: String,
    deadline_epoch_ms: Option<i64>,
) -> RoomActionResponse {
    let result = parse_wire::<TogetherCategory>("category", &category).and_then(|category| {
        with_room_service("todo_add", |service| {
            service.add_todo(&code, &text, category, deadline_epoch_ms)
        })
    });
    RoomActionResponse::from_result(result, |id| ("Todo added.", Some(id.to_string())))
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_complete(code: String, todo_id: String) -> RoomActionResponse {
    let result = parse_record_id(&todo_id).and_then(|id| {
        with_room_service("todo_complete", |service| service.complete_todo(&code, id))
    });
    RoomActionResponse::from_result(result, |done| {
        (if done { "Completed." } else { "Nothing to complete." }, None)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_delete(code: String, todo_id: String) -> RoomActionResponse {
    let result = parse_record_id(&todo_id).and_then(|id| {
        with_room_service("todo_delete", |service| service.delete_todo(&code, id))
    });
    RoomActionResponse::from_result(result, |deleted| (removal_message(deleted), None))
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_toggle_pin(code: String, user_id: String, todo_id: String) -> RoomActionResponse {
    let result = parse_record_id(&todo_id).and_then(|id| {
        with_room_service("todo_toggle_pin", |service| {
            service.toggle_todo_pin(&code, &user_id, id)
        })
    });
    RoomActionResponse::from_result(result, |pinned| (pin_message(pinned), None))
}

/// `nature`: `ongoing|session`.
#[flutter_rust_bridge::frb(sync)]
pub fn activity_add(
    code: String,
    user_id: String,
    title: String,
    nature: String,
    project_unit: Option<String>,
) -> RoomActionResponse {
    let result = parse_wire::<ActivityNature>("nature", &nature).and_then(|nature| {
        with_room_service("activity_add", |service| {
            service.add_activity(&code, &user_id, &title, nature, project_unit.as_deref())
        })
    });
    RoomActionResponse::from_result(result, |id| ("Activity added.", Some(id.to_string())))
}

#[flutter_rust_bridge::frb(sync)]
#[allow(clippy::too_many_arguments)]
pub fn activity_log(
    code: String,
    activity_id: String,
    user_id: String,
    timestamp_epoch_ms: i64,
    duration_minutes: Option<u32>,
    quantity: Option<f64>,
    note: Option<String>,
    is_milestone: bool,
) -> RoomActionResponse {
    let details = OccurrenceDetails {
        timestamp: timestamp_epoch_ms,
        duration_minutes,
        quantity,
        note,
        is_milestone,
    };
    let result = parse_record_id(&activity_id).and_then(|id| {
        with_room_service("activity_log", |service| {
            service.log_activity(&code, id, &user_id, details)
        })
    });
    RoomActionResponse::from_result(result, |log_id| match log_id {
        Some(log_id) => ("Logged.", Some(log_id.to_string())),
        None => ("Nothing to log.", None),
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn activity_delete(code: String, activity_id: String) -> RoomActionResponse {
    let result = parse_record_id(&activity_id).and_then(|id| {
        with_room_service("activity_delete", |service| service.delete_activity(&code, id))
    });
    RoomActionResponse::from_result(result, |deleted| (removal_message(deleted), None))
}

/// Positive `amount_cents` is income, negative is expense.
#[flutter_rust_bridge::frb(sync)]
pub fn money_add(
    code: String,
    user_id: String,
    amount_cents: i64,
    note: String,
    timestamp_epoch_ms: Option<i64>,
) -> RoomActionResponse {
    let result = with_room_service("money_add", |service| {
        service.add_money_entry(&code, &user_id, amount_cents, &note, timestamp_epoch_ms)
    });
    RoomActionResponse::from_result(result, |id| ("Entry added.", Some(id.to_string())))
}

/// Edits only the provided fields.
#[flutter_rust_bridge::frb(sync)]
pub fn money_edit(
    code: String,
    entry_id: String,
    amount_cents: Option<i64>,
    note: Option<String>,
    timestamp_epoch_ms: Option<i64>,
) -> RoomActionResponse {
    let patch = MoneyEntryPatch {
        amount_cents,
        note,
        timestamp: timestamp_epoch_ms,
    };
    let result = parse_record_id(&entry_id).and_then(|id| {
        with_room_service("money_edit", |service| service.edit_money_entry(&code, id, patch))
    });
    RoomActionResponse::from_result(result, |edited| {
        (if edited { "Entry updated." } else { "Nothing to update." }, None)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn money_delete(code: String, entry_id: String) -> RoomActionResponse {
    let result = parse_record_id(&entry_id).and_then(|id| {
        with_room_service("money_delete", |service| service.delete_money_entry(&code, id))
    });
    RoomActionResponse::from_result(result, |deleted| (removal_message(deleted), None))
}

#[flutter_rust_bridge::frb(sync)]
pub fn goal_add(code: String, title: String, target_count: u32, reward: String) -> RoomActionResponse {
    let result = with_room_service("goal_add", |service| {
        service.add_goal(&code, &title, target_count, &reward)
    });
    RoomActionResponse::from_result(result, |id| ("Goal added.", Some(id.to_string())))
}

#[flutter_rust_bridge::frb(sync)]
pub fn goal_increment(code: String, goal_id: String) -> RoomActionResponse {
    let result = parse_record_id(&goal_id).and_then(|id| {
        with_room_service("goal_increment", |service| service.increment_goal(&code, id))
    });
    RoomActionResponse::from_result(result, |completed| {
        let message = match completed {
            Some(true) => "Goal completed!",
            Some(false) => "Progress counted.",
            None => "Nothing to count.",
        };
        (message, None)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn goal_delete(code: String, goal_id: String) -> RoomActionResponse {
    let result = parse_record_id(&goal_id).and_then(|id| {
        with_room_service("goal_delete", |service| service.delete_goal(&code, id))
    });
    RoomActionResponse::from_result(result, |deleted| (removal_message(deleted), None))
}

/// Claims a completed goal; `id` carries the created reward todo.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_claim_reward(code: String, goal_id: String) -> RoomActionResponse {
    let result = parse_record_id(&goal_id).and_then(|id| {
        with_room_service("goal_claim_reward", |service| service.claim_reward(&code, id))
    });
    RoomActionResponse::from_result(result, |todo_id| ("Reward claimed.", Some(todo_id.to_string())))
}

fn resolve_room_db_path() -> PathBuf {
    ROOM_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("LOVESYNC_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(ROOM_DB_FILE_NAME)
        })
        .clone()
}

fn room_feed() -> Arc<RoomFeed> {
    ROOM_FEED.get_or_init(|| Arc::new(RoomFeed::new())).clone()
}

fn with_room_service<T>(
    op: &'static str,
    f: impl FnOnce(&FfiRoomService<'_>) -> ServiceResult<T>,
) -> Result<T, String> {
    let db_path = resolve_room_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("{op} failed: room DB open failed: {err}"))?;
    let repo = SqliteRoomRepository::try_new(&conn)
        .map_err(|err| format!("{op} failed: room repo init failed: {err}"))?;
    let service = RoomService::new(repo, room_feed());
    f(&service).map_err(|err| {
        warn!("event=ffi_call module=ffi status=error op={op}");
        format!("{op} failed: {err}")
    })
}

fn parse_record_id(raw: &str) -> Result<RecordId, String> {
    RecordId::parse_str(raw.trim()).map_err(|_| format!("invalid record id `{}`", raw.trim()))
}

/// Parses a snake_case wire name into a document enum.
fn parse_wire<T: DeserializeOwned>(field: &str, raw: &str) -> Result<T, String> {
    let normalized = raw.trim().to_ascii_lowercase();
    serde_json::from_value(serde_json::Value::String(normalized.clone()))
        .map_err(|_| format!("unsupported {field} `{normalized}`"))
}

fn removal_message(removed: bool) -> &'static str {
    if removed {
        "Deleted."
    } else {
        "Nothing to delete."
    }
}

fn pin_message(pinned: Option<bool>) -> &'static str {
    match pinned {
        Some(true) => "Pinned.",
        Some(false) => "Unpinned.",
        None => "Nothing to toggle.",
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, goal_add, goal_claim_reward, goal_increment, grocery_add, init_logging,
        parse_wire, ping, room_create, room_get, room_join, room_poll, sticky_add,
        sticky_toggle_pin, todo_add, todo_toggle_pin,
    };
    use lovesync_core::{Mood, Signal};
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn wire_names_parse_case_insensitively() {
        assert_eq!(parse_wire::<Mood>("mood", " Grumpy ").unwrap(), Mood::Grumpy);
        assert_eq!(parse_wire::<Signal>("signal", "miss_you").unwrap(), Signal::MissYou);
        let err = parse_wire::<Mood>("mood", "ecstatic").unwrap_err();
        assert!(err.contains("unsupported mood"));
    }

    #[test]
    fn create_join_and_poll_round() {
        let host = unique_token("host");
        let guest = unique_token("guest");
        let created = room_create(host.clone(), "Ana".to_string());
        assert!(created.ok, "{}", created.message);
        let code = created.id.clone().unwrap();

        let first = room_get(code.clone());
        assert!(first.ok && first.found, "{}", first.message);
        let document: serde_json::Value =
            serde_json::from_str(first.document_json.as_deref().unwrap()).unwrap();
        assert_eq!(document["hostId"], host.as_str());

        let unchanged = room_poll(code.clone(), first.revision);
        assert!(!unchanged.changed);
        assert!(unchanged.document_json.is_none());

        let joined = room_join(code.to_lowercase(), guest, "Ben".to_string());
        assert!(joined.ok, "{}", joined.message);
        assert_eq!(joined.id.as_deref(), Some(code.as_str()));

        let changed = room_poll(code, first.revision);
        assert!(changed.changed);
        assert_eq!(changed.revision, first.revision + 1);
    }

    #[test]
    fn sticky_and_todo_calls_validate_inputs() {
        let host = unique_token("host");
        let code = room_create(host.clone(), "Ana".to_string()).id.unwrap();

        let bad_kind = sticky_add(code.clone(), host.clone(), "poem".into(), "x".into(), None);
        assert!(!bad_kind.ok);
        let bad_id = sticky_toggle_pin(code.clone(), host.clone(), "not-a-uuid".into());
        assert!(!bad_id.ok);
        assert!(bad_id.message.contains("invalid record id"));

        let posted = sticky_add(code.clone(), host.clone(), "signal".into(), "love".into(), None);
        assert!(posted.ok, "{}", posted.message);
        let pinned = sticky_toggle_pin(code.clone(), host.clone(), posted.id.unwrap());
        assert_eq!(pinned.message, "Pinned.");

        let todo = todo_add(code.clone(), "Trip".into(), "list".into(), Some(1));
        assert!(todo.ok, "{}", todo.message);
        let pin = todo_toggle_pin(code.clone(), host, todo.id.unwrap());
        assert_eq!(pin.message, "Pinned.");

        assert!(grocery_add(code, " ".into()).message.contains("failed"));
    }

    #[test]
    fn goal_reward_flow_reports_claim_errors() {
        let host = unique_token("host");
        let code = room_create(host, "Ana".to_string()).id.unwrap();
        let goal = goal_add(code.clone(), "Run".into(), 1, "Cake".into()).id.unwrap();

        let early = goal_claim_reward(code.clone(), goal.clone());
        assert!(!early.ok);
        assert_eq!(goal_increment(code.clone(), goal.clone()).message, "Goal completed!");
        let claimed = goal_claim_reward(code, goal);
        assert!(claimed.ok, "{}", claimed.message);
        assert!(claimed.id.is_some());
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
