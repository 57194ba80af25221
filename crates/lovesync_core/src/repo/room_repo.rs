//! Room document repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist whole room documents as JSON with a monotonically increasing
//!   revision.
//! - Provide compare-and-swap replacement so read-modify-write cycles can
//!   detect interleaved writers.
//!
//! # Invariants
//! - Write paths must call `RoomData::validate()` before SQL mutations.
//! - Read paths reject undecodable or invalid documents instead of masking them.
//! - `revision` starts at 1 and grows by exactly 1 per successful replace.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::room::{RoomCode, RoomData, RoomValidationError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ROOM_SELECT_SQL: &str = "SELECT
    code,
    document,
    revision,
    updated_at
FROM rooms";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for room persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RoomValidationError),
    Db(DbError),
    NotFound(RoomCode),
    AlreadyExists(RoomCode),
    /// Stored revision moved since the caller read the document.
    RevisionConflict {
        code: RoomCode,
        expected: i64,
    },
    Encode(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(code) => write!(f, "room not found: {code}"),
            Self::AlreadyExists(code) => write!(f, "room already exists: {code}"),
            Self::RevisionConflict { code, expected } => write!(
                f,
                "room {code} changed concurrently (expected revision {expected})"
            ),
            Self::Encode(err) => write!(f, "failed to encode room document: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted room data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::NotFound(_)
            | Self::AlreadyExists(_)
            | Self::RevisionConflict { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<RoomValidationError> for RepoError {
    fn from(value: RoomValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One persisted room document at a specific revision.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSnapshot {
    pub code: RoomCode,
    pub revision: i64,
    /// Epoch ms of the last successful write.
    pub updated_at: i64,
    pub room: RoomData,
}

/// Repository interface for whole-document room storage.
pub trait RoomRepository {
    /// Stores a brand-new room at revision 1.
    fn insert_room(&self, code: &RoomCode, room: &RoomData) -> RepoResult<RoomSnapshot>;
    fn get_room(&self, code: &RoomCode) -> RepoResult<Option<RoomSnapshot>>;
    /// Replaces the document only if the stored revision equals `expected_revision`.
    fn replace_room(
        &self,
        code: &RoomCode,
        room: &RoomData,
        expected_revision: i64,
    ) -> RepoResult<RoomSnapshot>;
    /// Returns `false` when no room had this code.
    fn delete_room(&self, code: &RoomCode) -> RepoResult<bool>;
    /// Finds the most recently written room where `user_id` is host or guest.
    fn find_room_for_member(&self, user_id: &str) -> RepoResult<Option<RoomCode>>;
}

/// SQLite-backed room repository.
pub struct SqliteRoomRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRoomRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Creates a repository after checking the connection is fully migrated.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let latest = latest_version();
        if version != latest {
            return Err(RepoError::Db(DbError::UnsupportedSchemaVersion {
                db_version: version,
                latest_supported: latest,
            }));
        }
        Ok(Self::new(conn))
    }
}

impl RoomRepository for SqliteRoomRepository<'_> {
    fn insert_room(&self, code: &RoomCode, room: &RoomData) -> RepoResult<RoomSnapshot> {
        room.validate()?;
        let document = serde_json::to_string(room).map_err(RepoError::Encode)?;

        let inserted = self.conn.execute(
            "INSERT INTO rooms (code, document, revision, host_id, guest_id)
             VALUES (?1, ?2, 1, ?3, ?4)
             ON CONFLICT(code) DO NOTHING;",
            params![
                code.as_str(),
                document,
                room.host_id.as_str(),
                room.guest_id.as_deref(),
            ],
        )?;
        if inserted == 0 {
            return Err(RepoError::AlreadyExists(code.clone()));
        }

        self.get_room(code)?
            .ok_or_else(|| RepoError::InvalidData(format!("room {code} missing after insert")))
    }

    fn get_room(&self, code: &RoomCode) -> RepoResult<Option<RoomSnapshot>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{ROOM_SELECT_SQL} WHERE code = ?1;"))?;
        let mut rows = stmt.query([code.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_room_row(row)?));
        }
        Ok(None)
    }

    fn replace_room(
        &self,
        code: &RoomCode,
        room: &RoomData,
        expected_revision: i64,
    ) -> RepoResult<RoomSnapshot> {
        room.validate()?;
        let document = serde_json::to_string(room).map_err(RepoError::Encode)?;

        let changed = self.conn.execute(
            "UPDATE rooms
             SET
                document = ?1,
                host_id = ?2,
                guest_id = ?3,
                revision = revision + 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE code = ?4 AND revision = ?5;",
            params![
                document,
                room.host_id.as_str(),
                room.guest_id.as_deref(),
                code.as_str(),
                expected_revision,
            ],
        )?;

        if changed == 0 {
            let exists = self
                .conn
                .query_row("SELECT 1 FROM rooms WHERE code = ?1;", [code.as_str()], |_| {
                    Ok(())
                })
                .optional()?
                .is_some();
            if exists {
                return Err(RepoError::RevisionConflict {
                    code: code.clone(),
                    expected: expected_revision,
                });
            }
            return Err(RepoError::NotFound(code.clone()));
        }

        self.get_room(code)?
            .ok_or_else(|| RepoError::NotFound(code.clone()))
    }

    fn delete_room(&self, code: &RoomCode) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM rooms WHERE code = ?1;", [code.as_str()])?;
        Ok(changed > 0)
    }

    fn find_room_for_member(&self, user_id: &str) -> RepoResult<Option<RoomCode>> {
        let code: Option<String> = self
            .conn
            .query_row(
                "SELECT code FROM rooms
                 WHERE host_id = ?1 OR guest_id = ?1
                 ORDER BY updated_at DESC, code ASC
                 LIMIT 1;",
                [user_id],
                |row| row.get(0),
            )
            .optional()?;

        code.map(|value| {
            RoomCode::parse(&value).map_err(|_| {
                RepoError::InvalidData(format!("invalid room code `{value}` in rooms.code"))
            })
        })
        .transpose()
    }
}

fn parse_room_row(row: &Row<'_>) -> RepoResult<RoomSnapshot> {
    let code_text: String = row.get("code")?;
    let code = RoomCode::parse(&code_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid room code `{code_text}` in rooms.code"))
    })?;

    let document: String = row.get("document")?;
    let mut room: RoomData = serde_json::from_str(&document).map_err(|err| {
        RepoError::InvalidData(format!("undecodable document for room {code}: {err}"))
    })?;
    room.normalize_legacy();
    room.validate()?;

    Ok(RoomSnapshot {
        code,
        revision: row.get("revision")?,
        updated_at: row.get("updated_at")?,
        room,
    })
}
