//! Core domain logic for LoveSync.
//! This crate is the single source of truth for shared-room invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sync;
pub mod view;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::activity::{Activity, ActivityLog, ActivityNature, OccurrenceDetails};
pub use model::goal::Goal;
pub use model::grocery::GroceryItem;
pub use model::money::{MoneyEntry, MoneyEntryPatch};
pub use model::mood::{InteractionKind, Mood, MoodCategory, Signal};
pub use model::policy::RoomPolicy;
pub use model::room::{Interaction, RoomCode, RoomData, RoomRole, RoomValidationError, UserState};
pub use model::sticky::{Sticky, StickyContent, StickyKind};
pub use model::todo::{TodoItem, TogetherCategory};
pub use model::{RecordId, UserId};
pub use repo::room_repo::{RepoError, RepoResult, RoomRepository, RoomSnapshot, SqliteRoomRepository};
pub use service::clock::{Clock, FixedClock, SystemClock};
pub use service::room_service::{JoinOutcome, RoomService, RoomServiceError, ServiceResult};
pub use sync::interaction::InteractionObserver;
pub use sync::room_feed::{RoomEvent, RoomFeed, RoomSubscription};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
