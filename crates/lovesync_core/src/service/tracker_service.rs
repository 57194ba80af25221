//! Activity tracker and money ledger use-cases.
//!
//! # Invariants
//! - Activity logs are append-only; only whole activities are deleted.
//! - Money amounts are integer cents; sign decides income vs expense.

use crate::model::activity::{Activity, ActivityNature, OccurrenceDetails};
use crate::model::money::{MoneyEntry, MoneyEntryPatch};
use crate::model::room::RoomCode;
use crate::model::RecordId;
use crate::repo::room_repo::RoomRepository;
use crate::service::room_service::{
    require_member, require_text, require_user_id, RoomService, ServiceResult,
};

impl<R: RoomRepository> RoomService<R> {
    /// Adds an activity owned by `user_id`.
    pub fn add_activity(
        &self,
        raw_code: &str,
        user_id: &str,
        title: &str,
        nature: ActivityNature,
        project_unit: Option<&str>,
    ) -> ServiceResult<RecordId> {
        let code = RoomCode::parse(raw_code)?;
        let user_id = require_user_id(user_id)?;
        let title = require_text(title, "activity title")?;
        let project_unit = project_unit
            .map(str::trim)
            .filter(|unit| !unit.is_empty());
        self.mutate(&code, "activity_add", |room, now| {
            require_member(&code, room, user_id)?;
            let mut activity = Activity::new(user_id, title, nature, now);
            activity.project_unit = project_unit.map(str::to_string);
            let id = activity.id;
            room.activities.push(activity);
            Ok(id)
        })
    }

    /// Appends one occurrence to an activity.
    ///
    /// Returns the log ID, or `None` for an unknown activity.
    pub fn log_activity(
        &self,
        raw_code: &str,
        activity_id: RecordId,
        user_id: &str,
        details: OccurrenceDetails,
    ) -> ServiceResult<Option<RecordId>> {
        let code = RoomCode::parse(raw_code)?;
        let user_id = require_user_id(user_id)?;
        self.mutate(&code, "activity_log", |room, _now| {
            require_member(&code, room, user_id)?;
            let Some(activity) = room
                .activities
                .iter_mut()
                .find(|activity| activity.id == activity_id)
            else {
                return Ok(None);
            };
            let log = details.clone().into_log(user_id);
            let id = log.id;
            activity.logs.push(log);
            Ok(Some(id))
        })
    }

    /// Removes an activity together with its log.
    pub fn delete_activity(&self, raw_code: &str, activity_id: RecordId) -> ServiceResult<bool> {
        let code = RoomCode::parse(raw_code)?;
        self.mutate(&code, "activity_delete", |room, _now| {
            let before = room.activities.len();
            room.activities.retain(|activity| activity.id != activity_id);
            Ok(room.activities.len() != before)
        })
    }

    /// Records income (positive) or expense (negative) for `user_id`.
    ///
    /// `timestamp` defaults to now.
    pub fn add_money_entry(
        &self,
        raw_code: &str,
        user_id: &str,
        amount_cents: i64,
        note: &str,
        timestamp: Option<i64>,
    ) -> ServiceResult<RecordId> {
        let code = RoomCode::parse(raw_code)?;
        let user_id = require_user_id(user_id)?;
        let note = require_text(note, "money note")?;
        self.mutate(&code, "money_add", |room, now| {
            require_member(&code, room, user_id)?;
            let entry = MoneyEntry::new(user_id, amount_cents, note, timestamp.unwrap_or(now));
            let id = entry.id;
            room.money.push(entry);
            Ok(id)
        })
    }

    /// Applies a partial edit; returns `false` for an unknown entry.
    pub fn edit_money_entry(
        &self,
        raw_code: &str,
        entry_id: RecordId,
        patch: MoneyEntryPatch,
    ) -> ServiceResult<bool> {
        let code = RoomCode::parse(raw_code)?;
        let note = match patch.note.as_deref() {
            Some(note) => Some(require_text(note, "money note")?.to_string()),
            None => None,
        };
        let patch = MoneyEntryPatch { note, ..patch };
        self.mutate(&code, "money_edit", |room, _now| {
            let Some(entry) = room.money.iter_mut().find(|entry| entry.id == entry_id) else {
                return Ok(false);
            };
            entry.apply(&patch);
            Ok(true)
        })
    }

    pub fn delete_money_entry(&self, raw_code: &str, entry_id: RecordId) -> ServiceResult<bool> {
        let code = RoomCode::parse(raw_code)?;
        self.mutate(&code, "money_delete", |room, _now| {
            let before = room.money.len();
            room.money.retain(|entry| entry.id != entry_id);
            Ok(room.money.len() != before)
        })
    }
}
