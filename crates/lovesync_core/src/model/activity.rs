//! Tracker activities and their occurrence logs.
//!
//! # Invariants
//! - `logs` is append-only; entries are never edited in place.
//! - Optional log fields are omitted rather than stored as zero/blank.

use super::{RecordId, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// "Something I keep doing" vs a one-off session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityNature {
    Ongoing,
    Session,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: RecordId,
    pub user_id: UserId,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    /// Pages, reps and similar counters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Marks a completed project unit (e.g. finished a book).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_milestone: Option<bool>,
}

impl ActivityLog {
    pub fn milestone(&self) -> bool {
        self.is_milestone.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: RecordId,
    pub owner_id: UserId,
    pub title: String,
    pub nature: ActivityNature,
    /// Unit name for milestones, e.g. "Book".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub logs: Vec<ActivityLog>,
    pub created_at: i64,
}

impl Activity {
    pub fn new(
        owner_id: impl Into<UserId>,
        title: impl Into<String>,
        nature: ActivityNature,
        created_at: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            title: title.into(),
            nature,
            project_unit: None,
            icon: None,
            logs: Vec::new(),
            created_at,
        }
    }
}

/// Caller input for one logged occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OccurrenceDetails {
    pub timestamp: i64,
    pub duration_minutes: Option<u32>,
    pub quantity: Option<f64>,
    pub note: Option<String>,
    pub is_milestone: bool,
}

impl OccurrenceDetails {
    /// Converts input into a log entry, dropping zero or blank extras.
    pub fn into_log(self, user_id: impl Into<UserId>) -> ActivityLog {
        ActivityLog {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            timestamp: self.timestamp,
            duration_minutes: self.duration_minutes.filter(|minutes| *minutes > 0),
            quantity: self.quantity.filter(|value| *value != 0.0 && value.is_finite()),
            note: self
                .note
                .map(|note| note.trim().to_string())
                .filter(|note| !note.is_empty()),
            is_milestone: self.is_milestone.then_some(true),
        }
    }
}
