//! Together-items (shared todos).
//!
//! # Invariants
//! - `completed_at` presence is the source of truth for the completed folder.
//! - Only `TogetherCategory::List` items carry a deadline.
//! - Completed items are never pinned.

use super::RecordId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TogetherCategory {
    /// Planned items, optionally deadlined. Older clients wrote no category.
    #[default]
    List,
    /// Pool for "pick something for us" draws.
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: RecordId,
    pub text: String,
    #[serde(default)]
    pub category: TogetherCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    pub created_at: i64,
    #[serde(default)]
    pub is_pinned: bool,
    /// Legacy `me|you|we` tag from older clients; kept as-is.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub legacy_type: Option<String>,
    /// Legacy completion flag; folded into `completed_at` on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl TodoItem {
    pub fn new(
        text: impl Into<String>,
        category: TogetherCategory,
        deadline: Option<i64>,
        created_at: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            category,
            deadline: match category {
                TogetherCategory::List => deadline,
                TogetherCategory::Random => None,
            },
            completed_at: None,
            created_at,
            is_pinned: false,
            legacy_type: None,
            is_completed: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Moves the item to the completed folder and drops its pin.
    pub fn complete(&mut self, now_ms: i64) {
        self.completed_at = Some(now_ms);
        self.is_pinned = false;
    }

    /// Folds the legacy `isCompleted` flag into `completed_at`.
    pub(crate) fn normalize_legacy(&mut self) {
        if let Some(done) = self.is_completed.take() {
            if done && self.completed_at.is_none() {
                self.completed_at = Some(self.created_at);
            }
        }
        if self.completed_at.is_some() {
            self.is_pinned = false;
        }
    }
}
