//! Count-based reward goals.

use super::RecordId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: RecordId,
    pub title: String,
    pub target_count: u32,
    #[serde(default)]
    pub current_count: u32,
    pub reward: String,
    #[serde(default)]
    pub is_completed: bool,
    pub created_at: i64,
    /// Set once the reward has been turned into a todo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_at: Option<i64>,
}

impl Goal {
    pub fn new(
        title: impl Into<String>,
        target_count: u32,
        reward: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            target_count,
            current_count: 0,
            reward: reward.into(),
            is_completed: false,
            created_at,
            claimed_at: None,
        }
    }

    /// Adds one step; completed goals stay frozen.
    ///
    /// Returns `true` when this step completed the goal.
    pub fn increment(&mut self) -> bool {
        if self.is_completed {
            return false;
        }
        self.current_count = self.current_count.saturating_add(1);
        self.is_completed = self.current_count >= self.target_count;
        self.is_completed
    }

    pub fn is_claimable(&self) -> bool {
        self.is_completed && self.claimed_at.is_none()
    }
}
