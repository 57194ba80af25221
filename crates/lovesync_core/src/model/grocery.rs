//! Shared grocery list item.

use super::RecordId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItem {
    pub id: RecordId,
    pub text: String,
    #[serde(default)]
    pub is_checked: bool,
    /// Epoch ms of the last check; drives the expiry window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<i64>,
}

impl GroceryItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            is_checked: false,
            checked_at: None,
        }
    }

    /// Flips the check mark and stamps or clears `checked_at`.
    pub fn toggle(&mut self, now_ms: i64) {
        self.is_checked = !self.is_checked;
        self.checked_at = if self.is_checked { Some(now_ms) } else { None };
    }

    /// Unchecked items never expire; checked ones live for `ttl_ms`.
    ///
    /// A checked item without a timestamp (legacy data) is treated as expired.
    pub fn is_live(&self, now_ms: i64, ttl_ms: i64) -> bool {
        if !self.is_checked {
            return true;
        }
        self.checked_at
            .is_some_and(|checked_at| now_ms - checked_at < ttl_ms)
    }
}
