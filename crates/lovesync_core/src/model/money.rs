//! Expense ledger entries.
//!
//! Amounts are integer cents: positive is income, negative is an expense.

use super::{RecordId, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyEntry {
    pub id: RecordId,
    pub user_id: UserId,
    pub amount_cents: i64,
    pub note: String,
    /// Booking date in epoch ms (user-chosen, may lie in the past).
    pub timestamp: i64,
}

impl MoneyEntry {
    pub fn new(
        user_id: impl Into<UserId>,
        amount_cents: i64,
        note: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            amount_cents,
            note: note.into(),
            timestamp,
        }
    }

    pub fn is_income(&self) -> bool {
        self.amount_cents >= 0
    }

    pub fn apply(&mut self, patch: &MoneyEntryPatch) {
        if let Some(amount_cents) = patch.amount_cents {
            self.amount_cents = amount_cents;
        }
        if let Some(note) = &patch.note {
            self.note = note.clone();
        }
        if let Some(timestamp) = patch.timestamp {
            self.timestamp = timestamp;
        }
    }
}

/// Partial update for an existing entry; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoneyEntryPatch {
    pub amount_cents: Option<i64>,
    pub note: Option<String>,
    pub timestamp: Option<i64>,
}
