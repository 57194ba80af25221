//! Home-board sticky notes.
//!
//! # Responsibility
//! - Define the sticky record and the typed content used to create one.
//!
//! # Invariants
//! - `kind` decides which of `mood`/`text`/`signal` is meaningful.
//! - `origin_id` is set only for mirror stickies created by pinning a todo.

use super::mood::{Mood, Signal};
use super::{RecordId, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sticky variant stored as `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StickyKind {
    Mood,
    Note,
    Signal,
}

/// One post on the shared board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sticky {
    pub id: RecordId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub kind: StickyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    /// Note body, or caption for a mood sticky.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<Signal>,
    /// Epoch ms; refreshed when the pin is toggled.
    pub timestamp: i64,
    /// Display tilt in degrees.
    #[serde(default)]
    pub rotation: i32,
    #[serde(default)]
    pub is_pinned: bool,
    /// Copied from the todo a mirror sticky was created from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_id: Option<RecordId>,
}

/// Caller-supplied content for a new sticky.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StickyContent {
    Mood { mood: Mood, caption: Option<String> },
    Note { text: String },
    Signal { signal: Signal },
}

impl StickyContent {
    pub fn kind(&self) -> StickyKind {
        match self {
            Self::Mood { .. } => StickyKind::Mood,
            Self::Note { .. } => StickyKind::Note,
            Self::Signal { .. } => StickyKind::Signal,
        }
    }
}

impl Sticky {
    /// Builds an unpinned sticky from typed content.
    pub fn new(
        user_id: impl Into<UserId>,
        content: StickyContent,
        timestamp: i64,
        rotation: i32,
    ) -> Self {
        let mut sticky = Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            kind: content.kind(),
            mood: None,
            text: None,
            signal: None,
            timestamp,
            rotation,
            is_pinned: false,
            deadline: None,
            origin_id: None,
        };
        match content {
            StickyContent::Mood { mood, caption } => {
                sticky.mood = Some(mood);
                sticky.text = caption.filter(|value| !value.trim().is_empty());
            }
            StickyContent::Note { text } => sticky.text = Some(text),
            StickyContent::Signal { signal } => sticky.signal = Some(signal),
        }
        sticky
    }

    /// Whether the sticky is still shown at `now_ms` for the given TTL.
    pub fn is_live(&self, now_ms: i64, ttl_ms: i64) -> bool {
        self.is_pinned || now_ms - self.timestamp < ttl_ms
    }

    pub fn is_mirror(&self) -> bool {
        self.origin_id.is_some()
    }
}
