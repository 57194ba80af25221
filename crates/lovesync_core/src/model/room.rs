//! Room document: the single shared record of one paired couple.
//!
//! # Responsibility
//! - Define the persisted document shape and its profile sub-records.
//! - Validate document-wide invariants before persistence.
//! - Upgrade legacy fields written by older clients.
//!
//! # Invariants
//! - `host_id` is non-empty and differs from `guest_id`.
//! - At most one pinned sticky per user.
//! - Sticky content matches its `kind`.
//! - Every goal has `target_count >= 1`.

use super::activity::Activity;
use super::goal::Goal;
use super::grocery::GroceryItem;
use super::money::MoneyEntry;
use super::mood::{InteractionKind, Mood};
use super::sticky::{Sticky, StickyKind};
use super::todo::TodoItem;
use super::{RecordId, UserId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Characters used for room codes; ambiguous glyphs (`I`, `O`, `0`, `1`) are excluded.
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const MAX_ROOM_CODE_LEN: usize = 16;

pub const DEFAULT_JOIN_NOTE: &str = "Just joined!";
pub const GUEST_PLACEHOLDER_NAME: &str = "Waiting for partner...";
pub const PARTNER_FALLBACK_NAME: &str = "Partner";

/// Validation failures for room documents and caller input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomValidationError {
    InvalidRoomCode(String),
    EmptyUserId,
    /// A required free-text field is blank after trim.
    EmptyField(&'static str),
    GuestIsHost,
    StickyContentMismatch(RecordId),
    MultiplePinnedStickies(UserId),
    InvalidGoalTarget(RecordId),
}

impl Display for RoomValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRoomCode(value) => write!(f, "invalid room code `{value}`"),
            Self::EmptyUserId => write!(f, "user id must not be empty"),
            Self::EmptyField(field) => write!(f, "{field} must not be blank"),
            Self::GuestIsHost => write!(f, "guest id must differ from host id"),
            Self::StickyContentMismatch(id) => {
                write!(f, "sticky {id} content does not match its type")
            }
            Self::MultiplePinnedStickies(user) => {
                write!(f, "user `{user}` has more than one pinned sticky")
            }
            Self::InvalidGoalTarget(id) => write!(f, "goal {id} target_count must be >= 1"),
        }
    }
}

impl Error for RoomValidationError {}

/// Normalized room code (trimmed, uppercase, restricted alphabet).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Parses user input, tolerating surrounding whitespace and lowercase.
    pub fn parse(raw: &str) -> Result<Self, RoomValidationError> {
        let normalized = raw.trim().to_ascii_uppercase();
        let valid = !normalized.is_empty()
            && normalized.len() <= MAX_ROOM_CODE_LEN
            && normalized.bytes().all(|byte| ROOM_CODE_ALPHABET.contains(&byte));
        if !valid {
            return Err(RoomValidationError::InvalidRoomCode(raw.trim().to_string()));
        }
        Ok(Self(normalized))
    }

    /// Draws a fresh code of `len` characters.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Self {
        let code = (0..len.clamp(1, MAX_ROOM_CODE_LEN))
            .map(|_| char::from(ROOM_CODE_ALPHABET[rng.gen_range(0..ROOM_CODE_ALPHABET.len())]))
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RoomCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Profile sub-record for host or guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserState {
    pub name: String,
    pub mood: Mood,
    #[serde(default)]
    pub note: String,
    pub last_updated: i64,
}

impl UserState {
    pub fn new(name: impl Into<String>, note: impl Into<String>, now_ms: i64) -> Self {
        Self {
            name: name.into(),
            mood: Mood::Happy,
            note: note.into(),
            last_updated: now_ms,
        }
    }
}

/// Which profile slot a user occupies in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomRole {
    Host,
    Guest,
}

/// The shared document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomData {
    pub host_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_id: Option<UserId>,
    pub host_state: UserState,
    pub guest_state: UserState,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_interaction: Option<Interaction>,
    #[serde(default)]
    pub stickies: Vec<Sticky>,
    #[serde(default)]
    pub groceries: Vec<GroceryItem>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub todos: Vec<TodoItem>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub money: Vec<MoneyEntry>,
}

/// Ephemeral animated reaction; only the latest one is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub sender_id: UserId,
    pub timestamp: i64,
}

impl RoomData {
    /// Creates a fresh document hosted by `host_id`.
    pub fn new(host_id: impl Into<UserId>, host_name: impl Into<String>, now_ms: i64) -> Self {
        Self {
            host_id: host_id.into(),
            guest_id: None,
            host_state: UserState::new(host_name, DEFAULT_JOIN_NOTE, now_ms),
            guest_state: UserState::new(GUEST_PLACEHOLDER_NAME, DEFAULT_JOIN_NOTE, now_ms),
            created_at: now_ms,
            last_interaction: None,
            stickies: Vec::new(),
            groceries: Vec::new(),
            activities: Vec::new(),
            todos: Vec::new(),
            goals: Vec::new(),
            money: Vec::new(),
        }
    }

    /// Builds the hard-reset document: identities, names and `created_at`
    /// survive; moods, notes, interaction and every collection are dropped.
    pub fn cleared(&self, now_ms: i64) -> Self {
        let guest_name = if self.guest_state.name.trim().is_empty() {
            PARTNER_FALLBACK_NAME.to_string()
        } else {
            self.guest_state.name.clone()
        };
        Self {
            host_id: self.host_id.clone(),
            guest_id: self.guest_id.clone(),
            host_state: UserState::new(self.host_state.name.clone(), "", now_ms),
            guest_state: UserState::new(guest_name, "", now_ms),
            created_at: self.created_at,
            last_interaction: None,
            stickies: Vec::new(),
            groceries: Vec::new(),
            activities: Vec::new(),
            todos: Vec::new(),
            goals: Vec::new(),
            money: Vec::new(),
        }
    }

    pub fn role_of(&self, user_id: &str) -> Option<RoomRole> {
        if self.host_id == user_id {
            Some(RoomRole::Host)
        } else if self.guest_id.as_deref() == Some(user_id) {
            Some(RoomRole::Guest)
        } else {
            None
        }
    }

    pub fn profile(&self, role: RoomRole) -> &UserState {
        match role {
            RoomRole::Host => &self.host_state,
            RoomRole::Guest => &self.guest_state,
        }
    }

    pub fn profile_mut(&mut self, role: RoomRole) -> &mut UserState {
        match role {
            RoomRole::Host => &mut self.host_state,
            RoomRole::Guest => &mut self.guest_state,
        }
    }

    /// Upgrades fields written by older clients in place.
    pub fn normalize_legacy(&mut self) {
        for todo in &mut self.todos {
            todo.normalize_legacy();
        }
    }

    /// Validates document-wide invariants.
    ///
    /// # Errors
    /// - Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), RoomValidationError> {
        if self.host_id.trim().is_empty() {
            return Err(RoomValidationError::EmptyUserId);
        }
        if self.guest_id.as_deref() == Some(self.host_id.as_str()) {
            return Err(RoomValidationError::GuestIsHost);
        }

        let mut pinned_owners = HashSet::new();
        for sticky in &self.stickies {
            let content_ok = match sticky.kind {
                StickyKind::Mood => sticky.mood.is_some(),
                StickyKind::Note => sticky.text.is_some(),
                StickyKind::Signal => sticky.signal.is_some(),
            };
            if !content_ok {
                return Err(RoomValidationError::StickyContentMismatch(sticky.id));
            }
            if sticky.is_pinned && !pinned_owners.insert(sticky.user_id.as_str()) {
                return Err(RoomValidationError::MultiplePinnedStickies(
                    sticky.user_id.clone(),
                ));
            }
        }

        if let Some(goal) = self.goals.iter().find(|goal| goal.target_count == 0) {
            return Err(RoomValidationError::InvalidGoalTarget(goal.id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{RoomCode, RoomData, RoomRole, RoomValidationError, ROOM_CODE_ALPHABET};
    use crate::model::goal::Goal;
    use crate::model::mood::{Mood, Signal};
    use crate::model::sticky::{Sticky, StickyContent};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let code = RoomCode::parse("  ab3xyz ").expect("code should parse");
        assert_eq!(code.as_str(), "AB3XYZ");
    }

    #[test]
    fn parse_rejects_ambiguous_characters() {
        let err = RoomCode::parse("ABO1").expect_err("O and 1 are not in the alphabet");
        assert!(matches!(err, RoomValidationError::InvalidRoomCode(_)));
        assert!(RoomCode::parse("   ").is_err());
    }

    #[test]
    fn generated_codes_use_alphabet_and_length() {
        let mut rng = StdRng::seed_from_u64(7);
        let code = RoomCode::generate(&mut rng, 6);
        assert_eq!(code.as_str().len(), 6);
        assert!(code.as_str().bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b)));
        assert_eq!(RoomCode::parse(code.as_str()).unwrap(), code);
    }

    #[test]
    fn cleared_keeps_identities_and_drops_content() {
        let mut room = RoomData::new("host", "Ana", 1_000);
        room.guest_id = Some("guest".to_string());
        room.guest_state.name = "Ben".to_string();
        room.host_state.mood = Mood::Sad;
        room.stickies.push(Sticky::new(
            "host",
            StickyContent::Signal { signal: Signal::Love },
            1_000,
            0,
        ));
        room.goals.push(Goal::new("walks", 3, "dinner", 1_000));

        let cleared = room.cleared(5_000);
        assert_eq!(cleared.host_id, "host");
        assert_eq!(cleared.guest_id.as_deref(), Some("guest"));
        assert_eq!(cleared.guest_state.name, "Ben");
        assert_eq!(cleared.host_state.mood, Mood::Happy);
        assert_eq!(cleared.host_state.note, "");
        assert_eq!(cleared.created_at, 1_000);
        assert!(cleared.stickies.is_empty());
        assert!(cleared.goals.is_empty());
    }

    #[test]
    fn validate_rejects_two_pinned_stickies_for_one_user() {
        let mut room = RoomData::new("host", "Ana", 0);
        for text in ["a", "b"] {
            let mut sticky = Sticky::new(
                "host",
                StickyContent::Note {
                    text: text.to_string(),
                },
                0,
                0,
            );
            sticky.is_pinned = true;
            room.stickies.push(sticky);
        }
        let err = room.validate().expect_err("two pins must fail");
        assert_eq!(
            err,
            RoomValidationError::MultiplePinnedStickies("host".to_string())
        );
    }

    #[test]
    fn role_lookup_distinguishes_host_guest_and_stranger() {
        let mut room = RoomData::new("host", "Ana", 0);
        room.guest_id = Some("guest".to_string());
        assert_eq!(room.role_of("host"), Some(RoomRole::Host));
        assert_eq!(room.role_of("guest"), Some(RoomRole::Guest));
        assert_eq!(room.role_of("someone"), None);
    }

    #[test]
    fn document_uses_camel_case_wire_names() {
        let room = RoomData::new("host", "Ana", 42);
        let json = serde_json::to_value(&room).unwrap();
        assert_eq!(json["hostId"], "host");
        assert_eq!(json["hostState"]["lastUpdated"], 42);
        assert!(json.get("guestId").is_none());
    }
}
