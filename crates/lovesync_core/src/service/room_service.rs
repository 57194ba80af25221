//! Room lifecycle service and the shared mutation protocol.
//!
//! # Responsibility
//! - Create, join, reset, delete and subscribe to rooms.
//! - Run every document mutation as read -> apply -> compare-and-swap write
//!   -> publish, retrying on concurrent writes.
//!
//! # Invariants
//! - A mutation that leaves the document unchanged performs no write and
//!   publishes nothing.
//! - Every committed write is published to the room feed exactly once.
//! - Only room members may perform user-scoped mutations.

use crate::model::mood::{InteractionKind, Mood};
use crate::model::policy::RoomPolicy;
use crate::model::room::{Interaction, RoomCode, RoomData, RoomRole, RoomValidationError};
use crate::model::sticky::StickyContent;
use crate::model::RecordId;
use crate::repo::room_repo::{RepoError, RoomRepository, RoomSnapshot};
use crate::service::board_service::push_sticky;
use crate::service::clock::{Clock, SystemClock};
use crate::sync::room_feed::{RoomEvent, RoomFeed, RoomSubscription};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

pub type ServiceResult<T> = Result<T, RoomServiceError>;

/// Errors surfaced by room use-cases.
#[derive(Debug)]
pub enum RoomServiceError {
    /// Caller input or resulting document violates an invariant.
    Validation(RoomValidationError),
    RoomNotFound(RoomCode),
    /// Guest slot is taken by another user.
    RoomFull(RoomCode),
    /// User is neither host nor guest of the room.
    NotMember { code: RoomCode, user_id: String },
    /// Goal reward cannot be claimed (unfinished or already claimed).
    GoalNotClaimable(RecordId),
    /// No unused room code found within the retry budget.
    CodeSpaceExhausted { attempts: u32 },
    /// Concurrent writers kept winning for the whole retry budget.
    Contended { code: RoomCode, attempts: u32 },
    Repo(RepoError),
}

impl Display for RoomServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::RoomNotFound(code) => write!(f, "room not found: {code}"),
            Self::RoomFull(code) => write!(f, "room is full: {code}"),
            Self::NotMember { code, user_id } => {
                write!(f, "user `{user_id}` is not a member of room {code}")
            }
            Self::GoalNotClaimable(id) => write!(f, "goal reward is not claimable: {id}"),
            Self::CodeSpaceExhausted { attempts } => {
                write!(f, "no free room code after {attempts} attempts")
            }
            Self::Contended { code, attempts } => write!(
                f,
                "room {code} kept changing; gave up after {attempts} attempts"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RoomServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RoomValidationError> for RoomServiceError {
    fn from(value: RoomValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for RoomServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(code) => Self::RoomNotFound(code),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Result of a successful join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The caller hosts this room; nothing changed.
    Host,
    /// The caller now holds (or already held) the guest slot.
    Guest { rejoined: bool },
}

/// Use-case facade over one room repository.
pub struct RoomService<R: RoomRepository> {
    repo: R,
    feed: Arc<RoomFeed>,
    clock: Arc<dyn Clock>,
    policy: RoomPolicy,
}

impl<R: RoomRepository> RoomService<R> {
    /// Creates a service with the system clock and default policy.
    pub fn new(repo: R, feed: Arc<RoomFeed>) -> Self {
        Self {
            repo,
            feed,
            clock: Arc::new(SystemClock),
            policy: RoomPolicy::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_policy(mut self, policy: RoomPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RoomPolicy {
        &self.policy
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Creates a room hosted by `user_id` and returns its fresh code.
    ///
    /// # Errors
    /// - `Validation` when the user id or display name is blank.
    /// - `CodeSpaceExhausted` when every drawn code was taken.
    pub fn create_room(&self, user_id: &str, user_name: &str) -> ServiceResult<RoomCode> {
        let user_id = require_user_id(user_id)?;
        let user_name = require_text(user_name, "display name")?;
        let room = RoomData::new(user_id, user_name, self.now_ms());

        let mut rng = rand::thread_rng();
        for attempt in 1..=self.policy.max_code_attempts {
            let code = RoomCode::generate(&mut rng, self.policy.room_code_len);
            match self.repo.insert_room(&code, &room) {
                Ok(snapshot) => {
                    info!(
                        "event=room_create module=service status=ok room={} attempt={}",
                        code, attempt
                    );
                    self.feed.publish(RoomEvent::Updated(Arc::new(snapshot)));
                    return Ok(code);
                }
                Err(RepoError::AlreadyExists(_)) => continue,
                Err(err) => return Err(err.into()),
            }
        }

        warn!(
            "event=room_create module=service status=error error_code=code_space_exhausted attempts={}",
            self.policy.max_code_attempts
        );
        Err(RoomServiceError::CodeSpaceExhausted {
            attempts: self.policy.max_code_attempts,
        })
    }

    /// Joins a room by user-typed code.
    ///
    /// # Contract
    /// - Code input is trimmed and uppercased before lookup.
    /// - The host re-joining is a no-op.
    /// - A new or returning guest gets the slot and a refreshed name.
    pub fn join_room(
        &self,
        raw_code: &str,
        user_id: &str,
        user_name: &str,
    ) -> ServiceResult<JoinOutcome> {
        let code = RoomCode::parse(raw_code)?;
        let user_id = require_user_id(user_id)?;
        let user_name = require_text(user_name, "display name")?;

        let outcome = self.mutate(&code, "room_join", |room, now| {
            if room.host_id == user_id {
                return Ok(JoinOutcome::Host);
            }
            let rejoined = match room.guest_id.as_deref() {
                Some(guest) if guest != user_id => {
                    return Err(RoomServiceError::RoomFull(code.clone()));
                }
                Some(_) => true,
                None => false,
            };
            room.guest_id = Some(user_id.to_string());
            room.guest_state.name = user_name.to_string();
            room.guest_state.last_updated = now;
            Ok(JoinOutcome::Guest { rejoined })
        })?;
        Ok(outcome)
    }

    /// Returns the current document, if the room exists.
    pub fn get_room(&self, raw_code: &str) -> ServiceResult<Option<RoomSnapshot>> {
        let code = RoomCode::parse(raw_code)?;
        Ok(self.repo.get_room(&code)?)
    }

    /// Finds the room a returning user belongs to.
    pub fn room_for_user(&self, user_id: &str) -> ServiceResult<Option<RoomCode>> {
        let user_id = require_user_id(user_id)?;
        Ok(self.repo.find_room_for_member(user_id)?)
    }

    /// Subscribes to live changes; the current document (if any) comes first.
    pub fn subscribe(&self, raw_code: &str) -> ServiceResult<RoomSubscription> {
        let code = RoomCode::parse(raw_code)?;
        let mut subscription = self.feed.subscribe(&code);
        if let Some(current) = self.repo.get_room(&code)? {
            subscription.prime(current);
        }
        Ok(subscription)
    }

    /// Deletes the room for both users.
    ///
    /// Returns `false` when the room did not exist.
    pub fn delete_room(&self, raw_code: &str) -> ServiceResult<bool> {
        let code = RoomCode::parse(raw_code)?;
        let deleted = self.repo.delete_room(&code)?;
        if deleted {
            self.feed.publish(RoomEvent::Deleted(code.clone()));
        }
        info!(
            "event=room_delete module=service status=ok room={} existed={}",
            code, deleted
        );
        Ok(deleted)
    }

    /// Hard-resets the room content while keeping the pairing.
    pub fn clear_room(&self, raw_code: &str) -> ServiceResult<()> {
        let code = RoomCode::parse(raw_code)?;
        self.mutate(&code, "room_clear", |room, now| {
            *room = room.cleared(now);
            Ok(())
        })
    }

    /// Records the latest animated reaction sent by `user_id`.
    pub fn send_interaction(
        &self,
        raw_code: &str,
        user_id: &str,
        kind: InteractionKind,
    ) -> ServiceResult<()> {
        let code = RoomCode::parse(raw_code)?;
        let user_id = require_user_id(user_id)?;
        self.mutate(&code, "interaction_send", |room, now| {
            require_member(&code, room, user_id)?;
            room.last_interaction = Some(Interaction {
                kind,
                sender_id: user_id.to_string(),
                timestamp: now,
            });
            Ok(())
        })
    }

    /// Updates the caller's profile mood/note and posts a matching mood sticky.
    pub fn update_profile(
        &self,
        raw_code: &str,
        user_id: &str,
        mood: Mood,
        note: &str,
    ) -> ServiceResult<()> {
        let code = RoomCode::parse(raw_code)?;
        let user_id = require_user_id(user_id)?;
        let note = note.trim().to_string();
        let policy = &self.policy;
        self.mutate(&code, "profile_update", |room, now| {
            let role = require_member(&code, room, user_id)?;
            let profile = room.profile_mut(role);
            profile.mood = mood;
            profile.note = note.clone();
            profile.last_updated = now;

            let caption = (!note.is_empty()).then(|| note.clone());
            push_sticky(
                room,
                user_id,
                StickyContent::Mood { mood, caption },
                now,
                policy,
            );
            Ok(())
        })
    }

    /// Runs one read-modify-write cycle against the room document.
    ///
    /// `apply` may run several times when another writer commits first, so it
    /// must be a pure function of the document it receives.
    pub(crate) fn mutate<T>(
        &self,
        code: &RoomCode,
        operation: &'static str,
        mut apply: impl FnMut(&mut RoomData, i64) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let started_at = Instant::now();
        let attempts = self.policy.max_mutation_attempts.max(1);

        for attempt in 1..=attempts {
            let current = self
                .repo
                .get_room(code)?
                .ok_or_else(|| RoomServiceError::RoomNotFound(code.clone()))?;

            let mut next = current.room.clone();
            let output = apply(&mut next, self.now_ms())?;
            if next == current.room {
                return Ok(output);
            }

            match self.repo.replace_room(code, &next, current.revision) {
                Ok(snapshot) => {
                    info!(
                        "event=room_mutate module=service status=ok op={} room={} revision={} attempt={} duration_ms={}",
                        operation,
                        code,
                        snapshot.revision,
                        attempt,
                        started_at.elapsed().as_millis()
                    );
                    self.feed.publish(RoomEvent::Updated(Arc::new(snapshot)));
                    return Ok(output);
                }
                Err(RepoError::RevisionConflict { .. }) => {
                    warn!(
                        "event=room_mutate module=service status=retry op={} room={} attempt={}",
                        operation, code, attempt
                    );
                }
                Err(err) => {
                    warn!(
                        "event=room_mutate module=service status=error op={} room={} error={}",
                        operation, code, err
                    );
                    return Err(err.into());
                }
            }
        }

        Err(RoomServiceError::Contended {
            code: code.clone(),
            attempts,
        })
    }
}

pub(crate) fn require_user_id(user_id: &str) -> ServiceResult<&str> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(RoomValidationError::EmptyUserId.into());
    }
    Ok(trimmed)
}

pub(crate) fn require_text<'a>(value: &'a str, field: &'static str) -> ServiceResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RoomValidationError::EmptyField(field).into());
    }
    Ok(trimmed)
}

pub(crate) fn require_member(
    code: &RoomCode,
    room: &RoomData,
    user_id: &str,
) -> ServiceResult<RoomRole> {
    room.role_of(user_id)
        .ok_or_else(|| RoomServiceError::NotMember {
            code: code.clone(),
            user_id: user_id.to_string(),
        })
}
