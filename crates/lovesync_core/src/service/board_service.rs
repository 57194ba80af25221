//! Home board use-cases: stickies and the grocery basket.
//!
//! # Responsibility
//! - Apply per-type replacement rules when a sticky is posted.
//! - Maintain pin exclusivity and the todo/sticky pin mirror.
//! - Expire stale stickies and checked groceries on write.
//!
//! # Invariants
//! - After any board write, each user has at most one pinned sticky.
//! - A todo is pinned iff a pinned sticky with its `origin_id` exists.
//! - Expired unpinned stickies and expired checked groceries never survive
//!   a write to their collection.

use crate::model::grocery::GroceryItem;
use crate::model::policy::RoomPolicy;
use crate::model::room::{RoomCode, RoomData};
use crate::model::sticky::{Sticky, StickyContent, StickyKind};
use crate::model::RecordId;
use crate::repo::room_repo::RoomRepository;
use crate::service::room_service::{
    require_member, require_text, require_user_id, RoomService, ServiceResult,
};
use rand::Rng;

impl<R: RoomRepository> RoomService<R> {
    /// Posts a mood, note or signal sticky for `user_id`.
    ///
    /// # Contract
    /// - Mood: replaces the user's unpinned mood sticky.
    /// - Note: keeps at most `max_active_notes_per_user` unpinned notes by
    ///   dropping the oldest.
    /// - Signal: replaces the user's sticky with the same signal.
    /// - Returns the new sticky ID.
    pub fn add_sticky(
        &self,
        raw_code: &str,
        user_id: &str,
        content: StickyContent,
    ) -> ServiceResult<RecordId> {
        let code = RoomCode::parse(raw_code)?;
        let user_id = require_user_id(user_id)?;
        let content = match content {
            StickyContent::Note { text } => StickyContent::Note {
                text: require_text(&text, "note text")?.to_string(),
            },
            other => other,
        };
        let policy = self.policy();
        self.mutate(&code, "sticky_add", |room, now| {
            require_member(&code, room, user_id)?;
            Ok(push_sticky(room, user_id, content.clone(), now, policy))
        })
    }

    /// Removes one sticky; unknown IDs are ignored.
    ///
    /// Returns whether a sticky was removed.
    pub fn delete_sticky(&self, raw_code: &str, sticky_id: RecordId) -> ServiceResult<bool> {
        let code = RoomCode::parse(raw_code)?;
        self.mutate(&code, "sticky_delete", |room, _now| {
            let before = room.stickies.len();
            room.stickies.retain(|sticky| sticky.id != sticky_id);
            reconcile_todo_pins(room);
            Ok(room.stickies.len() != before)
        })
    }

    /// Toggles the pin of one sticky.
    ///
    /// Returns the new pin state, or `None` for an unknown sticky.
    pub fn toggle_sticky_pin(
        &self,
        raw_code: &str,
        user_id: &str,
        sticky_id: RecordId,
    ) -> ServiceResult<Option<bool>> {
        let code = RoomCode::parse(raw_code)?;
        let user_id = require_user_id(user_id)?;
        self.mutate(&code, "sticky_toggle_pin", |room, now| {
            require_member(&code, room, user_id)?;
            Ok(toggle_pin(room, user_id, sticky_id, now))
        })
    }

    /// Adds an unchecked grocery item and returns its ID.
    pub fn add_grocery_item(&self, raw_code: &str, text: &str) -> ServiceResult<RecordId> {
        let code = RoomCode::parse(raw_code)?;
        let text = require_text(text, "grocery text")?;
        let policy = self.policy();
        self.mutate(&code, "grocery_add", |room, now| {
            prune_groceries(room, now, policy);
            let item = GroceryItem::new(text);
            let id = item.id;
            room.groceries.push(item);
            Ok(id)
        })
    }

    /// Flips the check mark of one grocery item.
    ///
    /// Returns the new checked state, or `None` for an unknown item.
    pub fn toggle_grocery_item(
        &self,
        raw_code: &str,
        item_id: RecordId,
    ) -> ServiceResult<Option<bool>> {
        let code = RoomCode::parse(raw_code)?;
        let policy = self.policy();
        self.mutate(&code, "grocery_toggle", |room, now| {
            prune_groceries(room, now, policy);
            let state = room
                .groceries
                .iter_mut()
                .find(|item| item.id == item_id)
                .map(|item| {
                    item.toggle(now);
                    item.is_checked
                });
            Ok(state)
        })
    }
}

/// Drops unpinned stickies older than the policy TTL.
pub(crate) fn prune_stickies(room: &mut RoomData, now_ms: i64, policy: &RoomPolicy) {
    room.stickies
        .retain(|sticky| sticky.is_live(now_ms, policy.sticky_ttl_ms));
}

/// Drops checked grocery items older than the policy TTL.
pub(crate) fn prune_groceries(room: &mut RoomData, now_ms: i64, policy: &RoomPolicy) {
    room.groceries
        .retain(|item| item.is_live(now_ms, policy.grocery_ttl_ms));
}

/// Applies the expiry and per-type replacement rules, then appends a new sticky.
pub(crate) fn push_sticky(
    room: &mut RoomData,
    user_id: &str,
    content: StickyContent,
    now_ms: i64,
    policy: &RoomPolicy,
) -> RecordId {
    prune_stickies(room, now_ms, policy);

    match &content {
        StickyContent::Mood { .. } => room.stickies.retain(|sticky| {
            !(sticky.user_id == user_id && sticky.kind == StickyKind::Mood && !sticky.is_pinned)
        }),
        StickyContent::Note { .. } => {
            let mut notes: Vec<(i64, RecordId)> = room
                .stickies
                .iter()
                .filter(|sticky| {
                    sticky.user_id == user_id
                        && sticky.kind == StickyKind::Note
                        && !sticky.is_pinned
                })
                .map(|sticky| (sticky.timestamp, sticky.id))
                .collect();
            notes.sort();
            let keep = policy.max_active_notes_per_user.saturating_sub(1);
            let excess = notes.len().saturating_sub(keep);
            let dropped: Vec<RecordId> = notes.into_iter().take(excess).map(|(_, id)| id).collect();
            room.stickies.retain(|sticky| !dropped.contains(&sticky.id));
        }
        StickyContent::Signal { signal } => room.stickies.retain(|sticky| {
            !(sticky.user_id == user_id
                && sticky.kind == StickyKind::Signal
                && sticky.signal == Some(*signal))
        }),
    }

    let sticky = Sticky::new(user_id, content, now_ms, random_rotation(policy));
    let id = sticky.id;
    room.stickies.push(sticky);
    reconcile_todo_pins(room);
    id
}

/// Draws a display tilt from the policy range (inclusive).
pub(crate) fn random_rotation(policy: &RoomPolicy) -> i32 {
    let (min_deg, max_deg) = policy.sticky_rotation_deg;
    if min_deg < max_deg {
        rand::thread_rng().gen_range(min_deg..=max_deg)
    } else {
        min_deg
    }
}

/// Flips one sticky's pin and refreshes its timestamp.
///
/// Pinning unpins the other stickies of the caller and of the sticky's owner.
/// Pinning a mirror sticky also unpins every other mirror sticky.
pub(crate) fn toggle_pin(
    room: &mut RoomData,
    caller_id: &str,
    sticky_id: RecordId,
    now_ms: i64,
) -> Option<bool> {
    let target = room.stickies.iter().find(|sticky| sticky.id == sticky_id)?;
    let owner = target.user_id.clone();
    let mirror = target.is_mirror();
    let pinned = !target.is_pinned;

    for sticky in &mut room.stickies {
        if sticky.id == sticky_id {
            sticky.is_pinned = pinned;
            sticky.timestamp = now_ms;
        } else if pinned
            && sticky.is_pinned
            && (sticky.user_id == owner
                || sticky.user_id == caller_id
                || (mirror && sticky.is_mirror()))
        {
            sticky.is_pinned = false;
        }
    }
    reconcile_todo_pins(room);
    Some(pinned)
}

/// Recomputes todo pins from their mirror stickies.
pub(crate) fn reconcile_todo_pins(room: &mut RoomData) {
    let stickies = &room.stickies;
    for todo in &mut room.todos {
        todo.is_pinned = !todo.is_completed()
            && stickies
                .iter()
                .any(|sticky| sticky.is_pinned && sticky.origin_id == Some(todo.id));
    }
}

#[cfg(test)]
mod tests {
    use super::{prune_groceries, push_sticky, reconcile_todo_pins, toggle_pin};
    use crate::model::grocery::GroceryItem;
    use crate::model::mood::{Mood, Signal};
    use crate::model::policy::RoomPolicy;
    use crate::model::room::RoomData;
    use crate::model::sticky::{Sticky, StickyContent, StickyKind};
    use crate::model::todo::{TodoItem, TogetherCategory};

    const HOUR: i64 = 60 * 60 * 1000;

    fn note(text: &str) -> StickyContent {
        StickyContent::Note {
            text: text.to_string(),
        }
    }

    fn texts_of(room: &RoomData, user: &str) -> Vec<String> {
        room.stickies
            .iter()
            .filter(|sticky| sticky.user_id == user)
            .filter_map(|sticky| sticky.text.clone())
            .collect()
    }

    #[test]
    fn mood_replaces_previous_unpinned_mood_only_for_same_user() {
        let policy = RoomPolicy::default();
        let mut room = RoomData::new("a", "A", 0);
        let mood = |mood| StickyContent::Mood {
            mood,
            caption: None,
        };

        push_sticky(&mut room, "a", mood(Mood::Sad), 0, &policy);
        push_sticky(&mut room, "b", mood(Mood::Tired), 1, &policy);
        push_sticky(&mut room, "a", mood(Mood::Happy), 2, &policy);

        let a_moods: Vec<_> = room
            .stickies
            .iter()
            .filter(|s| s.user_id == "a" && s.kind == StickyKind::Mood)
            .collect();
        assert_eq!(a_moods.len(), 1);
        assert_eq!(a_moods[0].mood, Some(Mood::Happy));
        assert_eq!(room.stickies.len(), 2);
    }

    #[test]
    fn third_note_drops_oldest_unpinned_note() {
        let policy = RoomPolicy::default();
        let mut room = RoomData::new("a", "A", 0);

        push_sticky(&mut room, "a", note("one"), 10, &policy);
        push_sticky(&mut room, "a", note("two"), 20, &policy);
        push_sticky(&mut room, "a", note("three"), 30, &policy);

        assert_eq!(texts_of(&room, "a"), vec!["two", "three"]);
    }

    #[test]
    fn pinned_notes_do_not_count_toward_cap() {
        let policy = RoomPolicy::default();
        let mut room = RoomData::new("a", "A", 0);

        let pinned_id = push_sticky(&mut room, "a", note("keep"), 10, &policy);
        toggle_pin(&mut room, "a", pinned_id, 11);
        push_sticky(&mut room, "a", note("two"), 20, &policy);
        push_sticky(&mut room, "a", note("three"), 30, &policy);

        assert_eq!(texts_of(&room, "a"), vec!["keep", "two", "three"]);
    }

    #[test]
    fn signal_replaces_same_signal_but_keeps_others() {
        let policy = RoomPolicy::default();
        let mut room = RoomData::new("a", "A", 0);
        let signal = |signal| StickyContent::Signal { signal };

        push_sticky(&mut room, "a", signal(Signal::Love), 0, &policy);
        push_sticky(&mut room, "a", signal(Signal::Coffee), 1, &policy);
        push_sticky(&mut room, "a", signal(Signal::Love), 2, &policy);

        let signals: Vec<_> = room.stickies.iter().map(|s| (s.signal, s.timestamp)).collect();
        assert_eq!(
            signals,
            vec![(Some(Signal::Coffee), 1), (Some(Signal::Love), 2)]
        );
    }

    #[test]
    fn posting_prunes_expired_unpinned_stickies() {
        let policy = RoomPolicy::default();
        let mut room = RoomData::new("a", "A", 0);

        let pinned = push_sticky(&mut room, "a", note("pinned"), 0, &policy);
        toggle_pin(&mut room, "a", pinned, 0);
        push_sticky(&mut room, "b", note("old"), 0, &policy);
        push_sticky(&mut room, "b", note("fresh"), 4 * HOUR, &policy);

        assert_eq!(texts_of(&room, "a"), vec!["pinned"]);
        assert_eq!(texts_of(&room, "b"), vec!["fresh"]);
    }

    #[test]
    fn rotation_stays_within_policy_range() {
        let policy = RoomPolicy::default();
        let mut room = RoomData::new("a", "A", 0);
        for ts in 0..20 {
            push_sticky(
                &mut room,
                "a",
                StickyContent::Signal {
                    signal: Signal::Home,
                },
                ts,
                &policy,
            );
            let rotation = room.stickies.last().unwrap().rotation;
            assert!((-6..=5).contains(&rotation));
        }
    }

    #[test]
    fn pinning_unpins_owner_other_sticky_and_mirrored_todo() {
        let mut room = RoomData::new("a", "A", 0);
        let todo = TodoItem::new("trip", TogetherCategory::List, Some(99), 0);
        let todo_id = todo.id;
        room.todos.push(todo);

        let mut mirror = Sticky::new("a", note("trip"), 0, 0);
        mirror.origin_id = Some(todo_id);
        mirror.is_pinned = true;
        room.stickies.push(mirror);
        reconcile_todo_pins(&mut room);
        assert!(room.todos[0].is_pinned);

        let plain = Sticky::new("a", note("hi"), 0, 0);
        let plain_id = plain.id;
        room.stickies.push(plain);

        assert_eq!(toggle_pin(&mut room, "a", plain_id, 50), Some(true));
        assert!(!room.todos[0].is_pinned);
        let pinned: Vec<_> = room.stickies.iter().filter(|s| s.is_pinned).collect();
        assert_eq!(pinned.len(), 1);
        assert_eq!(pinned[0].id, plain_id);
        assert_eq!(pinned[0].timestamp, 50);
    }

    #[test]
    fn toggle_pin_on_unknown_sticky_is_noop() {
        let mut room = RoomData::new("a", "A", 0);
        assert_eq!(toggle_pin(&mut room, "a", uuid::Uuid::new_v4(), 1), None);
    }

    #[test]
    fn checked_groceries_expire_after_ttl() {
        let policy = RoomPolicy::default();
        let mut room = RoomData::new("a", "A", 0);
        let mut milk = GroceryItem::new("milk");
        milk.toggle(0);
        let mut eggs = GroceryItem::new("eggs");
        eggs.toggle(2 * HOUR);
        room.groceries = vec![milk, eggs, GroceryItem::new("bread")];

        prune_groceries(&mut room, 12 * HOUR, &policy);

        let left: Vec<_> = room.groceries.iter().map(|g| g.text.as_str()).collect();
        assert_eq!(left, vec!["eggs", "bread"]);
    }
}
