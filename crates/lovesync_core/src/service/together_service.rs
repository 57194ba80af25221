//! Together-items: shared todos and their pinned mirror stickies.
//!
//! # Invariants
//! - At most one todo in the room is pinned.
//! - A pinned todo has exactly one pinned mirror note sticky.
//! - Completing or deleting a todo removes its mirror sticky.

use crate::model::policy::RoomPolicy;
use crate::model::room::{RoomCode, RoomData};
use crate::model::sticky::{Sticky, StickyContent};
use crate::model::todo::{TodoItem, TogetherCategory};
use crate::model::RecordId;
use crate::repo::room_repo::RoomRepository;
use crate::service::board_service::{prune_stickies, random_rotation, reconcile_todo_pins};
use crate::service::room_service::{
    require_member, require_text, require_user_id, RoomService, ServiceResult,
};

impl<R: RoomRepository> RoomService<R> {
    /// Adds an open todo; the deadline is dropped for `Random` items.
    pub fn add_todo(
        &self,
        raw_code: &str,
        text: &str,
        category: TogetherCategory,
        deadline: Option<i64>,
    ) -> ServiceResult<RecordId> {
        let code = RoomCode::parse(raw_code)?;
        let text = require_text(text, "todo text")?;
        self.mutate(&code, "todo_add", |room, now| {
            let todo = TodoItem::new(text, category, deadline, now);
            let id = todo.id;
            room.todos.push(todo);
            Ok(id)
        })
    }

    /// Moves a todo to the completed folder.
    ///
    /// Returns `false` for unknown or already completed todos.
    pub fn complete_todo(&self, raw_code: &str, todo_id: RecordId) -> ServiceResult<bool> {
        let code = RoomCode::parse(raw_code)?;
        self.mutate(&code, "todo_complete", |room, now| {
            Ok(complete_todo(room, todo_id, now))
        })
    }

    /// Removes a todo and its mirror sticky.
    pub fn delete_todo(&self, raw_code: &str, todo_id: RecordId) -> ServiceResult<bool> {
        let code = RoomCode::parse(raw_code)?;
        self.mutate(&code, "todo_delete", |room, _now| {
            let before = room.todos.len();
            room.todos.retain(|todo| todo.id != todo_id);
            remove_mirrors(room, |origin| origin == todo_id);
            reconcile_todo_pins(room);
            Ok(room.todos.len() != before)
        })
    }

    /// Pins or unpins an open todo.
    ///
    /// Returns the new pin state, or `None` for unknown or completed todos.
    pub fn toggle_todo_pin(
        &self,
        raw_code: &str,
        user_id: &str,
        todo_id: RecordId,
    ) -> ServiceResult<Option<bool>> {
        let code = RoomCode::parse(raw_code)?;
        let user_id = require_user_id(user_id)?;
        let policy = self.policy();
        self.mutate(&code, "todo_toggle_pin", |room, now| {
            require_member(&code, room, user_id)?;
            Ok(toggle_todo_pin(room, user_id, todo_id, now, policy))
        })
    }
}

pub(crate) fn complete_todo(room: &mut RoomData, todo_id: RecordId, now_ms: i64) -> bool {
    let Some(todo) = room
        .todos
        .iter_mut()
        .find(|todo| todo.id == todo_id && !todo.is_completed())
    else {
        return false;
    };
    todo.complete(now_ms);
    remove_mirrors(room, |origin| origin == todo_id);
    reconcile_todo_pins(room);
    true
}

pub(crate) fn toggle_todo_pin(
    room: &mut RoomData,
    user_id: &str,
    todo_id: RecordId,
    now_ms: i64,
    policy: &RoomPolicy,
) -> Option<bool> {
    let todo = room
        .todos
        .iter()
        .find(|todo| todo.id == todo_id && !todo.is_completed())?;

    if todo.is_pinned {
        remove_mirrors(room, |origin| origin == todo_id);
        reconcile_todo_pins(room);
        return Some(false);
    }

    let mut mirror = Sticky::new(
        user_id,
        StickyContent::Note {
            text: todo.text.clone(),
        },
        now_ms,
        random_rotation(policy),
    );
    mirror.is_pinned = true;
    mirror.deadline = todo.deadline;
    mirror.origin_id = Some(todo_id);

    prune_stickies(room, now_ms, policy);
    remove_mirrors(room, |_| true);
    for sticky in &mut room.stickies {
        if sticky.user_id == user_id {
            sticky.is_pinned = false;
        }
    }
    room.stickies.push(mirror);
    reconcile_todo_pins(room);
    Some(true)
}

fn remove_mirrors(room: &mut RoomData, mut matches: impl FnMut(RecordId) -> bool) {
    room.stickies
        .retain(|sticky| !sticky.origin_id.is_some_and(&mut matches));
}
