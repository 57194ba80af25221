//! Together-items projections: open vs completed folders and the random pick.

use crate::model::room::RoomData;
use crate::model::todo::{TodoItem, TogetherCategory};
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;

/// Todos split into the two folders, each in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TogetherView<'a> {
    /// Soonest deadline first; undeadlined items after, newest first.
    pub active: Vec<&'a TodoItem>,
    /// Most recently completed first.
    pub completed: Vec<&'a TodoItem>,
}

pub fn together_view(room: &RoomData) -> TogetherView<'_> {
    let (mut completed, mut active): (Vec<&TodoItem>, Vec<&TodoItem>) =
        room.todos.iter().partition(|todo| todo.is_completed());

    active.sort_by(|a, b| active_order(a, b));
    completed.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    TogetherView { active, completed }
}

fn active_order(a: &TodoItem, b: &TodoItem) -> Ordering {
    match (a.deadline, b.deadline) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Draws one open item from the `Random` pool; `None` when the pool is empty.
pub fn pick_random<'a, R: Rng + ?Sized>(room: &'a RoomData, rng: &mut R) -> Option<&'a TodoItem> {
    let pool: Vec<&TodoItem> = room
        .todos
        .iter()
        .filter(|todo| todo.category == TogetherCategory::Random && !todo.is_completed())
        .collect();
    pool.choose(rng).copied()
}
