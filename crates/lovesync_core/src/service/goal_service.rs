//! Count-based goals and reward claims.
//!
//! # Invariants
//! - `target_count >= 1` for every stored goal.
//! - A reward is claimed at most once, and only after completion.

use crate::model::goal::Goal;
use crate::model::room::{RoomCode, RoomData, RoomValidationError};
use crate::model::todo::{TodoItem, TogetherCategory};
use crate::model::RecordId;
use crate::repo::room_repo::RoomRepository;
use crate::service::room_service::{require_text, RoomService, RoomServiceError, ServiceResult};

/// Prefix of the todo created when a reward is claimed.
pub const REWARD_TODO_PREFIX: &str = "Reward: ";

impl<R: RoomRepository> RoomService<R> {
    pub fn add_goal(
        &self,
        raw_code: &str,
        title: &str,
        target_count: u32,
        reward: &str,
    ) -> ServiceResult<RecordId> {
        let code = RoomCode::parse(raw_code)?;
        let title = require_text(title, "goal title")?;
        let reward = require_text(reward, "goal reward")?;
        self.mutate(&code, "goal_add", |room, now| {
            let goal = Goal::new(title, target_count, reward, now);
            if goal.target_count == 0 {
                return Err(RoomValidationError::InvalidGoalTarget(goal.id).into());
            }
            let id = goal.id;
            room.goals.push(goal);
            Ok(id)
        })
    }

    /// Counts one step toward a goal.
    ///
    /// Returns whether the goal is completed afterwards; `None` for unknown goals.
    pub fn increment_goal(&self, raw_code: &str, goal_id: RecordId) -> ServiceResult<Option<bool>> {
        let code = RoomCode::parse(raw_code)?;
        self.mutate(&code, "goal_increment", |room, _now| {
            Ok(room
                .goals
                .iter_mut()
                .find(|goal| goal.id == goal_id)
                .map(|goal| {
                    goal.increment();
                    goal.is_completed
                }))
        })
    }

    pub fn delete_goal(&self, raw_code: &str, goal_id: RecordId) -> ServiceResult<bool> {
        let code = RoomCode::parse(raw_code)?;
        self.mutate(&code, "goal_delete", |room, _now| {
            let before = room.goals.len();
            room.goals.retain(|goal| goal.id != goal_id);
            Ok(room.goals.len() != before)
        })
    }

    /// Turns a completed goal's reward into a list todo.
    ///
    /// # Errors
    /// - `GoalNotClaimable` for unknown, unfinished or already claimed goals.
    pub fn claim_reward(&self, raw_code: &str, goal_id: RecordId) -> ServiceResult<RecordId> {
        let code = RoomCode::parse(raw_code)?;
        self.mutate(&code, "goal_claim", |room, now| {
            claim_reward(room, goal_id, now).ok_or(RoomServiceError::GoalNotClaimable(goal_id))
        })
    }
}

pub(crate) fn claim_reward(room: &mut RoomData, goal_id: RecordId, now_ms: i64) -> Option<RecordId> {
    let goal = room
        .goals
        .iter_mut()
        .find(|goal| goal.id == goal_id && goal.is_claimable())?;
    goal.claimed_at = Some(now_ms);
    let todo = TodoItem::new(
        format!("{REWARD_TODO_PREFIX}{}", goal.reward),
        TogetherCategory::List,
        None,
        now_ms,
    );
    let id = todo.id;
    room.todos.push(todo);
    Some(id)
}
