//! Goal progress projections.

use crate::model::goal::Goal;

/// Completion percentage, rounded and capped at 100.
pub fn progress_percent(goal: &Goal) -> u8 {
    if goal.target_count == 0 {
        return 100;
    }
    let percent = (u64::from(goal.current_count) * 100 + u64::from(goal.target_count) / 2)
        / u64::from(goal.target_count);
    u8::try_from(percent.min(100)).unwrap_or(100)
}
