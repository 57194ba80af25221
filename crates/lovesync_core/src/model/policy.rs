//! Tunable lifecycle limits for room documents.

const HOUR_MS: i64 = 60 * 60 * 1000;

/// Expiry windows, caps and retry budgets applied by `RoomService`.
///
/// `Default` reproduces the limits shipped to clients; tests and embedders
/// may tighten them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomPolicy {
    /// Unpinned stickies disappear this long after their timestamp.
    pub sticky_ttl_ms: i64,
    /// Checked grocery items disappear this long after being checked.
    pub grocery_ttl_ms: i64,
    /// Unpinned note stickies kept per user; the oldest is dropped beyond it.
    pub max_active_notes_per_user: usize,
    pub room_code_len: usize,
    /// Fresh codes tried before `create_room` gives up.
    pub max_code_attempts: u32,
    /// Compare-and-swap attempts per mutation before reporting a conflict.
    pub max_mutation_attempts: u32,
    /// Rotation range for new stickies, in degrees (`min..=max`).
    pub sticky_rotation_deg: (i32, i32),
}

impl Default for RoomPolicy {
    fn default() -> Self {
        Self {
            sticky_ttl_ms: 4 * HOUR_MS,
            grocery_ttl_ms: 12 * HOUR_MS,
            max_active_notes_per_user: 2,
            room_code_len: 6,
            max_code_attempts: 8,
            max_mutation_attempts: 3,
            sticky_rotation_deg: (-6, 5),
        }
    }
}
