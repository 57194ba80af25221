//! Decides which partner reactions a client should animate.

use crate::model::mood::InteractionKind;
use crate::model::room::RoomData;

/// Tracks the last interaction a viewer has seen.
///
/// The first observed snapshot only primes the tracker so reopening a room
/// does not replay an old reaction.
#[derive(Debug, Clone)]
pub struct InteractionObserver {
    viewer_id: String,
    primed: bool,
    last_seen: Option<i64>,
}

impl InteractionObserver {
    pub fn new(viewer_id: impl Into<String>) -> Self {
        Self {
            viewer_id: viewer_id.into(),
            primed: false,
            last_seen: None,
        }
    }

    /// Returns the reaction to play for this snapshot, if any.
    pub fn observe(&mut self, room: &RoomData) -> Option<InteractionKind> {
        let current = room.last_interaction.as_ref();
        if !self.primed {
            self.primed = true;
            self.last_seen = current.map(|interaction| interaction.timestamp);
            return None;
        }

        let interaction = current?;
        if self
            .last_seen
            .is_some_and(|last_seen| interaction.timestamp <= last_seen)
        {
            return None;
        }
        self.last_seen = Some(interaction.timestamp);
        if interaction.sender_id == self.viewer_id {
            return None;
        }
        Some(interaction.kind)
    }
}
