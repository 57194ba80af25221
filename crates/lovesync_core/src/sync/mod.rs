//! Live propagation of room changes to connected clients.
//!
//! # Responsibility
//! - Broadcast committed snapshots to per-room subscribers.
//! - Derive per-viewer reaction triggers from successive snapshots.

pub mod interaction;
pub mod room_feed;
