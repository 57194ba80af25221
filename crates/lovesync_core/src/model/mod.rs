//! Room document model.
//!
//! # Responsibility
//! - Define the canonical shape of the shared room document.
//! - Keep record constructors and per-record lifecycle helpers close to data.
//!
//! # Invariants
//! - Every collection record is identified by a stable `RecordId`.
//! - Wire names are camelCase to stay compatible with existing documents.

pub mod activity;
pub mod goal;
pub mod grocery;
pub mod money;
pub mod mood;
pub mod policy;
pub mod room;
pub mod sticky;
pub mod todo;

/// Stable identifier for records inside room collections.
pub type RecordId = uuid::Uuid;

/// Free-form client identifier (locally generated, never authenticated).
pub type UserId = String;
