//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the document-level data access contract for rooms.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `RoomData::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `RevisionConflict`)
//!   in addition to DB transport errors.

pub mod room_repo;
