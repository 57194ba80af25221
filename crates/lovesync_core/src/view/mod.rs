//! Derived, display-ready projections of a room document.
//!
//! # Responsibility
//! - Decide what each screen shows and in which order.
//!
//! # Invariants
//! - Views are pure functions of a document, a timestamp and a UTC offset.
//! - Views never mutate or persist anything.

pub mod board;
pub mod goals;
pub mod together;
pub mod tracker;
