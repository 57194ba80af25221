//! Room use-case services.
//!
//! # Responsibility
//! - Run every room use-case through one read-modify-write protocol.
//! - Keep pure collection rules testable without a database.

pub mod board_service;
pub mod clock;
pub mod goal_service;
pub mod room_service;
pub mod together_service;
pub mod tracker_service;
