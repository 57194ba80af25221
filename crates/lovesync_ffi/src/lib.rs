//! Flutter bridge for the LoveSync room core.

pub mod api;
