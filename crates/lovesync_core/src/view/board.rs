//! Home board projections: visible stickies, groceries, badges and labels.

use crate::model::grocery::GroceryItem;
use crate::model::mood::{Mood, Signal};
use crate::model::policy::RoomPolicy;
use crate::model::room::{RoomData, RoomRole, GUEST_PLACEHOLDER_NAME, PARTNER_FALLBACK_NAME};
use crate::model::sticky::Sticky;
use chrono::{FixedOffset, TimeZone};
use std::fmt::{Display, Formatter};

/// Label used for the viewer's own posts.
pub const SELF_LABEL: &str = "Me";

/// Everything the board renders at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardView<'a> {
    pub stickies: Vec<&'a Sticky>,
    pub groceries: Vec<&'a GroceryItem>,
    pub unchecked_groceries: usize,
}

pub fn board_view<'a>(room: &'a RoomData, now_ms: i64, policy: &RoomPolicy) -> BoardView<'a> {
    let groceries = visible_groceries(room, now_ms, policy);
    let unchecked_groceries = groceries.iter().filter(|item| !item.is_checked).count();
    BoardView {
        stickies: visible_stickies(room, now_ms, policy),
        groceries,
        unchecked_groceries,
    }
}

/// Live stickies, pinned first, then newest first.
pub fn visible_stickies<'a>(room: &'a RoomData, now_ms: i64, policy: &RoomPolicy) -> Vec<&'a Sticky> {
    let mut stickies: Vec<&Sticky> = room
        .stickies
        .iter()
        .filter(|sticky| sticky.is_live(now_ms, policy.sticky_ttl_ms))
        .collect();
    stickies.sort_by(|a, b| {
        b.is_pinned
            .cmp(&a.is_pinned)
            .then_with(|| b.timestamp.cmp(&a.timestamp))
    });
    stickies
}

/// Grocery items still inside their post-check window, in list order.
pub fn visible_groceries<'a>(
    room: &'a RoomData,
    now_ms: i64,
    policy: &RoomPolicy,
) -> Vec<&'a GroceryItem> {
    room.groceries
        .iter()
        .filter(|item| item.is_live(now_ms, policy.grocery_ttl_ms))
        .collect()
}

/// Countdown chip shown on deadlined mirror stickies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineBadge {
    Late(u32),
    Today,
    Tomorrow,
    DaysLeft(u32),
}

impl Display for DeadlineBadge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Late(days) => write!(f, "{days}d late"),
            Self::Today => f.write_str("Today!"),
            Self::Tomorrow => f.write_str("Tomorrow"),
            Self::DaysLeft(days) => write!(f, "{days}d left"),
        }
    }
}

/// Compares calendar days of `deadline_ms` and `now_ms` in the viewer's zone.
///
/// Returns `None` for timestamps chrono cannot represent.
pub fn deadline_badge(deadline_ms: i64, now_ms: i64, offset: FixedOffset) -> Option<DeadlineBadge> {
    let deadline = offset.timestamp_millis_opt(deadline_ms).single()?.date_naive();
    let today = offset.timestamp_millis_opt(now_ms).single()?.date_naive();
    let days = deadline.signed_duration_since(today).num_days();
    let magnitude = u32::try_from(days.unsigned_abs()).unwrap_or(u32::MAX);
    Some(match days {
        d if d < 0 => DeadlineBadge::Late(magnitude),
        0 => DeadlineBadge::Today,
        1 => DeadlineBadge::Tomorrow,
        _ => DeadlineBadge::DaysLeft(magnitude),
    })
}

pub fn mood_phrase(mood: Mood) -> String {
    format!("I am {}", mood.as_str())
}

pub fn signal_phrase(signal: Signal) -> &'static str {
    match signal {
        Signal::Love => "I love you!",
        Signal::MissYou => "I miss you so much.",
        Signal::Space => "Need a little space.",
        Signal::Coffee => "Wanna take a break together?",
        Signal::Attention => "Pay attention to me!",
        Signal::Home => "I'm coming home!",
    }
}

/// Name of the viewer's partner, or the generic fallback while the guest
/// slot is still a placeholder.
pub fn partner_name<'a>(room: &'a RoomData, viewer_id: &str) -> &'a str {
    let partner = match room.role_of(viewer_id) {
        Some(RoomRole::Host) => &room.guest_state.name,
        _ => &room.host_state.name,
    };
    let trimmed = partner.trim();
    if trimmed.is_empty() || trimmed == GUEST_PLACEHOLDER_NAME {
        PARTNER_FALLBACK_NAME
    } else {
        trimmed
    }
}

/// Author label for a post: "Me" for the viewer, else the member's name.
pub fn author_label<'a>(room: &'a RoomData, viewer_id: &str, author_id: &str) -> &'a str {
    if author_id == viewer_id {
        return SELF_LABEL;
    }
    let name = match room.role_of(author_id) {
        Some(role) => room.profile(role).name.trim(),
        None => "",
    };
    if name.is_empty() {
        PARTNER_FALLBACK_NAME
    } else {
        name
    }
}
