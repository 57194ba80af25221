//! Tracker projections: per-member stats, period series and ledger summary.
//!
//! Period boundaries are calendar-based in the viewer's UTC offset.

use crate::model::activity::Activity;
use crate::model::room::RoomData;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Session and milestone counts for one side of the couple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberStats {
    pub sessions: usize,
    pub milestones: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityStats {
    pub me: MemberStats,
    pub partner: MemberStats,
}

/// Splits an activity's log by author relative to `viewer_id`.
pub fn activity_stats(activity: &Activity, viewer_id: &str) -> ActivityStats {
    let mut stats = ActivityStats::default();
    for log in &activity.logs {
        let side = if log.user_id == viewer_id {
            &mut stats.me
        } else {
            &mut stats.partner
        };
        side.sessions += 1;
        if log.milestone() {
            side.milestones += 1;
        }
    }
    stats
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryPeriod {
    /// Current calendar month, bucketed per day.
    Monthly,
    /// Current calendar year, bucketed per month.
    Annual,
}

/// Occurrence counts for one activity over a summary period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySeries {
    pub counts: Vec<u32>,
    /// Largest bucket, at least 1 so charts can scale against it.
    pub max: u32,
    pub total_sessions: u32,
    pub total_milestones: u32,
}

pub fn activity_series(
    activity: &Activity,
    period: SummaryPeriod,
    now_ms: i64,
    offset: FixedOffset,
) -> ActivitySeries {
    let mut series = ActivitySeries {
        counts: Vec::new(),
        max: 1,
        total_sessions: 0,
        total_milestones: 0,
    };
    let Some(now) = local(now_ms, offset) else {
        return series;
    };
    series.counts = match period {
        SummaryPeriod::Monthly => vec![0; days_in_month(now.year(), now.month())],
        SummaryPeriod::Annual => vec![0; 12],
    };

    for log in &activity.logs {
        let Some(at) = local(log.timestamp, offset) else {
            continue;
        };
        if !in_period(&at, &now, period) {
            continue;
        }
        let bucket = match period {
            SummaryPeriod::Monthly => at.day0(),
            SummaryPeriod::Annual => at.month0(),
        };
        if let Some(count) = series.counts.get_mut(bucket as usize) {
            *count += 1;
        }
        series.total_sessions += 1;
        if log.milestone() {
            series.total_milestones += 1;
        }
    }
    series.max = series.counts.iter().copied().max().unwrap_or(0).max(1);
    series
}

/// Ledger totals over a summary period, in cents. Sums saturate at the
/// `i64` bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoneySummary {
    pub income_cents: i64,
    /// Sum of expense magnitudes (non-negative).
    pub expense_cents: i64,
    pub net_cents: i64,
    pub entries: usize,
}

pub fn money_summary(
    room: &RoomData,
    period: SummaryPeriod,
    now_ms: i64,
    offset: FixedOffset,
) -> MoneySummary {
    let mut summary = MoneySummary::default();
    let Some(now) = local(now_ms, offset) else {
        return summary;
    };
    for entry in &room.money {
        let in_range = local(entry.timestamp, offset).is_some_and(|at| in_period(&at, &now, period));
        if !in_range {
            continue;
        }
        summary.entries += 1;
        if entry.amount_cents > 0 {
            summary.income_cents = summary.income_cents.saturating_add(entry.amount_cents);
        } else {
            summary.expense_cents = summary
                .expense_cents
                .saturating_add(entry.amount_cents.saturating_abs());
        }
    }
    summary.net_cents = summary.income_cents.saturating_sub(summary.expense_cents);
    summary
}

/// Running balance of the whole ledger, saturating at the `i64` bounds.
pub fn money_total(room: &RoomData) -> i64 {
    room.money
        .iter()
        .fold(0_i64, |total, entry| total.saturating_add(entry.amount_cents))
}

pub fn last_money_update(room: &RoomData) -> Option<i64> {
    room.money.iter().map(|entry| entry.timestamp).max()
}

/// Coarse "last updated" label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeDay {
    Never,
    Today,
    Yesterday,
    On(NaiveDate),
}

/// `Today` within 24h of `now_ms`, `Yesterday` within 48h, else the local date.
pub fn relative_day(timestamp_ms: Option<i64>, now_ms: i64, offset: FixedOffset) -> RelativeDay {
    let Some(timestamp_ms) = timestamp_ms else {
        return RelativeDay::Never;
    };
    let elapsed = now_ms - timestamp_ms;
    if elapsed < DAY_MS {
        return RelativeDay::Today;
    }
    if elapsed < 2 * DAY_MS {
        return RelativeDay::Yesterday;
    }
    local(timestamp_ms, offset).map_or(RelativeDay::Never, |at| RelativeDay::On(at.date_naive()))
}

fn local(timestamp_ms: i64, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    offset.timestamp_millis_opt(timestamp_ms).single()
}

fn in_period(at: &DateTime<FixedOffset>, now: &DateTime<FixedOffset>, period: SummaryPeriod) -> bool {
    at.year() == now.year() && (period == SummaryPeriod::Annual || at.month() == now.month())
}

fn days_in_month(year: i32, month: u32) -> usize {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (first, next) {
        (Some(first), Some(next)) => usize::try_from(next.signed_duration_since(first).num_days()).unwrap_or(31),
        _ => 31,
    }
}
