//! Leitner-style spaced repetition, reduced to one growth/reset rule.
//!
//! A correct answer multiplies the review interval (capped), an incorrect
//! answer resets it to the minimum. Priority ranks due items by how far
//! past their eligibility they are, measured in units of their own
//! interval, so an item three intervals overdue beats one barely due
//! regardless of absolute interval length.

use crate::types::{ScheduleEntry, ScheduleParams};

/// Entry for a question's first exposure.
pub fn first_entry(timestamp: i64, params: &ScheduleParams) -> ScheduleEntry {
    ScheduleEntry {
        last_seen: timestamp,
        next_eligible: timestamp + params.min_interval_ms,
        interval_ms: params.min_interval_ms,
    }
}

/// Apply one attempt to the entry, creating it if this is the first exposure.
pub fn record(
    entry: Option<&ScheduleEntry>,
    correct: bool,
    timestamp: i64,
    params: &ScheduleParams,
) -> ScheduleEntry {
    let Some(entry) = entry else {
        let mut fresh = first_entry(timestamp, params);
        if !correct {
            // A miss on first sight still schedules at the minimum interval.
            fresh.interval_ms = params.min_interval_ms;
            fresh.next_eligible = timestamp + params.min_interval_ms;
        }
        return fresh;
    };

    let interval_ms = if correct {
        let grown = (entry.interval_ms as f64 * params.growth_factor) as i64;
        grown.min(params.max_interval_ms)
    } else {
        params.min_interval_ms
    };

    ScheduleEntry {
        last_seen: timestamp,
        next_eligible: timestamp + interval_ms,
        interval_ms,
    }
}

/// Overdue weight for ranking.
///
/// Not due yet: 0. Due: `1 + overdue_ratio`, where the ratio is the time
/// past eligibility divided by the current interval. Unseen questions get
/// the fixed fresh priority so new material competes with mildly overdue
/// reviews but never with long-overdue ones.
pub fn priority(entry: Option<&ScheduleEntry>, now: i64, params: &ScheduleParams) -> f64 {
    let Some(entry) = entry else {
        return params.fresh_priority;
    };
    if now < entry.next_eligible {
        return 0.0;
    }
    let overdue = (now - entry.next_eligible) as f64;
    let interval = entry.interval_ms.max(1) as f64;
    1.0 + overdue / interval
}

pub fn is_due(entry: &ScheduleEntry, now: i64) -> bool {
    now >= entry.next_eligible
}
