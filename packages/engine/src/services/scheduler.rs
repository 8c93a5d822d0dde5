//! Spaced repetition service over per-user schedule maps.
//!
//! Entries are created lazily on first exposure; the recommendation path
//! only reads them through `priority` / `is_due`.

use prepa_algo::schedule;
use prepa_algo::types::ScheduleParams;
use tracing::debug;

use crate::store::ScheduleMap;

pub struct SpacedRepetitionScheduler {
    params: ScheduleParams,
}

impl SpacedRepetitionScheduler {
    pub fn new(params: ScheduleParams) -> Self {
        Self { params }
    }

    /// Apply one attempt to the user's entry for `question_id`.
    pub fn record(
        &self,
        entries: &mut ScheduleMap,
        question_id: &str,
        correct: bool,
        timestamp: i64,
    ) {
        let next = schedule::record(entries.get(question_id), correct, timestamp, &self.params);
        debug!(
            question_id,
            correct,
            interval_ms = next.interval_ms,
            "schedule updated"
        );
        entries.insert(question_id.to_string(), next);
    }

    pub fn priority(&self, entries: &ScheduleMap, question_id: &str, now: i64) -> f64 {
        schedule::priority(entries.get(question_id), now, &self.params)
    }

    pub fn is_due(&self, entries: &ScheduleMap, question_id: &str, now: i64) -> bool {
        entries
            .get(question_id)
            .map(|entry| schedule::is_due(entry, now))
            .unwrap_or(true)
    }

    pub fn params(&self) -> &ScheduleParams {
        &self.params
    }
}
