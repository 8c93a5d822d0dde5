//! Read-only analytics over recorded attempts.
//!
//! Aggregates accuracy by subject and topic, average answer time, the
//! weak/strong topic lists, and the rolling-accuracy trend slope. Nothing
//! here mutates state; it runs against whatever snapshot the caller loads.

use std::collections::{BTreeMap, HashMap};

use prepa_algo::trend;
use prepa_algo::types::{TrendDirection, TrendParams};
use serde::Serialize;

use crate::models::AttemptRecord;
use crate::services::mastery::TopicMasteryModel;
use crate::store::MasteryMap;

/// Subject/topic lookup for attempts, resolved by the caller from the
/// question source.
#[derive(Debug, Clone)]
pub struct QuestionMeta {
    pub subject: String,
    pub topic: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_attempts: usize,
    pub correct_attempts: usize,
    pub subject_accuracy: BTreeMap<String, f64>,
    pub topic_accuracy: BTreeMap<String, f64>,
    pub avg_time_ms: f64,
    pub weak_topics: Vec<String>,
    pub strong_topics: Vec<String>,
    /// Least-squares slope of rolling accuracy over the trend window.
    pub trend_slope: f64,
    pub trend: TrendDirection,
}

pub struct AnalyticsReporter {
    trend_params: TrendParams,
}

impl AnalyticsReporter {
    pub fn new(trend_params: TrendParams) -> Self {
        Self { trend_params }
    }

    pub fn report(
        &self,
        attempts: &[AttemptRecord],
        meta: &HashMap<String, QuestionMeta>,
        mastery_model: &TopicMasteryModel,
        mastery: &MasteryMap,
    ) -> AnalyticsReport {
        let mut ordered: Vec<&AttemptRecord> = attempts.iter().collect();
        ordered.sort_by_key(|r| r.timestamp);

        let total = ordered.len();
        let correct = ordered.iter().filter(|r| r.is_correct).count();

        let mut subject_tally: BTreeMap<String, (usize, usize)> = BTreeMap::new();
        let mut topic_tally: BTreeMap<String, (usize, usize)> = BTreeMap::new();
        let mut elapsed_sum = 0i64;

        for record in &ordered {
            elapsed_sum += record.elapsed_ms;
            let Some(m) = meta.get(&record.question_id) else {
                continue;
            };
            let s = subject_tally.entry(m.subject.clone()).or_insert((0, 0));
            s.0 += 1;
            s.1 += usize::from(record.is_correct);
            let t = topic_tally.entry(m.topic.clone()).or_insert((0, 0));
            t.0 += 1;
            t.1 += usize::from(record.is_correct);
        }

        let accuracy = |(n, c): &(usize, usize)| *c as f64 / (*n).max(1) as f64;
        let outcomes: Vec<bool> = ordered.iter().map(|r| r.is_correct).collect();
        let trend_slope = trend::accuracy_trend(&outcomes, &self.trend_params);

        AnalyticsReport {
            total_attempts: total,
            correct_attempts: correct,
            subject_accuracy: subject_tally.iter().map(|(k, v)| (k.clone(), accuracy(v))).collect(),
            topic_accuracy: topic_tally.iter().map(|(k, v)| (k.clone(), accuracy(v))).collect(),
            avg_time_ms: if total > 0 { elapsed_sum as f64 / total as f64 } else { 0.0 },
            weak_topics: mastery_model.weak_topics(mastery),
            strong_topics: mastery_model.strong_topics(mastery),
            trend_slope,
            trend: trend::direction(trend_slope, &self.trend_params),
        }
    }

    /// Per-topic accuracy deltas (a minus b) over the topics either user
    /// attempted; topics one side never attempted count as accuracy 0.
    pub fn compare(
        &self,
        attempts_a: &[AttemptRecord],
        attempts_b: &[AttemptRecord],
        meta: &HashMap<String, QuestionMeta>,
    ) -> BTreeMap<String, f64> {
        let acc_a = Self::topic_accuracy(attempts_a, meta);
        let acc_b = Self::topic_accuracy(attempts_b, meta);

        let mut deltas = BTreeMap::new();
        for topic in acc_a.keys().chain(acc_b.keys()) {
            let a = acc_a.get(topic).copied().unwrap_or(0.0);
            let b = acc_b.get(topic).copied().unwrap_or(0.0);
            deltas.insert(topic.clone(), a - b);
        }
        deltas
    }

    fn topic_accuracy(
        attempts: &[AttemptRecord],
        meta: &HashMap<String, QuestionMeta>,
    ) -> BTreeMap<String, f64> {
        let mut tally: BTreeMap<String, (usize, usize)> = BTreeMap::new();
        for record in attempts {
            if let Some(m) = meta.get(&record.question_id) {
                let t = tally.entry(m.topic.clone()).or_insert((0, 0));
                t.0 += 1;
                t.1 += usize::from(record.is_correct);
            }
        }
        tally
            .into_iter()
            .map(|(topic, (n, c))| (topic, c as f64 / n.max(1) as f64))
            .collect()
    }
}
