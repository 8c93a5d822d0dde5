//! Topic mastery as an exponentially weighted moving average.
//!
//! One fold per attempt: `estimate' = decay * outcome + (1 - decay) * estimate`,
//! seeded at 0.5 so the first few attempts pull the estimate from an
//! uninformed prior rather than from 0 or 1. Classification applies fixed
//! cutoffs only once the sample floor is met, so one unlucky attempt never
//! brands a topic weak.

use crate::types::{Classification, MasteryParams, MasteryState};

/// Fold a single attempt into the per-topic state.
pub fn fold_attempt(
    state: &MasteryState,
    correct: bool,
    timestamp: i64,
    params: &MasteryParams,
) -> MasteryState {
    let outcome = if correct { 1.0 } else { 0.0 };
    let estimate = params.decay * outcome + (1.0 - params.decay) * state.estimate;

    MasteryState {
        exposures: state.exposures + 1,
        correct: state.correct + u32::from(correct),
        estimate: estimate.clamp(0.0, 1.0),
        updated_at: timestamp.max(state.updated_at),
    }
}

/// Classify a topic against the cutoffs.
///
/// Below the sample floor the answer is always `Neutral`.
pub fn classify(state: &MasteryState, params: &MasteryParams) -> Classification {
    if state.exposures >= params.strong_min_samples && state.estimate > params.strong_cutoff {
        return Classification::Strong;
    }
    if state.exposures >= params.min_samples && state.estimate < params.weak_cutoff {
        return Classification::Weak;
    }
    Classification::Neutral
}

/// Topics classified weak, ascending by estimate (weakest first),
/// ties broken by topic name for determinism.
pub fn weak_topics<'a>(
    states: impl Iterator<Item = (&'a str, &'a MasteryState)>,
    params: &MasteryParams,
) -> Vec<String> {
    let mut topics: Vec<(&str, f64)> = states
        .filter(|(_, state)| classify(state, params) == Classification::Weak)
        .map(|(topic, state)| (topic, state.estimate))
        .collect();
    topics.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));
    topics.into_iter().map(|(topic, _)| topic.to_string()).collect()
}

/// Topics classified strong, descending by estimate (strongest first),
/// ties broken by topic name.
pub fn strong_topics<'a>(
    states: impl Iterator<Item = (&'a str, &'a MasteryState)>,
    params: &MasteryParams,
) -> Vec<String> {
    let mut topics: Vec<(&str, f64)> = states
        .filter(|(_, state)| classify(state, params) == Classification::Strong)
        .map(|(topic, state)| (topic, state.estimate))
        .collect();
    topics.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    topics.into_iter().map(|(topic, _)| topic.to_string()).collect()
}
