//! Engine configuration.
//!
//! Every tunable the algorithms use is a named field with a documented
//! default; nothing is hardcoded inside a scoring path. `from_env` lets a
//! deployment override the most commonly tuned knobs without a rebuild.

use prepa_algo::types::{MasteryParams, ScheduleParams, TrendParams};
use serde::{Deserialize, Serialize};

/// Weight of overdue-review priority in the candidate score (w1)
pub const W_DUE_PRIORITY: f64 = 1.0;

/// Weight of the weak-topic bonus (w2)
pub const W_WEAK_TOPIC: f64 = 1.5;

/// Weight of difficulty fit against the mastery band (w3)
pub const W_DIFFICULTY_FIT: f64 = 1.0;

/// Weight of the recent-repetition penalty (w4)
pub const W_REPETITION: f64 = 0.5;

/// Window within which re-serving the same question is penalized
pub const RECENCY_WINDOW_MS: i64 = 86_400_000;

/// Largest fraction of one batch a single topic may occupy
pub const TOPIC_QUOTA_FRACTION: f64 = 0.4;

/// Cosine similarity above which a generated candidate is a duplicate
pub const DUPLICATE_THRESHOLD: f64 = 0.85;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub due_priority: f64,
    pub weak_topic: f64,
    pub difficulty_fit: f64,
    pub repetition: f64,
    pub recency_window_ms: i64,
    pub topic_quota_fraction: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            due_priority: W_DUE_PRIORITY,
            weak_topic: W_WEAK_TOPIC,
            difficulty_fit: W_DIFFICULTY_FIT,
            repetition: W_REPETITION,
            recency_window_ms: RECENCY_WINDOW_MS,
            topic_quota_fraction: TOPIC_QUOTA_FRACTION,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityParams {
    pub duplicate_threshold: f64,
}

impl Default for SimilarityParams {
    fn default() -> Self {
        Self {
            duplicate_threshold: DUPLICATE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub mastery: MasteryParams,
    pub schedule: ScheduleParams,
    pub weights: ScoreWeights,
    pub similarity: SimilarityParams,
    pub trend: TrendParams,
}

impl EngineConfig {
    /// Defaults, with env overrides for the knobs operators actually tune.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(decay) = env_f64("PREPA_MASTERY_DECAY") {
            config.mastery.decay = decay.clamp(0.01, 0.99);
        }
        if let Some(threshold) = env_f64("PREPA_DUPLICATE_THRESHOLD") {
            config.similarity.duplicate_threshold = threshold.clamp(0.0, 1.0);
        }
        if let Some(quota) = env_f64("PREPA_TOPIC_QUOTA") {
            config.weights.topic_quota_fraction = quota.clamp(0.1, 1.0);
        }
        config
    }
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key).ok().and_then(|v| v.parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_positive() {
        let weights = ScoreWeights::default();
        assert!(weights.due_priority > 0.0);
        assert!(weights.weak_topic > 0.0);
        assert!(weights.difficulty_fit > 0.0);
        assert!(weights.repetition > 0.0);
        assert!(weights.topic_quota_fraction > 0.0 && weights.topic_quota_fraction <= 1.0);
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.similarity.duplicate_threshold, config.similarity.duplicate_threshold);
        assert_eq!(back.mastery.min_samples, config.mastery.min_samples);
    }
}
