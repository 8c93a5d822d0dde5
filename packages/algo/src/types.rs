//! Common Types and Constants
//!
//! Shared data structures used across all algorithm modules. Every knob
//! that tunes an algorithm lives in a params struct here, with the chosen
//! default as a named constant, so callers (and tests) can exercise
//! boundary values without touching the algorithms themselves.

use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// EWMA decay factor: weight of the most recent attempt
pub const DEFAULT_DECAY: f64 = 0.3;

/// Mastery estimate before any observation
pub const SEED_ESTIMATE: f64 = 0.5;

/// Estimate below which a topic is weak
pub const WEAK_CUTOFF: f64 = 0.5;

/// Estimate above which a topic is strong
pub const STRONG_CUTOFF: f64 = 0.8;

/// Minimum exposures before a topic can classify as weak
pub const MIN_SAMPLES: u32 = 3;

/// Minimum exposures before a topic can classify as strong
pub const STRONG_MIN_SAMPLES: u32 = 5;

/// Review interval multiplier applied on a correct answer
pub const INTERVAL_GROWTH: f64 = 2.0;

/// Smallest review interval (one day)
pub const MIN_INTERVAL_MS: i64 = 86_400_000;

/// Largest review interval (sixty days)
pub const MAX_INTERVAL_MS: i64 = 60 * 86_400_000;

/// Priority assigned to a question the user has never seen
pub const FRESH_PRIORITY: f64 = 0.5;

/// Trend slopes within this band count as flat
pub const TREND_FLAT_EPSILON: f64 = 0.005;

/// Numerical stability epsilon
pub const EPSILON: f64 = 1e-10;

// ==================== Mastery Types ====================

/// How a user stands on one topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Weak,
    Neutral,
    Strong,
}

/// Per (user, topic) rolling mastery state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasteryState {
    /// Attempts observed on this topic
    pub exposures: u32,
    /// Correct attempts observed
    pub correct: u32,
    /// Exponentially weighted accuracy estimate in [0, 1]
    pub estimate: f64,
    /// Epoch milliseconds of the last fold
    pub updated_at: i64,
}

impl Default for MasteryState {
    fn default() -> Self {
        Self {
            exposures: 0,
            correct: 0,
            estimate: SEED_ESTIMATE,
            updated_at: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasteryParams {
    pub decay: f64,
    pub weak_cutoff: f64,
    pub strong_cutoff: f64,
    pub min_samples: u32,
    pub strong_min_samples: u32,
}

impl Default for MasteryParams {
    fn default() -> Self {
        Self {
            decay: DEFAULT_DECAY,
            weak_cutoff: WEAK_CUTOFF,
            strong_cutoff: STRONG_CUTOFF,
            min_samples: MIN_SAMPLES,
            strong_min_samples: STRONG_MIN_SAMPLES,
        }
    }
}

// ==================== Schedule Types ====================

/// Per (user, question) review schedule, created on first exposure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Epoch milliseconds of the last attempt
    pub last_seen: i64,
    /// Epoch milliseconds at which the question becomes due again
    pub next_eligible: i64,
    /// Current review interval in milliseconds
    pub interval_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleParams {
    pub growth_factor: f64,
    pub min_interval_ms: i64,
    pub max_interval_ms: i64,
    pub fresh_priority: f64,
}

impl Default for ScheduleParams {
    fn default() -> Self {
        Self {
            growth_factor: INTERVAL_GROWTH,
            min_interval_ms: MIN_INTERVAL_MS,
            max_interval_ms: MAX_INTERVAL_MS,
            fresh_priority: FRESH_PRIORITY,
        }
    }
}

// ==================== Trend Types ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Improving,
    Flat,
    Declining,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendParams {
    /// Number of most recent attempts the fit runs over
    pub window: usize,
    /// Slope magnitude below which the trend reads flat
    pub flat_epsilon: f64,
}

impl Default for TrendParams {
    fn default() -> Self {
        Self {
            window: 20,
            flat_epsilon: TREND_FLAT_EPSILON,
        }
    }
}

// ==================== Tests ====================
