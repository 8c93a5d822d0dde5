//! Accuracy trend over the most recent attempts.
//!
//! Rolling accuracy is the running mean of correctness within the window;
//! the trend is the least-squares slope of that series. This flags
//! improvement or decline, nothing more.

use crate::types::{TrendDirection, TrendParams};

/// Running-mean accuracy series over the last `window` outcomes.
pub fn rolling_accuracy(outcomes: &[bool], window: usize) -> Vec<f64> {
    let start = outcomes.len().saturating_sub(window);
    let recent = &outcomes[start..];

    let mut series = Vec::with_capacity(recent.len());
    let mut correct = 0usize;
    for (i, outcome) in recent.iter().enumerate() {
        if *outcome {
            correct += 1;
        }
        series.push(correct as f64 / (i + 1) as f64);
    }
    series
}

/// Least-squares slope of a series against its index.
pub fn slope(series: &[f64]) -> f64 {
    let n = series.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let sum_x: f64 = (0..n).map(|i| i as f64).sum();
    let sum_y: f64 = series.iter().sum();
    let sum_xy: f64 = series.iter().enumerate().map(|(i, y)| i as f64 * y).sum();
    let sum_xx: f64 = (0..n).map(|i| (i as f64).powi(2)).sum();

    let denominator = nf * sum_xx - sum_x.powi(2);
    if denominator.abs() < 1e-10 {
        return 0.0;
    }
    (nf * sum_xy - sum_x * sum_y) / denominator
}

/// Slope of rolling accuracy over the configured window.
pub fn accuracy_trend(outcomes: &[bool], params: &TrendParams) -> f64 {
    slope(&rolling_accuracy(outcomes, params.window))
}

pub fn direction(trend_slope: f64, params: &TrendParams) -> TrendDirection {
    if trend_slope > params.flat_epsilon {
        TrendDirection::Improving
    } else if trend_slope < -params.flat_epsilon {
        TrendDirection::Declining
    } else {
        TrendDirection::Flat
    }
}
