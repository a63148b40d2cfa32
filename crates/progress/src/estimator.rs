// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress estimator (§4.3): turns a stream of (bytes_transferred,
//! total_bytes, timestamp) samples into percent / transfer rate / ETC
//! with an associated confidence.

use crate::history::{History, Retention};
use mover_status_core::{ProgressError, ProgressMetrics};

/// Moving-average strategy used by [`ProgressEstimator::current_rate`].
#[derive(Debug, Clone, Copy)]
pub enum MovingAverage {
    /// Arithmetic mean of recent instantaneous rates.
    Simple,
    /// Linearly weighted mean, weights `1..=n` favoring recent samples.
    Weighted,
    /// Exponential moving average with smoothing factor `alpha` in `(0, 1]`.
    Exponential { alpha: f64 },
}

impl Default for MovingAverage {
    fn default() -> Self {
        Self::Simple
    }
}

/// ETC derivation method (§4.3 "ETC methods").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtcMethod {
    /// Rate from the first and most recent non-equal samples.
    Linear,
    /// Rate from the exponential-smoothing recurrence over instantaneous rates.
    Exponential,
    /// Linear when the coefficient of variation of recent rates is
    /// below threshold, else exponential.
    Adaptive,
}

/// Default coefficient-of-variation threshold below which [`EtcMethod::Adaptive`]
/// picks the linear projection over exponential smoothing.
pub const DEFAULT_ADAPTIVE_CV_THRESHOLD: f64 = 0.5;

/// Window of most-recent instantaneous rates considered for stability
/// scoring and the adaptive method's coefficient of variation.
const RATE_WINDOW: usize = 10;

/// A paused transfer (identical bytes over this many samples) lowers
/// confidence without discarding history (§4.3).
const PAUSE_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ETCResult {
    pub seconds: f64,
    pub confidence: f64,
    /// Lower bound of the confidence interval around `seconds` (not
    /// around `confidence` itself).
    pub confidence_min: f64,
    /// Upper bound of the confidence interval around `seconds`.
    pub confidence_max: f64,
    pub method: EtcMethod,
}

impl ETCResult {
    fn complete() -> Self {
        Self { seconds: 0.0, confidence: 1.0, confidence_min: 0.0, confidence_max: 0.0, method: EtcMethod::Linear }
    }

    fn indeterminate(method: EtcMethod) -> Self {
        Self { seconds: 0.0, confidence: 0.0, confidence_min: 0.0, confidence_max: 0.0, method }
    }
}

/// Sliding-window transfer progress estimator.
///
/// Owns its own sample history (§3 ownership: "estimator owns its
/// history"); not `Clone` because the history is mutated in place by
/// [`Self::add_sample`].
pub struct ProgressEstimator {
    history: History,
    moving_average: MovingAverage,
    adaptive_cv_threshold: f64,
    total_bytes: u64,
}

impl ProgressEstimator {
    pub fn new(retention: Retention, moving_average: MovingAverage) -> Self {
        Self { history: History::new(retention), moving_average, adaptive_cv_threshold: DEFAULT_ADAPTIVE_CV_THRESHOLD, total_bytes: 0 }
    }

    pub fn with_adaptive_cv_threshold(mut self, threshold: f64) -> Self {
        self.adaptive_cv_threshold = threshold;
        self
    }

    /// Ingests one observation. Rejects negative inputs without
    /// disturbing existing history (§4.3 edge case).
    pub fn add_sample(&mut self, bytes_transferred: i64, total_bytes: i64, timestamp_ms: u64) -> Result<(), ProgressError> {
        if bytes_transferred < 0 {
            return Err(ProgressError::NegativeInput("bytes_transferred"));
        }
        if total_bytes < 0 {
            return Err(ProgressError::NegativeInput("total_bytes"));
        }
        self.total_bytes = total_bytes as u64;
        self.history.push(bytes_transferred as u64, timestamp_ms);
        Ok(())
    }

    pub fn percent(&self) -> f64 {
        let Some(latest) = self.history.last() else { return 0.0 };
        if self.total_bytes == 0 {
            return 0.0;
        }
        ((latest.value as f64 / self.total_bytes as f64) * 100.0).min(100.0)
    }

    /// Instantaneous rate between each pair of consecutive samples,
    /// in bytes/sec, skipping pairs with zero elapsed time.
    fn instantaneous_rates(&self) -> Vec<f64> {
        let mut rates = Vec::new();
        let mut prev: Option<(u64, u64)> = None;
        for sample in self.history.iter() {
            if let Some((prev_value, prev_ts)) = prev {
                let dt_ms = sample.timestamp_ms.saturating_sub(prev_ts);
                if dt_ms > 0 {
                    let dv = sample.value as f64 - prev_value as f64;
                    rates.push(dv / (dt_ms as f64 / 1000.0));
                }
            }
            prev = Some((sample.value, sample.timestamp_ms));
        }
        rates
    }

    fn recent_rates(&self) -> Vec<f64> {
        let rates = self.instantaneous_rates();
        let skip = rates.len().saturating_sub(RATE_WINDOW);
        rates[skip..].to_vec()
    }

    /// Current transfer rate per the configured moving-average strategy.
    pub fn current_rate(&self) -> f64 {
        let rates = self.recent_rates();
        if rates.is_empty() {
            return 0.0;
        }
        match self.moving_average {
            MovingAverage::Simple => rates.iter().sum::<f64>() / rates.len() as f64,
            MovingAverage::Weighted => {
                let n = rates.len();
                let weight_sum: f64 = (1..=n).map(|w| w as f64).sum();
                let weighted: f64 = rates.iter().enumerate().map(|(i, r)| r * (i + 1) as f64).sum();
                weighted / weight_sum
            }
            MovingAverage::Exponential { alpha } => ema(&rates, alpha),
        }
    }

    fn linear_rate(&self) -> Option<f64> {
        let first = self.history.first()?;
        // Most recent sample whose value differs from the first, per
        // §4.3: "from first and most recent non-equal samples".
        let last_non_equal = self.history.iter().rev().find(|s| s.value != first.value)?;
        let dt_ms = last_non_equal.timestamp_ms.saturating_sub(first.timestamp_ms);
        if dt_ms == 0 {
            return None;
        }
        Some((last_non_equal.value as f64 - first.value as f64) / (dt_ms as f64 / 1000.0))
    }

    fn exponential_rate(&self, alpha: f64) -> Option<f64> {
        let rates = self.instantaneous_rates();
        if rates.is_empty() {
            return None;
        }
        Some(ema(&rates, alpha))
    }

    fn coefficient_of_variation(rates: &[f64]) -> f64 {
        if rates.is_empty() {
            return f64::INFINITY;
        }
        let mean = rates.iter().sum::<f64>() / rates.len() as f64;
        if mean.abs() < f64::EPSILON {
            return f64::INFINITY;
        }
        let variance = rates.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / rates.len() as f64;
        variance.sqrt() / mean.abs()
    }

    /// Stability component of adaptive confidence: closer to 1 the
    /// less the recent rate varies.
    fn stability_score(&self) -> f64 {
        let cv = Self::coefficient_of_variation(&self.recent_rates());
        if !cv.is_finite() {
            return 0.0;
        }
        (1.0 / (1.0 + cv)).clamp(0.0, 1.0)
    }

    /// Recency component: fraction of the estimation window already
    /// filled, i.e. how much history backs the current estimate.
    fn recency_score(&self) -> f64 {
        let usable = self.instantaneous_rates().len();
        (usable as f64 / RATE_WINDOW as f64).clamp(0.0, 1.0)
    }

    /// Computes percent/rate/ETC/confidence per the selected method (§4.3).
    pub fn etc(&self, method: EtcMethod) -> ETCResult {
        let Some(latest) = self.history.last() else { return ETCResult::indeterminate(method) };

        if self.total_bytes == 0 {
            return ETCResult::indeterminate(method);
        }
        if latest.value >= self.total_bytes {
            return ETCResult::complete();
        }
        if self.history.len() < 2 {
            return ETCResult::indeterminate(method);
        }

        let remaining = (self.total_bytes - latest.value) as f64;
        let resolved_method = match method {
            EtcMethod::Adaptive => {
                let cv = Self::coefficient_of_variation(&self.recent_rates());
                if cv < self.adaptive_cv_threshold {
                    EtcMethod::Linear
                } else {
                    EtcMethod::Exponential
                }
            }
            other => other,
        };

        let rate = match resolved_method {
            EtcMethod::Linear => self.linear_rate(),
            EtcMethod::Exponential => self.exponential_rate(0.3),
            EtcMethod::Adaptive => unreachable!("resolved above"),
        };

        let Some(rate) = rate.filter(|r| *r > 0.0) else {
            return ETCResult { seconds: 0.0, confidence: 0.05, confidence_min: 0.0, confidence_max: 0.0, method: resolved_method };
        };

        let seconds = remaining / rate;
        let mut confidence = (self.stability_score() * 0.6 + self.recency_score() * 0.4).clamp(0.0, 1.0);
        if self.history.is_paused(PAUSE_WINDOW) {
            confidence *= 0.3;
        }
        // Widens as confidence drops: a fully confident estimate has no
        // spread, a zero-confidence one spans +/-50% of `seconds`.
        let spread_fraction = 0.5 * (1.0 - confidence);
        ETCResult {
            seconds,
            confidence,
            confidence_min: (seconds * (1.0 - spread_fraction)).max(0.0),
            confidence_max: seconds * (1.0 + spread_fraction),
            method: resolved_method,
        }
    }

    /// Convenience accessor bundling percent/rate/etc into the shared
    /// [`ProgressMetrics`] data-model type.
    pub fn metrics(&self, method: EtcMethod) -> ProgressMetrics {
        let latest = self.history.last();
        let bytes_transferred = latest.map(|s| s.value).unwrap_or(0);
        if self.total_bytes > 0 && bytes_transferred >= self.total_bytes {
            return ProgressMetrics::complete(bytes_transferred, self.total_bytes);
        }
        let etc = self.etc(method);
        ProgressMetrics {
            percent: self.percent(),
            bytes_transferred,
            total_bytes: self.total_bytes,
            transfer_rate_bps: self.current_rate().max(0.0),
            etc_seconds: etc.seconds,
            confidence: etc.confidence,
        }
    }
}

fn ema(rates: &[f64], alpha: f64) -> f64 {
    let mut iter = rates.iter();
    let Some(first) = iter.next() else { return 0.0 };
    let mut rate = *first;
    for r in iter {
        rate = alpha * r + (1.0 - alpha) * rate;
    }
    rate
}

#[cfg(test)]
#[path = "estimator_tests.rs"]
mod tests;
