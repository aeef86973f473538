//! Additive-trend exponential smoothing (Holt's linear method).
//!
//! Level and trend start from the first two observations. Smoothing
//! parameters are either fixed or picked by an exhaustive grid search that
//! minimises the one-step-ahead squared error; the search visits the grid in
//! a fixed order and keeps the first minimum, so a fit is fully
//! deterministic.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{ComputeError, Result};

/// How the smoothing parameters are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Smoothing {
    /// Grid search over alpha and beta in steps of 0.05.
    #[default]
    Optimized,
    /// Use the given parameters as they are.
    Fixed { alpha: f64, beta: f64 },
}

/// A fitted Holt linear model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoltLinear {
    alpha: f64,
    beta: f64,
    level: f64,
    trend: f64,
    sse: f64,
}

const GRID_STEP: f64 = 0.05;
const GRID_POINTS: usize = 19;

impl HoltLinear {
    /// Fits the model to an ordered series.
    #[instrument(skip(series), fields(len = series.len()))]
    pub fn fit(series: &[f64], smoothing: Smoothing) -> Result<Self> {
        if series.len() < 2 {
            return Err(ComputeError::Forecast(format!(
                "need at least 2 observations, got {}",
                series.len()
            )));
        }
        if series.iter().any(|v| !v.is_finite()) {
            return Err(ComputeError::Forecast(
                "series contains non-finite values".to_string(),
            ));
        }

        let model = match smoothing {
            Smoothing::Fixed { alpha, beta } => {
                for (name, value) in [("alpha", alpha), ("beta", beta)] {
                    if !(value > 0.0 && value <= 1.0) {
                        return Err(ComputeError::Forecast(format!(
                            "{} must be in (0, 1], got {}",
                            name, value
                        )));
                    }
                }
                Self::run(series, alpha, beta)
            }
            Smoothing::Optimized => {
                let mut best: Option<Self> = None;
                for a in 1..=GRID_POINTS {
                    for b in 1..=GRID_POINTS {
                        let candidate = Self::run(series, a as f64 * GRID_STEP, b as f64 * GRID_STEP);
                        if best.is_none_or(|current| candidate.sse < current.sse) {
                            best = Some(candidate);
                        }
                    }
                }
                best.ok_or_else(|| ComputeError::Forecast("empty parameter grid".to_string()))?
            }
        };

        debug!(
            alpha = model.alpha,
            beta = model.beta,
            sse = model.sse,
            "Fitted Holt linear model"
        );
        Ok(model)
    }

    fn run(series: &[f64], alpha: f64, beta: f64) -> Self {
        let mut level = series[0];
        let mut trend = series[1] - series[0];
        let mut sse = 0.0;

        for &observed in &series[1..] {
            let predicted = level + trend;
            sse += (observed - predicted).powi(2);
            let previous_level = level;
            level = alpha * observed + (1.0 - alpha) * (level + trend);
            trend = beta * (level - previous_level) + (1.0 - beta) * trend;
        }

        Self {
            alpha,
            beta,
            level,
            trend,
            sse,
        }
    }

    /// Point forecasts for the next `steps` periods.
    pub fn forecast(&self, steps: usize) -> Vec<f64> {
        (1..=steps)
            .map(|h| self.level + h as f64 * self.trend)
            .collect()
    }

    /// Sum of squared one-step-ahead errors over the fitted history.
    pub fn sse(&self) -> f64 {
        self.sse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINEAR: [f64; 4] = [100.0, 110.0, 120.0, 130.0];

    #[test]
    fn test_linear_series_extends_trend() {
        let model = HoltLinear::fit(&LINEAR, Smoothing::Optimized).unwrap();
        let next = model.forecast(1);
        assert_eq!(next.len(), 1);
        assert!((next[0] - 140.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let series = [12.0, 15.0, 11.0, 19.0, 22.0, 18.0, 25.0];
        let first = HoltLinear::fit(&series, Smoothing::Optimized).unwrap().forecast(12);
        for _ in 0..5 {
            let again = HoltLinear::fit(&series, Smoothing::Optimized).unwrap().forecast(12);
            assert_eq!(first, again);
        }

        let fixed = Smoothing::Fixed { alpha: 0.5, beta: 0.3 };
        assert_eq!(
            HoltLinear::fit(&LINEAR, fixed).unwrap().forecast(3),
            HoltLinear::fit(&LINEAR, fixed).unwrap().forecast(3)
        );
    }

    #[test]
    fn test_short_series_is_rejected() {
        assert!(matches!(
            HoltLinear::fit(&[5.0], Smoothing::Optimized),
            Err(ComputeError::Forecast(_))
        ));
        assert!(HoltLinear::fit(&[], Smoothing::Optimized).is_err());
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let result = HoltLinear::fit(&LINEAR, Smoothing::Fixed { alpha: 0.0, beta: 0.5 });
        assert!(result.is_err());
        let result = HoltLinear::fit(&[1.0, f64::NAN], Smoothing::Optimized);
        assert!(result.is_err());
    }

    #[test]
    fn test_optimized_fit_beats_or_matches_fixed() {
        let series = [3.0, 8.0, 4.0, 9.0, 5.0, 12.0];
        let optimized = HoltLinear::fit(&series, Smoothing::Optimized).unwrap();
        let fixed = HoltLinear::fit(&series, Smoothing::Fixed { alpha: 0.5, beta: 0.5 }).unwrap();
        assert!(optimized.sse() <= fixed.sse() + 1e-9);
    }
}
