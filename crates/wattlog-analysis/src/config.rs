//! Analysis configuration.
//!
//! Explicit immutable configuration values passed into the analysis
//! functions, replacing what would otherwise be shared mutable globals.

use serde::{Deserialize, Serialize};
use time::Duration;

/// Configuration for recharge detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DechargeConfig {
    /// Supported top-up denominations in kWh, ascending. Recharges are
    /// only ever made in these fixed amounts in the real payment system.
    pub denominations: Vec<f64>,
}

impl Default for DechargeConfig {
    fn default() -> Self {
        Self {
            denominations: vec![25.0, 50.0, 75.0, 100.0, 150.0, 200.0],
        }
    }
}

impl DechargeConfig {
    /// The largest supported denomination.
    pub fn max_denomination(&self) -> f64 {
        self.denominations.iter().copied().fold(0.0, f64::max)
    }

    /// The smallest denomination strictly greater than `delta`, i.e. the
    /// cheapest plausible top-up that covers the observed jump.
    pub fn smallest_covering(&self, delta: f64) -> Option<f64> {
        self.denominations
            .iter()
            .copied()
            .filter(|&d| d > delta)
            .fold(None, |acc, d| match acc {
                Some(best) if best <= d => Some(best),
                _ => Some(d),
            })
    }
}

/// Configuration for exhaustion forecasting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// How far back from the anchor reading the regression window
    /// extends.
    pub fit_window: Duration,
    /// Zero-crossings further out than this are reported as "no
    /// exhaustion within the horizon".
    pub warning_horizon: Duration,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            fit_window: Duration::days(1),
            warning_horizon: Duration::days(3),
        }
    }
}
