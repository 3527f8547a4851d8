//! Error types for wattlog-analysis.

use thiserror::Error;

/// Result type for wattlog-analysis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during analysis.
///
/// None of these are retried internally; each aborts the analysis call
/// that raised it.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    /// Fewer points than the computation requires.
    #[error("insufficient data for {step}: need at least {needed} points, got {actual}")]
    InsufficientData {
        /// The computation step that was starved.
        step: &'static str,
        /// Minimum required point count.
        needed: usize,
        /// Points actually available.
        actual: usize,
    },

    /// A single-interval balance increase exceeds the largest supported
    /// denomination; the recharge heuristic cannot represent it.
    #[error(
        "balance increase of {delta:.2} kWh within one sampling interval exceeds the largest supported denomination ({max} kWh)"
    )]
    RechargeOverflow {
        /// The observed upward jump.
        delta: f64,
        /// The largest configured denomination.
        max: f64,
    },
}
