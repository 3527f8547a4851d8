//! Piecewise-linear interpolation with clamped extrapolation.

use wattlog_types::DechargedReading;

use crate::error::{Error, Result};

/// A piecewise-linear interpolant over `(x, y)` samples.
///
/// Outside the observed x range the interpolant is constant, clamped to
/// the first/last y value, mirroring how the daily cost resampling
/// treats partial boundary days.
#[derive(Debug, Clone)]
pub struct LinearInterpolant {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolant {
    /// Build an interpolant from samples with non-decreasing x values.
    ///
    /// Requires at least two samples.
    pub fn new(points: &[(f64, f64)]) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::InsufficientData {
                step: "interpolation",
                needed: 2,
                actual: points.len(),
            });
        }

        let xs = points.iter().map(|p| p.0).collect();
        let ys = points.iter().map(|p| p.1).collect();
        Ok(Self { xs, ys })
    }

    /// Build an interpolant over `(unix seconds, decharged value)`.
    pub fn from_series(series: &[DechargedReading]) -> Result<Self> {
        let points: Vec<(f64, f64)> = series
            .iter()
            .map(|r| (r.query_time.unix_timestamp() as f64, r.remaining))
            .collect();
        Self::new(&points)
    }

    /// Evaluate the interpolant at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        if x <= self.xs[0] {
            return self.ys[0];
        }
        let last = self.xs.len() - 1;
        if x >= self.xs[last] {
            return self.ys[last];
        }

        // First sample strictly past x; in 1..=last since the ends were
        // handled above.
        let hi = self.xs.partition_point(|&xi| xi <= x);
        let lo = hi - 1;
        let (x0, x1) = (self.xs[lo], self.xs[hi]);
        let (y0, y1) = (self.ys[lo], self.ys[hi]);
        if x1 == x0 {
            return y1;
        }
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}
