//! Exhaustion forecasting.
//!
//! Fits a line to a recent window of the decharged series, forces it
//! through the latest actual reading, and projects the zero-crossing.
//! Reconciling against the anchor trades fit quality on history for
//! accuracy at the point that matters most, the present.

use time::{Duration, OffsetDateTime};
use tracing::debug;

use wattlog_types::{DechargedReading, Forecast, Reading};

use crate::config::ForecastConfig;
use crate::error::{Error, Result};

/// Forecast when the balance reaches zero.
///
/// `anchor` is the most recent raw reading; the regression window extends
/// `fit_window` backward from its query time. `now` is the time the
/// forecast is computed, used only for the reported time-left duration.
pub fn forecast_exhaustion(
    decharged: &[DechargedReading],
    anchor: &Reading,
    now: OffsetDateTime,
    config: &ForecastConfig,
) -> Result<Forecast> {
    let start = decharged
        .iter()
        .position(|r| anchor.query_time - r.query_time < config.fit_window)
        .unwrap_or(decharged.len());
    let window = &decharged[start..];

    if window.len() < 2 {
        return Err(Error::InsufficientData {
            step: "exhaustion regression",
            needed: 2,
            actual: window.len(),
        });
    }

    let (slope, intercept) = fit_line(window)?;

    // Shift the intercept so the line passes exactly through the anchor's
    // actual raw value, preserving the fitted slope.
    let anchor_ts = anchor.query_time.unix_timestamp() as f64;
    let intercept = intercept + (anchor.remaining - (slope * anchor_ts + intercept));

    debug!(
        "Fitted slope {:.6} kWh/s over {} points, reconciled at {}",
        slope,
        window.len(),
        anchor.query_time
    );

    if anchor.remaining <= 0.0 {
        // The latest actual reading is already at or below zero; no
        // projection needed.
        return Ok(Forecast::AlreadyExhausted {
            at: anchor.query_time,
        });
    }

    if slope >= 0.0 {
        return Ok(Forecast::NotDecreasing);
    }

    let t_zero = -intercept / slope;
    if !t_zero.is_finite() {
        return Ok(Forecast::NotDecreasing);
    }

    let until_anchor = t_zero - anchor_ts;
    if until_anchor <= 0.0 {
        // Zero-crossing at or before the anchor. Clamp pathological fits
        // to a representable timestamp.
        let at = OffsetDateTime::from_unix_timestamp(t_zero.round() as i64)
            .unwrap_or(OffsetDateTime::UNIX_EPOCH);
        return Ok(Forecast::AlreadyExhausted { at });
    }

    if until_anchor >= config.warning_horizon.as_seconds_f64() {
        return Ok(Forecast::BeyondHorizon {
            clipped_at: anchor.query_time + config.warning_horizon,
        });
    }

    let at = anchor.query_time + Duration::seconds_f64(until_anchor);
    Ok(Forecast::ExhaustsAt {
        at,
        time_left: at - now,
    })
}

/// Ordinary least squares fit of `value = slope * t + intercept`.
fn fit_line(window: &[DechargedReading]) -> Result<(f64, f64)> {
    let n = window.len() as f64;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    for r in window {
        mean_x += r.query_time.unix_timestamp() as f64;
        mean_y += r.remaining;
    }
    mean_x /= n;
    mean_y /= n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for r in window {
        let dx = r.query_time.unix_timestamp() as f64 - mean_x;
        sxx += dx * dx;
        sxy += dx * (r.remaining - mean_y);
    }

    if sxx == 0.0 {
        // Every point shares one timestamp; no line can be fitted.
        return Err(Error::InsufficientData {
            step: "exhaustion regression (distinct timestamps)",
            needed: 2,
            actual: 1,
        });
    }

    let slope = sxy / sxx;
    Ok((slope, mean_y - slope * mean_x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn decharged(values: &[f64]) -> Vec<DechargedReading> {
        values
            .iter()
            .enumerate()
            .map(|(i, &remaining)| DechargedReading {
                remaining,
                query_time: datetime!(2024-08-08 00:00:00 UTC) + Duration::days(i as i64),
                request_time: datetime!(2024-08-08 00:00:05 UTC) + Duration::days(i as i64),
            })
            .collect()
    }

    fn anchor_of(series: &[DechargedReading]) -> Reading {
        let last = series.last().unwrap();
        Reading {
            remaining: last.remaining,
            query_time: last.query_time,
            request_time: last.request_time,
        }
    }

    fn assert_close(actual: OffsetDateTime, expected: OffsetDateTime) {
        assert!(
            (actual - expected).abs() < Duration::seconds(1),
            "expected {expected}, got {actual}"
        );
    }

    fn wide_window() -> ForecastConfig {
        ForecastConfig {
            fit_window: Duration::days(30),
            warning_horizon: Duration::days(3),
        }
    }

    #[test]
    fn test_linear_tail_exact_exhaustion() {
        // 10, 8, 6, 4 one day apart: 2 kWh/day leaves 2 days at the
        // anchor.
        let series = decharged(&[10.0, 8.0, 6.0, 4.0]);
        let anchor = anchor_of(&series);
        let now = anchor.query_time;

        let forecast = forecast_exhaustion(&series, &anchor, now, &wide_window()).unwrap();
        match forecast {
            Forecast::ExhaustsAt { at, time_left } => {
                // Regression over unix-second timestamps carries sub-second
                // rounding, so compare within a second.
                assert_close(at, anchor.query_time + Duration::days(2));
                assert!((time_left - Duration::days(2)).abs() < Duration::seconds(1));
            }
            other => panic!("expected ExhaustsAt, got {other:?}"),
        }
    }

    #[test]
    fn test_time_left_is_relative_to_now() {
        let series = decharged(&[10.0, 8.0, 6.0, 4.0]);
        let anchor = anchor_of(&series);
        let now = anchor.query_time + Duration::hours(12);

        let forecast = forecast_exhaustion(&series, &anchor, now, &wide_window()).unwrap();
        match forecast {
            Forecast::ExhaustsAt { time_left, .. } => {
                let expected = Duration::days(2) - Duration::hours(12);
                assert!((time_left - expected).abs() < Duration::seconds(1));
            }
            other => panic!("expected ExhaustsAt, got {other:?}"),
        }
    }

    #[test]
    fn test_reconciliation_passes_through_anchor() {
        // Noisy history, anchor off the fitted line: the shifted line
        // must evaluate to the anchor's actual value at its timestamp.
        let series = decharged(&[10.0, 8.2, 5.9, 4.0]);
        let mut anchor = anchor_of(&series);
        anchor.remaining = 3.4;

        let window = &series[..];
        let (slope, intercept) = fit_line(window).unwrap();
        let anchor_ts = anchor.query_time.unix_timestamp() as f64;
        let shifted = intercept + (anchor.remaining - (slope * anchor_ts + intercept));
        assert!((slope * anchor_ts + shifted - anchor.remaining).abs() < 1e-9);

        // And the forecast's zero crossing is consistent with that line.
        let forecast =
            forecast_exhaustion(&series, &anchor, anchor.query_time, &wide_window()).unwrap();
        match forecast {
            Forecast::ExhaustsAt { at, .. } => {
                let t = at.unix_timestamp() as f64;
                assert!((slope * t + shifted).abs() < 1e-3);
            }
            other => panic!("expected ExhaustsAt, got {other:?}"),
        }
    }

    #[test]
    fn test_flat_tail_not_decreasing() {
        let series = decharged(&[5.0, 5.0, 5.0]);
        let anchor = anchor_of(&series);
        let forecast =
            forecast_exhaustion(&series, &anchor, anchor.query_time, &wide_window()).unwrap();
        assert_eq!(forecast, Forecast::NotDecreasing);
    }

    #[test]
    fn test_rising_tail_not_decreasing() {
        let series = decharged(&[5.0, 6.0, 7.0]);
        let anchor = anchor_of(&series);
        let forecast =
            forecast_exhaustion(&series, &anchor, anchor.query_time, &wide_window()).unwrap();
        assert_eq!(forecast, Forecast::NotDecreasing);
    }

    #[test]
    fn test_beyond_horizon_is_clipped() {
        // 0.1 kWh/day from 100 kWh: exhaustion far past the 3-day
        // horizon.
        let series = decharged(&[100.0, 99.9, 99.8]);
        let anchor = anchor_of(&series);
        let forecast =
            forecast_exhaustion(&series, &anchor, anchor.query_time, &wide_window()).unwrap();
        assert_eq!(
            forecast,
            Forecast::BeyondHorizon {
                clipped_at: anchor.query_time + Duration::days(3),
            }
        );
    }

    #[test]
    fn test_anchor_at_zero_already_exhausted() {
        let series = decharged(&[4.0, 2.0, 0.0]);
        let anchor = anchor_of(&series);
        let forecast =
            forecast_exhaustion(&series, &anchor, anchor.query_time, &wide_window()).unwrap();
        assert_eq!(
            forecast,
            Forecast::AlreadyExhausted {
                at: anchor.query_time,
            }
        );
    }

    #[test]
    fn test_fit_window_restricts_points() {
        // Only the last two points are inside a 1.5-day window; the older
        // steep segment must not influence the slope. Tail slope is
        // 1 kWh/day from 2 kWh -> exhaustion in 2 days.
        let series = decharged(&[40.0, 20.0, 3.0, 2.0]);
        let anchor = anchor_of(&series);
        let config = ForecastConfig {
            fit_window: Duration::hours(36),
            warning_horizon: Duration::days(3),
        };

        let forecast =
            forecast_exhaustion(&series, &anchor, anchor.query_time, &config).unwrap();
        match forecast {
            Forecast::ExhaustsAt { at, .. } => {
                assert_close(at, anchor.query_time + Duration::days(2));
            }
            other => panic!("expected ExhaustsAt, got {other:?}"),
        }
    }

    #[test]
    fn test_too_few_points_in_window() {
        let series = decharged(&[10.0, 8.0, 6.0]);
        let anchor = anchor_of(&series);
        let config = ForecastConfig {
            fit_window: Duration::hours(1),
            warning_horizon: Duration::days(3),
        };

        assert!(matches!(
            forecast_exhaustion(&series, &anchor, anchor.query_time, &config),
            Err(Error::InsufficientData { needed: 2, .. })
        ));
    }

    #[test]
    fn test_identical_timestamps_cannot_fit() {
        let ts = datetime!(2024-08-08 00:00:00 UTC);
        let series = vec![
            DechargedReading {
                remaining: 10.0,
                query_time: ts,
                request_time: ts,
            },
            DechargedReading {
                remaining: 8.0,
                query_time: ts,
                request_time: ts,
            },
        ];
        let anchor = Reading {
            remaining: 8.0,
            query_time: ts,
            request_time: ts,
        };

        assert!(matches!(
            forecast_exhaustion(&series, &anchor, ts, &wide_window()),
            Err(Error::InsufficientData { .. })
        ));
    }
}
