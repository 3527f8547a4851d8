//! Per-day consumption aggregation.

use wattlog_types::{DailyCost, DechargedReading};

use crate::error::{Error, Result};
use crate::interp::LinearInterpolant;

/// Resample the decharged series onto calendar-day boundaries and compute
/// consumption per day.
///
/// For each UTC calendar day from the first reading's date through the
/// day containing the last reading, consumption is the interpolated
/// value at day start minus the value at day end. Partial first and last
/// days are included; the clamped interpolant attributes nothing outside
/// the observed range.
pub fn daily_costs(decharged: &[DechargedReading]) -> Result<Vec<DailyCost>> {
    if decharged.len() < 2 {
        return Err(Error::InsufficientData {
            step: "daily cost aggregation",
            needed: 2,
            actual: decharged.len(),
        });
    }

    let interpolant = LinearInterpolant::from_series(decharged)?;

    let start_date = decharged[0].query_time.to_offset(time::UtcOffset::UTC).date();
    let end_date = decharged[decharged.len() - 1]
        .query_time
        .to_offset(time::UtcOffset::UTC)
        .date();

    let mut costs = Vec::new();
    let mut date = start_date;
    loop {
        let Some(next) = date.next_day() else {
            break;
        };

        let day_start = date.midnight().assume_utc().unix_timestamp() as f64;
        let day_end = next.midnight().assume_utc().unix_timestamp() as f64;
        costs.push(DailyCost {
            consumed_kwh: interpolant.eval(day_start) - interpolant.eval(day_end),
            date,
        });

        if date == end_date {
            break;
        }
        date = next;
    }

    Ok(costs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use time::macros::{date, datetime};

    fn series(points: &[(f64, time::OffsetDateTime)]) -> Vec<DechargedReading> {
        points
            .iter()
            .map(|&(remaining, query_time)| DechargedReading {
                remaining,
                query_time,
                request_time: query_time + Duration::seconds(5),
            })
            .collect()
    }

    #[test]
    fn test_needs_two_points() {
        let single = series(&[(10.0, datetime!(2024-08-08 00:00:00 UTC))]);
        assert!(matches!(
            daily_costs(&single),
            Err(Error::InsufficientData { needed: 2, .. })
        ));
    }

    #[test]
    fn test_even_consumption_across_days() {
        // 2 kWh/day, sampled exactly at midnights.
        let decharged = series(&[
            (10.0, datetime!(2024-08-08 00:00:00 UTC)),
            (8.0, datetime!(2024-08-09 00:00:00 UTC)),
            (6.0, datetime!(2024-08-10 00:00:00 UTC)),
        ]);

        let costs = daily_costs(&decharged).unwrap();
        assert_eq!(costs.len(), 3);
        assert_eq!(costs[0].date, date!(2024-08-08));
        assert!((costs[0].consumed_kwh - 2.0).abs() < 1e-9);
        assert!((costs[1].consumed_kwh - 2.0).abs() < 1e-9);
        // The last reading falls exactly on the day boundary, so the
        // final day sees no in-range consumption.
        assert!((costs[2].consumed_kwh - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_days_via_interpolation() {
        // Noon to noon over one midnight: half the drop lands on each day.
        let decharged = series(&[
            (10.0, datetime!(2024-08-08 12:00:00 UTC)),
            (6.0, datetime!(2024-08-09 12:00:00 UTC)),
        ]);

        let costs = daily_costs(&decharged).unwrap();
        assert_eq!(costs.len(), 2);
        assert!((costs[0].consumed_kwh - 2.0).abs() < 1e-9);
        assert!((costs[1].consumed_kwh - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_cost_conservation() {
        let decharged = series(&[
            (20.0, datetime!(2024-08-08 03:00:00 UTC)),
            (17.5, datetime!(2024-08-08 21:00:00 UTC)),
            (12.0, datetime!(2024-08-10 09:30:00 UTC)),
            (11.0, datetime!(2024-08-11 14:00:00 UTC)),
        ]);

        let costs = daily_costs(&decharged).unwrap();
        let total: f64 = costs.iter().map(|c| c.consumed_kwh).sum();
        let span = decharged[0].remaining - decharged[3].remaining;
        assert!((total - span).abs() < 1e-9);
    }

    #[test]
    fn test_one_entry_per_spanned_day() {
        let decharged = series(&[
            (10.0, datetime!(2024-08-08 23:00:00 UTC)),
            (4.0, datetime!(2024-08-12 01:00:00 UTC)),
        ]);

        let costs = daily_costs(&decharged).unwrap();
        let dates: Vec<_> = costs.iter().map(|c| c.date).collect();
        assert_eq!(
            dates,
            vec![
                date!(2024-08-08),
                date!(2024-08-09),
                date!(2024-08-10),
                date!(2024-08-11),
                date!(2024-08-12),
            ]
        );
    }
}
