//! Text rendering of analysis results.

use std::fmt::Write;

use wattlog_types::{DailyCost, DechargedReading, Forecast, Reading, RechargeEvent, format_timestamp};

/// Render the reading history with detected recharge events interleaved.
pub fn format_history(history: &[Reading], recharges: &[RechargeEvent]) -> String {
    let mut out = String::new();

    for (i, reading) in history.iter().enumerate() {
        if let Some(event) = recharges.iter().find(|r| r.after_index == i) {
            let _ = writeln!(out, "  -- recharged by {} kWh --", event.amount);
        }
        let _ = writeln!(
            out,
            "{}  {:>8.2} kWh",
            format_timestamp(reading.query_time),
            reading.remaining
        );
    }

    let _ = write!(
        out,
        "{} readings, {} recharge(s) detected",
        history.len(),
        recharges.len()
    );
    out
}

/// Render the decharged (consumption-only) series.
pub fn format_decharged(decharged: &[DechargedReading]) -> String {
    let mut out = String::new();
    for reading in decharged {
        let _ = writeln!(
            out,
            "{}  {:>8.2} kWh",
            format_timestamp(reading.query_time),
            reading.remaining
        );
    }
    out.truncate(out.trim_end().len());
    out
}

/// Render per-day consumption.
pub fn format_costs(costs: &[DailyCost]) -> String {
    let mut out = String::new();
    for cost in costs {
        let _ = writeln!(out, "{}  {:.2} kWh spent", cost.date, cost.consumed_kwh);
    }

    let total: f64 = costs.iter().map(|c| c.consumed_kwh).sum();
    let _ = write!(out, "total: {total:.2} kWh over {} day(s)", costs.len());
    out
}

/// Render a forecast outcome.
pub fn format_forecast(forecast: &Forecast) -> String {
    match forecast {
        Forecast::ExhaustsAt { at, time_left } => format!(
            "estimated exhaustion at {}\n({} from now)",
            format_timestamp(*at),
            time_left
        ),
        Forecast::BeyondHorizon { clipped_at } => format!(
            "no exhaustion before {}",
            format_timestamp(*clipped_at)
        ),
        Forecast::AlreadyExhausted { at } => format!(
            "balance appears exhausted since {}",
            format_timestamp(*at)
        ),
        Forecast::NotDecreasing => {
            "balance is not decreasing; no exhaustion to forecast".to_string()
        }
        // `Forecast` is `#[non_exhaustive]`; all current variants are
        // handled above, so this arm is unreachable today.
        other => unreachable!("unhandled forecast variant: {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use time::macros::datetime;

    fn reading(remaining: f64, day: i64) -> Reading {
        Reading {
            remaining,
            query_time: datetime!(2024-08-08 00:00:00 UTC) + Duration::days(day),
            request_time: datetime!(2024-08-08 00:00:05 UTC) + Duration::days(day),
        }
    }

    #[test]
    fn test_format_history_marks_recharges() {
        let history = vec![reading(2.0, 0), reading(25.0, 1), reading(21.0, 2)];
        let recharges = vec![RechargeEvent {
            amount: 25.0,
            after_index: 1,
        }];

        let text = format_history(&history, &recharges);
        assert!(text.contains("recharged by 25 kWh"));
        assert!(text.contains("3 readings, 1 recharge(s)"));

        // The recharge marker precedes the reading it applies to.
        let marker = text.find("recharged").unwrap();
        let after = text.find("2024-08-09").unwrap();
        assert!(marker < after);
    }

    #[test]
    fn test_format_decharged_lists_values() {
        let series = vec![
            DechargedReading {
                remaining: 10.0,
                query_time: datetime!(2024-08-08 00:00:00 UTC),
                request_time: datetime!(2024-08-08 00:00:05 UTC),
            },
            DechargedReading {
                remaining: -4.0,
                query_time: datetime!(2024-08-09 00:00:00 UTC),
                request_time: datetime!(2024-08-09 00:00:05 UTC),
            },
        ];

        let text = format_decharged(&series);
        assert!(text.contains("10.00 kWh"));
        assert!(text.contains("-4.00 kWh"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_format_costs_totals() {
        let costs = vec![
            DailyCost {
                consumed_kwh: 2.0,
                date: datetime!(2024-08-08 00:00:00 UTC).date(),
            },
            DailyCost {
                consumed_kwh: 1.5,
                date: datetime!(2024-08-09 00:00:00 UTC).date(),
            },
        ];

        let text = format_costs(&costs);
        assert!(text.contains("2024-08-08  2.00 kWh spent"));
        assert!(text.contains("total: 3.50 kWh over 2 day(s)"));
    }

    #[test]
    fn test_format_forecast_variants() {
        let at = datetime!(2024-08-10 06:00:00 UTC);
        let text = format_forecast(&Forecast::ExhaustsAt {
            at,
            time_left: Duration::days(2),
        });
        assert!(text.contains("estimated exhaustion at 2024-08-10T06:00:00Z"));

        let text = format_forecast(&Forecast::BeyondHorizon { clipped_at: at });
        assert!(text.contains("no exhaustion before"));

        assert!(format_forecast(&Forecast::NotDecreasing).contains("not decreasing"));
    }
}
