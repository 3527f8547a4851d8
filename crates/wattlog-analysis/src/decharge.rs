//! Recharge detection and removal.
//!
//! The meter only reports the current balance, which jumps upward
//! whenever the occupant tops up. Subtracting the cumulative inferred
//! recharge total converts the raw series into a consumption-only view,
//! which every downstream computation depends on.

use tracing::info;

use wattlog_types::{DechargedReading, Reading, RechargeEvent};

use crate::config::DechargeConfig;
use crate::error::{Error, Result};

/// Detect recharges in a chronologically ordered reading sequence and
/// subtract them, producing the decharged series and the detected events.
///
/// Upward jumps are snapped to the smallest configured denomination that
/// covers them; this is a best-effort inference, not a ground-truth
/// signal. A jump no denomination covers is a fatal
/// [`Error::RechargeOverflow`] rather than being silently clamped; it
/// means either a top-up outside the supported set or two recharges
/// within one sampling interval.
pub fn decharge(
    history: &[Reading],
    config: &DechargeConfig,
) -> Result<(Vec<DechargedReading>, Vec<RechargeEvent>)> {
    let first = history.first().ok_or(Error::InsufficientData {
        step: "decharge",
        needed: 1,
        actual: 0,
    })?;

    let mut last_value = first.remaining;
    let mut recharge_sum = 0.0;
    let mut recharges = Vec::new();
    let mut decharged = Vec::with_capacity(history.len());
    decharged.push(DechargedReading::from_reading(first, first.remaining));

    for (i, reading) in history.iter().enumerate().skip(1) {
        let value = reading.remaining;
        if value > last_value {
            let delta = value - last_value;
            let amount = config
                .smallest_covering(delta)
                .ok_or(Error::RechargeOverflow {
                    delta,
                    max: config.max_denomination(),
                })?;

            recharge_sum += amount;
            recharges.push(RechargeEvent {
                amount,
                after_index: i,
            });

            info!(
                "Recharge of {} kWh inferred (delta {:.2}) between {} and {}",
                amount,
                delta,
                history[i - 1].query_time,
                reading.query_time
            );
        }

        decharged.push(DechargedReading::from_reading(
            reading,
            value - recharge_sum,
        ));
        // Track the raw value, not the decharged one.
        last_value = value;
    }

    Ok((decharged, recharges))
}
