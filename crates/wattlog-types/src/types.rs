//! Core types for prepaid electricity meter data.

use core::fmt;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime};

use crate::error::ParseError;

/// Header line of the plaintext log, without trailing newline.
pub const LOG_HEADER: &str = "remain, query time, request time";

/// A single balance reading reported by the meter.
///
/// Readings are totally ordered by [`query_time`](Self::query_time); the
/// persisted history is an ordered sequence of readings, with insertion
/// order equal to chronological order. Duplicates are permitted and a
/// reading is never mutated once appended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Remaining prepaid balance in kWh. May be fractional. Non-negative
    /// in principle, but raw readings jump upward on recharge.
    pub remaining: f64,
    /// Server-reported time of the balance snapshot.
    #[serde(with = "time::serde::rfc3339")]
    pub query_time: OffsetDateTime,
    /// Local time at which the query was issued.
    #[serde(with = "time::serde::rfc3339")]
    pub request_time: OffsetDateTime,
}

impl Reading {
    /// Format this reading as a log line in the binding schema:
    /// `<float>, <ISO-8601>, <ISO-8601>\n`.
    pub fn to_log_line(&self) -> String {
        format!(
            "{}, {}, {}\n",
            self.remaining,
            format_timestamp(self.query_time),
            format_timestamp(self.request_time),
        )
    }

    /// Parse a reading from the three fields of a log record.
    ///
    /// Fields are expected in schema order: remaining balance, query time,
    /// request time. Surrounding whitespace is tolerated.
    pub fn from_fields(fields: &[&str]) -> Result<Self, ParseError> {
        if fields.len() != 3 {
            return Err(ParseError::FieldCount {
                expected: 3,
                actual: fields.len(),
            });
        }

        let remaining = fields[0]
            .trim()
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidRemaining(fields[0].trim().to_string()))?;
        let query_time = parse_timestamp(fields[1].trim())?;
        let request_time = parse_timestamp(fields[2].trim())?;

        Ok(Self {
            remaining,
            query_time,
            request_time,
        })
    }
}

/// A reading with cumulative inferred recharge amounts subtracted.
///
/// One-to-one with the raw sequence it was derived from: same length, same
/// timestamps. Values may go negative. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DechargedReading {
    /// Consumption-only balance in kWh; negative values are meaningful.
    pub remaining: f64,
    /// Server-reported time, copied from the source reading.
    #[serde(with = "time::serde::rfc3339")]
    pub query_time: OffsetDateTime,
    /// Local request time, copied from the source reading.
    #[serde(with = "time::serde::rfc3339")]
    pub request_time: OffsetDateTime,
}

impl DechargedReading {
    /// Build a decharged reading from a raw reading and an adjusted value.
    pub fn from_reading(reading: &Reading, remaining: f64) -> Self {
        Self {
            remaining,
            query_time: reading.query_time,
            request_time: reading.request_time,
        }
    }
}

/// A detected balance top-up. Derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RechargeEvent {
    /// Inferred top-up amount in kWh, snapped to a supported denomination.
    pub amount: f64,
    /// Index (into the full reading sequence) of the first reading after
    /// the jump; the recharge occurred between `after_index - 1` and
    /// `after_index`.
    pub after_index: usize,
}

/// Consumption attributed to one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyCost {
    /// Energy consumed during the day, in kWh.
    pub consumed_kwh: f64,
    /// The calendar day (UTC).
    pub date: Date,
}

/// Outcome of an exhaustion forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Forecast {
    /// The balance is projected to reach zero at `at`.
    ExhaustsAt {
        /// Projected zero-crossing time.
        #[serde(with = "time::serde::rfc3339")]
        at: OffsetDateTime,
        /// Time until exhaustion, relative to when the forecast was
        /// computed (not the anchor reading's time).
        time_left: Duration,
    },
    /// No exhaustion within the warning horizon.
    BeyondHorizon {
        /// Horizon boundary the projection was clipped to.
        #[serde(with = "time::serde::rfc3339")]
        clipped_at: OffsetDateTime,
    },
    /// The projected zero-crossing is at or before the anchor reading.
    AlreadyExhausted {
        /// Projected zero-crossing time, in the past.
        #[serde(with = "time::serde::rfc3339")]
        at: OffsetDateTime,
    },
    /// The fitted balance is flat or increasing; no exhaustion can be
    /// projected.
    NotDecreasing,
}

impl fmt::Display for Forecast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Forecast::ExhaustsAt { at, time_left } => {
                write!(f, "estimated exhaustion at {at} ({time_left} from now)")
            }
            Forecast::BeyondHorizon { clipped_at } => {
                write!(f, "no exhaustion before {clipped_at}")
            }
            Forecast::AlreadyExhausted { at } => {
                write!(f, "balance already exhausted around {at}")
            }
            Forecast::NotDecreasing => write!(f, "balance is not decreasing"),
        }
    }
}

/// Format a timestamp as RFC 3339 (an ISO-8601 profile).
pub fn format_timestamp(ts: OffsetDateTime) -> String {
    // Rfc3339 formatting only fails for years outside 0..=9999, which the
    // meter cannot produce.
    ts.format(&Rfc3339)
        .unwrap_or_else(|_| ts.unix_timestamp().to_string())
}

/// Parse a timestamp from a log field.
///
/// Accepts RFC 3339 with offset, and falls back to the offset-less
/// `YYYY-MM-DD HH:MM:SS[.frac]` form written by older tooling, which is
/// assumed to be UTC.
pub fn parse_timestamp(s: &str) -> Result<OffsetDateTime, ParseError> {
    if let Ok(ts) = OffsetDateTime::parse(s, &Rfc3339) {
        return Ok(ts);
    }

    let naive = format_description!(
        version = 2,
        "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"
    );
    PrimitiveDateTime::parse(s, &naive)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|_| ParseError::InvalidTimestamp(s.to_string()))
}
