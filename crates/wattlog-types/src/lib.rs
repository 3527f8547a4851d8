//! Shared types for the wattlog prepaid electricity tracker.
//!
//! This crate defines the data model used by the store and analysis
//! crates: raw meter readings, derived decharged readings and recharge
//! events, per-day cost entries, forecast outcomes, and the binding
//! plaintext log schema.
//!
//! # Example
//!
//! ```
//! use wattlog_types::{Reading, LOG_HEADER};
//!
//! let fields = ["42.5", "2024-08-08T12:30:00Z", "2024-08-08T12:30:05Z"];
//! let reading = Reading::from_fields(&fields)?;
//! assert_eq!(reading.remaining, 42.5);
//! # Ok::<(), wattlog_types::ParseError>(())
//! ```

pub mod error;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use types::{
    DailyCost, DechargedReading, Forecast, LOG_HEADER, Reading, RechargeEvent, format_timestamp,
    parse_timestamp,
};
