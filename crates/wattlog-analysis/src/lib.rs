//! Consumption reconstruction and exhaustion forecasting.
//!
//! The analysis engine operates on an in-memory snapshot of the full
//! reading history: every run re-derives everything from scratch, and
//! nothing it produces is persisted. The pipeline is
//!
//! 1. [`filter_recent`] restricts to a recent window of history,
//! 2. [`decharge`] detects and subtracts recharges, yielding a
//!    consumption-only series,
//! 3. [`daily_costs`] resamples onto calendar days, and
//!    [`forecast_exhaustion`] projects the zero-crossing of the balance.
//!
//! # Example
//!
//! ```
//! use time::macros::datetime;
//! use wattlog_analysis::{DechargeConfig, decharge};
//! use wattlog_types::Reading;
//!
//! let history = vec![
//!     Reading {
//!         remaining: 4.0,
//!         query_time: datetime!(2024-08-08 00:00:00 UTC),
//!         request_time: datetime!(2024-08-08 00:00:05 UTC),
//!     },
//!     Reading {
//!         remaining: 26.0,
//!         query_time: datetime!(2024-08-09 00:00:00 UTC),
//!         request_time: datetime!(2024-08-09 00:00:05 UTC),
//!     },
//! ];
//!
//! let (decharged, recharges) = decharge(&history, &DechargeConfig::default())?;
//! assert_eq!(recharges[0].amount, 25.0);
//! assert_eq!(decharged[1].remaining, 1.0);
//! # Ok::<(), wattlog_analysis::Error>(())
//! ```

mod config;
mod cost;
mod decharge;
mod error;
mod filter;
mod forecast;
mod interp;

pub use config::{DechargeConfig, ForecastConfig};
pub use cost::daily_costs;
pub use decharge::decharge;
pub use error::{Error, Result};
pub use filter::{DEFAULT_RECENT_WINDOW, filter_recent};
pub use forecast::forecast_exhaustion;
pub use interp::LinearInterpolant;
