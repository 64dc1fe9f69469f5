//! Transformations from raw observations to a training series.
//!
//! # Example
//!
//! ```
//! use trendcast::core::{Cadence, Observation};
//! use trendcast::transform::{SeriesFilter, TemporalAggregator};
//! use chrono::{TimeZone, Utc};
//!
//! let observations = vec![
//!     Observation::new(Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap(), 12.0),
//!     Observation::new(Utc.with_ymd_and_hms(2024, 1, 23, 9, 0, 0).unwrap(), 8.0),
//! ];
//!
//! let points = TemporalAggregator::new(Cadence::weekly())
//!     .aggregate(&observations)
//!     .unwrap();
//! assert_eq!(points.len(), 4); // two empty weeks in between
//!
//! let series = SeriesFilter::new().apply(&points).unwrap();
//! assert_eq!(series.len(), 2);
//! ```

pub mod aggregate;
pub mod filter;

pub use aggregate::TemporalAggregator;
pub use filter::SeriesFilter;
