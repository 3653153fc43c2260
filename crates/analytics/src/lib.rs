//! # market-lens metrics engine
//!
//! Computes growth and share metrics for the top-level segments of one segment type
//! within one geography, aggregating each parent with all of its descendants.
//!
//! ## Architectural Principles
//!
//! - **Pure calculation:** no I/O, no clocks, no hidden state. The same records and
//!   parameters always produce the same `MetricsReport`.
//! - **Explicit years:** base and forecast years are `AnalysisParams` supplied by the
//!   caller; 2024/2032 are only the default configuration.
//! - **Numeric safeguards:** degenerate arithmetic resolves to defined defaults (a zero
//!   CAGR, exclusion from the comparison set) and is never an error.

pub mod engine;
pub mod error;
pub mod normalize;
pub mod report;

pub use engine::{AnalysisParams, MetricsEngine};
pub use error::AnalyticsError;
pub use normalize::{finite_max, normalized_index};
pub use report::{ExcludedUnit, MetricsReport, SegmentMetrics};
