//! # market-lens core types
//!
//! Layer 0 of the workspace: the immutable dataset model and the mutable filter
//! state every engine crate reads. No logic beyond construction and lookup lives here.

pub mod enums;
pub mod error;
pub mod filter_state;
pub mod series;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{DataKind, Dimension, GeographyLevel, SegmentLevel, ViewMode};
pub use error::CoreError;
pub use filter_state::{
    AdvancedSegmentSelection, FilterState, FilterUpdate, SegmentSelection, YearRange,
};
pub use series::{TimeSeries, parse_year};
pub use structs::{
    Adjacency, DataRecord, DataSets, Dataset, Dimensions, GeographyDimension, Metadata, RecordSet,
    SegmentDimension, SegmentHierarchy, DEFAULT_BASE_YEAR, DEFAULT_FORECAST_YEAR,
};
