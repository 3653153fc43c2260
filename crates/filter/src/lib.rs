//! # market-lens filter engine
//!
//! Applies a geography set filter and a segment filter (single-type or advanced
//! cross-type pairs with parent coverage) to the raw record collection. Pure over
//! its inputs; the only side channel is the diagnostics sink.

pub mod engine;

pub use engine::{
    FilterEngine, SegmentMatch, advanced_match, geography_matches, single_type_matches,
};
