//! # market-lens hierarchy resolver
//!
//! Generic operations over the two tree-shaped dimensions: segment adjacency maps
//! of arbitrary depth and the fixed global -> region -> country geography tree.
//! Shared by the filter and metrics engines.

pub mod geography;
pub mod resolver;

pub use geography::GeographyResolver;
pub use resolver::{HierarchyResolver, is_ancestor_of, stored_ancestor_within};
