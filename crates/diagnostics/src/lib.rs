//! # market-lens diagnostics
//!
//! The observability collaborator injected into the engine crates. Data anomalies
//! (cyclic hierarchies, children with two parents, excluded comparison units) are
//! reported here as typed events instead of being thrown or silently dropped.
//!
//! As a Layer 0 crate it depends on nothing else in the workspace.

pub mod events;
pub mod sink;

pub use events::{DiagnosticEvent, ExclusionReason, LogLevel};
pub use sink::{DiagnosticsSink, MemorySink, NullSink, Tee, TracingSink};
