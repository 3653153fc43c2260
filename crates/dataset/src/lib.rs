//! # market-lens dataset
//!
//! Loads the static JSON dataset document once per session and exposes read-only
//! lookups over it. This is the only crate in the workspace that touches the file
//! system on behalf of the engine.

pub mod error;
pub mod loader;
pub mod repository;

pub use error::DatasetError;
pub use loader::{load_dataset, parse_dataset};
pub use repository::DatasetRepository;
