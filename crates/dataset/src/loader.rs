use crate::error::DatasetError;
use core_types::Dataset;
use std::path::Path;

/// Reads and deserializes the dataset document at `path`.
///
/// The document is loaded once per session; everything downstream borrows it.
pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|source| DatasetError::Io { path: path.to_path_buf(), source })?;
    let dataset = parse_dataset(&raw)?;
    tracing::info!(
        path = %path.display(),
        value_records = dataset.data.value.geography_segment_matrix.len(),
        volume_records = dataset.data.volume.geography_segment_matrix.len(),
        segment_types = dataset.dimensions.segments.len(),
        "dataset loaded"
    );
    Ok(dataset)
}

pub fn parse_dataset(raw: &str) -> Result<Dataset, DatasetError> {
    Ok(serde_json::from_str(raw)?)
}
