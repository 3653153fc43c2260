use crate::error::DatasetError;
use crate::loader::load_dataset;
use core_types::{DataKind, DataRecord, Dataset, GeographyDimension, Metadata, SegmentDimension};
use diagnostics::DiagnosticsSink;
use hierarchy::{GeographyResolver, HierarchyResolver};
use std::path::Path;

/// Read-only access to one loaded dataset.
///
/// Wraps the immutable document and answers the lookups the CLI and other callers
/// need; it never hands out mutable access.
#[derive(Debug, Clone)]
pub struct DatasetRepository {
    dataset: Dataset,
}

impl DatasetRepository {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    pub fn open(path: &Path) -> Result<Self, DatasetError> {
        Ok(Self::new(load_dataset(path)?))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn metadata(&self) -> &Metadata {
        &self.dataset.metadata
    }

    pub fn records(&self, kind: DataKind) -> &[DataRecord] {
        self.dataset.records(kind)
    }

    /// Like [`DatasetRepository::records`], but an empty collection is an error.
    pub fn require_records(&self, kind: DataKind) -> Result<&[DataRecord], DatasetError> {
        let records = self.records(kind);
        if records.is_empty() {
            return Err(DatasetError::NoRecords(match kind {
                DataKind::Value => "value",
                DataKind::Volume => "volume",
            }));
        }
        Ok(records)
    }

    pub fn geographies(&self) -> &GeographyDimension {
        &self.dataset.dimensions.geographies
    }

    pub fn segment_dimension(&self, segment_type: &str) -> Option<&SegmentDimension> {
        self.dataset.dimensions.segments.get(segment_type)
    }

    /// Segment types declared in the dimensions, sorted.
    pub fn segment_types(&self) -> impl Iterator<Item = &str> {
        self.dataset.dimensions.segments.keys().map(String::as_str)
    }

    /// Checks every dimension tree and reports anomalies to `sink`.
    ///
    /// Returns the total number of anomalies; malformed trees are still usable.
    pub fn validate_dimensions(&self, sink: &dyn DiagnosticsSink) -> usize {
        let mut anomalies = GeographyResolver::new(self.geographies()).validate(sink);
        for (segment_type, dimension) in &self.dataset.dimensions.segments {
            if let Some(map) = dimension.hierarchy() {
                anomalies += HierarchyResolver::new(map, sink).validate(segment_type);
            }
        }
        if anomalies == 0 {
            tracing::debug!("dataset dimensions validated");
        }
        anomalies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_dataset;
    use diagnostics::{DiagnosticEvent, MemorySink};

    const DOCUMENT: &str = r#"{
        "metadata": {"years": [2024, 2032]},
        "dimensions": {
            "geographies": {
                "global": ["India"],
                "regions": ["North India", "South India"],
                "countries": {"North India": ["Delhi"], "South India": ["Kerala", "Delhi"]}
            },
            "segments": {
                "By Product": {"type": "hierarchical", "items": ["Blends", "Garam Masala"],
                               "hierarchy": {"Blends": ["Garam Masala"], "Mixes": ["Garam Masala"]}},
                "By Form": {"type": "flat", "items": ["Powder"], "hierarchy": {}}
            }
        },
        "data": {"value": {"geography_segment_matrix": []}}
    }"#;

    #[test]
    fn exposes_dimensions() {
        let repo = DatasetRepository::new(parse_dataset(DOCUMENT).unwrap());
        assert_eq!(repo.segment_types().collect::<Vec<_>>(), vec!["By Form", "By Product"]);
        assert!(repo.segment_dimension("By Form").unwrap().hierarchy().is_none());
        assert_eq!(repo.geographies().root(), Some("India"));
        assert!(matches!(repo.require_records(DataKind::Value), Err(DatasetError::NoRecords("value"))));
    }

    #[test]
    fn validation_reports_every_anomaly() {
        let repo = DatasetRepository::new(parse_dataset(DOCUMENT).unwrap());
        let sink = MemorySink::new();
        assert_eq!(repo.validate_dimensions(&sink), 2);
        let events = sink.events();
        assert!(events.iter().any(|e| matches!(e, DiagnosticEvent::CountryInMultipleRegions { country, .. } if country == "Delhi")));
        assert!(events.iter().any(|e| matches!(e, DiagnosticEvent::MultipleParents { child, .. } if child == "Garam Masala")));
    }
}
