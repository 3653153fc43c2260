use diagnostics::ExclusionReason;
use serde::{Deserialize, Serialize};

/// Metrics of one top-level segment unit (the segment plus all its descendants).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentMetrics {
    pub segment: String,
    /// Number of segment names aggregated into this unit.
    pub members: usize,
    pub base_value: f64,
    pub forecast_value: f64,
    pub absolute_growth: f64,
    /// Signed CAGR in percent, capped above.
    pub cagr_pct: f64,
    /// Share of the geography's base-year total across all segment types, in percent.
    pub market_share_pct: f64,

    // Normalized 0-100 comparison indices.
    pub growth_index: f64,
    pub share_index: f64,
    pub opportunity_index: f64,
}

/// A unit left out of the comparison set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedUnit {
    pub segment: String,
    pub reason: ExclusionReason,
}

/// Output of the metrics engine for one geography and segment type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub geography: String,
    pub segment_type: String,
    pub base_year: i32,
    pub forecast_year: i32,
    /// Base-year total of every record in the geography, all segment types.
    pub geography_base_total: f64,
    /// Qualifying units in top-level segment order.
    pub segments: Vec<SegmentMetrics>,
    pub excluded: Vec<ExcludedUnit>,
}

impl MetricsReport {
    pub fn new(geography: &str, segment_type: &str, base_year: i32, forecast_year: i32) -> Self {
        Self {
            geography: geography.to_string(),
            segment_type: segment_type.to_string(),
            base_year,
            forecast_year,
            geography_base_total: 0.0,
            segments: Vec::new(),
            excluded: Vec::new(),
        }
    }

    pub fn segment(&self, name: &str) -> Option<&SegmentMetrics> {
        self.segments.iter().find(|s| s.segment == name)
    }
}
