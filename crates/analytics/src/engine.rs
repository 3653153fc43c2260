use crate::error::AnalyticsError;
use crate::normalize::{finite_max, normalized_index};
use crate::report::{ExcludedUnit, MetricsReport, SegmentMetrics};
use core_types::{Adjacency, DataRecord, SegmentDimension, DEFAULT_BASE_YEAR, DEFAULT_FORECAST_YEAR};
use diagnostics::{DiagnosticEvent, DiagnosticsSink, ExclusionReason};
use hierarchy::HierarchyResolver;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Years and numeric safeguards for growth metrics. Always supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    pub base_year: i32,
    pub forecast_year: i32,
    /// Growth ratios above this multiple are clamped before exponentiation.
    pub max_growth_multiple: f64,
    /// Upper bound of any reported CAGR, in percent.
    pub max_cagr_pct: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            base_year: DEFAULT_BASE_YEAR,
            forecast_year: DEFAULT_FORECAST_YEAR,
            max_growth_multiple: 100.0,
            max_cagr_pct: 100.0,
        }
    }
}

/// A stateless calculator for growth, share and opportunity metrics of segment units.
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    params: AnalysisParams,
}

impl MetricsEngine {
    pub fn new(params: AnalysisParams) -> Result<Self, AnalyticsError> {
        if params.forecast_year <= params.base_year {
            return Err(AnalyticsError::InvalidYears {
                base: params.base_year,
                forecast: params.forecast_year,
            });
        }
        if !(params.max_growth_multiple >= 1.0) {
            return Err(AnalyticsError::InvalidLimit {
                name: "max_growth_multiple",
                value: params.max_growth_multiple,
            });
        }
        if !(params.max_cagr_pct > 0.0) {
            return Err(AnalyticsError::InvalidLimit {
                name: "max_cagr_pct",
                value: params.max_cagr_pct,
            });
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    /// Signed CAGR in percent between the configured years.
    ///
    /// `0.0` unless both values are strictly positive. The growth ratio is capped at
    /// `max_growth_multiple` and the result at `max_cagr_pct`.
    pub fn cagr(&self, base_value: f64, forecast_value: f64) -> f64 {
        if !(base_value > 0.0 && forecast_value > 0.0) {
            return 0.0;
        }
        let span = f64::from(self.params.forecast_year) - f64::from(self.params.base_year);
        let ratio = (forecast_value / base_value).min(self.params.max_growth_multiple);
        let cagr = (ratio.powf(1.0 / span) - 1.0) * 100.0;
        if cagr.is_finite() { cagr.min(self.params.max_cagr_pct) } else { 0.0 }
    }

    /// CAGR as fed into the growth index: never negative.
    pub fn index_cagr(&self, base_value: f64, forecast_value: f64) -> f64 {
        self.cagr(base_value, forecast_value).max(0.0)
    }

    /// Computes metrics for every top-level segment of `segment_type` in `geography`.
    ///
    /// `records` is the filtered record set; market share is measured against every
    /// record of the geography in it, whatever its segment type. A missing
    /// `dimension` treats every segment found in the records as standalone.
    pub fn compute(
        &self,
        geography: &str,
        segment_type: &str,
        records: &[&DataRecord],
        dimension: Option<&SegmentDimension>,
        sink: &dyn DiagnosticsSink,
    ) -> MetricsReport {
        let AnalysisParams { base_year, forecast_year, .. } = self.params;
        let mut report = MetricsReport::new(geography, segment_type, base_year, forecast_year);

        let in_geography: Vec<&DataRecord> =
            records.iter().copied().filter(|r| r.geography == geography).collect();
        let of_type: Vec<&DataRecord> =
            in_geography.iter().copied().filter(|r| r.segment_type == segment_type).collect();
        report.geography_base_total = in_geography.iter().map(|r| r.value_at(base_year)).sum();

        let empty = Adjacency::new();
        let hierarchy = dimension.and_then(SegmentDimension::hierarchy).unwrap_or(&empty);
        let mut items: BTreeSet<String> = dimension
            .map(|d| d.items().iter().cloned().collect())
            .unwrap_or_default();
        items.extend(of_type.iter().map(|r| r.segment.clone()));
        let items: Vec<String> = items.into_iter().collect();

        let resolver = HierarchyResolver::new(hierarchy, sink);
        let mut units: Vec<(String, BTreeSet<String>)> = resolver
            .roots_of(&items)
            .into_iter()
            .map(|root| {
                let unit = resolver.unit_of(&root);
                (root, unit)
            })
            .collect();

        // A segment no root reaches (a cycle without an entry point) stands alone.
        let covered: BTreeSet<&str> =
            units.iter().flat_map(|(_, unit)| unit.iter().map(String::as_str)).collect();
        let unrooted: BTreeSet<&str> = of_type
            .iter()
            .map(|r| r.segment.as_str())
            .filter(|segment| !covered.contains(segment))
            .collect();
        for segment in unrooted {
            sink.record(DiagnosticEvent::UnrootedSegment {
                segment_type: segment_type.to_string(),
                segment: segment.to_string(),
            });
            units.push((segment.to_string(), BTreeSet::from([segment.to_string()])));
        }

        let mut candidates = Vec::new();
        for (root, unit) in units {
            let members: Vec<&DataRecord> =
                of_type.iter().copied().filter(|r| unit.contains(&r.segment)).collect();
            let base_value: f64 = members.iter().map(|r| r.value_at(base_year)).sum();
            let forecast_value: f64 = members.iter().map(|r| r.value_at(forecast_year)).sum();
            let market_share_pct = base_value * 100.0 / report.geography_base_total;
            let cagr_pct = self.cagr(base_value, forecast_value);

            let exclusion = if !(base_value > 0.0) {
                Some(ExclusionReason::NonPositiveBase)
            } else if !(forecast_value > 0.0) {
                Some(ExclusionReason::NonPositiveForecast)
            } else if !market_share_pct.is_finite() {
                Some(ExclusionReason::NonFiniteShare)
            } else if !cagr_pct.is_finite() {
                Some(ExclusionReason::NonFiniteCagr)
            } else {
                None
            };

            if let Some(reason) = exclusion {
                sink.record(DiagnosticEvent::UnitExcluded { segment: root.clone(), reason });
                report.excluded.push(ExcludedUnit { segment: root, reason });
                continue;
            }

            candidates.push(SegmentMetrics {
                segment: root,
                members: unit.len(),
                base_value,
                forecast_value,
                absolute_growth: forecast_value - base_value,
                cagr_pct,
                market_share_pct,
                growth_index: 0.0,
                share_index: 0.0,
                opportunity_index: 0.0,
            });
        }

        let max_growth = finite_max(candidates.iter().map(|c| self.index_cagr(c.base_value, c.forecast_value)));
        let max_share = finite_max(candidates.iter().map(|c| c.market_share_pct));
        let max_opportunity = finite_max(candidates.iter().map(|c| c.absolute_growth));
        for unit in &mut candidates {
            unit.growth_index =
                normalized_index(self.index_cagr(unit.base_value, unit.forecast_value), max_growth);
            unit.share_index = normalized_index(unit.market_share_pct, max_share);
            unit.opportunity_index = normalized_index(unit.absolute_growth, max_opportunity);
        }
        report.segments = candidates;

        tracing::debug!(
            geography,
            segment_type,
            qualifying = report.segments.len(),
            excluded = report.excluded.len(),
            "segment metrics computed"
        );
        report
    }
}
