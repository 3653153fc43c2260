use crate::grouping::{KEY_SEPARATOR, requires_stacking, series_key};
use core_types::{DataRecord, FilterState};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One x-axis position of a bar or line chart: a year and the summed value per key.
///
/// Serializes flat, e.g. `{"year": 2024, "US::SegA": 10.0, "DE::SegA": 4.0}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub year: i32,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl SeriesPoint {
    pub fn value(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    /// Sum of every stacked contribution to one primary bar.
    pub fn primary_total(&self, primary: &str) -> f64 {
        self.values
            .iter()
            .filter(|(key, _)| {
                key.strip_prefix(primary)
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with(KEY_SEPARATOR))
            })
            .map(|(_, value)| value)
            .sum()
    }
}

/// Grouped (and possibly stacked) series for bar and line charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesData {
    pub points: Vec<SeriesPoint>,
    /// Every key emitted, sorted.
    pub keys: Vec<String>,
    pub stacked: bool,
}

/// Groups records by the view mode's key and sums them per year of the selected range.
///
/// Every key appears in every point; a record missing a year contributes `0.0`.
pub fn grouped_series(records: &[&DataRecord], state: &FilterState) -> SeriesData {
    let stacked = requires_stacking(state);
    let keyed: Vec<(String, &DataRecord)> = records
        .iter()
        .map(|record| (series_key(record, state.view_mode, stacked), *record))
        .collect();

    let points = state
        .year_range
        .years()
        .map(|year| {
            let mut values = BTreeMap::new();
            for (key, record) in &keyed {
                *values.entry(key.clone()).or_insert(0.0) += record.value_at(year);
            }
            SeriesPoint { year, values }
        })
        .collect();

    let keys: BTreeSet<String> = keyed.into_iter().map(|(key, _)| key).collect();
    tracing::debug!(keys = keys.len(), stacked, "series shaped");

    SeriesData { points, keys: keys.into_iter().collect(), stacked }
}
