use core_types::DataRecord;
use rust_decimal::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub geography: String,
    pub segment: String,
    pub value: f64,
    /// `value` rounded half away from zero to two decimal places. Serialized as a
    /// JSON number, like `value`.
    #[serde(with = "rust_decimal::serde::float")]
    pub display_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapData {
    pub year: i32,
    /// Sorted by geography, then segment.
    pub cells: Vec<HeatmapCell>,
    pub min_value: f64,
    pub max_value: f64,
}

/// Rounds to two decimals for display. Values `Decimal` cannot hold display as zero.
pub fn display_round(value: f64) -> Decimal {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .unwrap_or_default()
}

/// One cell per (geography, segment) pair present in `records`, valued at `year`.
pub fn heatmap(records: &[&DataRecord], year: i32) -> HeatmapData {
    let mut sums: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for &record in records {
        *sums
            .entry((record.geography.as_str(), record.segment.as_str()))
            .or_insert(0.0) += record.value_at(year);
    }

    let cells: Vec<HeatmapCell> = sums
        .into_iter()
        .map(|((geography, segment), value)| HeatmapCell {
            geography: geography.to_string(),
            segment: segment.to_string(),
            value,
            display_value: display_round(value),
        })
        .collect();

    let (min_value, max_value) = cells
        .iter()
        .map(|cell| cell.value)
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
        .unwrap_or((0.0, 0.0));

    HeatmapData { year, cells, min_value, max_value }
}
