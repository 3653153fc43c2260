use core_types::{DataRecord, Dimension, FilterState, ViewMode};
use std::collections::BTreeMap;

/// Joins a primary and a secondary group name into one stacked key.
pub const KEY_SEPARATOR: &str = "::";

pub fn composite_key(primary: &str, secondary: &str) -> String {
    format!("{primary}{KEY_SEPARATOR}{secondary}")
}

/// Splits a stacked key back into `(primary, secondary)`; `None` for plain keys.
pub fn split_key(key: &str) -> Option<(&str, &str)> {
    key.split_once(KEY_SEPARATOR)
}

/// The record's name along one dimension.
pub fn dimension_value(record: &DataRecord, dimension: Dimension) -> &str {
    match dimension {
        Dimension::Geography => &record.geography,
        Dimension::Segment => &record.segment,
    }
}

/// Whether bars must be split into secondary-dimension stacks.
///
/// Decided purely by selection arity: segment-mode with several geographies
/// selected, or geography-mode with several segments selected.
pub fn requires_stacking(state: &FilterState) -> bool {
    match state.view_mode {
        ViewMode::SegmentMode => state.selected_geography_count() > 1,
        ViewMode::GeographyMode => state.selected_segment_count() > 1,
        ViewMode::Matrix => false,
    }
}

/// The series key a record contributes to under the given view mode.
pub fn series_key(record: &DataRecord, mode: ViewMode, stacked: bool) -> String {
    match mode {
        ViewMode::Matrix => composite_key(&record.geography, &record.segment),
        _ => {
            let primary = mode.primary_dimension();
            let name = dimension_value(record, primary);
            if stacked {
                composite_key(name, dimension_value(record, primary.opposite()))
            } else {
                name.to_string()
            }
        }
    }
}

/// Sum of every record's value at `year`.
pub fn total_at(records: &[&DataRecord], year: i32) -> f64 {
    records.iter().map(|record| record.value_at(year)).sum()
}

/// Per-group sums at `year`, keyed by the records' names along `dimension`.
pub fn group_totals<'r>(
    records: &[&'r DataRecord],
    dimension: Dimension,
    year: i32,
) -> BTreeMap<&'r str, f64> {
    let mut totals = BTreeMap::new();
    for &record in records {
        *totals.entry(dimension_value(record, dimension)).or_insert(0.0) += record.value_at(year);
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{AdvancedSegmentSelection, SegmentSelection, TimeSeries};

    #[test]
    fn composite_keys_round_trip() {
        let key = composite_key("US", "SegA");
        assert_eq!(key, "US::SegA");
        assert_eq!(split_key(&key), Some(("US", "SegA")));
        assert_eq!(split_key("US"), None);
    }

    #[test]
    fn stacking_is_decided_by_arity() {
        let mut state = FilterState {
            geographies: ["US".to_string(), "DE".to_string()].into(),
            ..FilterState::default()
        };
        assert!(requires_stacking(&state));

        state.view_mode = ViewMode::GeographyMode;
        assert!(!requires_stacking(&state));

        state.advanced_segments = Some(AdvancedSegmentSelection::new(vec![
            SegmentSelection::new("T", "SegA"),
            SegmentSelection::new("T", "SegB"),
        ]));
        assert!(requires_stacking(&state));

        state.view_mode = ViewMode::Matrix;
        assert!(!requires_stacking(&state));
    }

    #[test]
    fn series_key_follows_mode() {
        let record = DataRecord::new("US", "T", "SegA", TimeSeries::new());
        assert_eq!(series_key(&record, ViewMode::SegmentMode, false), "SegA");
        assert_eq!(series_key(&record, ViewMode::SegmentMode, true), "SegA::US");
        assert_eq!(series_key(&record, ViewMode::GeographyMode, true), "US::SegA");
        assert_eq!(series_key(&record, ViewMode::Matrix, false), "US::SegA");
    }
}
