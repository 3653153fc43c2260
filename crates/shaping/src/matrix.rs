use core_types::{DataRecord, YearRange};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A dense geography x segment grid for one representative year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixData {
    pub year: i32,
    /// Row labels, sorted.
    pub geographies: Vec<String>,
    /// Column labels, sorted.
    pub segments: Vec<String>,
    /// `values[row][column]`; absent combinations are `0.0`.
    pub values: Vec<Vec<f64>>,
    /// Smallest positive cell, or `0.0` when no cell is positive.
    pub min_value: f64,
    /// Largest positive cell, or `0.0` when no cell is positive.
    pub max_value: f64,
}

impl MatrixData {
    pub fn value(&self, geography: &str, segment: &str) -> f64 {
        let row = self.geographies.iter().position(|g| g == geography);
        let column = self.segments.iter().position(|s| s == segment);
        match (row, column) {
            (Some(row), Some(column)) => self.values[row][column],
            _ => 0.0,
        }
    }
}

/// Builds the grid at the floored midpoint of `range`.
pub fn matrix(records: &[&DataRecord], range: YearRange) -> MatrixData {
    let year = range.midpoint();

    let mut sums: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    let mut geographies = BTreeSet::new();
    let mut segments = BTreeSet::new();
    for &record in records {
        geographies.insert(record.geography.as_str());
        segments.insert(record.segment.as_str());
        *sums
            .entry((record.geography.as_str(), record.segment.as_str()))
            .or_insert(0.0) += record.value_at(year);
    }

    let values: Vec<Vec<f64>> = geographies
        .iter()
        .map(|geography| {
            segments
                .iter()
                .map(|segment| sums.get(&(*geography, *segment)).copied().unwrap_or(0.0))
                .collect()
        })
        .collect();

    let populated = values.iter().flatten().copied().filter(|v| *v > 0.0);
    let (min_value, max_value) = populated
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
        .unwrap_or((0.0, 0.0));

    MatrixData {
        year,
        geographies: geographies.into_iter().map(str::to_string).collect(),
        segments: segments.into_iter().map(str::to_string).collect(),
        values,
        min_value,
        max_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::TimeSeries;

    fn record(geo: &str, segment: &str, points: &[(i32, f64)]) -> DataRecord {
        DataRecord::new(geo, "T", segment, points.iter().copied().collect::<TimeSeries>())
    }

    #[test]
    fn grid_is_dense_and_sorted() {
        let records = vec![
            record("US", "B", &[(2026, 4.0)]),
            record("DE", "A", &[(2026, 2.0)]),
            record("US", "A", &[(2026, 0.0)]),
        ];
        let refs: Vec<&DataRecord> = records.iter().collect();
        let grid = matrix(&refs, YearRange::new(2024, 2029).unwrap());
        assert_eq!(grid.year, 2026);
        assert_eq!(grid.geographies, vec!["DE", "US"]);
        assert_eq!(grid.segments, vec!["A", "B"]);
        assert_eq!(grid.values, vec![vec![2.0, 0.0], vec![0.0, 4.0]]);
        assert_eq!(grid.value("US", "B"), 4.0);
        assert_eq!(grid.value("FR", "B"), 0.0);
        assert_eq!((grid.min_value, grid.max_value), (2.0, 4.0));
    }

    #[test]
    fn no_positive_cell_means_zero_extrema() {
        let records = vec![record("US", "A", &[(2020, 5.0)])];
        let refs: Vec<&DataRecord> = records.iter().collect();
        let grid = matrix(&refs, YearRange::new(2024, 2024).unwrap());
        assert_eq!(grid.values, vec![vec![0.0]]);
        assert_eq!((grid.min_value, grid.max_value), (0.0, 0.0));

        let empty = matrix(&[], YearRange::default());
        assert!(empty.values.is_empty());
        assert_eq!(empty.min_value, 0.0);
    }

    #[test]
    fn extreme_year_range_still_picks_a_year() {
        let records = vec![record("US", "A", &[(i32::MAX - 1, 3.0)])];
        let refs: Vec<&DataRecord> = records.iter().collect();
        let grid = matrix(&refs, YearRange::new(i32::MAX - 1, i32::MAX).unwrap());
        assert_eq!(grid.year, i32::MAX - 1);
        assert_eq!(grid.values, vec![vec![3.0]]);
    }
}
