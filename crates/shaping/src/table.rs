use core_types::{DataRecord, YearRange};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

/// One table line per record, with a sparkline series over the selected range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub geography: String,
    pub segment_type: String,
    pub segment: String,
    /// Value at the first year of the range.
    pub base_value: f64,
    /// Value at the last year of the range.
    pub end_value: f64,
    /// The record's precomputed CAGR, passed through untouched.
    pub cagr: Option<f64>,
    /// `(end - base) / base * 100`, or `0.0` when there is no positive base.
    pub growth_pct: f64,
    pub series: Vec<YearValue>,
}

/// Percentage change from `base` to `end`; undefined growth reads as `0.0`.
pub fn percent_growth(base: f64, end: f64) -> f64 {
    if base <= 0.0 {
        return 0.0;
    }
    let growth = (end - base) / base * 100.0;
    if growth.is_finite() { growth } else { 0.0 }
}

pub fn table_rows(records: &[&DataRecord], range: YearRange) -> Vec<TableRow> {
    records
        .iter()
        .map(|record| {
            let base_value = record.value_at(range.start());
            let end_value = record.value_at(range.end());
            TableRow {
                geography: record.geography.clone(),
                segment_type: record.segment_type.clone(),
                segment: record.segment.clone(),
                base_value,
                end_value,
                cagr: record.cagr,
                growth_pct: percent_growth(base_value, end_value),
                series: range
                    .years()
                    .map(|year| YearValue { year, value: record.value_at(year) })
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::TimeSeries;

    #[test]
    fn row_carries_base_end_and_growth() {
        let record = DataRecord::new(
            "A",
            "T",
            "X",
            [(2024, 100.0), (2028, 150.0)].into_iter().collect::<TimeSeries>(),
        );
        let rows = table_rows(&[&record], YearRange::new(2024, 2028).unwrap());
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.base_value, 100.0);
        assert_eq!(row.end_value, 150.0);
        assert_eq!(row.growth_pct, 50.0);
        assert_eq!(row.cagr, None);
        assert_eq!(row.series.len(), 5);
        assert_eq!(row.series[2], YearValue { year: 2026, value: 0.0 });
    }

    #[test]
    fn growth_without_base_is_zero() {
        assert_eq!(percent_growth(0.0, 150.0), 0.0);
        assert_eq!(percent_growth(-5.0, 150.0), 0.0);
        assert_eq!(percent_growth(200.0, 100.0), -50.0);
    }
}
