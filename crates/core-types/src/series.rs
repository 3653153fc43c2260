use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A sparse year -> value mapping.
///
/// Source documents key years either as numbers or as strings (`2024` vs `"2024"`);
/// both forms land on the same integer key, so lookups never depend on how the
/// year was spelled. Absent years read as `0.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TimeSeries(BTreeMap<i32, f64>);

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value recorded for `year`, or `0.0` when the year is absent.
    pub fn value_at(&self, year: i32) -> f64 {
        self.0.get(&year).copied().unwrap_or(0.0)
    }

    /// Same as [`TimeSeries::value_at`] for a year spelled as text.
    pub fn value_at_key(&self, key: &str) -> f64 {
        parse_year(key).map(|year| self.value_at(year)).unwrap_or(0.0)
    }

    pub fn get(&self, year: i32) -> Option<f64> {
        self.0.get(&year).copied()
    }

    pub fn insert(&mut self, year: i32, value: f64) {
        self.0.insert(year, value);
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.0.iter().map(|(year, value)| (*year, *value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(i32, f64)> for TimeSeries {
    fn from_iter<T: IntoIterator<Item = (i32, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parses `"2024"`, `" 2024 "` and `"2024.0"` to the same year.
pub fn parse_year(key: &str) -> Option<i32> {
    let key = key.trim();
    if let Ok(year) = key.parse::<i32>() {
        return Some(year);
    }
    match key.parse::<f64>() {
        Ok(value)
            if value.fract() == 0.0
                && value >= f64::from(i32::MIN)
                && value <= f64::from(i32::MAX) =>
        {
            Some(value as i32)
        }
        _ => None,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum YearKey {
    Number(i64),
    Text(String),
}

impl YearKey {
    fn year(&self) -> Option<i32> {
        match self {
            YearKey::Number(n) => i32::try_from(*n).ok(),
            YearKey::Text(s) => parse_year(s),
        }
    }
}

struct TimeSeriesVisitor;

impl<'de> Visitor<'de> for TimeSeriesVisitor {
    type Value = TimeSeries;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of year to numeric value")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut points = BTreeMap::new();
        while let Some((key, value)) = access.next_entry::<YearKey, Option<f64>>()? {
            // Unparseable years and null values are missing data, not errors.
            if let (Some(year), Some(value)) = (key.year(), value) {
                points.insert(year, value);
            }
        }
        Ok(TimeSeries(points))
    }
}

impl<'de> Deserialize<'de> for TimeSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(TimeSeriesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_and_numeric_keys_are_equivalent() {
        let series: TimeSeries =
            serde_json::from_str(r#"{"2024": 100.0, "2025": 120, "2026.0": 130.5}"#).unwrap();
        assert_eq!(series.value_at(2024), 100.0);
        assert_eq!(series.value_at_key("2025"), 120.0);
        assert_eq!(series.value_at(2026), 130.5);
        assert_eq!(series.value_at_key(" 2026 "), 130.5);
    }

    #[test]
    fn missing_and_null_years_read_as_zero() {
        let series: TimeSeries =
            serde_json::from_str(r#"{"2024": null, "abc": 5.0, "2030": 1.0}"#).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.value_at(2024), 0.0);
        assert_eq!(series.value_at(1999), 0.0);
        assert_eq!(series.value_at_key("not a year"), 0.0);
    }

    #[test]
    fn out_of_range_years_are_rejected() {
        assert_eq!(parse_year("1e20"), None);
        assert_eq!(parse_year("-3e10"), None);
        assert_eq!(parse_year("inf"), None);
        assert_eq!(parse_year("NaN"), None);
        assert_eq!(parse_year("2.03e3"), Some(2030));

        let series: TimeSeries = serde_json::from_str(r#"{"1e20": 9.0, "2024": 1.0}"#).unwrap();
        assert_eq!(series.years().collect::<Vec<_>>(), vec![2024]);
    }

    #[test]
    fn serializes_with_year_keys() {
        let series: TimeSeries = [(2024, 1.5), (2025, 2.0)].into_iter().collect();
        let json = serde_json::to_string(&series).unwrap();
        assert_eq!(json, r#"{"2024":1.5,"2025":2.0}"#);
    }
}
