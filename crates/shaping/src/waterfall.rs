use crate::grouping::{group_totals, total_at};
use core_types::{DataRecord, Dimension, YearRange};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarKind {
    Start,
    Increase,
    Decrease,
    End,
}

/// One waterfall bar. `value` is always a magnitude; `kind` carries the direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallBar {
    pub label: String,
    pub value: f64,
    pub kind: BarKind,
}

pub const START_LABEL: &str = "Start";
pub const END_LABEL: &str = "End";

/// Start total, increases (largest first), decreases (largest first), end total.
///
/// Groups are formed along `dimension`; a group's contribution is its end-year
/// aggregate minus its start-year aggregate. Groups that did not move emit no bar.
pub fn waterfall(records: &[&DataRecord], dimension: Dimension, range: YearRange) -> Vec<WaterfallBar> {
    let start_totals = group_totals(records, dimension, range.start());
    let end_totals = group_totals(records, dimension, range.end());
    let groups: BTreeSet<&str> = start_totals.keys().chain(end_totals.keys()).copied().collect();

    let mut increases = Vec::new();
    let mut decreases = Vec::new();
    for group in groups {
        let start = start_totals.get(group).copied().unwrap_or(0.0);
        let end = end_totals.get(group).copied().unwrap_or(0.0);
        let contribution = end - start;
        if contribution > 0.0 {
            increases.push(bar(group, contribution, BarKind::Increase));
        } else if contribution < 0.0 {
            decreases.push(bar(group, contribution.abs(), BarKind::Decrease));
        }
    }
    increases.sort_by(by_magnitude_desc);
    decreases.sort_by(by_magnitude_desc);

    let mut bars = Vec::with_capacity(increases.len() + decreases.len() + 2);
    bars.push(bar(START_LABEL, total_at(records, range.start()), BarKind::Start));
    bars.extend(increases);
    bars.extend(decreases);
    bars.push(bar(END_LABEL, total_at(records, range.end()), BarKind::End));
    bars
}

fn bar(label: &str, value: f64, kind: BarKind) -> WaterfallBar {
    WaterfallBar { label: label.to_string(), value, kind }
}

fn by_magnitude_desc(a: &WaterfallBar, b: &WaterfallBar) -> Ordering {
    b.value.total_cmp(&a.value).then_with(|| a.label.cmp(&b.label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::TimeSeries;

    fn record(geo: &str, segment: &str, start: f64, end: f64) -> DataRecord {
        DataRecord::new(geo, "T", segment, [(2024, start), (2028, end)].into_iter().collect::<TimeSeries>())
    }

    #[test]
    fn bars_follow_presentation_order() {
        let records = vec![
            record("US", "Small Up", 10.0, 12.0),
            record("US", "Big Up", 10.0, 30.0),
            record("DE", "Big Up", 5.0, 5.0),
            record("US", "Down", 20.0, 15.0),
            record("US", "Crash", 40.0, 10.0),
            record("US", "Flat", 7.0, 7.0),
        ];
        let refs: Vec<&DataRecord> = records.iter().collect();
        let bars = waterfall(&refs, Dimension::Segment, YearRange::new(2024, 2028).unwrap());

        let labels: Vec<&str> = bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Start", "Big Up", "Small Up", "Crash", "Down", "End"]);
        assert_eq!(bars[0].value, 92.0);
        assert_eq!(bars[1].value, 20.0);
        assert_eq!(bars[3], WaterfallBar { label: "Crash".into(), value: 30.0, kind: BarKind::Decrease });
        assert_eq!(bars[5].value, 79.0);
    }

    #[test]
    fn groups_by_geography_when_asked() {
        let records = vec![record("US", "A", 1.0, 3.0), record("US", "B", 1.0, 2.0), record("DE", "A", 4.0, 1.0)];
        let refs: Vec<&DataRecord> = records.iter().collect();
        let bars = waterfall(&refs, Dimension::Geography, YearRange::new(2024, 2028).unwrap());
        let labels: Vec<&str> = bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Start", "US", "DE", "End"]);
        assert_eq!(bars[1].value, 3.0);
    }

    #[test]
    fn empty_input_still_has_start_and_end() {
        let bars = waterfall(&[], Dimension::Segment, YearRange::default());
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].kind, BarKind::Start);
        assert_eq!(bars[1].kind, BarKind::End);
        assert_eq!(bars[1].value, 0.0);
    }
}
