use core_types::{AdvancedSegmentSelection, DataRecord, FilterState, SegmentLevel};
use diagnostics::{DiagnosticEvent, DiagnosticsSink};
use hierarchy::stored_ancestor_within;

/// Outcome of matching one record against an advanced segment selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentMatch {
    /// A selected (type, segment) pair names this record.
    Direct,
    /// A leaf whose selected ancestor already covers it; never counted on its own.
    CoveredByParent,
    NoMatch,
}

impl SegmentMatch {
    pub fn is_included(&self) -> bool {
        matches!(self, SegmentMatch::Direct)
    }
}

/// Reduces a record collection to the rows a filter state selects.
///
/// Stateless apart from the sink: every call reads the filter state afresh.
pub struct FilterEngine<'s> {
    sink: &'s dyn DiagnosticsSink,
}

impl<'s> FilterEngine<'s> {
    pub fn new(sink: &'s dyn DiagnosticsSink) -> Self {
        Self { sink }
    }

    /// The records passing both the geography and the segment predicate, in input order.
    pub fn apply<'r>(&self, records: &'r [DataRecord], state: &FilterState) -> Vec<&'r DataRecord> {
        let advanced = state.active_advanced();
        let mut suppressed_by_parent = 0;

        let kept: Vec<&DataRecord> = records
            .iter()
            .filter(|record| geography_matches(record, state))
            .filter(|record| match advanced {
                Some(selection) => {
                    let verdict = advanced_match(record, selection);
                    if verdict == SegmentMatch::CoveredByParent {
                        suppressed_by_parent += 1;
                    }
                    verdict.is_included()
                }
                None => single_type_matches(record, state),
            })
            .collect();

        tracing::debug!(
            input = records.len(),
            output = kept.len(),
            advanced = advanced.is_some(),
            suppressed_by_parent,
            "filter applied"
        );
        self.sink.record(DiagnosticEvent::FilterApplied {
            input: records.len(),
            output: kept.len(),
            advanced: advanced.is_some(),
            suppressed_by_parent,
        });
        kept
    }
}

/// An empty geography selection is no restriction; otherwise the name must be selected
/// exactly. Regions are not expanded to their countries here.
pub fn geography_matches(record: &DataRecord, state: &FilterState) -> bool {
    state.geographies.is_empty() || state.geographies.contains(&record.geography)
}

/// Matches a record against explicit (type, segment) pairs.
///
/// Only a direct match includes a record. A leaf whose level-2 or level-3 ancestor
/// is selected within the same segment type is reported as covered by that parent.
pub fn advanced_match(record: &DataRecord, selection: &AdvancedSegmentSelection) -> SegmentMatch {
    if selection.contains(&record.segment_type, &record.segment) {
        return SegmentMatch::Direct;
    }
    if record.segment_level == SegmentLevel::Leaf {
        let covered = selection
            .segments_of_type(&record.segment_type)
            .any(|selected| stored_ancestor_within(&record.segment_hierarchy, selected, 2..=3));
        if covered {
            return SegmentMatch::CoveredByParent;
        }
    }
    SegmentMatch::NoMatch
}

/// The single-type path: the active type must match (when one is set), and an
/// empty segment list selects every segment of it.
pub fn single_type_matches(record: &DataRecord, state: &FilterState) -> bool {
    let type_matches = state
        .segment_type
        .as_deref()
        .is_none_or(|segment_type| record.segment_type == segment_type);
    type_matches && (state.segments.is_empty() || state.segments.contains(&record.segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{SegmentHierarchy, SegmentSelection, TimeSeries};
    use diagnostics::{MemorySink, NullSink};

    fn record(geo: &str, segment_type: &str, segment: &str) -> DataRecord {
        DataRecord::new(geo, segment_type, segment, TimeSeries::new())
    }

    fn leaf_under(geo: &str, segment_type: &str, parent: &str, segment: &str) -> DataRecord {
        let mut r = record(geo, segment_type, segment);
        r.segment_hierarchy = SegmentHierarchy {
            level_1: segment_type.into(),
            level_2: parent.into(),
            level_3: segment.into(),
            level_4: String::new(),
        };
        r
    }

    fn advanced(pairs: &[(&str, &str)]) -> FilterState {
        FilterState {
            advanced_segments: Some(AdvancedSegmentSelection::new(
                pairs.iter().map(|(t, s)| SegmentSelection::new(*t, *s)).collect(),
            )),
            ..FilterState::default()
        }
    }

    #[test]
    fn geography_is_matched_exactly() {
        let records = vec![record("US", "T", "X"), record("DE", "T", "X"), record("EU", "T", "X")];
        let state = FilterState {
            geographies: ["US".to_string(), "EU".to_string()].into(),
            ..FilterState::default()
        };
        let kept = FilterEngine::new(&NullSink).apply(&records, &state);
        let geos: Vec<&str> = kept.iter().map(|r| r.geography.as_str()).collect();
        assert_eq!(geos, vec!["US", "EU"]);
    }

    #[test]
    fn selected_parent_suppresses_its_leaf() {
        let parent = record("US", "T", "Parent");
        let child = leaf_under("US", "T", "Parent", "Child");
        let records = vec![parent, child];
        let sink = MemorySink::new();
        let kept = FilterEngine::new(&sink).apply(&records, &advanced(&[("T", "Parent")]));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].segment, "Parent");
        assert_eq!(
            sink.events(),
            vec![DiagnosticEvent::FilterApplied {
                input: 2,
                output: 1,
                advanced: true,
                suppressed_by_parent: 1,
            }]
        );
    }

    #[test]
    fn coverage_stops_at_level_three() {
        let mut deep = record("US", "T", "Leaf");
        deep.segment_hierarchy = SegmentHierarchy {
            level_1: "T".into(),
            level_2: "Top".into(),
            level_3: "Mid".into(),
            level_4: "Low".into(),
        };
        let verdict = |segment: &str| {
            advanced_match(&deep, &AdvancedSegmentSelection::new(vec![SegmentSelection::new("T", segment)]))
        };
        assert_eq!(verdict("Top"), SegmentMatch::CoveredByParent);
        assert_eq!(verdict("Mid"), SegmentMatch::CoveredByParent);
        assert_eq!(verdict("Low"), SegmentMatch::NoMatch);
        assert_eq!(verdict("Leaf"), SegmentMatch::Direct);
        assert!(verdict("Leaf").is_included());
        assert!(!verdict("Top").is_included());
    }

    #[test]
    fn direct_selection_of_leaf_wins_over_parent_coverage() {
        let child = leaf_under("US", "T", "Parent", "Child");
        let selection = AdvancedSegmentSelection::new(vec![
            SegmentSelection::new("T", "Parent"),
            SegmentSelection::new("T", "Child"),
        ]);
        assert_eq!(advanced_match(&child, &selection), SegmentMatch::Direct);
    }

    #[test]
    fn ancestor_coverage_is_scoped_to_segment_type() {
        let child = leaf_under("US", "Other", "Parent", "Child");
        let selection = AdvancedSegmentSelection::new(vec![SegmentSelection::new("T", "Parent")]);
        assert_eq!(advanced_match(&child, &selection), SegmentMatch::NoMatch);
    }

    #[test]
    fn advanced_pairs_compare_across_types() {
        let records = vec![
            record("US", "By Product", "Pepper"),
            record("US", "By Form", "Powder"),
            record("US", "By Form", "Whole"),
        ];
        let state = advanced(&[("By Product", "Pepper"), ("By Form", "Powder")]);
        let kept = FilterEngine::new(&NullSink).apply(&records, &state);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn single_type_path_requires_type_and_exact_segment() {
        let records = vec![
            record("US", "By Product", "Pepper"),
            record("US", "By Product", "Salt"),
            record("US", "By Form", "Pepper"),
        ];
        let mut state = FilterState {
            segment_type: Some("By Product".into()),
            ..FilterState::default()
        };
        assert_eq!(FilterEngine::new(&NullSink).apply(&records, &state).len(), 2);

        state.segments = ["Pepper".to_string()].into();
        let kept = FilterEngine::new(&NullSink).apply(&records, &state);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].segment_type, "By Product");
    }

    #[test]
    fn empty_advanced_selection_falls_back_to_single_type() {
        let records = vec![record("US", "T", "X")];
        let state = FilterState {
            advanced_segments: Some(AdvancedSegmentSelection::default()),
            ..FilterState::default()
        };
        assert_eq!(FilterEngine::new(&NullSink).apply(&records, &state).len(), 1);
    }
}
