use core_types::{DataRecord, FilterState, TimeSeries};
use diagnostics::NullSink;
use filter::FilterEngine;
use proptest::prelude::*;

fn arbitrary_record() -> impl Strategy<Value = DataRecord> {
    ("[A-D]", "[S-T]", "[a-e]", prop::collection::btree_map(2020i32..2030, 0.0f64..1000.0, 0..5))
        .prop_map(|(geo, segment_type, segment, points)| {
            DataRecord::new(geo, segment_type, segment, points.into_iter().collect::<TimeSeries>())
        })
}

proptest! {
    #[test]
    fn empty_filters_keep_every_record(records in prop::collection::vec(arbitrary_record(), 0..30)) {
        let kept = FilterEngine::new(&NullSink).apply(&records, &FilterState::default());
        prop_assert_eq!(kept.len(), records.len());
        for (kept, original) in kept.iter().zip(records.iter()) {
            prop_assert!(std::ptr::eq(*kept, original));
        }
    }

    #[test]
    fn filtering_is_idempotent(
        records in prop::collection::vec(arbitrary_record(), 0..30),
        geos in prop::collection::btree_set("[A-D]", 0..3),
        segments in prop::collection::btree_set("[a-e]", 0..3),
    ) {
        let state = FilterState {
            geographies: geos,
            segments,
            segment_type: Some("S".to_string()),
            ..FilterState::default()
        };
        let engine = FilterEngine::new(&NullSink);
        let once: Vec<DataRecord> = engine.apply(&records, &state).into_iter().cloned().collect();
        let twice: Vec<DataRecord> = engine.apply(&once, &state).into_iter().cloned().collect();
        prop_assert_eq!(&once, &twice);
        for record in &once {
            prop_assert!(state.geographies.is_empty() || state.geographies.contains(&record.geography));
            prop_assert_eq!(record.segment_type.as_str(), "S");
        }
    }
}
