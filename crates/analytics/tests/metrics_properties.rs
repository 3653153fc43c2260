use analytics::{AnalysisParams, MetricsEngine};
use core_types::{DataRecord, TimeSeries};
use diagnostics::NullSink;
use proptest::prelude::*;

fn engine(span: i32) -> MetricsEngine {
    MetricsEngine::new(AnalysisParams {
        base_year: 2024,
        forecast_year: 2024 + span,
        ..AnalysisParams::default()
    })
    .unwrap()
}

fn arbitrary_record() -> impl Strategy<Value = DataRecord> {
    ("[A-B]", "[S-T]", "[a-f]", -100.0f64..1.0e6, -100.0f64..1.0e6).prop_map(
        |(geo, segment_type, segment, base, forecast)| {
            let series: TimeSeries = [(2024, base), (2032, forecast)].into_iter().collect();
            DataRecord::new(geo, segment_type, segment, series)
        },
    )
}

proptest! {
    #[test]
    fn index_cagr_stays_within_bounds(base in -1.0e9f64..1.0e9, forecast in -1.0e9f64..1.0e9, span in 1i32..20) {
        let engine = engine(span);
        let cagr = engine.index_cagr(base, forecast);
        prop_assert!((0.0..=100.0).contains(&cagr));
        if base <= 0.0 || forecast <= 0.0 {
            prop_assert_eq!(engine.cagr(base, forecast), 0.0);
        }
    }

    #[test]
    fn report_indices_are_normalized(records in prop::collection::vec(arbitrary_record(), 0..30)) {
        let refs: Vec<&DataRecord> = records.iter().collect();
        let engine = engine(8);
        let report = engine.compute("A", "S", &refs, None, &NullSink);

        for unit in &report.segments {
            prop_assert!(unit.base_value > 0.0 && unit.forecast_value > 0.0);
            for index in [unit.growth_index, unit.share_index, unit.opportunity_index] {
                prop_assert!((0.0..=100.0).contains(&index));
            }
        }
        if let Some(best) = report.segments.iter().map(|u| u.share_index).reduce(f64::max) {
            prop_assert!(best == 100.0 || best == 0.0);
        }
        prop_assert_eq!(report.clone(), engine.compute("A", "S", &refs, None, &NullSink));
    }
}
