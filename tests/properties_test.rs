//! Property tests for the mapper and the round-trip verifier.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use chromids::ids::{curve_id_for, event_id_for, SchemaVersion};
use chromids::mapper::{MapperConfig, SchemaMapper};
use chromids::model::{CurveGroup, EventEntry, EventGroup, FileMetadata, IntermediateModel};
use chromids::verify::verify;

const DATA_TYPES: &[&str] = &["UV", "Conduction", "Pressure", "Temperature", "pH", "Flow"];
const EVENT_LABELS: &[&str] = &[
    "Injection",
    "Fraction Start",
    "Fraction End",
    "Logbook",
    "Mark",
    "Method Phase",
    "Run Log",
];

fn points() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0.0f64..500.0, -1.0e4f64..1.0e4), 0..60).prop_map(|mut pts| {
        pts.sort_by(|a, b| a.0.total_cmp(&b.0));
        pts
    })
}

// Short ids over a small alphabet, so case and space/underscore variants of
// one id (which share a derived curve id) show up often.
fn curve() -> impl Strategy<Value = CurveGroup> {
    (
        "[uUvV][uUvV _1]{0,3}",
        prop::sample::select(DATA_TYPES),
        "[a-zA-Z ]{0,8}",
        points(),
    )
        .prop_map(|(id, data_type, unit, data)| {
            CurveGroup::new(id.clone(), id, data_type, unit, data).unwrap()
        })
}

fn event_group(index: usize) -> impl Strategy<Value = EventGroup> {
    (
        prop::sample::select(EVENT_LABELS),
        prop::collection::vec((0.0f64..500.0, "[a-zA-Z0-9 ]{0,12}"), 0..8),
    )
        .prop_map(move |(label, entries)| {
            let data = entries
                .into_iter()
                .map(|(position, text)| EventEntry::new(position, text))
                .collect();
            EventGroup::new(format!("group{}", index), label, data).unwrap()
        })
}

fn model() -> impl Strategy<Value = IntermediateModel> {
    (0usize..5, 0usize..4)
        .prop_flat_map(|(n_curves, n_groups)| {
            let curves = prop::collection::vec(curve(), n_curves);
            let groups: Vec<_> = (0..n_groups).map(event_group).collect();
            (curves, groups)
        })
        .prop_filter_map("curve ids collide", |(curves, events)| {
            let metadata = FileMetadata::new("prop.zip", "2024-05-01T10:00:00").unwrap();
            IntermediateModel::new(metadata, curves, events).ok()
        })
}

fn version() -> impl Strategy<Value = SchemaVersion> {
    prop::sample::select(SchemaVersion::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_model_accepts_only_distinct_curve_ids(
        curves in prop::collection::vec(curve(), 0..5)
    ) {
        let mut derived: Vec<String> = curves.iter().map(|c| curve_id_for(&c.id)).collect();
        derived.sort();
        derived.dedup();
        let distinct = derived.len() == curves.len();

        let metadata = FileMetadata::new("prop.zip", "2024-05-01T10:00:00").unwrap();
        let accepted = IntermediateModel::new(metadata, curves, vec![]).is_ok();
        prop_assert_eq!(accepted, distinct);
    }

    #[test]
    fn prop_round_trip_verifies(model in model(), version in version()) {
        let mapper = SchemaMapper::new(MapperConfig::for_version(version));
        let doc = mapper.map(&model).unwrap();
        let report = verify(&model, &doc);
        prop_assert!(report.passed, "{}", report);
    }

    #[test]
    fn prop_round_trip_survives_serialization(model in model()) {
        let doc = SchemaMapper::default().map(&model).unwrap();
        let reparsed = chromids::ids::IdsDocument::from_json(&doc.to_json().unwrap()).unwrap();
        prop_assert!(verify(&model, &reparsed).passed);
    }

    #[test]
    fn prop_mapping_is_deterministic(model in model(), version in version()) {
        let mapper = SchemaMapper::new(MapperConfig::for_version(version));
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let first = mapper.map_at(&model, at).unwrap();
        let second = mapper.map_at(&model, at).unwrap();
        prop_assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[test]
    fn prop_curve_ids_are_stable(model in model()) {
        let doc = SchemaMapper::default().map(&model).unwrap();
        let curves = doc.curves();
        prop_assert_eq!(curves.len(), model.curves.len());
        for (view, source) in curves.iter().zip(&model.curves) {
            prop_assert_eq!(view.curve_id, curve_id_for(&source.id));
            prop_assert_eq!(view.points.len(), source.data.len());
        }
    }

    #[test]
    fn prop_event_ids_are_sequential(model in model(), version in version()) {
        let mapper = SchemaMapper::new(MapperConfig::for_version(version));
        let doc = mapper.map(&model).unwrap();
        let events = doc.events();
        prop_assert_eq!(events.len(), model.event_count());
        for (i, event) in events.iter().enumerate() {
            prop_assert_eq!(event.event_id, event_id_for(i + 1));
        }
    }
}
