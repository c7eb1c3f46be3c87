use serde_json::json;

use super::*;
use crate::mapper::{MapperConfig, SchemaMapper};
use crate::model::{CurveGroup, EventEntry, EventGroup, FileMetadata, IntermediateModel};

fn model_with(points: Vec<(f64, f64)>) -> IntermediateModel {
    let metadata = FileMetadata::new("run.zip", "2024-05-01T10:00:00").unwrap();
    let curve = CurveGroup::new("UV 1_280", "UV 1_280", "UV", "mAU", points).unwrap();
    let events = EventGroup::new("Log", "Logbook", vec![EventEntry::new(0.5, "Method start")])
        .unwrap();
    IntermediateModel::new(metadata, vec![curve], vec![events]).unwrap()
}

fn mapped(version: SchemaVersion) -> IdsDocument {
    SchemaMapper::new(MapperConfig::for_version(version))
        .map(&model_with(vec![(0.0, 1.0), (1.0, 2.0)]))
        .unwrap()
}

#[test]
fn test_report_display() {
    let mut report = ValidationReport::new("test.ids.json");
    report.add_check(ValidationCheck::ok("Test check 1"));
    report.add_check(ValidationCheck::warning("Test check 2", "This is a warning"));
    report.add_check(ValidationCheck::failed("Test check 3", "This failed"));
    report.add_note("something to know");

    let output = format!("{}", report);
    assert!(output.contains("✓"));
    assert!(output.contains("⚠"));
    assert!(output.contains("✗"));
    assert!(output.contains("note: something to know"));
    assert!(output.contains("1 passed, 1 warnings, 1 failed"));
    assert!(!report.ok());
    assert_eq!(report.errors(), vec!["Test check 3: This failed"]);
}

#[test]
fn test_bundled_schema_accepts_mapped_documents() {
    for version in SchemaVersion::ALL {
        let validator = SchemaValidator::new(version, SchemaSource::Bundled);
        assert!(validator.has_schema(), "bundled {version} schema must compile");

        let report = validator.validate(&mapped(version));
        assert!(report.ok(), "{version}: {:?}", report.errors());
        assert!(report.notes.is_empty());
        assert!(!report.has_warnings());
    }
}

#[test]
fn test_missing_schema_is_skipped_not_failed() {
    let validator = SchemaValidator::without_schema(SchemaVersion::V1);
    let report = validator.validate(&mapped(SchemaVersion::V1));

    assert!(report.ok());
    assert_eq!(report.notes.len(), 1);
    assert!(report.notes[0].contains("skipped"));
}

#[test]
fn test_unreadable_schema_path_is_skipped() {
    let source = SchemaSource::Path("/nonexistent/ids.schema.json".into());
    let validator = SchemaValidator::new(SchemaVersion::V1, source);
    assert!(!validator.has_schema());

    let report = validator.validate(&mapped(SchemaVersion::V1));
    assert!(report.ok());
    assert!(report.notes[0].contains("cannot read schema"));
}

#[test]
fn test_uncompilable_schema_is_skipped() {
    let source = SchemaSource::Inline(json!({ "type": 12 }));
    let validator = SchemaValidator::new(SchemaVersion::V1, source);

    let report = validator.validate(&mapped(SchemaVersion::V1));
    assert!(report.ok());
    assert!(report.notes[0].contains("does not compile"));
}

#[test]
fn test_version_mismatch_is_reported() {
    let validator = SchemaValidator::without_schema(SchemaVersion::V1);
    let report = validator.validate(&mapped(SchemaVersion::Legacy));

    assert!(!report.ok());
    assert_eq!(report.failure_count(), 1);
    assert!(report.errors()[0].contains("expected 1.0.0, document declares 0.9.0"));
}

#[test]
fn test_schema_errors_carry_instance_path() {
    let schema = json!({
        "type": "object",
        "properties": {
            "metadata": {
                "type": "object",
                "properties": { "source_format": { "const": "SOMETHING-ELSE" } }
            }
        }
    });
    let validator = SchemaValidator::new(SchemaVersion::V1, SchemaSource::Inline(schema));

    let report = validator.validate(&mapped(SchemaVersion::V1));
    assert!(!report.ok());
    let errors = report.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("/metadata/source_format"), "{}", errors[0]);
}

#[test]
fn test_non_finite_values_warn() {
    let doc = SchemaMapper::default()
        .map(&model_with(vec![(0.0, f64::NAN), (1.0, 2.0)]))
        .unwrap();
    let report = SchemaValidator::new(SchemaVersion::V1, SchemaSource::Bundled).validate(&doc);

    assert!(report.ok());
    assert_eq!(report.warning_count(), 1);
    let warning = report
        .checks
        .iter()
        .find(|c| c.name == "Finite values")
        .unwrap();
    assert_eq!(
        warning.status,
        CheckStatus::Warning("1 non-finite value(s), first in curve uv_1_280".to_string())
    );
}
