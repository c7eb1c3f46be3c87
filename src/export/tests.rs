use std::fs;

use super::*;
use crate::mapper::SchemaMapper;
use crate::model::{CurveGroup, EventEntry, EventGroup, FileMetadata, IntermediateModel};

fn two_curve_doc() -> IdsDocument {
    let metadata = FileMetadata::new("run.zip", "t").unwrap();
    let uv = CurveGroup::new(
        "UV 1_280",
        "UV 1_280",
        "UV",
        "mAU",
        vec![(0.0, 1.0), (0.5, 1.5), (1.0, 2.0)],
    )
    .unwrap();
    let cond = CurveGroup::new(
        "Cond",
        "Cond",
        "Conduction",
        "mS/cm",
        vec![(0.0, 10.0), (1.0, 11.0), (2.0, 12.0)],
    )
    .unwrap();
    let events = EventGroup::new(
        "Inj",
        "Injection",
        vec![EventEntry::new(0.25, "Sample, 5 ml")],
    )
    .unwrap();
    let model = IntermediateModel::new(metadata, vec![uv, cond], vec![events]).unwrap();
    SchemaMapper::default().map(&model).unwrap()
}

#[test]
fn test_wide_layout() {
    let dir = tempfile::tempdir().unwrap();
    let written = export_document(&two_curve_doc(), dir.path(), "run", CsvLayout::Wide).unwrap();

    assert_eq!(written, vec![dir.path().join("run.csv")]);
    let content = fs::read_to_string(&written[0]).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(
        lines,
        vec![
            "x_volume_ml,UV 1_280_mAU,Cond_mS/cm",
            "0,1,10",
            "0.5,1.5,",
            "1,2,11",
            "2,,12",
        ]
    );
}

#[test]
fn test_wide_layout_steps_over_nan_x() {
    let metadata = FileMetadata::new("run.zip", "t").unwrap();
    let curve = CurveGroup::new(
        "A",
        "A",
        "UV",
        "mAU",
        vec![(0.0, 1.0), (f64::NAN, 9.0), (2.0, 3.0), (3.0, 4.0)],
    )
    .unwrap();
    let model = IntermediateModel::new(metadata, vec![curve], vec![]).unwrap();
    let doc = SchemaMapper::default().map(&model).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let written = export_document(&doc, dir.path(), "run", CsvLayout::Wide).unwrap();
    let content = fs::read_to_string(&written[0]).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines, vec!["x_volume_ml,A_mAU", "0,1", "2,3", "3,4"]);
}

#[test]
fn test_wide_layout_tolerance() {
    let metadata = FileMetadata::new("run.zip", "t").unwrap();
    let a = CurveGroup::new("A", "A", "UV", "mAU", vec![(1.0, 1.0)]).unwrap();
    let b = CurveGroup::new("B", "B", "UV", "mAU", vec![(1.0 + 1e-10, 2.0), (1.1, 3.0)]).unwrap();
    let model = IntermediateModel::new(metadata, vec![a, b], vec![]).unwrap();
    let doc = SchemaMapper::default().map(&model).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let written = export_document(&doc, dir.path(), "run", CsvLayout::Wide).unwrap();
    let content = fs::read_to_string(&written[0]).unwrap();
    let lines: Vec<_> = content.lines().collect();

    // 1.0 and 1.0000000001 are distinct rows but each matches both curves
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "1,1,2");
    assert_eq!(lines[3], "1.1,,3");
}

#[test]
fn test_per_curve_layout() {
    let dir = tempfile::tempdir().unwrap();
    let written =
        export_document(&two_curve_doc(), dir.path(), "run", CsvLayout::PerCurve).unwrap();

    assert_eq!(
        written,
        vec![
            dir.path().join("run_uv_1_280.csv"),
            dir.path().join("run_cond.csv"),
            dir.path().join("run_events.csv"),
        ]
    );

    let uv = fs::read_to_string(&written[0]).unwrap();
    let lines: Vec<_> = uv.lines().collect();
    assert_eq!(lines[0], "# Curve: UV 1_280");
    assert_eq!(lines[1], "# Type: UV");
    assert_eq!(lines[2], "# Unit: mAU");
    assert_eq!(lines[3], "# wavelength_nm: 280");
    assert_eq!(lines[4], "");
    assert_eq!(lines[5], "Volume (ml),Value (mAU)");
    assert_eq!(lines[6], "0,1");
    assert_eq!(lines.len(), 9);

    let cond = fs::read_to_string(&written[1]).unwrap();
    assert!(cond.starts_with("# Curve: Cond\n# Type: Conductivity\n# Unit: mS/cm\n\n"));

    let events = fs::read_to_string(&written[2]).unwrap();
    let lines: Vec<_> = events.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Event ID,Event Type,Event Name,Position (ml),Description",
            "event_001,injection,Injection,0.25,\"Sample, 5 ml\"",
        ]
    );
}

#[test]
fn test_per_curve_sanitizes_file_names() {
    let metadata = FileMetadata::new("run.zip", "t").unwrap();
    let curve = CurveGroup::new("Flow/Pressure", "Flow/Pressure", "Pressure", "MPa", vec![])
        .unwrap();
    let model = IntermediateModel::new(metadata, vec![curve], vec![]).unwrap();
    let doc = SchemaMapper::default().map(&model).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let written = export_document(&doc, dir.path(), "run", CsvLayout::PerCurve).unwrap();

    // no events, no events table
    assert_eq!(written, vec![dir.path().join("run_flow_pressure.csv")]);
}

#[test]
fn test_no_curves_is_an_error() {
    let metadata = FileMetadata::new("run.zip", "t").unwrap();
    let model = IntermediateModel::new(metadata, vec![], vec![]).unwrap();
    let doc = SchemaMapper::default().map(&model).unwrap();

    let dir = tempfile::tempdir().unwrap();
    for layout in [CsvLayout::Wide, CsvLayout::PerCurve] {
        let err = export_document(&doc, dir.path(), "run", layout).unwrap_err();
        assert!(matches!(err, ExportError::NoCurves));
    }
}
