use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::ids::{CurveView, IdsDocument};

use super::{format_value, ExportError};

/// Write one `<base>_<curve_id>.csv` per curve, plus `<base>_events.csv`
/// when the document has events. Returns the files written.
pub(crate) fn write_per_curve(
    doc: &IdsDocument,
    output_dir: &Path,
    base: &str,
) -> Result<Vec<PathBuf>, ExportError> {
    let curves = doc.curves();
    if curves.is_empty() {
        return Err(ExportError::NoCurves);
    }

    let mut written = Vec::with_capacity(curves.len() + 1);
    for curve in &curves {
        let path = output_dir.join(format!("{}_{}.csv", base, safe_file_part(curve.curve_id)));
        write_curve(curve, &path)?;
        written.push(path);
    }

    if doc.event_count() > 0 {
        let path = output_dir.join(format!("{}_events.csv", base));
        let x_unit = curves[0].x_axis_unit;
        write_events(doc, x_unit, &path)?;
        written.push(path);
    }

    Ok(written)
}

fn write_curve(curve: &CurveView<'_>, path: &Path) -> Result<(), ExportError> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "# Curve: {}", curve.name)?;
    writeln!(out, "# Type: {}", curve.kind)?;
    writeln!(out, "# Unit: {}", curve.unit)?;
    if let Some(wavelength) = curve.wavelength_nm {
        writeln!(out, "# wavelength_nm: {}", wavelength)?;
    }
    writeln!(out)?;

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        format!("Volume ({})", curve.x_axis_unit),
        format!("Value ({})", curve.unit),
    ])?;
    for &(x, y) in curve.points {
        writer.write_record([format_value(x), format_value(y)])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_events(doc: &IdsDocument, x_unit: &str, path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(BufWriter::new(File::create(path)?));
    writer.write_record([
        "Event ID".to_string(),
        "Event Type".to_string(),
        "Event Name".to_string(),
        format!("Position ({})", x_unit),
        "Description".to_string(),
    ])?;

    for event in doc.events() {
        writer.write_record([
            event.event_id.to_string(),
            event.kind.to_string(),
            event.name.to_string(),
            event.position.map(format_value).unwrap_or_default(),
            event.text.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Curve ids may carry path separators from instrument labels
fn safe_file_part(id: &str) -> String {
    id.replace(['/', '\\'], "_")
}
