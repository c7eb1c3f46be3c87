use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::ids::{CurveView, IdsDocument};

use super::{format_value, ExportError, X_MATCH_TOLERANCE};

/// Write `<base>.csv`: the sorted union of all x values in the first column,
/// one value column per curve.
///
/// A cell is the first point of that curve whose x lies within
/// [`X_MATCH_TOLERANCE`] of the row's x, blank otherwise. Curves on offset
/// grids therefore get sparse columns; values are never interpolated.
pub(crate) fn write_wide(doc: &IdsDocument, path: &Path) -> Result<(), ExportError> {
    let curves = doc.curves();
    let first = curves.first().ok_or(ExportError::NoCurves)?;

    let mut header = Vec::with_capacity(curves.len() + 1);
    header.push(format!("x_{}_{}", first.x_axis_type, first.x_axis_unit));
    header.extend(curves.iter().map(|c| format!("{}_{}", c.name, c.unit)));

    let mut writer = csv::Writer::from_writer(BufWriter::new(File::create(path)?));
    writer.write_record(&header)?;

    let mut cursors = vec![0usize; curves.len()];
    for x in unified_axis(&curves) {
        let mut row = Vec::with_capacity(curves.len() + 1);
        row.push(format_value(x));
        for (curve, cursor) in curves.iter().zip(cursors.iter_mut()) {
            row.push(value_at(curve, cursor, x).map(format_value).unwrap_or_default());
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Sorted, de-duplicated x values of every curve
fn unified_axis(curves: &[CurveView<'_>]) -> Vec<f64> {
    let mut xs: Vec<f64> = curves
        .iter()
        .flat_map(|c| c.points.iter().map(|p| p.0))
        .filter(|x| !x.is_nan())
        .collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup();
    xs
}

/// First point at `x`, scanning forward from `cursor`.
///
/// Rows are visited in ascending x and curve x values are non-decreasing, so
/// the cursor only ever moves forward. Points with a NaN x never match a row
/// and are stepped over.
fn value_at(curve: &CurveView<'_>, cursor: &mut usize, x: f64) -> Option<f64> {
    let points = curve.points;
    while *cursor < points.len()
        && (points[*cursor].0.is_nan() || points[*cursor].0 < x - X_MATCH_TOLERANCE)
    {
        *cursor += 1;
    }
    points
        .get(*cursor)
        .filter(|p| (p.0 - x).abs() < X_MATCH_TOLERANCE)
        .map(|p| p.1)
}
