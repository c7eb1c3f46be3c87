//! # CSV Export
//!
//! Flat tables derived from an [`IdsDocument`], for spreadsheets and quick
//! plotting. Export is one-way: the CSV files are lossy compared to the IDS
//! JSON and are never read back.
//!
//! Two layouts ([`CsvLayout`]):
//!
//! - **wide**: `<base>.csv`, one row per distinct x value across all curves
//! - **per-curve**: `<base>_<curve_id>.csv` per curve with `# key: value`
//!   comment lines on top, plus `<base>_events.csv`
//!
//! ## Known limitation
//!
//! The wide layout joins curves on x equality within `1e-9`. Two curves whose
//! x grids are offset by more than that never share a row, so each row holds
//! a value for only some curves.

mod layout;
mod per_curve;
mod wide;

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::ids::IdsDocument;

pub use layout::CsvLayout;

/// Tolerance for matching x values in the wide layout
pub const X_MATCH_TOLERANCE: f64 = 1e-9;

/// Errors during CSV export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// CSV writer error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Nothing to export
    #[error("Document has no curves to export")]
    NoCurves,
}

/// Export `doc` into `output_dir` using `base` as the file name stem.
///
/// Returns the paths written, in creation order.
pub fn export_document(
    doc: &IdsDocument,
    output_dir: &Path,
    base: &str,
    layout: CsvLayout,
) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(output_dir)?;

    let written = match layout {
        CsvLayout::Wide => {
            let path = output_dir.join(format!("{}.csv", base));
            wide::write_wide(doc, &path)?;
            vec![path]
        }
        CsvLayout::PerCurve => per_curve::write_per_curve(doc, output_dir, base)?,
    };

    info!(
        "Exported {} ({} layout) to {} file(s) in {}",
        base,
        layout,
        written.len(),
        output_dir.display()
    );
    Ok(written)
}

/// Shortest round-trippable decimal form; non-finite values as `NaN`/`inf`
pub(crate) fn format_value(value: f64) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests;
