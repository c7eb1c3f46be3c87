use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use chromids::ids::IdsDocument;
use chromids::model::IntermediateModel;
use chromids::verify::RoundTripVerifier;

/// Round-trip check of one IDS document
pub fn run(extracted: PathBuf, ids: PathBuf, tolerance: f64) -> Result<()> {
    info!("Round-trip verification");
    info!("Intermediate: {}", extracted.display());
    info!("IDS:          {}", ids.display());

    let model = IntermediateModel::from_file(&extracted)
        .with_context(|| format!("Failed to load {}", extracted.display()))?;
    let doc = IdsDocument::from_file(&ids)
        .with_context(|| format!("Failed to load {}", ids.display()))?;

    let report = RoundTripVerifier::with_tolerance(tolerance).verify(&model, &doc);

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    if !report.passed {
        std::process::exit(1);
    }
    Ok(())
}
