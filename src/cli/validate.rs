use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use chromids::ids::{IdsDocument, SchemaVersion};
use chromids::validator::{SchemaSource, SchemaValidator};

/// Validate an IDS document
pub fn run(
    file: PathBuf,
    schema: Option<PathBuf>,
    schema_version: Option<SchemaVersion>,
) -> Result<()> {
    info!("IDS Validator");
    info!("=============");
    info!("File: {}", file.display());

    let doc = IdsDocument::from_file(&file)
        .with_context(|| format!("Failed to load {}", file.display()))?;
    let expected = schema_version
        .or_else(|| doc.version())
        .unwrap_or_default();

    let validator = SchemaValidator::new(expected, SchemaSource::from_path_or_bundled(schema));
    let report = validator.validate(&doc);

    // Use colorized output if available
    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    if report.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}
