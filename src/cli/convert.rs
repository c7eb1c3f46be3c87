use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use chromids::convert::{convert_batch, convert_file, BatchReport};
use chromids::ids::SchemaVersion;
use chromids::layout::ArchiveLayout;
use chromids::mapper::{MapperConfig, SchemaMapper};
use chromids::validator::{SchemaSource, SchemaValidator};

fn validator_for(version: SchemaVersion, schema: Option<PathBuf>) -> Option<SchemaValidator> {
    schema.map(|path| SchemaValidator::new(version, SchemaSource::Path(path)))
}

/// Convert one intermediate model
pub fn run(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    schema_version: SchemaVersion,
    schema: Option<PathBuf>,
) -> Result<()> {
    let input = input.context("No input file given")?;
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let output = output.unwrap_or_else(|| match ArchiveLayout::from_extracted(&input) {
        Some(layout) => layout.ids_path(),
        None => input.with_extension("ids.json"),
    });

    info!("Converting {} to IDS {}", input.display(), schema_version);
    info!("Output: {}", output.display());

    let mapper = SchemaMapper::new(MapperConfig::for_version(schema_version));
    let validator = validator_for(schema_version, schema);
    let converted = convert_file(&input, &output, &mapper, validator.as_ref())
        .context("Conversion failed")?;

    println!(
        "Wrote {} ({} curves, {} events)",
        converted.output.display(),
        converted.curves,
        converted.events
    );

    if let Some(report) = &converted.validation {
        println!("{}", report);
        if !report.ok() {
            warn!("{} does not conform to the schema", converted.output.display());
        }
    }
    Ok(())
}

/// Convert every intermediate model under `dir`
pub fn run_all(dir: PathBuf, schema_version: SchemaVersion, schema: Option<PathBuf>) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("Not a directory: {}", dir.display());
    }

    let mapper = SchemaMapper::new(MapperConfig::for_version(schema_version));
    let validator = validator_for(schema_version, schema);
    let batch = convert_batch(&dir, &mapper, validator.as_ref())
        .with_context(|| format!("Failed to scan {}", dir.display()))?;

    for converted in &batch.converted {
        println!("✓ {}", converted.output.display());
    }
    for (path, error) in &batch.failures {
        println!("✗ {}: {}", path.display(), error);
    }
    println!(
        "{} converted, {} failed",
        batch.converted.len(),
        batch.failures.len()
    );

    let invalid = batch
        .converted
        .iter()
        .filter_map(|c| c.validation.as_ref())
        .filter(|report| !report.ok())
        .count();
    if invalid > 0 {
        println!("{} document(s) do not conform to the schema", invalid);
    }

    if batch.attempted() == 0 {
        eprintln!("No extracted files found in {}", dir.display());
    }
    if batch_failed(&batch) {
        std::process::exit(1);
    }
    Ok(())
}

/// Conversion failures fail the batch; schema findings are advisory.
fn batch_failed(batch: &BatchReport) -> bool {
    batch.attempted() == 0 || !batch.all_succeeded()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chromids::model::{CurveGroup, FileMetadata, IntermediateModel};
    use std::fs;

    fn write_extracted(root: &std::path::Path, base: &str) {
        let metadata = FileMetadata::new(format!("{base}.zip"), "2024-05-01T10:00:00").unwrap();
        let curve = CurveGroup::new("UV", "UV", "UV", "mAU", vec![(0.0, 1.0)]).unwrap();
        let model = IntermediateModel::new(metadata, vec![curve], vec![]).unwrap();
        let dir = root.join(base);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{base}_extracted.json")), model.to_json().unwrap()).unwrap();
    }

    #[test]
    fn test_schema_findings_do_not_fail_batch() {
        let dir = tempfile::tempdir().unwrap();
        write_extracted(dir.path(), "run1");

        let rejects_everything = serde_json::json!({"type": "string"});
        let validator = SchemaValidator::new(
            SchemaVersion::V1,
            SchemaSource::Inline(rejects_everything),
        );
        let batch = convert_batch(dir.path(), &SchemaMapper::default(), Some(&validator)).unwrap();

        assert_eq!(batch.converted.len(), 1);
        assert!(!batch.converted[0].validation.as_ref().unwrap().ok());
        assert!(!batch_failed(&batch));
    }

    #[test]
    fn test_conversion_failure_fails_batch() {
        let dir = tempfile::tempdir().unwrap();
        write_extracted(dir.path(), "run1");
        let bad = dir.path().join("run2");
        fs::create_dir_all(&bad).unwrap();
        fs::write(bad.join("run2_extracted.json"), r#"{"curves": []}"#).unwrap();

        let batch = convert_batch(dir.path(), &SchemaMapper::default(), None).unwrap();
        assert_eq!(batch.failures.len(), 1);
        assert!(batch_failed(&batch));
    }

    #[test]
    fn test_empty_batch_fails() {
        let dir = tempfile::tempdir().unwrap();
        let batch = convert_batch(dir.path(), &SchemaMapper::default(), None).unwrap();
        assert!(batch_failed(&batch));
    }
}
