//! The six production stages.
//!
//! Stages talk to each other only through the output directory: each one
//! reads what an earlier stage wrote and writes its own files next to it.

use std::collections::HashSet;
use std::fs;

use crate::config::FileSelection;
use crate::convert::{convert_batch, load_pair};
use crate::decoder::ArchiveDecoder;
use crate::export::export_document;
use crate::extract::extract_archive;
use crate::ids::IdsDocument;
use crate::layout::ArchiveLayout;
use crate::mapper::SchemaMapper;
use crate::model::{IntermediateModel, ModelSummary};
use crate::validator::{SchemaSource, SchemaValidator};
use crate::verify::RoundTripVerifier;

use super::{Stage, StageContext, StageError, StageKind, StageOutcome};

/// Unpack and decode every selected archive
pub struct ExtractStage {
    decoder: Box<dyn ArchiveDecoder>,
}

impl ExtractStage {
    pub fn new(decoder: Box<dyn ArchiveDecoder>) -> Self {
        Self { decoder }
    }
}

impl Stage for ExtractStage {
    fn kind(&self) -> StageKind {
        StageKind::Extract
    }

    fn run(&self, ctx: &StageContext<'_>) -> Result<StageOutcome, StageError> {
        let config = ctx.config;

        if ctx.inputs.is_empty() {
            if config.process_files == FileSelection::Nothing {
                ctx.log.info("No files selected, working on existing outputs");
                return Ok(StageOutcome::succeeded(Some(0)));
            }
            return Ok(StageOutcome::failed(
                Some(0),
                vec![format!("No files to process in {}", config.data_dir.display())],
            ));
        }

        fs::create_dir_all(&config.output_dir)?;
        ctx.log.info(format!(
            "Extracting {} file(s) with decoder {}",
            ctx.inputs.len(),
            self.decoder.name()
        ));

        let mut issues = Vec::new();
        for archive in ctx.inputs {
            match extract_archive(archive, &config.output_dir, self.decoder.as_ref()) {
                Ok(outcome) => ctx.log.info(format!(
                    "✓ {}: {} curves, {} events, {} raw files",
                    outcome.layout.base(),
                    outcome.curves,
                    outcome.events,
                    outcome.raw_files
                )),
                Err(e) => {
                    let issue = format!("{}: {}", archive.display(), e);
                    ctx.log.error(format!("✗ {}", issue));
                    issues.push(issue);
                }
            }
        }

        Ok(StageOutcome::from_issues(Some(ctx.inputs.len()), issues))
    }
}

/// Every selected archive has a complete output directory
pub struct CoverageCheckStage;

impl Stage for CoverageCheckStage {
    fn kind(&self) -> StageKind {
        StageKind::CoverageCheck
    }

    fn run(&self, ctx: &StageContext<'_>) -> Result<StageOutcome, StageError> {
        let layouts = ctx.layouts()?;
        if layouts.is_empty() {
            return Ok(StageOutcome::failed(Some(0), vec!["No extraction outputs found".to_string()]));
        }

        let mut issues = Vec::new();
        for layout in &layouts {
            let base = layout.base();
            if !layout.dir().is_dir() {
                issues.push(format!("{}: output directory does not exist", base));
                continue;
            }

            let raw_dir = layout.raw_files_dir();
            match fs::read_dir(&raw_dir).map(|entries| entries.count()) {
                Ok(0) => {
                    ctx.log.warn(format!("{}: raw_files/ is empty", base));
                }
                Ok(_) => {}
                Err(_) => issues.push(format!("{}: raw_files/ is missing", base)),
            }

            let model = match IntermediateModel::from_file(&layout.extracted_path()) {
                Ok(model) => model,
                Err(e) => {
                    issues.push(format!("{}: extracted file unreadable: {}", base, e));
                    continue;
                }
            };

            if let Err(e) = fs::read_to_string(layout.summary_path())
                .map_err(|e| e.to_string())
                .and_then(|s| serde_json::from_str::<ModelSummary>(&s).map_err(|e| e.to_string()))
            {
                issues.push(format!("{}: summary file unreadable: {}", base, e));
                continue;
            }

            ctx.log.info(format!(
                "✓ {}: {} curves, {} event entries",
                base,
                model.curve_count(),
                model.event_count()
            ));
        }

        if !ctx.inputs.is_empty() {
            warn_about_extra_dirs(ctx, &layouts)?;
        }

        Ok(StageOutcome::from_issues(Some(layouts.len()), issues))
    }
}

fn warn_about_extra_dirs(ctx: &StageContext<'_>, layouts: &[ArchiveLayout]) -> Result<(), StageError> {
    let expected: HashSet<&str> = layouts.iter().map(ArchiveLayout::base).collect();
    let root = &ctx.config.output_dir;
    if !root.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        if let Some(name) = name {
            if path.is_dir() && !expected.contains(name.as_str()) {
                ctx.log.warn(format!("Extra output directory not from this run: {}", name));
            }
        }
    }
    Ok(())
}

/// Map every extracted model to an IDS document
pub struct ConvertStage;

impl Stage for ConvertStage {
    fn kind(&self) -> StageKind {
        StageKind::Convert
    }

    fn run(&self, ctx: &StageContext<'_>) -> Result<StageOutcome, StageError> {
        let mapper = SchemaMapper::new(ctx.config.mapper.clone());
        let batch = convert_batch(&ctx.config.output_dir, &mapper, None)?;

        if batch.attempted() == 0 {
            return Ok(StageOutcome::failed(Some(0), vec!["No extracted files found".to_string()]));
        }

        for converted in &batch.converted {
            ctx.log.info(format!(
                "✓ {} ({} curves, {} events)",
                converted.output.display(),
                converted.curves,
                converted.events
            ));
        }
        let issues: Vec<String> = batch.failures.iter().map(|(_, e)| e.to_string()).collect();
        for issue in &issues {
            ctx.log.error(format!("✗ {}", issue));
        }

        Ok(StageOutcome::from_issues(Some(batch.attempted()), issues))
    }
}

/// Round-trip verification plus advisory schema validation
pub struct ValidateStage;

impl Stage for ValidateStage {
    fn kind(&self) -> StageKind {
        StageKind::Validate
    }

    fn run(&self, ctx: &StageContext<'_>) -> Result<StageOutcome, StageError> {
        let layouts = ctx.layouts()?;
        if layouts.is_empty() {
            return Ok(StageOutcome::failed(Some(0), vec!["No IDS files found".to_string()]));
        }

        let validator = SchemaValidator::new(
            ctx.config.mapper.schema_version,
            SchemaSource::from_path_or_bundled(ctx.config.schema_path.clone()),
        );
        let verifier = RoundTripVerifier::default();

        let mut issues = Vec::new();
        for layout in &layouts {
            let base = layout.base();
            let (model, doc) = match load_pair(layout) {
                Ok(pair) => pair,
                Err(e) => {
                    issues.push(format!("{}: {}", base, e));
                    continue;
                }
            };

            let schema = validator.validate(&doc);
            for error in schema.errors() {
                ctx.log.warn(format!("{}: schema mismatch: {}", base, error));
            }
            for note in &schema.notes {
                ctx.log.info(format!("{}: {}", base, note));
            }

            let report = verifier.verify(&model, &doc);
            if report.passed {
                ctx.log.info(format!("✓ {}: PASSED", base));
            } else {
                ctx.log.error(format!("✗ {}: FAILED", base));
                for issue in &report.issues {
                    ctx.log.error(format!("  - {}", issue));
                    issues.push(format!("{}: {}", base, issue));
                }
            }
        }

        Ok(StageOutcome::from_issues(Some(layouts.len()), issues))
    }
}

/// Every selected archive made it all the way to a usable IDS document
pub struct EndToEndStage;

impl Stage for EndToEndStage {
    fn kind(&self) -> StageKind {
        StageKind::EndToEnd
    }

    fn run(&self, ctx: &StageContext<'_>) -> Result<StageOutcome, StageError> {
        let layouts = ctx.layouts()?;
        if layouts.is_empty() {
            return Ok(StageOutcome::failed(Some(0), vec!["No pipeline outputs found".to_string()]));
        }

        let mut issues = Vec::new();
        for layout in &layouts {
            match check_end_to_end(layout) {
                Ok(()) => ctx.log.info(format!("✓ {}", layout.base())),
                Err(issue) => {
                    ctx.log.error(format!("✗ {}: {}", layout.base(), issue));
                    issues.push(format!("{}: {}", layout.base(), issue));
                }
            }
        }

        Ok(StageOutcome::from_issues(Some(layouts.len()), issues))
    }
}

fn check_end_to_end(layout: &ArchiveLayout) -> Result<(), String> {
    if !layout.extracted_path().is_file() {
        return Err("extracted file not found".to_string());
    }
    if !layout.ids_path().is_file() {
        return Err("IDS document not found".to_string());
    }

    let (model, doc) = load_pair(layout)?;
    if doc.schema_version.is_empty() {
        return Err("IDS document has no schema_version".to_string());
    }
    if doc.curve_count() != model.curve_count() {
        return Err(format!(
            "curve count mismatch ({} vs {})",
            model.curve_count(),
            doc.curve_count()
        ));
    }
    if doc.event_count() != model.event_count() {
        return Err(format!(
            "event count mismatch ({} vs {})",
            model.event_count(),
            doc.event_count()
        ));
    }
    if !doc.curves().iter().any(|c| !c.points.is_empty()) {
        return Err("no curve carries data, nothing to export".to_string());
    }
    Ok(())
}

/// CSV export of every IDS document
pub struct ExportStage;

impl Stage for ExportStage {
    fn kind(&self) -> StageKind {
        StageKind::Export
    }

    fn run(&self, ctx: &StageContext<'_>) -> Result<StageOutcome, StageError> {
        let layouts: Vec<_> = ctx
            .layouts()?
            .into_iter()
            .filter(|layout| layout.ids_path().is_file())
            .collect();
        if layouts.is_empty() {
            return Ok(StageOutcome::failed(Some(0), vec!["No IDS files found to export".to_string()]));
        }

        let csv_layout = ctx.config.csv_layout;
        ctx.log.info(format!("Exporting {} file(s), {} layout", layouts.len(), csv_layout));

        let mut issues = Vec::new();
        for layout in &layouts {
            let result = IdsDocument::from_file(&layout.ids_path())
                .map_err(|e| e.to_string())
                .and_then(|doc| {
                    export_document(&doc, layout.dir(), layout.base(), csv_layout)
                        .map_err(|e| e.to_string())
                });
            match result {
                Ok(files) => ctx.log.info(format!("✓ {}: {} file(s)", layout.base(), files.len())),
                Err(e) => {
                    ctx.log.error(format!("✗ {}: {}", layout.base(), e));
                    issues.push(format!("{}: {}", layout.base(), e));
                }
            }
        }

        Ok(StageOutcome::from_issues(Some(layouts.len()), issues))
    }
}
