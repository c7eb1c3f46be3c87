use anyhow::{Context, Result};
use log::info;

use chromids::config::{ConfigFile, PipelineConfig};
use chromids::decoder::JsonModelDecoder;
use chromids::pipeline::Orchestrator;

use super::RunArgs;

/// Resolve settings: built-in defaults, then the config file, then flags
pub fn resolve_config(args: RunArgs) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::default();

    if let Some(path) = &args.config {
        ConfigFile::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?
            .apply(&mut config);
    }

    if let Some(v) = args.data_dir {
        config.data_dir = v;
    }
    if let Some(v) = args.output_dir {
        config.output_dir = v;
    }
    if let Some(v) = args.log_dir {
        config.log_dir = v;
    }
    if let Some(v) = args.process_files {
        config.process_files = v;
    }
    if args.clean {
        config.clean = true;
    }
    if args.no_csv {
        config.export_csv = false;
    }
    if args.no_check_extraction {
        config.check_extraction = false;
    }
    if args.no_check_conversion {
        config.check_conversion = false;
    }
    if args.no_check_end_to_end {
        config.check_end_to_end = false;
    }
    if let Some(v) = args.csv_layout {
        config.csv_layout = v.into();
    }
    if args.schema.is_some() {
        config.schema_path = args.schema;
    }
    if let Some(v) = args.schema_version {
        config.mapper.schema_version = v;
    }

    Ok(config)
}

/// Run the orchestrated pipeline
pub fn run(args: RunArgs) -> Result<()> {
    let config = resolve_config(args)?;

    let orchestrator = Orchestrator::standard(config, Box::new(JsonModelDecoder));
    info!("Pipeline run {}", orchestrator.timestamp());

    let report = orchestrator.run().context("Pipeline could not run")?;
    let results = orchestrator.config().log_dir.join(report.file_name());

    for (key, record) in &report.steps {
        let status = if record.success { "✓" } else { "✗" };
        println!("{} {}", status, key);
        for issue in &record.issues {
            println!("    - {}", issue);
        }
    }
    println!("Results: {}", results.display());

    if !report.success {
        eprintln!(
            "Pipeline failed at {}",
            report.failed_stage().unwrap_or("an unknown stage")
        );
        std::process::exit(1);
    }

    println!("Pipeline completed successfully");
    Ok(())
}
