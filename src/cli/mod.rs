use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use chromids::config::FileSelection;
use chromids::export::CsvLayout;
use chromids::ids::SchemaVersion;

mod convert;
mod export;
mod run;
mod validate;
mod verify;

/// chromids - Chromatography run data to IDS converter
#[derive(Parser)]
#[command(name = "chromids")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// CSV layout for exports.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum LayoutArg {
    /// One file, one column per curve
    #[default]
    Wide,
    /// One file per curve plus an events file
    PerCurve,
}

impl From<LayoutArg> for CsvLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Wide => CsvLayout::Wide,
            LayoutArg::PerCurve => CsvLayout::PerCurve,
        }
    }
}

/// Flags of the `run` command. Each one overrides the config file.
#[derive(clap::Args, Debug, Default)]
pub struct RunArgs {
    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the input archives
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Root for per-archive outputs
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory for logs and run reports
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Archives to process: "all", "none" or a comma-separated list
    #[arg(long, value_name = "FILES")]
    pub process_files: Option<FileSelection>,

    /// Remove previous outputs and logs first
    #[arg(long)]
    pub clean: bool,

    /// Skip the CSV export
    #[arg(long)]
    pub no_csv: bool,

    /// Skip the extraction coverage check
    #[arg(long)]
    pub no_check_extraction: bool,

    /// Skip round-trip and schema validation
    #[arg(long)]
    pub no_check_conversion: bool,

    /// Skip the end-to-end check
    #[arg(long = "no-check-end2end")]
    pub no_check_end_to_end: bool,

    /// CSV layout for the export stage
    #[arg(long, value_enum)]
    pub csv_layout: Option<LayoutArg>,

    /// JSON Schema file (defaults to the bundled schema)
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// IDS schema generation to emit
    #[arg(long, value_name = "VERSION")]
    pub schema_version: Option<SchemaVersion>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: extract, check, convert, validate, export
    Run(RunArgs),

    /// Convert extracted intermediate models to IDS documents
    Convert {
        /// Input `<base>_extracted.json` file
        #[arg(value_name = "EXTRACTED", required_unless_present = "all")]
        input: Option<PathBuf>,

        /// Output IDS file (defaults to `<base>.ids.json` next to the input)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Convert every `*/<base>_extracted.json` under DIR
        #[arg(long, value_name = "DIR", conflicts_with_all = ["input", "output"])]
        all: Option<PathBuf>,

        /// IDS schema generation to emit
        #[arg(long, value_name = "VERSION", default_value_t = SchemaVersion::default())]
        schema_version: SchemaVersion,

        /// Validate each document against this JSON Schema
        #[arg(long, value_name = "FILE")]
        schema: Option<PathBuf>,
    },

    /// Check an IDS document against the intermediate model it came from
    Verify {
        /// Intermediate `<base>_extracted.json` file
        #[arg(value_name = "EXTRACTED")]
        extracted: PathBuf,

        /// IDS document
        #[arg(value_name = "IDS")]
        ids: PathBuf,

        /// Absolute tolerance for numeric comparisons
        #[arg(long, default_value_t = chromids::verify::DEFAULT_TOLERANCE)]
        tolerance: f64,
    },

    /// Validate an IDS document against its JSON Schema
    Validate {
        /// IDS document
        #[arg(value_name = "IDS")]
        file: PathBuf,

        /// JSON Schema file (defaults to the bundled schema)
        #[arg(long, value_name = "FILE")]
        schema: Option<PathBuf>,

        /// Expected schema generation (defaults to the one the document declares)
        #[arg(long, value_name = "VERSION")]
        schema_version: Option<SchemaVersion>,
    },

    /// Export an IDS document to CSV
    Export {
        /// IDS document
        #[arg(value_name = "IDS")]
        file: PathBuf,

        /// CSV layout
        #[arg(short, long, default_value = "wide", value_enum)]
        layout: LayoutArg,

        /// Output directory (defaults to the document's directory)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run::run(args),
        Commands::Convert {
            input,
            output,
            all,
            schema_version,
            schema,
        } => match all {
            Some(dir) => convert::run_all(dir, schema_version, schema),
            None => convert::run(input, output, schema_version, schema),
        },
        Commands::Verify {
            extracted,
            ids,
            tolerance,
        } => verify::run(extracted, ids, tolerance),
        Commands::Validate {
            file,
            schema,
            schema_version,
        } => validate::run(file, schema, schema_version),
        Commands::Export {
            file,
            layout,
            output_dir,
        } => export::run(file, CsvLayout::from(layout), output_dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_flags_parse() {
        let cli = Cli::try_parse_from([
            "chromids",
            "run",
            "--data-dir",
            "in",
            "--process-files",
            "a.zip,b.zip",
            "--no-csv",
            "--no-check-end2end",
            "--csv-layout",
            "per-curve",
            "--schema-version",
            "0.9.0",
        ])
        .unwrap();

        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.data_dir, Some(PathBuf::from("in")));
        assert_eq!(
            args.process_files,
            Some(FileSelection::Named(vec!["a.zip".into(), "b.zip".into()]))
        );
        assert!(args.no_csv);
        assert!(args.no_check_end_to_end);
        assert!(!args.no_check_conversion);
        assert!(matches!(args.csv_layout, Some(LayoutArg::PerCurve)));
        assert_eq!(args.schema_version, Some(SchemaVersion::Legacy));
    }

    #[test]
    fn test_convert_requires_input_or_all() {
        assert!(Cli::try_parse_from(["chromids", "convert"]).is_err());
        assert!(Cli::try_parse_from(["chromids", "convert", "--all", "out"]).is_ok());
        assert!(Cli::try_parse_from(["chromids", "convert", "x_extracted.json"]).is_ok());
    }
}
