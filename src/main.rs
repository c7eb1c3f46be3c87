//! # chromids
//!
//! Command-line front end for the chromatography to IDS pipeline.
//!
//! ## Usage
//!
//! ```bash
//! # Run the whole pipeline over data/akta/*.zip
//! chromids run --clean
//!
//! # Convert, verify and export a single run
//! chromids convert out/run1/run1_extracted.json
//! chromids verify out/run1/run1_extracted.json out/run1/run1.ids.json
//! chromids export out/run1/run1.ids.json --layout per-curve
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::{dispatch, init_logging, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());
    dispatch(cli)
}
