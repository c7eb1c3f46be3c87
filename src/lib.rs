//! # chromids - Chromatography Runs as Intermediary Data Schema
//!
//! `chromids` normalizes the curves and events of a chromatography run (UV
//! absorbance, conductivity, pressure, fraction marks, method steps, ...)
//! into a versioned, schema-checked JSON document, the IDS document, and
//! proves that nothing was lost on the way.
//!
//! ## Key Features
//!
//! - **Two schema generations**: the legacy `0.9.0` sensor layout and the
//!   current `1.0.0` curve layout, selected by [`ids::SchemaVersion`].
//!
//! - **Deterministic mapping**: the same intermediate model always maps to
//!   the same document, apart from the conversion timestamp.
//!
//! - **Round-trip verification**: every IDS document can be checked point by
//!   point against the intermediate model it came from.
//!
//! - **Fail-fast orchestration**: a fixed six-stage pipeline that stops at
//!   the first failed stage and always leaves a structured run report.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chromids::mapper::SchemaMapper;
//! use chromids::model::IntermediateModel;
//! use chromids::verify::verify;
//!
//! let model = IntermediateModel::from_file("run1/run1_extracted.json".as_ref())?;
//! let doc = SchemaMapper::default().map(&model)?;
//! doc.save("run1/run1.ids.json".as_ref())?;
//!
//! let report = verify(&model, &doc);
//! assert!(report.passed);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Running the Pipeline
//!
//! ```rust,no_run
//! use chromids::config::PipelineConfig;
//! use chromids::decoder::JsonModelDecoder;
//! use chromids::pipeline::Orchestrator;
//!
//! let orchestrator = Orchestrator::standard(PipelineConfig::default(), Box::new(JsonModelDecoder));
//! let report = orchestrator.run()?;
//! println!("success: {}", report.success);
//! # Ok::<(), chromids::pipeline::PipelineError>(())
//! ```
//!
//! This creates, per input archive:
//! ```text
//! <output_dir>/<base>/
//! ├── raw_files/                 # Unpacked archive entries
//! ├── <base>_extracted.json      # Intermediate model
//! ├── <base>_summary.json        # Per-curve and per-event summary
//! ├── <base>.ids.json            # IDS document
//! └── <base>.csv                 # CSV export
//! ```
//!
//! ## Architecture
//!
//! - [`model`]: the decoder-produced intermediate model
//! - [`ids`]: IDS document types for both schema generations
//! - [`mapper`]: intermediate model to IDS document
//! - [`validator`]: JSON Schema and version checks
//! - [`verify`]: round-trip verification
//! - [`decoder`]: the archive decoder seam
//! - [`extract`], [`convert`], [`export`]: per-file stage work
//! - [`pipeline`]: the stage orchestrator
//! - [`config`]: pipeline settings and TOML config files

// Allow some patterns common in scientific code
#![allow(clippy::too_many_arguments)]

pub mod config;
pub mod convert;
pub mod decoder;
pub mod export;
pub mod extract;
pub mod ids;
pub mod layout;
pub mod mapper;
pub mod model;
pub mod pipeline;
pub mod validator;
pub mod verify;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{ConfigFile, FileSelection, PipelineConfig};
    pub use crate::convert::{convert_batch, convert_file, BatchReport, ConvertError};
    pub use crate::decoder::{ArchiveDecoder, DecodeError, JsonModelDecoder};
    pub use crate::export::{export_document, CsvLayout, ExportError};
    pub use crate::ids::{IdsDocument, SchemaVersion};
    pub use crate::mapper::{MapperConfig, SchemaMapper};
    pub use crate::model::{CurveGroup, EventEntry, EventGroup, FileMetadata, IntermediateModel, ModelError};
    pub use crate::pipeline::{Orchestrator, RunReport, Stage, StageKind, StageOutcome};
    pub use crate::validator::{SchemaSource, SchemaValidator, ValidationReport};
    pub use crate::verify::{verify, Discrepancy, RoundTripVerifier, VerificationReport};
}
