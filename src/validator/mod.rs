//! # IDS Schema Validation
//!
//! Advisory structural validation of an [`IdsDocument`] against a declared
//! schema generation. Nothing here is a hard gate: a mismatch is recorded as
//! a failed check (the `SchemaMismatch` case), logged as a warning, and the
//! pipeline carries on. A schema that cannot be found or compiled is not an
//! error either; validation is skipped and the report says so.
//!
//! ## Checks
//!
//! 1. **Schema version**: `schema_version` equals the expected version string
//! 2. **JSON Schema conformance**: one failed check per schema error, with its
//!    instance path (skipped without a schema)
//! 3. **Finite values**: warns about NaN or infinite points and positions
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chromids::ids::{IdsDocument, SchemaVersion};
//! use chromids::validator::{SchemaSource, SchemaValidator};
//! use std::path::Path;
//!
//! let doc = IdsDocument::from_file(Path::new("run.ids.json")).unwrap();
//! let validator = SchemaValidator::new(SchemaVersion::V1, SchemaSource::Bundled);
//! let report = validator.validate(&doc);
//! println!("{}", report);
//! ```

use std::fmt;

use jsonschema::JSONSchema;
use log::{debug, warn};

use crate::ids::{IdsDocument, SchemaVersion};

pub use report::{CheckStatus, ValidationCheck, ValidationReport};
pub use schema::SchemaSource;

mod data;
mod report;
mod schema;

/// Validates IDS documents against one schema generation
pub struct SchemaValidator {
    expected: SchemaVersion,
    schema: Option<JSONSchema>,
    skipped_because: Option<String>,
}

impl SchemaValidator {
    /// Create a validator, loading and compiling the schema once.
    ///
    /// An unavailable or invalid schema is logged and remembered; every
    /// subsequent report notes that structural validation was skipped.
    pub fn new(expected: SchemaVersion, source: SchemaSource) -> Self {
        match schema::compile_schema(&source, expected) {
            Ok(compiled) => {
                debug!("Compiled IDS {} schema from {}", expected, source_label(&source));
                Self {
                    expected,
                    schema: Some(compiled),
                    skipped_because: None,
                }
            }
            Err(reason) => {
                if source != SchemaSource::NotSupplied {
                    warn!("Schema unavailable, validation will be skipped: {}", reason);
                }
                Self {
                    expected,
                    schema: None,
                    skipped_because: Some(reason),
                }
            }
        }
    }

    /// Validator without a schema; only version and value checks run
    pub fn without_schema(expected: SchemaVersion) -> Self {
        Self::new(expected, SchemaSource::NotSupplied)
    }

    /// Schema generation documents are expected to carry
    pub fn expected_version(&self) -> SchemaVersion {
        self.expected
    }

    /// Whether a compiled schema is available
    pub fn has_schema(&self) -> bool {
        self.schema.is_some()
    }

    /// Validate one document. Never fails; problems end up in the report.
    pub fn validate(&self, doc: &IdsDocument) -> ValidationReport {
        let mut report = ValidationReport::new(doc.metadata.source_file.clone());

        if doc.schema_version == self.expected.as_str() {
            report.add_check(ValidationCheck::ok("Schema version"));
        } else {
            report.add_check(ValidationCheck::failed(
                "Schema version",
                format!(
                    "expected {}, document declares {}",
                    self.expected, doc.schema_version
                ),
            ));
        }

        match (&self.schema, &self.skipped_because) {
            (Some(compiled), _) => schema::check_schema_conformance(compiled, doc, &mut report),
            (None, Some(reason)) => {
                report.add_note(format!("schema validation skipped: {reason}"));
            }
            (None, None) => report.add_note("schema validation skipped"),
        }

        data::check_finite_values(doc, &mut report);

        for error in report.errors() {
            warn!("Schema mismatch in {}: {}", report.subject, error);
        }

        report
    }
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("expected", &self.expected)
            .field("has_schema", &self.schema.is_some())
            .field("skipped_because", &self.skipped_because)
            .finish()
    }
}

fn source_label(source: &SchemaSource) -> String {
    match source {
        SchemaSource::NotSupplied => "nothing".to_string(),
        SchemaSource::Bundled => "bundled schema".to_string(),
        SchemaSource::Path(path) => path.display().to_string(),
        SchemaSource::Inline(_) => "inline value".to_string(),
    }
}

#[cfg(test)]
mod tests;
