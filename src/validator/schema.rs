use std::fs;
use std::path::PathBuf;

use jsonschema::JSONSchema;
use serde_json::Value;

use crate::ids::{IdsDocument, SchemaVersion};

use super::{ValidationCheck, ValidationReport};

const IDS_V1_SCHEMA: &str = include_str!("../../schemas/ids_v1.schema.json");
const IDS_V0_SCHEMA: &str = include_str!("../../schemas/ids_v0.schema.json");

/// Where the JSON Schema for validation comes from
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SchemaSource {
    /// No schema: structural validation is skipped with a note
    #[default]
    NotSupplied,
    /// The schema shipped with this crate for the expected version
    Bundled,
    /// A schema file on disk
    Path(PathBuf),
    /// An already-parsed schema
    Inline(Value),
}

impl SchemaSource {
    /// Schema file if given, otherwise the bundled schema
    pub fn from_path_or_bundled(path: Option<PathBuf>) -> Self {
        path.map_or(SchemaSource::Bundled, SchemaSource::Path)
    }
}

/// Load and compile a schema.
///
/// Any failure is returned as a reason string: an unusable schema means
/// validation is skipped, not that the document is invalid.
pub(crate) fn compile_schema(
    source: &SchemaSource,
    version: SchemaVersion,
) -> Result<JSONSchema, String> {
    let value = match source {
        SchemaSource::NotSupplied => return Err("no schema supplied".to_string()),
        SchemaSource::Bundled => {
            let text = match version {
                SchemaVersion::V1 => IDS_V1_SCHEMA,
                SchemaVersion::Legacy => IDS_V0_SCHEMA,
            };
            serde_json::from_str(text).map_err(|e| format!("bundled schema is not JSON: {e}"))?
        }
        SchemaSource::Path(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("cannot read schema {}: {e}", path.display()))?;
            serde_json::from_str(&text)
                .map_err(|e| format!("schema {} is not JSON: {e}", path.display()))?
        }
        SchemaSource::Inline(value) => value.clone(),
    };

    let compiled =
        JSONSchema::compile(&value).map_err(|e| format!("schema does not compile: {e}"))?;
    Ok(compiled)
}

/// JSON Schema conformance. Every schema error becomes a failed check
/// carrying the instance path.
pub(crate) fn check_schema_conformance(
    schema: &JSONSchema,
    doc: &IdsDocument,
    report: &mut ValidationReport,
) {
    let instance = match serde_json::to_value(doc) {
        Ok(value) => value,
        Err(e) => {
            report.add_check(ValidationCheck::failed(
                "JSON Schema conformance",
                format!("document does not serialize: {e}"),
            ));
            return;
        }
    };

    let result = schema.validate(&instance);
    match result {
        Ok(()) => report.add_check(ValidationCheck::ok("JSON Schema conformance")),
        Err(errors) => {
            for error in errors {
                let path = error.instance_path.to_string();
                let location = if path.is_empty() { "/".to_string() } else { path };
                report.add_check(ValidationCheck::failed(
                    "JSON Schema conformance",
                    format!("{location}: {error}"),
                ));
            }
        }
    }
}
