/// Errors raised when an intermediate model cannot be built or loaded.
///
/// Every variant means the input is malformed for conversion purposes: the
/// file is skipped, the rest of a batch continues.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A required key is absent (or empty) in the intermediate document
    #[error("Malformed input: missing required key '{0}'")]
    MissingKey(String),

    /// Two curve groups share one identifier
    #[error("Malformed input: duplicate curve identifier '{0}'")]
    DuplicateCurveId(String),

    /// Two distinct identifiers map to the same IDS curve id
    #[error("Malformed input: curve identifiers '{first}' and '{second}' both map to curve id '{curve_id}'")]
    CurveIdCollision {
        first: String,
        second: String,
        curve_id: String,
    },

    /// I/O error reading the intermediate file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON syntax or type error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ModelError {
    pub(crate) fn missing(key: impl Into<String>) -> Self {
        Self::MissingKey(key.into())
    }
}
