//! Error types for geolens operations.

use thiserror::Error;

/// Result type alias using GeoError.
pub type GeoResult<T> = Result<T, GeoError>;

/// Primary error type for decode and processing operations.
///
/// Every failure is scoped to the single operation that produced it; a
/// failed decode leaves previously loaded state untouched.
#[derive(Debug, Error)]
pub enum GeoError {
    /// The file extension maps to no known decoder.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The bytes do not parse as the detected format. `detail` names the
    /// offending member or field where that is known.
    #[error("malformed input: {detail}")]
    MalformedInput { detail: String },

    /// Neither the primary coordinate name nor its alias resolved.
    #[error("missing coordinate axis: {0}")]
    MissingCoordinates(String),

    /// A coordinate axis resolved but held no valid numeric samples.
    #[error("invalid coordinate axis: {0}")]
    InvalidCoordinates(String),

    /// A decode produced zero features or zero samples.
    #[error("dataset contains no features")]
    EmptyDataset,

    /// Remote catalog listing or download failure.
    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeoError {
    /// Create a MalformedInput error.
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedInput {
            detail: detail.into(),
        }
    }
}

impl From<serde_json::Error> for GeoError {
    fn from(err: serde_json::Error) -> Self {
        GeoError::MalformedInput {
            detail: format!("JSON error: {}", err),
        }
    }
}
