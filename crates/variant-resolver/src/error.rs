//! Error types for variant-resolver

use crate::validation::ValidationErrors;

/// Result type for variant-resolver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, resolving or rendering a descriptor
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The descriptor was resolved and rejected
    #[error("descriptor rejected: {0}")]
    Validation(#[from] ValidationErrors),

    // Transparent wrappers for underlying crate errors
    /// Loading or parsing error from variant-model
    #[error(transparent)]
    Model(#[from] variant_model::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}
