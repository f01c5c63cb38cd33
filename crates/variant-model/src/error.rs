use std::path::PathBuf;

/// Errors raised while loading descriptors or parsing individual values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to parse a TOML descriptor document.
    #[error("failed to parse descriptor TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to parse a JSON descriptor document.
    #[error("failed to parse descriptor JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Failed to serialize a descriptor or configuration to TOML.
    #[error("failed to serialize to TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Descriptor file not found at the expected path.
    #[error("descriptor not found: {0}")]
    DescriptorNotFound(PathBuf),

    /// Descriptor file extension is neither `.toml` nor `.json`.
    #[error("unsupported descriptor format: {0}")]
    UnsupportedFormat(PathBuf),

    /// I/O error reading descriptor files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Application identifier does not match the dotted segment pattern.
    #[error("invalid application id '{value}': {reason}")]
    InvalidApplicationId { value: String, reason: String },

    /// Language level outside the known set.
    #[error("unknown language level '{0}'")]
    UnknownLanguageLevel(String),

    /// Version constraint could not be parsed.
    #[error("invalid version constraint '{constraint}': {reason}")]
    InvalidConstraint { constraint: String, reason: String },

    /// Dependency notation could not be split into identifier and version.
    #[error("invalid dependency '{notation}': {reason}")]
    InvalidCoordinate { notation: String, reason: String },

    /// Dependency configuration name is not one of the known scopes.
    #[error("unknown dependency configuration '{0}'")]
    UnknownScope(String),
}

pub type Result<T> = std::result::Result<T, Error>;
