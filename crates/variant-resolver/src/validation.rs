//! Validation errors reported by [`resolve`](crate::resolve).
//!
//! Errors are accumulated across the whole pass and returned together as
//! [`ValidationErrors`], ordered by validation stage and, within a stage, by
//! declaration order in the descriptor.

use serde::Serialize;

/// Kind tag of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValidationErrorKind {
    #[serde(rename = "MissingFieldError")]
    MissingField,
    #[serde(rename = "TypeError")]
    Type,
    #[serde(rename = "VersionOrderError")]
    VersionOrder,
    #[serde(rename = "UnresolvedReferenceError")]
    UnresolvedReference,
    #[serde(rename = "ReferenceDepthError")]
    ReferenceDepth,
    #[serde(rename = "DuplicateDependencyError")]
    DuplicateDependency,
}

impl ValidationErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "MissingFieldError",
            Self::Type => "TypeError",
            Self::VersionOrder => "VersionOrderError",
            Self::UnresolvedReference => "UnresolvedReferenceError",
            Self::ReferenceDepth => "ReferenceDepthError",
            Self::DuplicateDependency => "DuplicateDependencyError",
        }
    }
}

impl std::fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declaration taking part in a duplicate dependency conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyDeclaration {
    /// Position in the descriptor's `dependencies` list.
    pub index: usize,
    /// The coordinate as declared.
    pub notation: String,
}

impl DependencyDeclaration {
    pub fn path(&self) -> String {
        format!("dependencies[{}]", self.index)
    }
}

/// A single defect found in a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind")]
pub enum ValidationError {
    /// A required field is absent.
    #[error("missing required field '{path}'")]
    #[serde(rename = "MissingFieldError")]
    MissingField { path: String },

    /// A field has the wrong primitive shape or an unacceptable value.
    #[error("invalid value at '{path}': {reason}")]
    #[serde(rename = "TypeError")]
    Type { path: String, reason: String },

    /// Two version fields are out of order.
    #[error("'{lower_path}' ({lower}) must not exceed '{upper_path}' ({upper})")]
    #[serde(rename = "VersionOrderError")]
    VersionOrder {
        lower_path: String,
        lower: String,
        upper_path: String,
        upper: String,
    },

    /// A signing reference names a variant that does not exist.
    #[error("variant '{variant}' takes its signing from unknown variant '{target}'")]
    #[serde(rename = "UnresolvedReferenceError")]
    UnresolvedReference { variant: String, target: String },

    /// A signing reference does not reach a concrete definition in one hop.
    #[error(
        "variant '{variant}' signing reference {} does not end at a concrete signing definition within one hop",
        .chain.join(" -> ")
    )]
    #[serde(rename = "ReferenceDepthError")]
    ReferenceDepth { variant: String, chain: Vec<String> },

    /// Several dependencies share one identifier.
    #[error(
        "dependency '{identifier}' is declared {} times: {}",
        .declarations.len(),
        .declarations.iter().map(|d| format!("{} at {}", d.notation, d.path())).collect::<Vec<_>>().join(", ")
    )]
    #[serde(rename = "DuplicateDependencyError")]
    DuplicateDependency {
        identifier: String,
        declarations: Vec<DependencyDeclaration>,
    },
}

impl ValidationError {
    pub(crate) fn missing(path: impl Into<String>) -> Self {
        Self::MissingField { path: path.into() }
    }

    pub(crate) fn wrong(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Type {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::MissingField { .. } => ValidationErrorKind::MissingField,
            Self::Type { .. } => ValidationErrorKind::Type,
            Self::VersionOrder { .. } => ValidationErrorKind::VersionOrder,
            Self::UnresolvedReference { .. } => ValidationErrorKind::UnresolvedReference,
            Self::ReferenceDepth { .. } => ValidationErrorKind::ReferenceDepth,
            Self::DuplicateDependency { .. } => ValidationErrorKind::DuplicateDependency,
        }
    }

    /// Field paths the error points at, e.g. `buildVariants.release.signingConfigRef`.
    pub fn paths(&self) -> Vec<String> {
        match self {
            Self::MissingField { path } | Self::Type { path, .. } => vec![path.clone()],
            Self::VersionOrder {
                lower_path,
                upper_path,
                ..
            } => vec![lower_path.clone(), upper_path.clone()],
            Self::UnresolvedReference { variant, .. } | Self::ReferenceDepth { variant, .. } => {
                vec![format!("buildVariants.{variant}.signingConfigRef")]
            }
            Self::DuplicateDependency { declarations, .. } => {
                declarations.iter().map(DependencyDeclaration::path).collect()
            }
        }
    }

    /// Human readable description; same text as `Display`.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// The complete, ordered set of defects found in one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub(crate) fn new(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ValidationError] {
        &self.0
    }

    /// Kind tags in report order.
    pub fn kinds(&self) -> Vec<ValidationErrorKind> {
        self.0.iter().map(ValidationError::kind).collect()
    }

    /// Errors of a single kind, in report order.
    pub fn of_kind(&self, kind: ValidationErrorKind) -> Vec<&ValidationError> {
        self.0.iter().filter(|e| e.kind() == kind).collect()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} validation error(s)", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  - [{}] {}", error.kind(), error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
