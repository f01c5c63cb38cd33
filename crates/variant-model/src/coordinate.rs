//! Dependency coordinates: an identifier, a version constraint and the
//! configuration the library is added to.
//!
//! Two string notations are accepted:
//!
//! - Gradle style: `org.jetbrains.kotlin:kotlin-stdlib:1.9.0`
//! - Short style: `kotlin-stdlib@1.9.0`
//!
//! The identifier is everything before the version (`group:artifact` or the
//! bare name) and is what dependency uniqueness is checked on.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field::RawField;
use crate::version::VersionConstraint;

/// Dependency configuration (Gradle's `implementation`, `api`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyScope {
    #[default]
    Implementation,
    Api,
    CompileOnly,
    RuntimeOnly,
    TestImplementation,
}

impl DependencyScope {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "implementation" => Ok(Self::Implementation),
            "api" => Ok(Self::Api),
            "compileOnly" => Ok(Self::CompileOnly),
            "runtimeOnly" => Ok(Self::RuntimeOnly),
            "testImplementation" => Ok(Self::TestImplementation),
            other => Err(Error::UnknownScope(other.to_string())),
        }
    }
}

/// A validated dependency coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyCoordinate {
    pub id: String,
    pub version: VersionConstraint,
    #[serde(default)]
    pub configuration: DependencyScope,
}

impl DependencyCoordinate {
    /// Parse a string notation into an `implementation` dependency.
    pub fn parse(notation: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidCoordinate {
            notation: notation.to_string(),
            reason: reason.to_string(),
        };

        let (id, version) = if let Some((name, version)) = notation.split_once('@') {
            (name, version)
        } else {
            match notation.rsplit_once(':') {
                Some((id, version)) if id.contains(':') => (id, version),
                _ => {
                    return Err(invalid(
                        "expected 'group:artifact:version' or 'name@version'",
                    ));
                }
            }
        };

        Self::from_parts(id, version, DependencyScope::default()).map_err(|e| match e {
            Error::InvalidCoordinate { reason, .. } => invalid(&reason),
            other => other,
        })
    }

    /// Build a coordinate from an identifier and a constraint string.
    pub fn from_parts(id: &str, version: &str, configuration: DependencyScope) -> Result<Self> {
        check_identifier(id).map_err(|reason| Error::InvalidCoordinate {
            notation: id.to_string(),
            reason,
        })?;
        if version.trim().is_empty() {
            return Err(Error::InvalidCoordinate {
                notation: id.to_string(),
                reason: "missing version".to_string(),
            });
        }

        Ok(Self {
            id: id.to_string(),
            version: VersionConstraint::parse(version)?,
            configuration,
        })
    }
}

impl std::fmt::Display for DependencyCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.id.contains(':') {
            write!(f, "{}:{}", self.id, self.version)
        } else {
            write!(f, "{}@{}", self.id, self.version)
        }
    }
}

fn check_identifier(id: &str) -> std::result::Result<(), String> {
    if id.is_empty() {
        return Err("missing identifier".to_string());
    }
    for part in id.split(':') {
        if part.is_empty() {
            return Err(format!("empty segment in '{id}'"));
        }
        if let Some(bad) = part
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        {
            return Err(format!("'{bad}' is not allowed in '{id}'"));
        }
    }
    if id.split(':').count() > 2 {
        return Err(format!("too many ':' separators in '{id}'"));
    }
    Ok(())
}

/// A dependency as authored: a string notation or a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDependency {
    Notation(String),
    Table(DependencyTable),
}

/// Table form: `{ id = "...", version = "...", configuration = "api" }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RawField<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<RawField<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<RawField<String>>,
}

impl From<&str> for RawDependency {
    fn from(notation: &str) -> Self {
        RawDependency::Notation(notation.to_string())
    }
}

impl From<DependencyCoordinate> for RawDependency {
    fn from(coordinate: DependencyCoordinate) -> Self {
        let configuration = serde_json::to_value(coordinate.configuration)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string));
        RawDependency::Table(DependencyTable {
            id: Some(coordinate.id.into()),
            version: Some(String::from(coordinate.version).into()),
            configuration: configuration.map(RawField::from),
        })
    }
}
