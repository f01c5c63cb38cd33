//! Reverse-domain application identifiers.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An application identifier such as `com.example.billing`.
///
/// At least two dot-separated segments; each segment starts with an ASCII
/// letter and continues with ASCII letters, digits or underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApplicationId(String);

impl ApplicationId {
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidApplicationId {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        if value.is_empty() {
            return Err(invalid("must not be empty"));
        }

        let segments: Vec<&str> = value.split('.').collect();
        if segments.len() < 2 {
            return Err(invalid("expected at least two dot-separated segments"));
        }
        for segment in segments {
            check_segment(segment).map_err(|reason| invalid(&reason))?;
        }

        Ok(Self(value.to_string()))
    }

    /// Append a build variant suffix such as `.debug`.
    ///
    /// A missing leading dot is inserted, matching how Android build types
    /// treat `applicationIdSuffix`.
    pub fn with_suffix(&self, suffix: &str) -> Result<Self> {
        let suffix = suffix.strip_prefix('.').unwrap_or(suffix);
        Self::parse(&format!("{}.{}", self.0, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn check_segment(segment: &str) -> std::result::Result<(), String> {
    let mut chars = segment.chars();
    match chars.next() {
        None => return Err("empty segment".to_string()),
        Some(c) if !c.is_ascii_alphabetic() => {
            return Err(format!("segment '{segment}' must start with a letter"));
        }
        Some(_) => {}
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        return Err(format!("segment '{segment}' contains '{bad}'"));
    }
    Ok(())
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ApplicationId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ApplicationId> for String {
    fn from(value: ApplicationId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("com.example.fesfpakistan_bill_log_app")]
    #[case("io.app")]
    #[case("org.example.v2")]
    fn test_accepts_dotted_identifiers(#[case] value: &str) {
        assert_eq!(ApplicationId::parse(value).unwrap().as_str(), value);
    }

    #[rstest]
    #[case("")]
    #[case("app")]
    #[case("com..example")]
    #[case("com.example.")]
    #[case("com.1example")]
    #[case("com.exa-mple")]
    #[case("com.example app")]
    fn test_rejects_malformed(#[case] value: &str) {
        assert!(matches!(
            ApplicationId::parse(value),
            Err(Error::InvalidApplicationId { .. })
        ));
    }

    #[test]
    fn test_suffix_with_and_without_dot() {
        let id = ApplicationId::parse("com.example.app").unwrap();
        assert_eq!(id.with_suffix(".debug").unwrap().as_str(), "com.example.app.debug");
        assert_eq!(id.with_suffix("qa").unwrap().as_str(), "com.example.app.qa");
        assert!(id.with_suffix(".9lives").is_err());
    }
}
