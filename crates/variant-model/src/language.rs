//! Java language levels used for source and target compatibility.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A Java language level, stored as its feature release number.
///
/// Levels up to 8 display in the legacy `1.x` form, later ones as the plain
/// release number, the same way Gradle's `JavaVersion` renders them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "LevelRepr", into = "String")]
pub struct LanguageLevel(u8);

#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Number(u64),
    Text(String),
}

impl LanguageLevel {
    pub const MIN: u8 = 6;
    pub const MAX: u8 = 25;

    pub const JAVA_8: Self = Self(8);
    pub const JAVA_11: Self = Self(11);
    pub const JAVA_17: Self = Self(17);

    /// Level applied when a descriptor names none.
    pub const DEFAULT: Self = Self::JAVA_8;

    /// Parse any of `11`, `1.8`, `VERSION_11`, `VERSION_1_8` or
    /// `JavaVersion.VERSION_11`.
    pub fn parse(value: &str) -> Result<Self> {
        let unknown = || Error::UnknownLanguageLevel(value.to_string());

        let trimmed = value.trim();
        let bare = trimmed.strip_prefix("JavaVersion.").unwrap_or(trimmed);
        let bare = match bare.strip_prefix("VERSION_") {
            Some(rest) => rest.replace('_', "."),
            None => bare.to_string(),
        };
        let release = bare.strip_prefix("1.").unwrap_or(&bare);

        let number: u8 = release.parse().map_err(|_| unknown())?;
        Self::from_release(u64::from(number)).ok_or_else(unknown)
    }

    pub fn from_release(release: u64) -> Option<Self> {
        u8::try_from(release)
            .ok()
            .filter(|r| (Self::MIN..=Self::MAX).contains(r))
            .map(Self)
    }

    pub fn release(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for LanguageLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 <= 8 {
            write!(f, "1.{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl TryFrom<LevelRepr> for LanguageLevel {
    type Error = Error;

    fn try_from(value: LevelRepr) -> Result<Self> {
        match value {
            LevelRepr::Number(n) => {
                Self::from_release(n).ok_or_else(|| Error::UnknownLanguageLevel(n.to_string()))
            }
            LevelRepr::Text(s) => Self::parse(&s),
        }
    }
}

impl From<LanguageLevel> for String {
    fn from(value: LanguageLevel) -> Self {
        value.to_string()
    }
}

impl Default for LanguageLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.8", 8)]
    #[case("8", 8)]
    #[case("11", 11)]
    #[case("VERSION_11", 11)]
    #[case("VERSION_1_8", 8)]
    #[case("JavaVersion.VERSION_11", 11)]
    #[case("JavaVersion.VERSION_17", 17)]
    fn test_parse_spellings(#[case] input: &str, #[case] release: u8) {
        assert_eq!(LanguageLevel::parse(input).unwrap().release(), release);
    }

    #[rstest]
    #[case("")]
    #[case("5")]
    #[case("99")]
    #[case("VERSION_X")]
    #[case("eleven")]
    fn test_parse_rejects_unknown(#[case] input: &str) {
        assert!(matches!(
            LanguageLevel::parse(input),
            Err(Error::UnknownLanguageLevel(_))
        ));
    }

    #[test]
    fn test_display_matches_gradle() {
        assert_eq!(LanguageLevel::JAVA_8.to_string(), "1.8");
        assert_eq!(LanguageLevel::JAVA_11.to_string(), "11");
    }

    #[test]
    fn test_ordering() {
        assert!(LanguageLevel::JAVA_8 < LanguageLevel::JAVA_11);
        assert!(LanguageLevel::JAVA_17 > LanguageLevel::JAVA_11);
    }

    #[test]
    fn test_deserializes_from_number_or_text() {
        let from_number: LanguageLevel = serde_json::from_str("11").unwrap();
        let from_text: LanguageLevel = serde_json::from_str("\"VERSION_11\"").unwrap();
        assert_eq!(from_number, from_text);
        assert!(serde_json::from_str::<LanguageLevel>("3").is_err());
    }
}
