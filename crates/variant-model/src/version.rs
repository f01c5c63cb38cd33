//! Dependency versions and version selectors, following Gradle's notation.
//!
//! ```
//! use variant_model::version::VersionConstraint;
//!
//! let pinned = VersionConstraint::parse("31.1-jre").unwrap();
//! assert!(pinned.is_exact());
//! assert!(pinned.satisfies("31.1-jre"));
//!
//! let range = VersionConstraint::parse("[1.8,2.0)").unwrap();
//! assert!(range.satisfies("1.9.22"));
//! assert!(!range.satisfies("2.0"));
//!
//! let dynamic = VersionConstraint::parse("1.9.+").unwrap();
//! assert!(dynamic.satisfies("1.9.22"));
//! ```
//!
//! Accepted selectors:
//!
//! - a version, pinned exactly: `1.9.0`, `31.1-jre`, `1.0.0.1`, `2.0-SNAPSHOT`
//! - a prefix ending in `+`: `1.9.+`, `1.+`, `+`
//! - a range: `[1.0,2.0)`, `[1.0,)`, `(,2.0]`, `]1.0,2.0[`; `[1.0]` is a pin
//! - a latest-status selector: `latest.release`, `latest.integration`

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Characters that only appear in range syntax.
const RANGE_CHARS: &[char] = &['[', ']', '(', ')', ','];

/// A single version as Gradle orders it.
///
/// The string is split into parts on `.`, `-`, `_` and `+`, and again
/// wherever digits meet letters (`1.0rc1` is `1 0 rc 1`). Parts compare
/// numerically when both are numbers. A number sorts above any text.
/// Text compares with `dev` lowest, then ordinary qualifiers
/// alphabetically, then `rc < snapshot < final < ga < release < sp`.
/// When one version runs out of parts first, an extra numeric part makes
/// the longer version higher (`1.1 < 1.1.0`) and an extra text part makes
/// it lower (`1.1-alpha < 1.1`).
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    parts: Vec<Part>,
}

#[derive(Debug, Clone)]
enum Part {
    /// Digits with leading zeros stripped, so long runs never overflow.
    Number(String),
    Text(String),
}

impl Version {
    pub fn parse(value: &str) -> std::result::Result<Self, String> {
        let raw = value.trim();
        if raw.is_empty() {
            return Err("empty version".to_string());
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| c.is_whitespace() || RANGE_CHARS.contains(c) || *c == ':' || *c == '@')
        {
            return Err(format!("'{bad}' is not allowed in a version"));
        }

        let parts = split_parts(raw);
        if parts.is_empty() {
            return Err(format!("'{raw}' has no version parts"));
        }

        Ok(Self {
            raw: raw.to_string(),
            parts,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn split_parts(raw: &str) -> Vec<Part> {
    let mut parts = Vec::new();
    for piece in raw.split(['.', '-', '_', '+']) {
        let mut current = String::new();
        for c in piece.chars() {
            let boundary = current
                .chars()
                .last()
                .is_some_and(|last| last.is_ascii_digit() != c.is_ascii_digit());
            if boundary {
                parts.push(Part::from_token(&current));
                current.clear();
            }
            current.push(c);
        }
        if !current.is_empty() {
            parts.push(Part::from_token(&current));
        }
    }
    parts
}

impl Part {
    fn from_token(token: &str) -> Self {
        if token.chars().all(|c| c.is_ascii_digit()) {
            let digits = token.trim_start_matches('0');
            Part::Number(if digits.is_empty() { "0" } else { digits }.to_string())
        } else {
            Part::Text(token.to_string())
        }
    }

    fn is_number(&self) -> bool {
        matches!(self, Part::Number(_))
    }
}

fn qualifier_rank(text: &str) -> u8 {
    match text.to_ascii_lowercase().as_str() {
        "dev" => 0,
        "rc" => 2,
        "snapshot" => 3,
        "final" => 4,
        "ga" => 5,
        "release" => 6,
        "sp" => 7,
        _ => 1,
    }
}

impl Ord for Part {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Part::Number(a), Part::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Part::Number(_), Part::Text(_)) => Ordering::Greater,
            (Part::Text(_), Part::Number(_)) => Ordering::Less,
            (Part::Text(a), Part::Text(b)) => qualifier_rank(a)
                .cmp(&qualifier_rank(b))
                .then_with(|| a.cmp(b)),
        }
    }
}

impl PartialOrd for Part {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Part {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Part {}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.parts.iter().zip(&other.parts) {
            match a.cmp(b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }

        let shared = self.parts.len().min(other.parts.len());
        match (self.parts.get(shared), other.parts.get(shared)) {
            (Some(extra), None) if extra.is_number() => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (None, Some(extra)) if extra.is_number() => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Bound {
    version: Version,
    inclusive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Selector {
    Exact(Version),
    /// Everything before the trailing `+`; empty for a bare `+`.
    Prefix(String),
    Range {
        lower: Option<Bound>,
        upper: Option<Bound>,
    },
    Latest(String),
}

/// The version part of a dependency coordinate.
///
/// Equality compares the parsed selector, so `[1.0,2.0)` and `[1.0, 2.0)`
/// are equal. The text is kept as written for display and serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionConstraint {
    selector: Selector,
    raw: String,
}

impl PartialEq for VersionConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.selector == other.selector
    }
}

impl Eq for VersionConstraint {}

impl VersionConstraint {
    pub fn parse(constraint: &str) -> Result<Self> {
        let raw = constraint.trim().to_string();
        let selector = parse_selector(&raw).map_err(|reason| Error::InvalidConstraint {
            constraint: raw.clone(),
            reason,
        })?;
        Ok(Self { selector, raw })
    }

    /// True when the constraint pins a single version.
    pub fn is_exact(&self) -> bool {
        matches!(self.selector, Selector::Exact(_))
    }

    /// True for prefix, range and latest-status selectors.
    pub fn is_dynamic(&self) -> bool {
        !self.is_exact()
    }

    /// Check a concrete version against the selector.
    ///
    /// Strings that are not versions never match.
    pub fn satisfies(&self, version: &str) -> bool {
        let Ok(candidate) = Version::parse(version) else {
            return false;
        };
        match &self.selector {
            Selector::Exact(pinned) => &candidate == pinned,
            Selector::Prefix(prefix) => candidate.as_str().starts_with(prefix.as_str()),
            Selector::Range { lower, upper } => {
                let above = lower.as_ref().is_none_or(|b| match candidate.cmp(&b.version) {
                    Ordering::Greater => true,
                    Ordering::Equal => b.inclusive,
                    Ordering::Less => false,
                });
                let below = upper.as_ref().is_none_or(|b| match candidate.cmp(&b.version) {
                    Ordering::Less => true,
                    Ordering::Equal => b.inclusive,
                    Ordering::Greater => false,
                });
                above && below
            }
            Selector::Latest(_) => true,
        }
    }

    /// The constraint as written in the descriptor.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Normalized rendering, e.g. `[1.0, 2.0)` or `1.9.+`.
    pub fn canonical(&self) -> String {
        match &self.selector {
            Selector::Exact(version) => version.to_string(),
            Selector::Prefix(prefix) => format!("{prefix}+"),
            Selector::Latest(status) => format!("latest.{status}"),
            Selector::Range { lower, upper } => {
                let open = match lower {
                    Some(b) if b.inclusive => format!("[{}", b.version),
                    Some(b) => format!("({}", b.version),
                    None => "(".to_string(),
                };
                let close = match upper {
                    Some(b) if b.inclusive => format!("{}]", b.version),
                    Some(b) => format!("{})", b.version),
                    None => ")".to_string(),
                };
                format!("{open}, {close}")
            }
        }
    }
}

fn parse_selector(raw: &str) -> std::result::Result<Selector, String> {
    if raw.is_empty() {
        return Err("empty constraint".to_string());
    }

    if let Some(status) = raw.strip_prefix("latest.") {
        return match status {
            "release" | "milestone" | "integration" => Ok(Selector::Latest(status.to_string())),
            other => Err(format!("unknown status 'latest.{other}'")),
        };
    }

    if raw.starts_with(['[', '(', ']']) {
        return parse_range(raw);
    }

    if let Some(prefix) = raw.strip_suffix('+') {
        if !prefix.is_empty() {
            Version::parse(prefix)?;
        }
        return Ok(Selector::Prefix(prefix.to_string()));
    }

    Version::parse(raw).map(Selector::Exact)
}

fn parse_range(raw: &str) -> std::result::Result<Selector, String> {
    if raw.len() < 2 {
        return Err(format!("range '{raw}' is not closed"));
    }
    let lower_inclusive = raw.starts_with('[');
    let upper_inclusive = match raw.chars().last() {
        Some(']') => true,
        Some(')' | '[') => false,
        _ => return Err(format!("range '{raw}' is not closed")),
    };
    // Both delimiters are single ASCII characters.
    let inner = &raw[1..raw.len() - 1];

    let Some((low, high)) = inner.split_once(',') else {
        return if lower_inclusive && upper_inclusive {
            Version::parse(inner).map(Selector::Exact)
        } else {
            Err(format!("single-version range '{raw}' must use '[' and ']'"))
        };
    };

    let bound = |text: &str, inclusive: bool| -> std::result::Result<Option<Bound>, String> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(Bound {
            version: Version::parse(text)?,
            inclusive,
        }))
    };
    let lower = bound(low, lower_inclusive)?;
    let upper = bound(high, upper_inclusive)?;

    match (&lower, &upper) {
        (None, None) => Err(format!("range '{raw}' has no bounds")),
        (Some(l), Some(u)) if l.version > u.version => {
            Err(format!("range '{raw}' has its lower bound above its upper bound"))
        }
        _ => Ok(Selector::Range { lower, upper }),
    }
}

impl std::fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for VersionConstraint {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<VersionConstraint> for String {
    fn from(value: VersionConstraint) -> Self {
        value.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn version(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[rstest]
    #[case("1.9.0")]
    #[case("31.1-jre")]
    #[case("31.1-android")]
    #[case("1.0.0.1")]
    #[case("2.0-SNAPSHOT")]
    #[case("1.7.0-RC2")]
    #[case("20230227")]
    fn test_plain_versions_are_exact_pins(#[case] input: &str) {
        let c = VersionConstraint::parse(input).unwrap();
        assert!(c.is_exact());
        assert!(c.satisfies(input));
        assert_eq!(c.as_str(), input);
        assert_eq!(c.canonical(), input);
    }

    #[rstest]
    #[case("1.9.+", "1.9.22", true)]
    #[case("1.9.+", "1.10.0", false)]
    #[case("1.+", "1.0.0.1", true)]
    #[case("+", "0.0.1-alpha", true)]
    #[case("[1.0,2.0)", "1.0", true)]
    #[case("[1.0,2.0)", "2.0", false)]
    #[case("[1.0,2.0)", "2.0-rc1", true)]
    #[case("(1.0,2.0]", "1.0", false)]
    #[case("]1.0,2.0[", "1.5", true)]
    #[case("[1.0,)", "99", true)]
    #[case("(,2.0]", "2.0", true)]
    #[case("[1.9]", "1.9", true)]
    #[case("latest.release", "3.1.4", true)]
    #[case("[1.0,2.0)", "not a version", false)]
    fn test_satisfies(#[case] constraint: &str, #[case] candidate: &str, #[case] expected: bool) {
        let c = VersionConstraint::parse(constraint).unwrap();
        assert_eq!(c.satisfies(candidate), expected);
    }

    #[rstest]
    #[case("")]
    #[case("1.9 .0")]
    #[case("[1.0,2.0")]
    #[case("[2.0,1.0]")]
    #[case("(,)")]
    #[case("(1.0)")]
    #[case("latest.greatest")]
    #[case("...")]
    fn test_rejects_malformed(#[case] input: &str) {
        let err = VersionConstraint::parse(input).unwrap_err();
        assert!(matches!(err, Error::InvalidConstraint { .. }));
    }

    #[rstest]
    #[case("1.0", "1.1")]
    #[case("1.9", "1.10")]
    #[case("1.1", "1.1.0")]
    #[case("1.1-alpha", "1.1")]
    #[case("1.0-dev", "1.0-alpha")]
    #[case("1.0-beta", "1.0-rc")]
    #[case("1.0-rc", "1.0-SNAPSHOT")]
    #[case("1.0-SNAPSHOT", "1.0-final")]
    #[case("1.0-release", "1.0-sp")]
    #[case("1.0.0.1", "1.0.0.2")]
    #[case("1.0rc1", "1.0rc2")]
    #[case("99999999999999999999", "100000000000000000000")]
    fn test_ordering(#[case] lower: &str, #[case] higher: &str) {
        assert!(version(lower) < version(higher), "{lower} < {higher}");
    }

    #[test]
    fn test_separators_are_interchangeable() {
        assert_eq!(version("1.0-alpha"), version("1.0.alpha"));
        assert_eq!(version("1.0_1"), version("1.0.1"));
        assert_eq!(version("01.2"), version("1.2"));
    }

    #[test]
    fn test_range_spacing_does_not_matter() {
        let tight = VersionConstraint::parse("[1.0,2.0)").unwrap();
        let spaced = VersionConstraint::parse("[1.0, 2.0)").unwrap();
        assert_eq!(tight, spaced);
        assert_eq!(tight.canonical(), "[1.0, 2.0)");
        assert!(tight.is_dynamic());
    }

    #[test]
    fn test_serializes_as_written() {
        let c = VersionConstraint::parse("[1.8,2.0)").unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"[1.8,2.0)\"");

        let back: VersionConstraint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
