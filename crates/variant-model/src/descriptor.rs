//! The build descriptor as authored.
//!
//! # Example TOML
//!
//! ```toml
//! compileTargetVersion = 33
//! sourceCompatibility = "VERSION_11"
//! targetCompatibility = "VERSION_11"
//! applicationId = "com.example.fesfpakistan_bill_log_app"
//! minSupportedVersion = 21
//! targetSupportedVersion = 33
//! versionCode = 1
//! versionName = "1.0.0"
//! dependencies = ["org.jetbrains.kotlin:kotlin-stdlib:1.9.0"]
//!
//! [buildVariants.release]
//! signingConfigRef = "debug"
//!
//! [buildVariants.debug]
//! applicationIdSuffix = ".debug"
//! debuggable = true
//! ```
//!
//! Every scalar is held as a [`RawField`], so a descriptor with wrongly
//! typed values still loads; only document syntax errors fail here.

use std::collections::BTreeMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::coordinate::RawDependency;
use crate::error::{Error, Result};
use crate::field::RawField;
use crate::language::LanguageLevel;
use crate::signing::{RawSigning, SigningConfig};

/// Complete descriptor loaded from a TOML or JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile_target_version: Option<RawField<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_compatibility: Option<RawField<LanguageLevel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_compatibility: Option<RawField<LanguageLevel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<RawField<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_supported_version: Option<RawField<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_supported_version: Option<RawField<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_code: Option<RawField<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_name: Option<RawField<String>>,
    /// Signing applied to variants that neither declare nor borrow one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing: Option<RawField<RawSigning>>,
    /// Variants in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub build_variants: IndexMap<String, RawField<VariantOverride>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<RawField<RawDependency>>,
    /// Keys the schema does not know, kept so they round-trip.
    #[serde(default, flatten)]
    pub unknown: BTreeMap<String, Value>,
}

/// Per-variant settings; anything left unset inherits the descriptor default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantOverride {
    /// Name of the variant whose signing material this variant uses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_config_ref: Option<RawField<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing: Option<RawField<RawSigning>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id_suffix: Option<RawField<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_name_suffix: Option<RawField<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_code: Option<RawField<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_supported_version: Option<RawField<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debuggable: Option<RawField<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minify_enabled: Option<RawField<bool>>,
    #[serde(default, flatten)]
    pub unknown: BTreeMap<String, Value>,
}

/// Field-wise equality that also requires variants in the same order, since
/// declaration order carries through to error and output order.
impl PartialEq for RawDescriptor {
    fn eq(&self, other: &Self) -> bool {
        let Self {
            compile_target_version,
            source_compatibility,
            target_compatibility,
            application_id,
            min_supported_version,
            target_supported_version,
            version_code,
            version_name,
            signing,
            build_variants,
            dependencies,
            unknown,
        } = self;

        *compile_target_version == other.compile_target_version
            && *source_compatibility == other.source_compatibility
            && *target_compatibility == other.target_compatibility
            && *application_id == other.application_id
            && *min_supported_version == other.min_supported_version
            && *target_supported_version == other.target_supported_version
            && *version_code == other.version_code
            && *version_name == other.version_name
            && *signing == other.signing
            && build_variants.iter().eq(other.build_variants.iter())
            && *dependencies == other.dependencies
            && *unknown == other.unknown
    }
}

impl RawDescriptor {
    /// Parse a descriptor from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a descriptor from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a descriptor file, choosing the format from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::DescriptorNotFound(path.to_path_buf()));
        }

        let extension = path.extension().and_then(|e| e.to_str());
        tracing::debug!(?path, ?extension, "Loading build descriptor");

        match extension {
            Some("toml") => Self::from_toml(&std::fs::read_to_string(path)?),
            Some("json") => Self::from_json(&std::fs::read_to_string(path)?),
            _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Content hash of the descriptor, usable as a cache key for resolved
    /// output. Descriptors that compare equal share a fingerprint; that
    /// includes the order of `buildVariants`.
    pub fn fingerprint(&self) -> Result<String> {
        let canonical = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        Ok(format!("sha256:{:x}", hasher.finalize()))
    }

    pub fn with_compile_target_version(mut self, version: i64) -> Self {
        self.compile_target_version = Some(version.into());
        self
    }

    pub fn with_compatibility(mut self, source: LanguageLevel, target: LanguageLevel) -> Self {
        self.source_compatibility = Some(source.into());
        self.target_compatibility = Some(target.into());
        self
    }

    pub fn with_application_id(mut self, id: impl Into<String>) -> Self {
        self.application_id = Some(RawField::Value(id.into()));
        self
    }

    pub fn with_supported_versions(mut self, min: i64, target: i64) -> Self {
        self.min_supported_version = Some(min.into());
        self.target_supported_version = Some(target.into());
        self
    }

    pub fn with_version(mut self, code: i64, name: impl Into<String>) -> Self {
        self.version_code = Some(code.into());
        self.version_name = Some(RawField::Value(name.into()));
        self
    }

    pub fn with_signing(mut self, signing: SigningConfig) -> Self {
        self.signing = Some(RawSigning::from(signing).into());
        self
    }

    pub fn with_variant(mut self, name: impl Into<String>, variant: VariantOverride) -> Self {
        self.build_variants.insert(name.into(), variant.into());
        self
    }

    pub fn with_dependency(mut self, dependency: impl Into<RawDependency>) -> Self {
        self.dependencies.push(RawField::Value(dependency.into()));
        self
    }
}

impl VariantOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signing_config_ref(mut self, variant: impl Into<String>) -> Self {
        self.signing_config_ref = Some(RawField::Value(variant.into()));
        self
    }

    pub fn with_signing(mut self, signing: SigningConfig) -> Self {
        self.signing = Some(RawSigning::from(signing).into());
        self
    }

    pub fn with_application_id_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.application_id_suffix = Some(RawField::Value(suffix.into()));
        self
    }

    pub fn with_version_name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.version_name_suffix = Some(RawField::Value(suffix.into()));
        self
    }

    pub fn with_version_code(mut self, code: i64) -> Self {
        self.version_code = Some(code.into());
        self
    }

    pub fn with_min_supported_version(mut self, version: i64) -> Self {
        self.min_supported_version = Some(version.into());
        self
    }

    pub fn with_debuggable(mut self, debuggable: bool) -> Self {
        self.debuggable = Some(debuggable.into());
        self
    }

    pub fn with_minify_enabled(mut self, enabled: bool) -> Self {
        self.minify_enabled = Some(enabled.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const APP_TOML: &str = r#"
compileTargetVersion = 33
sourceCompatibility = "VERSION_11"
targetCompatibility = "VERSION_11"
applicationId = "com.example.fesfpakistan_bill_log_app"
minSupportedVersion = 21
targetSupportedVersion = 33
versionCode = 1
versionName = "1.0.0"
dependencies = ["org.jetbrains.kotlin:kotlin-stdlib:1.9.0"]

[buildVariants.release]
signingConfigRef = "debug"

[buildVariants.debug]
debuggable = true
"#;

    #[test]
    fn test_from_toml() {
        let raw = RawDescriptor::from_toml(APP_TOML).unwrap();

        assert_eq!(raw.compile_target_version, Some(RawField::Value(33)));
        assert_eq!(
            raw.source_compatibility,
            Some(RawField::Value(LanguageLevel::JAVA_11))
        );
        assert_eq!(raw.dependencies.len(), 1);

        let names: Vec<&str> = raw.build_variants.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["release", "debug"]);

        let release = raw.build_variants["release"].value().unwrap();
        assert_eq!(
            release.signing_config_ref,
            Some(RawField::Value("debug".to_string()))
        );
    }

    #[test]
    fn test_wrong_types_still_load() {
        let raw = RawDescriptor::from_toml(
            r#"
compileTargetVersion = "thirty-three"
sourceCompatibility = "VERSION_99"

[buildVariants]
release = 5
"#,
        )
        .unwrap();

        assert!(matches!(
            raw.compile_target_version,
            Some(RawField::Malformed(_))
        ));
        assert!(matches!(
            raw.source_compatibility,
            Some(RawField::Malformed(_))
        ));
        assert!(matches!(
            raw.build_variants["release"],
            RawField::Malformed(_)
        ));
    }

    #[test]
    fn test_syntax_error_fails_loading() {
        let err = RawDescriptor::from_toml("compileTargetVersion = = 33").unwrap_err();
        assert!(matches!(err, Error::TomlParse(_)));
    }

    #[test]
    fn test_json_matches_toml() {
        let json = r#"{
            "compileTargetVersion": 33,
            "sourceCompatibility": "VERSION_11",
            "targetCompatibility": "VERSION_11",
            "applicationId": "com.example.fesfpakistan_bill_log_app",
            "minSupportedVersion": 21,
            "targetSupportedVersion": 33,
            "versionCode": 1,
            "versionName": "1.0.0",
            "dependencies": ["org.jetbrains.kotlin:kotlin-stdlib:1.9.0"],
            "buildVariants": {
                "release": { "signingConfigRef": "debug" },
                "debug": { "debuggable": true }
            }
        }"#;

        let from_json = RawDescriptor::from_json(json).unwrap();
        let from_toml = RawDescriptor::from_toml(APP_TOML).unwrap();
        assert_eq!(from_json, from_toml);
        assert_eq!(
            from_json.fingerprint().unwrap(),
            from_toml.fingerprint().unwrap()
        );
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let a = RawDescriptor::from_toml(APP_TOML).unwrap();
        let b = a.clone().with_version(2, "1.0.1");

        let fa = a.fingerprint().unwrap();
        assert!(fa.starts_with("sha256:"));
        assert_eq!(fa, a.fingerprint().unwrap());
        assert_ne!(fa, b.fingerprint().unwrap());
    }

    #[test]
    fn test_variant_order_is_part_of_equality() {
        let release_first = RawDescriptor::from_toml(APP_TOML).unwrap();
        let mut debug_first = release_first.clone();
        debug_first.build_variants.move_index(1, 0);

        assert_ne!(release_first, debug_first);
        assert_ne!(
            release_first.fingerprint().unwrap(),
            debug_first.fingerprint().unwrap()
        );
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let raw = RawDescriptor::from_toml(
            r#"
compileTargetVersion = 33
namespace = "com.example"

[buildVariants.release]
signingConfig = "debug"

[buildVariants.release.signing]
storeFile = "release.jks"
keyAlias = "upload"
storePassword = "secret"
"#,
        )
        .unwrap();

        assert_eq!(raw.unknown.keys().collect::<Vec<_>>(), vec!["namespace"]);
        let release = raw.build_variants["release"].value().unwrap();
        assert_eq!(release.signing_config_ref, None);
        assert_eq!(
            release.unknown.get("signingConfig"),
            Some(&serde_json::json!("debug"))
        );
        let signing = release.signing.as_ref().and_then(RawField::value).unwrap();
        assert!(signing.unknown.contains_key("storePassword"));

        let rendered = raw.to_toml().unwrap();
        assert_eq!(RawDescriptor::from_toml(&rendered).unwrap(), raw);
    }

    #[test]
    fn test_builder_matches_document() {
        let built = RawDescriptor::default()
            .with_compile_target_version(33)
            .with_compatibility(LanguageLevel::JAVA_11, LanguageLevel::JAVA_11)
            .with_application_id("com.example.fesfpakistan_bill_log_app")
            .with_supported_versions(21, 33)
            .with_version(1, "1.0.0")
            .with_dependency("org.jetbrains.kotlin:kotlin-stdlib:1.9.0")
            .with_variant("release", VariantOverride::new().with_signing_config_ref("debug"))
            .with_variant("debug", VariantOverride::new().with_debuggable(true));

        assert_eq!(built, RawDescriptor::from_toml(APP_TOML).unwrap());
    }

    #[test]
    fn test_to_toml_reloads() {
        let raw = RawDescriptor::from_toml(APP_TOML)
            .unwrap()
            .with_signing(SigningConfig::new("keystores/release.jks", "upload"));
        let rendered = raw.to_toml().unwrap();
        assert_eq!(RawDescriptor::from_toml(&rendered).unwrap(), raw);
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("app.toml");
        std::fs::write(&toml_path, APP_TOML).unwrap();
        assert!(RawDescriptor::from_path(&toml_path).is_ok());

        let yaml_path = dir.path().join("app.yaml");
        std::fs::write(&yaml_path, "a: 1").unwrap();
        assert!(matches!(
            RawDescriptor::from_path(&yaml_path),
            Err(Error::UnsupportedFormat(_))
        ));

        assert!(matches!(
            RawDescriptor::from_path(&dir.path().join("missing.toml")),
            Err(Error::DescriptorNotFound(_))
        ));
    }
}
