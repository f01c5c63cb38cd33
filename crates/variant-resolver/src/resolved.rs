//! The fully resolved build configuration.
//!
//! This is the output of [`resolve`](crate::resolve): every default applied,
//! every signing reference replaced by the concrete definition it names.
//! A `ResolvedConfiguration` only exposes read accessors; each variant
//! owns its values outright, so nothing is shared between variants or with
//! the descriptor it came from.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use variant_model::{ApplicationId, DependencyCoordinate, LanguageLevel, SigningConfig};

use crate::Result;

/// Where a variant's effective signing definition came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SigningSource {
    /// Declared inline on the variant.
    Inline,
    /// Borrowed from the named variant via `signingConfigRef`.
    Inherited { from: String },
    /// The descriptor-wide default signing definition.
    Default,
    /// No signing definition applies.
    Unsigned,
}

/// Effective settings of one build variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedVariant {
    pub name: String,
    pub application_id: ApplicationId,
    pub version_code: u32,
    pub version_name: String,
    pub min_supported_version: u32,
    pub target_supported_version: u32,
    pub debuggable: bool,
    pub minify_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing: Option<SigningConfig>,
    pub signing_source: SigningSource,
}

/// A validated, fully resolved build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfiguration {
    compile_target_version: u32,
    source_compatibility: LanguageLevel,
    target_compatibility: LanguageLevel,
    application_id: ApplicationId,
    min_supported_version: u32,
    target_supported_version: u32,
    version_code: u32,
    version_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signing: Option<SigningConfig>,
    #[serde(default)]
    dependencies: Vec<DependencyCoordinate>,
    #[serde(default)]
    build_variants: IndexMap<String, ResolvedVariant>,
}

/// Descriptor-wide defaults after structural validation.
#[derive(Debug, Clone)]
pub(crate) struct Defaults {
    pub compile_target_version: u32,
    pub source_compatibility: LanguageLevel,
    pub target_compatibility: LanguageLevel,
    pub application_id: ApplicationId,
    pub min_supported_version: u32,
    pub target_supported_version: u32,
    pub version_code: u32,
    pub version_name: String,
    pub signing: Option<SigningConfig>,
}

impl ResolvedConfiguration {
    pub(crate) fn assemble(
        defaults: Defaults,
        build_variants: IndexMap<String, ResolvedVariant>,
        dependencies: Vec<DependencyCoordinate>,
    ) -> Self {
        Self {
            compile_target_version: defaults.compile_target_version,
            source_compatibility: defaults.source_compatibility,
            target_compatibility: defaults.target_compatibility,
            application_id: defaults.application_id,
            min_supported_version: defaults.min_supported_version,
            target_supported_version: defaults.target_supported_version,
            version_code: defaults.version_code,
            version_name: defaults.version_name,
            signing: defaults.signing,
            dependencies,
            build_variants,
        }
    }

    pub fn compile_target_version(&self) -> u32 {
        self.compile_target_version
    }

    pub fn source_compatibility(&self) -> LanguageLevel {
        self.source_compatibility
    }

    pub fn target_compatibility(&self) -> LanguageLevel {
        self.target_compatibility
    }

    pub fn application_id(&self) -> &ApplicationId {
        &self.application_id
    }

    pub fn min_supported_version(&self) -> u32 {
        self.min_supported_version
    }

    pub fn target_supported_version(&self) -> u32 {
        self.target_supported_version
    }

    pub fn version_code(&self) -> u32 {
        self.version_code
    }

    pub fn version_name(&self) -> &str {
        &self.version_name
    }

    /// The descriptor-wide default signing definition, if any.
    pub fn signing(&self) -> Option<&SigningConfig> {
        self.signing.as_ref()
    }

    pub fn dependencies(&self) -> &[DependencyCoordinate] {
        &self.dependencies
    }

    /// Look up a variant by name.
    pub fn variant(&self, name: &str) -> Option<&ResolvedVariant> {
        self.build_variants.get(name)
    }

    /// Variants in declaration order.
    pub fn variants(&self) -> impl Iterator<Item = &ResolvedVariant> {
        self.build_variants.values()
    }

    /// Take ownership of the variants, e.g. to hand each one to a separate
    /// build job.
    pub fn into_variants(self) -> IndexMap<String, ResolvedVariant> {
        self.build_variants
    }

    /// Render as TOML, for caching or inspection.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read back a configuration previously rendered with [`to_json`](Self::to_json).
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
