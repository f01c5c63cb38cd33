//! Stage 1: presence and shape of every field.

use std::collections::BTreeMap;

use serde_json::Value;
use variant_model::{
    ApplicationId, DependencyCoordinate, DependencyScope, DependencyTable, LanguageLevel,
    RawDependency, RawDescriptor, RawField, RawSigning, SigningConfig, VariantOverride,
};

use crate::resolved::Defaults;
use crate::validation::ValidationError;

/// Field values that passed structural validation; `None` where a field was
/// absent or rejected.
#[derive(Debug, Default)]
pub(crate) struct Checked {
    pub compile_target_version: Option<u32>,
    pub source_compatibility: Option<LanguageLevel>,
    pub target_compatibility: Option<LanguageLevel>,
    pub application_id: Option<ApplicationId>,
    pub min_supported_version: Option<u32>,
    pub target_supported_version: Option<u32>,
    pub version_code: Option<u32>,
    pub version_name: Option<String>,
    pub signing: Option<SigningConfig>,
    pub variants: Vec<CheckedVariant>,
    /// Declared variants whose table had the wrong shape.
    pub rejected_variants: Vec<String>,
    pub dependencies: Vec<CheckedDependency>,
}

#[derive(Debug)]
pub(crate) struct CheckedVariant {
    pub name: String,
    pub signing_ref: Option<String>,
    pub signing: Option<SigningConfig>,
    /// An inline `signing` entry is present, whether or not it validated.
    pub declares_signing: bool,
    /// Base application id with the variant suffix applied.
    pub application_id: Option<ApplicationId>,
    pub version_name_suffix: Option<String>,
    pub version_code: Option<u32>,
    pub min_supported_version: Option<u32>,
    pub debuggable: Option<bool>,
    pub minify_enabled: Option<bool>,
}

#[derive(Debug)]
pub(crate) struct CheckedDependency {
    pub index: usize,
    pub coordinate: DependencyCoordinate,
}

impl Checked {
    /// Descriptor-wide defaults.
    ///
    /// Fails with the first required field that did not pass stage 1.
    pub fn defaults(&self) -> Result<Defaults, ValidationError> {
        fn required<T: Clone>(value: &Option<T>, path: &str) -> Result<T, ValidationError> {
            value.clone().ok_or_else(|| ValidationError::missing(path))
        }

        Ok(Defaults {
            compile_target_version: required(
                &self.compile_target_version,
                "compileTargetVersion",
            )?,
            source_compatibility: required(&self.source_compatibility, "sourceCompatibility")?,
            target_compatibility: required(&self.target_compatibility, "targetCompatibility")?,
            application_id: required(&self.application_id, "applicationId")?,
            min_supported_version: required(&self.min_supported_version, "minSupportedVersion")?,
            target_supported_version: required(
                &self.target_supported_version,
                "targetSupportedVersion",
            )?,
            version_code: required(&self.version_code, "versionCode")?,
            version_name: required(&self.version_name, "versionName")?,
            signing: self.signing.clone(),
        })
    }
}

pub(crate) fn check(raw: &RawDescriptor, errors: &mut Vec<ValidationError>) -> Checked {
    let mut fields = FieldChecker { errors };
    warn_unknown(None, &raw.unknown);

    let compile_target_version =
        fields.required_positive("compileTargetVersion", raw.compile_target_version.as_ref());
    let source_compatibility =
        fields.language_level("sourceCompatibility", raw.source_compatibility.as_ref());
    let target_compatibility =
        fields.language_level("targetCompatibility", raw.target_compatibility.as_ref());
    let application_id = fields
        .required_text("applicationId", raw.application_id.as_ref())
        .and_then(|id| match ApplicationId::parse(&id) {
            Ok(id) => Some(id),
            Err(e) => {
                fields.reject("applicationId", e.to_string());
                None
            }
        });
    let min_supported_version =
        fields.required_positive("minSupportedVersion", raw.min_supported_version.as_ref());
    let target_supported_version =
        fields.required_positive("targetSupportedVersion", raw.target_supported_version.as_ref());
    let version_code = fields.required_positive("versionCode", raw.version_code.as_ref());
    let version_name = fields.required_text("versionName", raw.version_name.as_ref());
    let signing = raw
        .signing
        .as_ref()
        .and_then(|s| fields.signing("signing", s));

    let mut variants = Vec::with_capacity(raw.build_variants.len());
    let mut rejected_variants = Vec::new();
    for (name, field) in &raw.build_variants {
        let path = format!("buildVariants.{name}");
        match field {
            RawField::Value(variant) => {
                variants.push(fields.variant(&path, name, variant, application_id.as_ref()));
            }
            RawField::Malformed(_) => {
                fields.reject(
                    &path,
                    format!("expected a variant table, found {}", field.describe()),
                );
                rejected_variants.push(name.clone());
            }
        }
    }

    let dependencies = raw
        .dependencies
        .iter()
        .enumerate()
        .filter_map(|(index, field)| {
            fields
                .dependency(index, field)
                .map(|coordinate| CheckedDependency { index, coordinate })
        })
        .collect();

    Checked {
        compile_target_version,
        source_compatibility,
        target_compatibility,
        application_id,
        min_supported_version,
        target_supported_version,
        version_code,
        version_name,
        signing,
        variants,
        rejected_variants,
        dependencies,
    }
}

/// Unknown keys are ignored, with one warning each.
fn warn_unknown(path: Option<&str>, unknown: &BTreeMap<String, Value>) {
    for key in unknown.keys() {
        let key = match path {
            Some(path) => format!("{path}.{key}"),
            None => key.clone(),
        };
        tracing::warn!(%key, "Ignoring unknown descriptor key");
    }
}

struct FieldChecker<'a> {
    errors: &'a mut Vec<ValidationError>,
}

impl FieldChecker<'_> {
    fn reject(&mut self, path: &str, reason: impl Into<String>) {
        self.errors.push(ValidationError::wrong(path, reason));
    }

    fn missing(&mut self, path: &str) {
        self.errors.push(ValidationError::missing(path));
    }

    fn required_positive(&mut self, path: &str, field: Option<&RawField<i64>>) -> Option<u32> {
        match field {
            Some(field) => self.positive(path, field),
            None => {
                self.missing(path);
                None
            }
        }
    }

    fn positive(&mut self, path: &str, field: &RawField<i64>) -> Option<u32> {
        let value = match field {
            RawField::Value(v) if *v > 0 => *v,
            _ => {
                self.reject(
                    path,
                    format!("expected a positive integer, found {}", field.describe()),
                );
                return None;
            }
        };
        match u32::try_from(value) {
            Ok(v) => Some(v),
            Err(_) => {
                self.reject(path, format!("{value} is out of range"));
                None
            }
        }
    }

    fn required_text(&mut self, path: &str, field: Option<&RawField<String>>) -> Option<String> {
        match field {
            Some(field) => self.text(path, field),
            None => {
                self.missing(path);
                None
            }
        }
    }

    fn text(&mut self, path: &str, field: &RawField<String>) -> Option<String> {
        match field {
            RawField::Value(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => {
                self.reject(
                    path,
                    format!("expected a non-empty string, found {}", field.describe()),
                );
                None
            }
        }
    }

    fn boolean(&mut self, path: &str, field: &RawField<bool>) -> Option<bool> {
        match field {
            RawField::Value(b) => Some(*b),
            RawField::Malformed(_) => {
                self.reject(
                    path,
                    format!("expected a boolean, found {}", field.describe()),
                );
                None
            }
        }
    }

    fn language_level(
        &mut self,
        path: &str,
        field: Option<&RawField<LanguageLevel>>,
    ) -> Option<LanguageLevel> {
        match field {
            None => Some(LanguageLevel::DEFAULT),
            Some(RawField::Value(level)) => Some(*level),
            Some(malformed) => {
                self.reject(
                    path,
                    format!(
                        "expected a language level between {} and {}, found {}",
                        LanguageLevel::MIN,
                        LanguageLevel::MAX,
                        malformed.describe()
                    ),
                );
                None
            }
        }
    }

    fn signing(&mut self, path: &str, field: &RawField<RawSigning>) -> Option<SigningConfig> {
        let raw = match field {
            RawField::Value(raw) => raw,
            RawField::Malformed(_) => {
                self.reject(
                    path,
                    format!("expected a signing table, found {}", field.describe()),
                );
                return None;
            }
        };
        warn_unknown(Some(path), &raw.unknown);

        let store_file = self.required_text(&format!("{path}.storeFile"), raw.store_file.as_ref());
        let key_alias = self.required_text(&format!("{path}.keyAlias"), raw.key_alias.as_ref());
        let store_type = raw
            .store_type
            .as_ref()
            .and_then(|f| self.text(&format!("{path}.storeType"), f));

        Some(SigningConfig {
            store_file: store_file?,
            key_alias: key_alias?,
            store_type,
        })
    }

    fn variant(
        &mut self,
        path: &str,
        name: &str,
        raw: &VariantOverride,
        base_id: Option<&ApplicationId>,
    ) -> CheckedVariant {
        warn_unknown(Some(path), &raw.unknown);
        let signing_ref = raw
            .signing_config_ref
            .as_ref()
            .and_then(|f| self.text(&format!("{path}.signingConfigRef"), f));
        let signing = raw
            .signing
            .as_ref()
            .and_then(|f| self.signing(&format!("{path}.signing"), f));

        let suffix_path = format!("{path}.applicationIdSuffix");
        let application_id = match raw.application_id_suffix.as_ref() {
            None => base_id.cloned(),
            Some(field) => self.text(&suffix_path, field).and_then(|suffix| {
                let base = base_id?;
                match base.with_suffix(&suffix) {
                    Ok(id) => Some(id),
                    Err(e) => {
                        self.reject(&suffix_path, e.to_string());
                        None
                    }
                }
            }),
        };

        let version_name_suffix = raw
            .version_name_suffix
            .as_ref()
            .and_then(|f| self.text(&format!("{path}.versionNameSuffix"), f));
        let version_code = raw
            .version_code
            .as_ref()
            .and_then(|f| self.positive(&format!("{path}.versionCode"), f));
        let min_supported_version = raw
            .min_supported_version
            .as_ref()
            .and_then(|f| self.positive(&format!("{path}.minSupportedVersion"), f));
        let debuggable = raw
            .debuggable
            .as_ref()
            .and_then(|f| self.boolean(&format!("{path}.debuggable"), f));
        let minify_enabled = raw
            .minify_enabled
            .as_ref()
            .and_then(|f| self.boolean(&format!("{path}.minifyEnabled"), f));

        CheckedVariant {
            name: name.to_string(),
            signing_ref,
            signing,
            declares_signing: raw.signing.is_some(),
            application_id,
            version_name_suffix,
            version_code,
            min_supported_version,
            debuggable,
            minify_enabled,
        }
    }

    fn dependency(
        &mut self,
        index: usize,
        field: &RawField<RawDependency>,
    ) -> Option<DependencyCoordinate> {
        let path = format!("dependencies[{index}]");
        match field {
            RawField::Value(RawDependency::Notation(notation)) => {
                match DependencyCoordinate::parse(notation) {
                    Ok(coordinate) => Some(coordinate),
                    Err(e) => {
                        self.reject(&path, e.to_string());
                        None
                    }
                }
            }
            RawField::Value(RawDependency::Table(table)) => self.dependency_table(&path, table),
            RawField::Malformed(_) => {
                self.reject(
                    &path,
                    format!(
                        "expected a dependency notation or table, found {}",
                        field.describe()
                    ),
                );
                None
            }
        }
    }

    fn dependency_table(&mut self, path: &str, table: &DependencyTable) -> Option<DependencyCoordinate> {
        let id = self.required_text(&format!("{path}.id"), table.id.as_ref());
        let version = self.required_text(&format!("{path}.version"), table.version.as_ref());

        let configuration_path = format!("{path}.configuration");
        let configuration = match table.configuration.as_ref() {
            None => Some(DependencyScope::default()),
            Some(field) => self
                .text(&configuration_path, field)
                .and_then(|name| match DependencyScope::parse(&name) {
                    Ok(scope) => Some(scope),
                    Err(e) => {
                        self.reject(&configuration_path, e.to_string());
                        None
                    }
                }),
        };

        match DependencyCoordinate::from_parts(&id?, &version?, configuration?) {
            Ok(coordinate) => Some(coordinate),
            Err(e) => {
                self.reject(path, e.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_unknown_keys_are_logged() {
        let raw = RawDescriptor::from_toml(
            r#"
namespace = "com.example"

[buildVariants.release]
signingConfig = "debug"
"#,
        )
        .unwrap();
        let mut errors = Vec::new();
        let checked = check(&raw, &mut errors);

        assert_eq!(checked.variants[0].signing_ref, None);
        assert!(logs_contain("Ignoring unknown descriptor key"));
        assert!(logs_contain("buildVariants.release.signingConfig"));
        assert!(logs_contain("namespace"));
    }

    #[test]
    fn test_defaults_name_the_first_unchecked_field() {
        let checked = Checked {
            compile_target_version: Some(33),
            ..Checked::default()
        };

        assert_eq!(
            checked.defaults().unwrap_err(),
            ValidationError::missing("sourceCompatibility")
        );
    }

    #[test]
    fn test_malformed_variant_is_remembered() {
        let raw = RawDescriptor::from_toml(
            r#"
[buildVariants]
debug = 5

[buildVariants.release]
signingConfigRef = "debug"
"#,
        )
        .unwrap();
        let mut errors = Vec::new();
        let checked = check(&raw, &mut errors);

        assert_eq!(checked.rejected_variants, vec!["debug".to_string()]);
        assert_eq!(checked.variants.len(), 1);
        assert_eq!(checked.variants[0].signing_ref.as_deref(), Some("debug"));
    }

    #[test]
    fn test_incomplete_inline_signing_still_counts_as_declared() {
        let raw = RawDescriptor::from_toml(
            r#"
[buildVariants.release]
signingConfigRef = "release"
signing = { storeFile = "release.jks" }
"#,
        )
        .unwrap();
        let mut errors = Vec::new();
        let checked = check(&raw, &mut errors);

        let release = &checked.variants[0];
        assert!(release.declares_signing);
        assert!(release.signing.is_none());
        assert!(errors.contains(&ValidationError::missing(
            "buildVariants.release.signing.keyAlias"
        )));
    }
}
