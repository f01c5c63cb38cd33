//! End-to-end tests over the descriptors in test-fixtures/descriptors
//!
//! Each test goes through the full flow: file on disk -> RawDescriptor ->
//! resolve -> ResolvedConfiguration or ValidationErrors.

use pretty_assertions::assert_eq;
use std::path::PathBuf;
use variant_model::{LanguageLevel, RawDescriptor, SigningConfig};
use variant_resolver::{
    Error, SigningSource, ValidationError, ValidationErrorKind, load_and_resolve, resolve,
};

/// Path to the descriptor fixtures (relative to the workspace root).
fn fixture(name: &str) -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // tests/integration -> ../../test-fixtures
    manifest_dir.join("../../test-fixtures/descriptors").join(name)
}

fn debug_key() -> SigningConfig {
    SigningConfig::new("debug.keystore", "androiddebugkey")
}

#[test]
fn test_android_app_resolves() {
    let resolved = load_and_resolve(&fixture("android_app.toml")).expect("fixture should resolve");

    assert_eq!(resolved.compile_target_version(), 33);
    assert_eq!(resolved.source_compatibility(), LanguageLevel::JAVA_11);
    assert_eq!(resolved.target_compatibility(), LanguageLevel::JAVA_11);
    assert_eq!(
        resolved.application_id().as_str(),
        "com.example.fesfpakistan_bill_log_app"
    );

    let release = resolved.variant("release").unwrap();
    assert_eq!(release.signing, Some(debug_key()));
    assert_eq!(
        release.signing_source,
        SigningSource::Inherited {
            from: "debug".into()
        }
    );
    assert_eq!(release.version_name, "1.0.0");
    assert!(!release.debuggable);

    let debug = resolved.variant("debug").unwrap();
    assert_eq!(debug.signing, Some(debug_key()));
    assert_eq!(debug.signing_source, SigningSource::Inline);
    assert_eq!(
        debug.application_id.as_str(),
        "com.example.fesfpakistan_bill_log_app.debug"
    );
    assert_eq!(debug.version_name, "1.0.0-debug");

    let stdlib = &resolved.dependencies()[0];
    assert_eq!(stdlib.id, "org.jetbrains.kotlin:kotlin-stdlib");
    assert!(stdlib.version.satisfies("1.9.0"));
}

#[test]
fn test_toml_and_json_fixtures_agree() {
    let from_toml = RawDescriptor::from_path(&fixture("android_app.toml")).unwrap();
    let from_json = RawDescriptor::from_path(&fixture("android_app.json")).unwrap();

    assert_eq!(from_toml, from_json);
    assert_eq!(
        from_toml.fingerprint().unwrap(),
        from_json.fingerprint().unwrap()
    );
    assert_eq!(resolve(&from_toml).unwrap(), resolve(&from_json).unwrap());
}

#[test]
fn test_broken_fixture_reports_every_defect_in_stage_order() {
    let raw = RawDescriptor::from_path(&fixture("broken.toml")).unwrap();
    let errors = resolve(&raw).unwrap_err();

    let reported: Vec<(ValidationErrorKind, Vec<String>)> =
        errors.iter().map(|e| (e.kind(), e.paths())).collect();
    let expected: Vec<(ValidationErrorKind, Vec<&str>)> = vec![
        (ValidationErrorKind::Type, vec!["applicationId"]),
        (ValidationErrorKind::Type, vec!["versionCode"]),
        (ValidationErrorKind::MissingField, vec!["versionName"]),
        (
            ValidationErrorKind::VersionOrder,
            vec!["minSupportedVersion", "targetSupportedVersion"],
        ),
        (
            ValidationErrorKind::UnresolvedReference,
            vec!["buildVariants.release.signingConfigRef"],
        ),
        (
            ValidationErrorKind::ReferenceDepth,
            vec!["buildVariants.staging.signingConfigRef"],
        ),
        (
            ValidationErrorKind::ReferenceDepth,
            vec!["buildVariants.beta.signingConfigRef"],
        ),
        (
            ValidationErrorKind::DuplicateDependency,
            vec!["dependencies[0]", "dependencies[2]"],
        ),
    ];

    let expected: Vec<(ValidationErrorKind, Vec<String>)> = expected
        .into_iter()
        .map(|(kind, paths)| (kind, paths.into_iter().map(String::from).collect()))
        .collect();
    assert_eq!(reported, expected);

    assert!(errors.iter().any(|e| matches!(
        e,
        ValidationError::ReferenceDepth { chain, .. } if chain == &["staging", "beta", "release"]
    )));
}

#[test]
fn test_load_and_resolve_surfaces_validation_errors() {
    let err = load_and_resolve(&fixture("broken.toml")).unwrap_err();

    match err {
        Error::Validation(errors) => assert_eq!(errors.len(), 8),
        other => panic!("expected validation errors, got {other:?}"),
    }
}

#[test]
fn test_load_and_resolve_missing_file() {
    let err = load_and_resolve(&fixture("does_not_exist.toml")).unwrap_err();
    assert!(matches!(
        err,
        Error::Model(variant_model::Error::DescriptorNotFound(_))
    ));
}

#[test]
fn test_resolved_output_can_be_cached_and_reloaded() {
    let raw = RawDescriptor::from_path(&fixture("android_app.toml")).unwrap();
    let resolved = resolve(&raw).unwrap();

    let cache = tempfile::tempdir().unwrap();
    let entry = cache
        .path()
        .join(raw.fingerprint().unwrap().replace(':', "_"))
        .with_extension("json");
    std::fs::write(&entry, resolved.to_json().unwrap()).unwrap();

    let cached = std::fs::read_to_string(&entry).unwrap();
    assert_eq!(
        variant_resolver::ResolvedConfiguration::from_json(&cached).unwrap(),
        resolved
    );
}
