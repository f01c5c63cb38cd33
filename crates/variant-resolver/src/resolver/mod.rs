//! Descriptor resolution
//!
//! [`resolve`] turns a [`RawDescriptor`] into a [`ResolvedConfiguration`] in
//! one pass over these stages:
//!
//! 1. **Structural** - required fields present, every value well shaped
//! 2. **Ordering** - `minSupportedVersion <= targetSupportedVersion <= compileTargetVersion`
//! 3. **References** - `signingConfigRef` lookups, at most one hop
//! 4. **Dependencies** - no identifier declared twice
//! 5. **Defaulting** - variants copy every default they do not override
//!
//! Stages 1 to 4 never stop early. If any of them reported an error the whole
//! list is returned and no configuration is produced.

mod dependencies;
mod ordering;
mod references;
mod structural;

use std::collections::HashMap;

use indexmap::IndexMap;
use variant_model::{RawDescriptor, SigningConfig};

use crate::resolved::{Defaults, ResolvedConfiguration, ResolvedVariant, SigningSource};
use crate::validation::{ValidationError, ValidationErrors};
use references::SigningLink;
use structural::{Checked, CheckedVariant};

/// Resolve and validate a descriptor.
///
/// Pure: the same descriptor always yields the same configuration or the
/// same error list, and nothing outside the descriptor is consulted.
///
/// # Example
///
/// ```
/// use variant_model::{RawDescriptor, VariantOverride};
/// use variant_resolver::resolve;
///
/// let raw = RawDescriptor::default()
///     .with_compile_target_version(33)
///     .with_application_id("com.example.app")
///     .with_supported_versions(21, 33)
///     .with_version(1, "1.0.0")
///     .with_variant("release", VariantOverride::new().with_signing_config_ref("debug"))
///     .with_variant("debug", VariantOverride::new());
///
/// let resolved = resolve(&raw).unwrap();
/// assert_eq!(
///     resolved.variant("release").unwrap().signing,
///     resolved.variant("debug").unwrap().signing,
/// );
/// ```
pub fn resolve(raw: &RawDescriptor) -> Result<ResolvedConfiguration, ValidationErrors> {
    tracing::debug!(
        variants = raw.build_variants.len(),
        dependencies = raw.dependencies.len(),
        "Resolving build descriptor"
    );

    let mut errors: Vec<ValidationError> = Vec::new();

    let checked = structural::check(raw, &mut errors);
    tracing::debug!(errors = errors.len(), "Structural validation done (stage 1)");

    ordering::check(&checked, &mut errors);
    tracing::debug!(errors = errors.len(), "Version ordering checked (stage 2)");

    let links = references::check(&checked.variants, &checked.rejected_variants, &mut errors);
    tracing::debug!(errors = errors.len(), "Signing references resolved (stage 3)");

    dependencies::check(&checked.dependencies, &mut errors);
    tracing::debug!(errors = errors.len(), "Dependency set checked (stage 4)");

    if !errors.is_empty() {
        tracing::debug!(errors = errors.len(), "Build descriptor rejected");
        return Err(ValidationErrors::new(errors));
    }

    let defaults = checked
        .defaults()
        .map_err(|missing| ValidationErrors::new(vec![missing]))?;

    Ok(assemble(checked, defaults, &links))
}

/// Stage 5: build each variant from owned copies of the defaults.
fn assemble(
    checked: Checked,
    defaults: Defaults,
    links: &HashMap<String, SigningLink>,
) -> ResolvedConfiguration {
    let by_name: IndexMap<&str, &CheckedVariant> = checked
        .variants
        .iter()
        .map(|v| (v.name.as_str(), v))
        .collect();

    let own_signing = |variant: &CheckedVariant| -> (Option<SigningConfig>, SigningSource) {
        match (&variant.signing, &defaults.signing) {
            (Some(inline), _) => (Some(inline.clone()), SigningSource::Inline),
            (None, Some(default)) => (Some(default.clone()), SigningSource::Default),
            (None, None) => (None, SigningSource::Unsigned),
        }
    };

    let build_variants: IndexMap<String, ResolvedVariant> = checked
        .variants
        .iter()
        .map(|variant| {
            let (signing, signing_source) = match links.get(&variant.name) {
                Some(SigningLink::Borrowed(target)) => {
                    let (signing, _) = by_name
                        .get(target.as_str())
                        .copied()
                        .map(own_signing)
                        .unwrap_or_else(|| own_signing(variant));
                    (
                        signing,
                        SigningSource::Inherited {
                            from: target.clone(),
                        },
                    )
                }
                Some(SigningLink::Own) | None => own_signing(variant),
            };

            let mut version_name = defaults.version_name.clone();
            if let Some(suffix) = &variant.version_name_suffix {
                version_name.push_str(suffix);
            }

            let resolved = ResolvedVariant {
                name: variant.name.clone(),
                application_id: variant
                    .application_id
                    .clone()
                    .unwrap_or_else(|| defaults.application_id.clone()),
                version_code: variant.version_code.unwrap_or(defaults.version_code),
                version_name,
                min_supported_version: variant
                    .min_supported_version
                    .unwrap_or(defaults.min_supported_version),
                target_supported_version: defaults.target_supported_version,
                debuggable: variant.debuggable.unwrap_or(false),
                minify_enabled: variant.minify_enabled.unwrap_or(false),
                signing,
                signing_source,
            };
            (variant.name.clone(), resolved)
        })
        .collect();

    let dependencies = checked
        .dependencies
        .into_iter()
        .map(|d| d.coordinate)
        .collect();

    tracing::debug!(
        application_id = %defaults.application_id,
        variants = build_variants.len(),
        "Build descriptor resolved"
    );

    ResolvedConfiguration::assemble(defaults, build_variants, dependencies)
}
