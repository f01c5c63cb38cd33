//! Stage 2: version ordering across fields.
//!
//! Only adjacent pairs of the chain `min <= target <= compile` are compared,
//! so a single out-of-order value is reported exactly once.

use std::fmt::Display;

use super::structural::Checked;
use crate::validation::ValidationError;

pub(crate) fn check(checked: &Checked, errors: &mut Vec<ValidationError>) {
    ordered(
        errors,
        ("minSupportedVersion", checked.min_supported_version),
        ("targetSupportedVersion", checked.target_supported_version),
    );
    ordered(
        errors,
        ("targetSupportedVersion", checked.target_supported_version),
        ("compileTargetVersion", checked.compile_target_version),
    );
    ordered(
        errors,
        ("sourceCompatibility", checked.source_compatibility),
        ("targetCompatibility", checked.target_compatibility),
    );

    for variant in &checked.variants {
        ordered(
            errors,
            (
                &format!("buildVariants.{}.minSupportedVersion", variant.name),
                variant.min_supported_version,
            ),
            ("targetSupportedVersion", checked.target_supported_version),
        );
    }
}

/// Push a `VersionOrder` error when both sides are known and `lower > upper`.
fn ordered<T: PartialOrd + Display>(
    errors: &mut Vec<ValidationError>,
    (lower_path, lower): (&str, Option<T>),
    (upper_path, upper): (&str, Option<T>),
) {
    if let (Some(lower), Some(upper)) = (lower, upper) {
        if lower > upper {
            errors.push(ValidationError::VersionOrder {
                lower_path: lower_path.to_string(),
                lower: lower.to_string(),
                upper_path: upper_path.to_string(),
                upper: upper.to_string(),
            });
        }
    }
}
