//! Stage 4: dependency identifiers must be unique.

use indexmap::IndexMap;

use super::structural::CheckedDependency;
use crate::validation::{DependencyDeclaration, ValidationError};

/// Report one error per duplicated identifier, listing every declaration,
/// ordered by the identifier's first occurrence.
pub(crate) fn check(dependencies: &[CheckedDependency], errors: &mut Vec<ValidationError>) {
    let mut by_identifier: IndexMap<&str, Vec<&CheckedDependency>> = IndexMap::new();
    for dependency in dependencies {
        by_identifier
            .entry(dependency.coordinate.id.as_str())
            .or_default()
            .push(dependency);
    }

    for (identifier, declared) in by_identifier {
        if declared.len() < 2 {
            continue;
        }
        errors.push(ValidationError::DuplicateDependency {
            identifier: identifier.to_string(),
            declarations: declared
                .into_iter()
                .map(|d| DependencyDeclaration {
                    index: d.index,
                    notation: d.coordinate.to_string(),
                })
                .collect(),
        });
    }
}
