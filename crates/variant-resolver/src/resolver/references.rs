//! Stage 3: signing references between variants.
//!
//! `signingConfigRef` is a by-name lookup into the declared variants and may
//! span at most one hop. The target must carry its own signing (inline, or
//! the descriptor default) rather than borrow it from a third variant, which
//! keeps resolution independent of declaration order. A variant may name
//! itself only when it declares an inline signing definition.
//!
//! Variants that failed stage 1 still count as declared. A reference to one
//! is not checked further, since its own error already covers it.

use std::collections::HashMap;

use super::structural::CheckedVariant;
use crate::validation::ValidationError;

/// How a variant obtains its signing definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SigningLink {
    /// Its own inline definition, or the default when it has none.
    Own,
    /// The named variant's own definition.
    Borrowed(String),
}

/// Resolve every variant's signing link, in declaration order.
///
/// `rejected` names the declared variants whose table failed stage 1.
/// Variants whose reference fails, or points at a rejected variant, get no
/// entry.
pub(crate) fn check(
    variants: &[CheckedVariant],
    rejected: &[String],
    errors: &mut Vec<ValidationError>,
) -> HashMap<String, SigningLink> {
    let by_name: HashMap<&str, &CheckedVariant> =
        variants.iter().map(|v| (v.name.as_str(), v)).collect();

    let mut links = HashMap::with_capacity(variants.len());
    for variant in variants {
        match link_for(variant, &by_name, rejected) {
            Ok(Some(link)) => {
                links.insert(variant.name.clone(), link);
            }
            Ok(None) => {}
            Err(error) => errors.push(error),
        }
    }
    links
}

fn link_for(
    variant: &CheckedVariant,
    by_name: &HashMap<&str, &CheckedVariant>,
    rejected: &[String],
) -> Result<Option<SigningLink>, ValidationError> {
    let Some(target_name) = variant.signing_ref.as_deref() else {
        return Ok(Some(SigningLink::Own));
    };

    if target_name == variant.name {
        return if variant.declares_signing {
            Ok(Some(SigningLink::Own))
        } else {
            Err(ValidationError::ReferenceDepth {
                variant: variant.name.clone(),
                chain: vec![variant.name.clone(), variant.name.clone()],
            })
        };
    }

    let Some(target) = by_name.get(target_name) else {
        if rejected.iter().any(|name| name == target_name) {
            return Ok(None);
        }
        return Err(ValidationError::UnresolvedReference {
            variant: variant.name.clone(),
            target: target_name.to_string(),
        });
    };

    if let Some(next) = target.signing_ref.as_deref() {
        let terminal_self_ref = next == target.name && target.declares_signing;
        if !terminal_self_ref {
            return Err(ValidationError::ReferenceDepth {
                variant: variant.name.clone(),
                chain: vec![
                    variant.name.clone(),
                    target.name.clone(),
                    next.to_string(),
                ],
            });
        }
    }

    if variant.declares_signing {
        tracing::warn!(
            variant = %variant.name,
            target = %target.name,
            "Variant declares inline signing and a signing reference; using the inline definition"
        );
        return Ok(Some(SigningLink::Own));
    }

    Ok(Some(SigningLink::Borrowed(target.name.clone())))
}
