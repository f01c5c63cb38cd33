//! Build descriptor model for the build variant resolver.
//!
//! This crate holds the descriptor schema as authored ([`RawDescriptor`]),
//! the validated value types the resolver produces from it, and the TOML and
//! JSON loaders. It performs no cross-field validation; see the
//! `variant-resolver` crate for that.

pub mod application_id;
pub mod coordinate;
pub mod descriptor;
pub mod error;
pub mod field;
pub mod language;
pub mod signing;
pub mod version;

pub use application_id::ApplicationId;
pub use coordinate::{DependencyCoordinate, DependencyScope, DependencyTable, RawDependency};
pub use descriptor::{RawDescriptor, VariantOverride};
pub use error::{Error, Result};
pub use field::{RawField, describe_value};
pub use language::LanguageLevel;
pub use signing::{RawSigning, SigningConfig};
pub use version::{Version, VersionConstraint};
