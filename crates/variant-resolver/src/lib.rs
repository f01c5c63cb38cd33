//! Build variant configuration resolver.
//!
//! Interprets a build descriptor (SDK version bounds, language levels,
//! application id, version metadata, per-variant overrides and dependencies),
//! validates it and produces a fully resolved [`ResolvedConfiguration`]:
//!
//! ```
//! use variant_model::RawDescriptor;
//! use variant_resolver::{ValidationErrorKind, resolve};
//!
//! let raw = RawDescriptor::from_toml(r#"
//! compileTargetVersion = 33
//! applicationId = "com.example.app"
//! minSupportedVersion = 34
//! targetSupportedVersion = 33
//! versionCode = 1
//! versionName = "1.0.0"
//! "#).unwrap();
//!
//! let errors = resolve(&raw).unwrap_err();
//! assert_eq!(errors.kinds(), vec![ValidationErrorKind::VersionOrder]);
//! ```
//!
//! Resolution is a pure function of the descriptor. Loading from disk is
//! kept separate, in [`load_and_resolve`] and
//! [`RawDescriptor::from_path`](variant_model::RawDescriptor::from_path).

pub mod error;
pub mod resolved;
pub mod resolver;
pub mod validation;

use std::path::Path;

use variant_model::RawDescriptor;

pub use error::{Error, Result};
pub use resolved::{ResolvedConfiguration, ResolvedVariant, SigningSource};
pub use resolver::resolve;
pub use validation::{
    DependencyDeclaration, ValidationError, ValidationErrorKind, ValidationErrors,
};

/// Load a descriptor file (`.toml` or `.json`) and resolve it.
pub fn load_and_resolve(path: &Path) -> Result<ResolvedConfiguration> {
    let raw = RawDescriptor::from_path(path)?;
    Ok(resolve(&raw)?)
}
