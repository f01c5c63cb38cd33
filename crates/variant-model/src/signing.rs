//! Signing definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field::RawField;

/// A concrete signing definition handed to the packaging step.
///
/// Only names the key material; passwords and keystore handling belong to
/// the signing tool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningConfig {
    pub store_file: String,
    pub key_alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_type: Option<String>,
}

impl SigningConfig {
    pub fn new(store_file: impl Into<String>, key_alias: impl Into<String>) -> Self {
        Self {
            store_file: store_file.into(),
            key_alias: key_alias.into(),
            store_type: None,
        }
    }

    pub fn with_store_type(mut self, store_type: impl Into<String>) -> Self {
        self.store_type = Some(store_type.into());
        self
    }
}

/// A signing definition as authored; completeness is checked at resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSigning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_file: Option<RawField<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_alias: Option<RawField<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_type: Option<RawField<String>>,
    #[serde(default, flatten)]
    pub unknown: BTreeMap<String, Value>,
}

impl From<SigningConfig> for RawSigning {
    fn from(config: SigningConfig) -> Self {
        Self {
            store_file: Some(config.store_file.into()),
            key_alias: Some(config.key_alias.into()),
            store_type: config.store_type.map(RawField::from),
            unknown: BTreeMap::new(),
        }
    }
}
