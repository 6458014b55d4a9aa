//! Registry configuration: named catalogues of key managers and the configs
//! that select from them.
//!
//! A [`RegistryConfig`] lists [`KeyTypeEntry`] records. Applying it with
//! [`Registry::register_config`](crate::Registry::register_config) asks the
//! catalogue named by each entry for a key manager and registers it under the
//! entry's type URL, honouring `new_key_allowed`.
//!
//! Configs are plain serde data; loading them from disk is the caller's job.

use crate::error::CryptoError;
use crate::key_manager::KeyManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Source of key managers for one primitive type, addressed by name.
pub trait Catalogue<P: ?Sized>: Send + Sync {
    /// Primitive name this catalogue serves (e.g. `"Mac"`), matched
    /// case-insensitively against [`KeyTypeEntry::primitive_name`].
    fn primitive_name(&self) -> &str;

    /// Return a key manager for `type_url` with at least `min_version`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::UnsupportedKeyType`] if the catalogue has no
    /// manager for the type URL or version.
    fn key_manager(
        &self,
        type_url: &str,
        primitive_name: &str,
        min_version: u32,
    ) -> Result<Arc<dyn KeyManager<P>>, CryptoError>;
}

/// One key type to register.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTypeEntry {
    /// Primitive produced by the key type (e.g. `"Mac"`, `"Aead"`).
    pub primitive_name: String,
    /// Type URL under which the manager is registered.
    pub type_url: String,
    /// Minimum key manager version required.
    #[serde(default)]
    pub key_manager_version: u32,
    /// Whether `new_key_data` may generate keys of this type.
    #[serde(default = "default_new_key_allowed")]
    pub new_key_allowed: bool,
    /// Name of the catalogue providing the manager.
    pub catalogue_name: String,
}

const fn default_new_key_allowed() -> bool {
    true
}

/// A named list of key types to register.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Informational name of the config.
    pub config_name: String,
    /// Key types, registered in order.
    #[serde(default)]
    pub entries: Vec<KeyTypeEntry>,
}

impl RegistryConfig {
    /// Parse a JSON config document.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Config`] if the document is malformed or an
    /// entry is missing its type URL, primitive name or catalogue name.
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CryptoError::Config(format!("malformed config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Config`] if serialization fails.
    pub fn to_json(&self) -> Result<String, CryptoError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CryptoError::Config(format!("config serialization failed: {e}")))
    }

    /// Check that every entry names a type URL, primitive and catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Config`] naming the first incomplete entry.
    pub fn validate(&self) -> Result<(), CryptoError> {
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.type_url.is_empty() {
                return Err(CryptoError::Config(format!(
                    "entry {index}: missing type_url"
                )));
            }
            if entry.primitive_name.is_empty() {
                return Err(CryptoError::Config(format!(
                    "entry {index} ({}): missing primitive_name",
                    entry.type_url
                )));
            }
            if entry.catalogue_name.is_empty() {
                return Err(CryptoError::Config(format!(
                    "entry {index} ({}): missing catalogue_name",
                    entry.type_url
                )));
            }
        }
        Ok(())
    }
}
