//! Catalogues exposing the key managers of this crate, and the standard
//! config that registers all of them.

use crate::{aes_gcm, hmac};
use std::sync::Arc;
use tessera_core::{
    Aead, Catalogue, CryptoError, KeyManager, KeyTypeEntry, Mac, Registry, RegistryConfig,
};
use tracing::debug;

/// Catalogue name shared by every manager of this crate.
pub const CATALOGUE_NAME: &str = "Tessera";

/// Name of the config returned by [`standard_config`].
pub const STANDARD_CONFIG_NAME: &str = "TESSERA_STANDARD";

fn check_version(type_url: &str, min_version: u32, version: u32) -> Result<(), CryptoError> {
    if min_version > version {
        return Err(CryptoError::UnsupportedKeyType(format!(
            "{type_url} (version {min_version} requested, {version} available)"
        )));
    }
    Ok(())
}

/// Catalogue of [`Mac`] key managers.
#[derive(Clone, Copy, Debug, Default)]
pub struct MacCatalogue;

impl Catalogue<dyn Mac> for MacCatalogue {
    fn primitive_name(&self) -> &str {
        "Mac"
    }

    fn key_manager(
        &self,
        type_url: &str,
        _primitive_name: &str,
        min_version: u32,
    ) -> Result<Arc<dyn KeyManager<dyn Mac>>, CryptoError> {
        match type_url {
            hmac::TYPE_URL => {
                check_version(type_url, min_version, hmac::VERSION)?;
                Ok(Arc::new(hmac::HmacKeyManager))
            }
            _ => Err(CryptoError::UnsupportedKeyType(type_url.to_owned())),
        }
    }
}

/// Catalogue of [`Aead`] key managers.
#[derive(Clone, Copy, Debug, Default)]
pub struct AeadCatalogue;

impl Catalogue<dyn Aead> for AeadCatalogue {
    fn primitive_name(&self) -> &str {
        "Aead"
    }

    fn key_manager(
        &self,
        type_url: &str,
        _primitive_name: &str,
        min_version: u32,
    ) -> Result<Arc<dyn KeyManager<dyn Aead>>, CryptoError> {
        match type_url {
            aes_gcm::TYPE_URL => {
                check_version(type_url, min_version, aes_gcm::VERSION)?;
                Ok(Arc::new(aes_gcm::AesGcmKeyManager))
            }
            _ => Err(CryptoError::UnsupportedKeyType(type_url.to_owned())),
        }
    }
}

fn entry(primitive_name: &str, type_url: &str) -> KeyTypeEntry {
    KeyTypeEntry {
        primitive_name: primitive_name.to_owned(),
        type_url: type_url.to_owned(),
        key_manager_version: 0,
        new_key_allowed: true,
        catalogue_name: CATALOGUE_NAME.to_owned(),
    }
}

/// Config registering every key type of this crate from [`CATALOGUE_NAME`].
#[must_use]
pub fn standard_config() -> RegistryConfig {
    RegistryConfig {
        config_name: STANDARD_CONFIG_NAME.to_owned(),
        entries: vec![
            entry("Mac", hmac::TYPE_URL),
            entry("Aead", aes_gcm::TYPE_URL),
        ],
    }
}

/// Add both catalogues to `registry` and apply [`standard_config`].
///
/// Safe to call repeatedly: catalogues and managers already present are kept.
///
/// # Errors
///
/// Propagates catalogue and config errors from the registry.
pub fn register_with(registry: &Registry) -> Result<(), CryptoError> {
    registry.add_catalogue::<dyn Mac>(CATALOGUE_NAME, Arc::new(MacCatalogue))?;
    registry.add_catalogue::<dyn Aead>(CATALOGUE_NAME, Arc::new(AeadCatalogue))?;
    registry.register_config(&standard_config())?;
    debug!(registry = ?registry, "registered standard key managers");
    Ok(())
}

/// [`register_with`] on the process-wide registry.
///
/// # Errors
///
/// Propagates catalogue and config errors from the registry.
pub fn register() -> Result<(), CryptoError> {
    register_with(Registry::global())
}
