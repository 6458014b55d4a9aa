//! Test primitives and key managers.
//!
//! Every primitive echoes the name of the manager that built it, so tests can
//! tell which manager resolved which key.

use std::sync::Arc;
use tessera_core::{
    Aead, Catalogue, CryptoError, Key, KeyData, KeyManager, KeyMaterialType, KeyStatusType,
    KeyTemplate, Keyset, KeysetHandle, Mac, OutputPrefixType, Registry,
};

pub const DUMMY_MAC: &str = "DummyMacKeyManager";
pub const MAC2: &str = "Mac2KeyManager";
pub const DUMMY_AEAD: &str = "DummyAeadKeyManager";
pub const CUSTOM_MAC: &str = "CustomMacKeyManager";

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// MAC whose tag is its label.
pub struct DummyMac(pub String);

impl Mac for DummyMac {
    fn compute_mac(&self, _data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(self.0.as_bytes().to_vec())
    }

    fn verify_mac(&self, mac: &[u8], _data: &[u8]) -> Result<(), CryptoError> {
        if mac == self.0.as_bytes() {
            Ok(())
        } else {
            Err(CryptoError::MacVerification)
        }
    }
}

/// AEAD whose ciphertext is `label || plaintext`.
pub struct DummyAead(pub String);

impl Aead for DummyAead {
    fn encrypt(&self, plaintext: &[u8], _associated_data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut out = self.0.as_bytes().to_vec();
        out.extend_from_slice(plaintext);
        Ok(out)
    }

    fn decrypt(&self, ciphertext: &[u8], _associated_data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        ciphertext
            .strip_prefix(self.0.as_bytes())
            .map(<[u8]>::to_vec)
            .ok_or(CryptoError::Decryption)
    }
}

/// Tag computed by `mac` over empty data, as a string.
pub fn tag_of(mac: &dyn Mac) -> String {
    String::from_utf8(mac.compute_mac(&[]).unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// Key managers
// ---------------------------------------------------------------------------

/// MAC manager labelled with its own name; supports exactly `name`.
pub struct LabelMacKeyManager {
    name: &'static str,
}

impl KeyManager<dyn Mac> for LabelMacKeyManager {
    fn primitive(&self, _serialized_key: &[u8]) -> Result<Box<dyn Mac>, CryptoError> {
        Ok(Box::new(DummyMac(self.name.to_owned())))
    }

    fn new_key_data(&self, _serialized_key_format: &[u8]) -> Result<KeyData, CryptoError> {
        Ok(KeyData::new(
            self.name,
            self.name.as_bytes().to_vec(),
            KeyMaterialType::Symmetric,
        ))
    }

    fn type_url(&self) -> &str {
        self.name
    }
}

pub fn dummy_mac_manager() -> Arc<dyn KeyManager<dyn Mac>> {
    Arc::new(LabelMacKeyManager { name: DUMMY_MAC })
}

pub fn mac2_manager() -> Arc<dyn KeyManager<dyn Mac>> {
    Arc::new(LabelMacKeyManager { name: MAC2 })
}

pub fn mac_manager_named(name: &'static str) -> Arc<dyn KeyManager<dyn Mac>> {
    Arc::new(LabelMacKeyManager { name })
}

pub struct DummyAeadKeyManager;

impl KeyManager<dyn Aead> for DummyAeadKeyManager {
    fn primitive(&self, _serialized_key: &[u8]) -> Result<Box<dyn Aead>, CryptoError> {
        Ok(Box::new(DummyAead(DUMMY_AEAD.to_owned())))
    }

    fn new_key_data(&self, _serialized_key_format: &[u8]) -> Result<KeyData, CryptoError> {
        Ok(KeyData::new(
            DUMMY_AEAD,
            Vec::new(),
            KeyMaterialType::Symmetric,
        ))
    }

    fn type_url(&self) -> &str {
        DUMMY_AEAD
    }
}

/// Primitive-only manager that stands in for [`DUMMY_MAC`] keys.
pub struct CustomMacKeyManager;

impl KeyManager<dyn Mac> for CustomMacKeyManager {
    fn primitive(&self, _serialized_key: &[u8]) -> Result<Box<dyn Mac>, CryptoError> {
        Ok(Box::new(DummyMac(CUSTOM_MAC.to_owned())))
    }

    fn type_url(&self) -> &str {
        CUSTOM_MAC
    }

    fn does_support(&self, type_url: &str) -> bool {
        type_url == DUMMY_MAC
    }
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// Hands out label MAC managers for a fixed set of type URLs.
pub struct LabelMacCatalogue {
    pub type_urls: Vec<&'static str>,
}

impl Catalogue<dyn Mac> for LabelMacCatalogue {
    fn primitive_name(&self) -> &str {
        "Mac"
    }

    fn key_manager(
        &self,
        type_url: &str,
        _primitive_name: &str,
        min_version: u32,
    ) -> Result<Arc<dyn KeyManager<dyn Mac>>, CryptoError> {
        if min_version > 0 {
            return Err(CryptoError::UnsupportedKeyType(format!(
                "{type_url} version {min_version}"
            )));
        }
        self.type_urls
            .iter()
            .copied()
            .find(|known| *known == type_url)
            .map(mac_manager_named)
            .ok_or_else(|| CryptoError::UnsupportedKeyType(type_url.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Keysets
// ---------------------------------------------------------------------------

/// Registry with the two MAC managers and the AEAD manager bound.
pub fn populated_registry() -> Registry {
    let registry = Registry::new();
    assert!(registry.register_key_manager(DUMMY_MAC, dummy_mac_manager()).unwrap());
    assert!(registry.register_key_manager(MAC2, mac2_manager()).unwrap());
    let aead: Arc<dyn KeyManager<dyn Aead>> = Arc::new(DummyAeadKeyManager);
    assert!(registry.register_key_manager(DUMMY_AEAD, aead).unwrap());
    registry
}

pub fn new_key_data(registry: &Registry, type_url: &str) -> KeyData {
    registry.new_key_data(&KeyTemplate::new(type_url)).unwrap()
}

pub fn key(
    key_id: u32,
    key_data: &KeyData,
    status: KeyStatusType,
    output_prefix_type: OutputPrefixType,
) -> Key {
    Key::new(key_id, key_data.clone(), status, output_prefix_type)
}

pub fn tink_key(key_id: u32, key_data: &KeyData, status: KeyStatusType) -> Key {
    key(key_id, key_data, status, OutputPrefixType::Tink)
}

pub fn handle(primary_key_id: u32, keys: Vec<Key>) -> KeysetHandle {
    KeysetHandle::new(Keyset::new(primary_key_id, keys))
}
