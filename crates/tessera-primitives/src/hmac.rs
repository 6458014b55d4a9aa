//! HMAC message authentication via `ring::hmac`.
//!
//! This module provides:
//! - [`HmacKeyManager`] — [`KeyManager<dyn Mac>`] for [`TYPE_URL`]
//! - [`HmacKey`] / [`HmacKeyFormat`] — serialized key and key format (JSON)
//! - key templates for common parameter choices
//!
//! Tags may be truncated to `tag_size` bytes; verification recomputes the
//! full tag, truncates it, and compares in constant time.
//!
//! Keys are JSON documents, not the protobuf `HmacKey` of other Tink
//! implementations, so [`TYPE_URL`] lives in this crate's own namespace.

use crate::constant_time_eq;
use rand::rngs::OsRng;
use rand::RngCore;
use ring::hmac;
use serde::{Deserialize, Serialize};
use tessera_core::{
    CryptoError, KeyData, KeyManager, KeyMaterialType, KeyTemplate, Mac, OutputPrefixType,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

// ── Constants ───────────────────────────────────────────────────────

/// Type URL of HMAC keys.
pub const TYPE_URL: &str = "type.tessera.dev/tessera.HmacKey";

/// Highest key version this manager accepts.
pub const VERSION: u32 = 0;

/// Minimum HMAC key length in bytes.
pub const MIN_KEY_SIZE: usize = 16;

/// Maximum HMAC key length in bytes: the SHA-512 block size.
pub const MAX_KEY_SIZE: usize = 128;

/// Minimum tag length in bytes.
pub const MIN_TAG_SIZE: usize = 10;

// ── Types ───────────────────────────────────────────────────────────

/// Hash function underlying the HMAC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HashType {
    /// HMAC-SHA1 (legacy interoperability only).
    Sha1,
    /// HMAC-SHA256.
    Sha256,
    /// HMAC-SHA512.
    Sha512,
}

impl HashType {
    /// Map to the corresponding `ring::hmac::Algorithm`.
    fn to_ring_algorithm(self) -> hmac::Algorithm {
        match self {
            Self::Sha1 => hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
            Self::Sha256 => hmac::HMAC_SHA256,
            Self::Sha512 => hmac::HMAC_SHA512,
        }
    }

    /// Full digest length in bytes, the upper bound for `tag_size`.
    #[must_use]
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }
}

/// HMAC parameters shared by keys and key formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HmacParams {
    /// Hash function.
    pub hash: HashType,
    /// Tag length in bytes after truncation.
    pub tag_size: usize,
}

impl HmacParams {
    fn validate(&self) -> Result<(), CryptoError> {
        if self.tag_size < MIN_TAG_SIZE {
            return Err(CryptoError::InvalidKeyMaterial(format!(
                "tag size too small: {} bytes (minimum {MIN_TAG_SIZE})",
                self.tag_size
            )));
        }
        if self.tag_size > self.hash.digest_len() {
            return Err(CryptoError::InvalidKeyMaterial(format!(
                "tag size too big: {} bytes (maximum {} for {:?})",
                self.tag_size,
                self.hash.digest_len(),
                self.hash
            )));
        }
        Ok(())
    }
}

/// Serialized HMAC key.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct HmacKey {
    /// Key version.
    #[zeroize(skip)]
    pub version: u32,
    /// HMAC parameters.
    #[zeroize(skip)]
    pub params: HmacParams,
    /// Raw key bytes.
    pub key_value: Vec<u8>,
}

impl std::fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacKey")
            .field("version", &self.version)
            .field("params", &self.params)
            .field("key_value", &"***")
            .finish()
    }
}

/// Parameters for generating a new HMAC key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HmacKeyFormat {
    /// HMAC parameters of the generated key.
    pub params: HmacParams,
    /// Key length in bytes.
    pub key_size: usize,
}

// ── Primitive ───────────────────────────────────────────────────────

/// [`Mac`] backed by `ring::hmac`, truncating tags to `tag_size` bytes.
pub struct HmacMac {
    key: hmac::Key,
    tag_size: usize,
}

impl HmacMac {
    /// Build the primitive from raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyMaterial`] if the key length is outside
    /// [`MIN_KEY_SIZE`]..=[`MAX_KEY_SIZE`] or the parameters are out of range.
    pub fn new(key_value: &[u8], params: HmacParams) -> Result<Self, CryptoError> {
        if key_value.len() < MIN_KEY_SIZE {
            return Err(CryptoError::InvalidKeyMaterial(format!(
                "HMAC key too short: {} bytes (minimum {MIN_KEY_SIZE})",
                key_value.len()
            )));
        }
        if key_value.len() > MAX_KEY_SIZE {
            return Err(CryptoError::InvalidKeyMaterial(format!(
                "HMAC key too long: {} bytes (maximum {MAX_KEY_SIZE})",
                key_value.len()
            )));
        }
        params.validate()?;
        Ok(Self {
            key: hmac::Key::new(params.hash.to_ring_algorithm(), key_value),
            tag_size: params.tag_size,
        })
    }
}

impl Mac for HmacMac {
    fn compute_mac(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let tag = hmac::sign(&self.key, data);
        tag.as_ref()
            .get(..self.tag_size)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| CryptoError::InvalidKeyMaterial("tag size exceeds digest".into()))
    }

    fn verify_mac(&self, mac: &[u8], data: &[u8]) -> Result<(), CryptoError> {
        let expected = self.compute_mac(data)?;
        if constant_time_eq(&expected, mac) {
            Ok(())
        } else {
            Err(CryptoError::MacVerification)
        }
    }
}

// ── Key manager ─────────────────────────────────────────────────────

/// Key manager for [`TYPE_URL`] keys.
#[derive(Clone, Copy, Debug, Default)]
pub struct HmacKeyManager;

impl HmacKeyManager {
    fn parse_key(serialized_key: &[u8]) -> Result<HmacKey, CryptoError> {
        let key: HmacKey = serde_json::from_slice(serialized_key)
            .map_err(|e| CryptoError::InvalidKeyMaterial(format!("malformed HMAC key: {e}")))?;
        if key.version > VERSION {
            return Err(CryptoError::InvalidKeyMaterial(format!(
                "HMAC key version {} not supported (maximum {VERSION})",
                key.version
            )));
        }
        Ok(key)
    }
}

impl KeyManager<dyn Mac> for HmacKeyManager {
    fn primitive(&self, serialized_key: &[u8]) -> Result<Box<dyn Mac>, CryptoError> {
        let key = Self::parse_key(serialized_key)?;
        Ok(Box::new(HmacMac::new(&key.key_value, key.params)?))
    }

    fn new_key_data(&self, serialized_key_format: &[u8]) -> Result<KeyData, CryptoError> {
        let format: HmacKeyFormat = serde_json::from_slice(serialized_key_format).map_err(|e| {
            CryptoError::InvalidKeyMaterial(format!("malformed HMAC key format: {e}"))
        })?;
        if format.key_size < MIN_KEY_SIZE {
            return Err(CryptoError::InvalidKeyMaterial(format!(
                "HMAC key size too small: {} bytes (minimum {MIN_KEY_SIZE})",
                format.key_size
            )));
        }
        if format.key_size > MAX_KEY_SIZE {
            return Err(CryptoError::InvalidKeyMaterial(format!(
                "HMAC key size too big: {} bytes (maximum {MAX_KEY_SIZE})",
                format.key_size
            )));
        }
        format.params.validate()?;

        let mut key_value = vec![0u8; format.key_size];
        OsRng.fill_bytes(&mut key_value);
        let key = HmacKey {
            version: VERSION,
            params: format.params,
            key_value,
        };
        let serialized = serde_json::to_vec(&key)
            .map_err(|e| CryptoError::InvalidKeyMaterial(format!("HMAC key serialization failed: {e}")))?;
        Ok(KeyData::new(TYPE_URL, serialized, KeyMaterialType::Symmetric))
    }

    fn type_url(&self) -> &str {
        TYPE_URL
    }
}

// ── Templates ───────────────────────────────────────────────────────

fn template(hash: HashType, key_size: usize, tag_size: usize) -> Result<KeyTemplate, CryptoError> {
    let format = HmacKeyFormat {
        params: HmacParams { hash, tag_size },
        key_size,
    };
    let value = serde_json::to_vec(&format)
        .map_err(|e| CryptoError::Config(format!("HMAC key format serialization failed: {e}")))?;
    Ok(KeyTemplate {
        type_url: TYPE_URL.to_owned(),
        value,
        output_prefix_type: OutputPrefixType::Tink,
    })
}

/// HMAC-SHA256, 32-byte key, 16-byte tag.
///
/// # Errors
///
/// Returns [`CryptoError::Config`] if the key format cannot be serialized.
pub fn hmac_sha256_tag128() -> Result<KeyTemplate, CryptoError> {
    template(HashType::Sha256, 32, 16)
}

/// HMAC-SHA256, 32-byte key, 32-byte tag.
///
/// # Errors
///
/// Returns [`CryptoError::Config`] if the key format cannot be serialized.
pub fn hmac_sha256_tag256() -> Result<KeyTemplate, CryptoError> {
    template(HashType::Sha256, 32, 32)
}

/// HMAC-SHA512, 64-byte key, 32-byte tag.
///
/// # Errors
///
/// Returns [`CryptoError::Config`] if the key format cannot be serialized.
pub fn hmac_sha512_tag256() -> Result<KeyTemplate, CryptoError> {
    template(HashType::Sha512, 64, 32)
}

// ── Unit tests ──────────────────────────────────────────────────────
