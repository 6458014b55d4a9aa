//! AES-GCM authenticated encryption via `ring::aead`.
//!
//! This module provides:
//! - [`AesGcmKeyManager`] — [`KeyManager<dyn Aead>`] for [`TYPE_URL`]
//! - [`AesGcm`] — the primitive, AES-128-GCM or AES-256-GCM by key length
//! - key templates for both key sizes
//!
//! Wire format: `nonce (12 bytes) || ciphertext (variable) || tag (16 bytes)`.
//! The nonce is drawn from `OsRng` on every encryption.
//!
//! Keys are JSON documents, not the protobuf `AesGcmKey` of other Tink
//! implementations, so [`TYPE_URL`] lives in this crate's own namespace.

use rand::rngs::OsRng;
use rand::RngCore;
use ring::aead;
use serde::{Deserialize, Serialize};
use tessera_core::{
    Aead, CryptoError, KeyData, KeyManager, KeyMaterialType, KeyTemplate, OutputPrefixType,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Type URL of AES-GCM keys.
pub const TYPE_URL: &str = "type.tessera.dev/tessera.AesGcmKey";

/// Highest key version this manager accepts.
pub const VERSION: u32 = 0;

/// Nonce length in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// Authentication tag length in bytes (128 bits).
pub const TAG_LEN: usize = 16;

/// Minimum valid ciphertext length: nonce + empty ciphertext + tag.
const MIN_CIPHERTEXT_LEN: usize = NONCE_LEN + TAG_LEN;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Serialized AES-GCM key.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct AesGcmKey {
    /// Key version.
    #[zeroize(skip)]
    pub version: u32,
    /// Raw AES key, 16 or 32 bytes.
    pub key_value: Vec<u8>,
}

impl std::fmt::Debug for AesGcmKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmKey")
            .field("version", &self.version)
            .field("key_value", &"***")
            .finish()
    }
}

/// Parameters for generating a new AES-GCM key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AesGcmKeyFormat {
    /// Key length in bytes, 16 or 32.
    pub key_size: usize,
}

fn algorithm_for(key_size: usize) -> Result<&'static aead::Algorithm, CryptoError> {
    match key_size {
        16 => Ok(&aead::AES_128_GCM),
        32 => Ok(&aead::AES_256_GCM),
        other => Err(CryptoError::InvalidKeyMaterial(format!(
            "invalid AES-GCM key length: {other} bytes (expected 16 or 32)"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Primitive
// ---------------------------------------------------------------------------

/// [`Aead`] backed by `ring::aead` AES-GCM.
pub struct AesGcm {
    key: aead::LessSafeKey,
}

impl AesGcm {
    /// Build the primitive from a 16- or 32-byte key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyMaterial`] for any other key length.
    pub fn new(key_value: &[u8]) -> Result<Self, CryptoError> {
        let algorithm = algorithm_for(key_value.len())?;
        let unbound = aead::UnboundKey::new(algorithm, key_value)
            .map_err(|_| CryptoError::InvalidKeyMaterial("failed to create AES-GCM key".into()))?;
        Ok(Self {
            key: aead::LessSafeKey::new(unbound),
        })
    }
}

impl Aead for AesGcm {
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = aead::Nonce::assume_unique_for_key(nonce_bytes);

        let mut in_out = plaintext.to_vec();
        let Ok(tag) =
            self.key
                .seal_in_place_separate_tag(nonce, aead::Aad::from(associated_data), &mut in_out)
        else {
            in_out.zeroize();
            return Err(CryptoError::Encryption("AES-GCM encryption failed".into()));
        };

        let capacity = NONCE_LEN
            .saturating_add(in_out.len())
            .saturating_add(TAG_LEN);
        let mut out = Vec::with_capacity(capacity);
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&in_out);
        out.extend_from_slice(tag.as_ref());
        Ok(out)
    }

    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if ciphertext.len() < MIN_CIPHERTEXT_LEN {
            return Err(CryptoError::Decryption);
        }
        let (nonce_bytes, ct_tag) = ciphertext.split_at(NONCE_LEN);
        let nonce = aead::Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| CryptoError::Decryption)?;

        let mut in_out = ct_tag.to_vec();
        let opened = self
            .key
            .open_in_place(nonce, aead::Aad::from(associated_data), &mut in_out)
            .map(|plaintext| plaintext.to_vec());
        in_out.zeroize();
        opened.map_err(|_| CryptoError::Decryption)
    }
}

// ---------------------------------------------------------------------------
// Key manager
// ---------------------------------------------------------------------------

/// Key manager for [`TYPE_URL`] keys.
#[derive(Clone, Copy, Debug, Default)]
pub struct AesGcmKeyManager;

impl KeyManager<dyn Aead> for AesGcmKeyManager {
    fn primitive(&self, serialized_key: &[u8]) -> Result<Box<dyn Aead>, CryptoError> {
        let key: AesGcmKey = serde_json::from_slice(serialized_key)
            .map_err(|e| CryptoError::InvalidKeyMaterial(format!("malformed AES-GCM key: {e}")))?;
        if key.version > VERSION {
            return Err(CryptoError::InvalidKeyMaterial(format!(
                "AES-GCM key version {} not supported (maximum {VERSION})",
                key.version
            )));
        }
        Ok(Box::new(AesGcm::new(&key.key_value)?))
    }

    fn new_key_data(&self, serialized_key_format: &[u8]) -> Result<KeyData, CryptoError> {
        let format: AesGcmKeyFormat =
            serde_json::from_slice(serialized_key_format).map_err(|e| {
                CryptoError::InvalidKeyMaterial(format!("malformed AES-GCM key format: {e}"))
            })?;
        algorithm_for(format.key_size)?;

        let mut key_value = vec![0u8; format.key_size];
        OsRng.fill_bytes(&mut key_value);
        let key = AesGcmKey {
            version: VERSION,
            key_value,
        };
        let serialized = serde_json::to_vec(&key).map_err(|e| {
            CryptoError::InvalidKeyMaterial(format!("AES-GCM key serialization failed: {e}"))
        })?;
        Ok(KeyData::new(TYPE_URL, serialized, KeyMaterialType::Symmetric))
    }

    fn type_url(&self) -> &str {
        TYPE_URL
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

fn template(key_size: usize) -> Result<KeyTemplate, CryptoError> {
    let value = serde_json::to_vec(&AesGcmKeyFormat { key_size }).map_err(|e| {
        CryptoError::Config(format!("AES-GCM key format serialization failed: {e}"))
    })?;
    Ok(KeyTemplate {
        type_url: TYPE_URL.to_owned(),
        value,
        output_prefix_type: OutputPrefixType::Tink,
    })
}

/// AES-128-GCM with a Tink output prefix.
///
/// # Errors
///
/// Returns [`CryptoError::Config`] if the key format cannot be serialized.
pub fn aes128_gcm() -> Result<KeyTemplate, CryptoError> {
    template(16)
}

/// AES-256-GCM with a Tink output prefix.
///
/// # Errors
///
/// Returns [`CryptoError::Config`] if the key format cannot be serialized.
pub fn aes256_gcm() -> Result<KeyTemplate, CryptoError> {
    template(32)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
