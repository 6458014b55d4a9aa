//! Primitive capability traits produced by key managers.
//!
//! The registry treats primitives as opaque trait objects (`dyn Mac`,
//! `dyn Aead`); implementations live outside this crate.

use crate::error::CryptoError;

/// Message authentication code.
pub trait Mac: Send + Sync {
    /// Compute the authentication tag of `data`.
    ///
    /// # Errors
    ///
    /// Implementation-specific failure of the underlying algorithm.
    fn compute_mac(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Verify that `mac` authenticates `data`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MacVerification`] if the tag does not match.
    fn verify_mac(&self, mac: &[u8], data: &[u8]) -> Result<(), CryptoError>;
}

/// Authenticated encryption with associated data.
pub trait Aead: Send + Sync {
    /// Encrypt `plaintext`, binding `associated_data`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Encryption`] if the underlying cipher fails.
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Decrypt and authenticate `ciphertext` under `associated_data`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Decryption`] if authentication fails.
    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, CryptoError>;
}
