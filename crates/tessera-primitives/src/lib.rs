//! `tessera-primitives` — ring-backed key managers for `tessera-core`.
//!
//! - [`hmac`] — HMAC-SHA1/256/512 [`Mac`](tessera_core::Mac) with tag truncation
//! - [`aes_gcm`] — AES-128/256-GCM [`Aead`](tessera_core::Aead)
//! - [`catalogue`] — catalogues plus the standard config registering both
//!
//! Keys and key formats are serialized as JSON.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod aes_gcm;
pub mod catalogue;
pub mod hmac;

pub use aes_gcm::{aes128_gcm, aes256_gcm, AesGcm, AesGcmKeyManager};
pub use catalogue::{register, register_with, standard_config, AeadCatalogue, MacCatalogue};
pub use hmac::{
    hmac_sha256_tag128, hmac_sha256_tag256, hmac_sha512_tag256, HashType, HmacKeyManager, HmacMac,
};

/// Constant-time byte comparison to prevent timing side-channels.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
