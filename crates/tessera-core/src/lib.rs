//! `tessera-core` — algorithm agility for cryptographic primitives.
//!
//! Key managers turn serialized key material into ready-to-use primitives.
//! The [`Registry`] maps key type URLs to managers, and turns a keyset into a
//! [`PrimitiveSet`]: one entry per ENABLED key, bucketed by the wire prefix
//! that identifies the key, with a single primary used for new operations.
//!
//! This crate implements no algorithm; see `tessera-primitives` for
//! ring-backed MAC and AEAD key managers.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod memory;

pub mod keyset;
pub mod primitives;

pub mod crypto_format;
pub mod key_manager;
pub mod primitive_set;

pub mod config;
pub mod registry;

pub use config::{Catalogue, KeyTypeEntry, RegistryConfig};
pub use crypto_format::{
    output_prefix, output_prefix_for, LEGACY_START_BYTE, NON_RAW_PREFIX_SIZE, RAW_PREFIX_SIZE,
    TINK_START_BYTE,
};
pub use error::CryptoError;
pub use key_manager::KeyManager;
pub use keyset::{
    Key, KeyData, KeyInfo, KeyMaterialType, KeyStatusType, KeyTemplate, Keyset, KeysetHandle,
    KeysetInfo, OutputPrefixType,
};
pub use memory::KeyMaterial;
pub use primitive_set::{Entry, PrimitiveSet};
pub use primitives::{Aead, Mac};
pub use registry::Registry;
