//! Keyset data model.
//!
//! This module provides:
//! - [`KeyData`] — type URL + opaque serialized key material
//! - [`KeyTemplate`] — type URL + opaque key format, input to key generation
//! - [`Key`] — one keyset record: id, key data, status, output prefix type
//! - [`Keyset`] — ordered keys plus the primary key id
//! - [`KeysetHandle`] — read-only wrapper handed to the registry
//! - [`KeysetInfo`] — non-secret keyset metadata, safe to log or serialize
//!
//! Keysets are built and structurally validated by the loading layer (key id
//! uniqueness is assumed, not checked). The registry only reads them.

use crate::memory::KeyMaterial;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Classification of the material held in a [`KeyData`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyMaterialType {
    /// Not specified by the producer.
    #[default]
    Unspecified,
    /// Secret symmetric key.
    Symmetric,
    /// Private half of an asymmetric key pair.
    AsymmetricPrivate,
    /// Public half of an asymmetric key pair.
    AsymmetricPublic,
    /// Key held by a remote service (KMS); the material is a reference.
    Remote,
}

/// Lifecycle status of a key inside a keyset.
///
/// Only [`KeyStatusType::Enabled`] keys ever become primitives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyStatusType {
    /// Status was never set.
    #[default]
    Unknown,
    /// Usable for new operations (if primary) and for verification/decryption.
    Enabled,
    /// Kept in the keyset but unusable until re-enabled.
    Disabled,
    /// Material erased; kept for bookkeeping only.
    Destroyed,
}

impl KeyStatusType {
    /// Return a string identifier for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Enabled => "ENABLED",
            Self::Disabled => "DISABLED",
            Self::Destroyed => "DESTROYED",
        }
    }
}

/// How a key's id is encoded in front of the output of its primitive.
///
/// See [`crate::crypto_format`] for the exact prefix bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutputPrefixType {
    /// `0x01 || key_id` (5 bytes).
    Tink,
    /// `0x00 || key_id` (5 bytes), compatible with older libraries.
    Legacy,
    /// No prefix.
    Raw,
    /// `0x00 || key_id` (5 bytes), compatible with Keyczar-era ciphertexts.
    Crunchy,
}

impl OutputPrefixType {
    /// Return a string identifier for this output prefix type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tink => "TINK",
            Self::Legacy => "LEGACY",
            Self::Raw => "RAW",
            Self::Crunchy => "CRUNCHY",
        }
    }
}

// ---------------------------------------------------------------------------
// Key material
// ---------------------------------------------------------------------------

/// Serialized key material tagged with the type URL used for dispatch.
#[derive(Clone, Debug, Default)]
pub struct KeyData {
    /// Identifier of the key type; selects the key manager.
    pub type_url: String,
    /// Opaque serialized key, interpreted only by the key manager.
    pub value: KeyMaterial,
    /// Classification of `value`.
    pub key_material_type: KeyMaterialType,
}

impl KeyData {
    /// Build key data from its parts.
    #[must_use]
    pub fn new(
        type_url: impl Into<String>,
        value: impl Into<KeyMaterial>,
        key_material_type: KeyMaterialType,
    ) -> Self {
        Self {
            type_url: type_url.into(),
            value: value.into(),
            key_material_type,
        }
    }
}

/// Description of a key to be generated: type URL plus an opaque key format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTemplate {
    /// Key type to generate.
    pub type_url: String,
    /// Opaque serialized key format (parameters), interpreted by the manager.
    #[serde(default)]
    pub value: Vec<u8>,
    /// Output prefix the generated key should carry once added to a keyset.
    pub output_prefix_type: OutputPrefixType,
}

impl KeyTemplate {
    /// Template with an empty key format and the TINK output prefix.
    #[must_use]
    pub fn new(type_url: impl Into<String>) -> Self {
        Self {
            type_url: type_url.into(),
            value: Vec::new(),
            output_prefix_type: OutputPrefixType::Tink,
        }
    }
}

// ---------------------------------------------------------------------------
// Keyset
// ---------------------------------------------------------------------------

/// One record of a [`Keyset`].
#[derive(Clone, Debug)]
pub struct Key {
    /// Keyset-unique identifier, encoded in TINK/LEGACY/CRUNCHY prefixes.
    pub key_id: u32,
    /// The key itself.
    pub key_data: KeyData,
    /// Lifecycle status.
    pub status: KeyStatusType,
    /// Prefix kind used when this key produces output.
    pub output_prefix_type: OutputPrefixType,
}

impl Key {
    /// Build a key record.
    #[must_use]
    pub const fn new(
        key_id: u32,
        key_data: KeyData,
        status: KeyStatusType,
        output_prefix_type: OutputPrefixType,
    ) -> Self {
        Self {
            key_id,
            key_data,
            status,
            output_prefix_type,
        }
    }
}

/// Ordered collection of keys with one designated primary.
///
/// Key order is significant: it fixes the order of entries sharing a prefix
/// in the primitive set.
#[derive(Clone, Debug, Default)]
pub struct Keyset {
    /// Id of the key used for new operations. `0` when unset.
    pub primary_key_id: u32,
    /// Keys in keyset order.
    pub keys: Vec<Key>,
}

impl Keyset {
    /// Build a keyset.
    #[must_use]
    pub const fn new(primary_key_id: u32, keys: Vec<Key>) -> Self {
        Self {
            primary_key_id,
            keys,
        }
    }

    /// The first key whose id equals the primary key id, regardless of status.
    #[must_use]
    pub fn primary_key(&self) -> Option<&Key> {
        self.keys.iter().find(|k| k.key_id == self.primary_key_id)
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the keyset holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Read-only handle to a keyset, as produced by the loading layer.
#[derive(Clone, Debug)]
pub struct KeysetHandle {
    keyset: Keyset,
}

impl KeysetHandle {
    /// Wrap an already-validated keyset.
    #[must_use]
    pub const fn new(keyset: Keyset) -> Self {
        Self { keyset }
    }

    /// Borrow the wrapped keyset.
    #[must_use]
    pub const fn keyset(&self) -> &Keyset {
        &self.keyset
    }

    /// Non-secret metadata describing the keyset.
    #[must_use]
    pub fn keyset_info(&self) -> KeysetInfo {
        KeysetInfo {
            primary_key_id: self.keyset.primary_key_id,
            key_info: self
                .keyset
                .keys
                .iter()
                .map(|key| KeyInfo {
                    type_url: key.key_data.type_url.clone(),
                    status: key.status,
                    key_id: key.key_id,
                    output_prefix_type: key.output_prefix_type,
                })
                .collect(),
        }
    }
}

impl From<Keyset> for KeysetHandle {
    fn from(keyset: Keyset) -> Self {
        Self::new(keyset)
    }
}

// ---------------------------------------------------------------------------
// Keyset metadata
// ---------------------------------------------------------------------------

/// Metadata of a single key; never contains key material.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInfo {
    /// Type URL of the key.
    pub type_url: String,
    /// Lifecycle status.
    pub status: KeyStatusType,
    /// Key id.
    pub key_id: u32,
    /// Output prefix type.
    pub output_prefix_type: OutputPrefixType,
}

/// Metadata of a whole keyset, in keyset order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysetInfo {
    /// Id of the primary key.
    pub primary_key_id: u32,
    /// Per-key metadata.
    pub key_info: Vec<KeyInfo>,
}
