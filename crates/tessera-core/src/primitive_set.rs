//! Runtime view of a keyset: primitives grouped by output prefix.
//!
//! A [`PrimitiveSet<P>`] is what a MAC or AEAD wrapper consumes:
//! - new operations use [`PrimitiveSet::primary`]
//! - verification/decryption reads the prefix off the input and tries
//!   [`PrimitiveSet::primitives_for_prefix`], then [`PrimitiveSet::raw_primitives`]
//!
//! Sets are assembled by [`Registry::primitive_set`](crate::Registry::primitive_set)
//! and are immutable once returned.

use crate::crypto_format::{self, RAW_PREFIX};
use crate::error::CryptoError;
use crate::keyset::{Key, KeyStatusType, OutputPrefixType};
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// A primitive together with the keyset metadata of the key it came from.
pub struct Entry<P: ?Sized> {
    primitive: Box<P>,
    key_id: u32,
    status: KeyStatusType,
    output_prefix_type: OutputPrefixType,
    identifier: Vec<u8>,
}

impl<P: ?Sized> Entry<P> {
    /// The primitive.
    #[must_use]
    pub fn primitive(&self) -> &P {
        &self.primitive
    }

    /// Id of the key this primitive was built from.
    #[must_use]
    pub const fn key_id(&self) -> u32 {
        self.key_id
    }

    /// Status of the key at construction time (always ENABLED).
    #[must_use]
    pub const fn status(&self) -> KeyStatusType {
        self.status
    }

    /// Output prefix type of the key.
    #[must_use]
    pub const fn output_prefix_type(&self) -> OutputPrefixType {
        self.output_prefix_type
    }

    /// Identification prefix bytes (empty for RAW keys).
    #[must_use]
    pub fn identifier(&self) -> &[u8] {
        &self.identifier
    }
}

impl<P: ?Sized> fmt::Debug for Entry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key_id", &self.key_id)
            .field("status", &self.status)
            .field("output_prefix_type", &self.output_prefix_type)
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// PrimitiveSet
// ---------------------------------------------------------------------------

/// Primitives of the ENABLED keys of a keyset, bucketed by prefix, with one
/// designated primary.
pub struct PrimitiveSet<P: ?Sized> {
    entries: HashMap<Vec<u8>, Vec<Entry<P>>>,
    /// Insertion order as `(prefix, index within bucket)`.
    order: Vec<(Vec<u8>, usize)>,
    primary: (Vec<u8>, usize),
}

impl<P: ?Sized> PrimitiveSet<P> {
    /// The primary entry, used for new operations.
    #[must_use]
    pub fn primary(&self) -> &Entry<P> {
        let (prefix, index) = &self.primary;
        // The builder only records positions it has just pushed.
        &self.entries[prefix][*index]
    }

    /// Entries whose identification prefix equals `prefix`, in keyset order.
    #[must_use]
    pub fn primitives_for_prefix(&self, prefix: &[u8]) -> &[Entry<P>] {
        self.entries.get(prefix).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entries sharing the identification prefix of `key`.
    #[must_use]
    pub fn primitives_for_key(&self, key: &Key) -> &[Entry<P>] {
        self.primitives_for_prefix(&crypto_format::output_prefix(key))
    }

    /// Entries of RAW keys, in keyset order.
    #[must_use]
    pub fn raw_primitives(&self) -> &[Entry<P>] {
        self.primitives_for_prefix(RAW_PREFIX)
    }

    /// All entries in keyset order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry<P>> + '_ {
        self.order
            .iter()
            .filter_map(|(prefix, index)| self.entries.get(prefix)?.get(*index))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always `false` for a set returned by the registry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<P: ?Sized> fmt::Debug for PrimitiveSet<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveSet")
            .field("len", &self.len())
            .field("primary_key_id", &self.primary().key_id)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Mutable accumulator used while walking a keyset.
pub(crate) struct PrimitiveSetBuilder<P: ?Sized> {
    entries: HashMap<Vec<u8>, Vec<Entry<P>>>,
    order: Vec<(Vec<u8>, usize)>,
    primary: Option<(Vec<u8>, usize)>,
}

impl<P: ?Sized> PrimitiveSetBuilder<P> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
            primary: None,
        }
    }

    /// Append a primitive for `key` to its prefix bucket.
    ///
    /// Returns the entry's position, to be passed to [`Self::set_primary`].
    pub(crate) fn add_primitive(&mut self, primitive: Box<P>, key: &Key) -> (Vec<u8>, usize) {
        let identifier = crypto_format::output_prefix(key);
        let bucket = self.entries.entry(identifier.clone()).or_default();
        let index = bucket.len();
        bucket.push(Entry {
            primitive,
            key_id: key.key_id,
            status: key.status,
            output_prefix_type: key.output_prefix_type,
            identifier: identifier.clone(),
        });
        let position = (identifier, index);
        self.order.push(position.clone());
        position
    }

    pub(crate) fn set_primary(&mut self, position: (Vec<u8>, usize)) {
        self.primary = Some(position);
    }

    /// Freeze the set.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidPrimaryKey`] if no primary was set.
    pub(crate) fn build(self) -> Result<PrimitiveSet<P>, CryptoError> {
        let primary = self.primary.ok_or(CryptoError::InvalidPrimaryKey)?;
        Ok(PrimitiveSet {
            entries: self.entries,
            order: self.order,
            primary,
        })
    }
}
