//! Output prefix format identifying which key produced a ciphertext or tag.
//!
//! Wire format (bit-exact with the Tink keyset format):
//!
//! ```text
//! TINK     0x01 || key_id (4 bytes, big-endian)
//! LEGACY   0x00 || key_id (4 bytes, big-endian)
//! CRUNCHY  0x00 || key_id (4 bytes, big-endian)
//! RAW      (empty)
//! ```
//!
//! LEGACY and CRUNCHY share the legacy start byte; they differ only in how
//! the primitive treats the data, not in the prefix. The shared `0x00` is the
//! value other Tink implementations emit: giving CRUNCHY its own marker would
//! break verification of their tags and ciphertexts.

use crate::keyset::{Key, OutputPrefixType};

/// Length of a TINK, LEGACY or CRUNCHY prefix.
pub const NON_RAW_PREFIX_SIZE: usize = 5;

/// Length of a RAW prefix.
pub const RAW_PREFIX_SIZE: usize = 0;

/// Start byte of LEGACY and CRUNCHY prefixes.
pub const LEGACY_START_BYTE: u8 = 0x00;

/// Start byte of TINK prefixes.
pub const TINK_START_BYTE: u8 = 0x01;

/// The RAW prefix.
pub const RAW_PREFIX: &[u8] = &[];

/// Compute the identification prefix for a key id under an output prefix type.
#[must_use]
pub fn output_prefix_for(output_prefix_type: OutputPrefixType, key_id: u32) -> Vec<u8> {
    let start_byte = match output_prefix_type {
        OutputPrefixType::Raw => return RAW_PREFIX.to_vec(),
        OutputPrefixType::Tink => TINK_START_BYTE,
        OutputPrefixType::Legacy | OutputPrefixType::Crunchy => LEGACY_START_BYTE,
    };
    let mut prefix = Vec::with_capacity(NON_RAW_PREFIX_SIZE);
    prefix.push(start_byte);
    prefix.extend_from_slice(&key_id.to_be_bytes());
    prefix
}

/// Compute the identification prefix of a keyset key.
#[must_use]
pub fn output_prefix(key: &Key) -> Vec<u8> {
    output_prefix_for(key.output_prefix_type, key.key_id)
}
