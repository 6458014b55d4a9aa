//! Error types for `tessera-core`.

use thiserror::Error;

/// Errors produced by key manager registration, keyset resolution and
/// the primitives built on top of them.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Malformed argument to a registry operation (e.g. an empty type URL).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No key manager is bound to the given type URL.
    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// A key manager is bound to the type URL, but for another primitive.
    #[error("primitive mismatch for {type_url}: requested {expected}, registered {registered}")]
    PrimitiveMismatch {
        /// Type URL that was looked up.
        type_url: String,
        /// Primitive type requested by the caller.
        expected: &'static str,
        /// Primitive type the bound manager produces.
        registered: &'static str,
    },

    /// Key material could not be parsed or turned into a primitive.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// The keyset contains no keys.
    #[error("empty keyset")]
    EmptyKeyset,

    /// The primary key id names no ENABLED key of the keyset.
    #[error("keyset doesn't contain a valid primary key")]
    InvalidPrimaryKey,

    /// The key manager cannot perform the requested operation.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// New key generation is disabled for this type URL.
    #[error("creating new keys is not allowed for {0}")]
    NewKeyForbidden(String),

    /// No catalogue is registered for the name/primitive pair.
    #[error("no catalogue {catalogue:?} for primitive {primitive:?}")]
    UnknownCatalogue {
        /// Catalogue name from the config entry.
        catalogue: String,
        /// Primitive name from the config entry.
        primitive: String,
    },

    /// Registry config could not be parsed or applied.
    #[error("registry config error: {0}")]
    Config(String),

    /// Encryption failure raised by an AEAD primitive.
    #[error("encryption error: {0}")]
    Encryption(String),

    /// Authenticated decryption failed — ciphertext tampered or wrong key.
    #[error("decryption failed")]
    Decryption,

    /// MAC tag did not verify.
    #[error("invalid MAC")]
    MacVerification,
}
