//! The key manager capability.
//!
//! A [`KeyManager<P>`] turns serialized key material of one key type into a
//! primitive `P` (typically a trait object such as `dyn Mac`), and optionally
//! generates fresh key material from a serialized key format.
//!
//! Managers are stateless and shared between threads through `Arc`; the same
//! instance may serve concurrent resolution calls.

use crate::error::CryptoError;
use crate::keyset::KeyData;

/// Factory of primitives `P` for one declared key type.
pub trait KeyManager<P: ?Sized>: Send + Sync {
    /// Parse `serialized_key` as this manager's key type and build a primitive.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyMaterial`] on malformed key material.
    fn primitive(&self, serialized_key: &[u8]) -> Result<Box<P>, CryptoError>;

    /// Generate fresh key material matching `serialized_key_format`.
    ///
    /// Managers without key generation keep the default, which fails.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::UnsupportedOperation`] by default, or a
    /// manager-specific error for a malformed key format.
    fn new_key_data(&self, serialized_key_format: &[u8]) -> Result<KeyData, CryptoError> {
        let _ = serialized_key_format;
        Err(CryptoError::UnsupportedOperation(format!(
            "{} cannot generate new keys",
            self.type_url()
        )))
    }

    /// The type URL this manager was built for.
    fn type_url(&self) -> &str;

    /// Whether this manager can handle keys of `type_url`.
    ///
    /// Defaults to equality with [`KeyManager::type_url`]. Custom managers
    /// passed to [`Registry::primitive_set_with_custom_manager`] may broaden
    /// this to stand in for another manager's key type.
    ///
    /// [`Registry::primitive_set_with_custom_manager`]: crate::Registry::primitive_set_with_custom_manager
    fn does_support(&self, type_url: &str) -> bool {
        type_url == self.type_url()
    }
}

/// Human-readable name of primitive type `P`, used in diagnostics.
pub(crate) fn primitive_type_name<P: ?Sized>() -> &'static str {
    std::any::type_name::<P>()
}
