//! Secret container for serialized key material.
//!
//! [`KeyMaterial`] holds the opaque bytes of a [`KeyData`](crate::KeyData):
//! - zeroized on drop (via `secrecy`'s built-in `Zeroize`)
//! - masked in `Debug` output so keysets can be logged safely
//!
//! The registry never looks inside; the bytes are handed verbatim to the
//! key manager bound to the key's type URL.

use secrecy::{ExposeSecret, SecretSlice};
use std::fmt;

/// Opaque, zeroize-on-drop byte string holding serialized key material.
pub struct KeyMaterial {
    inner: SecretSlice<u8>,
}

impl KeyMaterial {
    /// Copy `data` into a new secret allocation.
    ///
    /// The caller should zeroize the source after calling this.
    #[must_use]
    pub fn new(data: &[u8]) -> Self {
        Self {
            inner: data.to_vec().into(),
        }
    }

    /// Take ownership of `data` without copying.
    #[must_use]
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self { inner: data.into() }
    }

    /// Expose the underlying bytes. Keep the borrow short-lived.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    /// Returns the number of bytes held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    /// Returns `true` if no bytes are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.expose_secret().is_empty()
    }
}

impl Default for KeyMaterial {
    fn default() -> Self {
        Self::from_vec(Vec::new())
    }
}

// `SecretSlice` is deliberately not `Clone`; copy through a fresh allocation.
impl Clone for KeyMaterial {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial(***)")
    }
}

impl From<Vec<u8>> for KeyMaterial {
    fn from(data: Vec<u8>) -> Self {
        Self::from_vec(data)
    }
}

impl From<&[u8]> for KeyMaterial {
    fn from(data: &[u8]) -> Self {
        Self::new(data)
    }
}
