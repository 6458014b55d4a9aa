//! Process-wide key manager registry and primitive set construction.
//!
//! This module provides:
//! - [`Registry`] — type URL → key manager mapping, first registration wins
//! - [`Registry::primitive_set`] — turn a [`KeysetHandle`] into a [`PrimitiveSet`]
//! - free functions operating on [`Registry::global`]
//!
//! # Type erasure
//!
//! Managers for different primitives share one map. Each is stored as a
//! `TypedKeyManager<P>` behind an object-safe trait and recovered with a
//! checked downcast; asking for the wrong primitive type fails with
//! [`CryptoError::PrimitiveMismatch`] instead of resolving a foreign manager.
//!
//! # Locking
//!
//! One `RwLock` guards the map. Lookups clone the `Arc` out and release the
//! lock before calling into the manager.

use crate::config::{Catalogue, KeyTypeEntry, RegistryConfig};
use crate::error::CryptoError;
use crate::key_manager::{primitive_type_name, KeyManager};
use crate::keyset::{KeyData, KeyStatusType, KeyTemplate, KeysetHandle};
use crate::primitive_set::{PrimitiveSet, PrimitiveSetBuilder};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::hash_map::Entry as MapEntry;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::debug;

// ---------------------------------------------------------------------------
// Type-erased storage
// ---------------------------------------------------------------------------

trait ErasedKeyManager: Send + Sync {
    fn new_key_data(&self, serialized_key_format: &[u8]) -> Result<KeyData, CryptoError>;
    fn primitive_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
}

struct TypedKeyManager<P: ?Sized + 'static>(Arc<dyn KeyManager<P>>);

impl<P: ?Sized + 'static> ErasedKeyManager for TypedKeyManager<P> {
    fn new_key_data(&self, serialized_key_format: &[u8]) -> Result<KeyData, CryptoError> {
        self.0.new_key_data(serialized_key_format)
    }

    fn primitive_name(&self) -> &'static str {
        primitive_type_name::<P>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Clone)]
struct Registration {
    manager: Arc<dyn ErasedKeyManager>,
    new_key_allowed: bool,
}

trait ErasedCatalogue: Send + Sync {
    fn register(&self, registry: &Registry, entry: &KeyTypeEntry) -> Result<bool, CryptoError>;
}

struct TypedCatalogue<P: ?Sized + 'static>(Arc<dyn Catalogue<P>>);

impl<P: ?Sized + 'static> ErasedCatalogue for TypedCatalogue<P> {
    fn register(&self, registry: &Registry, entry: &KeyTypeEntry) -> Result<bool, CryptoError> {
        let manager = self.0.key_manager(
            &entry.type_url,
            &entry.primitive_name,
            entry.key_manager_version,
        )?;
        registry.register_key_manager_with_new_key_allowed(
            entry.type_url.as_str(),
            manager,
            entry.new_key_allowed,
        )
    }
}

/// Catalogues are keyed by `(name, lowercase primitive name)`.
type CatalogueKey = (String, String);

fn catalogue_key(name: &str, primitive_name: &str) -> CatalogueKey {
    (name.to_owned(), primitive_name.to_ascii_lowercase())
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Mapping from key type URL to key manager.
///
/// Use [`Registry::global`] for the process-wide instance; independent
/// registries can be created with [`Registry::new`].
pub struct Registry {
    key_managers: RwLock<HashMap<String, Registration>>,
    catalogues: RwLock<HashMap<CatalogueKey, Arc<dyn ErasedCatalogue>>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("type_urls", &self.type_urls())
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            key_managers: RwLock::new(HashMap::new()),
            catalogues: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide registry, empty until populated.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    // -- Registration ------------------------------------------------------

    /// Bind `manager` to `type_url`, allowing key generation.
    ///
    /// Returns `Ok(false)` and keeps the existing binding if `type_url` is
    /// already registered.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidArgument`] if `type_url` is empty.
    pub fn register_key_manager<P: ?Sized + 'static>(
        &self,
        type_url: impl Into<String>,
        manager: Arc<dyn KeyManager<P>>,
    ) -> Result<bool, CryptoError> {
        self.register_key_manager_with_new_key_allowed(type_url, manager, true)
    }

    /// Bind `manager` to `type_url`; `new_key_allowed = false` makes
    /// [`Registry::new_key_data`] refuse this type.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidArgument`] if `type_url` is empty.
    pub fn register_key_manager_with_new_key_allowed<P: ?Sized + 'static>(
        &self,
        type_url: impl Into<String>,
        manager: Arc<dyn KeyManager<P>>,
        new_key_allowed: bool,
    ) -> Result<bool, CryptoError> {
        let type_url = type_url.into();
        if type_url.is_empty() {
            return Err(CryptoError::InvalidArgument(
                "type URL must be non-empty".into(),
            ));
        }

        let mut managers = self.key_managers.write();
        match managers.entry(type_url) {
            MapEntry::Occupied(existing) => {
                debug!(
                    type_url = %existing.key(),
                    "key manager already registered, keeping existing binding"
                );
                Ok(false)
            }
            MapEntry::Vacant(slot) => {
                debug!(
                    type_url = %slot.key(),
                    primitive = primitive_type_name::<P>(),
                    new_key_allowed,
                    "registered key manager"
                );
                slot.insert(Registration {
                    manager: Arc::new(TypedKeyManager(manager)),
                    new_key_allowed,
                });
                Ok(true)
            }
        }
    }

    /// Make `catalogue` available to [`Registry::register_config`] under
    /// `name`. Returns `Ok(false)` if that name is already taken for the
    /// catalogue's primitive.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidArgument`] if `name` is empty.
    pub fn add_catalogue<P: ?Sized + 'static>(
        &self,
        name: impl Into<String>,
        catalogue: Arc<dyn Catalogue<P>>,
    ) -> Result<bool, CryptoError> {
        let name = name.into();
        if name.is_empty() {
            return Err(CryptoError::InvalidArgument(
                "catalogue name must be non-empty".into(),
            ));
        }
        let key = catalogue_key(&name, catalogue.primitive_name());

        let mut catalogues = self.catalogues.write();
        match catalogues.entry(key) {
            MapEntry::Occupied(_) => {
                debug!(catalogue = %name, "catalogue already registered");
                Ok(false)
            }
            MapEntry::Vacant(slot) => {
                debug!(
                    catalogue = %name,
                    primitive = catalogue.primitive_name(),
                    "registered catalogue"
                );
                slot.insert(Arc::new(TypedCatalogue(catalogue)));
                Ok(true)
            }
        }
    }

    /// Register every entry of `config` through its catalogue, in order.
    ///
    /// Entries whose type URL is already bound are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Config`] for an incomplete entry,
    /// [`CryptoError::UnknownCatalogue`] if an entry names a catalogue that was
    /// never added, or the catalogue's own error. Entries before the failing
    /// one stay registered.
    pub fn register_config(&self, config: &RegistryConfig) -> Result<(), CryptoError> {
        config.validate()?;
        for entry in &config.entries {
            let catalogue = self
                .catalogues
                .read()
                .get(&catalogue_key(&entry.catalogue_name, &entry.primitive_name))
                .cloned()
                .ok_or_else(|| CryptoError::UnknownCatalogue {
                    catalogue: entry.catalogue_name.clone(),
                    primitive: entry.primitive_name.clone(),
                })?;
            catalogue.register(self, entry)?;
        }
        debug!(
            config = %config.config_name,
            entries = config.entries.len(),
            "registered config"
        );
        Ok(())
    }

    // -- Lookup --------------------------------------------------------------

    fn registration(&self, type_url: &str) -> Result<Registration, CryptoError> {
        self.key_managers
            .read()
            .get(type_url)
            .cloned()
            .ok_or_else(|| CryptoError::UnsupportedKeyType(type_url.to_owned()))
    }

    /// The manager bound to `type_url`, as a manager of primitive `P`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::UnsupportedKeyType`] if nothing is bound, or
    /// [`CryptoError::PrimitiveMismatch`] if the bound manager produces a
    /// different primitive type.
    pub fn get_key_manager<P: ?Sized + 'static>(
        &self,
        type_url: &str,
    ) -> Result<Arc<dyn KeyManager<P>>, CryptoError> {
        let registration = self.registration(type_url)?;
        registration
            .manager
            .as_any()
            .downcast_ref::<TypedKeyManager<P>>()
            .map(|typed| Arc::clone(&typed.0))
            .ok_or_else(|| CryptoError::PrimitiveMismatch {
                type_url: type_url.to_owned(),
                expected: primitive_type_name::<P>(),
                registered: registration.manager.primitive_name(),
            })
    }

    /// Every bound type URL, sorted.
    #[must_use]
    pub fn type_urls(&self) -> Vec<String> {
        let mut type_urls: Vec<String> = self.key_managers.read().keys().cloned().collect();
        type_urls.sort_unstable();
        type_urls
    }

    /// Whether any manager is bound to `type_url`.
    #[must_use]
    pub fn is_registered(&self, type_url: &str) -> bool {
        self.key_managers.read().contains_key(type_url)
    }

    // -- Keys and primitives -----------------------------------------------

    /// Generate new key material as described by `template`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::UnsupportedKeyType`] if no manager is bound,
    /// [`CryptoError::NewKeyForbidden`] if the type was registered with key
    /// generation disabled, or the manager's own error.
    pub fn new_key_data(&self, template: &KeyTemplate) -> Result<KeyData, CryptoError> {
        let registration = self.registration(&template.type_url)?;
        if !registration.new_key_allowed {
            return Err(CryptoError::NewKeyForbidden(template.type_url.clone()));
        }
        registration.manager.new_key_data(&template.value)
    }

    /// Build a primitive from a single key.
    ///
    /// # Errors
    ///
    /// Propagates lookup failures from [`Registry::get_key_manager`] and the
    /// manager's parse errors.
    pub fn primitive<P: ?Sized + 'static>(&self, key_data: &KeyData) -> Result<Box<P>, CryptoError> {
        self.get_key_manager::<P>(&key_data.type_url)?
            .primitive(key_data.value.expose())
    }

    /// Build the primitive set of `handle` using registered managers only.
    ///
    /// # Errors
    ///
    /// See [`Registry::primitive_set_with_custom_manager`].
    pub fn primitive_set<P: ?Sized + 'static>(
        &self,
        handle: &KeysetHandle,
    ) -> Result<PrimitiveSet<P>, CryptoError> {
        self.primitive_set_with_custom_manager(handle, None)
    }

    /// Build the primitive set of `handle`.
    ///
    /// Every ENABLED key, in keyset order, is resolved by `custom_manager`
    /// when it supports the key's type URL, and by the registry otherwise.
    /// Keys with any other status get no entry. The entry whose key id
    /// equals the keyset's primary key id becomes the primary.
    ///
    /// # Errors
    ///
    /// - [`CryptoError::EmptyKeyset`] if the keyset has no keys
    /// - [`CryptoError::InvalidPrimaryKey`] if the primary id names no ENABLED key
    /// - lookup and manager errors, unchanged
    pub fn primitive_set_with_custom_manager<P: ?Sized + 'static>(
        &self,
        handle: &KeysetHandle,
        custom_manager: Option<&dyn KeyManager<P>>,
    ) -> Result<PrimitiveSet<P>, CryptoError> {
        let keyset = handle.keyset();
        if keyset.is_empty() {
            return Err(CryptoError::EmptyKeyset);
        }

        let mut builder = PrimitiveSetBuilder::new();
        for key in &keyset.keys {
            if key.status != KeyStatusType::Enabled {
                continue;
            }
            let type_url = key.key_data.type_url.as_str();
            let serialized_key = key.key_data.value.expose();
            let primitive = match custom_manager {
                Some(custom) if custom.does_support(type_url) => custom.primitive(serialized_key)?,
                _ => self
                    .get_key_manager::<P>(type_url)?
                    .primitive(serialized_key)?,
            };
            let position = builder.add_primitive(primitive, key);
            if key.key_id == keyset.primary_key_id {
                builder.set_primary(position);
            }
        }

        let primitive_set = builder.build()?;
        debug!(
            entries = primitive_set.len(),
            primary_key_id = keyset.primary_key_id,
            "built primitive set"
        );
        Ok(primitive_set)
    }
}

// ---------------------------------------------------------------------------
// Global registry shortcuts
// ---------------------------------------------------------------------------

/// [`Registry::register_key_manager`] on the global registry.
///
/// # Errors
///
/// See [`Registry::register_key_manager`].
pub fn register_key_manager<P: ?Sized + 'static>(
    type_url: impl Into<String>,
    manager: Arc<dyn KeyManager<P>>,
) -> Result<bool, CryptoError> {
    Registry::global().register_key_manager(type_url, manager)
}

/// [`Registry::get_key_manager`] on the global registry.
///
/// # Errors
///
/// See [`Registry::get_key_manager`].
pub fn get_key_manager<P: ?Sized + 'static>(
    type_url: &str,
) -> Result<Arc<dyn KeyManager<P>>, CryptoError> {
    Registry::global().get_key_manager(type_url)
}

/// [`Registry::new_key_data`] on the global registry.
///
/// # Errors
///
/// See [`Registry::new_key_data`].
pub fn new_key_data(template: &KeyTemplate) -> Result<KeyData, CryptoError> {
    Registry::global().new_key_data(template)
}

/// [`Registry::primitive`] on the global registry.
///
/// # Errors
///
/// See [`Registry::primitive`].
pub fn primitive<P: ?Sized + 'static>(key_data: &KeyData) -> Result<Box<P>, CryptoError> {
    Registry::global().primitive(key_data)
}

/// [`Registry::primitive_set_with_custom_manager`] on the global registry.
///
/// # Errors
///
/// See [`Registry::primitive_set_with_custom_manager`].
pub fn primitive_set<P: ?Sized + 'static>(
    handle: &KeysetHandle,
    custom_manager: Option<&dyn KeyManager<P>>,
) -> Result<PrimitiveSet<P>, CryptoError> {
    Registry::global().primitive_set_with_custom_manager(handle, custom_manager)
}

/// [`Registry::register_config`] on the global registry.
///
/// # Errors
///
/// See [`Registry::register_config`].
pub fn register_config(config: &RegistryConfig) -> Result<(), CryptoError> {
    Registry::global().register_config(config)
}
