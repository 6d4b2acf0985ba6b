use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use crate::error::Error;

/// A directory of shared registries, keyed by name.
///
/// Hands out [`Arc`] handles to registries of type `R`, constructing each
/// registry at most once per bound name. A single default name can be
/// configured exactly once over the directory's lifetime; [`clear`] resets
/// both the bindings and the default name.
///
/// All operations are independently atomic. Concurrent callers of
/// [`get_or_create`] for the same name converge on a single instance, and
/// at most one [`set_default`] / [`set_default_registry`] call succeeds
/// until the next [`clear`].
///
/// [`clear`]: Self::clear
/// [`get_or_create`]: Self::get_or_create
/// [`set_default`]: Self::set_default
/// [`set_default_registry`]: Self::set_default_registry
pub struct SharedRegistries<R> {
    inner: RwLock<Inner<R>>,
}

struct Inner<R> {
    registries: HashMap<String, Arc<R>>,
    // Single-assignment until the next `clear`
    default_name: OnceCell<String>,
}

impl<R> Default for SharedRegistries<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> SharedRegistries<R> {
    /// Creates an empty directory with no default name configured
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                registries: HashMap::new(),
                default_name: OnceCell::new(),
            }),
        }
    }

    /// Returns a snapshot of the currently bound names, in no particular
    /// order
    pub fn names(&self) -> HashSet<String> {
        self.inner.read().registries.keys().cloned().collect()
    }

    /// Unbinds `name` if present; silently does nothing otherwise.
    ///
    /// The directory forgets the removed instance: a later
    /// [`get_or_create`](Self::get_or_create) for the same name yields a
    /// fresh registry. Removing the name currently configured as default
    /// does not clear the default designation.
    pub fn remove(&self, name: &str) {
        if self.inner.write().registries.remove(name).is_some() {
            debug!(name, "removed registry");
        }
    }

    /// Unbinds all names and forgets the default name, resetting the
    /// directory to its initial empty state. Idempotent.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.registries.clear();
        inner.default_name.take();
        debug!("cleared registry directory");
    }

    /// Configures `name` as the default and binds the caller-supplied
    /// `registry` to it, overwriting any existing binding for that name.
    ///
    /// Fails with [`Error::DefaultAlreadySet`] if a default name is already
    /// configured, leaving both the default and the bindings untouched.
    pub fn set_default_registry(&self, name: &str, registry: Arc<R>) -> Result<Arc<R>, Error> {
        let mut inner = self.inner.write();
        inner
            .default_name
            .set(name.to_owned())
            .map_err(|_| Error::DefaultAlreadySet)?;
        debug!(name, "configured default registry");
        inner
            .registries
            .insert(name.to_owned(), Arc::clone(&registry));
        Ok(registry)
    }
}

impl<R: Default> SharedRegistries<R> {
    /// Returns the registry bound to `name`, constructing and binding a
    /// fresh one if the name is unbound.
    ///
    /// Under concurrent calls for the same name, exactly one construction
    /// occurs and every caller receives a handle to that single instance.
    pub fn get_or_create(&self, name: &str) -> Arc<R> {
        self.inner.write().get_or_create(name)
    }

    /// Configures `name` as the default and returns its registry, binding
    /// a fresh one if the name is unbound.
    ///
    /// The default name is single-assignment: the call fails with
    /// [`Error::DefaultAlreadySet`] if any default was configured before,
    /// regardless of the name, and the existing default stays in place.
    pub fn set_default(&self, name: &str) -> Result<Arc<R>, Error> {
        let mut inner = self.inner.write();
        inner
            .default_name
            .set(name.to_owned())
            .map_err(|_| Error::DefaultAlreadySet)?;
        debug!(name, "configured default registry");
        Ok(inner.get_or_create(name))
    }

    /// Resolves the default name and returns its registry.
    ///
    /// Fails with [`Error::DefaultNotSet`] if no default name has been
    /// configured. Resolution reflects the live binding on every call: if
    /// the default's entry was removed since the default was configured, a
    /// fresh registry is bound and returned.
    pub fn get_default(&self) -> Result<Arc<R>, Error> {
        self.try_get_default().ok_or(Error::DefaultNotSet)
    }

    /// Non-failing variant of [`get_default`](Self::get_default), returning
    /// `None` when no default name has been configured
    pub fn try_get_default(&self) -> Option<Arc<R>> {
        let mut inner = self.inner.write();
        let name = inner.default_name.get()?.clone();
        Some(inner.get_or_create(&name))
    }
}

impl<R: Default> Inner<R> {
    fn get_or_create(&mut self, name: &str) -> Arc<R> {
        let registry = self.registries.entry(name.to_owned()).or_insert_with(|| {
            debug!(name, "created registry");
            Arc::new(R::default())
        });
        Arc::clone(registry)
    }
}
