// Resolves abstract capabilities to the adapters that implement them.
//
// Purpose
// - Let use cases ask for "the auctions repository" or "the current connection" without knowing
//   how or where it was built.
//
// Responsibilities
// - Keep one entry per capability type. Registering again replaces the entry.
// - Singletons are stored once and cloned out on every resolve.
// - Providers are called on every resolve with the caller's scope, so request scoped values
//   always reflect the scope's current binding.
//
// Boundaries
// - Filled in once at startup through &mut, then shared read only behind an Arc.

use crate::shared::infrastructure::scoped_connection::{ScopeError, ScopeKey};
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no binding registered for {capability}")]
    UnboundCapability { capability: &'static str },

    #[error("binding for {capability} produced a value of another type")]
    TypeMismatch { capability: &'static str },

    #[error(transparent)]
    Scope(#[from] ScopeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Singleton,
    Provider,
}

type Provider = dyn Fn(ScopeKey) -> Result<Box<dyn Any + Send + Sync>, RegistryError> + Send + Sync;

enum Binding {
    Singleton(Box<dyn Any + Send + Sync>),
    Provider(Box<Provider>),
}

struct Entry {
    capability: &'static str,
    binding: Binding,
}

#[derive(Default)]
pub struct Registry {
    entries: HashMap<TypeId, Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind<T>(&mut self, value: T) -> &mut Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.insert::<T>(Binding::Singleton(Box::new(value)))
    }

    pub fn bind_to_provider<T, F>(&mut self, provider: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(ScopeKey) -> Result<T, RegistryError> + Send + Sync + 'static,
    {
        self.insert::<T>(Binding::Provider(Box::new(move |scope| {
            provider(scope).map(|value| Box::new(value) as Box<dyn Any + Send + Sync>)
        })))
    }

    pub fn resolve<T>(&self, scope: ScopeKey) -> Result<T, RegistryError>
    where
        T: Clone + Send + Sync + 'static,
    {
        let capability = type_name::<T>();
        let entry = self
            .entries
            .get(&TypeId::of::<T>())
            .ok_or(RegistryError::UnboundCapability { capability })?;
        match &entry.binding {
            Binding::Singleton(value) => value
                .downcast_ref::<T>()
                .cloned()
                .ok_or(RegistryError::TypeMismatch { capability }),
            Binding::Provider(provider) => provider(scope)?
                .downcast::<T>()
                .map(|value| *value)
                .map_err(|_| RegistryError::TypeMismatch { capability }),
        }
    }

    pub fn kind_of<T: 'static>(&self) -> Option<BindingKind> {
        self.entries
            .get(&TypeId::of::<T>())
            .map(|entry| match entry.binding {
                Binding::Singleton(_) => BindingKind::Singleton,
                Binding::Provider(_) => BindingKind::Provider,
            })
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert<T: 'static>(&mut self, binding: Binding) -> &mut Self {
        let capability = type_name::<T>();
        let replaced = self
            .entries
            .insert(TypeId::of::<T>(), Entry { capability, binding })
            .is_some();
        debug!(capability, replaced, "registered binding");
        self
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut capabilities: Vec<_> = self.entries.values().map(|entry| entry.capability).collect();
        capabilities.sort_unstable();
        f.debug_struct("Registry")
            .field("capabilities", &capabilities)
            .finish()
    }
}
