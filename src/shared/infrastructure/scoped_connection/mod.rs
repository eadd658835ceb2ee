// Binds one connection and one unit of work to each request scope.
//
// Purpose
// - Be the single source of truth for "is there an active connection for this scope".
//
// Responsibilities
// - acquire opens a connection and binds it. A second acquire for a bound scope is an error.
// - current and current_unit_of_work only look up. They never open a connection.
// - release closes and unbinds. Releasing an unbound scope does nothing.
//
// Boundaries
// - Scopes never share a binding. The connection source pool is the only shared resource.

mod unit_of_work;

pub use unit_of_work::UnitOfWork;

use crate::shared::infrastructure::database::{Connection, ConnectionSource, DatabaseError};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Identifies one request handling unit. Created by the pipeline, passed explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeKey(Uuid);

impl ScopeKey {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ScopeKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("a connection is already acquired for scope {0}")]
    AlreadyAcquired(ScopeKey),

    #[error("no active connection for scope {0}")]
    NoActiveConnection(ScopeKey),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

struct ScopedBinding<C: Connection> {
    connection: C,
    unit_of_work: UnitOfWork<C>,
}

pub struct ScopedConnectionProvider<S: ConnectionSource> {
    source: S,
    bindings: RwLock<HashMap<ScopeKey, ScopedBinding<S::Connection>>>,
}

impl<S: ConnectionSource> ScopedConnectionProvider<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            bindings: RwLock::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn acquire(&self, scope: ScopeKey) -> Result<S::Connection, ScopeError> {
        if self.is_active(scope) {
            warn!(%scope, "acquire called twice without release");
            return Err(ScopeError::AlreadyAcquired(scope));
        }

        let connection = self.source.open().await?;
        let binding = ScopedBinding {
            connection: connection.clone(),
            unit_of_work: UnitOfWork::new(scope, connection.clone()),
        };
        let inserted = match self.write().entry(scope) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(binding);
                true
            }
        };

        if !inserted {
            // Lost a race against another acquire for the same scope.
            if let Err(error) = connection.close().await {
                warn!(%scope, %error, "failed to close the losing connection");
            }
            return Err(ScopeError::AlreadyAcquired(scope));
        }

        debug!(%scope, connection = connection.id(), "acquired connection");
        Ok(connection)
    }

    pub fn current(&self, scope: ScopeKey) -> Result<S::Connection, ScopeError> {
        self.read()
            .get(&scope)
            .map(|binding| binding.connection.clone())
            .ok_or(ScopeError::NoActiveConnection(scope))
    }

    pub fn current_unit_of_work(
        &self,
        scope: ScopeKey,
    ) -> Result<UnitOfWork<S::Connection>, ScopeError> {
        self.read()
            .get(&scope)
            .map(|binding| binding.unit_of_work.clone())
            .ok_or(ScopeError::NoActiveConnection(scope))
    }

    pub fn is_active(&self, scope: ScopeKey) -> bool {
        self.read().contains_key(&scope)
    }

    pub fn active_scopes(&self) -> usize {
        self.read().len()
    }

    pub async fn release(&self, scope: ScopeKey) -> Result<(), ScopeError> {
        let removed = self.write().remove(&scope);
        let Some(binding) = removed else {
            return Ok(());
        };
        binding.connection.close().await?;
        debug!(%scope, connection = binding.connection.id(), "released connection");
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<ScopeKey, ScopedBinding<S::Connection>>> {
        self.bindings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ScopeKey, ScopedBinding<S::Connection>>> {
        self.bindings.write().unwrap_or_else(PoisonError::into_inner)
    }
}
