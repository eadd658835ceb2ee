use crate::shared::infrastructure::database::Connection;
use crate::shared::infrastructure::scoped_connection::ScopeKey;

/// Session handle bound to the one connection of a scope.
///
/// Repositories write through it so that everything a request touches lands in the
/// transaction the request hooks opened.
#[derive(Debug, Clone)]
pub struct UnitOfWork<C: Connection> {
    scope: ScopeKey,
    connection: C,
}

impl<C: Connection> UnitOfWork<C> {
    pub fn new(scope: ScopeKey, connection: C) -> Self {
        Self { scope, connection }
    }

    pub fn scope(&self) -> ScopeKey {
        self.scope
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }
}
