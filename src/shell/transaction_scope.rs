// Request scoped transactions.
//
// Purpose
// - Give every request exactly one connection and one transaction, and settle both when the
//   response is known.
//
// Responsibilities
// - before_dispatch acquires the scope connection and begins a transaction.
// - after_dispatch commits below the failure threshold, rolls back otherwise, and always releases.
// - The middleware wires both hooks around the inner service and hands the ScopeKey to handlers
//   through request extensions.
//
// Boundaries
// - Handlers never commit, roll back or release. They only read the scope from the request.

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, error, warn};

use crate::shared::infrastructure::database::{Connection, ConnectionSource, DatabaseError};
use crate::shared::infrastructure::scoped_connection::{
    ScopeError, ScopeKey, ScopedConnectionProvider,
};

/// The transaction begun for one scope. Attached to the request so handlers can reach the
/// connection directly.
#[derive(Debug, Clone)]
pub struct OpenTransaction<C: Connection> {
    scope: ScopeKey,
    connection: C,
}

impl<C: Connection> OpenTransaction<C> {
    pub fn scope(&self) -> ScopeKey {
        self.scope
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOutcome {
    Committed,
    Discarded,
    Skipped,
}

pub struct TransactionHooks<S: ConnectionSource> {
    connections: Arc<ScopedConnectionProvider<S>>,
    failure_threshold: StatusCode,
}

impl<S: ConnectionSource> TransactionHooks<S> {
    pub fn new(connections: Arc<ScopedConnectionProvider<S>>, failure_threshold: StatusCode) -> Self {
        Self {
            connections,
            failure_threshold,
        }
    }

    pub fn connections(&self) -> &Arc<ScopedConnectionProvider<S>> {
        &self.connections
    }

    pub fn failure_threshold(&self) -> StatusCode {
        self.failure_threshold
    }

    pub async fn before_dispatch(
        &self,
        scope: ScopeKey,
    ) -> Result<OpenTransaction<S::Connection>, ScopeError> {
        let connection = self.connections.acquire(scope).await?;
        if let Err(begin_error) = connection.begin().await {
            warn!(%scope, error = %begin_error, "could not begin transaction");
            if let Err(release_error) = self.connections.release(scope).await {
                warn!(%scope, error = %release_error, "could not release after a failed begin");
            }
            return Err(begin_error.into());
        }
        debug!(%scope, connection = connection.id(), "transaction opened");
        Ok(OpenTransaction { scope, connection })
    }

    pub async fn after_dispatch(
        &self,
        scope: ScopeKey,
        transaction: Option<OpenTransaction<S::Connection>>,
        status: StatusCode,
    ) -> Result<TransactionOutcome, ScopeError> {
        let settled = match transaction {
            None => Ok(TransactionOutcome::Skipped),
            Some(transaction) if !self.is_failure(status) => transaction
                .connection
                .commit()
                .await
                .map(|()| TransactionOutcome::Committed),
            Some(transaction) => {
                if let Err(rollback_error) = transaction.connection.rollback().await {
                    warn!(%scope, error = %rollback_error, "rollback failed, discarding on release");
                }
                Ok(TransactionOutcome::Discarded)
            }
        };

        let released = self.connections.release(scope).await;

        let outcome = settled.inspect_err(|commit_error| {
            error!(%scope, error = %commit_error, "commit failed");
        })?;
        released?;
        debug!(%scope, ?outcome, %status, "transaction settled");
        Ok(outcome)
    }

    fn is_failure(&self, status: StatusCode) -> bool {
        status.as_u16() >= self.failure_threshold.as_u16()
    }
}

/// Releases the scope if the request future is dropped before after_dispatch finished.
struct ReleaseOnDrop<S: ConnectionSource> {
    connections: Arc<ScopedConnectionProvider<S>>,
    scope: ScopeKey,
    armed: bool,
}

impl<S: ConnectionSource> ReleaseOnDrop<S> {
    fn new(connections: Arc<ScopedConnectionProvider<S>>, scope: ScopeKey) -> Self {
        Self {
            connections,
            scope,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<S: ConnectionSource> Drop for ReleaseOnDrop<S> {
    fn drop(&mut self) {
        if !self.armed || !self.connections.is_active(self.scope) {
            return;
        }
        let scope = self.scope;
        let Ok(runtime) = Handle::try_current() else {
            warn!(%scope, "no runtime to release an abandoned scope");
            return;
        };
        let connections = self.connections.clone();
        runtime.spawn(async move {
            match connections.release(scope).await {
                Ok(()) => debug!(%scope, "released abandoned scope"),
                Err(error) => warn!(%scope, %error, "could not release abandoned scope"),
            }
        });
    }
}

pub async fn transaction_scope<S: ConnectionSource>(
    State(hooks): State<Arc<TransactionHooks<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let scope = ScopeKey::new();
    // Armed before acquire, so a request dropped while the transaction begins still releases.
    let guard = ReleaseOnDrop::new(hooks.connections().clone(), scope);
    let transaction = match hooks.before_dispatch(scope).await {
        Ok(transaction) => transaction,
        Err(error) => {
            guard.disarm();
            return scope_failure(scope, &error, "could not open a request scope");
        }
    };

    request.extensions_mut().insert(scope);
    request.extensions_mut().insert(transaction.clone());
    let response = next.run(request).await;

    let settled = hooks
        .after_dispatch(scope, Some(transaction), response.status())
        .await;
    guard.disarm();

    match settled {
        Ok(_) => response,
        Err(error) => scope_failure(scope, &error, "could not settle the request scope"),
    }
}

fn scope_failure(scope: ScopeKey, error: &ScopeError, message: &str) -> Response {
    let status = match error {
        ScopeError::Database(DatabaseError::ConnectionUnavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error!(%scope, %error, %status, "{message}");
    (status, Json(json!({ "error": message }))).into_response()
}
