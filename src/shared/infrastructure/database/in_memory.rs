// In memory implementation of the ConnectionSource and Connection ports.
//
// Purpose
// - Run the marketplace and its tests without a database server.
//
// Responsibilities
// - Hand out a bounded number of connections, like a driver pool.
// - Buffer writes per transaction. A connection reads its own uncommitted writes, nobody else does.
// - Apply buffered writes on commit. Drop them on rollback or close.
// - Count open connections, commits and rollbacks for inspection.

use super::{Connection, ConnectionId, ConnectionSource, DatabaseError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

pub const DSN_SCHEME: &str = "memory://";

type Tables = HashMap<String, BTreeMap<String, Value>>;

#[derive(Debug, Clone)]
struct Write {
    table: String,
    key: String,
    value: Value,
}

#[derive(Debug, Default)]
struct Shared {
    name: String,
    max_connections: usize,
    tables: RwLock<Tables>,
    next_connection_id: AtomicU64,
    open_connections: AtomicUsize,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    is_offline: AtomicBool,
    fails_commits: AtomicBool,
}

#[derive(Debug, Clone)]
pub struct InMemoryDatabase {
    shared: Arc<Shared>,
}

impl InMemoryDatabase {
    pub fn new(name: impl Into<String>, max_connections: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                name: name.into(),
                max_connections,
                ..Shared::default()
            }),
        }
    }

    /// Parses a `memory://<name>` dsn.
    pub fn connect(dsn: &str, max_connections: usize) -> Result<Self, DatabaseError> {
        let name = dsn
            .strip_prefix(DSN_SCHEME)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| DatabaseError::InvalidDsn(dsn.to_string()))?;
        if max_connections == 0 {
            return Err(DatabaseError::InvalidDsn(format!(
                "{dsn}: pool needs at least one connection"
            )));
        }
        Ok(Self::new(name, max_connections))
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn toggle_offline(&self) {
        self.shared.is_offline.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn toggle_failing_commits(&self) {
        self.shared.fails_commits.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn open_connections(&self) -> usize {
        self.shared.open_connections.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> usize {
        self.shared.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.shared.rollbacks.load(Ordering::SeqCst)
    }

    /// Reads committed state only, bypassing every connection.
    pub async fn committed(&self, table: &str, key: &str) -> Option<Value> {
        self.shared
            .tables
            .read()
            .await
            .get(table)
            .and_then(|rows| rows.get(key))
            .cloned()
    }
}

#[async_trait]
impl ConnectionSource for InMemoryDatabase {
    type Connection = InMemoryConnection;

    async fn open(&self) -> Result<InMemoryConnection, DatabaseError> {
        let shared = &self.shared;
        if shared.is_offline.load(Ordering::SeqCst) {
            return Err(DatabaseError::ConnectionUnavailable(format!(
                "database {} is offline",
                shared.name
            )));
        }
        shared
            .open_connections
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |open| {
                (open < shared.max_connections).then_some(open + 1)
            })
            .map_err(|_| {
                DatabaseError::ConnectionUnavailable(format!(
                    "connection pool of {} exhausted ({} connections)",
                    shared.name, shared.max_connections
                ))
            })?;
        let id = shared.next_connection_id.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(connection = id, database = %shared.name, "opened connection");
        Ok(InMemoryConnection {
            id,
            shared: shared.clone(),
            state: Arc::new(Mutex::new(ConnectionState::default())),
        })
    }
}

#[derive(Debug, Default)]
struct ConnectionState {
    closed: bool,
    transaction: Option<Vec<Write>>,
}

#[derive(Debug, Clone)]
pub struct InMemoryConnection {
    id: ConnectionId,
    shared: Arc<Shared>,
    state: Arc<Mutex<ConnectionState>>,
}

impl InMemoryConnection {
    pub async fn get(&self, table: &str, key: &str) -> Result<Option<Value>, DatabaseError> {
        let state = self.state.lock().await;
        self.ensure_open(&state)?;
        let pending = state.transaction.as_ref().and_then(|writes| {
            writes
                .iter()
                .rev()
                .find(|write| write.table == table && write.key == key)
        });
        if let Some(write) = pending {
            return Ok(Some(write.value.clone()));
        }
        let tables = self.shared.tables.read().await;
        Ok(tables.get(table).and_then(|rows| rows.get(key)).cloned())
    }

    pub async fn scan(&self, table: &str) -> Result<Vec<(String, Value)>, DatabaseError> {
        let state = self.state.lock().await;
        self.ensure_open(&state)?;
        let mut rows = self
            .shared
            .tables
            .read()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default();
        if let Some(writes) = &state.transaction {
            for write in writes.iter().filter(|write| write.table == table) {
                rows.insert(write.key.clone(), write.value.clone());
            }
        }
        Ok(rows.into_iter().collect())
    }

    /// Buffers the write inside a transaction, applies it immediately otherwise.
    pub async fn put(&self, table: &str, key: &str, value: Value) -> Result<(), DatabaseError> {
        let mut state = self.state.lock().await;
        self.ensure_open(&state)?;
        let write = Write {
            table: table.to_string(),
            key: key.to_string(),
            value,
        };
        match state.transaction.as_mut() {
            Some(writes) => writes.push(write),
            None => apply(&mut *self.shared.tables.write().await, vec![write]),
        }
        Ok(())
    }

    fn ensure_open(&self, state: &ConnectionState) -> Result<(), DatabaseError> {
        if state.closed {
            return Err(DatabaseError::Closed(self.id));
        }
        Ok(())
    }
}

fn apply(tables: &mut Tables, writes: Vec<Write>) {
    for write in writes {
        tables
            .entry(write.table)
            .or_default()
            .insert(write.key, write.value);
    }
}

#[async_trait]
impl Connection for InMemoryConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn begin(&self) -> Result<(), DatabaseError> {
        let mut state = self.state.lock().await;
        self.ensure_open(&state)?;
        if state.transaction.is_some() {
            return Err(DatabaseError::TransactionInProgress(self.id));
        }
        state.transaction = Some(Vec::new());
        Ok(())
    }

    async fn commit(&self) -> Result<(), DatabaseError> {
        let mut state = self.state.lock().await;
        self.ensure_open(&state)?;
        let writes = state
            .transaction
            .take()
            .ok_or(DatabaseError::NoTransaction(self.id))?;
        if self.shared.fails_commits.load(Ordering::SeqCst) {
            return Err(DatabaseError::CommitFailed(format!(
                "database {} rejected the transaction on connection {}",
                self.shared.name, self.id
            )));
        }
        apply(&mut *self.shared.tables.write().await, writes);
        self.shared.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(&self) -> Result<(), DatabaseError> {
        let mut state = self.state.lock().await;
        self.ensure_open(&state)?;
        state
            .transaction
            .take()
            .ok_or(DatabaseError::NoTransaction(self.id))?;
        self.shared.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) -> Result<(), DatabaseError> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Ok(());
        }
        state.closed = true;
        if let Some(writes) = state.transaction.take() {
            debug!(
                connection = self.id,
                discarded_writes = writes.len(),
                "closed connection with an uncommitted transaction"
            );
        }
        self.shared.open_connections.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}
