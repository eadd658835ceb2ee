// Ports for the database driver.
//
// Purpose
// - Describe what the web layer needs from a pooled database driver, without implementing it.
//
// Responsibilities
// - A ConnectionSource hands out physical connections.
// - A Connection exposes the transaction capability set: begin, commit, rollback, close.
//
// Boundaries
// - Closing a connection discards any transaction that was not committed.
// - Adapters implement these traits. The in memory driver lives next to this file.

pub mod in_memory;

use async_trait::async_trait;
use thiserror::Error;

pub type ConnectionId = u64;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DatabaseError {
    #[error("invalid dsn: {0}")]
    InvalidDsn(String),

    #[error("connection unavailable: {0}")]
    ConnectionUnavailable(String),

    #[error("commit failed: {0}")]
    CommitFailed(String),

    #[error("no transaction in progress on connection {0}")]
    NoTransaction(ConnectionId),

    #[error("a transaction is already in progress on connection {0}")]
    TransactionInProgress(ConnectionId),

    #[error("connection {0} is closed")]
    Closed(ConnectionId),
}

#[async_trait]
pub trait Connection: std::fmt::Debug + Clone + Send + Sync + 'static {
    fn id(&self) -> ConnectionId;
    async fn begin(&self) -> Result<(), DatabaseError>;
    async fn commit(&self) -> Result<(), DatabaseError>;
    async fn rollback(&self) -> Result<(), DatabaseError>;
    async fn close(&self) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait ConnectionSource: Send + Sync + 'static {
    type Connection: Connection;

    async fn open(&self) -> Result<Self::Connection, DatabaseError>;
}
