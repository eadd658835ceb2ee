// Connection sources that stall at chosen points, for interleaving tests.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;

use crate::shared::infrastructure::database::in_memory::{InMemoryConnection, InMemoryDatabase};
use crate::shared::infrastructure::database::{
    Connection, ConnectionId, ConnectionSource, DatabaseError,
};

/// Holds every open until `parties` opens are waiting, so all of them finish together.
pub struct GatedDatabase {
    pub database: InMemoryDatabase,
    gate: Arc<Barrier>,
}

impl GatedDatabase {
    pub fn new(database: InMemoryDatabase, parties: usize) -> Self {
        Self {
            database,
            gate: Arc::new(Barrier::new(parties)),
        }
    }
}

#[async_trait]
impl ConnectionSource for GatedDatabase {
    type Connection = InMemoryConnection;

    async fn open(&self) -> Result<InMemoryConnection, DatabaseError> {
        self.gate.wait().await;
        self.database.open().await
    }
}

/// Opens connections whose `begin` takes `delay` before reaching the database.
pub struct SlowBeginDatabase {
    pub database: InMemoryDatabase,
    delay: Duration,
}

impl SlowBeginDatabase {
    pub fn new(database: InMemoryDatabase, delay: Duration) -> Self {
        Self { database, delay }
    }
}

#[derive(Debug, Clone)]
pub struct SlowBeginConnection {
    inner: InMemoryConnection,
    delay: Duration,
}

#[async_trait]
impl ConnectionSource for SlowBeginDatabase {
    type Connection = SlowBeginConnection;

    async fn open(&self) -> Result<SlowBeginConnection, DatabaseError> {
        Ok(SlowBeginConnection {
            inner: self.database.open().await?,
            delay: self.delay,
        })
    }
}

#[async_trait]
impl Connection for SlowBeginConnection {
    fn id(&self) -> ConnectionId {
        self.inner.id()
    }

    async fn begin(&self) -> Result<(), DatabaseError> {
        tokio::time::sleep(self.delay).await;
        self.inner.begin().await
    }

    async fn commit(&self) -> Result<(), DatabaseError> {
        self.inner.commit().await
    }

    async fn rollback(&self) -> Result<(), DatabaseError> {
        self.inner.rollback().await
    }

    async fn close(&self) -> Result<(), DatabaseError> {
        self.inner.close().await
    }
}
