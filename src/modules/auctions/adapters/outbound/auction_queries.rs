// Query handlers reading auctions through the request's connection.

use async_trait::async_trait;

use crate::modules::auctions::adapters::outbound::auctions_repository::{
    AUCTIONS_TABLE, auction_from_row,
};
use crate::modules::auctions::application::ports::{
    AuctionView, GetActiveAuctions, GetSingleAuction, RepositoryError,
};
use crate::shared::infrastructure::database::in_memory::InMemoryConnection;

pub struct ConnectionGetActiveAuctions {
    connection: InMemoryConnection,
}

impl ConnectionGetActiveAuctions {
    pub fn new(connection: InMemoryConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl GetActiveAuctions for ConnectionGetActiveAuctions {
    async fn query(&self, now: i64) -> Result<Vec<AuctionView>, RepositoryError> {
        let mut views = Vec::new();
        for (key, row) in self.connection.scan(AUCTIONS_TABLE).await? {
            let auction = auction_from_row(&key, row)?;
            if auction.is_active(now) {
                views.push(AuctionView::from(&auction));
            }
        }
        views.sort_by_key(|view| view.ends_at);
        Ok(views)
    }
}

pub struct ConnectionGetSingleAuction {
    connection: InMemoryConnection,
}

impl ConnectionGetSingleAuction {
    pub fn new(connection: InMemoryConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl GetSingleAuction for ConnectionGetSingleAuction {
    async fn query(&self, auction_id: &str) -> Result<Option<AuctionView>, RepositoryError> {
        let row = self.connection.get(AUCTIONS_TABLE, auction_id).await?;
        row.map(|row| auction_from_row(auction_id, row).map(|auction| AuctionView::from(&auction)))
            .transpose()
    }
}
