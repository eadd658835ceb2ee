// AuctionsRepository backed by the request's unit of work.
//
// Responsibilities
// - Store each auction as one JSON row keyed by its id.
// - Read and write through the unit of work, so writes join the request transaction.

use async_trait::async_trait;
use serde_json::Value;

use crate::modules::auctions::application::ports::{AuctionsRepository, RepositoryError};
use crate::modules::auctions::core::auction::Auction;
use crate::shared::infrastructure::database::in_memory::InMemoryConnection;
use crate::shared::infrastructure::scoped_connection::UnitOfWork;

pub const AUCTIONS_TABLE: &str = "auctions";

pub fn auction_from_row(key: &str, row: Value) -> Result<Auction, RepositoryError> {
    serde_json::from_value(row).map_err(|error| RepositoryError::Mapping {
        key: key.to_string(),
        reason: error.to_string(),
    })
}

pub struct UnitOfWorkAuctionsRepository {
    unit_of_work: UnitOfWork<InMemoryConnection>,
}

impl UnitOfWorkAuctionsRepository {
    pub fn new(unit_of_work: UnitOfWork<InMemoryConnection>) -> Self {
        Self { unit_of_work }
    }
}

#[async_trait]
impl AuctionsRepository for UnitOfWorkAuctionsRepository {
    async fn get(&self, auction_id: &str) -> Result<Option<Auction>, RepositoryError> {
        self.unit_of_work
            .connection()
            .get(AUCTIONS_TABLE, auction_id)
            .await?
            .map(|row| auction_from_row(auction_id, row))
            .transpose()
    }

    async fn save(&self, auction: &Auction) -> Result<(), RepositoryError> {
        let row = serde_json::to_value(auction).map_err(|error| RepositoryError::Mapping {
            key: auction.id.clone(),
            reason: error.to_string(),
        })?;
        self.unit_of_work
            .connection()
            .put(AUCTIONS_TABLE, &auction.id, row)
            .await?;
        Ok(())
    }
}
