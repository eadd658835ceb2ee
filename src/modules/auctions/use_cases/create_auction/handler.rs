use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::modules::auctions::application::errors::ApplicationError;
use crate::modules::auctions::application::ports::AuctionsRepository;
use crate::modules::auctions::core::auction::Auction;
use crate::shared::infrastructure::registry::Registry;
use crate::shared::infrastructure::scoped_connection::ScopeKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAuction {
    pub title: String,
    pub starting_price: i64,
    pub ends_at: i64,
    pub created_at: i64,
}

pub struct CreateAuctionHandler {
    registry: Arc<Registry>,
}

impl CreateAuctionHandler {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub async fn handle(
        &self,
        scope: ScopeKey,
        command: CreateAuction,
    ) -> Result<String, ApplicationError> {
        let auction = Auction::open(
            Uuid::now_v7().to_string(),
            command.title,
            command.starting_price,
            command.ends_at,
            command.created_at,
        )?;
        let repository: Arc<dyn AuctionsRepository> = self.registry.resolve(scope)?;
        repository.save(&auction).await?;
        info!(auction_id = %auction.id, %scope, "auction opened");
        Ok(auction.id)
    }
}
