use std::sync::Arc;
use tracing::info;

use crate::modules::auctions::application::errors::ApplicationError;
use crate::modules::auctions::application::ports::{AuctionView, AuctionsRepository};
use crate::shared::infrastructure::event_bus::EventBus;
use crate::shared::infrastructure::registry::Registry;
use crate::shared::infrastructure::scoped_connection::ScopeKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceBid {
    pub auction_id: String,
    pub bidder_id: String,
    pub amount: i64,
    pub placed_at: i64,
}

pub struct PlaceBidHandler {
    registry: Arc<Registry>,
}

impl PlaceBidHandler {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub async fn handle(
        &self,
        scope: ScopeKey,
        command: PlaceBid,
    ) -> Result<AuctionView, ApplicationError> {
        let repository: Arc<dyn AuctionsRepository> = self.registry.resolve(scope)?;
        let mut auction = repository
            .get(&command.auction_id)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(command.auction_id.clone()))?;

        let events = auction.place_bid(command.bidder_id, command.amount, command.placed_at)?;
        repository.save(&auction).await?;

        let event_bus: Arc<dyn EventBus> = self.registry.resolve(scope)?;
        for event in events {
            let envelope = event
                .into_envelope(command.placed_at)
                .map_err(|error| ApplicationError::Unexpected(error.to_string()))?;
            event_bus.publish(envelope).await?;
        }

        info!(auction_id = %auction.id, amount = command.amount, %scope, "bid placed");
        Ok(AuctionView::from(&auction))
    }
}
