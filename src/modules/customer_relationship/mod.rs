// Customer relationship facade.
//
// Purpose
// - Tell bidders what happened to their bids.
//
// Responsibilities
// - Subscribe to BidderHasBeenOverbid on the event bus.
// - Queue one email per notification. Delivery over SMTP is handled elsewhere.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::modules::auctions::core::events::AuctionEvent;
use crate::shared::infrastructure::event_bus::in_memory::InMemoryEventBus;
use crate::shared::infrastructure::event_bus::{EventEnvelope, EventSubscriber};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRelationshipConfig {
    pub email_host: String,
    pub email_port: u16,
    pub email_username: String,
    pub email_password: String,
    pub email_from: (String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
}

pub struct CustomerRelationshipFacade {
    config: CustomerRelationshipConfig,
    pub outbox: Mutex<Vec<EmailMessage>>,
}

impl CustomerRelationshipFacade {
    pub fn new(config: CustomerRelationshipConfig) -> Self {
        Self {
            config,
            outbox: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe_to(self: &Arc<Self>, event_bus: &mut InMemoryEventBus) {
        event_bus.subscribe("BidderHasBeenOverbid", self.clone());
    }

    fn sender(&self) -> String {
        let (name, address) = &self.config.email_from;
        format!("{name} <{address}>")
    }
}

#[async_trait]
impl EventSubscriber for CustomerRelationshipFacade {
    async fn on_event(&self, event: &EventEnvelope) -> anyhow::Result<()> {
        let event: AuctionEvent = serde_json::from_value(event.payload.clone())?;
        if let AuctionEvent::BidderHasBeenOverbid {
            auction_id,
            bidder_id,
            new_price,
        } = event
        {
            let message = EmailMessage {
                to: bidder_id,
                from: self.sender(),
                subject: "You have been overbid".to_string(),
                body: format!("Auction {auction_id} now stands at {new_price}."),
            };
            info!(to = %message.to, host = %self.config.email_host, "queued outbid notification");
            self.outbox.lock().await.push(message);
        }
        Ok(())
    }
}
