use serde::{Deserialize, Serialize};

use crate::shared::infrastructure::event_bus::EventEnvelope;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuctionEvent {
    WinningBidPlaced {
        auction_id: String,
        bidder_id: String,
        amount: i64,
    },
    BidderHasBeenOverbid {
        auction_id: String,
        bidder_id: String,
        new_price: i64,
    },
}

impl AuctionEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            AuctionEvent::WinningBidPlaced { .. } => "WinningBidPlaced",
            AuctionEvent::BidderHasBeenOverbid { .. } => "BidderHasBeenOverbid",
        }
    }

    pub fn into_envelope(self, occurred_at: i64) -> Result<EventEnvelope, serde_json::Error> {
        Ok(EventEnvelope {
            event_type: self.event_type().to_string(),
            occurred_at,
            payload: serde_json::to_value(&self)?,
        })
    }
}
