// The auction aggregate.
//
// Responsibilities
// - Enforce rules: a starting price is positive, an auction ends in the future when opened,
//   a bid must beat the current price and arrive before the auction ends.
// - Produce the events a placed bid causes. Never perform input or output.

use serde::{Deserialize, Serialize};

use crate::modules::auctions::core::events::AuctionEvent;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuctionError {
    #[error("starting price must be positive")]
    InvalidStartingPrice,
    #[error("auction must end in the future")]
    EndsInThePast,
    #[error("auction has already ended")]
    Ended,
    #[error("bid must exceed the current price of {current_price}")]
    BidTooLow { current_price: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub bidder_id: String,
    pub amount: i64,
    pub placed_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    pub id: String,
    pub title: String,
    pub starting_price: i64,
    pub ends_at: i64,
    pub bids: Vec<Bid>,
}

impl Auction {
    pub fn open(
        id: impl Into<String>,
        title: impl Into<String>,
        starting_price: i64,
        ends_at: i64,
        now: i64,
    ) -> Result<Self, AuctionError> {
        if starting_price <= 0 {
            return Err(AuctionError::InvalidStartingPrice);
        }
        if ends_at <= now {
            return Err(AuctionError::EndsInThePast);
        }
        Ok(Self {
            id: id.into(),
            title: title.into(),
            starting_price,
            ends_at,
            bids: Vec::new(),
        })
    }

    pub fn current_price(&self) -> i64 {
        self.bids
            .last()
            .map(|bid| bid.amount)
            .unwrap_or(self.starting_price)
    }

    pub fn winner(&self) -> Option<&str> {
        self.bids.last().map(|bid| bid.bidder_id.as_str())
    }

    pub fn is_active(&self, now: i64) -> bool {
        now < self.ends_at
    }

    pub fn place_bid(
        &mut self,
        bidder_id: impl Into<String>,
        amount: i64,
        now: i64,
    ) -> Result<Vec<AuctionEvent>, AuctionError> {
        if !self.is_active(now) {
            return Err(AuctionError::Ended);
        }
        let current_price = self.current_price();
        if amount <= current_price {
            return Err(AuctionError::BidTooLow { current_price });
        }

        let bidder_id = bidder_id.into();
        let mut events = Vec::with_capacity(2);
        if let Some(previous) = self.winner().filter(|previous| *previous != bidder_id) {
            events.push(AuctionEvent::BidderHasBeenOverbid {
                auction_id: self.id.clone(),
                bidder_id: previous.to_string(),
                new_price: amount,
            });
        }
        events.push(AuctionEvent::WinningBidPlaced {
            auction_id: self.id.clone(),
            bidder_id: bidder_id.clone(),
            amount,
        });
        self.bids.push(Bid {
            bidder_id,
            amount,
            placed_at: now,
        });
        Ok(events)
    }
}
