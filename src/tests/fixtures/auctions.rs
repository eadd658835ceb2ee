// Shared builders for auction aggregates.

use crate::modules::auctions::core::auction::Auction;

/// Fixed clock for domain tests, in epoch milliseconds.
pub const NOW: i64 = 1_700_000_000_000;

pub struct AuctionBuilder {
    inner: Auction,
}

impl Default for AuctionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AuctionBuilder {
    pub fn new() -> Self {
        Self {
            inner: Auction {
                id: "a-1".to_string(),
                title: "Brass lamp".to_string(),
                starting_price: 1_000,
                ends_at: NOW + 60_000,
                bids: Vec::new(),
            },
        }
    }

    pub fn id(mut self, v: impl Into<String>) -> Self {
        self.inner.id = v.into();
        self
    }

    pub fn ends_at(mut self, v: i64) -> Self {
        self.inner.ends_at = v;
        self
    }

    pub fn build(self) -> Auction {
        self.inner
    }
}
