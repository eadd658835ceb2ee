// Ports the auctions use cases depend on.
//
// Purpose
// - Describe repositories, query handlers and the payment gateway as traits.
//
// Boundaries
// - Use cases resolve these through the registry, never by naming an adapter.
// - Request scoped adapters are bound to the unit of work of the request that resolved them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::modules::auctions::core::auction::Auction;
use crate::shared::infrastructure::database::DatabaseError;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("row {key} could not be mapped: {reason}")]
    Mapping { key: String, reason: String },
}

#[async_trait]
pub trait AuctionsRepository: Send + Sync {
    async fn get(&self, auction_id: &str) -> Result<Option<Auction>, RepositoryError>;
    async fn save(&self, auction: &Auction) -> Result<(), RepositoryError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionView {
    pub id: String,
    pub title: String,
    pub starting_price: i64,
    pub current_price: i64,
    pub ends_at: i64,
    pub bid_count: usize,
    pub winner: Option<String>,
}

impl From<&Auction> for AuctionView {
    fn from(auction: &Auction) -> Self {
        Self {
            id: auction.id.clone(),
            title: auction.title.clone(),
            starting_price: auction.starting_price,
            current_price: auction.current_price(),
            ends_at: auction.ends_at,
            bid_count: auction.bids.len(),
            winner: auction.winner().map(str::to_string),
        }
    }
}

#[async_trait]
pub trait GetActiveAuctions: Send + Sync {
    async fn query(&self, now: i64) -> Result<Vec<AuctionView>, RepositoryError>;
}

#[async_trait]
pub trait GetSingleAuction: Send + Sync {
    async fn query(&self, auction_id: &str) -> Result<Option<AuctionView>, RepositoryError>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    #[error("amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("payment gateway declined the charge: {0}")]
    Declined(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeId(pub String);

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn charge(&self, customer_id: &str, amount: i64) -> Result<ChargeId, PaymentError>;
}
