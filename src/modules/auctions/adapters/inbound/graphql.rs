use async_graphql::{Context, Object, Result as GqlResult};
use chrono::Utc;
use std::sync::Arc;

use crate::modules::auctions::application::ports::{
    AuctionView, GetActiveAuctions, GetSingleAuction,
};
use crate::shared::infrastructure::registry::Registry;
use crate::shared::infrastructure::scoped_connection::ScopeKey;

#[derive(async_graphql::SimpleObject, Clone)]
pub struct GqlAuction {
    pub id: String,
    pub title: String,
    pub starting_price: i64,
    pub current_price: i64,
    pub ends_at: i64,
    pub bid_count: u64,
    pub winner: Option<String>,
}

impl From<AuctionView> for GqlAuction {
    fn from(v: AuctionView) -> Self {
        Self {
            id: v.id,
            title: v.title,
            starting_price: v.starting_price,
            current_price: v.current_price,
            ends_at: v.ends_at,
            bid_count: v.bid_count as u64,
            winner: v.winner,
        }
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn active_auctions(&self, context: &Context<'_>) -> GqlResult<Vec<GqlAuction>> {
        let registry = context.data::<Arc<Registry>>()?;
        let scope = *context.data::<ScopeKey>()?;
        let queries: Arc<dyn GetActiveAuctions> = registry.resolve(scope)?;
        let views = queries.query(Utc::now().timestamp_millis()).await?;
        Ok(views.into_iter().map(Into::into).collect())
    }

    async fn auction(&self, context: &Context<'_>, id: String) -> GqlResult<Option<GqlAuction>> {
        let registry = context.data::<Arc<Registry>>()?;
        let scope = *context.data::<ScopeKey>()?;
        let query: Arc<dyn GetSingleAuction> = registry.resolve(scope)?;
        Ok(query.query(&id).await?.map(Into::into))
    }
}
