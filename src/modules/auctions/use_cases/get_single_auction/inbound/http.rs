use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;

use crate::modules::auctions::application::errors::ApplicationError;
use crate::modules::auctions::application::ports::{AuctionView, GetSingleAuction};
use crate::shared::infrastructure::scoped_connection::ScopeKey;
use crate::shell::state::AppState;

pub async fn handle(
    State(state): State<AppState>,
    Extension(scope): Extension<ScopeKey>,
    Path(auction_id): Path<String>,
) -> Result<Json<AuctionView>, ApplicationError> {
    let query: Arc<dyn GetSingleAuction> = state.registry.resolve(scope)?;
    query
        .query(&auction_id)
        .await?
        .map(Json)
        .ok_or(ApplicationError::NotFound(auction_id))
}
