use axum::{Extension, Json, extract::State};
use chrono::Utc;
use std::sync::Arc;

use crate::modules::auctions::application::errors::ApplicationError;
use crate::modules::auctions::application::ports::{AuctionView, GetActiveAuctions};
use crate::shared::infrastructure::scoped_connection::ScopeKey;
use crate::shell::state::AppState;

pub async fn handle(
    State(state): State<AppState>,
    Extension(scope): Extension<ScopeKey>,
) -> Result<Json<Vec<AuctionView>>, ApplicationError> {
    let queries: Arc<dyn GetActiveAuctions> = state.registry.resolve(scope)?;
    let views = queries.query(Utc::now().timestamp_millis()).await?;
    Ok(Json(views))
}
