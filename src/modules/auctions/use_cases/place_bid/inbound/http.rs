use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;

use crate::modules::auctions::use_cases::place_bid::handler::{PlaceBid, PlaceBidHandler};
use crate::shared::infrastructure::scoped_connection::ScopeKey;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct PlaceBidBody {
    pub bidder_id: String,
    pub amount: i64,
}

pub async fn handle(
    State(state): State<AppState>,
    Extension(scope): Extension<ScopeKey>,
    Path(auction_id): Path<String>,
    body: Result<Json<PlaceBidBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let command = PlaceBid {
        auction_id,
        bidder_id: body.bidder_id,
        amount: body.amount,
        placed_at: Utc::now().timestamp_millis(),
    };

    match PlaceBidHandler::new(state.registry.clone())
        .handle(scope, command)
        .await
    {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}
