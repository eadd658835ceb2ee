use axum::{
    Extension, Json, extract::State, extract::rejection::JsonRejection, http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::modules::auctions::use_cases::create_auction::handler::{
    CreateAuction, CreateAuctionHandler,
};
use crate::shared::infrastructure::scoped_connection::ScopeKey;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct CreateAuctionBody {
    pub title: String,
    pub starting_price: i64,
    pub ends_at: i64,
}

#[derive(Serialize)]
pub struct CreateAuctionResponse {
    pub auction_id: String,
}

pub async fn handle(
    State(state): State<AppState>,
    Extension(scope): Extension<ScopeKey>,
    body: Result<Json<CreateAuctionBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let command = CreateAuction {
        title: body.title,
        starting_price: body.starting_price,
        ends_at: body.ends_at,
        created_at: Utc::now().timestamp_millis(),
    };

    match CreateAuctionHandler::new(state.registry.clone())
        .handle(scope, command)
        .await
    {
        Ok(auction_id) => (
            StatusCode::CREATED,
            Json(CreateAuctionResponse { auction_id }),
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}
