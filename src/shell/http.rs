use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::modules::auctions::use_cases::create_auction::inbound::http as create_auction_http;
use crate::modules::auctions::use_cases::get_single_auction::inbound::http as get_single_auction_http;
use crate::modules::auctions::use_cases::list_active_auctions::inbound::http as list_active_auctions_http;
use crate::modules::auctions::use_cases::place_bid::inbound::http as place_bid_http;
use crate::shared::infrastructure::database::in_memory::InMemoryDatabase;
use crate::shell::graphql;
use crate::shell::state::AppState;
use crate::shell::transaction_scope::transaction_scope;

// Layers run outside in: trace, transaction scope, catch panic, handler.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/auctions",
            get(list_active_auctions_http::handle).post(create_auction_http::handle),
        )
        .route("/auctions/{auction_id}", get(get_single_auction_http::handle))
        .route("/auctions/{auction_id}/bids", post(place_bid_http::handle))
        .route(graphql::ENDPOINT, get(graphql::graphiql).post(graphql::handle))
        .layer(CatchPanicLayer::new())
        .layer(from_fn_with_state(
            state.transactions.clone(),
            transaction_scope::<InMemoryDatabase>,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
