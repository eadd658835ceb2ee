use async_graphql::http::GraphiQLSource;
use async_graphql::{EmptyMutation, EmptySubscription, Schema};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{Extension, extract::State, response::Html};
use std::sync::Arc;

pub use crate::modules::auctions::adapters::inbound::graphql::QueryRoot;
use crate::shared::infrastructure::registry::Registry;
use crate::shared::infrastructure::scoped_connection::ScopeKey;
use crate::shell::state::AppState;

pub const ENDPOINT: &str = "/graphql";

pub type AppSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub fn build_schema(registry: Arc<Registry>) -> AppSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(registry)
        .finish()
}

/// Resolvers read the request scope from the per request data, never from the schema.
pub async fn handle(
    State(state): State<AppState>,
    Extension(scope): Extension<ScopeKey>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    state
        .schema
        .execute(request.into_inner().data(scope))
        .await
        .into()
}

pub async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint(ENDPOINT).finish())
}
