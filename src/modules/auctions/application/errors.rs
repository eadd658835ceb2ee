use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::modules::auctions::application::ports::RepositoryError;
use crate::modules::auctions::core::auction::AuctionError;
use crate::shared::infrastructure::event_bus::EventBusError;
use crate::shared::infrastructure::registry::RegistryError;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("auction {0} not found")]
    NotFound(String),

    #[error("domain rejected: {0}")]
    Domain(#[from] AuctionError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    EventBus(#[from] EventBusError),

    #[error("unexpected: {0}")]
    Unexpected(String),
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApplicationError::NotFound(_) => StatusCode::NOT_FOUND,
            ApplicationError::Domain(_) => StatusCode::CONFLICT,
            _ => {
                error!(error = %self, "use case failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
