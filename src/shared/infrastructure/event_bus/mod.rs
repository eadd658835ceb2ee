// Port for publishing domain events to in process subscribers.
//
// Purpose
// - Decouple use cases from whoever reacts to their events, such as notification senders.

pub mod in_memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_type: String,
    pub occurred_at: i64,
    pub payload: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum EventBusError {
    #[error("subscriber to {event_type} failed: {reason}")]
    SubscriberFailed { event_type: String, reason: String },
}

#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, event: EventEnvelope) -> Result<(), EventBusError>;
}

#[async_trait]
pub trait EventSubscriber: Send + Sync {
    async fn on_event(&self, event: &EventEnvelope) -> anyhow::Result<()>;
}
