// In memory implementation of the EventBus port.
//
// Responsibilities
// - Dispatch each published event to the subscribers of its event type, in subscription order.
// - Keep every published event for inspection.

use crate::shared::infrastructure::event_bus::{
    EventBus, EventBusError, EventEnvelope, EventSubscriber,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Default)]
pub struct InMemoryEventBus {
    subscribers: HashMap<String, Vec<Arc<dyn EventSubscriber>>>,
    pub published: Mutex<Vec<EventEnvelope>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, event_type: impl Into<String>, subscriber: Arc<dyn EventSubscriber>) {
        self.subscribers
            .entry(event_type.into())
            .or_default()
            .push(subscriber);
    }
}

#[async_trait::async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), EventBusError> {
        self.published.lock().await.push(event.clone());
        let subscribers = self
            .subscribers
            .get(&event.event_type)
            .map(Vec::as_slice)
            .unwrap_or_default();
        debug!(event_type = %event.event_type, subscribers = subscribers.len(), "publishing event");
        for subscriber in subscribers {
            subscriber
                .on_event(&event)
                .await
                .map_err(|error| EventBusError::SubscriberFailed {
                    event_type: event.event_type.clone(),
                    reason: error.to_string(),
                })?;
        }
        Ok(())
    }
}
