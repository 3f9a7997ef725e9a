//! services/api/src/web/hub.rs
//!
//! The event hub: a single broadcast channel carrying `(topic, event)`
//! envelopes from the REST handlers to every live WebSocket connection.
//! Each connection filters the stream against its own subscription set, so
//! clients only see the topics they asked for.
//!
//! Delivery is fire-and-forget. A receiver that lags past the channel
//! capacity drops the oldest envelopes; there is no acknowledgment or replay.

use tokio::sync::broadcast;
use tracing::debug;

use crate::web::protocol::{ServerEvent, Topic};

#[derive(Clone)]
pub struct EventHub {
    tx: broadcast::Sender<(Topic, ServerEvent)>,
}

impl EventHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publishes an event to one topic. Succeeds even with no subscribers;
    /// nobody listening just means nobody to tell.
    pub fn publish(&self, topic: Topic, event: ServerEvent) {
        debug!(?topic, "publishing event");
        let _ = self.tx.send((topic, event));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<(Topic, ServerEvent)> {
        self.tx.subscribe()
    }
}
