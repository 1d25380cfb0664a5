//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::Event;

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Per-session acknowledgments.
    Session,
    /// World broadcasts.
    World,
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Session { .. } => Topic::Session,
            Event::World(_) => Topic::World,
        }
    }
}

/// Topic-based event bus.
///
/// Consumers subscribe to the topics they care about; publishing is
/// best-effort and never blocks the worker.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<RwLock<HashMap<Topic, broadcast::Sender<Event>>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic.
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut channels = HashMap::new();
        channels.insert(Topic::Session, broadcast::channel(capacity).0);
        channels.insert(Topic::World, broadcast::channel(capacity).0);

        Self {
            channels: Arc::new(RwLock::new(channels)),
        }
    }

    /// Publish an event to its corresponding topic.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if let Ok(channels) = self.channels.read()
            && let Some(tx) = channels.get(&topic)
            && tx.send(event).is_err()
        {
            // no subscribers for this topic; normal, not an error
            tracing::trace!(?topic, "no subscribers for topic");
        }
    }

    /// Subscribe to a specific topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        let channels = self.channels.read().expect("event bus lock poisoned");
        channels
            .get(&topic)
            .expect("all topics are pre-created")
            .subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
