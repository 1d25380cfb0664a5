//! Cloneable façade for issuing requests to the session worker.
//!
//! [`WorldHandle`] hides channel plumbing and offers async helpers for
//! submitting requests and streaming events from specific topics.

use tokio::sync::{broadcast, mpsc, oneshot};

use world_core::{Request, SessionContext, WorldState};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::session::Command;

/// Client-facing handle to interact with the session worker.
#[derive(Clone)]
pub struct WorldHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl WorldHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Submits a request on behalf of a session and waits until the worker
    /// has processed it. Rejections and acknowledgments are delivered
    /// through the event bus, not through this return value.
    pub async fn submit(&self, session: SessionContext, request: Request) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Submit {
                session,
                request,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Subscribe to events from a specific topic.
    ///
    /// - [`Topic::Session`]: per-session acknowledgments
    /// - [`Topic::World`]: broadcasts to all observers
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Query a read-only snapshot of the current world state.
    pub async fn query_world(&self) -> Result<WorldState> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryWorld { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Get a reference to the event bus for advanced usage.
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
