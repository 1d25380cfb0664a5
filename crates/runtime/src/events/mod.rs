//! Outbound event system: typed acknowledgments and broadcasts routed over
//! a topic-based bus.

mod bus;
mod types;

pub use bus::{EventBus, Topic};
pub use types::{Ack, Event, WorldBroadcast};
