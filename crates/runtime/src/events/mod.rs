//! Topic-based event bus for runtime events.
//!
//! Every fact the engine reports is published to the topic of its category,
//! and consumers subscribe only to the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{SessionEvent, TurnEvent};
