//! Topic-based event bus implementation.

use std::sync::Arc;

use rpg_core::EventCategory;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{SessionEvent, TurnEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum::EnumIter)]
pub enum Topic {
    /// Attacks, damage, statuses, defeats
    Combat,
    /// Movement, items, spawns
    World,
    /// Experience, levels, quests
    Progression,
    /// Conversations
    Dialogue,
    /// Saves, loads, rejected commands, game over
    Session,
}

impl Topic {
    const COUNT: usize = 5;

    const fn index(self) -> usize {
        self as usize
    }
}

impl From<EventCategory> for Topic {
    fn from(category: EventCategory) -> Self {
        match category {
            EventCategory::Combat => Topic::Combat,
            EventCategory::World => Topic::World,
            EventCategory::Progression => Topic::Progression,
            EventCategory::Dialogue => Topic::Dialogue,
        }
    }
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Turn(TurnEvent),
    Session(SessionEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Turn(turn) => turn.event.category().into(),
            Event::Session(_) => Topic::Session,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Channels are created up front, one per topic,
/// so publishing never takes a lock.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<[broadcast::Sender<Event>; Topic::COUNT]>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(std::array::from_fn(|_| broadcast::channel(capacity).0)),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels[topic.index()].send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels[topic.index()].subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    /// Subscribe to every topic.
    pub fn subscribe_all(&self) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        use strum::IntoEnumIterator;
        self.subscribe_multiple(&Topic::iter().collect::<Vec<_>>())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpg_core::{EntityId, GameEvent};

    fn turn(event: GameEvent) -> Event {
        Event::Turn(TurnEvent {
            tick: 0,
            nonce: 1,
            event,
        })
    }

    #[test]
    fn events_reach_only_their_topic() {
        let bus = EventBus::new();
        let mut combat = bus.subscribe(Topic::Combat);
        let mut world = bus.subscribe(Topic::World);

        let hit = turn(GameEvent::AttackHit {
            attacker: EntityId(0),
            defender: EntityId(1),
            damage: 7,
            critical: false,
        });
        bus.publish(hit.clone());

        assert_eq!(combat.try_recv().unwrap(), hit);
        assert!(world.try_recv().is_err());
    }

    #[test]
    fn session_events_have_their_own_topic() {
        let bus = EventBus::new();
        let mut session = bus.subscribe(Topic::Session);
        bus.publish(Event::Session(SessionEvent::Loaded {
            slot: "quick".into(),
        }));
        assert!(matches!(
            session.try_recv().unwrap(),
            Event::Session(SessionEvent::Loaded { .. })
        ));
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::with_capacity(1);
        bus.publish(turn(GameEvent::ConversationEnded));
        let all = bus.subscribe_all();
        assert_eq!(all.len(), Topic::COUNT);
    }
}
