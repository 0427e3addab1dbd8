//! High-level runtime orchestrator.
//!
//! The runtime owns the authoritative state and resolves one player command
//! per call to [`Runtime::submit`]. Every fact the engine reports is turned
//! into a message log line and published on the event bus. Saves go through
//! an injected [`SaveRepository`].

use std::path::PathBuf;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use rpg_content::ContentCatalog;
use rpg_core::{
    ArchetypeRegistry, GameEngine, GameOutcome, GameState, Intent, SaveRecord, TurnOutcome,
};

use crate::error::{Result, RuntimeError};
use crate::events::{Event, EventBus, SessionEvent, Topic, TurnEvent};
use crate::log::{MessageLog, describe};
use crate::oracle::OracleManager;
use crate::repository::{
    FileSaveRepository, InMemorySaveRepository, SaveFormat, SaveHandle, SaveRepository,
};
use crate::snapshot::RenderSnapshot;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Lines kept in the message log.
    pub log_capacity: usize,
    pub event_buffer_size: usize,
    /// Format used when the builder creates a file repository.
    pub save_format: SaveFormat,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_capacity: MessageLog::DEFAULT_CAPACITY,
            event_buffer_size: 100,
            save_format: SaveFormat::Binary,
        }
    }
}

/// Main runtime that drives the game.
pub struct Runtime {
    state: GameState,
    oracles: OracleManager,
    registry: ArchetypeRegistry,
    repository: Box<dyn SaveRepository>,
    bus: EventBus,
    log: MessageLog,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Resolves one player command.
    ///
    /// A rejected command leaves the state untouched; its reason is logged
    /// for the player and published as [`SessionEvent::CommandRejected`].
    pub fn submit(&mut self, intent: &Intent) -> Result<TurnOutcome> {
        let tick = self.state.turn.tick.0;
        let nonce = self.state.turn.nonce;
        let was_over = self.state.is_over();

        let result = GameEngine::new(&mut self.state).execute(self.oracles.as_game_env(), intent);
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(intent = intent.label(), error = %err, "Command rejected");
                self.log.push(capitalize(&err.to_string()));
                self.bus.publish(Event::Session(SessionEvent::CommandRejected {
                    intent: intent.label().to_string(),
                    error: err.to_string(),
                }));
                return Err(err.into());
            }
        };

        debug!(
            intent = intent.label(),
            events = outcome.events.len(),
            tick = outcome.tick.0,
            "Command resolved"
        );
        for event in &outcome.events {
            if let Some(line) = describe(event, &self.state) {
                self.log.push(line);
            }
            self.bus.publish(Event::Turn(TurnEvent {
                tick,
                nonce,
                event: event.clone(),
            }));
        }

        if !was_over && self.state.is_over() {
            self.announce_outcome();
        }
        Ok(outcome)
    }

    fn announce_outcome(&mut self) {
        let outcome = self.state.outcome;
        info!(%outcome, tick = self.state.turn.tick.0, "Game over");
        match outcome {
            GameOutcome::Victory => self.log.push("Victory! Every foe has fallen."),
            GameOutcome::Defeat => self.log.push("You have been defeated."),
            GameOutcome::InProgress => {}
        }
        self.bus
            .publish(Event::Session(SessionEvent::GameOver { outcome }));
    }

    /// Read-only view for renderers.
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(&self.state, self.log.lines())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn outcome(&self) -> GameOutcome {
        self.state.outcome
    }

    pub fn oracles(&self) -> &OracleManager {
        &self.oracles
    }

    /// Captures the current state into `slot`.
    pub fn save(&mut self, slot: &str) -> Result<SaveHandle> {
        let record = SaveRecord::capture(&self.state);
        let handle = self.repository.save(slot, &record)?;

        info!(slot, digest = handle.short_digest(), "Game saved");
        self.log.push(format!("Saved to '{}'.", slot));
        self.bus.publish(Event::Session(SessionEvent::Saved {
            slot: slot.to_string(),
            digest: handle.digest.clone(),
        }));
        Ok(handle)
    }

    /// Replaces the current state with the one saved in `slot`.
    ///
    /// The current state is kept when the slot is missing or fails to
    /// restore.
    pub fn load(&mut self, slot: &str) -> Result<()> {
        let record = self
            .repository
            .load(slot)?
            .ok_or_else(|| RuntimeError::SlotNotFound(slot.to_string()))?;
        let state = record.restore(&self.registry)?;

        self.state = state;
        info!(slot, tick = self.state.turn.tick.0, "Game loaded");
        self.log.clear();
        self.log.push(format!("Loaded '{}'.", slot));
        self.bus.publish(Event::Session(SessionEvent::Loaded {
            slot: slot.to_string(),
        }));
        Ok(())
    }

    pub fn list_saves(&self) -> Result<Vec<SaveHandle>> {
        Ok(self.repository.list_slots()?)
    }

    pub fn delete_save(&self, slot: &str) -> Result<()> {
        Ok(self.repository.delete(slot)?)
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Adds a line from outside the rules, e.g. help text from the frontend.
    pub fn push_message(&mut self, line: impl Into<String>) {
        self.log.push(line);
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<GameState>,
    oracles: Option<OracleManager>,
    registry: Option<ArchetypeRegistry>,
    repository: Option<Box<dyn SaveRepository>>,
    save_dir: Option<PathBuf>,
    intro: Vec<String>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            oracles: None,
            registry: None,
            repository: None,
            save_dir: None,
            intro: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide initial game state
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Set oracle manager; defaults to [`OracleManager::default`].
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Registry used to restore saves; defaults to an empty one.
    pub fn registry(mut self, registry: ArchetypeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Takes oracles and the archetype registry from loaded content.
    pub fn content(mut self, catalog: &ContentCatalog) -> Result<Self> {
        let registry = catalog
            .registry()
            .map_err(|e| RuntimeError::Content(format!("{:#}", e)))?;
        self.registry = Some(registry);
        self.oracles = Some(OracleManager::from_catalog(catalog));
        Ok(self)
    }

    pub fn repository(mut self, repository: impl SaveRepository + 'static) -> Self {
        self.repository = Some(Box::new(repository));
        self
    }

    /// Store saves as files under `dir` in the configured format.
    pub fn save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = Some(dir.into());
        self
    }

    /// Lines shown in the message log before the first command.
    pub fn intro(mut self, lines: impl IntoIterator<Item = String>) -> Self {
        self.intro.extend(lines);
        self
    }

    /// Build the runtime
    pub fn build(self) -> Result<Runtime> {
        let state = self.state.ok_or(RuntimeError::MissingState)?;

        let repository: Box<dyn SaveRepository> = match (self.repository, self.save_dir) {
            (Some(repository), _) => repository,
            (None, Some(dir)) => Box::new(FileSaveRepository::new(dir, self.config.save_format)?),
            (None, None) => Box::new(InMemorySaveRepository::new()),
        };

        let mut log = MessageLog::new(self.config.log_capacity);
        log.extend(self.intro);

        info!(
            scene = %state.scene.name,
            entities = state.scene.len(),
            seed = state.game_seed,
            "Runtime ready"
        );

        Ok(Runtime {
            state,
            oracles: self.oracles.unwrap_or_default(),
            registry: self.registry.unwrap_or_default(),
            repository,
            bus: EventBus::with_capacity(self.config.event_buffer_size),
            log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpg_core::{Direction, Entity, FixedRng, Position, Role, Scene};

    fn arena() -> GameState {
        let mut scene = Scene::new("Arena", 10, 10);
        let player = scene.spawn(
            Entity::builder("Aeron", Role::Player)
                .class("aeron")
                .at(Position::from_tile(1, 1))
                .character(Default::default())
                .build(),
        );
        scene.spawn(
            Entity::builder("Dummy", Role::Enemy)
                .class("dummy")
                .at(Position::from_tile(8, 8))
                .health(10)
                .build(),
        );
        GameState::new(scene, player, 7)
    }

    fn runtime() -> Runtime {
        Runtime::builder()
            .initial_state(arena())
            .oracles(OracleManager::default().with_rng(FixedRng::percent(99.0)))
            .intro(["Welcome.".to_string()])
            .build()
            .unwrap()
    }

    #[test]
    fn build_requires_state() {
        assert!(matches!(
            Runtime::builder().build(),
            Err(RuntimeError::MissingState)
        ));
    }

    #[test]
    fn rejected_command_is_logged_and_published() {
        let mut runtime = runtime();
        let mut session = runtime.subscribe(Topic::Session);

        let err = runtime
            .submit(&Intent::Attack {
                target: "Nobody".into(),
            })
            .unwrap_err();
        assert!(err.is_rejected_command());
        assert_eq!(runtime.state().turn.tick.0, 0);
        assert!(
            runtime
                .log()
                .lines()
                .last()
                .unwrap()
                .contains("no 'Nobody' here")
        );
        assert!(matches!(
            session.try_recv().unwrap(),
            Event::Session(SessionEvent::CommandRejected { .. })
        ));
    }

    #[test]
    fn accepted_command_advances_and_publishes() {
        let mut runtime = runtime();
        let mut world = runtime.subscribe(Topic::World);

        let outcome = runtime.submit(&Intent::Move(Direction::East)).unwrap();
        assert!(outcome.consumed_turn);
        assert_eq!(runtime.state().turn.tick.0, 1);
        assert_eq!(
            runtime.state().player().unwrap().position.tile(),
            (2, 1)
        );
        match world.try_recv().unwrap() {
            Event::Turn(turn) => assert_eq!(turn.tick, 0),
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(runtime.snapshot().log[0], "Welcome.");
    }

    #[test]
    fn missing_slot_keeps_state() {
        let mut runtime = runtime();
        runtime.submit(&Intent::Wait).unwrap();
        let before = runtime.state().clone();

        assert!(matches!(
            runtime.load("nothing"),
            Err(RuntimeError::SlotNotFound(_))
        ));
        assert_eq!(runtime.state(), &before);
    }
}
