//! Runtime orchestration for the deterministic game rules.
//!
//! This crate wires the engine, content oracles and save repositories into a
//! single [`Runtime`] that frontends drive one command at a time.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`log`] turns engine events into message log lines
//! - [`snapshot`] is the read-only view handed to renderers
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
pub mod error;
pub mod events;
pub mod log;
pub mod oracle;
pub mod repository;
pub mod runtime;
pub mod snapshot;

mod utils;

pub use error::{Result, RuntimeError};
pub use events::{Event, EventBus, SessionEvent, Topic, TurnEvent};
pub use log::{MessageLog, describe};
pub use oracle::{DialogueLibrary, OracleManager};
pub use repository::{
    FileSaveRepository, InMemorySaveRepository, RepositoryError, SaveFormat, SaveHandle,
    SaveRepository,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use snapshot::{DialogueView, EntityView, PlayerView, QuestView, RenderSnapshot};
