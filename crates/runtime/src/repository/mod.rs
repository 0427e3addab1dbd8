//! Save persistence.
//!
//! [`SaveRepository`] stores versioned [`rpg_core::SaveRecord`]s by slot.
//! [`FileSaveRepository`] writes them to disk with an integrity digest;
//! [`InMemorySaveRepository`] keeps them in memory for tests.
mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileSaveRepository;
pub use memory::InMemorySaveRepository;
pub use traits::{SaveFormat, SaveHandle, SaveRepository, validate_slot};
