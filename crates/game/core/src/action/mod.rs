//! Player commands and their failure taxonomy.
//!
//! Input surfaces translate raw text or key presses into an [`Intent`]; the
//! engine resolves it or rejects it with an [`ActionError`].
pub mod error;
pub mod intent;

pub use error::ActionError;
pub use intent::Intent;
