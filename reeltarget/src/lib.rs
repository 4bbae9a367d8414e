//! Contract of the interactive resolution target.
//!
//! The resolver negotiates with a stateful, message-based backend: it sends
//! queries, receives messages carrying text, file markers and option buttons,
//! and clicks buttons to drive the conversation forward. This crate defines
//! the capability trait and the message model that the resolver consumes;
//! concrete adapters (the actual transport to the backend) live outside this
//! workspace and implement [`ResolutionTarget`].
//!
//! Messages are never held as live handles. The resolver keeps only a
//! [`MessageKey`] and re-fetches the message through the adapter when needed.

mod error;
mod models;
mod target;

pub use error::{Error, Result};
pub use models::{MessageKey, RawButton, RawMessage};
pub use target::{ResolutionTarget, SelectOutcome};
