//! medassist-core: Shared chat types and utilities
//!
//! This crate provides the pieces of the hospital assistant that do not
//! touch the network: chat wire types, the in-memory conversation store,
//! specialty synonym normalization, and error types.

pub mod error;
pub mod memory;
pub mod message;
pub mod specialty;

pub use error::{ChatError, ErrorBody};
pub use memory::ConversationMemory;
pub use message::{ChatRequest, ChatResponse, Message, Role};
pub use specialty::normalize_specialty;
