//! Port trait definitions (Hexagonal Architecture)
//!
//! The completion port is the only boundary the domain owns: infrastructure
//! adapters implement [`CompletionClient`] against a concrete transport, and
//! the service layer depends on the trait alone.

pub mod completion;

pub use completion::{CompletionClient, CompletionError, CompletionRequest, Message};
