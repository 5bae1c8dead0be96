//! Completion service integration.
//!
//! Weather data, activity ratings and location suggestions all come from an
//! external language-model service that is asked for JSON matching a schema.
//! `CompletionService` is the port the rest of the crate depends on;
//! `HttpCompletionClient` is the production adapter.

pub mod client;
pub mod error;
pub mod request;

pub use client::{CompletionService, HttpCompletionClient, UnconfiguredService};
pub use error::CompletionError;
pub use request::CompletionRequest;
