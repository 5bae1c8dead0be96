//! Credential storage for the completion service.
//!
//! The API key lives in the OS keychain (via `keyring`); the
//! `SUMMITCAST_API_KEY` environment variable overrides it.

pub mod credentials;

pub use credentials::CredentialStore;
