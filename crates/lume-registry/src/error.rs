//! Error types for the registry

use thiserror::Error;

/// Errors surfaced to handle callers
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry actor is no longer running
    #[error("registry is no longer running")]
    ChannelClosed,
}
