//! Remote Store
//!
//! The hosted table/auth service the admin client talks to.

pub mod client;

#[cfg(test)]
pub mod testing;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::{Credential, Session};
use crate::catalog::{Game, GameId, GamePatch};

/// Remote store errors
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The service answered and rejected the call
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Request cancelled")]
    Cancelled,
}

impl RemoteError {
    /// True when the service itself reported the failure.
    pub fn is_service_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Table and authentication operations consumed by the UI components.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list_games(&self) -> RemoteResult<Vec<Game>>;

    async fn delete_game(&self, id: &GameId) -> RemoteResult<()>;

    /// Updates name and image reference, returning the updated row(s).
    async fn update_game(&self, id: &GameId, patch: &GamePatch) -> RemoteResult<Vec<Game>>;

    async fn sign_in_with_password(&self, credential: Credential) -> RemoteResult<Session>;
}

// Re-exports
pub use client::HttpStore;
