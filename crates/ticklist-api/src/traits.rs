use async_trait::async_trait;
use thiserror::Error;
use ticklist_core::{Todo, TodoId, TodoPayload};

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server rejected the request; message resolved from its envelope.
    #[error("{0}")]
    Server(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Unexpected(&'static str),
}

/// Abstraction over the remote todo operations.
///
/// The TUI programs against this trait; `HttpGateway` is the
/// production implementation.
#[async_trait]
pub trait TodoService: Send + Sync {
    async fn list(&self) -> Result<Vec<Todo>, ApiError>;
    async fn create(&self, payload: &TodoPayload) -> Result<Todo, ApiError>;
    async fn update(&self, id: &TodoId, payload: &TodoPayload) -> Result<Todo, ApiError>;
    async fn remove(&self, id: &TodoId) -> Result<(), ApiError>;
}
