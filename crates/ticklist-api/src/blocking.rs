use ticklist_core::{Todo, TodoId, TodoPayload};
use tokio::runtime::Runtime;

use crate::{ApiError, HttpGateway, TodoService};

/// Blocking wrapper around the async `HttpGateway`.
///
/// Creates an internal tokio runtime and uses `block_on()` for each call.
/// Designed for sync callers like the TUI.
pub struct BlockingGateway {
    inner: HttpGateway,
    rt: Runtime,
}

impl BlockingGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: HttpGateway::new(base_url),
            rt: Runtime::new().expect("failed to create tokio runtime"),
        }
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    pub fn list(&self) -> Result<Vec<Todo>, ApiError> {
        self.rt.block_on(self.inner.list())
    }

    pub fn create(&self, payload: &TodoPayload) -> Result<Todo, ApiError> {
        self.rt.block_on(self.inner.create(payload))
    }

    pub fn update(&self, id: &TodoId, payload: &TodoPayload) -> Result<Todo, ApiError> {
        self.rt.block_on(self.inner.update(id, payload))
    }

    pub fn remove(&self, id: &TodoId) -> Result<(), ApiError> {
        self.rt.block_on(self.inner.remove(id))
    }
}
