use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use ticklist_core::{Todo, TodoId, TodoPayload};
use tracing::{debug, warn};

use crate::wire::{self, CreateBody, UpdateBody};
use crate::{ApiError, TodoService};

/// Base endpoint of the hosted todo service.
pub const DEFAULT_BASE_URL: &str = "https://todoapitest.juansegaliz.com/Todos";

/// Async HTTP client implementation of `TodoService`.
pub struct HttpGateway {
    base_url: String,
    client: Client,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        debug!(url = %format!("{}{path}", self.base_url), "GET");
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        handle_response(resp).await
    }

    async fn post_json<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        debug!(url = %format!("{}{path}", self.base_url), "POST");
        let resp = self
            .client
            .post(format!("{}{path}", self.base_url))
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        handle_response(resp).await
    }

    async fn put_json<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        debug!(url = %format!("{}{path}", self.base_url), "PUT");
        let resp = self
            .client
            .put(format!("{}{path}", self.base_url))
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        handle_response(resp).await
    }

    async fn delete_req(&self, path: &str) -> Result<Value, ApiError> {
        debug!(url = %format!("{}{path}", self.base_url), "DELETE");
        let resp = self
            .client
            .delete(format!("{}{path}", self.base_url))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        handle_response(resp).await
    }
}

/// Decode a response: 204 and empty bodies are empty successes, bodies that
/// are not JSON degrade to their raw text, success envelopes are unwrapped
/// to their `data`, and error statuses resolve to a display message.
async fn handle_response(resp: reqwest::Response) -> Result<Value, ApiError> {
    let status = resp.status();
    if status == StatusCode::NO_CONTENT {
        return Ok(Value::Null);
    }

    let text = resp
        .text()
        .await
        .map_err(|e| ApiError::Transport(format!("read body: {e}")))?;
    let payload = wire::parse_body(&text);

    if !status.is_success() {
        let msg = wire::resolve_error(&payload).unwrap_or_else(|| status_text(status));
        warn!(%status, %msg, "todo api error");
        return Err(ApiError::Server(msg));
    }

    Ok(wire::unwrap_data(payload))
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(String::from)
        .unwrap_or_else(|| format!("API error ({})", status.as_u16()))
}

#[async_trait]
impl TodoService for HttpGateway {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let payload = self.get_json("").await?;
        Ok(wire::decode_todos(payload))
    }

    async fn create(&self, payload: &TodoPayload) -> Result<Todo, ApiError> {
        let resp = self.post_json("", &CreateBody::from(payload)).await?;
        wire::decode_todo(resp).ok_or(ApiError::Unexpected("create returned no todo"))
    }

    async fn update(&self, id: &TodoId, payload: &TodoPayload) -> Result<Todo, ApiError> {
        let resp = self
            .put_json(&format!("/{id}"), &UpdateBody::from(payload))
            .await?;
        wire::decode_todo(resp).ok_or(ApiError::Unexpected("update returned no todo"))
    }

    async fn remove(&self, id: &TodoId) -> Result<(), ApiError> {
        self.delete_req(&format!("/{id}")).await?;
        Ok(())
    }
}
