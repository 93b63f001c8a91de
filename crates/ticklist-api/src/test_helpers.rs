//! In-process stand-in for the remote todo service.
//!
//! Speaks the service's wire dialect: camelCase fields with `isCompleted`,
//! `{code, data, messages}` envelopes, server-assigned ids and timestamps,
//! 204 on delete. A failure switch makes every route answer 500 so that
//! rollback paths can be exercised.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Shared switch that makes every stub route answer 500.
#[derive(Clone, Default)]
pub struct FailureSwitch(Arc<AtomicBool>);

impl FailureSwitch {
    pub fn set(&self, failing: bool) {
        self.0.store(failing, Ordering::SeqCst);
    }

    fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct StubState {
    todos: Arc<Mutex<Vec<Value>>>,
    next_id: Arc<AtomicI64>,
    failure: FailureSwitch,
}

impl StubState {
    fn check(&self) -> Result<(), (StatusCode, Json<Value>)> {
        if self.failure.get() {
            Err(error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "service unavailable",
            ))
        } else {
            Ok(())
        }
    }
}

fn envelope(code: u16, data: Value) -> Value {
    json!({"code": code, "data": data, "messages": []})
}

fn error_body(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({"code": status.as_u16(), "messages": [message]})),
    )
}

fn id_matches(record: &Value, id: &str) -> bool {
    match record.get("id") {
        Some(Value::Number(n)) => n.to_string() == id,
        Some(Value::String(s)) => s == id,
        _ => false,
    }
}

fn stub_router(state: StubState) -> Router {
    Router::new()
        .route("/", get(list_todos).post(create_todo))
        .route("/{id}", put(update_todo).delete(delete_todo))
        .with_state(state)
}

async fn list_todos(
    State(state): State<StubState>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    state.check()?;
    let todos = state.todos.lock().unwrap().clone();
    Ok((StatusCode::OK, Json(envelope(200, Value::Array(todos)))))
}

async fn create_todo(
    State(state): State<StubState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    state.check()?;
    let mut record = body.as_object().cloned().unwrap_or_default();
    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    let now = Utc::now().to_rfc3339();
    record.insert("id".into(), json!(id));
    record
        .entry("isCompleted".to_string())
        .or_insert(json!(false));
    record.insert("createdAt".into(), json!(now));
    record.insert("updatedAt".into(), json!(now));

    let record = Value::Object(record);
    state.todos.lock().unwrap().push(record.clone());
    Ok((StatusCode::CREATED, Json(envelope(201, record))))
}

async fn update_todo(
    State(state): State<StubState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    state.check()?;
    let mut todos = state.todos.lock().unwrap();
    let Some(record) = todos.iter_mut().find(|t| id_matches(t, &id)) else {
        return Err(error_body(StatusCode::NOT_FOUND, "todo not found"));
    };

    // Patch semantics: only the keys present in the body are applied.
    if let (Some(target), Some(patch)) = (record.as_object_mut(), body.as_object()) {
        for (key, value) in patch {
            target.insert(key.clone(), value.clone());
        }
        target.insert("updatedAt".into(), json!(Utc::now().to_rfc3339()));
    }

    Ok((StatusCode::OK, Json(envelope(200, record.clone()))))
}

async fn delete_todo(
    State(state): State<StubState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    state.check()?;
    let mut todos = state.todos.lock().unwrap();
    let before = todos.len();
    todos.retain(|t| !id_matches(t, &id));
    if todos.len() == before {
        return Err(error_body(StatusCode::NOT_FOUND, "todo not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// A running stub with its base URL and failure switch.
pub struct StubApi {
    pub base_url: String,
    pub failure: FailureSwitch,
    _handle: tokio::task::JoinHandle<()>,
}

impl StubApi {
    pub fn set_failing(&self, failing: bool) {
        self.failure.set(failing);
    }
}

/// Spawn the stub on a random port. Returns the handle with the
/// `base_url` (e.g. "http://127.0.0.1:12345").
pub async fn spawn_stub_api() -> StubApi {
    let state = StubState {
        todos: Arc::new(Mutex::new(Vec::new())),
        next_id: Arc::new(AtomicI64::new(1)),
        failure: FailureSwitch::default(),
    };
    let failure = state.failure.clone();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let app = stub_router(state);
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubApi {
        base_url,
        failure,
        _handle: handle,
    }
}
