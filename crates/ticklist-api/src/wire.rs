//! Wire-format types for the remote todo service.
//!
//! The service speaks camelCase JSON (`isCompleted` where the domain says
//! `completed`), wraps successful payloads in a `{code, data, messages}`
//! envelope, and reports errors through the same envelope's message list.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ticklist_core::{Todo, TodoId, TodoPayload};

/// A todo as the service returns it. Everything but `id` is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiTodo {
    pub id: TodoId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub due_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl From<ApiTodo> for Todo {
    fn from(entry: ApiTodo) -> Self {
        Todo {
            id: entry.id,
            title: entry.title,
            description: entry.description,
            completed: entry.is_completed.unwrap_or(false),
            priority: entry.priority,
            due_at: entry.due_at,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// Create bodies carry every field; the absent ones get their defaults.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_completed: bool,
    pub priority: i64,
    pub due_at: Option<String>,
}

impl From<&TodoPayload> for CreateBody {
    fn from(payload: &TodoPayload) -> Self {
        CreateBody {
            title: payload.title.clone(),
            description: payload.description.clone().flatten(),
            is_completed: payload.completed.unwrap_or(false),
            priority: payload.priority.flatten().unwrap_or(1),
            due_at: payload.due_at.clone().flatten(),
        }
    }
}

/// Update bodies are sparse patches: absent fields are omitted entirely,
/// `Some(None)` becomes an explicit null.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<Option<String>>,
}

impl From<&TodoPayload> for UpdateBody {
    fn from(payload: &TodoPayload) -> Self {
        UpdateBody {
            title: payload.title.clone().map(Some),
            description: payload.description.clone(),
            is_completed: payload.completed,
            priority: payload.priority,
            due_at: payload.due_at.clone(),
        }
    }
}

/// An entry counts as a todo only if it is an object carrying a defined
/// (present, non-null) `id`.
pub fn is_api_todo(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|obj| obj.get("id"))
        .is_some_and(|id| !id.is_null())
}

/// Parse a response body as JSON, degrading to the raw text when it is not.
pub(crate) fn parse_body(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Unwrap `{.., "data": payload}` envelopes; anything else IS the payload.
pub(crate) fn unwrap_data(payload: Value) -> Value {
    match payload {
        Value::Object(mut obj) if obj.contains_key("data") => {
            obj.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Pull a human-readable message out of an error envelope, if there is one.
pub(crate) fn resolve_error(payload: &Value) -> Option<String> {
    let obj = payload.as_object()?;
    if let Some(messages) = obj.get("messages").and_then(Value::as_array) {
        let parts: Vec<&str> = messages.iter().filter_map(Value::as_str).collect();
        if !parts.is_empty() {
            return Some(parts.join(". "));
        }
    }
    obj.get("message").and_then(Value::as_str).map(String::from)
}

/// Decode a list payload: anything that is not an array lists as empty,
/// and entries that do not look like todos are dropped.
pub(crate) fn decode_todos(payload: Value) -> Vec<Todo> {
    let Value::Array(entries) = payload else {
        return Vec::new();
    };
    entries
        .into_iter()
        .filter(is_api_todo)
        .filter_map(|entry| serde_json::from_value::<ApiTodo>(entry).ok())
        .map(Todo::from)
        .collect()
}

pub(crate) fn decode_todo(payload: Value) -> Option<Todo> {
    if !is_api_todo(&payload) {
        return None;
    }
    serde_json::from_value::<ApiTodo>(payload)
        .ok()
        .map(Todo::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn is_api_todo_requires_a_defined_id() {
        assert!(is_api_todo(&json!({"id": 1})));
        assert!(is_api_todo(&json!({"id": "1"})));
        assert!(!is_api_todo(&json!({})));
        assert!(!is_api_todo(&json!({"title": "no id"})));
        assert!(!is_api_todo(&json!({"id": null})));
        assert!(!is_api_todo(&json!("just text")));
        assert!(!is_api_todo(&json!([1, 2, 3])));
    }

    #[test]
    fn decode_todos_drops_entries_without_ids() {
        let payload = json!([
            {"id": 1, "title": "keep", "isCompleted": true},
            {"title": "drop"},
            null,
            {"id": 2},
        ]);
        let todos = decode_todos(payload);
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].title.as_deref(), Some("keep"));
        assert!(todos[0].completed);
        assert_eq!(todos[1].title, None);
        assert!(!todos[1].completed);
    }

    #[test]
    fn decode_todos_of_non_array_is_empty() {
        assert!(decode_todos(json!({"id": 1})).is_empty());
        assert!(decode_todos(Value::Null).is_empty());
        assert!(decode_todos(json!("nope")).is_empty());
    }

    #[test]
    fn unwrap_data_unwraps_envelopes_only() {
        let enveloped = json!({"code": 200, "data": {"id": 5}, "messages": []});
        assert_eq!(unwrap_data(enveloped), json!({"id": 5}));

        let bare = json!({"id": 5});
        assert_eq!(unwrap_data(bare.clone()), bare);

        let list = json!([1, 2]);
        assert_eq!(unwrap_data(list.clone()), list);
    }

    #[test]
    fn parse_body_degrades_to_raw_text() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("{\"id\": 1}"), json!({"id": 1}));
        assert_eq!(parse_body("<html>oops</html>"), json!("<html>oops</html>"));
    }

    #[test]
    fn resolve_error_joins_messages() {
        let payload = json!({"messages": ["title required", "priority out of range"]});
        assert_eq!(
            resolve_error(&payload).as_deref(),
            Some("title required. priority out of range")
        );
    }

    #[test]
    fn resolve_error_falls_back_to_message_string() {
        assert_eq!(
            resolve_error(&json!({"messages": [], "message": "boom"})).as_deref(),
            Some("boom")
        );
        assert_eq!(resolve_error(&json!({"message": "boom"})).as_deref(), Some("boom"));
        assert_eq!(resolve_error(&json!({"code": 500})), None);
        assert_eq!(resolve_error(&json!("raw body")), None);
    }

    #[test]
    fn update_body_serializes_only_provided_fields() {
        let payload = TodoPayload {
            title: Some("New title".into()),
            ..Default::default()
        };
        let body = serde_json::to_value(UpdateBody::from(&payload)).unwrap();
        assert_eq!(body, json!({"title": "New title"}));
    }

    #[test]
    fn update_body_sends_explicit_nulls_for_clears() {
        let payload = TodoPayload {
            description: Some(None),
            completed: Some(true),
            ..Default::default()
        };
        let body = serde_json::to_value(UpdateBody::from(&payload)).unwrap();
        assert_eq!(body, json!({"description": null, "isCompleted": true}));
    }

    #[test]
    fn create_body_fills_defaults() {
        let payload = TodoPayload {
            title: Some("Water the plants".into()),
            ..Default::default()
        };
        let body = serde_json::to_value(CreateBody::from(&payload)).unwrap();
        assert_eq!(
            body,
            json!({
                "title": "Water the plants",
                "description": null,
                "isCompleted": false,
                "priority": 1,
                "dueAt": null,
            })
        );
    }
}
