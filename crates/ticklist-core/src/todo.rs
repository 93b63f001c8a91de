use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a todo, as assigned by the remote service.
///
/// The service has been observed returning ids both as JSON numbers and as
/// strings, so equality goes through the canonical string form:
/// `TodoId::from(7) == TodoId::from("7")`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TodoId {
    Int(i64),
    Text(String),
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoId::Int(n) => write!(f, "{n}"),
            TodoId::Text(s) => f.write_str(s),
        }
    }
}

impl PartialEq for TodoId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TodoId::Int(a), TodoId::Int(b)) => a == b,
            (TodoId::Text(a), TodoId::Text(b)) => a == b,
            (TodoId::Int(n), TodoId::Text(s)) | (TodoId::Text(s), TodoId::Int(n)) => {
                n.to_string() == *s
            }
        }
    }
}

impl Eq for TodoId {}

impl From<i64> for TodoId {
    fn from(n: i64) -> Self {
        TodoId::Int(n)
    }
}

impl From<&str> for TodoId {
    fn from(s: &str) -> Self {
        TodoId::Text(s.to_string())
    }
}

/// A todo as the client sees it. The server assigns `id` and the
/// timestamps; timestamp text is passed through verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Option<i64>,
    pub due_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// A partial mutation. `None` means "leave the field alone"; on the fields
/// that can be cleared server-side, `Some(None)` means "set it to null".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoPayload {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub priority: Option<Option<i64>>,
    pub due_at: Option<Option<String>>,
}

impl TodoPayload {
    /// Merge the provided fields onto `todo`, leaving absent ones untouched.
    /// This is the local half of an optimistic update.
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = Some(title.clone());
        }
        if let Some(description) = &self.description {
            todo.description = description.clone();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(due_at) = &self.due_at {
            todo.due_at = due_at.clone();
        }
    }
}
