pub mod todo;

pub use todo::{Todo, TodoId, TodoPayload};
