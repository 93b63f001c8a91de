mod blocking;
mod http;
mod traits;
mod wire;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use blocking::BlockingGateway;
pub use http::{HttpGateway, DEFAULT_BASE_URL};
pub use traits::{ApiError, TodoService};
pub use wire::is_api_todo;
