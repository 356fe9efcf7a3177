pub mod auth;
pub mod handlers;
pub mod policy;

pub use handlers::{Handlers, TodoService};
