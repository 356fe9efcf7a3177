pub mod error;
pub mod memory_storage;
pub mod pg_storage;
pub mod storage;
pub mod todo_repo;
pub mod user_repo;

pub use memory_storage::InMemoryStorage;
pub use pg_storage::PgStorage;
pub use storage::{RepoResult, Storage};
