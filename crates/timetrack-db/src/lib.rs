pub mod database;
pub mod error;
pub mod models;
pub mod task_repository;
pub mod user_repository;

// Re-exports
pub use database::{Database, DatabaseOptions};
pub use error::{Error, Result};
pub use models::{TaskRecord, UserRecord};
pub use task_repository::TaskRepository;
pub use user_repository::UserRepository;
