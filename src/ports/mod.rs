pub mod cache;
pub mod config_store;
pub mod task_repository;

pub use cache::*;
pub use config_store::*;
pub use task_repository::*;
