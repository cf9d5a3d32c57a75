pub mod error;
pub mod query_client;
pub mod task_service;

pub use error::*;
pub use query_client::*;
pub use task_service::*;
