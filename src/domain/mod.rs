pub mod color;
pub mod error;
pub mod task;

pub use color::*;
pub use error::*;
pub use task::*;
