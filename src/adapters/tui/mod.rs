pub mod app;
pub mod event;
pub mod route;
pub mod theme;
pub mod views;
pub mod widgets;

pub use app::{run_tui, App};
