mod app;
mod config;
mod effects;
mod input;
mod ui;

pub use app::run_app;
pub use config::{Cli, Settings};
