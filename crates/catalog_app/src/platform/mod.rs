mod app;
mod config;
mod effects;
mod ui;

pub use app::run_app;
pub use config::{ConfigOverrides, DEFAULT_CONFIG_FILE};
