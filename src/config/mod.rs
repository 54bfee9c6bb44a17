/// Database connection and table creation
pub mod database;

/// Application configuration loading from config.toml
pub mod app;

pub use app::{AppConfig, ServerConfig, load_app_configuration};
