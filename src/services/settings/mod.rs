// Settings service module
// Loads config.toml and resolves the platform paths the app writes to

mod service;

pub use service::{SettingsService, CONFIG_ENV_VAR};
