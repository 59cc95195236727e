// Settings service module
// Loads and saves `AppSettings` as TOML in the platform config directory

mod service;

pub use service::{resolve_database_path, SettingsService};
