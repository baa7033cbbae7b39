// Configuration loading

pub mod settings;

pub use settings::{Settings, API_BASE_ENV, DEFAULT_API_BASE};

/// Directory name under the platform config dir (e.g. ~/.config/datashelf).
pub const APP_DIR: &str = "datashelf";
