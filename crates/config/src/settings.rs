// Application settings
// Loaded from ~/.config/datashelf/settings.json

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::APP_DIR;

/// Catalog API used when neither the settings file nor the environment say otherwise.
pub const DEFAULT_API_BASE: &str = "https://datasets-z6ly.onrender.com/";

/// Environment variable overriding `api.baseUrl`.
pub const API_BASE_ENV: &str = "DATASHELF_API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // API
    #[serde(rename = "api.baseUrl")]
    pub api_base: String,

    #[serde(rename = "api.timeoutSecs")]
    pub timeout_secs: u64,

    // Upload form defaults
    #[serde(rename = "upload.defaultLicense")]
    pub default_license: String,

    #[serde(rename = "upload.defaultVisibility")]
    pub default_visibility: String,

    // Preview
    #[serde(rename = "preview.edgeRows")]
    pub preview_edge_rows: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: 60,
            default_license: "cc-by".to_string(),
            default_visibility: "public".to_string(),
            preview_edge_rows: 20,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("settings.json")
    }

    /// Load settings from the default path, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`. A missing file means defaults; an unreadable
    /// or malformed one is reported and also means defaults. Lines starting
    /// with `//` are treated as comments.
    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!("Error reading {}: {}", path.display(), e);
                return Self::default();
            }
        };

        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        match serde_json::from_str(&cleaned) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Error parsing {}: {}; using default settings", path.display(), e);
                Self::default()
            }
        }
    }

    /// API base URL after applying the environment override, without a
    /// trailing slash.
    pub fn effective_api_base(&self) -> String {
        let base = std::env::var(API_BASE_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.api_base.clone());
        base.trim().trim_end_matches('/').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.json"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.default_license, "cc-by");
        assert_eq!(settings.default_visibility, "public");
    }

    #[test]
    fn test_partial_file_with_comments() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{
    // point at a local server
    "api.baseUrl": "http://localhost:8000/",
    "preview.edgeRows": 5
}"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.api_base, "http://localhost:8000/");
        assert_eq!(settings.preview_edge_rows, 5);
        assert_eq!(settings.timeout_secs, 60);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_config_path_is_namespaced() {
        let path = Settings::config_path();
        assert!(path.to_string_lossy().contains("datashelf"));
        assert!(path.ends_with("settings.json"));
    }
}
