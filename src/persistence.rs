//! UI settings persistence (config.json in the store directory)
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use calc_base::config::DEFAULT_THEME;
use calc_base::constants::CONFIG_FILE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_theme")]
    pub active_theme: String,
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self { active_theme: default_theme() }
    }
}

fn config_path(store_dir: &Path) -> PathBuf {
    store_dir.join(CONFIG_FILE)
}

/// Load settings, or defaults when the file is missing or unreadable
pub fn load_settings(store_dir: &Path) -> Settings {
    fs::read_to_string(config_path(store_dir))
        .ok()
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

pub fn save_settings(store_dir: &Path, settings: &Settings) {
    fs::create_dir_all(store_dir).ok();
    match serde_json::to_string_pretty(settings) {
        Ok(json) => {
            if let Err(e) = fs::write(config_path(store_dir), json) {
                tracing::warn!(error = %e, "failed to write settings");
            }
        }
        Err(e) => tracing::warn!(error = %e, "failed to encode settings"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(load_settings(tmp.path()), Settings::default());
        assert_eq!(load_settings(tmp.path()).active_theme, "dark");
    }

    #[test]
    fn theme_choice_survives_restart() {
        let tmp = TempDir::new().unwrap();
        let store = tmp.path().join("nested");
        save_settings(&store, &Settings { active_theme: "light".into() });
        assert_eq!(load_settings(&store).active_theme, "light");
    }

    #[test]
    fn corrupt_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "{not json").unwrap();
        assert_eq!(load_settings(tmp.path()), Settings::default());
    }
}
