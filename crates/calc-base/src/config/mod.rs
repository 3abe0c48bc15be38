//! Client configuration: environment settings and embedded YAML themes.
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Deserialize;

use crate::constants::{
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, EXPRESSION_POLLING_INTERVAL_MS, STORE_DIR,
};

// ============================================================================
// Environment Configuration
// ============================================================================

/// Runtime settings resolved from the environment (and `.env`, if present).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Scheme + host + port, without trailing slash
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub poll_interval_ms: u64,
    /// None = poll until a terminal status arrives
    pub poll_max_attempts: Option<u32>,
    /// Multiplier applied to the poll delay after each non-terminal status
    pub poll_backoff: f64,
    pub store_dir: PathBuf,
    /// EnvFilter directive for the log subscriber
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: format!("http://{}:{}", DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            poll_interval_ms: EXPRESSION_POLLING_INTERVAL_MS,
            poll_max_attempts: None,
            poll_backoff: 1.0,
            store_dir: PathBuf::from(STORE_DIR),
            log_filter: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load `.env` (if any) and read `CALC_*` variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let base_url = match get("CALC_BASE_URL") {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => {
                let host = get("CALC_SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string());
                let port = get("CALC_SERVER_PORT")
                    .and_then(|p| p.parse::<u16>().ok())
                    .unwrap_or(DEFAULT_SERVER_PORT);
                format!("http://{}:{}", host, port)
            }
        };

        Self {
            base_url,
            request_timeout_secs: get("CALC_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            poll_interval_ms: get("CALC_POLL_INTERVAL_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.poll_interval_ms),
            poll_max_attempts: get("CALC_POLL_MAX_ATTEMPTS").and_then(|v| v.parse().ok()).filter(|n: &u32| *n > 0),
            poll_backoff: get("CALC_POLL_BACKOFF")
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|f| f.is_finite() && *f >= 1.0)
                .unwrap_or(defaults.poll_backoff),
            store_dir: get("CALC_STORE_DIR").map(PathBuf::from).unwrap_or(defaults.store_dir),
            log_filter: get("CALC_LOG").unwrap_or(defaults.log_filter),
        }
    }
}

// ============================================================================
// Theme Configuration
// ============================================================================

/// RGB color as [r, g, b] array
pub type RgbColor = [u8; 3];

#[derive(Debug, Deserialize, Clone)]
pub struct ThemesConfig {
    pub themes: HashMap<String, Theme>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Theme {
    pub name: String,
    pub description: String,
    pub colors: ThemeColors,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThemeColors {
    pub accent: RgbColor,
    pub success: RgbColor,
    pub warning: RgbColor,
    pub error: RgbColor,
    pub text: RgbColor,
    pub text_muted: RgbColor,
    pub bg_base: RgbColor,
    pub bg_surface: RgbColor,
    pub border: RgbColor,
}

/// Default theme ID
pub const DEFAULT_THEME: &str = "dark";

/// Available theme IDs in toggle order
pub const THEME_ORDER: &[&str] = &["dark", "light"];

fn parse_yaml<T: for<'de> Deserialize<'de>>(name: &str, content: &str) -> T {
    serde_yaml::from_str(content).unwrap_or_else(|e| panic!("Failed to parse {}: {}", name, e))
}

pub static THEMES: LazyLock<ThemesConfig> =
    LazyLock::new(|| parse_yaml("themes.yaml", include_str!("../../../../yamls/themes.yaml")));

/// Get a theme by ID, falling back to default if not found
pub fn get_theme(theme_id: &str) -> &'static Theme {
    THEMES.themes.get(theme_id).or_else(|| THEMES.themes.get(DEFAULT_THEME)).expect("Default theme must exist")
}

/// The theme that follows `theme_id` in `THEME_ORDER` (wraps around).
pub fn next_theme(theme_id: &str) -> &'static str {
    let idx = THEME_ORDER.iter().position(|t| *t == theme_id).unwrap_or(0);
    THEME_ORDER[(idx + 1) % THEME_ORDER.len()]
}

/// Index into THEME_ORDER of the active theme
static ACTIVE_THEME: AtomicUsize = AtomicUsize::new(0);

/// Set the active theme ID (call when settings are loaded or the theme changes)
pub fn set_active_theme(theme_id: &str) {
    let idx = THEME_ORDER.iter().position(|t| *t == theme_id).unwrap_or(0);
    ACTIVE_THEME.store(idx, Ordering::Release);
}

pub fn active_theme_id() -> &'static str {
    THEME_ORDER.get(ACTIVE_THEME.load(Ordering::Acquire)).copied().unwrap_or(DEFAULT_THEME)
}

pub fn active_theme() -> &'static Theme {
    get_theme(active_theme_id())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_env_empty() {
        let cfg = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert_eq!(cfg.poll_interval_ms, 200);
        assert_eq!(cfg.poll_max_attempts, None);
    }

    #[test]
    fn host_and_port_build_base_url() {
        let cfg = ClientConfig::from_lookup(lookup(&[("CALC_SERVER_HOST", "calc.local"), ("CALC_SERVER_PORT", "9000")]));
        assert_eq!(cfg.base_url, "http://calc.local:9000");
    }

    #[test]
    fn explicit_base_url_wins_and_is_trimmed() {
        let cfg = ClientConfig::from_lookup(lookup(&[
            ("CALC_BASE_URL", "https://api.example.com/"),
            ("CALC_SERVER_HOST", "ignored"),
        ]));
        assert_eq!(cfg.base_url, "https://api.example.com");
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let cfg = ClientConfig::from_lookup(lookup(&[
            ("CALC_SERVER_PORT", "not-a-port"),
            ("CALC_POLL_INTERVAL_MS", "-5"),
            ("CALC_POLL_MAX_ATTEMPTS", "0"),
            ("CALC_POLL_BACKOFF", "0.5"),
        ]));
        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert_eq!(cfg.poll_interval_ms, 200);
        assert_eq!(cfg.poll_max_attempts, None);
        assert_eq!(cfg.poll_backoff, 1.0);
    }

    #[test]
    fn poll_settings_parsed() {
        let cfg = ClientConfig::from_lookup(lookup(&[
            ("CALC_POLL_INTERVAL_MS", "50"),
            ("CALC_POLL_MAX_ATTEMPTS", "12"),
            ("CALC_POLL_BACKOFF", "1.5"),
        ]));
        assert_eq!(cfg.poll_interval_ms, 50);
        assert_eq!(cfg.poll_max_attempts, Some(12));
        assert_eq!(cfg.poll_backoff, 1.5);
    }

    #[test]
    fn embedded_themes_cover_toggle_order() {
        for id in THEME_ORDER {
            assert!(THEMES.themes.contains_key(*id), "missing theme {}", id);
        }
    }

    #[test]
    fn next_theme_wraps() {
        assert_eq!(next_theme("dark"), "light");
        assert_eq!(next_theme("light"), "dark");
        assert_eq!(next_theme("unknown"), "light");
    }
}
