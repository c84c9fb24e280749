//! Oracle configuration loaded once at startup from `.env` and the process environment.
//!
//! | Env | Default | Description |
//! |-----|---------|-------------|
//! | ORACLE_ENV_FILE | ./.env | Path of the dotenv file read at startup. |
//! | USE_GEMINI | off | "1" or "true" turns the Gemini integration on. |
//! | GEMINI_API_KEY | empty | API key; surrounding whitespace and quotes are stripped. |
//! | GEMINI_MODEL | gemini-1.5-flash | Model identifier. |
//! | GEMINI_API_BASE | https://generativelanguage.googleapis.com/v1beta | REST base URL. |
//! | GEMINI_TIMEOUT_SECS | 30 | Upper bound for one generation round trip. |
//! | PORT | 5001 | Listener port for the gateway. |

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PORT: u16 = 5001;

#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub use_gemini: bool,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub gemini_timeout: Duration,
    pub port: u16,
    /// Dotenv path consulted at startup (reported by the debug route whether or not it existed).
    pub env_loaded_from: PathBuf,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            use_gemini: false,
            gemini_api_key: String::new(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            gemini_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            port: DEFAULT_PORT,
            env_loaded_from: PathBuf::from(".env"),
        }
    }
}

impl OracleConfig {
    /// Loads the dotenv file (missing file is not an error) and then reads the environment.
    pub fn load() -> Self {
        let env_path = std::env::var("ORACLE_ENV_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_env_path());
        load_env_file(&env_path);
        let mut config = Self::from_env();
        config.env_loaded_from = env_path;
        config
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Unset or invalid values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            use_gemini: lookup("USE_GEMINI")
                .map(|v| flag_enabled(&v))
                .unwrap_or(false),
            gemini_api_key: lookup("GEMINI_API_KEY")
                .map(|v| sanitize_key(&v))
                .unwrap_or_default(),
            gemini_model: non_empty(lookup("GEMINI_MODEL")).unwrap_or(defaults.gemini_model),
            gemini_api_base: non_empty(lookup("GEMINI_API_BASE"))
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.gemini_api_base),
            gemini_timeout: lookup("GEMINI_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.gemini_timeout),
            port: lookup("PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.port),
            env_loaded_from: defaults.env_loaded_from,
        }
    }

    /// Flag on and a key present.
    pub fn gemini_enabled(&self) -> bool {
        self.use_gemini && !self.gemini_api_key.is_empty()
    }

    pub fn key_present(&self) -> bool {
        !self.gemini_api_key.is_empty()
    }

    /// First six and last four characters of the key, or `None` without a key.
    pub fn masked_key(&self) -> Option<String> {
        if self.gemini_api_key.is_empty() {
            return None;
        }
        let chars: Vec<char> = self.gemini_api_key.chars().collect();
        let head: String = chars.iter().take(6).collect();
        let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
        Some(format!("{}…{}", head, tail))
    }
}

fn default_env_path() -> PathBuf {
    std::env::current_dir()
        .map(|cwd| cwd.join(".env"))
        .unwrap_or_else(|_| PathBuf::from(".env"))
}

fn load_env_file(path: &Path) {
    match dotenvy::from_path(path) {
        Ok(()) => tracing::info!("[Startup] Loaded environment from {}", path.display()),
        Err(e) => tracing::warn!(
            "[Startup] {} not loaded: {} (using process environment)",
            path.display(),
            e
        ),
    }
}

fn flag_enabled(value: &str) -> bool {
    let v = value.trim();
    v == "1" || v.eq_ignore_ascii_case("true")
}

fn sanitize_key(raw: &str) -> String {
    raw.trim().trim_matches('"').trim_matches('\'').to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> OracleConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        OracleConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]);
        assert!(!config.use_gemini);
        assert!(!config.gemini_enabled());
        assert_eq!(config.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.port, 5001);
        assert_eq!(config.gemini_timeout, Duration::from_secs(30));
        assert_eq!(config.masked_key(), None);
    }

    #[test]
    fn key_is_unquoted_and_masked() {
        let config = config_from(&[
            ("USE_GEMINI", "1"),
            ("GEMINI_API_KEY", "  \"AIzaSyExample1234WXYZ\" "),
        ]);
        assert_eq!(config.gemini_api_key, "AIzaSyExample1234WXYZ");
        assert!(config.gemini_enabled());
        assert_eq!(config.masked_key().as_deref(), Some("AIzaSy…WXYZ"));
    }

    #[test]
    fn flag_without_key_stays_disabled() {
        let config = config_from(&[("USE_GEMINI", "true")]);
        assert!(config.use_gemini);
        assert!(!config.gemini_enabled());
    }

    #[test]
    fn other_flag_values_are_off() {
        assert!(!config_from(&[("USE_GEMINI", "0")]).use_gemini);
        assert!(!config_from(&[("USE_GEMINI", "yes")]).use_gemini);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = config_from(&[
            ("PORT", "eighty"),
            ("GEMINI_TIMEOUT_SECS", "0"),
            ("GEMINI_API_BASE", "http://127.0.0.1:9/v1beta/"),
        ]);
        assert_eq!(config.port, 5001);
        assert_eq!(config.gemini_timeout, Duration::from_secs(30));
        assert_eq!(config.gemini_api_base, "http://127.0.0.1:9/v1beta");
    }
}
