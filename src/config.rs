use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR: &str = "clipnote";
const REGISTRY_FILE: &str = "docs_mapping.json";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_DOCS_API_URL: &str = "https://docs.googleapis.com";
pub const DEFAULT_SOURCE_LABEL: &str = "YouTube";
pub const DEFAULT_WATCH_URL: &str = "https://www.youtube.com/watch";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 30;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub docs_api_url: String,
    pub registry_path: Option<PathBuf>,
    pub source_label: String,
    pub watch_url: String,
    pub poll_interval_secs: u64,
    pub max_poll_attempts: u32,
    pub request_timeout_secs: u64,
    pub openai_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            docs_api_url: DEFAULT_DOCS_API_URL.to_string(),
            registry_path: None,
            source_label: DEFAULT_SOURCE_LABEL.to_string(),
            watch_url: DEFAULT_WATCH_URL.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            openai_key: None,
        }
    }
}

/// Google credentials, resolved from the environment
#[derive(Debug, Clone, PartialEq)]
pub enum Credentials {
    AccessToken(String),
    RefreshToken {
        client_id: String,
        client_secret: String,
        refresh_token: String,
    },
    Missing,
}

impl AppConfig {
    /// Defaults, then an optional JSON file named by `CLIPNOTE_CONFIG`, then env vars
    pub fn from_env() -> Self {
        let mut config = match env::var("CLIPNOTE_CONFIG").ok() {
            Some(path) => load_file(Path::new(&path)),
            None => AppConfig::default(),
        };

        if let Ok(value) = env::var("CLIPNOTE_BACKEND_URL") {
            config.backend_url = value;
        }
        if let Ok(value) = env::var("CLIPNOTE_DOCS_API_URL") {
            config.docs_api_url = value;
        }
        if let Ok(value) = env::var("CLIPNOTE_REGISTRY_PATH") {
            config.registry_path = Some(PathBuf::from(value));
        }
        if let Ok(value) = env::var("CLIPNOTE_SOURCE_LABEL") {
            config.source_label = value;
        }
        if let Ok(value) = env::var("CLIPNOTE_WATCH_URL") {
            config.watch_url = value;
        }
        if let Some(value) = parse_env("CLIPNOTE_POLL_INTERVAL_SECS") {
            config.poll_interval_secs = value;
        }
        if let Some(value) = parse_env("CLIPNOTE_MAX_POLL_ATTEMPTS") {
            config.max_poll_attempts = value;
        }
        if let Some(value) = parse_env("CLIPNOTE_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = value;
        }
        if let Ok(value) = env::var("OPENAI_API_KEY") {
            config.openai_key = Some(value);
        }

        normalize_config(&mut config);
        config
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Registry file location, falling back to the user config dir
    pub fn resolved_registry_path(&self) -> PathBuf {
        if let Some(path) = &self.registry_path {
            return path.clone();
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR)
            .join(REGISTRY_FILE)
    }
}

pub fn credentials_from_env() -> Credentials {
    let non_empty = |key: &str| {
        env::var(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if let Some(token) = non_empty("GOOGLE_ACCESS_TOKEN") {
        return Credentials::AccessToken(token);
    }

    match (
        non_empty("GOOGLE_CLIENT_ID"),
        non_empty("GOOGLE_CLIENT_SECRET"),
        non_empty("GOOGLE_REFRESH_TOKEN"),
    ) {
        (Some(client_id), Some(client_secret), Some(refresh_token)) => Credentials::RefreshToken {
            client_id,
            client_secret,
            refresh_token,
        },
        _ => Credentials::Missing,
    }
}

pub fn normalize_url(input: &str, default: &str) -> String {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn normalize_label(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        DEFAULT_SOURCE_LABEL.to_string()
    } else {
        trimmed.to_string()
    }
}

fn normalize_config(config: &mut AppConfig) {
    config.backend_url = normalize_url(&config.backend_url, DEFAULT_BACKEND_URL);
    config.docs_api_url = normalize_url(&config.docs_api_url, DEFAULT_DOCS_API_URL);
    config.watch_url = normalize_url(&config.watch_url, DEFAULT_WATCH_URL);
    config.source_label = normalize_label(&config.source_label);
    config.poll_interval_secs = config.poll_interval_secs.max(1);
    config.max_poll_attempts = config.max_poll_attempts.max(1);
    config.request_timeout_secs = config.request_timeout_secs.max(1);
    config.openai_key = config.openai_key.take().and_then(|key| {
        let trimmed = key.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    });
}

fn load_file(path: &Path) -> AppConfig {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("Config {} unreadable ({}), using defaults", path.display(), e);
            return AppConfig::default();
        }
    };

    match serde_json::from_str::<AppConfig>(&raw) {
        Ok(config) => config,
        Err(e) => {
            let backup = path.with_extension("json.bak");
            let _ = fs::copy(path, &backup);
            tracing::warn!(
                "Config {} is invalid ({}), backed up to {} and using defaults",
                path.display(),
                e,
                backup.display()
            );
            AppConfig::default()
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a number", key, raw);
            None
        }
    }
}
