use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Marine Debris Reporter";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upload extensions accepted by the submission pipeline (lower-case).
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Request body limit for the submission endpoint (16 MiB).
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_UPLOAD_DIR: &str = "Uploads";
pub const DEFAULT_DATABASE_PATH: &str = "database.db";
pub const DEFAULT_GEOCODE_CACHE_PATH: &str = "geocode_cache.json";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_NOMINATIM_USER_AGENT: &str = "MarineDebrisApp/1.0";
/// Nominatim usage policy: at most one request per second.
pub const DEFAULT_NOMINATIM_MIN_INTERVAL_MS: u64 = 1000;

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,marine_debris_lib=debug,tower_http=info"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub upload_dir: PathBuf,
    pub database_path: PathBuf,
    pub geocode_cache_path: PathBuf,
    /// Absent credential means classification always uses the keyword fallback.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub nominatim_base_url: String,
    pub nominatim_user_agent: String,
    pub nominatim_min_interval: Duration,
}

impl AppConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read settings through an arbitrary lookup (environment or test map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = get("MARINE_DEBRIS_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::InvalidValue {
            var: "MARINE_DEBRIS_BIND",
            value: bind_raw.clone(),
        })?;

        let interval_ms = match get("NOMINATIM_MIN_INTERVAL_MS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: "NOMINATIM_MIN_INTERVAL_MS",
                value: raw,
            })?,
            None => DEFAULT_NOMINATIM_MIN_INTERVAL_MS,
        };

        Ok(Self {
            bind_addr,
            upload_dir: get("MARINE_DEBRIS_UPLOAD_DIR")
                .unwrap_or_else(|| DEFAULT_UPLOAD_DIR.into())
                .into(),
            database_path: get("MARINE_DEBRIS_DATABASE")
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.into())
                .into(),
            geocode_cache_path: get("MARINE_DEBRIS_GEOCODE_CACHE")
                .unwrap_or_else(|| DEFAULT_GEOCODE_CACHE_PATH.into())
                .into(),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into()),
            gemini_base_url: get("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.into()),
            nominatim_base_url: get("NOMINATIM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_NOMINATIM_BASE_URL.into()),
            nominatim_user_agent: get("NOMINATIM_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_NOMINATIM_USER_AGENT.into()),
            nominatim_min_interval: Duration::from_millis(interval_ms),
        })
    }
}
