use crate::error::{ListingError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const API_URL_VAR: &str = "PRIME_LISTINGS_API_URL";
pub const DATA_DIR_VAR: &str = "PRIME_LISTINGS_DATA_DIR";
pub const TIMEOUT_VAR: &str = "PRIME_LISTINGS_HTTP_TIMEOUT_SECS";

const DEFAULT_DATA_DIR: &str = ".prime-listings";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where reads and writes are routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataMode {
    /// A remote base URL is configured; all data goes through the REST API.
    Api { base_url: String },
    /// No backend; the CMS dataset lives in the local persisted store.
    Local,
}

impl DataMode {
    pub fn is_api(&self) -> bool {
        matches!(self, DataMode::Api { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataMode::Api { .. } => "api",
            DataMode::Local => "local",
        }
    }
}

/// Startup configuration, built once and handed to whatever needs data access.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Option<String>,
    pub data_dir: PathBuf,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from the environment (and `.env` when present).
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let api_url = env::var(API_URL_VAR).ok();
        let data_dir = env::var(DATA_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));
        let request_timeout = match env::var(TIMEOUT_VAR) {
            Ok(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    ListingError::Config(format!(
                        "{} must be a whole number of seconds, got '{}'",
                        TIMEOUT_VAR, raw
                    ))
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_url,
            data_dir,
            request_timeout,
        })
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Derived from `api_url` on every call.
    pub fn mode(&self) -> DataMode {
        match self.api_url.as_deref().map(|u| u.trim().trim_end_matches('/')) {
            Some(base) if !base.is_empty() => DataMode::Api {
                base_url: base.to_string(),
            },
            _ => DataMode::Local,
        }
    }
}
