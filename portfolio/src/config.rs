use crate::about::DEFAULT_START_YEAR;
use crate::contact::DEFAULT_ENDPOINT;
use crate::store::DEFAULT_BASE_URL;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use std::{env, fmt::Display, str::FromStr};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bind: IpAddr,
    pub firestore_project: String,
    pub firestore_api_key: Option<String>,
    pub firestore_base_url: String,
    pub cache_path: PathBuf,
    pub contact_endpoint: String,
    pub static_dir: PathBuf,
    pub start_year: i32,
    pub http_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load(&lookup, "PORTFOLIO_PORT", "8080")?,
            bind: try_load(&lookup, "PORTFOLIO_BIND", "0.0.0.0")?,
            firestore_project: try_load(&lookup, "FIRESTORE_PROJECT_ID", "portfolio")?,
            firestore_api_key: lookup("FIRESTORE_API_KEY").filter(|key| !key.is_empty()),
            firestore_base_url: try_load(&lookup, "FIRESTORE_BASE_URL", DEFAULT_BASE_URL)?,
            cache_path: try_load(&lookup, "PORTFOLIO_CACHE_PATH", "portfolio-cache.db")?,
            contact_endpoint: try_load(&lookup, "CONTACT_ENDPOINT", DEFAULT_ENDPOINT)?,
            static_dir: try_load(&lookup, "PORTFOLIO_STATIC_DIR", "dist")?,
            start_year: try_load(&lookup, "PORTFOLIO_START_YEAR", &DEFAULT_START_YEAR.to_string())?,
            http_timeout: Duration::from_secs(try_load(&lookup, "HTTP_TIMEOUT_SECS", "10")?),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}
