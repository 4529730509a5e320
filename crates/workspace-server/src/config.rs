use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use workspace_api::state::DEFAULT_QUERY_TIMEOUT;
use workspace_db::{DEFAULT_BUSY_TIMEOUT, DEFAULT_READER_POOL_SIZE, DbOptions};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub db: DbOptions,
    pub query_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());

        let db_path: PathBuf = get("DB_DATABASE")
            .ok_or(ConfigError::Missing("DB_DATABASE"))?
            .into();
        let readers: usize = parse_or(get("DB_READERS"), "DB_READERS", DEFAULT_READER_POOL_SIZE)?;
        if readers == 0 {
            return Err(ConfigError::Invalid { name: "DB_READERS", value: "0".into() });
        }
        let busy_ms: u64 = parse_or(
            get("DB_BUSY_TIMEOUT_MS"),
            "DB_BUSY_TIMEOUT_MS",
            DEFAULT_BUSY_TIMEOUT.as_millis() as u64,
        )?;
        let query_ms: u64 = parse_or(
            get("DB_QUERY_TIMEOUT_MS"),
            "DB_QUERY_TIMEOUT_MS",
            DEFAULT_QUERY_TIMEOUT.as_millis() as u64,
        )?;

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or(get("PORT"), "PORT", 8080)?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|_| ConfigError::Invalid { name: "HOST", value: host.clone() })?;

        Ok(Self {
            addr,
            db: DbOptions {
                path: db_path,
                readers,
                busy_timeout: Duration::from_millis(busy_ms),
            },
            query_timeout: Duration::from_millis(query_ms),
        })
    }
}

fn parse_or<T: FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { name, value: v }),
    }
}
