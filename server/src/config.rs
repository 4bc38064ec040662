//! Process configuration, read once from the environment at startup.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://patients.db";
pub const DEFAULT_LOG_FILTER: &str = "patient_server=info,tower_http=info";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT {0:?}")]
    Port(String),
    #[error("invalid HOST {0:?}")]
    Host(String),
    #[error("unsupported DATABASE_URL {0:?}")]
    DatabaseUrl(String),
}

/// Where the patient collection lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    Memory,
    SqliteMemory,
    SqliteFile(PathBuf),
}

impl Storage {
    /// Accepts `memory`, `sqlite::memory:`, `sqlite://<path>`, `sqlite:<path>`
    /// or a bare file path.
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let url = url.trim();
        match url {
            "" => Err(ConfigError::DatabaseUrl(url.to_string())),
            "memory" | "memory://" => Ok(Storage::Memory),
            "sqlite::memory:" | "sqlite://:memory:" => Ok(Storage::SqliteMemory),
            _ => {
                let path = url
                    .strip_prefix("sqlite://")
                    .or_else(|| url.strip_prefix("sqlite:"))
                    .unwrap_or(url);
                if path.is_empty() || path.contains("://") {
                    return Err(ConfigError::DatabaseUrl(url.to_string()));
                }
                Ok(Storage::SqliteFile(PathBuf::from(path)))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub storage: Storage,
    /// Dataset override; the bundled dataset is used when unset.
    pub seed_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Port(raw))?,
            None => DEFAULT_PORT,
        };
        let host = match lookup("HOST") {
            Some(raw) => raw.trim().parse::<IpAddr>().map_err(|_| ConfigError::Host(raw))?,
            None => IpAddr::from([127, 0, 0, 1]),
        };
        let storage = Storage::parse(
            lookup("DATABASE_URL")
                .as_deref()
                .unwrap_or(DEFAULT_DATABASE_URL),
        )?;
        let seed_file = lookup("SEED_FILE")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            addr: SocketAddr::new(host, port),
            storage,
            seed_file,
        })
    }
}
