//! Server configuration read from the process environment.
//!
//! # Invariants
//! - Unset variables fall back to defaults.
//! - Set but unparsable values are startup errors, never silently defaulted.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "SKILLTRACK_DB_PATH";
pub const DB_POOL_SIZE_VAR: &str = "SKILLTRACK_DB_POOL_SIZE";
pub const BIND_ADDR_VAR: &str = "SKILLTRACK_BIND_ADDR";
pub const PORT_VAR: &str = "PORT";
pub const LOG_LEVEL_VAR: &str = "SKILLTRACK_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "SKILLTRACK_LOG_DIR";

const DEFAULT_DB_PATH: &str = "skilltrack.sqlite3";
const DEFAULT_POOL_SIZE: usize = 4;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Invalid environment value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}=`{}`: {}", self.var, self.value, self.reason)
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: PathBuf,
    pub db_pool_size: usize,
    pub listen_addr: SocketAddr,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = get(DB_PATH_VAR).unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

        let db_pool_size = match get(DB_POOL_SIZE_VAR) {
            None => DEFAULT_POOL_SIZE,
            Some(raw) => match raw.parse::<usize>() {
                Ok(size) if size >= 1 => size,
                Ok(_) => return Err(invalid(DB_POOL_SIZE_VAR, raw, "must be at least 1")),
                Err(_) => return Err(invalid(DB_POOL_SIZE_VAR, raw, "not a positive integer")),
            },
        };

        let bind_raw = get(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_ip = bind_raw
            .parse::<IpAddr>()
            .map_err(|_| invalid(BIND_ADDR_VAR, bind_raw.clone(), "not an IP address"))?;

        let port = match get(PORT_VAR) {
            None => DEFAULT_PORT,
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| invalid(PORT_VAR, raw, "not a TCP port"))?,
        };

        let log_level = get(LOG_LEVEL_VAR)
            .unwrap_or_else(|| skilltrack_core::default_log_level().to_string());

        Ok(Self {
            db_path: PathBuf::from(db_path),
            db_pool_size,
            listen_addr: SocketAddr::new(bind_ip, port),
            log_level,
            log_dir: get(LOG_DIR_VAR),
        })
    }
}

fn invalid(var: &'static str, value: String, reason: &'static str) -> ConfigError {
    ConfigError { var, value, reason }
}

#[cfg(test)]
mod tests {
    use super::{ServerConfig, BIND_ADDR_VAR, DB_POOL_SIZE_VAR, LOG_DIR_VAR, PORT_VAR};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn load(pairs: &[(&str, &str)]) -> Result<ServerConfig, super::ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = load(&[]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("skilltrack.sqlite3"));
        assert_eq!(config.db_pool_size, 4);
        assert_eq!(config.listen_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.log_level, skilltrack_core::default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = load(&[
            ("SKILLTRACK_DB_PATH", "/var/lib/skilltrack/db.sqlite3"),
            (DB_POOL_SIZE_VAR, "8"),
            (BIND_ADDR_VAR, "127.0.0.1"),
            (PORT_VAR, "3000"),
            ("SKILLTRACK_LOG_LEVEL", "warn"),
            (LOG_DIR_VAR, "/var/log/skilltrack"),
        ])
        .unwrap();
        assert_eq!(
            config.db_path,
            PathBuf::from("/var/lib/skilltrack/db.sqlite3")
        );
        assert_eq!(config.db_pool_size, 8);
        assert_eq!(config.listen_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/skilltrack"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = load(&[(PORT_VAR, "  "), (LOG_DIR_VAR, "")]).unwrap();
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn unparsable_values_are_rejected() {
        let err = load(&[(PORT_VAR, "http")]).unwrap_err();
        assert_eq!(err.var, PORT_VAR);
        assert!(err.to_string().contains("`http`"));

        assert!(load(&[(PORT_VAR, "70000")]).is_err());
        assert!(load(&[(BIND_ADDR_VAR, "localhost")]).is_err());
        assert!(load(&[(DB_POOL_SIZE_VAR, "-1")]).is_err());

        let err = load(&[(DB_POOL_SIZE_VAR, "0")]).unwrap_err();
        assert_eq!(err.reason, "must be at least 1");
    }
}
