//! Server configuration.
//!
//! Values come from an optional TOML file (path in `TIMING_CONFIG`) and are
//! then overridden by individual environment variables.
//!
//! # Environment Variables
//!
//! - `TIMING_CONFIG`: path to a TOML configuration file
//! - `HOST`: bind host (default: 127.0.0.1)
//! - `PORT`: bind port (default: 9999)
//! - `SERIES_SEED`: seed for the fortune series (default: random per start)
//! - `WINDOW_POLICY`: `truncate` | `clamp` (default: truncate)
//! - `CODE_TTL_SECS`: verification code lifetime (default: 600)
//! - `CODE_SWEEP_SECS`: expired code purge interval, 0 disables (default: 60)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::services::analysis::WindowPolicy;
use crate::services::accounts::DEFAULT_CODE_TTL_SECS;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Account created at startup so the login endpoint works out of the box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedAccount {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl Default for SeedAccount {
    fn default() -> Self {
        Self {
            email: "admin@example.com".to_string(),
            name: "Administrator".to_string(),
            password: "123456".to_string(),
        }
    }
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Fixed seed for reproducible series across restarts.
    pub series_seed: Option<u64>,
    pub window_policy: WindowPolicy,
    pub code_ttl_secs: i64,
    /// Interval of the background purge of expired codes; 0 disables it.
    pub code_sweep_secs: u64,
    /// Account present at startup; `None` starts with an empty directory.
    pub seed_account: Option<SeedAccount>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9999,
            series_seed: None,
            window_policy: WindowPolicy::default(),
            code_ttl_secs: DEFAULT_CODE_TTL_SECS,
            code_sweep_secs: 60,
            seed_account: Some(SeedAccount::default()),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file. Missing keys take defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Read {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `TIMING_CONFIG` (if set) and apply environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match lookup("TIMING_CONFIG") {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_overrides(lookup)
    }

    /// Apply individual variable overrides on top of `self`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = parse_var("PORT", &port)?;
        }
        if let Some(seed) = lookup("SERIES_SEED") {
            self.series_seed = Some(parse_var("SERIES_SEED", &seed)?);
        }
        if let Some(policy) = lookup("WINDOW_POLICY") {
            self.window_policy = policy.parse().map_err(|message| ConfigError::InvalidValue {
                key: "WINDOW_POLICY".to_string(),
                message,
            })?;
        }
        if let Some(ttl) = lookup("CODE_TTL_SECS") {
            self.code_ttl_secs = parse_var("CODE_TTL_SECS", &ttl)?;
        }
        if let Some(sweep) = lookup("CODE_SWEEP_SECS") {
            self.code_sweep_secs = parse_var("CODE_SWEEP_SECS", &sweep)?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.code_ttl_secs <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "code_ttl_secs".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}
