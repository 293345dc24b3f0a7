//! Configuration Management
//!
//! Values are read from environment variables with development defaults.
//!
//! ## Configuration Variables
//!
//! - `DATABASE_URL`: SQLite connection string (default: `sqlite://site.db`)
//! - `BIND_ADDRESS`: HTTP server bind address (default: `127.0.0.1:5000`)

use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://site.db".to_string(),
            bind_address: "127.0.0.1:5000".to_string(),
        }
    }
}

impl Config {
    /// Build the config from the process environment, keeping defaults for unset variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            database_url: lookup("DATABASE_URL")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.database_url),
            bind_address: lookup("BIND_ADDRESS")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.bind_address),
        }
    }
}
