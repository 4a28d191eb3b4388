use std::{net::SocketAddr, path::PathBuf};

use thiserror::Error;

use crate::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_MAX_CONNECTIONS, DEFAULT_MEDIA_ROOT, DEFAULT_MEDIA_URL,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: SocketAddr,
    pub jwt_secret: String,
    pub media_root: PathBuf,
    pub media_url: String,
    pub max_connections: u32,
}

impl Config {
    /// Reads the process environment; call `dotenv` beforehand to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let optional = |name: &'static str, default: &str| {
            lookup(name).unwrap_or_else(|| default.to_owned())
        };

        let bind_address = optional("BIND_ADDRESS", DEFAULT_BIND_ADDRESS);
        let bind_address: SocketAddr = bind_address
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: "BIND_ADDRESS",
                value: bind_address.to_owned(),
            })?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "DATABASE_MAX_CONNECTIONS",
                value,
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            bind_address,
            jwt_secret: required("JWT_SECRET")?,
            media_root: PathBuf::from(optional("MEDIA_ROOT", DEFAULT_MEDIA_ROOT)),
            media_url: optional("MEDIA_URL", DEFAULT_MEDIA_URL),
            max_connections,
        })
    }
}
