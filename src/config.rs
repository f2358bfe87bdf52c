//! Runtime configuration, read from the environment (and `.env` in development).
//!
//! | variable                    | default                 |
//! |-----------------------------|-------------------------|
//! | `DATABASE_URL`              | required                |
//! | `DATABASE_MAX_CONNECTIONS`  | `5`                     |
//! | `FRONTEND_URL`              | `http://localhost:3000` |
//! | `HOST`                      | `0.0.0.0`               |
//! | `PORT`                      | `5050`                  |
//! | `PASSWORD_HASH_ITERATIONS`  | Argon2 default          |
//! | `PASSWORD_HASH_MEMORY_KIB`  | Argon2 default          |

use std::env;
use std::str::FromStr;

use actix_web::http::Uri;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5050;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub frontend_url: String,
    pub host: String,
    pub port: u16,
    pub hash_iterations: Option<u32>,
    pub hash_memory_kib: Option<u32>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, so parsing can be
    /// exercised without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            max_connections: parse_or(get("DATABASE_MAX_CONNECTIONS"), "DATABASE_MAX_CONNECTIONS")?
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            frontend_url: frontend_origin(get("FRONTEND_URL"))?,
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(get("PORT"), "PORT")?.unwrap_or(DEFAULT_PORT),
            hash_iterations: parse_or(get("PASSWORD_HASH_ITERATIONS"), "PASSWORD_HASH_ITERATIONS")?,
            hash_memory_kib: parse_or(get("PASSWORD_HASH_MEMORY_KIB"), "PASSWORD_HASH_MEMORY_KIB")?,
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

/// CORS needs one concrete origin: an absolute URI with scheme and host, not `*`.
fn frontend_origin(raw: Option<String>) -> Result<String, ConfigError> {
    let Some(value) = raw else {
        return Ok(DEFAULT_FRONTEND_URL.to_string());
    };
    let value = value.trim().to_string();
    let valid = value
        .parse::<Uri>()
        .map(|uri| uri.scheme().is_some() && uri.host().is_some())
        .unwrap_or(false);
    if valid {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            name: "FRONTEND_URL",
            value,
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, name: &'static str) -> Result<Option<T>, ConfigError> {
    raw.map(|value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value })
    })
    .transpose()
}
