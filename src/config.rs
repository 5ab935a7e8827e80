use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::Context;
use tracing::warn;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    database_url: Option<String>,
    pub max_connections: u32,
}

/// Loads `.env` into the environment. Runs before logging is set up, so the
/// outcome is returned for the caller to log.
pub fn load_env_file() -> dotenvy::Result<PathBuf> {
    dotenvy::dotenv()
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").ok(),
            max_connections: try_load("UIU_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
        }
    }

    pub fn database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL must be set to the scholarship Postgres instance")
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => parse_or(key, &raw, default),
        Err(_) => default,
    }
}

fn parse_or<T>(key: &str, raw: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    raw.trim().parse().unwrap_or_else(|err| {
        warn!("Invalid {key} value `{raw}` ({err}), using default: {default}");
        default
    })
}
