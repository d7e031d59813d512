use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,
    pub api_prefix: String,
    pub log_dir: String,
    /// Origins allowed to call the API from a browser; `*` allows any.
    pub cors_allowed_origins: Vec<String>,

    // Rate limiting
    pub rate_api_per_min: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            server_addr: var_or("SERVER_ADDR", "0.0.0.0:5000"),
            database_url: lookup("DATABASE_URL").context("DATABASE_URL must be set")?,
            api_prefix: var_or("API_PREFIX", "/api"),
            log_dir: var_or("LOG_DIR", "logs"),
            cors_allowed_origins: var_or("CORS_ALLOWED_ORIGINS", "*")
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            rate_api_per_min: var_or("RATE_API_PER_MIN", "1000")
                .parse()
                .context("RATE_API_PER_MIN must be a non-negative integer")?,
        })
    }
}
