use std::env;
use std::time::Duration;

use crate::modules::integrations::openlibrary::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub catalog_base_url: String,
    pub catalog_timeout: Duration,
    pub catalog_user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://library_book.db?mode=rwc".to_string(),
            port: 8000,
            cors_allowed_origins: Vec::new(),
            catalog_base_url: DEFAULT_BASE_URL.to_string(),
            catalog_timeout: Duration::from_secs(10),
            catalog_user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            catalog_base_url: env::var("CATALOG_BASE_URL").unwrap_or(defaults.catalog_base_url),
            catalog_timeout: env::var("CATALOG_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.catalog_timeout),
            catalog_user_agent: env::var("CATALOG_USER_AGENT")
                .unwrap_or(defaults.catalog_user_agent),
        }
    }
}
