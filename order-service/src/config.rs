//! Service configuration
//!
//! Everything comes from environment variables (a `.env` file is loaded by
//! `main` first). Endpoints of external collaborators are explicit values
//! handed to the clients that use them.

use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Search engine connection settings
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Base URL of the JSON API, e.g. `http://127.0.0.1:9308`
    pub base_url: String,
    /// Index holding order documents
    pub index: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Result count when the caller gives none
    pub default_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9308".into(),
            index: "orders".into(),
            timeout: Duration::from_secs(5),
            default_limit: 10,
        }
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL; `None` runs on the in-memory store
    pub database_url: Option<String>,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    pub search: SearchConfig,
    /// Product page root used by the price lookup
    pub price_base_url: String,
    /// Timeout for product page fetches
    pub price_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            http_port: 8080,
            environment: "development".into(),
            search: SearchConfig::default(),
            price_base_url: "https://tile.expert/fr/tile".into(),
            price_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT").unwrap_or(defaults.environment);

        let database_url = var("DATABASE_URL");
        if database_url.is_none() && environment != "development" {
            return Err(format!("DATABASE_URL must be set in {environment} environment").into());
        }

        Ok(Self {
            database_url,
            http_port: var("HTTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.http_port),
            environment,
            search: SearchConfig {
                base_url: var("SEARCH_URL")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.search.base_url),
                index: var("SEARCH_INDEX").unwrap_or(defaults.search.index),
                timeout: var("SEARCH_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.search.timeout),
                default_limit: var("SEARCH_DEFAULT_LIMIT")
                    .and_then(|s| s.parse().ok())
                    .filter(|l| *l > 0)
                    .unwrap_or(defaults.search.default_limit),
            },
            price_base_url: var("PRICE_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.price_base_url),
            price_timeout: var("PRICE_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.price_timeout),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, BoxError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults_in_development() {
        let config = load(&[]).unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.search.base_url, "http://127.0.0.1:9308");
        assert_eq!(config.search.index, "orders");
        assert_eq!(config.search.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_database_required_outside_development() {
        assert!(load(&[("ENVIRONMENT", "production")]).is_err());

        let config = load(&[
            ("ENVIRONMENT", "production"),
            ("DATABASE_URL", "postgres://localhost/orders"),
        ])
        .unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/orders")
        );
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("HTTP_PORT", "9000"),
            ("SEARCH_URL", "http://manticore:9308/"),
            ("SEARCH_INDEX", "orders_rt"),
            ("SEARCH_TIMEOUT_SECS", "2"),
            ("SEARCH_DEFAULT_LIMIT", "0"),
        ])
        .unwrap();
        assert_eq!(config.http_port, 9000);
        assert_eq!(config.search.base_url, "http://manticore:9308");
        assert_eq!(config.search.index, "orders_rt");
        assert_eq!(config.search.timeout, Duration::from_secs(2));
        assert_eq!(config.search.default_limit, 10);
    }

    #[test]
    fn test_unparseable_port_falls_back() {
        let config = load(&[("HTTP_PORT", "http")]).unwrap();
        assert_eq!(config.http_port, 8080);
    }
}
