use std::path::PathBuf;
use std::time::Duration;

use tool_finder_core::catalog::Catalog;
use tool_finder_core::handoff::DEFAULT_HANDOFF_TTL_SECS;
use tool_finder_core::submission::DEFAULT_SUBMIT_DELAY_MS;

use crate::error::AppError;

/// Application configuration loaded explicitly from environment variables.
///
/// Everything is optional: with no environment at all the server uses the
/// bundled catalog, keeps handoffs in memory and speaks MCP on stdio.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file replacing the bundled catalog.
    pub catalog_path: Option<PathBuf>,
    /// Redis connection URL (e.g. "redis://127.0.0.1:6379"). `None` keeps handoffs in memory.
    pub redis_url: Option<String>,
    pub handoff_ttl_secs: u64,
    pub submit_delay: Duration,
    /// Serve MCP over raw TCP instead of stdio.
    pub mcp_tcp_listen_addr: Option<String>,
    /// Serve the JSON API and streamable-HTTP MCP endpoint.
    pub http_listen_addr: Option<String>,
}

impl Config {
    /// Optional:
    /// - `CATALOG_PATH`: replacement catalog JSON
    /// - `REDIS_URL`: Redis connection string for handoff slots
    /// - `HANDOFF_TTL_SECS` (default: 600)
    /// - `SUBMIT_DELAY_MS` (default: 2000)
    /// - `MCP_TCP_LISTEN_ADDR`: e.g. "127.0.0.1:7400"
    /// - `HTTP_LISTEN_ADDR`: e.g. "127.0.0.1:8080"
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let catalog_path = non_empty("CATALOG_PATH").map(PathBuf::from);
        if let Some(path) = &catalog_path {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "catalog file not found: {}",
                    path.display()
                )));
            }
        }

        let handoff_ttl_secs = parse_u64(&non_empty, "HANDOFF_TTL_SECS")?
            .unwrap_or(DEFAULT_HANDOFF_TTL_SECS);
        if handoff_ttl_secs == 0 {
            return Err(AppError::Config("HANDOFF_TTL_SECS must be positive".to_string()));
        }
        let submit_delay_ms =
            parse_u64(&non_empty, "SUBMIT_DELAY_MS")?.unwrap_or(DEFAULT_SUBMIT_DELAY_MS);

        Ok(Self {
            catalog_path,
            redis_url: non_empty("REDIS_URL"),
            handoff_ttl_secs,
            submit_delay: Duration::from_millis(submit_delay_ms),
            mcp_tcp_listen_addr: non_empty("MCP_TCP_LISTEN_ADDR"),
            http_listen_addr: non_empty("HTTP_LISTEN_ADDR"),
        })
    }

    /// The replacement catalog when `CATALOG_PATH` is set, else the bundled one.
    pub fn load_catalog(&self) -> Result<Catalog, AppError> {
        let catalog = match &self.catalog_path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::bundled()?,
        };
        Ok(catalog)
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>, AppError> {
    lookup(key)
        .map(|raw| {
            raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!("{key} must be a non-negative integer, got '{raw}'"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config(&[]).unwrap();
        assert!(config.catalog_path.is_none());
        assert!(config.redis_url.is_none());
        assert_eq!(config.handoff_ttl_secs, DEFAULT_HANDOFF_TTL_SECS);
        assert_eq!(config.submit_delay, Duration::from_millis(DEFAULT_SUBMIT_DELAY_MS));
        assert!(config.http_listen_addr.is_none());
        assert!(!config.load_catalog().unwrap().is_empty());
    }

    #[test]
    fn parses_overrides() {
        let config = config(&[
            ("REDIS_URL", "redis://127.0.0.1:6379"),
            ("HANDOFF_TTL_SECS", "30"),
            ("SUBMIT_DELAY_MS", "0"),
            ("HTTP_LISTEN_ADDR", "127.0.0.1:8080"),
        ])
        .unwrap();
        assert_eq!(config.redis_url.as_deref(), Some("redis://127.0.0.1:6379"));
        assert_eq!(config.handoff_ttl_secs, 30);
        assert!(config.submit_delay.is_zero());
        assert_eq!(config.http_listen_addr.as_deref(), Some("127.0.0.1:8080"));
    }

    #[test]
    fn rejects_malformed_numbers_and_missing_catalog() {
        assert!(matches!(config(&[("HANDOFF_TTL_SECS", "soon")]), Err(AppError::Config(_))));
        assert!(matches!(config(&[("HANDOFF_TTL_SECS", "0")]), Err(AppError::Config(_))));
        assert!(matches!(
            config(&[("CATALOG_PATH", "/definitely/not/here.json")]),
            Err(AppError::Config(_))
        ));
    }
}
