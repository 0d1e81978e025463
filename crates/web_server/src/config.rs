//! Server configuration read from the environment.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use campground_availability::AggregatorConfig;
use rec_gov::RecGovConfig;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DOCKER_FRONTEND_PATH: &str = "./frontend-build";
const LOCAL_FRONTEND_PATH: &str = "../frontend/build";

/// Everything the server needs at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Directory holding the built frontend
    pub frontend_path: String,
    /// recreation.gov client settings
    pub rec_gov: RecGovConfig,
    /// Month fan-out settings
    pub aggregator: AggregatorConfig,
}

impl AppConfig {
    /// Reads the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut rec_gov = RecGovConfig::default();

        if let Some(url) = lookup("RIDB_BASE_URL") {
            rec_gov.ridb_base_url = url;
        }
        if let Some(url) = lookup("RECREATION_BASE_URL") {
            rec_gov.recreation_base_url = url;
        }
        rec_gov.api_key = lookup("RECREATION_API_KEY").filter(|key| !key.trim().is_empty());

        if let Some(secs) = lookup("HTTP_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("HTTP_TIMEOUT_SECS must be a number, got {:?}", secs))?;
            rec_gov.timeout = Duration::from_secs(secs);
        }

        let mut aggregator = AggregatorConfig::default();
        if let Some(months) = lookup("MAX_CONCURRENT_MONTHS") {
            let months: usize = months.trim().parse().with_context(|| {
                format!("MAX_CONCURRENT_MONTHS must be a number, got {:?}", months)
            })?;
            aggregator.max_concurrent_months = months.max(1);
        }
        if let Some(months) = lookup("MAX_SEARCH_MONTHS") {
            aggregator.max_search_months = months.trim().parse().with_context(|| {
                format!("MAX_SEARCH_MONTHS must be a number, got {:?}", months)
            })?;
        }

        let bind_address =
            lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let frontend_path = lookup("FRONTEND_PATH").unwrap_or_else(probe_frontend_path);

        Ok(Self {
            bind_address,
            frontend_path,
            rec_gov,
            aggregator,
        })
    }
}

fn probe_frontend_path() -> String {
    // Check multiple possible locations for frontend files
    if Path::new(DOCKER_FRONTEND_PATH).exists() {
        log::info!("✅ Using Docker frontend path: {}", DOCKER_FRONTEND_PATH);
        DOCKER_FRONTEND_PATH.to_string()
    } else if Path::new(LOCAL_FRONTEND_PATH).exists() {
        log::info!("✅ Using local frontend path: {}", LOCAL_FRONTEND_PATH);
        LOCAL_FRONTEND_PATH.to_string()
    } else {
        log::info!("❌ Frontend files not found in either location");
        DOCKER_FRONTEND_PATH.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("FRONTEND_PATH", "/srv/www")])).unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.frontend_path, "/srv/www");
        assert_eq!(config.rec_gov.api_key, None);
        assert_eq!(config.rec_gov.timeout, Duration::from_secs(30));
        assert_eq!(config.aggregator.max_concurrent_months, 1);
        assert_eq!(config.aggregator.max_search_months, 13);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("RECREATION_API_KEY", "abc123"),
            ("RIDB_BASE_URL", "http://localhost:9000/ridb"),
            ("BIND_ADDRESS", "127.0.0.1:3000"),
            ("MAX_CONCURRENT_MONTHS", "4"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("MAX_SEARCH_MONTHS", "6"),
            ("FRONTEND_PATH", "/srv/www"),
        ]))
        .unwrap();

        assert_eq!(config.rec_gov.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.rec_gov.ridb_base_url, "http://localhost:9000/ridb");
        assert_eq!(config.bind_address, "127.0.0.1:3000");
        assert_eq!(config.aggregator.max_concurrent_months, 4);
        assert_eq!(config.rec_gov.timeout, Duration::from_secs(5));
        assert_eq!(config.aggregator.max_search_months, 6);
    }

    #[test]
    fn test_blank_api_key_is_absent() {
        let config = AppConfig::from_lookup(lookup(&[
            ("RECREATION_API_KEY", "   "),
            ("FRONTEND_PATH", "/srv/www"),
        ]))
        .unwrap();

        assert_eq!(config.rec_gov.api_key, None);
    }

    #[test]
    fn test_zero_concurrency_means_sequential() {
        let config = AppConfig::from_lookup(lookup(&[
            ("MAX_CONCURRENT_MONTHS", "0"),
            ("FRONTEND_PATH", "/srv/www"),
        ]))
        .unwrap();

        assert_eq!(config.aggregator.max_concurrent_months, 1);
    }

    #[test]
    fn test_bad_number_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[("HTTP_TIMEOUT_SECS", "soon")])).unwrap_err();

        assert!(err.to_string().contains("HTTP_TIMEOUT_SECS"));
    }
}
