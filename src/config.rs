pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const API_URL_VAR: &str = "GRIND_TRACK_API_URL";
pub const TIMEOUT_VAR: &str = "GRIND_TRACK_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    /// `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl Config {
    /// Reads the process environment. `api_url` from the command line wins
    /// over the environment.
    pub fn load(api_url: Option<String>) -> anyhow::Result<Self> {
        Self::from_lookup(api_url, |key| env::var(key).ok())
    }

    pub fn from_lookup(
        api_url: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let api_url = match api_url.or_else(|| lookup(API_URL_VAR)) {
            Some(url) => url,
            None => {
                info!("{API_URL_VAR} not set, using default: {DEFAULT_API_URL}");
                DEFAULT_API_URL.to_string()
            }
        };
        Url::parse(&api_url).with_context(|| format!("Invalid API URL '{}'", api_url))?;

        let timeout = lookup(TIMEOUT_VAR)
            .map(|raw| -> anyhow::Result<Duration> {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("Invalid {TIMEOUT_VAR} value '{}'", raw))?;
                anyhow::ensure!(secs > 0, "{TIMEOUT_VAR} must be at least 1 second");
                Ok(Duration::from_secs(secs))
            })
            .transpose()?;

        Ok(Config { api_url, timeout })
    }
}


use anyhow::Context;
use reqwest::Url;
use std::env;
use std::time::Duration;
use tracing::info;
