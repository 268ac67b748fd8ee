//! Client configuration.
//!
//! # Environment Variables
//!
//! - `DRIVEROUTE_API_BASE_URL`: route API base URL (default: the hosted mock API)
//! - `GOOGLE_MAPS_API_KEY`: key for places/directions lookups (optional)
//! - `DRIVEROUTE_POLL_INTERVAL_MS`: delay between "in progress" polls (default: 0)
//! - `DRIVEROUTE_POLL_MAX_ATTEMPTS`: polling cap (default: unbounded)
//! - `DRIVEROUTE_HTTP_TIMEOUT_SECS`: per-request timeout (default: 30)

use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;

use crate::api::PollPolicy;
use crate::error::{Error, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://sg-mock-api.lalamove.com";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const API_BASE_URL_ENV: &str = "DRIVEROUTE_API_BASE_URL";
const MAPS_API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";
const POLL_INTERVAL_ENV: &str = "DRIVEROUTE_POLL_INTERVAL_MS";
const POLL_MAX_ATTEMPTS_ENV: &str = "DRIVEROUTE_POLL_MAX_ATTEMPTS";
const HTTP_TIMEOUT_ENV: &str = "DRIVEROUTE_HTTP_TIMEOUT_SECS";

/// Settings shared by the route and maps clients.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the job-style route API.
    pub api_base_url: String,
    /// API key for the places and directions endpoints.
    pub maps_api_key: Option<String>,
    /// How the polling client waits between "in progress" answers.
    pub poll: PollPolicy,
    pub http_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            maps_api_key: None,
            poll: PollPolicy::default(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Create configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    ///
    /// Tests use this instead of mutating the global environment so they can
    /// run in parallel.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let mut config = Self::default();
        if let Some(base_url) = value(API_BASE_URL_ENV) {
            config.api_base_url = base_url;
        }
        config.maps_api_key = value(MAPS_API_KEY_ENV);
        if let Some(raw) = value(POLL_INTERVAL_ENV) {
            config.poll.interval = Duration::from_millis(parse_number(POLL_INTERVAL_ENV, &raw)?);
        }
        if let Some(raw) = value(POLL_MAX_ATTEMPTS_ENV) {
            let attempts: u32 = parse_number(POLL_MAX_ATTEMPTS_ENV, &raw)?;
            if attempts == 0 {
                return Err(Error::InvalidConfig {
                    name: POLL_MAX_ATTEMPTS_ENV,
                    value: raw,
                });
            }
            config.poll.max_attempts = Some(attempts);
        }
        if let Some(raw) = value(HTTP_TIMEOUT_ENV) {
            config.http_timeout = Duration::from_secs(parse_number(HTTP_TIMEOUT_ENV, &raw)?);
        }
        Ok(config)
    }

    pub fn with_api_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into();
        self
    }

    pub fn with_maps_api_key(mut self, key: impl Into<String>) -> Self {
        self.maps_api_key = Some(key.into());
        self
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// The maps API key, or an error naming the variable that supplies it.
    pub fn require_maps_api_key(&self) -> Result<&str> {
        self.maps_api_key
            .as_deref()
            .ok_or(Error::MissingConfig {
                name: MAPS_API_KEY_ENV,
            })
    }

    /// Build the HTTP client shared by all requests made with this configuration.
    pub fn build_http_client(&self) -> Result<Client> {
        Client::builder()
            .timeout(self.http_timeout)
            .user_agent(user_agent())
            .build()
            .map_err(Error::Transport)
    }
}

fn parse_number<T: FromStr>(name: &'static str, raw: &str) -> Result<T> {
    raw.parse().map_err(|_| Error::InvalidConfig {
        name,
        value: raw.to_string(),
    })
}

fn user_agent() -> String {
    format!("driveroute-lib/{version}", version = env!("CARGO_PKG_VERSION"))
}
