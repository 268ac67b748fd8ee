//! Clients for the job-style route API.
//!
//! A route is resolved in two steps:
//!
//! 1. `POST {base}/route` with `{origin, destination}` returns a job token.
//! 2. `GET {base}/route/{token}` is polled until the job leaves the
//!    `"in progress"` state, ending in either a path with its metrics or a
//!    `{status: "failure", error}` report.
//!
//! Both operations return an [`ApiOutcome`]; every failure is classified at
//! this boundary and nothing propagates past it.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::classify::classify;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::schemas::{ROUTE_RESULT_SHAPE, ROUTE_TOKEN_SHAPE};
use crate::types::{ApiOutcome, RouteResult, RouteToken};
use crate::validate::validate;

/// Message shown when polling fails without a readable cause.
pub const ROUTE_FETCH_FALLBACK: &str = "Failed to fetch route";

const STATUS_IN_PROGRESS: &str = "in progress";
const STATUS_FAILURE: &str = "failure";

/// How the polling client behaves while a job is still in progress.
///
/// The default re-issues the status request immediately and never gives up,
/// so termination depends entirely on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollPolicy {
    /// Delay inserted after each "in progress" answer.
    pub interval: Duration,
    /// Give up after this many status requests.
    pub max_attempts: Option<u32>,
}

impl PollPolicy {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Whether `attempts` status requests use up the allowed polls.
    fn exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}

/// The two route API operations the orchestrator sequences.
pub trait RouteBackend: Send + Sync {
    /// Submit an origin/destination pair and obtain a job token.
    fn get_route_token(
        &self,
        origin: &str,
        destination: &str,
    ) -> impl Future<Output = ApiOutcome<RouteToken>> + Send;

    /// Poll the job identified by `token` until it settles.
    fn get_route_path_by_token(
        &self,
        token: RouteToken,
    ) -> impl Future<Output = ApiOutcome<RouteResult>> + Send;
}

/// HTTP client for the route API.
#[derive(Debug, Clone)]
pub struct RouteApiClient {
    http: Client,
    base_url: Url,
    poll: PollPolicy,
}

#[derive(Serialize)]
struct SubmitRouteBody<'a> {
    origin: &'a str,
    destination: &'a str,
}

#[derive(Deserialize)]
struct TokenBody {
    token: String,
}

impl RouteApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = config.build_http_client()?;
        Ok(Self::with_client(http, &config.api_base_url)?.with_poll_policy(config.poll))
    }

    /// Build a client around an existing HTTP client.
    pub fn with_client(http: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| Error::InvalidConfig {
                name: "api_base_url",
                value: base_url.to_string(),
            })?;
        Ok(Self {
            http,
            base_url,
            poll: PollPolicy::default(),
        })
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Submit a route request. Exactly one network call, no retries.
    pub async fn get_route_token(&self, origin: &str, destination: &str) -> ApiOutcome<RouteToken> {
        let fallback = format!(
            "Failed to fetch route token for origin: {origin}, and destination: {destination}"
        );
        match self.submit_route(origin, destination).await {
            Ok(token) => {
                debug!(token = %token, "route token issued");
                ApiOutcome::Success(token)
            }
            Err(err) => {
                warn!(kind = ?err.kind(), error = %err, "route submission failed");
                ApiOutcome::Error {
                    message: classify(&err, &fallback),
                }
            }
        }
    }

    /// Poll for the route identified by `token` until it settles.
    pub async fn get_route_path_by_token(&self, token: RouteToken) -> ApiOutcome<RouteResult> {
        match self.poll_route(&token).await {
            Ok(result) => {
                info!(
                    token = %token,
                    waypoints = result.path.len(),
                    total_distance = result.total_distance,
                    total_time = result.total_time,
                    "route resolved"
                );
                ApiOutcome::Success(result)
            }
            Err(err) => {
                warn!(token = %token, kind = ?err.kind(), error = %err, "route polling failed");
                ApiOutcome::Error {
                    message: classify(&err, ROUTE_FETCH_FALLBACK),
                }
            }
        }
    }

    async fn submit_route(&self, origin: &str, destination: &str) -> Result<RouteToken> {
        let url = self.endpoint(&["route"])?;
        let response = self
            .http
            .post(url)
            .json(&SubmitRouteBody {
                origin,
                destination,
            })
            .send()
            .await?;

        let body = read_json(response).await?;
        validate(&ROUTE_TOKEN_SHAPE, &body)?;
        let TokenBody { token } = serde_json::from_value(body)?;
        Ok(RouteToken::new(token))
    }

    async fn poll_route(&self, token: &RouteToken) -> Result<RouteResult> {
        let url = self.endpoint(&["route", token.as_str()])?;
        let mut attempts: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);
            let response = self.http.get(url.clone()).send().await?;
            let body = read_json(response).await?;

            match body.get("status").and_then(Value::as_str) {
                Some(STATUS_IN_PROGRESS) => {
                    debug!(token = %token, attempt = attempts, "route still in progress");
                    if self.poll.exhausted(attempts) {
                        return Err(Error::PollLimitExceeded { attempts });
                    }
                    if !self.poll.interval.is_zero() {
                        tokio::time::sleep(self.poll.interval).await;
                    }
                    continue;
                }
                Some(STATUS_FAILURE) => {
                    let message = body
                        .get("error")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    return Err(Error::Domain { message });
                }
                _ => {}
            }

            validate(&ROUTE_RESULT_SHAPE, &body)?;
            return Ok(serde_json::from_value(body)?);
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidConfig {
                name: "api_base_url",
                value: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl RouteBackend for RouteApiClient {
    fn get_route_token(
        &self,
        origin: &str,
        destination: &str,
    ) -> impl Future<Output = ApiOutcome<RouteToken>> + Send {
        RouteApiClient::get_route_token(self, origin, destination)
    }

    fn get_route_path_by_token(
        &self,
        token: RouteToken,
    ) -> impl Future<Output = ApiOutcome<RouteResult>> + Send {
        RouteApiClient::get_route_path_by_token(self, token)
    }
}

/// Reject non-success statuses, then decode the body as JSON.
pub(crate) async fn read_json(response: Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            status: status.as_u16(),
        });
    }
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
