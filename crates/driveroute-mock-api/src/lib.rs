//! Local stand-in for the job-style route API.
//!
//! Serves the same contract the route clients speak, so the CLI and the
//! library can be exercised end to end without the hosted service.
//!
//! # Endpoints
//!
//! - `POST /route` - Submit `{origin, destination}`, returns `{token}`
//! - `GET /route/{token}` - Poll a submitted job
//! - `GET /health/live` - Liveness probe
//!
//! A job answers `{"status": "in progress"}` for the configured number of
//! polls, then settles. Jobs whose origin or destination mentions
//! `unreachable` settle as failures; all others return a canned path.

pub mod config;
pub mod health;
pub mod jobs;
pub mod problem;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use config::MockConfig;
pub use health::{health_live, HealthStatus};
pub use jobs::{poll_route, submit_route, MockState, SubmitRouteRequest, Validate};
pub use problem::ProblemDetails;

/// Build the mock API router around `state`.
pub fn router(state: MockState) -> Router {
    Router::new()
        .route("/route", post(submit_route))
        .route("/route/{token}", get(poll_route))
        .route("/health/live", get(health_live))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
