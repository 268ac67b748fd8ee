//! Route job bookkeeping and the two route handlers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use driveroute_lib::{Coordinate, RouteResult};

use crate::problem::ProblemDetails;

/// Failure reported for jobs that mention an unreachable location.
pub const UNREACHABLE_MESSAGE: &str = "Location not accessible by car";

const UNREACHABLE_MARKER: &str = "unreachable";

/// How long a settled job keeps answering polls before it is forgotten.
pub const DEFAULT_SETTLED_GRACE: Duration = Duration::from_secs(60);

/// Request validation.
///
/// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
pub trait Validate {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// Body of `POST /route`. Missing fields read as empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRouteRequest {
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
}

impl Validate for SubmitRouteRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if self.origin.trim().is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'origin' field is required and cannot be empty",
                request_id,
            )));
        }
        if self.destination.trim().is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'destination' field is required and cannot be empty",
                request_id,
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    token: String,
}

/// Body of `GET /route/{token}`.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum PollResponse {
    #[serde(rename = "in progress")]
    InProgress,
    Success(RouteResult),
    Failure { error: String },
}

#[derive(Debug)]
struct Job {
    origin: String,
    destination: String,
    pending_polls: u32,
    settled_at: Option<Instant>,
}

impl Job {
    fn is_unreachable(&self) -> bool {
        [&self.origin, &self.destination]
            .iter()
            .any(|place| place.to_lowercase().contains(UNREACHABLE_MARKER))
    }

    fn settle(&self, token: &str) -> PollResponse {
        if self.is_unreachable() {
            debug!(token = %token, "route job failed");
            PollResponse::Failure {
                error: UNREACHABLE_MESSAGE.to_string(),
            }
        } else {
            debug!(token = %token, "route job succeeded");
            PollResponse::Success(canned_route())
        }
    }
}

/// Shared mock state; cheap to clone.
#[derive(Clone)]
pub struct MockState {
    inner: Arc<MockStateInner>,
}

struct MockStateInner {
    pending_polls: u32,
    settled_grace: Duration,
    jobs: Mutex<HashMap<String, Job>>,
}

impl MockState {
    /// Jobs answer "in progress" `pending_polls` times before settling.
    pub fn new(pending_polls: u32) -> Self {
        Self::with_settled_grace(pending_polls, DEFAULT_SETTLED_GRACE)
    }

    /// Like [`MockState::new`], but settled jobs are evicted once `grace`
    /// has passed since they settled.
    pub fn with_settled_grace(pending_polls: u32, grace: Duration) -> Self {
        Self {
            inner: Arc::new(MockStateInner {
                pending_polls,
                settled_grace: grace,
                jobs: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn pending_polls(&self) -> u32 {
        self.inner.pending_polls
    }

    /// Number of jobs submitted so far.
    pub fn job_count(&self) -> usize {
        self.jobs().len()
    }

    fn jobs(&self) -> MutexGuard<'_, HashMap<String, Job>> {
        self.inner.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop settled jobs whose grace period has run out.
    fn evict_settled(&self, jobs: &mut HashMap<String, Job>) {
        let grace = self.inner.settled_grace;
        let before = jobs.len();
        jobs.retain(|_, job| {
            job.settled_at
                .is_none_or(|settled_at| settled_at.elapsed() < grace)
        });
        let evicted = before - jobs.len();
        if evicted > 0 {
            debug!(evicted, remaining = jobs.len(), "evicted settled route jobs");
        }
    }
}

/// The path every reachable job settles with.
pub fn canned_route() -> RouteResult {
    RouteResult {
        path: vec![
            Coordinate::new("22.372081", "114.107877"),
            Coordinate::new("22.326442", "114.167811"),
            Coordinate::new("22.284419", "114.159510"),
        ],
        total_distance: 20000.0,
        total_time: 1800.0,
    }
}

/// Handle `POST /route`.
pub async fn submit_route(
    State(state): State<MockState>,
    Json(request): Json<SubmitRouteRequest>,
) -> Response {
    let request_id = generate_request_id();

    if let Err(problem) = request.validate(&request_id) {
        warn!(request_id = %request_id, detail = ?problem.detail, "rejected route submission");
        return problem.into_response();
    }

    let token = Uuid::now_v7().to_string();
    info!(
        request_id = %request_id,
        token = %token,
        origin = %request.origin,
        destination = %request.destination,
        "route job submitted"
    );

    {
        let mut jobs = state.jobs();
        state.evict_settled(&mut jobs);
        jobs.insert(
            token.clone(),
            Job {
                origin: request.origin,
                destination: request.destination,
                pending_polls: state.pending_polls(),
                settled_at: None,
            },
        );
    }

    (StatusCode::OK, Json(TokenResponse { token })).into_response()
}

/// Handle `GET /route/{token}`.
pub async fn poll_route(State(state): State<MockState>, Path(token): Path<String>) -> Response {
    let response = {
        let mut jobs = state.jobs();
        state.evict_settled(&mut jobs);
        let Some(job) = jobs.get_mut(&token) else {
            let request_id = generate_request_id();
            warn!(request_id = %request_id, token = %token, "poll for unknown token");
            return ProblemDetails::unknown_token(&token, request_id).into_response();
        };

        if job.pending_polls > 0 {
            job.pending_polls -= 1;
            debug!(token = %token, remaining = job.pending_polls, "route job in progress");
            PollResponse::InProgress
        } else {
            job.settled_at.get_or_insert_with(Instant::now);
            job.settle(&token)
        }
    };


    (StatusCode::OK, Json(response)).into_response()
}

fn generate_request_id() -> String {
    format!("req-{}", Uuid::now_v7().simple())
}
