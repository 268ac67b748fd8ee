//! Submission state machine shared by route front ends.
//!
//! A [`RouteOrchestrator`] owns the two location inputs and the outcome of the
//! most recent submission. Submitting walks
//! `Idle -> Validating -> Submitting -> Polling -> Settled`, and resetting
//! returns to `Idle`. The handle is cheap to clone; every clone observes and
//! mutates the same state.
//!
//! The state lock is never held across an `.await`. Each submission and each
//! reset starts a new generation, and a submission that settles after a reset
//! only clears `is_loading`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::api::RouteBackend;
use crate::classify::classify;
use crate::types::{ApiOutcome, Coordinate, RouteResult};

/// Message shown when a submission fails without a readable cause.
pub const SUBMIT_FALLBACK: &str = "Failed to fetch route data";

/// Surface that draws the active route.
pub trait RouteRenderer: Send + Sync {
    /// Draw `path` as the active route.
    fn show_route(&self, path: &[Coordinate]);
    /// Remove any active route.
    fn clear_route(&self);
}

impl<T: RouteRenderer + ?Sized> RouteRenderer for Arc<T> {
    fn show_route(&self, path: &[Coordinate]) {
        (**self).show_route(path)
    }

    fn clear_route(&self) {
        (**self).clear_route()
    }
}

/// Renderer for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderer;

impl RouteRenderer for NoopRenderer {
    fn show_route(&self, _path: &[Coordinate]) {}

    fn clear_route(&self) {}
}

/// How a submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Polling,
    Settled(Settlement),
}

/// Observable state of the orchestrator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmissionState {
    pub starting_location: String,
    pub dropoff_location: String,
    /// True while a submission is in flight.
    pub is_loading: bool,
    pub error: Option<String>,
    pub result: Option<RouteResult>,
    /// Required-field flags for `[starting_location, dropoff_location]`.
    pub input_required: [bool; 2],
    pub phase: SubmissionPhase,
}

#[derive(Debug, Default)]
struct Tracked {
    state: SubmissionState,
    generation: u64,
}

impl Tracked {
    fn set_phase(&mut self, phase: SubmissionPhase) {
        debug!(from = ?self.state.phase, to = ?phase, "submission phase");
        self.state.phase = phase;
    }
}

struct Inner<B, R> {
    backend: B,
    renderer: R,
    state: Mutex<Tracked>,
}

/// Shared handle to the submission state machine.
pub struct RouteOrchestrator<B, R> {
    inner: Arc<Inner<B, R>>,
}

impl<B, R> Clone for RouteOrchestrator<B, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: RouteBackend, R: RouteRenderer> RouteOrchestrator<B, R> {
    pub fn new(backend: B, renderer: R) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                renderer,
                state: Mutex::new(Tracked::default()),
            }),
        }
    }

    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    pub fn renderer(&self) -> &R {
        &self.inner.renderer
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SubmissionState {
        self.lock().state.clone()
    }

    pub fn set_starting_location(&self, value: impl Into<String>) {
        let value = value.into();
        let mut tracked = self.lock();
        if !value.trim().is_empty() {
            tracked.state.input_required[0] = false;
        }
        tracked.state.starting_location = value;
    }

    pub fn set_dropoff_location(&self, value: impl Into<String>) {
        let value = value.into();
        let mut tracked = self.lock();
        if !value.trim().is_empty() {
            tracked.state.input_required[1] = false;
        }
        tracked.state.dropoff_location = value;
    }

    /// Clear both inputs and any outcome. Leaves `is_loading` alone.
    pub fn on_reset(&self) {
        {
            let mut tracked = self.lock();
            tracked.generation += 1;
            let state = &mut tracked.state;
            state.starting_location.clear();
            state.dropoff_location.clear();
            state.result = None;
            state.error = None;
            state.input_required = [false, false];
            tracked.set_phase(SubmissionPhase::Idle);
        }
        self.inner.renderer.clear_route();
    }

    /// Resolve the current inputs into a route.
    ///
    /// Ignored while a submission is already in flight. Empty inputs only
    /// raise their required flags.
    pub async fn on_submit(&self) {
        let (origin, destination, generation) = {
            let mut tracked = self.lock();
            if tracked.state.is_loading {
                debug!("submission already in flight");
                return;
            }
            let previous = tracked.state.phase;
            tracked.set_phase(SubmissionPhase::Validating);

            let origin = tracked.state.starting_location.clone();
            let destination = tracked.state.dropoff_location.clone();
            let required = [origin.trim().is_empty(), destination.trim().is_empty()];
            if required.contains(&true) {
                // Any previous outcome is kept along with its phase.
                tracked.state.input_required = required;
                tracked.set_phase(previous);
                return;
            }

            tracked.generation += 1;
            tracked.state.result = None;
            tracked.state.error = None;
            tracked.state.is_loading = true;
            tracked.set_phase(SubmissionPhase::Submitting);
            (origin, destination, tracked.generation)
        };

        let guard = SettleGuard {
            orchestrator: self,
            generation,
            armed: true,
        };

        let outcome = match self
            .inner
            .backend
            .get_route_token(&origin, &destination)
            .await
        {
            ApiOutcome::Success(token) => {
                self.advance(generation, SubmissionPhase::Polling);
                self.inner.backend.get_route_path_by_token(token).await
            }
            ApiOutcome::Error { message } => ApiOutcome::Error { message },
        };

        guard.finish(outcome);
    }

    fn advance(&self, generation: u64, phase: SubmissionPhase) {
        let mut tracked = self.lock();
        if tracked.generation == generation {
            tracked.set_phase(phase);
        }
    }

    fn settle(&self, generation: u64, outcome: ApiOutcome<RouteResult>) {
        let path = {
            let mut tracked = self.lock();
            tracked.state.is_loading = false;
            if tracked.generation != generation {
                debug!(
                    generation,
                    current = tracked.generation,
                    "discarding stale submission"
                );
                return;
            }

            match outcome {
                ApiOutcome::Success(result) => {
                    info!(
                        total_distance = result.total_distance,
                        total_time = result.total_time,
                        "route settled"
                    );
                    let path = result.path.clone();
                    tracked.state.result = Some(result);
                    tracked.state.error = None;
                    tracked.set_phase(SubmissionPhase::Settled(Settlement::Success));
                    Some(path)
                }
                ApiOutcome::Error { message } => {
                    let message = classify(&message, SUBMIT_FALLBACK);
                    info!(error = %message, "route submission failed");
                    tracked.state.result = None;
                    tracked.state.error = Some(message);
                    tracked.set_phase(SubmissionPhase::Settled(Settlement::Error));
                    None
                }
            }
        };

        match path {
            Some(path) => self.inner.renderer.show_route(&path),
            None => self.inner.renderer.clear_route(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tracked> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Settles a submission whose future is dropped before completing.
struct SettleGuard<'a, B: RouteBackend, R: RouteRenderer> {
    orchestrator: &'a RouteOrchestrator<B, R>,
    generation: u64,
    armed: bool,
}

impl<B: RouteBackend, R: RouteRenderer> SettleGuard<'_, B, R> {
    fn finish(mut self, outcome: ApiOutcome<RouteResult>) {
        self.armed = false;
        self.orchestrator.settle(self.generation, outcome);
    }
}

impl<B: RouteBackend, R: RouteRenderer> Drop for SettleGuard<'_, B, R> {
    fn drop(&mut self) {
        if self.armed {
            self.orchestrator.settle(
                self.generation,
                ApiOutcome::Error {
                    message: SUBMIT_FALLBACK.to_string(),
                },
            );
        }
    }
}
