//! Driveroute library entry points.
//!
//! This crate resolves a pair of user-entered locations into a driving route
//! by talking to a job-style route API (submit, then poll until done). It
//! validates every payload before trusting it, folds every failure into a
//! single user-facing message, and drives a small submission state machine
//! that front ends (CLI, services) observe and mutate through a shared handle.
//!
//! Higher-level consumers should only depend on the items exported here.

#![deny(warnings)]

pub mod api;
pub mod classify;
pub mod config;
pub mod error;
pub mod logging;
pub mod maps;
pub mod orchestrator;
pub mod polyline;
pub mod schemas;
pub mod types;
pub mod validate;

pub use api::{PollPolicy, RouteApiClient, RouteBackend};
pub use classify::{classify, FailureCause};
pub use config::ClientConfig;
pub use error::{Error, FailureKind, Result};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use maps::{LocationBias, MapsClient};
pub use orchestrator::{
    NoopRenderer, RouteOrchestrator, RouteRenderer, Settlement, SubmissionPhase, SubmissionState,
};
pub use polyline::{decode_polyline, encode_polyline, GOOGLE_PRECISION};
pub use types::{ApiOutcome, Coordinate, LatLng, RouteResult, RouteToken};
pub use validate::{validate, Field, Shape, ValidationError};
