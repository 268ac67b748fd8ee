use thiserror::Error;

use crate::validate::ValidationError;

/// Convenient result alias for the driveroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The request was rejected before any response existed.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A response arrived with a non-success status code.
    #[error("unexpected response status {status}")]
    HttpStatus { status: u16 },

    /// The response body could not be decoded as JSON.
    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The decoded payload did not match the declared shape.
    #[error(transparent)]
    Shape(#[from] ValidationError),

    /// The payload was well formed but reported a failed computation.
    #[error("{}", domain_message(.message))]
    Domain { message: Option<String> },

    /// Polling gave up after the configured number of attempts.
    #[error("route still in progress after {attempts} polls")]
    PollLimitExceeded { attempts: u32 },

    /// A coordinate string could not be parsed as decimal degrees.
    #[error("invalid coordinate component {value:?}")]
    InvalidCoordinate { value: String },

    /// Raised when a directions lookup receives too few waypoints.
    #[error("route requires at least {required} waypoints, got {actual}")]
    NotEnoughWaypoints { required: usize, actual: usize },

    /// An encoded polyline contained a byte outside the encoding alphabet.
    #[error("invalid polyline character {character:?} at offset {offset}")]
    PolylineInvalidCharacter { character: char, offset: usize },

    /// An encoded polyline ended in the middle of a value.
    #[error("polyline truncated at offset {offset}")]
    PolylineTruncated { offset: usize },

    /// An encoded polyline value did not fit in 64 bits.
    #[error("polyline value overflows at offset {offset}")]
    PolylineOverflow { offset: usize },

    /// A coordinate could not be scaled into a polyline value.
    #[error("coordinate {value} cannot be encoded as a polyline value")]
    PolylineCoordinateOutOfRange { value: f64 },

    /// A required configuration value was not provided.
    #[error("missing configuration value {name}")]
    MissingConfig { name: &'static str },

    /// A configuration value could not be parsed.
    #[error("invalid configuration value {name}={value:?}")]
    InvalidConfig { name: &'static str, value: String },
}

/// Coarse classification of a failure, independent of its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Call rejected before a response existed.
    Transport,
    /// Response received with a non-success status.
    Http,
    /// Response received but failed shape validation or decoding.
    Shape,
    /// Response valid but reporting a failed computation.
    Domain,
    /// Local failures (configuration, codec, polling limits).
    Local,
}

impl Error {
    /// Classify this error into one of the failure kinds.
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Transport(_) => FailureKind::Transport,
            Error::HttpStatus { .. } => FailureKind::Http,
            Error::Decode(_) | Error::Shape(_) => FailureKind::Shape,
            Error::Domain { .. } => FailureKind::Domain,
            _ => FailureKind::Local,
        }
    }
}

fn domain_message(message: &Option<String>) -> &str {
    match message.as_deref() {
        Some(message) if !message.trim().is_empty() => message,
        _ => "route computation reported failure",
    }
}
