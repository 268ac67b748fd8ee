//! Domain types shared by the route clients, the orchestrator and renderers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classify::{classify, FailureCause};
use crate::error::{Error, Result};

/// A `(latitude, longitude)` pair of decimal-degree strings.
///
/// On the wire a coordinate is a two-element array: `["22.372081", "114.107877"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Coordinate {
    latitude: String,
    longitude: String,
}

impl Coordinate {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }

    pub fn latitude(&self) -> &str {
        &self.latitude
    }

    pub fn longitude(&self) -> &str {
        &self.longitude
    }

    /// Parse both components into numeric degrees.
    pub fn to_lat_lng(&self) -> Result<LatLng> {
        Ok(LatLng {
            lat: parse_degrees(&self.latitude)?,
            lng: parse_degrees(&self.longitude)?,
        })
    }
}

fn parse_degrees(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| Error::InvalidCoordinate {
            value: raw.to_string(),
        })
}

impl From<(String, String)> for Coordinate {
    fn from((latitude, longitude): (String, String)) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<Coordinate> for (String, String) {
    fn from(value: Coordinate) -> Self {
        (value.latitude, value.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// A numeric point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Opaque identifier of a submitted route-computation job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteToken(String);

impl RouteToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A computed driving route.
///
/// Serializes to the same snake_case form the route API uses on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Ordered waypoints from origin to destination.
    pub path: Vec<Coordinate>,
    pub total_distance: f64,
    pub total_time: f64,
}

impl RouteResult {
    pub fn origin(&self) -> Option<&Coordinate> {
        self.path.first()
    }

    pub fn destination(&self) -> Option<&Coordinate> {
        self.path.last()
    }
}

/// Result of a network-facing operation.
///
/// Failures never escape a client as errors or panics; they arrive here as a
/// classified message.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    Success(T),
    Error { message: String },
}

impl<T> ApiOutcome<T> {
    /// Fold a fallible result into an outcome, classifying the failure.
    pub fn classified<E: FailureCause>(
        result: std::result::Result<T, E>,
        fallback: &str,
    ) -> Self {
        match result {
            Ok(value) => ApiOutcome::Success(value),
            Err(err) => ApiOutcome::Error {
                message: classify(&err, fallback),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiOutcome::Success(_))
    }

    pub fn into_result(self) -> std::result::Result<T, String> {
        match self {
            ApiOutcome::Success(value) => Ok(value),
            ApiOutcome::Error { message } => Err(message),
        }
    }
}
