//! Places autocomplete and directions lookups.
//!
//! Both lookups are best effort: any failure (missing key, transport, status,
//! unexpected shape) is logged and reported as `None`.

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::read_json;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::polyline::{decode_polyline, GOOGLE_PRECISION};
use crate::schemas::{AUTOCOMPLETE_SHAPE, DIRECTIONS_SHAPE};
use crate::types::{Coordinate, LatLng};
use crate::validate::validate;

pub const PLACES_AUTOCOMPLETE_URL: &str = "https://places.googleapis.com/v1/places:autocomplete";
pub const ROUTES_COMPUTE_URL: &str = "https://routes.googleapis.com/directions/v2:computeRoutes";

const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";
const POLYLINE_FIELD_MASK: &str = "routes.polyline.encodedPolyline";
const SUGGESTION_TEXT_POINTER: &str = "/placePrediction/text/text";

/// Circle that autocomplete results are biased towards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationBias {
    pub center: LatLng,
    /// Radius in metres.
    pub radius: f64,
}

impl Default for LocationBias {
    /// Central Hong Kong, 50 km.
    fn default() -> Self {
        Self {
            center: LatLng::new(22.302711, 114.177216),
            radius: 50_000.0,
        }
    }
}

/// Client for the places and directions endpoints.
#[derive(Debug, Clone)]
pub struct MapsClient {
    http: Client,
    api_key: Option<String>,
    autocomplete_url: String,
    routes_url: String,
    bias: LocationBias,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AutocompleteRequest<'a> {
    input: &'a str,
    location_bias: LocationBiasBody,
}

#[derive(Serialize)]
struct LocationBiasBody {
    circle: CircleBody,
}

#[derive(Serialize)]
struct CircleBody {
    center: LatLngBody,
    radius: f64,
}

#[derive(Debug, Serialize)]
struct LatLngBody {
    latitude: f64,
    longitude: f64,
}

impl From<LatLng> for LatLngBody {
    fn from(point: LatLng) -> Self {
        Self {
            latitude: point.lat,
            longitude: point.lng,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Waypoint {
    location: WaypointLocation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WaypointLocation {
    lat_lng: LatLngBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRoutesRequest {
    origin: Waypoint,
    destination: Waypoint,
    intermediates: Vec<Waypoint>,
    travel_mode: &'static str,
    compute_alternative_routes: bool,
}

impl MapsClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = config.build_http_client()?;
        Ok(Self::with_client(http, config.maps_api_key.clone()))
    }

    pub fn with_client(http: Client, api_key: Option<String>) -> Self {
        Self {
            http,
            api_key,
            autocomplete_url: PLACES_AUTOCOMPLETE_URL.to_string(),
            routes_url: ROUTES_COMPUTE_URL.to_string(),
            bias: LocationBias::default(),
        }
    }

    /// Point both lookups at other hosts.
    pub fn with_endpoints(
        mut self,
        autocomplete_url: impl Into<String>,
        routes_url: impl Into<String>,
    ) -> Self {
        self.autocomplete_url = autocomplete_url.into();
        self.routes_url = routes_url.into();
        self
    }

    pub fn with_location_bias(mut self, bias: LocationBias) -> Self {
        self.bias = bias;
        self
    }

    /// Place suggestions for a partial search term.
    ///
    /// An empty term yields no suggestions without issuing a request.
    pub async fn autocomplete(&self, term: &str) -> Option<Vec<String>> {
        if term.trim().is_empty() {
            return Some(Vec::new());
        }
        match self.fetch_suggestions(term).await {
            Ok(suggestions) => {
                debug!(term, count = suggestions.len(), "autocomplete suggestions");
                Some(suggestions)
            }
            Err(err) => {
                warn!(term, kind = ?err.kind(), error = %err, "autocomplete failed");
                None
            }
        }
    }

    /// Encoded driving polyline through `waypoints`, in order.
    pub async fn route_polyline(&self, waypoints: &[Coordinate]) -> Option<String> {
        match self.fetch_polyline(waypoints).await {
            Ok(polyline) => Some(polyline),
            Err(err) => {
                warn!(
                    waypoints = waypoints.len(),
                    kind = ?err.kind(),
                    error = %err,
                    "failed to get route polyline"
                );
                None
            }
        }
    }

    /// Decoded driving geometry through `waypoints`.
    pub async fn route_geometry(&self, waypoints: &[Coordinate]) -> Option<Vec<LatLng>> {
        let encoded = self.route_polyline(waypoints).await?;
        match decode_polyline(&encoded, GOOGLE_PRECISION) {
            Ok(points) => Some(points),
            Err(err) => {
                warn!(error = %err, "directions returned an undecodable polyline");
                None
            }
        }
    }

    async fn fetch_suggestions(&self, term: &str) -> Result<Vec<String>> {
        let body = AutocompleteRequest {
            input: term,
            location_bias: LocationBiasBody {
                circle: CircleBody {
                    center: self.bias.center.into(),
                    radius: self.bias.radius,
                },
            },
        };
        let request = self.authorized(self.http.post(&self.autocomplete_url))?;
        let json = read_json(request.json(&body).send().await?).await?;
        validate(&AUTOCOMPLETE_SHAPE, &json)?;

        let suggestions = json
            .get("suggestions")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.pointer(SUGGESTION_TEXT_POINTER))
                    .filter_map(Value::as_str)
                    .filter(|text| !text.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(suggestions)
    }

    async fn fetch_polyline(&self, waypoints: &[Coordinate]) -> Result<String> {
        let body = compute_routes_request(waypoints)?;
        let request = self
            .authorized(self.http.post(&self.routes_url))?
            .header(FIELD_MASK_HEADER, POLYLINE_FIELD_MASK);
        let json = read_json(request.json(&body).send().await?).await?;
        validate(&DIRECTIONS_SHAPE, &json)?;

        json.pointer("/routes/0/polyline/encodedPolyline")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(Error::Domain { message: None })
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(Error::MissingConfig {
                name: "GOOGLE_MAPS_API_KEY",
            })?;
        Ok(request.header(API_KEY_HEADER, key))
    }
}

fn compute_routes_request(waypoints: &[Coordinate]) -> Result<ComputeRoutesRequest> {
    let mut points = waypoints
        .iter()
        .map(|coordinate| {
            coordinate.to_lat_lng().map(|point| Waypoint {
                location: WaypointLocation {
                    lat_lng: point.into(),
                },
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if points.len() < 2 {
        return Err(Error::NotEnoughWaypoints {
            required: 2,
            actual: points.len(),
        });
    }
    let destination = points.pop().ok_or(Error::NotEnoughWaypoints {
        required: 2,
        actual: 0,
    })?;
    let origin = points.remove(0);

    Ok(ComputeRoutesRequest {
        origin,
        destination,
        intermediates: points,
        travel_mode: "DRIVE",
        compute_alternative_routes: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compute_routes_body_splits_waypoints() {
        let waypoints = vec![
            Coordinate::new("22.372081", "114.107877"),
            Coordinate::new("22.326442", "114.167811"),
            Coordinate::new("22.284419", "114.159510"),
        ];
        let body = serde_json::to_value(compute_routes_request(&waypoints).unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "origin": { "location": { "latLng": { "latitude": 22.372081, "longitude": 114.107877 } } },
                "destination": { "location": { "latLng": { "latitude": 22.284419, "longitude": 114.15951 } } },
                "intermediates": [
                    { "location": { "latLng": { "latitude": 22.326442, "longitude": 114.167811 } } }
                ],
                "travelMode": "DRIVE",
                "computeAlternativeRoutes": false
            })
        );
    }

    #[test]
    fn compute_routes_body_needs_two_waypoints() {
        let err = compute_routes_request(&[Coordinate::new("1", "2")]).unwrap_err();
        assert!(matches!(
            err,
            Error::NotEnoughWaypoints {
                required: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn compute_routes_body_rejects_unparseable_coordinates() {
        let waypoints = vec![Coordinate::new("1", "2"), Coordinate::new("x", "2")];
        assert!(matches!(
            compute_routes_request(&waypoints),
            Err(Error::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn autocomplete_body_carries_location_bias() {
        let bias = LocationBias::default();
        let body = serde_json::to_value(AutocompleteRequest {
            input: "Tsim",
            location_bias: LocationBiasBody {
                circle: CircleBody {
                    center: bias.center.into(),
                    radius: bias.radius,
                },
            },
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "input": "Tsim",
                "locationBias": {
                    "circle": {
                        "center": { "latitude": 22.302711, "longitude": 114.177216 },
                        "radius": 50000.0
                    }
                }
            })
        );
    }
}
