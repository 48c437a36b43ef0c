//! Google Routes API client
//!
//! API documentation:
//! https://developers.google.com/maps/documentation/routes/reference/rest/v2/TopLevel/computeRoutes

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::RouteQuantile;
use crate::defaults::{MAX_ROUTE_DURATION_SECS, ROUTES_API_URL};
use crate::error::RoutingError;
use crate::types::{RouteSample, TrafficModel};

/// Only the fields the planner reads are requested
const FIELD_MASK: &str = "routes.duration,routes.distanceMeters,routes.polyline.encodedPolyline";

/// Google Routes client configuration
#[derive(Debug, Clone)]
pub struct GoogleRoutesConfig {
    /// computeRoutes endpoint
    pub base_url: String,
    pub api_key: String,
}

impl GoogleRoutesConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: ROUTES_API_URL.to_string(),
            api_key: api_key.into(),
        }
    }
}

/// Google Routes client
pub struct GoogleRoutesClient {
    client: Client,
    config: GoogleRoutesConfig,
}

impl GoogleRoutesClient {
    /// `client` carries the timeout; it is shared with the geocoder
    pub fn new(client: Client, config: GoogleRoutesConfig) -> Self {
        Self { client, config }
    }

    fn build_request(
        &self,
        origin: &str,
        destination: &str,
        departure: DateTime<Utc>,
        traffic_model: TrafficModel,
    ) -> ComputeRoutesRequest {
        ComputeRoutesRequest {
            origin: Waypoint { address: origin.to_string() },
            destination: Waypoint { address: destination.to_string() },
            travel_mode: "DRIVE",
            // trafficModel is only honoured with TRAFFIC_AWARE_OPTIMAL
            routing_preference: "TRAFFIC_AWARE_OPTIMAL",
            departure_time: departure.to_rfc3339_opts(SecondsFormat::Secs, true),
            traffic_model,
            compute_alternative_routes: false,
        }
    }
}

#[async_trait]
impl RouteQuantile for GoogleRoutesClient {
    async fn query(
        &self,
        origin: &str,
        destination: &str,
        departure: DateTime<Utc>,
        traffic_model: TrafficModel,
    ) -> Result<RouteSample, RoutingError> {
        let request = self.build_request(origin, destination, departure, traffic_model);

        debug!(
            "Requesting {} route departing {}",
            traffic_model, request.departure_time
        );

        let response = self
            .client
            .post(&self.config.base_url)
            .header("X-Goog-Api-Key", &self.config.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(RoutingError::Status { status, body });
        }

        let parsed: ComputeRoutesResponse = response.json().await?;
        let sample = sample_from_response(parsed, traffic_model)?;

        debug!(
            "{} route: {}s, {}m",
            traffic_model, sample.duration_secs, sample.distance_meters
        );

        Ok(sample)
    }

    fn name(&self) -> &str {
        "GoogleRoutes"
    }
}

/// Parse a protobuf-style duration such as `"3600s"`
pub fn parse_duration_secs(raw: &str) -> Result<u64, RoutingError> {
    let secs = raw
        .strip_suffix('s')
        .and_then(|digits| digits.parse::<u64>().ok())
        .ok_or_else(|| RoutingError::InvalidDuration(raw.to_string()))?;

    if secs > MAX_ROUTE_DURATION_SECS {
        return Err(RoutingError::DurationOutOfRange(secs));
    }
    Ok(secs)
}

fn sample_from_response(
    response: ComputeRoutesResponse,
    traffic_model: TrafficModel,
) -> Result<RouteSample, RoutingError> {
    let route = response.routes.into_iter().next().ok_or(RoutingError::NoRoutes)?;
    let duration = route.duration.as_deref().unwrap_or_default();

    Ok(RouteSample {
        duration_secs: parse_duration_secs(duration)?,
        distance_meters: route.distance_meters,
        traffic_model,
        polyline: route.polyline.and_then(|p| p.encoded_polyline),
    })
}

// Routes API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRoutesRequest {
    origin: Waypoint,
    destination: Waypoint,
    travel_mode: &'static str,
    routing_preference: &'static str,
    departure_time: String,
    traffic_model: TrafficModel,
    compute_alternative_routes: bool,
}

#[derive(Debug, Serialize)]
struct Waypoint {
    address: String,
}

#[derive(Debug, Deserialize)]
struct ComputeRoutesResponse {
    /// Omitted entirely when no route exists
    #[serde(default)]
    routes: Vec<ApiRoute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRoute {
    duration: Option<String>,
    /// Omitted when zero
    #[serde(default)]
    distance_meters: u64,
    polyline: Option<ApiPolyline>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPolyline {
    encoded_polyline: Option<String>,
}
