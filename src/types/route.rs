//! Routing types

use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Traffic prediction model offered by the routing service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrafficModel {
    BestGuess,
    Optimistic,
    Pessimistic,
}

impl TrafficModel {
    pub const fn as_str(self) -> &'static str {
        match self {
            TrafficModel::BestGuess => "BEST_GUESS",
            TrafficModel::Optimistic => "OPTIMISTIC",
            TrafficModel::Pessimistic => "PESSIMISTIC",
        }
    }
}

impl std::fmt::Display for TrafficModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one traffic-model query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSample {
    /// Drive duration in seconds
    pub duration_secs: u64,
    /// Road distance in meters
    pub distance_meters: u64,
    pub traffic_model: TrafficModel,
    /// Encoded route polyline, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polyline: Option<String>,
}
