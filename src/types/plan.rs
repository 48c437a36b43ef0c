//! Travel plan output type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TrafficModel;

/// How a non-live duration was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationMethod {
    /// Great-circle distance with road and safety multipliers
    Haversine,
}

/// Composed wake-up / departure guidance for one game.
///
/// Instants are ISO-8601 strings with an explicit numeric offset in the game's
/// timezone; `calculated_at` is absolute UTC.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPlan {
    /// Effective drive duration used for departure arithmetic (seconds)
    pub duration_secs: u64,
    /// Effective duration rendered as "1h 5m"
    pub duration_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_low_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_high_secs: Option<u64>,
    /// Road distance in meters
    pub distance_meters: u64,
    /// Traffic model that produced `duration_secs`, absent for estimates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_model: Option<TrafficModel>,
    /// Resolved IANA zone of the formatted instants
    pub timezone: String,
    pub game_time: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub wake_up_time: String,
    pub is_estimated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimation_method: Option<EstimationMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
    pub navigation_url: String,
    pub calculated_at: DateTime<Utc>,
}
