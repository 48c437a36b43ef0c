//! Error taxonomy for travel planning
//!
//! Routing failures trigger the distance-based fallback; geocoding failures are
//! only ever seen by the fallback and are kept as a secondary cause when both
//! paths fail.

use thiserror::Error;

/// Failure of a single traffic-aware routing query
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Network failure, timeout or undecodable body
    #[error("routing request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Routing service answered with a non-2xx status
    #[error("routing service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response contained an empty `routes` array
    #[error("routing service returned no routes")]
    NoRoutes,

    /// Duration was not `<integer>s`
    #[error("unparseable route duration '{0}'")]
    InvalidDuration(String),

    /// Duration parsed but is longer than any plausible drive
    #[error("route duration {0}s is out of range")]
    DurationOutOfRange(u64),
}

/// Failure to turn a free-text address into coordinates
#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service-level status other than `OK`, e.g. `REQUEST_DENIED`
    #[error("geocoding '{address}' failed with status {status}")]
    Status { address: String, status: String },

    #[error("no geocoding results for '{address}'")]
    NoResults { address: String },

    #[error("geocoding '{address}' returned non-finite coordinates")]
    InvalidCoordinates { address: String },
}

/// Error surfaced by [`crate::services::planner::TravelPlanner::compose_plan`]
#[derive(Debug, Error)]
pub enum TravelError {
    /// A required input is empty; raised before any external call
    #[error("need {0} to calculate travel time")]
    MissingInput(&'static str),

    /// An input is present but cannot be parsed
    #[error("invalid {field}: '{value}'")]
    InvalidInput { field: &'static str, value: String },

    /// Live routing failed and the distance estimate failed too.
    ///
    /// Only the routing error is displayed; the geocoding error is kept so
    /// callers and logs can still inspect it.
    #[error("unable to calculate travel time: live travel data unavailable ({routing})")]
    TravelTimeUnavailable {
        #[source]
        routing: RoutingError,
        fallback: GeocodingError,
    },
}

impl TravelError {
    /// Secondary cause of a total failure, if any
    pub fn fallback_error(&self) -> Option<&GeocodingError> {
        match self {
            TravelError::TravelTimeUnavailable { fallback, .. } => Some(fallback),
            _ => None,
        }
    }

    /// Stable code for the presentation layer
    pub const fn code(&self) -> &'static str {
        match self {
            TravelError::MissingInput(_) => "MISSING_INPUT",
            TravelError::InvalidInput { .. } => "INVALID_INPUT",
            TravelError::TravelTimeUnavailable { .. } => "TRAVEL_TIME_UNAVAILABLE",
        }
    }
}
