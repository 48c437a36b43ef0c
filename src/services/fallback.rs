//! Distance-based travel estimate used when live routing is unavailable
//!
//! Straight-line distance × road coefficient at an assumed average speed,
//! inflated by a safety multiplier and floored at a minimum duration.

use std::sync::Arc;

use tracing::{debug, info};

use super::geo::haversine_distance;
use super::geocoding::Geocoder;
use crate::error::GeocodingError;
use crate::types::{Coordinates, EstimationMethod};

/// Shown to the user whenever an estimate replaces live traffic data
pub const FALLBACK_DISCLAIMER: &str =
    "Travel time is an estimate based on distance because live traffic data is unavailable. Allow extra time.";

/// Fallback estimator parameters
#[derive(Debug, Clone)]
pub struct FallbackConfig {
    /// Straight line to road distance coefficient
    pub road_coefficient: f64,
    /// Assumed average driving speed in km/h
    pub average_speed_kmh: f64,
    /// Multiplier applied to the raw travel time
    pub safety_multiplier: f64,
    /// Lower bound on the estimate in seconds
    pub min_duration_secs: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            road_coefficient: 1.3,
            average_speed_kmh: 50.0,
            safety_multiplier: 1.2,
            min_duration_secs: 5 * 60,
        }
    }
}

/// Best-effort travel estimate
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackEstimate {
    pub duration_secs: u64,
    /// Estimated road distance in meters
    pub distance_meters: u64,
    pub is_fallback: bool,
    pub method: EstimationMethod,
    pub disclaimer: String,
}

pub struct FallbackEstimator {
    geocoder: Arc<dyn Geocoder>,
    config: FallbackConfig,
}

impl FallbackEstimator {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self::with_config(geocoder, FallbackConfig::default())
    }

    pub fn with_config(geocoder: Arc<dyn Geocoder>, config: FallbackConfig) -> Self {
        Self { geocoder, config }
    }

    /// Geocode both addresses and estimate the drive between them
    pub async fn estimate(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<FallbackEstimate, GeocodingError> {
        let (from, to) = tokio::try_join!(
            self.geocoder.geocode(origin),
            self.geocoder.geocode(destination)
        )?;

        let estimate = self.estimate_between(&from, &to);
        info!(
            "Fallback estimate via {}: {}s over {}m",
            self.geocoder.name(),
            estimate.duration_secs,
            estimate.distance_meters
        );
        Ok(estimate)
    }

    /// Estimate from already-known coordinates
    pub fn estimate_between(&self, from: &Coordinates, to: &Coordinates) -> FallbackEstimate {
        let cfg = &self.config;

        let straight_line_km = haversine_distance(from, to);
        let road_km = straight_line_km * cfg.road_coefficient;
        let raw_secs = road_km / cfg.average_speed_kmh * 3600.0;
        let buffered_secs = (raw_secs * cfg.safety_multiplier).ceil() as u64;
        let duration_secs = buffered_secs.max(cfg.min_duration_secs);

        debug!(
            "Straight line {:.2} km, road {:.2} km, raw {:.0}s, buffered {}s",
            straight_line_km, road_km, raw_secs, buffered_secs
        );

        FallbackEstimate {
            duration_secs,
            distance_meters: (road_km * 1000.0).round() as u64,
            is_fallback: true,
            method: EstimationMethod::Haversine,
            disclaimer: FALLBACK_DISCLAIMER.to_string(),
        }
    }
}
