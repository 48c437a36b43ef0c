//! Traffic-aware routing
//!
//! One [`RouteQuantile::query`] is one outbound call for one traffic model.
//! No retries happen here; the convergence solver decides what to do on failure.

mod google;

pub use google::{parse_duration_secs, GoogleRoutesClient, GoogleRoutesConfig};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::RoutingError;
use crate::types::{RouteSample, TrafficModel};

/// Single-shot traffic-aware route query
#[async_trait]
pub trait RouteQuantile: Send + Sync {
    /// Drive duration and distance leaving `origin` at `departure`
    async fn query(
        &self,
        origin: &str,
        destination: &str,
        departure: DateTime<Utc>,
        traffic_model: TrafficModel,
    ) -> Result<RouteSample, RoutingError>;

    /// Service name for logging
    fn name(&self) -> &str;
}
