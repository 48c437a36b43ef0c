//! Departure-time convergence against a traffic-aware router
//!
//! The departure instant depends on the drive duration, and a traffic-aware
//! duration depends on the departure instant. Starting from a seeded guess,
//! the solver queries BEST_GUESS, re-queries at the corrected departure while
//! the answer disagrees with the assumption by more than the threshold (at
//! most `max_refinements` times), then samples OPTIMISTIC and PESSIMISTIC in
//! parallel at the converged departure to bound the duration.
//!
//! Residual error after the last refinement is accepted as is.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info, warn};

use super::routing::RouteQuantile;
use crate::defaults::{
    CONVERGENCE_THRESHOLD_SECS, INITIAL_GUESS_SECS, MAX_REFINEMENTS, MAX_ROUTE_DURATION_SECS,
};
use crate::error::RoutingError;
use crate::types::{RouteSample, TrafficModel};

/// Convergence parameters
#[derive(Debug, Clone)]
pub struct ConvergenceConfig {
    /// Duration assumed before the first query
    pub initial_guess_secs: u64,
    /// Disagreement tolerated without another query
    pub threshold_secs: u64,
    /// Upper bound on re-queries after the seed query
    pub max_refinements: u32,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            initial_guess_secs: INITIAL_GUESS_SECS,
            threshold_secs: CONVERGENCE_THRESHOLD_SECS,
            max_refinements: MAX_REFINEMENTS,
        }
    }
}

/// Bounds from the three traffic models at the converged departure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationRange {
    pub low_secs: u64,
    pub high_secs: u64,
    /// Model that produced `high_secs`
    pub high_model: TrafficModel,
}

impl DurationRange {
    fn from_samples(samples: [&RouteSample; 3]) -> Self {
        let low_secs = samples.iter().map(|s| s.duration_secs).min().unwrap_or_default();
        // max_by_key keeps the last maximum, so ties go to the pessimistic sample
        let high = samples
            .iter()
            .max_by_key(|s| s.duration_secs)
            .copied()
            .unwrap_or(samples[0]);

        Self {
            low_secs,
            high_secs: high.duration_secs,
            high_model: high.traffic_model,
        }
    }
}

/// Result of a successful solve
#[derive(Debug, Clone)]
pub struct ConvergedRoute {
    /// Final BEST_GUESS sample
    pub best_guess: RouteSample,
    /// Absent when range sampling failed
    pub range: Option<DurationRange>,
    /// Departure instant the final samples were taken at
    pub departure: DateTime<Utc>,
    /// Number of BEST_GUESS queries issued
    pub best_guess_queries: u32,
}

pub struct ConvergenceSolver {
    router: Arc<dyn RouteQuantile>,
    config: ConvergenceConfig,
}

impl ConvergenceSolver {
    pub fn new(router: Arc<dyn RouteQuantile>) -> Self {
        Self::with_config(router, ConvergenceConfig::default())
    }

    pub fn with_config(router: Arc<dyn RouteQuantile>, config: ConvergenceConfig) -> Self {
        Self { router, config }
    }

    /// Find a departure whose traffic-aware duration lands at `arrival`.
    ///
    /// Fails only if a BEST_GUESS query fails or answers with a duration past
    /// `MAX_ROUTE_DURATION_SECS`; range sampling failures are logged and leave
    /// `range` empty.
    pub async fn solve(
        &self,
        origin: &str,
        destination: &str,
        arrival: DateTime<Utc>,
    ) -> Result<ConvergedRoute, RoutingError> {
        let mut assumed_secs = self.config.initial_guess_secs;
        let mut departure = checked_departure(arrival, assumed_secs)?;

        let mut sample = self
            .router
            .query(origin, destination, departure, TrafficModel::BestGuess)
            .await
            .and_then(within_bounds)?;
        let mut best_guess_queries = 1;

        for _ in 0..self.config.max_refinements {
            let drift = sample.duration_secs.abs_diff(assumed_secs);
            if drift <= self.config.threshold_secs {
                break;
            }

            debug!(
                "Assumed {}s but got {}s (drift {}s), refining departure",
                assumed_secs, sample.duration_secs, drift
            );

            assumed_secs = sample.duration_secs;
            departure = checked_departure(arrival, assumed_secs)?;
            sample = self
                .router
                .query(origin, destination, departure, TrafficModel::BestGuess)
                .await
                .and_then(within_bounds)?;
            best_guess_queries += 1;
        }

        let residual = sample.duration_secs.abs_diff(assumed_secs);
        if residual > self.config.threshold_secs {
            debug!(
                "Refinement budget spent with {}s residual drift, accepting {}s",
                residual, sample.duration_secs
            );
        }

        let range = self.sample_range(origin, destination, departure, &sample).await;

        info!(
            "Converged via {} after {} BEST_GUESS queries: {}s departing {}",
            self.router.name(),
            best_guess_queries,
            sample.duration_secs,
            departure
        );

        Ok(ConvergedRoute {
            best_guess: sample,
            range,
            departure,
            best_guess_queries,
        })
    }

    async fn sample_range(
        &self,
        origin: &str,
        destination: &str,
        departure: DateTime<Utc>,
        best_guess: &RouteSample,
    ) -> Option<DurationRange> {
        let (optimistic, pessimistic) = futures::join!(
            self.router.query(origin, destination, departure, TrafficModel::Optimistic),
            self.router.query(origin, destination, departure, TrafficModel::Pessimistic),
        );

        match (optimistic.and_then(within_bounds), pessimistic.and_then(within_bounds)) {
            (Ok(optimistic), Ok(pessimistic)) => {
                let range = DurationRange::from_samples([best_guess, &optimistic, &pessimistic]);
                debug!("Duration range {}s..{}s", range.low_secs, range.high_secs);
                Some(range)
            }
            (optimistic, pessimistic) => {
                if let Err(e) = optimistic {
                    warn!("OPTIMISTIC range sample failed: {}", e);
                }
                if let Err(e) = pessimistic {
                    warn!("PESSIMISTIC range sample failed: {}", e);
                }
                warn!("Continuing without a duration range");
                None
            }
        }
    }
}

/// Instant a drive of `duration_secs` must start to end at `arrival`
pub(crate) fn departure_for(arrival: DateTime<Utc>, duration_secs: u64) -> Option<DateTime<Utc>> {
    i64::try_from(duration_secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|drive| arrival.checked_sub_signed(drive))
}

fn checked_departure(arrival: DateTime<Utc>, duration_secs: u64) -> Result<DateTime<Utc>, RoutingError> {
    if duration_secs > MAX_ROUTE_DURATION_SECS {
        return Err(RoutingError::DurationOutOfRange(duration_secs));
    }
    departure_for(arrival, duration_secs).ok_or(RoutingError::DurationOutOfRange(duration_secs))
}

fn within_bounds(sample: RouteSample) -> Result<RouteSample, RoutingError> {
    if sample.duration_secs > MAX_ROUTE_DURATION_SECS {
        return Err(RoutingError::DurationOutOfRange(sample.duration_secs));
    }
    Ok(sample)
}
