//! Travel-time services

pub mod convergence;
pub mod fallback;
pub mod geo;
pub mod geocoding;
pub mod planner;
pub mod routing;
pub mod timezone;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use convergence::ConvergenceSolver;
use fallback::FallbackEstimator;
use geocoding::GoogleGeocoder;
use planner::TravelPlanner;
use routing::{GoogleRoutesClient, GoogleRoutesConfig};

/// Wire the Google-backed planner from configuration.
///
/// Both adapters share one HTTP client carrying the configured timeout.
pub fn create_planner(config: &Config) -> Result<TravelPlanner> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .user_agent(concat!("hockey-travel/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")?;

    let router = GoogleRoutesClient::new(
        client.clone(),
        GoogleRoutesConfig {
            base_url: config.routes_api_url.clone(),
            api_key: config.google_maps_api_key.clone(),
        },
    );
    let geocoder = GoogleGeocoder::with_base_url(
        client,
        &config.geocoding_api_url,
        config.google_maps_api_key.clone(),
    );

    info!(
        "Travel planner ready (default zone {}, threshold {}s, {} refinement(s))",
        config.default_zone.name(),
        config.convergence.threshold_secs,
        config.convergence.max_refinements
    );

    Ok(TravelPlanner::with_default_zone(
        ConvergenceSolver::with_config(Arc::new(router), config.convergence.clone()),
        FallbackEstimator::new(Arc::new(geocoder)),
        config.default_zone,
    ))
}
