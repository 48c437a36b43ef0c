//! Configuration management

use std::str::FromStr;

use anyhow::{Context, Result};
use chrono_tz::Tz;

use crate::defaults::{
    DEFAULT_ZONE, GEOCODING_API_URL, HTTP_TIMEOUT_SECS, INITIAL_GUESS_SECS,
    MAX_ROUTE_DURATION_SECS, ROUTES_API_URL,
};
use crate::services::convergence::ConvergenceConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the Routes and Geocoding APIs
    pub google_maps_api_key: String,

    /// computeRoutes endpoint
    pub routes_api_url: String,

    /// Geocoding endpoint (fallback path only)
    pub geocoding_api_url: String,

    /// Per-request timeout for every outbound call
    pub http_timeout_secs: u64,

    /// Zone used for games without a usable timezone
    pub default_zone: Tz,

    /// Seed, threshold and refinement cap
    pub convergence: ConvergenceConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let google_maps_api_key = var("GOOGLE_MAPS_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .context("GOOGLE_MAPS_API_KEY must be set")?;

        let routes_api_url = var("ROUTES_API_URL").unwrap_or_else(|| ROUTES_API_URL.to_string());

        let geocoding_api_url =
            var("GEOCODING_API_URL").unwrap_or_else(|| GEOCODING_API_URL.to_string());

        let http_timeout_secs = parse_or(&var, "HTTP_TIMEOUT_SECS", HTTP_TIMEOUT_SECS);

        let default_zone = match var("DEFAULT_TIMEZONE") {
            Some(name) => name.trim().parse::<Tz>().unwrap_or_else(|_| {
                tracing::warn!("DEFAULT_TIMEZONE '{}' is not an IANA zone, using {}", name, DEFAULT_ZONE.name());
                DEFAULT_ZONE
            }),
            None => DEFAULT_ZONE,
        };

        let initial_guess_minutes = parse_or(&var, "INITIAL_GUESS_MINUTES", INITIAL_GUESS_SECS / 60);
        let initial_guess_secs = initial_guess_minutes
            .checked_mul(60)
            .filter(|secs| *secs <= MAX_ROUTE_DURATION_SECS)
            .unwrap_or_else(|| {
                tracing::warn!(
                    "INITIAL_GUESS_MINUTES = {} is out of range, using {}",
                    initial_guess_minutes,
                    INITIAL_GUESS_SECS / 60
                );
                INITIAL_GUESS_SECS
            });

        let defaults = ConvergenceConfig::default();
        let convergence = ConvergenceConfig {
            initial_guess_secs,
            threshold_secs: parse_or(&var, "CONVERGENCE_THRESHOLD_SECS", defaults.threshold_secs),
            max_refinements: parse_or(&var, "MAX_REFINEMENTS", defaults.max_refinements),
        };

        Ok(Self {
            google_maps_api_key,
            routes_api_url,
            geocoding_api_url,
            http_timeout_secs,
            default_zone,
            convergence,
        })
    }
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    match var(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("{} = '{}' is not valid, using {}", key, raw, default);
            default
        }),
        None => default,
    }
}
