//! Geocoding for the distance-based fallback
//!
//! Only used when live routing fails, so there is no rate limiting or caching
//! here. Tests use in-memory geocoders implementing [`Geocoder`].

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::defaults::GEOCODING_API_URL;
use crate::error::GeocodingError;
use crate::types::Coordinates;

/// Geocoder trait - free-text address to coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodingError>;

    /// Get the name of this geocoder implementation
    fn name(&self) -> &'static str;
}

/// Google Geocoding API client
pub struct GoogleGeocoder {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GoogleGeocoder {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, GEOCODING_API_URL, api_key)
    }

    pub fn with_base_url(client: Client, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.into(),
        }
    }

    fn request_url(&self, address: &str) -> String {
        format!(
            "{}?address={}&key={}",
            self.base_url,
            urlencoding::encode(address),
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodingError> {
        debug!("Geocoding '{}'", address);

        let response: GeocodeResponse = self
            .client
            .get(self.request_url(address))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        coordinates_from_response(address, response)
    }

    fn name(&self) -> &'static str {
        "google"
    }
}

fn coordinates_from_response(
    address: &str,
    response: GeocodeResponse,
) -> Result<Coordinates, GeocodingError> {
    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" => {
            return Err(GeocodingError::NoResults { address: address.to_string() });
        }
        other => {
            return Err(GeocodingError::Status {
                address: address.to_string(),
                status: other.to_string(),
            });
        }
    }

    let location = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| GeocodingError::NoResults { address: address.to_string() })?
        .geometry
        .location;

    let coordinates = Coordinates { lat: location.lat, lng: location.lng };
    if !coordinates.is_finite() {
        return Err(GeocodingError::InvalidCoordinates { address: address.to_string() });
    }

    Ok(coordinates)
}

// Geocoding API types

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}
