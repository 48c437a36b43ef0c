//! In-memory collaborators for unit tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{GeocodingError, RoutingError};
use crate::services::geocoding::Geocoder;
use crate::services::routing::RouteQuantile;
use crate::types::{Coordinates, GameEvent, RouteSample, TrafficModel, TravelPreferences};

pub const IRVINE: Coordinates = Coordinates { lat: 33.6846, lng: -117.8265 };
pub const ALISO_VIEJO: Coordinates = Coordinates { lat: 33.5754, lng: -117.7258 };

pub const HOME: &str = "100 Main St, Irvine, CA";
pub const VENUE: &str = "9 Journey, Aliso Viejo, CA";

type Responder = dyn Fn(TrafficModel, DateTime<Utc>) -> Result<RouteSample, RoutingError> + Send + Sync;

/// Routing stub that answers from a closure and records every call
pub struct ScriptedRouter {
    respond: Box<Responder>,
    calls: Mutex<Vec<(TrafficModel, DateTime<Utc>)>>,
}

impl ScriptedRouter {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(TrafficModel, DateTime<Utc>) -> Result<RouteSample, RoutingError> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Same duration for every model and departure
    pub fn fixed(duration_secs: u64) -> Self {
        Self::by_model(move |_| Ok(duration_secs))
    }

    /// Duration chosen per traffic model
    pub fn by_model<F>(duration: F) -> Self
    where
        F: Fn(TrafficModel) -> Result<u64, RoutingError> + Send + Sync + 'static,
    {
        Self::new(move |model, _| duration(model).map(|secs| sample(secs, model)))
    }

    /// Every query fails
    pub fn failing() -> Self {
        Self::new(|_, _| Err(RoutingError::Status { status: 503, body: "unavailable".to_string() }))
    }

    pub fn calls(&self) -> Vec<(TrafficModel, DateTime<Utc>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, model: TrafficModel) -> usize {
        self.calls().iter().filter(|(m, _)| *m == model).count()
    }
}

#[async_trait]
impl RouteQuantile for ScriptedRouter {
    async fn query(
        &self,
        _origin: &str,
        _destination: &str,
        departure: DateTime<Utc>,
        traffic_model: TrafficModel,
    ) -> Result<RouteSample, RoutingError> {
        self.calls.lock().unwrap().push((traffic_model, departure));
        (self.respond)(traffic_model, departure)
    }

    fn name(&self) -> &str {
        "Scripted"
    }
}

pub fn sample(duration_secs: u64, traffic_model: TrafficModel) -> RouteSample {
    RouteSample {
        duration_secs,
        distance_meters: 21_500,
        traffic_model,
        polyline: None,
    }
}

/// Geocoder backed by a fixed address table
#[derive(Default)]
pub struct StaticGeocoder {
    known: HashMap<String, Coordinates>,
    calls: Mutex<usize>,
}

impl StaticGeocoder {
    pub fn orange_county() -> Self {
        let mut known = HashMap::new();
        known.insert(HOME.to_string(), IRVINE);
        known.insert(VENUE.to_string(), ALISO_VIEJO);
        Self { known, calls: Mutex::new(0) }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodingError> {
        *self.calls.lock().unwrap() += 1;
        self.known
            .get(address)
            .copied()
            .ok_or_else(|| GeocodingError::NoResults { address: address.to_string() })
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

pub fn game_at(date: &str, time: &str, timezone: Option<&str>) -> GameEvent {
    GameEvent {
        home_team: "Jr. Ducks 12U AA".to_string(),
        away_team: "Jr. Kings 12U AA".to_string(),
        date: date.to_string(),
        time: time.to_string(),
        timezone: timezone.map(str::to_string),
        venue: "Aliso Viejo Ice".to_string(),
        rink: Some("Rink 1".to_string()),
        season: Some("2025-26".to_string()),
        division: Some("12U AA".to_string()),
    }
}

pub fn preferences(prep_time_minutes: u32, arrival_buffer_minutes: u32) -> TravelPreferences {
    TravelPreferences {
        home_address: HOME.to_string(),
        prep_time_minutes,
        arrival_buffer_minutes,
    }
}
