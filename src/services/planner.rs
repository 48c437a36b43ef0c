//! Travel plan composition
//!
//! Resolves the game's zone, works backwards from kickoff through the arrival
//! buffer, drive duration and prep time, and formats every instant in the
//! game's local zone.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use tracing::{error, info, warn};

use super::convergence::{departure_for, ConvergedRoute, ConvergenceSolver};
use super::fallback::{FallbackEstimate, FallbackEstimator};
use super::timezone::{format_instant, resolve_zone_or, to_instant};
use crate::defaults::DEFAULT_ZONE;
use crate::error::TravelError;
use crate::types::{GameEvent, TrafficModel, TravelPlan, TravelPreferences};

const NAVIGATION_BASE_URL: &str = "https://www.google.com/maps/dir/";

/// Where the drive duration came from
enum TravelEstimate {
    Live(ConvergedRoute),
    Fallback(FallbackEstimate),
}

impl TravelEstimate {
    /// High end of the range when sampled, otherwise the single duration
    fn effective_duration_secs(&self) -> u64 {
        match self {
            TravelEstimate::Live(route) => route
                .range
                .map(|r| r.high_secs)
                .unwrap_or(route.best_guess.duration_secs),
            TravelEstimate::Fallback(estimate) => estimate.duration_secs,
        }
    }

    fn traffic_model(&self) -> Option<TrafficModel> {
        match self {
            TravelEstimate::Live(route) => Some(
                route
                    .range
                    .map(|r| r.high_model)
                    .unwrap_or(route.best_guess.traffic_model),
            ),
            TravelEstimate::Fallback(_) => None,
        }
    }

    fn distance_meters(&self) -> u64 {
        match self {
            TravelEstimate::Live(route) => route.best_guess.distance_meters,
            TravelEstimate::Fallback(estimate) => estimate.distance_meters,
        }
    }
}

/// Composes wake-up and departure guidance from live routing or the fallback
pub struct TravelPlanner {
    solver: ConvergenceSolver,
    fallback: FallbackEstimator,
    default_zone: Tz,
}

impl TravelPlanner {
    pub fn new(solver: ConvergenceSolver, fallback: FallbackEstimator) -> Self {
        Self::with_default_zone(solver, fallback, DEFAULT_ZONE)
    }

    pub fn with_default_zone(solver: ConvergenceSolver, fallback: FallbackEstimator, default_zone: Tz) -> Self {
        Self {
            solver,
            fallback,
            default_zone,
        }
    }

    /// Build a plan for `game`.
    ///
    /// `zone_override` wins over the game's own timezone indicator. Fails
    /// before any external call when an address is empty or the game time
    /// cannot be parsed.
    pub async fn compose_plan(
        &self,
        game: &GameEvent,
        preferences: &TravelPreferences,
        venue_address: &str,
        zone_override: Option<&str>,
    ) -> Result<TravelPlan, TravelError> {
        let home = preferences.home_address.trim();
        if home.is_empty() {
            return Err(TravelError::MissingInput("home address"));
        }
        let venue = venue_address.trim();
        if venue.is_empty() {
            return Err(TravelError::MissingInput("venue address"));
        }

        let indicator = zone_override
            .filter(|z| !z.trim().is_empty())
            .or(game.timezone.as_deref());
        let zone = resolve_zone_or(indicator, self.default_zone);

        let game_instant = to_instant(&game.date, &game.time, zone)?;
        let arrival = game_instant
            .checked_sub_signed(minutes(preferences.arrival_buffer_minutes))
            .ok_or_else(|| TravelError::InvalidInput {
                field: "arrival buffer",
                value: preferences.arrival_buffer_minutes.to_string(),
            })?;

        info!(
            "Planning travel for {} at {} ({}), arrive by {}",
            game.matchup(),
            game.venue_label(),
            format_instant(game_instant, zone),
            format_instant(arrival, zone)
        );

        let estimate = self.estimate_travel(home, venue, arrival).await?;

        let duration_secs = estimate.effective_duration_secs();
        let departure = departure_for(arrival, duration_secs).ok_or_else(|| TravelError::InvalidInput {
            field: "travel duration",
            value: format!("{}s", duration_secs),
        })?;
        let wake_up = departure
            .checked_sub_signed(minutes(preferences.prep_time_minutes))
            .ok_or_else(|| TravelError::InvalidInput {
                field: "prep time",
                value: preferences.prep_time_minutes.to_string(),
            })?;

        let (low, high, is_estimated, method, disclaimer) = match &estimate {
            TravelEstimate::Live(route) => (
                route.range.map(|r| r.low_secs),
                route.range.map(|r| r.high_secs),
                false,
                None,
                None,
            ),
            TravelEstimate::Fallback(fallback) => (
                None,
                None,
                fallback.is_fallback,
                Some(fallback.method),
                Some(fallback.disclaimer.clone()),
            ),
        };

        let plan = TravelPlan {
            duration_secs,
            duration_text: format_duration(duration_secs),
            duration_low_secs: low,
            duration_high_secs: high,
            distance_meters: estimate.distance_meters(),
            traffic_model: estimate.traffic_model(),
            timezone: zone.name().to_string(),
            game_time: format_instant(game_instant, zone),
            arrival_time: format_instant(arrival, zone),
            departure_time: format_instant(departure, zone),
            wake_up_time: format_instant(wake_up, zone),
            is_estimated,
            estimation_method: method,
            disclaimer,
            navigation_url: navigation_url(home, venue),
            calculated_at: Utc::now(),
        };

        info!(
            "Leave at {}, wake up at {} ({}{})",
            plan.departure_time,
            plan.wake_up_time,
            plan.duration_text,
            if plan.is_estimated { ", estimated" } else { "" }
        );

        Ok(plan)
    }

    async fn estimate_travel(
        &self,
        home: &str,
        venue: &str,
        arrival: DateTime<Utc>,
    ) -> Result<TravelEstimate, TravelError> {
        let routing = match self.solver.solve(home, venue, arrival).await {
            Ok(route) => return Ok(TravelEstimate::Live(route)),
            Err(e) => e,
        };

        warn!("Live routing failed: {}. Falling back to distance estimate.", routing);

        match self.fallback.estimate(home, venue).await {
            Ok(estimate) => Ok(TravelEstimate::Fallback(estimate)),
            Err(fallback) => {
                error!("Fallback estimate failed: {}", fallback);
                Err(TravelError::TravelTimeUnavailable { routing, fallback })
            }
        }
    }
}

fn minutes(value: u32) -> Duration {
    Duration::minutes(i64::from(value))
}

/// Google Maps driving directions link
pub fn navigation_url(origin: &str, destination: &str) -> String {
    format!(
        "{}?api=1&origin={}&destination={}&travelmode=driving",
        NAVIGATION_BASE_URL,
        urlencoding::encode(origin),
        urlencoding::encode(destination)
    )
}

/// Render a duration as "1h 5m" or "40m", rounding up to the minute
pub fn format_duration(duration_secs: u64) -> String {
    let total_minutes = duration_secs.div_ceil(60);
    let hours = total_minutes / 60;
    let mins = total_minutes % 60;

    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::error::RoutingError;
    use crate::services::fallback::FALLBACK_DISCLAIMER;
    use crate::types::EstimationMethod;
    use crate::test_support::{game_at, preferences, ScriptedRouter, StaticGeocoder, HOME, VENUE};

    fn planner(router: &Arc<ScriptedRouter>, geocoder: &Arc<StaticGeocoder>) -> TravelPlanner {
        TravelPlanner::new(
            ConvergenceSolver::new(router.clone()),
            FallbackEstimator::new(geocoder.clone()),
        )
    }

    fn parse(ts: &str) -> DateTime<chrono::FixedOffset> {
        DateTime::parse_from_rfc3339(ts).unwrap()
    }

    #[tokio::test]
    async fn test_irvine_to_aliso_viejo_scenario() {
        let router = Arc::new(ScriptedRouter::fixed(2400));
        let geocoder = Arc::new(StaticGeocoder::orange_county());
        let game = game_at("2025-10-12", "15:00", Some("America/Los_Angeles"));

        let plan = planner(&router, &geocoder)
            .compose_plan(&game, &preferences(45, 60), VENUE, None)
            .await
            .unwrap();

        assert_eq!(plan.game_time, "2025-10-12T15:00:00-07:00");
        assert_eq!(plan.arrival_time, "2025-10-12T14:00:00-07:00");
        assert_eq!(plan.departure_time, "2025-10-12T13:20:00-07:00");
        assert_eq!(plan.wake_up_time, "2025-10-12T12:35:00-07:00");
        assert_eq!(plan.duration_secs, 2400);
        assert_eq!(plan.duration_text, "40m");
        assert_eq!(plan.duration_low_secs, Some(2400));
        assert_eq!(plan.duration_high_secs, Some(2400));
        assert_eq!(plan.timezone, "America/Los_Angeles");
        assert!(!plan.is_estimated);
        assert!(plan.disclaimer.is_none());
        assert!(plan.estimation_method.is_none());
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_effective_duration_uses_pessimistic_high() {
        let router = Arc::new(ScriptedRouter::by_model(|model| {
            Ok(match model {
                TrafficModel::BestGuess => 2400,
                TrafficModel::Optimistic => 2100,
                TrafficModel::Pessimistic => 3000,
            })
        }));
        let geocoder = Arc::new(StaticGeocoder::orange_county());
        let game = game_at("2025-10-12", "15:00", Some("PT"));

        let plan = planner(&router, &geocoder)
            .compose_plan(&game, &preferences(45, 60), VENUE, None)
            .await
            .unwrap();

        assert_eq!(plan.duration_secs, 3000);
        assert_eq!(plan.duration_low_secs, Some(2100));
        assert_eq!(plan.duration_high_secs, Some(3000));
        assert_eq!(plan.traffic_model, Some(TrafficModel::Pessimistic));
        assert_eq!(plan.departure_time, "2025-10-12T13:10:00-07:00");
        assert_eq!(plan.wake_up_time, "2025-10-12T12:25:00-07:00");
    }

    #[tokio::test]
    async fn test_fallback_on_routing_failure() {
        let router = Arc::new(ScriptedRouter::failing());
        let geocoder = Arc::new(StaticGeocoder::orange_county());
        let game = game_at("2025-10-12", "15:00", Some("PT"));

        let plan = planner(&router, &geocoder)
            .compose_plan(&game, &preferences(45, 60), VENUE, None)
            .await
            .unwrap();

        assert!(plan.is_estimated);
        assert_eq!(plan.estimation_method, Some(EstimationMethod::Haversine));
        assert_eq!(plan.disclaimer.as_deref(), Some(FALLBACK_DISCLAIMER));
        assert!(plan.duration_secs >= 300);
        assert!(plan.duration_low_secs.is_none() && plan.duration_high_secs.is_none());
        assert!(plan.traffic_model.is_none());
        assert_eq!(geocoder.calls(), 2);
        assert_eq!(router.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_floor_for_identical_addresses() {
        let router = Arc::new(ScriptedRouter::failing());
        let geocoder = Arc::new(StaticGeocoder::orange_county());
        let game = game_at("2025-10-12", "15:00", None);

        let plan = planner(&router, &geocoder)
            .compose_plan(&game, &preferences(0, 0), HOME, None)
            .await
            .unwrap();

        assert_eq!(plan.duration_secs, 300);
        assert_eq!(plan.departure_time, "2025-10-12T14:55:00-07:00");
    }

    #[tokio::test]
    async fn test_total_failure_surfaces_routing_error() {
        let router = Arc::new(ScriptedRouter::failing());
        let geocoder = Arc::new(StaticGeocoder::default());
        let game = game_at("2025-10-12", "15:00", Some("PT"));

        let err = planner(&router, &geocoder)
            .compose_plan(&game, &preferences(45, 60), VENUE, None)
            .await
            .unwrap_err();

        match &err {
            TravelError::TravelTimeUnavailable { routing, .. } => {
                assert!(matches!(routing, RoutingError::Status { status: 503, .. }));
            }
            other => panic!("expected TravelTimeUnavailable, got {:?}", other),
        }
        assert!(err.fallback_error().is_some());
        assert!(err.to_string().contains("unable to calculate travel time"));
    }

    #[tokio::test]
    async fn test_range_failure_still_returns_plan() {
        let router = Arc::new(ScriptedRouter::by_model(|model| match model {
            TrafficModel::BestGuess => Ok(2400),
            _ => Err(RoutingError::NoRoutes),
        }));
        let geocoder = Arc::new(StaticGeocoder::orange_county());
        let game = game_at("2025-10-12", "15:00", Some("PT"));

        let plan = planner(&router, &geocoder)
            .compose_plan(&game, &preferences(45, 60), VENUE, None)
            .await
            .unwrap();

        assert_eq!(plan.duration_secs, 2400);
        assert!(plan.duration_low_secs.is_none());
        assert!(plan.duration_high_secs.is_none());
        assert_eq!(plan.traffic_model, Some(TrafficModel::BestGuess));
        assert!(!plan.is_estimated);
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_home_fails_without_calls() {
        let router = Arc::new(ScriptedRouter::fixed(2400));
        let geocoder = Arc::new(StaticGeocoder::orange_county());
        let game = game_at("2025-10-12", "15:00", Some("PT"));
        let mut prefs = preferences(45, 60);
        prefs.home_address = "   ".to_string();

        let err = planner(&router, &geocoder)
            .compose_plan(&game, &prefs, VENUE, None)
            .await
            .unwrap_err();

        assert!(matches!(err, TravelError::MissingInput("home address")));
        assert!(router.calls().is_empty());
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_venue_fails_without_calls() {
        let router = Arc::new(ScriptedRouter::fixed(2400));
        let geocoder = Arc::new(StaticGeocoder::orange_county());
        let game = game_at("2025-10-12", "15:00", Some("PT"));

        let err = planner(&router, &geocoder)
            .compose_plan(&game, &preferences(45, 60), "", None)
            .await
            .unwrap_err();

        assert!(matches!(err, TravelError::MissingInput("venue address")));
        assert!(router.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_game_time_fails_without_calls() {
        let router = Arc::new(ScriptedRouter::fixed(2400));
        let geocoder = Arc::new(StaticGeocoder::orange_county());
        let game = game_at("2025-10-12", "TBD", Some("PT"));

        let err = planner(&router, &geocoder)
            .compose_plan(&game, &preferences(45, 60), VENUE, None)
            .await
            .unwrap_err();

        assert!(matches!(err, TravelError::InvalidInput { field: "game time", .. }));
        assert!(router.calls().is_empty());
    }

    #[tokio::test]
    async fn test_instants_are_monotonic() {
        let geocoder = Arc::new(StaticGeocoder::orange_county());

        for (duration, prep, buffer) in [(2400, 45, 60), (600, 0, 0), (9000, 90, 120), (60, 30, 0)] {
            let router = Arc::new(ScriptedRouter::fixed(duration));
            let game = game_at("2025-01-18", "07:15", Some("PST"));

            let plan = planner(&router, &geocoder)
                .compose_plan(&game, &preferences(prep, buffer), VENUE, None)
                .await
                .unwrap();

            let game_time = parse(&plan.game_time);
            let arrival = parse(&plan.arrival_time);
            let departure = parse(&plan.departure_time);
            let wake_up = parse(&plan.wake_up_time);

            assert!(wake_up <= departure && departure <= arrival && arrival <= game_time);
            assert_eq!(wake_up == departure, prep == 0);
            assert_eq!(arrival == game_time, buffer == 0);
            assert!(plan.game_time.ends_with("-08:00"));
        }
    }

    #[tokio::test]
    async fn test_large_arrival_buffer_is_not_capped() {
        let router = Arc::new(ScriptedRouter::fixed(2400));
        let geocoder = Arc::new(StaticGeocoder::orange_county());
        let game = game_at("2025-10-12", "15:00", Some("PT"));

        let plan = planner(&router, &geocoder)
            .compose_plan(&game, &preferences(45, 600), VENUE, None)
            .await
            .unwrap();

        assert_eq!(plan.arrival_time, "2025-10-12T05:00:00-07:00");
    }

    #[tokio::test]
    async fn test_zone_override_wins() {
        let router = Arc::new(ScriptedRouter::fixed(2400));
        let geocoder = Arc::new(StaticGeocoder::orange_county());
        let game = game_at("2025-10-12", "15:00", Some("PT"));

        let plan = planner(&router, &geocoder)
            .compose_plan(&game, &preferences(45, 60), VENUE, Some("America/Denver"))
            .await
            .unwrap();

        assert_eq!(plan.timezone, "America/Denver");
        assert_eq!(plan.game_time, "2025-10-12T15:00:00-06:00");
    }

    #[tokio::test]
    async fn test_unknown_zone_uses_default() {
        let router = Arc::new(ScriptedRouter::fixed(2400));
        let geocoder = Arc::new(StaticGeocoder::orange_county());
        let game = game_at("2025-10-12", "3:00 PM", Some("Rinkside/Standard"));

        let plan = planner(&router, &geocoder)
            .compose_plan(&game, &preferences(45, 60), VENUE, None)
            .await
            .unwrap();

        assert_eq!(plan.timezone, "America/Los_Angeles");
        assert_eq!(plan.game_time, "2025-10-12T15:00:00-07:00");
    }

    #[tokio::test]
    async fn test_arrival_is_queried_in_absolute_time() {
        let router = Arc::new(ScriptedRouter::fixed(2400));
        let geocoder = Arc::new(StaticGeocoder::orange_county());
        let game = game_at("2025-10-12", "15:00", Some("PT"));

        planner(&router, &geocoder)
            .compose_plan(&game, &preferences(45, 60), VENUE, None)
            .await
            .unwrap();

        // 14:00 PDT arrival − 45 min seed = 20:15 UTC
        let (_, departure) = router.calls()[0];
        assert_eq!(departure.to_rfc3339(), "2025-10-12T20:15:00+00:00");
    }

    #[tokio::test]
    async fn test_implausible_route_duration_falls_back() {
        for duration_secs in [u64::MAX, 10_000_000_000_000_000] {
            let router = Arc::new(ScriptedRouter::fixed(duration_secs));
            let geocoder = Arc::new(StaticGeocoder::orange_county());
            let game = game_at("2025-10-12", "15:00", Some("PT"));

            let plan = planner(&router, &geocoder)
                .compose_plan(&game, &preferences(45, 60), VENUE, None)
                .await
                .unwrap();

            assert!(plan.is_estimated);
            assert_eq!(geocoder.calls(), 2);
            let arrival = parse(&plan.arrival_time);
            let departure = parse(&plan.departure_time);
            let wake_up = parse(&plan.wake_up_time);
            assert!(wake_up <= departure && departure <= arrival);
        }
    }

    #[test]
    fn test_navigation_url_escapes_addresses() {
        let url = navigation_url(HOME, "9 Journey, Aliso Viejo, CA & Rink #2");
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/?api=1\
             &origin=100%20Main%20St%2C%20Irvine%2C%20CA\
             &destination=9%20Journey%2C%20Aliso%20Viejo%2C%20CA%20%26%20Rink%20%232\
             &travelmode=driving"
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(2400), "40m");
        assert_eq!(format_duration(3900), "1h 5m");
        assert_eq!(format_duration(7200), "2h 0m");
        assert_eq!(format_duration(61), "2m");
        assert_eq!(format_duration(0), "0m");
    }
}
