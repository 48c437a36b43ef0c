//! Hockey travel - traffic-aware departure and wake-up planning
//!
//! Given a game's local kickoff, a home address and a venue address, computes
//! when to wake up and when to leave, using live traffic-aware routing with a
//! distance-based fallback.

pub mod config;
pub mod defaults;
pub mod error;
pub mod services;
pub mod types;

#[cfg(test)]
mod test_support;

pub use error::{GeocodingError, RoutingError, TravelError};
pub use services::planner::TravelPlanner;
pub use types::{GameEvent, TravelPlan, TravelPreferences};
