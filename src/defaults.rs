use chrono_tz::Tz;

/// Zone used when a game carries no usable timezone indicator
pub const DEFAULT_ZONE: Tz = chrono_tz::America::Los_Angeles;

pub const DEFAULT_ARRIVAL_BUFFER_MINUTES: u32 = 60;
pub const DEFAULT_PREP_TIME_MINUTES: u32 = 45;

/// Convergence seed: assumed drive time before the first routing call
pub const INITIAL_GUESS_SECS: u64 = 45 * 60;
/// Allowed gap between assumed and returned duration
pub const CONVERGENCE_THRESHOLD_SECS: u64 = 5 * 60;
pub const MAX_REFINEMENTS: u32 = 1;
/// Longest drive accepted from a router or as a convergence seed
pub const MAX_ROUTE_DURATION_SECS: u64 = 48 * 3600;

pub const HTTP_TIMEOUT_SECS: u64 = 15;

pub const ROUTES_API_URL: &str = "https://routes.googleapis.com/directions/v2:computeRoutes";
pub const GEOCODING_API_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
