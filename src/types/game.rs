//! Game and preference types supplied by upstream collaborators

use serde::{Deserialize, Serialize};

/// A scheduled game as delivered by the schedule provider.
///
/// Date and time are local wall-clock values; `timezone` says where the wall
/// clock hangs (IANA name or an abbreviation such as "PT").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    pub home_team: String,
    pub away_team: String,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Kickoff wall-clock time, e.g. `15:00` or `3:00 PM`
    pub time: String,
    #[serde(default)]
    pub timezone: Option<String>,
    pub venue: String,
    #[serde(default)]
    pub rink: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub division: Option<String>,
}

impl GameEvent {
    /// "Away @ Home" label used in logs
    pub fn matchup(&self) -> String {
        format!("{} @ {}", self.away_team, self.home_team)
    }

    /// Venue name with the rink qualifier appended when present
    pub fn venue_label(&self) -> String {
        match self.rink.as_deref().map(str::trim) {
            Some(rink) if !rink.is_empty() => format!("{} ({})", self.venue, rink),
            _ => self.venue.clone(),
        }
    }
}

/// Family travel preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPreferences {
    /// Geocodable home address
    pub home_address: String,
    /// Minutes between waking up and leaving
    pub prep_time_minutes: u32,
    /// Minutes to be on site before kickoff. No upper bound is assumed.
    pub arrival_buffer_minutes: u32,
}
