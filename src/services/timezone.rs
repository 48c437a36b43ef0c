//! Timezone resolution and DST-aware wall-clock conversion
//!
//! Wall-clock resolution policy:
//! - ambiguous times (fall back) resolve to the earlier instant, i.e. the
//!   first occurrence on daylight time
//! - skipped times (spring forward) are read with the offset in force before
//!   the gap, which moves them forward by the gap length (02:30 → 03:30)

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, SecondsFormat,
    TimeZone, Utc,
};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::defaults::DEFAULT_ZONE;
use crate::error::TravelError;

/// Wall-clock formats accepted from schedule providers
const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M:%S %p", "%I:%M%p"];

/// Map a common North American abbreviation to its IANA zone
fn abbreviation_zone(indicator: &str) -> Option<Tz> {
    use chrono_tz::America::{Anchorage, Chicago, Denver, Los_Angeles, New_York};
    use chrono_tz::Pacific::Honolulu;

    let zone = match indicator.to_ascii_uppercase().as_str() {
        "PT" | "PST" | "PDT" => Los_Angeles,
        "MT" | "MST" | "MDT" => Denver,
        "CT" | "CST" | "CDT" => Chicago,
        "ET" | "EST" | "EDT" => New_York,
        "AKT" | "AKST" | "AKDT" => Anchorage,
        "HT" | "HST" => Honolulu,
        "UTC" | "GMT" | "Z" => Tz::UTC,
        _ => return None,
    };
    Some(zone)
}

/// Resolve an abbreviation or IANA name, falling back to the domain default
pub fn resolve_zone(indicator: Option<&str>) -> Tz {
    resolve_zone_or(indicator, DEFAULT_ZONE)
}

/// Resolve an abbreviation or IANA name, falling back to `default`.
///
/// Never fails: unknown names are logged and replaced.
pub fn resolve_zone_or(indicator: Option<&str>, default: Tz) -> Tz {
    let indicator = match indicator.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return default,
    };

    if let Some(zone) = abbreviation_zone(indicator) {
        return zone;
    }

    match indicator.parse::<Tz>() {
        Ok(zone) => zone,
        Err(e) => {
            warn!("Unknown timezone '{}' ({}), using {}", indicator, e, default.name());
            default
        }
    }
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_local_date(local_date: &str) -> Result<NaiveDate, TravelError> {
    NaiveDate::parse_from_str(local_date.trim(), "%Y-%m-%d").map_err(|_| TravelError::InvalidInput {
        field: "game date",
        value: local_date.to_string(),
    })
}

/// Parse a 24-hour or 12-hour wall-clock time
pub fn parse_local_time(local_time: &str) -> Result<NaiveTime, TravelError> {
    let trimmed = local_time.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| TravelError::InvalidInput {
            field: "game time",
            value: local_time.to_string(),
        })
}

/// Combine a local date and wall-clock time in `zone` into an instant
pub fn to_instant(local_date: &str, local_time: &str, zone: Tz) -> Result<DateTime<Utc>, TravelError> {
    let date = parse_local_date(local_date)?;
    let time = parse_local_time(local_time)?;
    localize(NaiveDateTime::new(date, time), zone)
}

/// Attach `zone` to a wall-clock value using the offset valid on that date
pub fn localize(naive: NaiveDateTime, zone: Tz) -> Result<DateTime<Utc>, TravelError> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, latest) => {
            debug!(
                "Ambiguous local time {} in {} ({} or {}), using earlier",
                naive,
                zone.name(),
                earliest,
                latest
            );
            Ok(earliest.with_timezone(&Utc))
        }
        LocalResult::None => {
            // Gaps never occur on consecutive days, so yesterday's offset is the pre-gap one.
            let before = zone
                .from_local_datetime(&(naive - Duration::days(1)))
                .earliest()
                .ok_or_else(|| TravelError::InvalidInput {
                    field: "game time",
                    value: naive.to_string(),
                })?;
            let offset_secs = before.offset().fix().local_minus_utc();
            let instant = (naive - Duration::seconds(i64::from(offset_secs))).and_utc();
            debug!(
                "Local time {} skipped in {}, shifted to {}",
                naive,
                zone.name(),
                format_instant(instant, zone)
            );
            Ok(instant)
        }
    }
}

/// ISO-8601 with explicit numeric offset, e.g. `2025-10-12T14:00:00-07:00`
pub fn format_instant(instant: DateTime<Utc>, zone: Tz) -> String {
    instant
        .with_timezone(&zone)
        .to_rfc3339_opts(SecondsFormat::Secs, false)
}
