use chrono_tz::Tz;
use tracing::warn;

use crate::error::{Result, TrendsError};

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|e| {
        warn!("Could not detect system timezone ({}), using UTC", e);
        "UTC".to_string()
    })
}

/// Resolve the `"auto"` sentinel to the system timezone name.
///
/// Any other value is returned unchanged.
pub fn resolve_timezone_name(name: &str) -> String {
    if name.eq_ignore_ascii_case("auto") {
        get_system_timezone()
    } else {
        name.to_string()
    }
}

/// Parse an IANA timezone identifier.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| TrendsError::InvalidTimezone(name.to_string()))
}

/// The system timezone as a [`Tz`], or UTC when the detected name is not a
/// known IANA identifier.
pub fn system_tz() -> Tz {
    let name = get_system_timezone();
    parse_timezone(&name).unwrap_or_else(|_| {
        warn!("Unrecognised system timezone \"{}\", using UTC", name);
        Tz::UTC
    })
}
