//! Calendar-date resolution for the free-form `created_at` column.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use tracing::trace;

use crate::time_utils;

/// `Wed Dec 08 04:25:46 +0000 2021`
const SOCIAL_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";
const SOCIAL_SHAPE: &str = "aaa aaa DD hh:mm:ss +zzzz YYYY";

const ISO_LOCAL_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
const ISO_LOCAL_MINUTES_SHAPE: &str = "YYYY-MM-DDThh:mm";
const ISO_LOCAL_SECONDS_SHAPE: &str = "YYYY-MM-DDThh:mm:ss";

/// A fixed-width fallback layout. See [`matches_shape`] for the `shape`
/// notation.
struct FallbackPattern {
    shape: &'static str,
    format: &'static str,
}

const FALLBACK_PATTERNS: &[FallbackPattern] = &[
    FallbackPattern { shape: "YYYY-MM-DD hh:mm:ss", format: "%Y-%m-%d %H:%M:%S" },
    FallbackPattern { shape: "YYYY-MM-DD hh:mm", format: "%Y-%m-%d %H:%M" },
    FallbackPattern { shape: "YYYY-MM-DD", format: "%Y-%m-%d" },
    FallbackPattern { shape: "YYYY/MM/DD hh:mm:ss", format: "%Y/%m/%d %H:%M:%S" },
    FallbackPattern { shape: "YYYY/MM/DD hh:mm", format: "%Y/%m/%d %H:%M" },
    FallbackPattern { shape: "YYYY/MM/DD", format: "%Y/%m/%d" },
    FallbackPattern { shape: "DD/MM/YYYY hh:mm:ss", format: "%d/%m/%Y %H:%M:%S" },
    FallbackPattern { shape: "DD/MM/YYYY hh:mm", format: "%d/%m/%Y %H:%M" },
    FallbackPattern { shape: "DD/MM/YYYY", format: "%d/%m/%Y" },
];

type Strategy = fn(&DateResolver, &str) -> Option<NaiveDate>;

// ── DateResolver ──────────────────────────────────────────────────────────────

/// Resolves raw date strings to calendar dates by trying a fixed, ordered
/// list of strategies and keeping the first success.
///
/// Strategies, in priority order:
/// 1. Social-media timestamps (`Wed Dec 08 04:25:46 +0000 2021`), dated in
///    their own offset.
/// 2. ISO 8601 instants (`2021-12-08T04:25:46Z`), dated in the resolver's
///    zone.
/// 3. ISO 8601 local date-times (`2021-12-08T04:25:46`).
/// 4. Fixed-width fallbacks such as `2021-12-08 04:25`, `2021/12/08` or
///    `08/12/2021`. A day of 29 to 31 past the end of its month is moved to
///    the month's last day, so `2021-02-30` dates as 2021-02-28.
///
/// Every numeric field must be zero-padded to its full width.
#[derive(Debug, Clone)]
pub struct DateResolver {
    zone: Tz,
}

impl DateResolver {
    /// Resolver that dates ISO instants in `zone`.
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    /// Resolver that dates ISO instants in the local system zone.
    pub fn system() -> Self {
        Self::new(time_utils::system_tz())
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Return the calendar date for `raw`, or `None` when no strategy
    /// matches.
    pub fn resolve(&self, raw: &str) -> Option<NaiveDate> {
        if raw.is_empty() {
            return None;
        }

        let strategies: [Strategy; 4] = [
            Self::parse_social_timestamp,
            Self::parse_iso_instant,
            Self::parse_iso_local,
            Self::parse_fallback,
        ];

        let resolved = strategies.iter().find_map(|strategy| strategy(self, raw));
        if resolved.is_none() {
            trace!("DateResolver: no pattern matched \"{}\"", raw);
        }
        resolved
    }

    // ── Strategies ────────────────────────────────────────────────────────────

    fn parse_social_timestamp(&self, raw: &str) -> Option<NaiveDate> {
        if !matches_shape(raw, SOCIAL_SHAPE) {
            return None;
        }
        DateTime::parse_from_str(raw, SOCIAL_FORMAT)
            .ok()
            .map(|dt| dt.date_naive())
    }

    fn parse_iso_instant(&self, raw: &str) -> Option<NaiveDate> {
        // RFC 3339 parsing also accepts a space separator; instants need 'T'.
        if raw.as_bytes().get(10) != Some(&b'T') {
            return None;
        }
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&self.zone).date_naive())
    }

    fn parse_iso_local(&self, raw: &str) -> Option<NaiveDate> {
        if !has_iso_local_layout(raw) {
            return None;
        }
        ISO_LOCAL_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|dt| dt.date())
    }

    fn parse_fallback(&self, raw: &str) -> Option<NaiveDate> {
        FALLBACK_PATTERNS
            .iter()
            .filter(|pattern| matches_shape(raw, pattern.shape))
            .find_map(|pattern| {
                parse_with(raw, pattern.format).or_else(|| {
                    let clamped = clamp_day_of_month(raw, pattern.shape)?;
                    parse_with(&clamped, pattern.format)
                })
            })
    }
}

impl Default for DateResolver {
    fn default() -> Self {
        Self::system()
    }
}

// ── Layout helpers ────────────────────────────────────────────────────────────

/// `true` when `raw` has exactly the layout described by `shape`.
///
/// In a shape `a` is an ASCII letter, `+` is an offset sign (`+` or `-`) and
/// any other letter (`YYYY`, `MM`, `DD`, `hh`, `mm`, `ss`, `zzzz`) is a digit.
/// Everything else stands for itself.
fn matches_shape(raw: &str, shape: &str) -> bool {
    raw.len() == shape.len()
        && raw.bytes().zip(shape.bytes()).all(|(r, s)| match s {
            b'a' => r.is_ascii_alphabetic(),
            b'+' => r == b'+' || r == b'-',
            s if s.is_ascii_alphabetic() => r.is_ascii_digit(),
            s => r == s,
        })
}

/// `YYYY-MM-DDThh:mm`, or `YYYY-MM-DDThh:mm:ss` with an optional fraction.
fn has_iso_local_layout(raw: &str) -> bool {
    if matches_shape(raw, ISO_LOCAL_MINUTES_SHAPE) {
        return true;
    }
    match (
        raw.get(..ISO_LOCAL_SECONDS_SHAPE.len()),
        raw.get(ISO_LOCAL_SECONDS_SHAPE.len()..),
    ) {
        (Some(head), Some(fraction)) => {
            matches_shape(head, ISO_LOCAL_SECONDS_SHAPE)
                && (fraction.is_empty() || fraction.starts_with('.'))
        }
        _ => false,
    }
}

fn parse_with(raw: &str, format: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(raw, format)
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(raw, format))
        .ok()
}

/// Rewrite the `DD` field of `raw` to the last day of its month when it
/// holds 29 to 31 and the month is shorter. `None` when there is nothing to
/// clamp or the year and month are not a real month.
fn clamp_day_of_month(raw: &str, shape: &str) -> Option<String> {
    let field = |tag: u8| -> Option<u32> {
        raw.bytes()
            .zip(shape.bytes())
            .filter(|&(_, s)| s == tag)
            .map(|(r, _)| char::from(r))
            .collect::<String>()
            .parse()
            .ok()
    };
    let (year, month, day) = (field(b'Y')?, field(b'M')?, field(b'D')?);
    if !(29..=31).contains(&day) {
        return None;
    }
    let year = i32::try_from(year).ok()?;
    let last_day = (28..day)
        .rev()
        .find(|&d| NaiveDate::from_ymd_opt(year, month, d).is_some())?;

    let mut digits = format!("{:02}", last_day).into_bytes().into_iter();
    Some(
        raw.bytes()
            .zip(shape.bytes())
            .map(|(r, s)| {
                if s == b'D' {
                    char::from(digits.next().unwrap_or(r))
                } else {
                    char::from(r)
                }
            })
            .collect(),
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
