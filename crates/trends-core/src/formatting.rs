//! Line formats for the console report.

use crate::models::YearMonth;

/// Format a per-country total.
///
/// # Examples
///
/// ```
/// use trends_core::formatting::format_country_total;
///
/// assert_eq!(format_country_total("Japan", 42), "Japan : 42 tweets");
/// ```
pub fn format_country_total(country: &str, count: u64) -> String {
    format!("{} : {} tweets", country, count)
}

/// Format one point of a country's monthly series.
///
/// # Examples
///
/// ```
/// use trends_core::formatting::format_monthly_count;
/// use trends_core::models::YearMonth;
///
/// assert_eq!(
///     format_monthly_count("Brazil", YearMonth::new(2021, 3), 7),
///     "Brazil 2021-03 : 7 tweets"
/// );
/// ```
pub fn format_monthly_count(country: &str, month: YearMonth, count: u64) -> String {
    format!("{} {} : {} tweets", country, month, count)
}

/// Format a country's peak month.
///
/// # Examples
///
/// ```
/// use trends_core::formatting::format_peak_month;
/// use trends_core::models::YearMonth;
///
/// assert_eq!(
///     format_peak_month("India", YearMonth::new(2021, 5), 120),
///     "India : 2021-05 (120 tweets)"
/// );
/// ```
pub fn format_peak_month(country: &str, month: YearMonth, count: u64) -> String {
    format!("{} : {} ({} tweets)", country, month, count)
}

/// Format a section heading.
pub fn format_heading(title: &str) -> String {
    format!("=== {} ===", title)
}
