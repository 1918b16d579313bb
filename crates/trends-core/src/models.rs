use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

use crate::error::{Result, TrendsError};

/// Countries analysed when none are given explicitly.
pub const DEFAULT_COUNTRIES: &[&str] = &["Australia", "Brazil", "India", "Indonesia", "Japan"];

/// One accepted post line.
///
/// Built once by [`RecordParser`](crate::parser::RecordParser) and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Country label supplied by the caller, not read from the row.
    pub country: String,
    /// Second CSV column as found, trimmed. May be empty or malformed.
    pub raw_date: String,
    /// Calendar date resolved from `raw_date`, if any pattern matched.
    pub date: Option<NaiveDate>,
    /// Normalised post text.
    pub text: String,
}

impl Record {
    /// The calendar month of this record, when it has a resolved date.
    pub fn year_month(&self) -> Option<YearMonth> {
        self.date.map(YearMonth::from)
    }
}

// ── YearMonth ─────────────────────────────────────────────────────────────────

/// A calendar month with the day discarded.
///
/// Orders chronologically and displays as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Aggregate keys ────────────────────────────────────────────────────────────

/// Key of the monthly series: ordered by country first, then by month.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CountryMonth {
    pub country: String,
    pub month: YearMonth,
}

/// The busiest month of a country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeakMonth {
    pub month: YearMonth,
    pub count: u64,
}

// ── CountrySet ────────────────────────────────────────────────────────────────

/// Ordered, de-duplicated, non-empty list of country identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountrySet {
    countries: Vec<String>,
}

impl CountrySet {
    /// Build a set from `names`, trimming each and dropping repeats while
    /// keeping first-seen order.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut countries: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(TrendsError::Config(
                    "country names must not be blank".to_string(),
                ));
            }
            if !countries.iter().any(|c| c == name) {
                countries.push(name.to_string());
            }
        }

        if countries.is_empty() {
            return Err(TrendsError::NoCountries);
        }
        Ok(Self { countries })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.countries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn contains(&self, country: &str) -> bool {
        self.countries.iter().any(|c| c == country)
    }
}

impl Default for CountrySet {
    fn default() -> Self {
        Self {
            countries: DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
