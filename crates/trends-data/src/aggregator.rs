//! Post counts per country and per calendar month.

use std::collections::{BTreeMap, HashMap};
use std::ops::Index;

use serde::Serialize;
use trends_core::models::{CountryMonth, PeakMonth, Record, YearMonth};

// ── CountryTotals ─────────────────────────────────────────────────────────────

/// Record count per country, enumerated in first-encountered order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryTotals {
    order: Vec<String>,
    counts: HashMap<String, u64>,
}

impl CountryTotals {
    fn add(&mut self, country: &str) {
        match self.counts.get_mut(country) {
            Some(count) => *count += 1,
            None => {
                self.order.push(country.to_string());
                self.counts.insert(country.to_string(), 1);
            }
        }
    }

    /// Count for `country`, or `None` when it contributed no records.
    pub fn get(&self, country: &str) -> Option<u64> {
        self.counts.get(country).copied()
    }

    /// `(country, count)` pairs in first-encountered order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.order
            .iter()
            .map(move |country| (country.as_str(), self.counts[country]))
    }

    /// Sum over all countries.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Posts per (country, month), ordered by country then month.
pub type MonthlyCounts = BTreeMap<CountryMonth, u64>;

// ── PeakMonths ────────────────────────────────────────────────────────────────

/// Busiest month per country, enumerated in the order each country's first
/// dated record was encountered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeakMonths {
    order: Vec<String>,
    peaks: HashMap<String, PeakMonth>,
}

impl PeakMonths {
    fn offer(&mut self, country: &str, candidate: PeakMonth) {
        match self.peaks.get_mut(country) {
            Some(peak) => {
                if candidate.count > peak.count {
                    *peak = candidate;
                }
            }
            None => {
                self.peaks.insert(country.to_string(), candidate);
            }
        }
    }

    /// Peak for `country`, or `None` when it has no dated records.
    pub fn get(&self, country: &str) -> Option<&PeakMonth> {
        self.peaks.get(country)
    }

    pub fn contains_key(&self, country: &str) -> bool {
        self.peaks.contains_key(country)
    }

    /// `(country, peak)` pairs in first-encountered order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PeakMonth)> + '_ {
        self.order
            .iter()
            .map(move |country| (country.as_str(), &self.peaks[country]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Index<&str> for PeakMonths {
    type Output = PeakMonth;

    fn index(&self, country: &str) -> &PeakMonth {
        &self.peaks[country]
    }
}

// ── TrendSummary ──────────────────────────────────────────────────────────────

/// The three aggregate views over one record list.
#[derive(Debug, Clone, Default)]
pub struct TrendSummary {
    pub totals: CountryTotals,
    pub monthly: MonthlyCounts,
    pub peaks: PeakMonths,
}

/// Flat, serialisable form of a [`TrendSummary`].
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRows {
    pub totals: Vec<TotalRow>,
    pub monthly: Vec<MonthlyRow>,
    pub peaks: Vec<PeakRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalRow {
    pub country: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyRow {
    pub country: String,
    pub month: YearMonth,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeakRow {
    pub country: String,
    pub month: YearMonth,
    pub count: u64,
}

impl TrendSummary {
    /// Flatten into rows, keeping each view's display order.
    pub fn to_rows(&self) -> SummaryRows {
        SummaryRows {
            totals: self
                .totals
                .iter()
                .map(|(country, count)| TotalRow {
                    country: country.to_string(),
                    count,
                })
                .collect(),
            monthly: self
                .monthly
                .iter()
                .map(|(key, &count)| MonthlyRow {
                    country: key.country.clone(),
                    month: key.month,
                    count,
                })
                .collect(),
            peaks: self
                .peaks
                .iter()
                .map(|(country, peak)| PeakRow {
                    country: country.to_string(),
                    month: peak.month,
                    count: peak.count,
                })
                .collect(),
        }
    }
}

// ── TrendAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that groups records by country and month.
///
/// Every operation reads its input slice only and is deterministic.
pub struct TrendAggregator;

impl TrendAggregator {
    /// Count all records, dated or not, per country.
    pub fn counts_by_country(records: &[Record]) -> CountryTotals {
        let mut totals = CountryTotals::default();
        for record in records {
            totals.add(&record.country);
        }
        totals
    }

    /// Count dated records per (country, month). Undated records are left out.
    pub fn monthly_counts(records: &[Record]) -> MonthlyCounts {
        let mut map = MonthlyCounts::new();
        for record in records {
            let Some(month) = record.year_month() else {
                continue;
            };
            *map.entry(CountryMonth {
                country: record.country.clone(),
                month,
            })
            .or_insert(0) += 1;
        }
        map
    }

    /// Busiest month per country.
    ///
    /// When several months share the highest count the earliest one wins.
    pub fn peak_months(records: &[Record]) -> PeakMonths {
        Self::peaks_from_monthly(records, &Self::monthly_counts(records))
    }

    /// All three views at once.
    pub fn summarize(records: &[Record]) -> TrendSummary {
        let monthly = Self::monthly_counts(records);
        let peaks = Self::peaks_from_monthly(records, &monthly);
        TrendSummary {
            totals: Self::counts_by_country(records),
            monthly,
            peaks,
        }
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// `monthly` iterates each country's months chronologically, so only a
    /// strictly greater count replaces the current peak. Countries are listed
    /// in the order of their first dated record.
    fn peaks_from_monthly(records: &[Record], monthly: &MonthlyCounts) -> PeakMonths {
        let mut peaks = PeakMonths::default();
        for record in records {
            if record.date.is_some() && !peaks.order.contains(&record.country) {
                peaks.order.push(record.country.clone());
            }
        }
        for (key, &count) in monthly {
            peaks.offer(
                &key.country,
                PeakMonth {
                    month: key.month,
                    count,
                },
            );
        }
        peaks
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
