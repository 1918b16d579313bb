//! Multi-country ingestion pipeline.
//!
//! Loads every configured country from a [`LineSource`] in order and merges
//! the records into one list, returning an [`AnalysisResult`] ready for
//! aggregation and reporting.

use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use trends_core::models::{CountrySet, Record};
use trends_core::parser::RecordParser;

use crate::aggregator::{TrendAggregator, TrendSummary};
use crate::reader::{load_country, LineSource};

// ── Public types ──────────────────────────────────────────────────────────────

/// Outcome of loading one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CountryLoadSummary {
    /// The source was read; `records` rows were accepted.
    Loaded {
        country: String,
        records: usize,
        rejected: u64,
    },
    /// The source could not be opened; the country contributes nothing.
    Skipped { country: String, reason: String },
}

impl CountryLoadSummary {
    pub fn country(&self) -> &str {
        match self {
            Self::Loaded { country, .. } | Self::Skipped { country, .. } => country,
        }
    }
}

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    pub countries_requested: usize,
    pub countries_loaded: usize,
    pub records_total: usize,
    /// Records whose date resolved.
    pub records_dated: usize,
    /// Wall-clock seconds spent reading all sources.
    pub load_time_seconds: f64,
}

/// The complete output of [`analyze_countries`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Every accepted record, countries in configured order.
    pub records: Vec<Record>,
    /// One entry per requested country, in configured order.
    pub loads: Vec<CountryLoadSummary>,
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Aggregate the loaded records.
    pub fn summarize(&self) -> TrendSummary {
        TrendAggregator::summarize(&self.records)
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Load `countries` from `source` one after another.
///
/// A country whose source cannot be opened is logged, reported as
/// [`CountryLoadSummary::Skipped`] and otherwise ignored; the batch always
/// completes.
pub fn analyze_countries(
    source: &dyn LineSource,
    countries: &CountrySet,
    parser: &RecordParser,
) -> AnalysisResult {
    let start = Instant::now();
    info!("Loading {} countries", countries.len());

    let mut records: Vec<Record> = Vec::new();
    let mut loads: Vec<CountryLoadSummary> = Vec::with_capacity(countries.len());

    for country in countries.iter() {
        match load_country(source, country, parser) {
            Ok(load) => {
                info!(
                    "{}: {} records loaded ({} rejected)",
                    country,
                    load.records.len(),
                    load.rejected
                );
                loads.push(CountryLoadSummary::Loaded {
                    country: country.to_string(),
                    records: load.records.len(),
                    rejected: load.rejected,
                });
                records.extend(load.records);
            }
            Err(e) => {
                warn!("Skipping {}: {}", country, e);
                loads.push(CountryLoadSummary::Skipped {
                    country: country.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let load_time = start.elapsed();
    let countries_loaded = loads
        .iter()
        .filter(|l| matches!(l, CountryLoadSummary::Loaded { .. }))
        .count();
    let records_dated = records.iter().filter(|r| r.date.is_some()).count();

    info!(
        "Loaded {} records ({} dated) from {} of {} countries in {:.1}ms",
        records.len(),
        records_dated,
        countries_loaded,
        countries.len(),
        load_time.as_secs_f64() * 1000.0
    );

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        countries_requested: countries.len(),
        countries_loaded,
        records_total: records.len(),
        records_dated,
        load_time_seconds: load_time.as_secs_f64(),
    };

    AnalysisResult {
        records,
        loads,
        metadata,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Tz;
    use trends_core::dates::DateResolver;
    use trends_core::models::YearMonth;

    use crate::reader::MemorySource;

    fn parser() -> RecordParser {
        RecordParser::new(DateResolver::new(Tz::UTC))
    }

    fn sample_source() -> MemorySource {
        MemorySource::new()
            .with(
                "Japan",
                ",created_at,text\n\
                 0,Wed Dec 08 04:25:46 +0000 2021,#booster done\n\
                 1,Thu Dec 09 10:00:00 +0000 2021,queue https://t.co/x\n\
                 2,not a date,undated post\n",
            )
            .with(
                "Brazil",
                "0,2021-03-01,hello #world https://a.b\n\
                 broken line\n",
            )
    }

    #[test]
    fn test_analyze_countries_merges_in_configured_order() {
        let countries = CountrySet::new(["Japan", "Brazil"]).unwrap();
        let result = analyze_countries(&sample_source(), &countries, &parser());

        assert_eq!(result.records.len(), 4);
        assert_eq!(result.records[0].country, "Japan");
        assert_eq!(result.records[3].country, "Brazil");
        assert_eq!(result.records[3].text, "hello world");
        assert_eq!(result.metadata.records_total, 4);
        assert_eq!(result.metadata.records_dated, 3);
    }

    #[test]
    fn test_analyze_countries_load_summaries() {
        let countries = CountrySet::new(["Brazil", "Japan"]).unwrap();
        let result = analyze_countries(&sample_source(), &countries, &parser());

        assert_eq!(
            result.loads,
            vec![
                CountryLoadSummary::Loaded {
                    country: "Brazil".to_string(),
                    records: 1,
                    rejected: 1,
                },
                CountryLoadSummary::Loaded {
                    country: "Japan".to_string(),
                    records: 3,
                    rejected: 0,
                },
            ]
        );
    }

    #[test]
    fn test_analyze_countries_missing_source_is_skipped() {
        let countries = CountrySet::new(["India", "Japan"]).unwrap();
        let result = analyze_countries(&sample_source(), &countries, &parser());

        assert!(matches!(
            &result.loads[0],
            CountryLoadSummary::Skipped { country, .. } if country == "India"
        ));
        assert_eq!(result.loads[0].country(), "India");
        assert_eq!(result.metadata.countries_requested, 2);
        assert_eq!(result.metadata.countries_loaded, 1);
        assert_eq!(result.records.len(), 3);

        let summary = result.summarize();
        assert_eq!(summary.totals.get("India"), None);
        assert!(!summary.peaks.contains_key("India"));
    }

    #[test]
    fn test_analyze_countries_all_missing() {
        let countries = CountrySet::default();
        let result = analyze_countries(&MemorySource::new(), &countries, &parser());

        assert!(result.records.is_empty());
        assert_eq!(result.loads.len(), 5);
        assert_eq!(result.metadata.countries_loaded, 0);

        let summary = result.summarize();
        assert!(summary.totals.is_empty());
        assert!(summary.monthly.is_empty());
    }

    #[test]
    fn test_analyze_then_summarize() {
        let countries = CountrySet::new(["Japan", "Brazil"]).unwrap();
        let summary = analyze_countries(&sample_source(), &countries, &parser()).summarize();

        assert_eq!(summary.totals.get("Japan"), Some(3));
        assert_eq!(summary.totals.get("Brazil"), Some(1));
        assert_eq!(summary.peaks["Japan"].month, YearMonth::new(2021, 12));
        assert_eq!(summary.peaks["Japan"].count, 2);
        assert_eq!(summary.peaks["Brazil"].month, YearMonth::new(2021, 3));
    }

    #[test]
    fn test_analyze_countries_from_directory() {
        use crate::reader::DirectorySource;
        use std::io::Write;

        let dir = tempfile::TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join("Australia.csv")).unwrap();
        writeln!(file, ",created_at,text,user_location").unwrap();
        writeln!(file, "0,Mon Nov 01 08:00:00 +1100 2021,Lockdown over #Sydney,Sydney").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "1,Tue Nov 02 09:30:00 +1100 2021,https://t.co/x cafes open").unwrap();
        drop(file);

        let countries = CountrySet::new(["Australia", "Indonesia"]).unwrap();
        let source = DirectorySource::new(dir.path());
        let result = analyze_countries(&source, &countries, &parser());

        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].text, "lockdown over sydney,sydney");
        assert_eq!(result.records[1].text, "cafes open");
        assert!(matches!(result.loads[1], CountryLoadSummary::Skipped { .. }));

        let summary = result.summarize();
        assert_eq!(summary.peaks["Australia"].month, YearMonth::new(2021, 11));
        assert_eq!(summary.peaks["Australia"].count, 2);
    }

    #[test]
    fn test_load_summary_serializes_with_status_tag() {
        let summary = CountryLoadSummary::Skipped {
            country: "India".to_string(),
            reason: "missing".to_string(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["country"], "India");
    }
}
