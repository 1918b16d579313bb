//! Text and JSON rendering of an analysis.

use serde::Serialize;
use trends_core::error::Result;
use trends_core::formatting::{
    format_country_total, format_heading, format_monthly_count, format_peak_month,
};

use crate::aggregator::{SummaryRows, TrendSummary};
use crate::analysis::{AnalysisMetadata, AnalysisResult, CountryLoadSummary};

/// Render the console report: load results, then the three views.
pub fn render_text(analysis: &AnalysisResult, summary: &TrendSummary) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format_heading("Loading"));
    for load in &analysis.loads {
        lines.push(match load {
            CountryLoadSummary::Loaded {
                country, records, ..
            } => format!("✔ {}: {} loaded", country, records),
            CountryLoadSummary::Skipped { country, .. } => {
                format!("⚠ {}: source unavailable", country)
            }
        });
    }
    lines.push(String::new());
    lines.push(format!("Total valid posts: {}", analysis.records.len()));

    lines.push(String::new());
    lines.push(format_heading("Posts per country"));
    for (country, count) in summary.totals.iter() {
        lines.push(format_country_total(country, count));
    }

    lines.push(String::new());
    lines.push(format_heading("Monthly posts per country"));
    for (key, &count) in &summary.monthly {
        lines.push(format_monthly_count(&key.country, key.month, count));
    }

    lines.push(String::new());
    lines.push(format_heading("Peak month per country"));
    for (country, peak) in summary.peaks.iter() {
        lines.push(format_peak_month(country, peak.month, peak.count));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    metadata: &'a AnalysisMetadata,
    loads: &'a [CountryLoadSummary],
    #[serde(flatten)]
    summary: SummaryRows,
}

/// Render the report as pretty-printed JSON.
pub fn render_json(analysis: &AnalysisResult, summary: &TrendSummary) -> Result<String> {
    let report = JsonReport {
        metadata: &analysis.metadata,
        loads: &analysis.loads,
        summary: summary.to_rows(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
