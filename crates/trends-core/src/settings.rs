use clap::Parser;
use std::path::PathBuf;

use crate::error::Result;
use crate::models::{CountrySet, DEFAULT_COUNTRIES};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Per-country post statistics from CSV exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "post-trends",
    about = "Per-country post statistics from CSV exports",
    version
)]
pub struct Settings {
    /// Directory containing one <Country>.csv export per country
    #[arg(env = "POST_TRENDS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Countries to analyse, comma separated
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect::<Vec<_>>()
    )]
    pub countries: Vec<String>,

    /// Derive the country list from the CSV files in the data directory
    #[arg(long, conflicts_with = "countries")]
    pub discover: bool,

    /// Timezone used to date ISO 8601 instants (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Report format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and resolve `"auto"` values.
    pub fn load() -> Self {
        Self::resolve_auto_values(Settings::parse())
    }

    /// Same as [`load`](Self::load) but with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve_auto_values(Settings::parse_from(args))
    }

    /// The configured countries as a validated [`CountrySet`].
    pub fn country_set(&self) -> Result<CountrySet> {
        CountrySet::new(&self.countries)
    }

    /// Resolve the `"auto"` timezone and apply the `--debug` flag.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        settings.timezone = crate::time_utils::resolve_timezone_name(&settings.timezone);

        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
