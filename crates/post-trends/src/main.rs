mod bootstrap;

use anyhow::{Context, Result};
use trends_core::dates::DateResolver;
use trends_core::parser::RecordParser;
use trends_core::settings::Settings;
use trends_core::time_utils::parse_timezone;
use trends_data::analysis::analyze_countries;
use trends_data::reader::{discover_countries, DirectorySource};
use trends_data::report::{render_json, render_text};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("post-trends v{} starting", env!("CARGO_PKG_VERSION"));

    let data_dir = bootstrap::resolve_data_dir(settings.data_dir.as_deref());
    tracing::info!("Data directory: {}", data_dir.display());

    let countries = if settings.discover {
        discover_countries(&data_dir)?
    } else {
        settings.country_set()?
    };

    let zone = parse_timezone(&settings.timezone)
        .with_context(|| format!("--timezone {}", settings.timezone))?;
    tracing::info!("Dating ISO instants in {}", zone);

    let parser = RecordParser::new(DateResolver::new(zone));
    let source = DirectorySource::new(&data_dir);

    let analysis = analyze_countries(&source, &countries, &parser);
    let summary = analysis.summarize();

    match settings.format.as_str() {
        "json" => println!("{}", render_json(&analysis, &summary)?),
        _ => print!("{}", render_text(&analysis, &summary)),
    }

    Ok(())
}
