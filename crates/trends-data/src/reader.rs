//! Line sources and per-country record loading.
//!
//! A [`LineSource`] hands out a reader for each country's export; the
//! loader turns its lines into [`Record`]s through a [`RecordParser`].

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

use trends_core::error::{Result, TrendsError};
use trends_core::models::{CountrySet, Record};
use trends_core::parser::{is_header_line, RecordParser};
use tracing::{debug, warn};

// ── LineSource ────────────────────────────────────────────────────────────────

/// Anything that can provide the raw lines of a country's export.
pub trait LineSource {
    /// Open the export for `country`. The returned reader is dropped by the
    /// loader once all its lines have been consumed.
    fn open(&self, country: &str) -> Result<Box<dyn BufRead + '_>>;
}

/// Reads `<data_dir>/<Country>.csv`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    data_dir: PathBuf,
}

impl DirectorySource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the export file for `country`.
    pub fn path_for(&self, country: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", country))
    }
}

impl LineSource for DirectorySource {
    fn open(&self, country: &str) -> Result<Box<dyn BufRead + '_>> {
        let path = self.path_for(country);
        if !path.is_file() {
            return Err(TrendsError::SourceNotFound {
                country: country.to_string(),
                path,
            });
        }

        let file = File::open(&path).map_err(|source| TrendsError::FileRead { path, source })?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// In-memory bundle of exports keyed by country.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    contents: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the export for `country`.
    pub fn with(mut self, country: impl Into<String>, contents: impl Into<String>) -> Self {
        self.contents.insert(country.into(), contents.into());
        self
    }
}

impl LineSource for MemorySource {
    fn open(&self, country: &str) -> Result<Box<dyn BufRead + '_>> {
        let contents = self
            .contents
            .get(country)
            .ok_or_else(|| TrendsError::SourceNotFound {
                country: country.to_string(),
                path: PathBuf::from(format!("<memory>/{}.csv", country)),
            })?;
        Ok(Box::new(Cursor::new(contents.as_bytes())))
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Records read from one country's export plus line counters.
#[derive(Debug, Clone, Default)]
pub struct CountryLoad {
    pub records: Vec<Record>,
    /// Non-blank lines seen, header included.
    pub lines_read: u64,
    /// Lines the parser rejected.
    pub rejected: u64,
    pub header_skipped: bool,
}

/// Read every line of `reader` as a row of `country`'s export.
///
/// Blank lines are ignored. When the first non-blank line looks like a
/// header it is skipped without being parsed. Lines that are not valid UTF-8
/// are dropped. Any other read error ends the source; the records read so
/// far are kept.
pub fn read_records<R: BufRead>(reader: R, country: &str, parser: &RecordParser) -> CountryLoad {
    let mut load = CountryLoad::default();
    let mut seen_content = false;

    for line_result in reader.lines() {
        let line = match line_result {
            Ok(l) => l,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                debug!("Skipping unreadable line in {} export: {}", country, e);
                continue;
            }
            Err(e) => {
                warn!("Stopped reading {} export early: {}", country, e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        load.lines_read += 1;

        if !seen_content {
            seen_content = true;
            if is_header_line(&line) {
                load.header_skipped = true;
                continue;
            }
        }

        match parser.parse(&line, country) {
            Some(record) => load.records.push(record),
            None => load.rejected += 1,
        }
    }

    debug!(
        "{}: {} lines read, {} rejected, {} records",
        country,
        load.lines_read,
        load.rejected,
        load.records.len()
    );

    load
}

/// Open `country` from `source` and read all of its records.
pub fn load_country(
    source: &dyn LineSource,
    country: &str,
    parser: &RecordParser,
) -> Result<CountryLoad> {
    let reader = source.open(country)?;
    Ok(read_records(reader, country, parser))
}

// ── Discovery ─────────────────────────────────────────────────────────────────

/// Build a country set from the `*.csv` files directly inside `data_dir`,
/// using each file stem as the country name. Sorted by name.
pub fn discover_countries(data_dir: &Path) -> Result<CountrySet> {
    if !data_dir.is_dir() {
        warn!("Data path does not exist: {}", data_dir.display());
        return Err(TrendsError::DataPathNotFound(data_dir.to_path_buf()));
    }

    let mut names: Vec<String> = walkdir::WalkDir::new(data_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .filter_map(|entry| {
            entry
                .path()
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(|stem| stem.to_string())
        })
        .collect();

    if names.is_empty() {
        return Err(TrendsError::NoDataFiles(data_dir.to_path_buf()));
    }

    names.sort();
    CountrySet::new(names)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::Tz;
    use std::io::Write;
    use tempfile::TempDir;
    use trends_core::dates::DateResolver;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn parser() -> RecordParser {
        RecordParser::new(DateResolver::new(Tz::UTC))
    }

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    // ── read_records ──────────────────────────────────────────────────────────

    #[test]
    fn test_read_records_skips_header_and_blank_lines() {
        let data = "\n,created_at,text,user_location\n\n0,2021-03-01,hello\n1,2021-03-02,world\n";
        let load = read_records(Cursor::new(data), "Japan", &parser());

        assert!(load.header_skipped);
        assert_eq!(load.lines_read, 3);
        assert_eq!(load.rejected, 0);
        assert_eq!(load.records.len(), 2);
        assert_eq!(load.records[0].text, "hello");
        assert_eq!(load.records[1].date, NaiveDate::from_ymd_opt(2021, 3, 2));
    }

    #[test]
    fn test_read_records_without_header() {
        let data = "0,2021-03-01,hello\n";
        let load = read_records(Cursor::new(data), "Japan", &parser());

        assert!(!load.header_skipped);
        assert_eq!(load.records.len(), 1);
    }

    #[test]
    fn test_read_records_header_rule_only_applies_to_first_line() {
        // A later line mentioning created_at in its text is a normal row.
        let data = "0,2021-03-01,first\n1,2021-03-02,the created_at column\n";
        let load = read_records(Cursor::new(data), "Japan", &parser());

        assert!(!load.header_skipped);
        assert_eq!(load.records.len(), 2);
    }

    #[test]
    fn test_read_records_counts_rejected_lines() {
        let data = "0,2021-03-01,ok\nno commas\n1,only-one\n2,created_at,late header\n";
        let load = read_records(Cursor::new(data), "Brazil", &parser());

        assert_eq!(load.records.len(), 1);
        assert_eq!(load.rejected, 3);
        assert_eq!(load.lines_read, 4);
    }

    #[test]
    fn test_read_records_handles_crlf() {
        let data = "0,2021-03-01,hello\r\n1,2021-03-02,world\r\n";
        let load = read_records(Cursor::new(data), "India", &parser());

        assert_eq!(load.records.len(), 2);
        assert_eq!(load.records[0].text, "hello");
    }

    #[test]
    fn test_read_records_skips_invalid_utf8() {
        let mut data: Vec<u8> = b"0,2021-03-01,good\n".to_vec();
        data.extend_from_slice(b"1,2021-03-02,bad \xff\xfe\n");
        data.extend_from_slice(b"2,2021-03-03,also good\n");
        let load = read_records(Cursor::new(data), "Japan", &parser());

        assert_eq!(load.records.len(), 2);
        assert_eq!(load.records[1].text, "also good");
    }

    struct BrokenDisk;

    impl io::Read for BrokenDisk {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "input/output error"))
        }
    }

    #[test]
    fn test_read_records_stops_on_persistent_read_error() {
        use std::io::Read;

        let reader = BufReader::new(Cursor::new("0,2021-03-01,kept\n").chain(BrokenDisk));
        let load = read_records(reader, "Brazil", &parser());

        assert_eq!(load.records.len(), 1);
        assert_eq!(load.records[0].text, "kept");
        assert_eq!(load.lines_read, 1);
    }

    #[test]
    fn test_read_records_empty_input() {
        let load = read_records(Cursor::new(""), "Japan", &parser());
        assert!(load.records.is_empty());
        assert_eq!(load.lines_read, 0);
        assert!(!load.header_skipped);
    }

    // ── DirectorySource ───────────────────────────────────────────────────────

    #[test]
    fn test_directory_source_loads_country_file() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "Japan.csv",
            &[",created_at,text", "0,Wed Dec 08 04:25:46 +0000 2021,#vaccine done"],
        );

        let source = DirectorySource::new(dir.path());
        let load = load_country(&source, "Japan", &parser()).unwrap();

        assert_eq!(load.records.len(), 1);
        assert_eq!(load.records[0].country, "Japan");
        assert_eq!(load.records[0].text, "vaccine done");
    }

    #[test]
    fn test_directory_source_missing_file() {
        let dir = TempDir::new().unwrap();
        let source = DirectorySource::new(dir.path());

        let err = load_country(&source, "Brazil", &parser()).unwrap_err();
        match err {
            TrendsError::SourceNotFound { country, path } => {
                assert_eq!(country, "Brazil");
                assert_eq!(path, dir.path().join("Brazil.csv"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_directory_source_path_for() {
        let source = DirectorySource::new("/data");
        assert_eq!(source.path_for("India"), PathBuf::from("/data/India.csv"));
        assert_eq!(source.data_dir(), Path::new("/data"));
    }

    // ── MemorySource ──────────────────────────────────────────────────────────

    #[test]
    fn test_memory_source_loads_bundle() {
        let source = MemorySource::new().with("Indonesia", "0,2021-07-01,halo\n");
        let load = load_country(&source, "Indonesia", &parser()).unwrap();
        assert_eq!(load.records.len(), 1);
        assert_eq!(load.records[0].text, "halo");
    }

    #[test]
    fn test_memory_source_missing_country() {
        let source = MemorySource::new();
        let err = load_country(&source, "Japan", &parser()).unwrap_err();
        assert!(matches!(err, TrendsError::SourceNotFound { .. }));
    }

    // ── discover_countries ────────────────────────────────────────────────────

    #[test]
    fn test_discover_countries_sorted_csv_stems() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "Japan.csv", &["x"]);
        write_csv(dir.path(), "Brazil.csv", &["x"]);
        write_csv(dir.path(), "notes.txt", &["x"]);
        let nested = dir.path().join("archive");
        std::fs::create_dir_all(&nested).unwrap();
        write_csv(&nested, "India.csv", &["x"]);

        let set = discover_countries(dir.path()).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["Brazil", "Japan"]);
    }

    #[test]
    fn test_discover_countries_missing_dir() {
        let err = discover_countries(Path::new("/tmp/does-not-exist-post-trends-xyz")).unwrap_err();
        assert!(matches!(err, TrendsError::DataPathNotFound(_)));
    }

    #[test]
    fn test_discover_countries_no_csv_files() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "readme.md", &["x"]);

        let err = discover_countries(dir.path()).unwrap_err();
        assert!(matches!(err, TrendsError::NoDataFiles(_)));
    }
}
