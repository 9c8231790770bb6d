use log::{debug, info};

use rla_tally::*;
use snafu::{prelude::*, Snafu};

pub mod config_reader;
mod io_batches;
mod io_cache;
mod io_common;
mod io_counties;
mod io_detailxml;
mod io_report;

pub use crate::rla::config_reader::{OutputTarget, Settings};
use crate::rla::io_cache::{compute_or_load, CacheStore, DirCacheStore, NoCache};

/// The cache key of the official totals.
const OFFICIAL_CACHE_KEY: &str = "detailxml";
/// The cache key of the audit totals, before correction.
const AUDIT_CACHE_KEY: &str = "rla-totals";

#[derive(Debug, Snafu)]
pub enum RlaError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading directory {path}"))]
    ReadingDir {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing {key} to JSON"))]
    SerializingJson {
        source: serde_json::Error,
        key: String,
    },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of CSV file {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error writing CSV output {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error reading XML file {path}"))]
    XmlParse {
        source: quick_xml::Error,
        path: String,
    },
    #[snafu(display("XML file {path}: missing element {element}"))]
    XmlMissingElement { path: String, element: String },
    #[snafu(display("XML file {path}: element {element} has no attribute {attribute}"))]
    XmlMissingAttribute {
        path: String,
        element: String,
        attribute: String,
    },
    #[snafu(display(
        "XML file {path}: attribute {attribute} of element {element} is not a number: {content:?}"
    ))]
    XmlNotANumber {
        path: String,
        element: String,
        attribute: String,
        content: String,
    },
    #[snafu(display("File name does not start with a county index: {path}"))]
    FileIndex { path: String },
    #[snafu(display("Error reading: {path}: {source}"))]
    ReconcileFile {
        source: ReconcileError,
        path: String,
    },
    #[snafu(display("{source}"))]
    Reconcile { source: ReconcileError },
    #[snafu(display("Difference detected between the comparison and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type RlaResult<T> = Result<T, RlaError>;

/// The number of counties listed in the summary printed at the end.
const SUMMARY_COUNTIES: usize = 10;

fn log_summary(rows: &[ReportRow]) {
    let header = header();
    for row in rows.iter().take(SUMMARY_COUNTIES + 1) {
        let cells: Vec<String> = header
            .iter()
            .zip(row.cells())
            .skip(1)
            .map(|(h, c)| format!("{}={}", h, c))
            .collect();
        info!("{}: {}", row.name, cells.join(" "));
    }
}

fn cache_store(settings: &Settings) -> Box<dyn CacheStore> {
    match settings.cache_dir.as_deref() {
        Some(dir) => Box::new(DirCacheStore::new(dir)),
        None => Box::new(NoCache {}),
    }
}

/// Reads all the sources, compares the totals and writes the comparison.
///
/// Nothing is written if any of the sources does not match the expectations.
pub fn run_comparison(settings: &Settings) -> RlaResult<Vec<ReportRow>> {
    info!("settings: {:?}", settings);
    let registry = io_counties::read_registry(&settings.counties_path)?;
    info!("Read {} counties", registry.len());

    let store = cache_store(settings);

    let official = compute_or_load(&*store, &registry, OFFICIAL_CACHE_KEY, || {
        io_detailxml::read_official_totals(&settings.detail_dir, &registry, &settings.contest)
    })?;

    let audit = compute_or_load(&*store, &registry, AUDIT_CACHE_KEY, || {
        let rows = io_batches::read_batch_rows(&settings.batches_path)?;
        let totals = audit_totals(&registry, &rows).context(ReconcileSnafu {})?;
        Ok(totals.into_counties())
    })?;

    let rows = reconcile(
        official,
        AuditTotals::from_counties(audit),
        &settings.correction,
        settings.expected_county_count,
    )
    .context(ReconcileSnafu {})?;
    debug!("run_comparison: rows: {:?}", rows);
    log_summary(&rows);

    let text = io_report::render_csv(&rows, &settings.out.to_string())?;
    io_report::write_report(&settings.out, &text)?;

    // The reference comparison, if provided
    if let Some(reference) = settings.reference.as_deref() {
        io_report::check_reference(reference, &text)?;
    }

    Ok(rows)
}
