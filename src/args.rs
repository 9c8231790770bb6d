use clap::Parser;

/// Compares the official county results of the 2020 presidential election in Georgia
/// with the batch results of the risk-limiting audit.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file. The other options override the
    /// values of the configuration file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, default input-data/counties.json) The list of participating counties.
    #[clap(long, value_parser)]
    pub counties: Option<String>,

    /// (file path, default input-data/audit-report-batch-results-lines.csv) The batch
    /// results of the audit, in CSV format.
    #[clap(short, long, value_parser)]
    pub batches: Option<String>,

    /// (directory, default downloads/detailxml) The directory with one detail.xml file per
    /// county, named after the index of the county (000-Appling.xml, ...).
    #[clap(short, long, value_parser)]
    pub detail_dir: Option<String>,

    /// (directory, default cache) Where the totals are cached between runs.
    #[clap(long, value_parser)]
    pub cache_dir: Option<String>,

    /// If passed as an argument, the totals are always computed from the sources and
    /// nothing is written to the cache.
    #[clap(long, takes_value = false)]
    pub no_cache: bool,

    /// (file path or 'stdout', default output.csv) Where to write the comparison.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference comparison in CSV format. If provided, rlacompare will
    /// check that the comparison matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
