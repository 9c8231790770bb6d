use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rla_tally::*;
use snafu::prelude::*;

use crate::args::Args;
use crate::rla::io_common::{path_str, resolve_path};
use crate::rla::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

pub const DEFAULT_COUNTIES_PATH: &str = "input-data/counties.json";
pub const DEFAULT_BATCHES_PATH: &str = "input-data/audit-report-batch-results-lines.csv";
pub const DEFAULT_DETAIL_DIR: &str = "downloads/detailxml";
pub const DEFAULT_CACHE_DIR: &str = "cache";
pub const DEFAULT_OUTPUT_PATH: &str = "output.csv";

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ContestConfig {
    #[serde(rename = "namePrefix")]
    pub name_prefix: Option<String>,
    pub candidates: Option<Vec<String>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorrectionConfig {
    pub county: String,
    /// A number, or a string with a number.
    amount: JSValue,
    pub reference: Option<String>,
}

impl CorrectionConfig {
    pub fn amount(&self) -> RlaResult<u64> {
        read_js_int(&Some(self.amount.clone()), "correction.amount")
    }
}

/// The content of the configuration file. All the fields are optional.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RlaConfig {
    #[serde(rename = "countiesPath")]
    pub counties_path: Option<String>,
    #[serde(rename = "batchResultsPath")]
    pub batch_results_path: Option<String>,
    #[serde(rename = "detailXmlDir")]
    pub detail_xml_dir: Option<String>,
    #[serde(rename = "cacheDir")]
    pub cache_dir: Option<String>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
    #[serde(rename = "referencePath")]
    pub reference_path: Option<String>,
    #[serde(rename = "expectedCountyCount")]
    _expected_county_count: Option<JSValue>,
    pub contest: Option<ContestConfig>,
    pub correction: Option<CorrectionConfig>,
}

impl RlaConfig {
    pub fn expected_county_count(&self) -> RlaResult<Option<u64>> {
        if self._expected_county_count.is_some() {
            read_js_int(&self._expected_county_count, "expectedCountyCount").map(Some)
        } else {
            Ok(None)
        }
    }
}

pub fn read_config(path: &Path) -> RlaResult<RlaConfig> {
    let path_s = path_str(path);
    let contents = fs::read_to_string(path).context(OpeningFileSnafu {
        path: path_s.clone(),
    })?;
    debug!("read_config: {}", contents);
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path: path_s })
}

fn read_js_int(x: &Option<JSValue>, field: &str) -> RlaResult<u64> {
    match x {
        Some(JSValue::Number(n)) => match n.as_u64() {
            Some(v) => Ok(v),
            None => whatever!("{}: not a positive integer: {}", field, n),
        },
        Some(JSValue::String(s)) => match s.trim().parse::<u64>() {
            Ok(v) => Ok(v),
            Err(_) => whatever!("{}: not a positive integer: {:?}", field, s),
        },
        other => whatever!("{}: not a positive integer: {:?}", field, other),
    }
}

/// Where the comparison is written.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl Display for OutputTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputTarget::Stdout => write!(f, "stdout"),
            OutputTarget::File(p) => write!(f, "{}", p.display()),
        }
    }
}

/// All the options of a comparison, once the command line and the configuration file
/// have been merged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Settings {
    pub counties_path: PathBuf,
    pub batches_path: PathBuf,
    pub detail_dir: PathBuf,
    /// No caching if not provided.
    pub cache_dir: Option<PathBuf>,
    pub out: OutputTarget,
    pub reference: Option<PathBuf>,
    pub expected_county_count: usize,
    pub contest: ContestRules,
    pub correction: Correction,
}

impl Settings {
    /// Merges the command line arguments with the configuration file, if any.
    ///
    /// The command line takes precedence. The relative paths of the configuration file
    /// are relative to the directory of the file.
    pub fn resolve(args: &Args) -> RlaResult<Settings> {
        let (config, root) = match args.config.as_deref() {
            Some(p) => {
                let config_p = Path::new(p);
                info!("Reading configuration file {:?}", p);
                (read_config(config_p)?, config_p.parent().map(|x| x.to_path_buf()))
            }
            None => (RlaConfig::default(), None),
        };
        debug!("config: {:?}", config);
        let root = root.as_deref();

        let pick = |arg: &Option<String>, from_config: &Option<String>, default: &str| -> PathBuf {
            match (arg, from_config) {
                (Some(a), _) => PathBuf::from(a),
                (None, Some(c)) => resolve_path(root, c),
                (None, None) => PathBuf::from(default),
            }
        };

        let cache_dir = if args.no_cache {
            None
        } else {
            Some(pick(&args.cache_dir, &config.cache_dir, DEFAULT_CACHE_DIR))
        };

        let out = match (args.out.as_deref(), config.output_path.as_deref()) {
            (Some("stdout"), _) | (None, Some("stdout")) => OutputTarget::Stdout,
            _ => OutputTarget::File(pick(&args.out, &config.output_path, DEFAULT_OUTPUT_PATH)),
        };

        let reference = match (&args.reference, &config.reference_path) {
            (Some(a), _) => Some(PathBuf::from(a)),
            (None, Some(c)) => Some(resolve_path(root, c)),
            (None, None) => None,
        };

        let expected_county_count = match config.expected_county_count()? {
            Some(0) => whatever!("expectedCountyCount: there must be at least one county"),
            Some(x) => x as usize,
            None => EXPECTED_COUNTY_COUNT,
        };

        let mut contest = ContestRules::president_2020();
        if let Some(cc) = config.contest.as_ref() {
            if let Some(prefix) = cc.name_prefix.as_ref() {
                contest.name_prefix = prefix.clone();
            }
            if let Some(candidates) = cc.candidates.as_ref() {
                if candidates.is_empty() || candidates.iter().any(|c| c.is_empty()) {
                    whatever!("contest.candidates: empty candidate names are not accepted");
                }
                contest.candidates = candidates.clone();
            }
        }

        let correction = match config.correction.as_ref() {
            Some(cc) => Correction {
                county: cc.county.clone(),
                amount: cc.amount()?,
                reference: cc.reference.clone(),
            },
            None => Correction::gwinnett_second_card(),
        };

        Ok(Settings {
            counties_path: pick(&args.counties, &config.counties_path, DEFAULT_COUNTIES_PATH),
            batches_path: pick(&args.batches, &config.batch_results_path, DEFAULT_BATCHES_PATH),
            detail_dir: pick(&args.detail_dir, &config.detail_xml_dir, DEFAULT_DETAIL_DIR),
            cache_dir,
            out,
            reference,
            expected_county_count,
            contest,
            correction,
        })
    }
}
