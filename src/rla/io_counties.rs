// Reader for the list of participating counties.

use std::fs;
use std::path::Path;

use log::debug;
use rla_tally::*;
use serde::Deserialize;
use snafu::prelude::*;

use crate::rla::io_common::path_str;
use crate::rla::*;

/// The relevant part of `electionsettings.json`.
#[derive(Debug, Deserialize)]
struct ParticipatingCounties {
    #[serde(rename = "participatingcounties")]
    participating_counties: Vec<String>,
}

pub fn read_registry(path: &Path) -> RlaResult<CountyRegistry> {
    let path_s = path_str(path);
    let contents = fs::read_to_string(path).context(OpeningFileSnafu {
        path: path_s.clone(),
    })?;
    let js: ParticipatingCounties =
        serde_json::from_str(&contents).context(ParsingJsonSnafu {
            path: path_s.clone(),
        })?;
    debug!(
        "read_registry: {} records in {}",
        js.participating_counties.len(),
        path_s
    );
    CountyRegistry::from_records(&js.participating_counties).context(ReconcileFileSnafu { path: path_s })
}
