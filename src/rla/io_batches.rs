// Reader for the batch results of the audit.

use std::path::Path;

use log::info;
use snafu::prelude::*;

use crate::rla::io_common::path_str;
use crate::rla::*;

/// The rows of the batch results, without the header.
///
/// The rows are returned as they are: the number of columns is checked when the totals
/// are computed, so that the error points to the faulty row.
pub fn read_batch_rows(path: &Path) -> RlaResult<Vec<Vec<String>>> {
    let path_s = path_str(path);
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu {
            path: path_s.clone(),
        })?;
    let mut res: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        // The header is line 1 of the file.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu {
            path: path_s.clone(),
            lineno,
        })?;
        res.push(line.iter().map(|s| s.to_string()).collect());
    }
    info!("Read {} audit batches from {}", res.len(), path_s);
    Ok(res)
}
