// Output of the comparison.

use std::fs;
use std::path::Path;

use log::{info, warn};
use rla_tally::*;
use snafu::prelude::*;
use text_diff::print_diff;

use crate::rla::io_common::path_str;
use crate::rla::*;

/// Renders the rows as CSV, with a header line.
///
/// `label` names the destination in the error messages.
pub fn render_csv(rows: &[ReportRow], label: &str) -> RlaResult<String> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![]);
    wtr.write_record(header())
        .context(CsvWriteSnafu { path: label })?;
    for row in rows.iter() {
        wtr.write_record(row.cells())
            .context(CsvWriteSnafu { path: label })?;
    }
    let bytes = match wtr.into_inner() {
        Ok(b) => b,
        Err(e) => {
            return Err(e.into_error()).context(WritingFileSnafu { path: label });
        }
    };
    Ok(String::from_utf8_lossy(&bytes).to_string())
}

pub fn write_report(out: &OutputTarget, text: &str) -> RlaResult<()> {
    match out {
        OutputTarget::Stdout => {
            print!("{}", text);
            Ok(())
        }
        OutputTarget::File(p) => {
            fs::write(p, text).context(WritingFileSnafu { path: path_str(p) })?;
            info!("wrote: {}", path_str(p));
            Ok(())
        }
    }
}

/// Checks the comparison against a reference file. The line endings are not compared.
pub fn check_reference(path: &Path, text: &str) -> RlaResult<()> {
    let path_s = path_str(path);
    let reference = fs::read_to_string(path).context(OpeningFileSnafu {
        path: path_s.clone(),
    })?;
    let reference = reference.replace("\r\n", "\n");
    if reference != text {
        warn!("Found differences with the reference comparison");
        print_diff(reference.as_str(), text, "\n");
        return ReferenceMismatchSnafu { path: path_s }.fail();
    }
    info!("The comparison matches the reference {}", path_s);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<ReportRow> {
        let mut official: VoteTotals<OfficialCategory> = VoteTotals::zero();
        official.add(OfficialCategory::Tbj, 10);
        official.add(OfficialCategory::Bc, 12);
        official.add(OfficialCategory::Und, 2);
        let mut audit: VoteTotals<AuditCategory> = VoteTotals::zero();
        audit.add(AuditCategory::Tbj, 10);
        audit.add(AuditCategory::Bc, 11);
        audit.add(AuditCategory::Und, 1);
        vec![
            ReportRow::new("ALL", &official, &audit),
            ReportRow::new("Clay", &official, &audit),
        ]
    }

    #[test]
    fn render() {
        let text = render_csv(&rows(), "test").unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("County,Ofc-TBJ,Ofc-BC,"));
        assert_eq!(lines[1], "ALL,10,12,2,0,10,11,1,0,0,0,0,-1,-1,0");
        assert!(text.ends_with('\n'));
        assert!(!text.contains('\r'));
    }

    #[test]
    fn reference() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("reference.csv");
        let text = render_csv(&rows(), "test").unwrap();
        fs::write(&p, text.replace('\n', "\r\n")).unwrap();
        assert!(check_reference(&p, &text).is_ok());
        fs::write(&p, text.replace("Clay", "Dade")).unwrap();
        assert!(matches!(
            check_reference(&p, &text),
            Err(RlaError::ReferenceMismatch { .. })
        ));
    }

    #[test]
    fn write_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("out.csv");
        write_report(&OutputTarget::File(p.clone()), "County\n").unwrap();
        assert_eq!(fs::read_to_string(&p).unwrap(), "County\n");
    }
}
