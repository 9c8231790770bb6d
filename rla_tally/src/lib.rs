/*!
Comparison of the official results of an election with the totals of a
risk-limiting audit (RLA), county by county.

The library does not read any file. The callers provide:
- the list of counties, as raw records (see [`CountyRegistry`])
- for each county, the official results as a [`DetailRecord`]
- the rows of the audit batch results

and get back a list of [`ReportRow`], sorted by decreasing discrepancy.

```
use rla_tally::*;

let registry = CountyRegistry::from_records(&["Appling|105371|271560", "Bacon|105372|271561"])?;

let mut official: TotalsSet<OfficialCategory> = TotalsSet::new();
for county in registry.counties() {
    let record = DetailRecord {
        ballots_cast: 100,
        contests: vec![ContestRecord {
            name: "President of the United States".to_string(),
            vote_types: vec![("Undervotes".to_string(), 2)],
            choices: vec![("Joseph R. Biden".to_string(), 98)],
        }],
    };
    add_official_county(&mut official, &county.name, &record, &ContestRules::president_2020())?;
}

let row = |c: &str| -> Vec<String> {
    vec![c, "1", "Election Day", "0", "97", "0", "0", "0", "3", "0"]
        .into_iter()
        .map(|s| s.to_string())
        .collect()
};
let audit = audit_totals(&registry, &[row("APPLING"), row("BACON")])?;
let no_correction = Correction { county: "Bacon".to_string(), amount: 0, reference: None };

let rows = reconcile(official, audit, &no_correction, 2)?;
assert_eq!(rows[0].name, "ALL");
assert_eq!(rows[0].deltas, vec![-2, 0, 2, 0]);
# Ok::<(), ReconcileError>(())
```
*/

mod config;
pub mod aggregate;
pub mod audit;
pub mod correction;
pub mod manual;
pub mod official;
pub mod registry;
pub mod report;

use log::info;

pub use crate::aggregate::{aggregate, check_county_sets, sum_totals, AggregatedTotals};
pub use crate::audit::{audit_totals, AuditTotals};
pub use crate::config::*;
pub use crate::correction::CorrectedAuditTotals;
pub use crate::official::{add_official_county, official_totals, ContestRecord, DetailRecord};
pub use crate::registry::{County, CountyRegistry};
pub use crate::report::{build_report, header, ReportRow};

/// Runs the comparison once all the totals have been read.
///
/// Arguments:
/// * `official` the official totals of every county
/// * `audit` the audit totals, before correction
/// * `correction` the correction to apply to the audit totals
/// * `expected_count` the number of counties that both sets of totals must cover
pub fn reconcile(
    official: TotalsSet<OfficialCategory>,
    audit: AuditTotals,
    correction: &Correction,
    expected_count: usize,
) -> ReconcileResult<Vec<ReportRow>> {
    info!(
        "Comparing {} official and {} audit counties",
        official.len(),
        audit.counties().len()
    );
    let corrected = audit.apply_correction(correction)?;
    let (official, audit) = aggregate(official, corrected, expected_count)?;
    build_report(&official, &audit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::official::tests::president_record;
    use crate::registry::tests::georgia_like;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Every county gets the same numbers, except for Gwinnett whose audit counted the
    /// second ballot card as undervotes.
    #[test]
    fn georgia_end_to_end() {
        init();
        let registry = georgia_like();
        let rules = ContestRules::president_2020();

        let mut official: TotalsSet<OfficialCategory> = TotalsSet::new();
        for county in registry.counties() {
            let rec = if county.name == "Gwinnett" {
                president_record(280000, 10000, 539, [150000, 110000, 9461])
            } else {
                president_record(1000, 10, 0, [600, 380, 10])
            };
            add_official_county(&mut official, &county.name, &rec, &rules).unwrap();
        }

        let mut rows: Vec<Vec<String>> = Vec::new();
        for county in registry.counties() {
            let counts: [u64; 7] = if county.name == "Gwinnett" {
                [150000, 110000, 9461, 0, 0, 130000, 539]
            } else {
                [600, 380, 10, 0, 0, 12, 0]
            };
            let mut row = vec![
                county.normalized_name.clone(),
                "1".to_string(),
                "Absentee by Mail".to_string(),
            ];
            row.extend(counts.iter().map(|c| c.to_string()));
            rows.push(row);
        }
        let audit = audit_totals(&registry, &rows).unwrap();
        assert_eq!(audit.counties().len(), EXPECTED_COUNTY_COUNT);

        let report = reconcile(
            official,
            audit,
            &Correction::gwinnett_second_card(),
            EXPECTED_COUNTY_COUNT,
        )
        .unwrap();
        assert_eq!(report.len(), 160);
        assert!(report[0].is_all());
        let gwinnett = report.iter().find(|r| r.name == "Gwinnett").unwrap();
        assert_eq!(gwinnett.audit[1], 280539);
        assert_eq!(gwinnett.audit[2], 10539);
        assert_eq!(gwinnett.deltas, vec![0, 539, 539, 0]);
        assert_eq!(report[1].name, "Gwinnett");
        // The remaining counties have a BC delta of 2, sorted by name.
        assert_eq!(report[2].name, "Appling");
        assert_eq!(report[3].name, "Ben Hill");
        assert_eq!(report[4].name, "County003");
        assert_eq!(
            report[0].delta(OfficialCategory::Bc),
            539 + 2 * (EXPECTED_COUNTY_COUNT as i64 - 1)
        );
    }

    #[test]
    fn missing_official_county() {
        init();
        let registry = georgia_like();
        let mut official: TotalsSet<OfficialCategory> = TotalsSet::new();
        for county in registry.counties().iter().skip(1) {
            let rec = president_record(1000, 10, 0, [600, 380, 10]);
            add_official_county(&mut official, &county.name, &rec, &ContestRules::president_2020())
                .unwrap();
        }
        let audit = AuditTotals::empty(&registry);
        let err = reconcile(
            official,
            audit,
            &Correction {
                county: "Gwinnett".to_string(),
                amount: 0,
                reference: None,
            },
            EXPECTED_COUNTY_COUNT,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ReconcileError::CountySetMismatch {
                only_official: vec![],
                only_audit: vec!["Appling".to_string()],
            }
        );
    }
}
