use log::debug;

use crate::config::*;
use crate::registry::CountyRegistry;

/// The number of columns in a row of the audit batch results.
pub const BATCH_COLUMNS: usize = 10;

/// The column with the first vote count. The counts are, in order: the three leading
/// candidates, the invalid write-ins, the valid write-ins, the undervotes and the overvotes.
const FIRST_COUNT_COLUMN: usize = 3;

/// The audit totals, as counted in the batches and before any correction.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AuditTotals {
    counties: TotalsSet<AuditCategory>,
}

impl AuditTotals {
    /// Every county of the registry, with zero votes.
    pub fn empty(registry: &CountyRegistry) -> AuditTotals {
        AuditTotals {
            counties: registry
                .counties()
                .iter()
                .map(|c| (c.name.clone(), VoteTotals::zero()))
                .collect(),
        }
    }

    /// Wraps totals that were computed earlier.
    pub fn from_counties(counties: TotalsSet<AuditCategory>) -> AuditTotals {
        AuditTotals { counties }
    }

    pub fn counties(&self) -> &TotalsSet<AuditCategory> {
        &self.counties
    }

    pub fn into_counties(self) -> TotalsSet<AuditCategory> {
        self.counties
    }

    /// Adds one batch row.
    ///
    /// `row` is the 1-based number of the row after the header, used for reporting errors.
    pub fn add_batch(
        &mut self,
        registry: &CountyRegistry,
        row: usize,
        fields: &[String],
    ) -> ReconcileResult<()> {
        if fields.len() != BATCH_COLUMNS {
            return Err(ReconcileError::ColumnCount {
                row,
                found: fields.len(),
            });
        }
        let name = registry.name_for_normalized(fields[0].as_str())?;

        let mut counts: Vec<u64> = Vec::with_capacity(BATCH_COLUMNS - FIRST_COUNT_COLUMN);
        for (column, field) in fields.iter().enumerate().skip(FIRST_COUNT_COLUMN) {
            let count = field
                .trim()
                .parse::<u64>()
                .map_err(|_| ReconcileError::InvalidCount {
                    row,
                    column,
                    content: field.clone(),
                })?;
            counts.push(count);
        }
        debug!(
            "add_batch: row {}: {} batch type {:?}: {:?}",
            row,
            name,
            fields[2],
            counts
        );

        let county_totals = self
            .counties
            .entry(name.to_string())
            .or_insert_with(VoteTotals::zero);
        county_totals.add(AuditCategory::Tbj, counts[..3].iter().sum());
        county_totals.add(AuditCategory::Bc, counts.iter().sum());
        county_totals.add(AuditCategory::InvW, counts[3]);
        county_totals.add(AuditCategory::ValW, counts[4]);
        county_totals.add(AuditCategory::Und, counts[5]);
        county_totals.add(AuditCategory::Ovr, counts[6]);
        Ok(())
    }
}

/// Computes the audit totals from all the batch rows (without the header row).
///
/// Counties without any batch keep zero votes.
pub fn audit_totals(
    registry: &CountyRegistry,
    rows: &[Vec<String>],
) -> ReconcileResult<AuditTotals> {
    let mut totals = AuditTotals::empty(registry);
    for (idx, fields) in rows.iter().enumerate() {
        totals.add_batch(registry, idx + 1, fields)?;
    }
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::tests::registry;

    fn batch(county: &str, counts: [u64; 7]) -> Vec<String> {
        let mut row = vec![
            county.to_string(),
            "1".to_string(),
            "Absentee".to_string(),
        ];
        row.extend(counts.iter().map(|c| c.to_string()));
        row
    }

    #[test]
    fn batches_are_summed() {
        let reg = registry(&["Appling", "Ben Hill", "Clay"]);
        let rows = vec![
            batch("APPLING", [100, 50, 2, 1, 3, 7, 1]),
            batch("BEN HILL", [10, 20, 0, 0, 0, 4, 0]),
            batch("APPLING", [5, 5, 0, 0, 1, 2, 0]),
        ];
        let totals = audit_totals(&reg, &rows).unwrap();
        let appling = &totals.counties()["Appling"];
        assert_eq!(appling.get(AuditCategory::Tbj), 162);
        assert_eq!(appling.get(AuditCategory::Bc), 177);
        assert_eq!(appling.get(AuditCategory::InvW), 1);
        assert_eq!(appling.get(AuditCategory::ValW), 4);
        assert_eq!(appling.get(AuditCategory::Und), 9);
        assert_eq!(appling.get(AuditCategory::Ovr), 1);
        assert_eq!(totals.counties()["Ben Hill"].get(AuditCategory::Bc), 34);
    }

    #[test]
    fn counties_without_batches() {
        let reg = registry(&["Appling", "Ben Hill", "Clay"]);
        let rows = vec![batch("APPLING", [1, 1, 1, 0, 0, 0, 0])];
        let totals = audit_totals(&reg, &rows).unwrap();
        assert_eq!(totals.counties().len(), 3);
        for (name, t) in totals.counties().iter() {
            assert_eq!(t.iter().count(), AuditCategory::VALUES.len(), "{}", name);
        }
        assert_eq!(totals.counties()["Clay"], VoteTotals::zero());
    }

    #[test]
    fn short_row() {
        let reg = registry(&["Appling"]);
        let mut short = batch("APPLING", [1, 1, 1, 0, 0, 0, 0]);
        short.pop();
        let rows = vec![batch("APPLING", [1, 1, 1, 0, 0, 0, 0]), short];
        let err = audit_totals(&reg, &rows).unwrap_err();
        assert_eq!(err, ReconcileError::ColumnCount { row: 2, found: 9 });
        assert_eq!(err.kind(), ErrorKind::SourceMismatch);
    }

    #[test]
    fn unknown_county() {
        let reg = registry(&["Appling"]);
        let rows = vec![batch("Appling", [1, 1, 1, 0, 0, 0, 0])];
        assert_eq!(
            audit_totals(&reg, &rows),
            Err(ReconcileError::UnknownCounty {
                name: "Appling".to_string()
            })
        );
    }

    #[test]
    fn invalid_count() {
        let reg = registry(&["Appling"]);
        let mut row = batch("APPLING", [1, 1, 1, 0, 0, 0, 0]);
        row[8] = "-3".to_string();
        let rows = vec![row];
        assert_eq!(
            audit_totals(&reg, &rows),
            Err(ReconcileError::InvalidCount {
                row: 1,
                column: 8,
                content: "-3".to_string()
            })
        );
    }
}
