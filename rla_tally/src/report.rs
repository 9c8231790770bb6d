use std::cmp::Ordering;

use crate::aggregate::AggregatedTotals;
use crate::config::*;

pub const OFFICIAL_PREFIX: &str = "Ofc";
pub const AUDIT_PREFIX: &str = "RLA";
pub const DELTA_PREFIX: &str = "\u{0394}";

/// One line of the comparison between the official and the audit totals.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportRow {
    pub name: String,
    /// In the order of `OfficialCategory::VALUES`.
    pub official: Vec<u64>,
    /// In the order of `AuditCategory::VALUES`.
    pub audit: Vec<u64>,
    /// Audit minus official, in the order of `OfficialCategory::VALUES`.
    pub deltas: Vec<i64>,
}

impl ReportRow {
    pub fn new(
        name: &str,
        official: &VoteTotals<OfficialCategory>,
        audit: &VoteTotals<AuditCategory>,
    ) -> ReportRow {
        let deltas = OfficialCategory::VALUES
            .iter()
            .map(|c| audit.get(AuditCategory::from(*c)) as i64 - official.get(*c) as i64)
            .collect();
        ReportRow {
            name: name.to_string(),
            official: official.values(),
            audit: audit.values(),
            deltas,
        }
    }

    pub fn delta(&self, category: OfficialCategory) -> i64 {
        OfficialCategory::VALUES
            .iter()
            .position(|c| *c == category)
            .and_then(|idx| self.deltas.get(idx))
            .copied()
            .unwrap_or_default()
    }

    pub fn is_all(&self) -> bool {
        self.name == ALL_COUNTIES
    }

    /// The cells of the row, as plain decimal text.
    pub fn cells(&self) -> Vec<String> {
        let mut res = vec![self.name.clone()];
        res.extend(self.official.iter().map(|v| v.to_string()));
        res.extend(self.audit.iter().map(|v| v.to_string()));
        res.extend(self.deltas.iter().map(|v| v.to_string()));
        res
    }
}

/// The header of the report: the county, then the official totals, the audit
/// totals and the deltas.
pub fn header() -> Vec<String> {
    let mut res = vec!["County".to_string()];
    res.extend(group_header(OFFICIAL_PREFIX, OfficialCategory::VALUES));
    res.extend(group_header(AUDIT_PREFIX, AuditCategory::VALUES));
    res.extend(group_header(DELTA_PREFIX, OfficialCategory::VALUES));
    res
}

fn group_header<C: Category>(prefix: &str, categories: &[C]) -> Vec<String> {
    categories
        .iter()
        .map(|c| format!("{}-{}", prefix, c.key()))
        .collect()
}

/// The `ALL` row first, then by decreasing magnitude of the ballots cast delta, then
/// alphabetically by name.
fn compare_rows(a: &ReportRow, b: &ReportRow) -> Ordering {
    b.is_all()
        .cmp(&a.is_all())
        .then_with(|| {
            let bc_a = a.delta(OfficialCategory::Bc).unsigned_abs();
            let bc_b = b.delta(OfficialCategory::Bc).unsigned_abs();
            bc_b.cmp(&bc_a)
        })
        .then_with(|| a.name.cmp(&b.name))
}

/// Builds the comparison for every county and for all the counties.
///
/// Both sets of totals are expected to cover the same counties (see `aggregate`).
pub fn build_report(
    official: &AggregatedTotals<OfficialCategory>,
    audit: &AggregatedTotals<AuditCategory>,
) -> ReconcileResult<Vec<ReportRow>> {
    let mut rows: Vec<ReportRow> = Vec::with_capacity(official.len());
    for name in official.names() {
        let official_totals = official.get(name).ok_or_else(|| ReconcileError::UnknownCounty {
            name: name.to_string(),
        })?;
        let audit_totals = audit.get(name).ok_or_else(|| ReconcileError::UnknownCounty {
            name: name.to_string(),
        })?;
        rows.push(ReportRow::new(name, official_totals, audit_totals));
    }
    rows.sort_by(compare_rows);
    Ok(rows)
}
