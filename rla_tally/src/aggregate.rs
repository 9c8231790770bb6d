use log::info;
use std::collections::BTreeSet;

use crate::config::*;
use crate::correction::CorrectedAuditTotals;

/// A set of totals with the sum over all its counties.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AggregatedTotals<C: Category> {
    counties: TotalsSet<C>,
    all: VoteTotals<C>,
}

impl<C: Category> AggregatedTotals<C> {
    pub fn new(counties: TotalsSet<C>) -> AggregatedTotals<C> {
        let all = sum_totals(counties.values());
        AggregatedTotals { counties, all }
    }

    pub fn counties(&self) -> &TotalsSet<C> {
        &self.counties
    }

    pub fn all(&self) -> &VoteTotals<C> {
        &self.all
    }

    /// Looks up a county, or the sum of all the counties with `ALL_COUNTIES`.
    pub fn get(&self, name: &str) -> Option<&VoteTotals<C>> {
        if name == ALL_COUNTIES {
            Some(&self.all)
        } else {
            self.counties.get(name)
        }
    }

    /// The names of the counties, with `ALL_COUNTIES` first.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(ALL_COUNTIES).chain(self.counties.keys().map(|s| s.as_str()))
    }

    /// The number of entries, including the sum over all the counties.
    pub fn len(&self) -> usize {
        self.counties.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Sums every category over the given totals.
pub fn sum_totals<'a, C, I>(totals: I) -> VoteTotals<C>
where
    C: Category,
    I: IntoIterator<Item = &'a VoteTotals<C>>,
{
    let mut all = VoteTotals::zero();
    for county_totals in totals {
        all += county_totals;
    }
    all
}

/// Checks that both sets of totals cover the same counties, and the expected number of them.
pub fn check_county_sets(
    official: &TotalsSet<OfficialCategory>,
    audit: &TotalsSet<AuditCategory>,
    expected_count: usize,
) -> ReconcileResult<()> {
    let official_names: BTreeSet<&String> = official.keys().collect();
    let audit_names: BTreeSet<&String> = audit.keys().collect();
    if official_names != audit_names {
        return Err(ReconcileError::CountySetMismatch {
            only_official: official_names
                .difference(&audit_names)
                .map(|s| s.to_string())
                .collect(),
            only_audit: audit_names
                .difference(&official_names)
                .map(|s| s.to_string())
                .collect(),
        });
    }
    for (totals, found) in [("audit", audit.len()), ("official", official.len())] {
        if found != expected_count {
            return Err(ReconcileError::CountyCount {
                totals: totals.to_string(),
                expected: expected_count,
                found,
            });
        }
    }
    Ok(())
}

/// Validates the counties and adds the sum of all the counties to both sets of totals.
pub fn aggregate(
    official: TotalsSet<OfficialCategory>,
    audit: CorrectedAuditTotals,
    expected_count: usize,
) -> ReconcileResult<(AggregatedTotals<OfficialCategory>, AggregatedTotals<AuditCategory>)> {
    check_county_sets(&official, audit.counties(), expected_count)?;
    let official = AggregatedTotals::new(official);
    let audit = AggregatedTotals::new(audit.into_counties());
    info!(
        "Aggregated {} counties: official {:?}, audit {:?}",
        official.counties().len(),
        official.all(),
        audit.all()
    );
    Ok((official, audit))
}
