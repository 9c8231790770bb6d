use log::info;

use crate::audit::AuditTotals;
use crate::config::*;

/// The audit totals after the correction has been applied.
///
/// These can only be obtained through `AuditTotals::apply_correction`, which consumes
/// the raw totals. A correction is therefore applied exactly once.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CorrectedAuditTotals {
    counties: TotalsSet<AuditCategory>,
    correction: Correction,
}

impl CorrectedAuditTotals {
    pub fn counties(&self) -> &TotalsSet<AuditCategory> {
        &self.counties
    }

    pub fn correction(&self) -> &Correction {
        &self.correction
    }

    pub(crate) fn into_counties(self) -> TotalsSet<AuditCategory> {
        self.counties
    }
}

/// The categories that the correction removes votes from.
const CORRECTED_CATEGORIES: [AuditCategory; 2] = [AuditCategory::Bc, AuditCategory::Und];

impl AuditTotals {
    /// Removes the amount of the correction from the ballots cast and the undervotes
    /// of the corrected county. No other county is changed.
    pub fn apply_correction(self, correction: &Correction) -> ReconcileResult<CorrectedAuditTotals> {
        let mut counties = self.into_counties();
        let county_totals =
            counties
                .get_mut(&correction.county)
                .ok_or_else(|| ReconcileError::UnknownCounty {
                    name: correction.county.clone(),
                })?;
        for category in CORRECTED_CATEGORIES {
            let total = county_totals.get(category);
            county_totals
                .checked_sub(category, correction.amount)
                .ok_or_else(|| ReconcileError::CorrectionUnderflow {
                    county: correction.county.clone(),
                    category: category.key().to_string(),
                    total,
                    amount: correction.amount,
                })?;
        }
        info!(
            "Removed {} ballots from the audit totals of {} (BC, Und), source: {}",
            correction.amount,
            correction.county,
            correction.reference.as_deref().unwrap_or("not provided")
        );
        Ok(CorrectedAuditTotals {
            counties,
            correction: correction.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(bc: u64, und: u64) -> VoteTotals<AuditCategory> {
        let mut t = VoteTotals::zero();
        t.add(AuditCategory::Tbj, bc - und - 20);
        t.add(AuditCategory::Bc, bc);
        t.add(AuditCategory::Und, und);
        t.add(AuditCategory::Ovr, 5);
        t.add(AuditCategory::InvW, 7);
        t.add(AuditCategory::ValW, 8);
        t
    }

    fn raw() -> AuditTotals {
        let mut counties = TotalsSet::new();
        counties.insert("Gwinnett".to_string(), totals(400000, 130000));
        counties.insert("Fulton".to_string(), totals(500000, 3000));
        AuditTotals::from_counties(counties)
    }

    #[test]
    fn gwinnett_second_card() {
        let corrected = raw()
            .apply_correction(&Correction::gwinnett_second_card())
            .unwrap();
        let gwinnett = &corrected.counties()["Gwinnett"];
        assert_eq!(gwinnett.get(AuditCategory::Bc), 280539);
        assert_eq!(gwinnett.get(AuditCategory::Und), 10539);
        assert_eq!(gwinnett.get(AuditCategory::Tbj), 400000 - 130000 - 20);
        assert_eq!(gwinnett.get(AuditCategory::Ovr), 5);
        assert_eq!(gwinnett.get(AuditCategory::InvW), 7);
        assert_eq!(gwinnett.get(AuditCategory::ValW), 8);
        assert_eq!(corrected.counties()["Fulton"], totals(500000, 3000));
    }

    #[test]
    fn applied_once() {
        // Correcting from the same raw totals always gives the same result: the
        // correction does not accumulate.
        let raw = raw();
        let c = Correction::gwinnett_second_card();
        let first = raw.clone().apply_correction(&c).unwrap();
        let second = raw.apply_correction(&c).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.counties()["Gwinnett"].get(AuditCategory::Bc),
            400000 - c.amount
        );
        assert_eq!(first.correction(), &c);
    }

    #[test]
    fn unknown_county() {
        let c = Correction {
            county: "Gwinett".to_string(),
            amount: 1,
            reference: None,
        };
        assert_eq!(
            raw().apply_correction(&c),
            Err(ReconcileError::UnknownCounty {
                name: "Gwinett".to_string()
            })
        );
    }

    #[test]
    fn underflow() {
        let c = Correction {
            county: "Fulton".to_string(),
            amount: 4000,
            reference: None,
        };
        let err = raw().apply_correction(&c).unwrap_err();
        assert_eq!(
            err,
            ReconcileError::CorrectionUnderflow {
                county: "Fulton".to_string(),
                category: "Und".to_string(),
                total: 3000,
                amount: 4000
            }
        );
    }
}
