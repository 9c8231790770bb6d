use log::debug;

use crate::config::*;

/// The content of the official results of one county, as read from the results file.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct DetailRecord {
    pub ballots_cast: u64,
    /// The contests, in the order of the file.
    pub contests: Vec<ContestRecord>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ContestRecord {
    pub name: String,
    /// The totals by vote type for the whole contest (overvotes, undervotes).
    pub vote_types: Vec<(String, u64)>,
    /// The total of votes for each choice, by display name.
    pub choices: Vec<(String, u64)>,
}

fn vote_type_category(name: &str) -> Option<OfficialCategory> {
    match name {
        "Overvotes" => Some(OfficialCategory::Ovr),
        "Undervotes" => Some(OfficialCategory::Und),
        _ => None,
    }
}

/// Computes the official totals of one county.
///
/// Only the first contest of the record is read, and it must be the expected one.
pub fn official_totals(
    county: &str,
    record: &DetailRecord,
    rules: &ContestRules,
) -> ReconcileResult<VoteTotals<OfficialCategory>> {
    let contest = record
        .contests
        .first()
        .ok_or_else(|| ReconcileError::MissingContest {
            county: county.to_string(),
        })?;

    // Make sure we have the right contest.
    if !contest.name.starts_with(rules.name_prefix.as_str()) {
        return Err(ReconcileError::ContestMismatch {
            county: county.to_string(),
            contest: contest.name.clone(),
        });
    }

    let mut totals: VoteTotals<OfficialCategory> = VoteTotals::zero();
    totals.add(OfficialCategory::Bc, record.ballots_cast);

    for (name, votes) in contest.vote_types.iter() {
        let category =
            vote_type_category(name).ok_or_else(|| ReconcileError::UnknownVoteType {
                county: county.to_string(),
                vote_type: name.clone(),
            })?;
        totals.add(category, *votes);
    }

    totals.add(
        OfficialCategory::Tbj,
        candidate_total(county, contest, rules)?,
    );

    debug!("official_totals: {}: {:?}", county, totals);
    Ok(totals)
}

/// The sum of the votes of all the choices. Every choice must be one of the
/// expected candidates.
fn candidate_total(
    county: &str,
    contest: &ContestRecord,
    rules: &ContestRules,
) -> ReconcileResult<u64> {
    let mut total = 0;
    for (name, votes) in contest.choices.iter() {
        if !rules.candidates.iter().any(|c| name.contains(c.as_str())) {
            return Err(ReconcileError::UnexpectedCandidate {
                county: county.to_string(),
                choice: name.clone(),
            });
        }
        total += votes;
    }
    Ok(total)
}

/// Adds the totals of one county to the set of official totals.
///
/// The county is only added if its totals could be computed.
pub fn add_official_county(
    totals: &mut TotalsSet<OfficialCategory>,
    county: &str,
    record: &DetailRecord,
    rules: &ContestRules,
) -> ReconcileResult<()> {
    let county_totals = official_totals(county, record, rules)?;
    totals.insert(county.to_string(), county_totals);
    Ok(())
}
