// ********* Vote categories ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::ops::AddAssign;

/// The name under which the sum over all the counties is reported.
pub const ALL_COUNTIES: &str = "ALL";

/// The number of counties in Georgia.
pub const EXPECTED_COUNTY_COUNT: usize = 159;

pub const PRESIDENT_CONTEST_PREFIX: &str = "President of the United States";

/// Substrings identifying the three candidates on the presidential ballot.
pub const LEADING_CANDIDATES: [&str; 3] = ["Trump", "Biden", "Jorgensen"];

/// A closed vocabulary of vote categories.
///
/// The order of `VALUES` is the order of the columns in the report.
pub trait Category: Copy + Eq + Ord + Hash + Debug + 'static {
    const VALUES: &'static [Self];

    /// The short key, as found in the cache files and the report headers.
    fn key(self) -> &'static str;

    fn from_key(key: &str) -> Option<Self> {
        Self::VALUES.iter().copied().find(|c| c.key() == key)
    }
}

/// Categories reported by the official results.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum OfficialCategory {
    /// Sum of the votes for the three leading candidates.
    Tbj,
    /// Ballots cast, which includes all the types of votes.
    Bc,
    Und,
    Ovr,
}

impl Category for OfficialCategory {
    const VALUES: &'static [Self] = &[
        OfficialCategory::Tbj,
        OfficialCategory::Bc,
        OfficialCategory::Und,
        OfficialCategory::Ovr,
    ];

    fn key(self) -> &'static str {
        match self {
            OfficialCategory::Tbj => "TBJ",
            OfficialCategory::Bc => "BC",
            OfficialCategory::Und => "Und",
            OfficialCategory::Ovr => "Ovr",
        }
    }
}

/// Categories reported by the audit. It extends the official ones with the write-ins.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum AuditCategory {
    Tbj,
    Bc,
    Und,
    Ovr,
    InvW,
    ValW,
}

impl Category for AuditCategory {
    const VALUES: &'static [Self] = &[
        AuditCategory::Tbj,
        AuditCategory::Bc,
        AuditCategory::Und,
        AuditCategory::Ovr,
        AuditCategory::InvW,
        AuditCategory::ValW,
    ];

    fn key(self) -> &'static str {
        match self {
            AuditCategory::Tbj => "TBJ",
            AuditCategory::Bc => "BC",
            AuditCategory::Und => "Und",
            AuditCategory::Ovr => "Ovr",
            AuditCategory::InvW => "InvW",
            AuditCategory::ValW => "ValW",
        }
    }
}

impl From<OfficialCategory> for AuditCategory {
    fn from(c: OfficialCategory) -> AuditCategory {
        match c {
            OfficialCategory::Tbj => AuditCategory::Tbj,
            OfficialCategory::Bc => AuditCategory::Bc,
            OfficialCategory::Und => AuditCategory::Und,
            OfficialCategory::Ovr => AuditCategory::Ovr,
        }
    }
}

// ********* Totals **********

/// The vote totals of one county (or of all of them).
///
/// Every category of the vocabulary is always present: the totals start at zero.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoteTotals<C: Category> {
    counts: BTreeMap<C, u64>,
}

impl<C: Category> VoteTotals<C> {
    pub fn zero() -> VoteTotals<C> {
        VoteTotals {
            counts: C::VALUES.iter().map(|c| (*c, 0)).collect(),
        }
    }

    pub fn get(&self, category: C) -> u64 {
        self.counts.get(&category).copied().unwrap_or_default()
    }

    pub fn add(&mut self, category: C, count: u64) {
        *self.counts.entry(category).or_insert(0) += count;
    }

    /// Removes `count` votes from a category, unless this would make the total negative.
    pub fn checked_sub(&mut self, category: C, count: u64) -> Option<u64> {
        let entry = self.counts.entry(category).or_insert(0);
        *entry = entry.checked_sub(count)?;
        Some(*entry)
    }

    /// The values, in the order of the vocabulary.
    pub fn values(&self) -> Vec<u64> {
        C::VALUES.iter().map(|c| self.get(*c)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (C, u64)> + '_ {
        self.counts.iter().map(|(c, n)| (*c, *n))
    }
}

impl<C: Category> Default for VoteTotals<C> {
    fn default() -> Self {
        VoteTotals::zero()
    }
}

impl<C: Category> AddAssign<&VoteTotals<C>> for VoteTotals<C> {
    fn add_assign(&mut self, rhs: &VoteTotals<C>) {
        for (c, n) in rhs.iter() {
            self.add(c, n);
        }
    }
}

/// The totals of every real county, keyed by canonical county name.
pub type TotalsSet<C> = BTreeMap<String, VoteTotals<C>>;

// ********* Configuration **********

/// Identifies the contest to read in the official results.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ContestRules {
    /// The contest name must start with this prefix.
    pub name_prefix: String,
    /// Every choice must contain one of these substrings.
    pub candidates: Vec<String>,
}

impl ContestRules {
    pub fn president_2020() -> ContestRules {
        ContestRules {
            name_prefix: PRESIDENT_CONTEST_PREFIX.to_string(),
            candidates: LEADING_CANDIDATES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A manual adjustment of the audit totals of one county.
///
/// The amount is removed from both the ballots cast and the undervotes.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Correction {
    pub county: String,
    pub amount: u64,
    /// Where the amount comes from.
    pub reference: Option<String>,
}

impl Correction {
    /// The Absentee by Mail cards for "Card #2" reported by Gwinnett County.
    ///
    /// The audit counted the second sheet of the multi-card ballots as undervotes for
    /// the presidential contest, even though that sheet did not have the contest. The
    /// number comes from the "Absentee by" column of the Gwinnett Transit Referendum
    /// results, on the last page of the official results of the county. It is only a
    /// proxy for the number of second sheets found during the audit.
    pub fn gwinnett_second_card() -> Correction {
        Correction {
            county: "Gwinnett".to_string(),
            amount: 119461,
            reference: Some(
                "Gwinnett Transit Referendum, Absentee by Mail, Card #2 (official results)"
                    .to_string(),
            ),
        }
    }
}

// ********* Errors **********

/// The two families of errors. Both abort the comparison.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ErrorKind {
    /// The input data is not what the comparison was built for.
    SourceMismatch,
    /// A choice in the official results is not one of the expected candidates.
    CandidateSet,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ReconcileError {
    MalformedCountyRecord {
        index: usize,
        record: String,
    },
    DuplicateCounty {
        name: String,
    },
    UnknownCounty {
        name: String,
    },
    UnknownCountyIndex {
        index: usize,
    },
    MissingContest {
        county: String,
    },
    ContestMismatch {
        county: String,
        contest: String,
    },
    UnknownVoteType {
        county: String,
        vote_type: String,
    },
    UnexpectedCandidate {
        county: String,
        choice: String,
    },
    /// The row numbers start at 1 with the first row after the header.
    ColumnCount {
        row: usize,
        found: usize,
    },
    InvalidCount {
        row: usize,
        column: usize,
        content: String,
    },
    MissingCategory {
        county: String,
        category: String,
    },
    CorrectionUnderflow {
        county: String,
        category: String,
        total: u64,
        amount: u64,
    },
    CountyCount {
        totals: String,
        expected: usize,
        found: usize,
    },
    CountySetMismatch {
        only_official: Vec<String>,
        only_audit: Vec<String>,
    },
}

impl ReconcileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReconcileError::UnexpectedCandidate { .. } => ErrorKind::CandidateSet,
            _ => ErrorKind::SourceMismatch,
        }
    }
}

impl Error for ReconcileError {}

impl Display for ReconcileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileError::MalformedCountyRecord { index, record } => {
                write!(f, "malformed county record at index {}: {:?}", index, record)
            }
            ReconcileError::DuplicateCounty { name } => {
                write!(f, "county listed more than once: {}", name)
            }
            ReconcileError::UnknownCounty { name } => write!(f, "unknown county: {:?}", name),
            ReconcileError::UnknownCountyIndex { index } => {
                write!(f, "no county with index {}", index)
            }
            ReconcileError::MissingContest { county } => {
                write!(f, "county {}: no contest found", county)
            }
            ReconcileError::ContestMismatch { county, contest } => {
                write!(f, "county {}: got contest name: {:?}", county, contest)
            }
            ReconcileError::UnknownVoteType { county, vote_type } => {
                write!(f, "county {}: unknown vote type {:?}", county, vote_type)
            }
            ReconcileError::UnexpectedCandidate { county, choice } => {
                write!(f, "county {}: unexpected choice {:?}", county, choice)
            }
            ReconcileError::ColumnCount { row, found } => {
                write!(f, "error at line: {} (expected 10 columns, found {})", row, found)
            }
            ReconcileError::InvalidCount {
                row,
                column,
                content,
            } => write!(
                f,
                "error at line: {} column {}: not a vote count: {:?}",
                row, column, content
            ),
            ReconcileError::MissingCategory { county, category } => {
                write!(f, "county {}: missing category {}", county, category)
            }
            ReconcileError::CorrectionUnderflow {
                county,
                category,
                total,
                amount,
            } => write!(
                f,
                "county {}: cannot remove {} from {} total of {}",
                county, amount, category, total
            ),
            ReconcileError::CountyCount {
                totals,
                expected,
                found,
            } => write!(
                f,
                "{} totals: expected {} counties, found {}",
                totals, expected, found
            ),
            ReconcileError::CountySetMismatch {
                only_official,
                only_audit,
            } => write!(
                f,
                "county sets differ: only in official: {:?}, only in audit: {:?}",
                only_official, only_audit
            ),
        }
    }
}

pub type ReconcileResult<T> = Result<T, ReconcileError>;
