use log::debug;
use std::collections::HashMap;

use crate::config::*;

/// A participating county.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct County {
    /// The position of the county in the registry source. The official result
    /// files are named after it.
    pub index: usize,
    pub name: String,
    /// The uppercased name, as used by the audit report.
    pub normalized_name: String,
    pub id1: String,
    pub id2: String,
}

impl County {
    /// Parses a record of the form `Appling|105371|271560|11/16/2020 3:48:35 PM EST|16`.
    ///
    /// Only the first three fields are used.
    pub fn parse(index: usize, record: &str) -> ReconcileResult<County> {
        let parts: Vec<&str> = record.split('|').collect();
        match parts.as_slice() {
            [name, id1, id2, ..] if !name.is_empty() => {
                let name = name.replace('_', " ");
                Ok(County {
                    index,
                    normalized_name: normalize(&name),
                    name,
                    id1: id1.to_string(),
                    id2: id2.to_string(),
                })
            }
            _ => Err(ReconcileError::MalformedCountyRecord {
                index,
                record: record.to_string(),
            }),
        }
    }
}

pub fn normalize(name: &str) -> String {
    name.to_uppercase()
}

/// The list of counties, which is the reference to join all the other sources.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CountyRegistry {
    counties: Vec<County>,
    by_normalized: HashMap<String, usize>,
}

impl CountyRegistry {
    pub fn from_records<S: AsRef<str>>(records: &[S]) -> ReconcileResult<CountyRegistry> {
        let mut counties: Vec<County> = Vec::with_capacity(records.len());
        let mut by_normalized: HashMap<String, usize> = HashMap::new();
        for (index, record) in records.iter().enumerate() {
            let county = County::parse(index, record.as_ref())?;
            debug!("from_records: county: {:?}", county);
            if by_normalized
                .insert(county.normalized_name.clone(), index)
                .is_some()
            {
                return Err(ReconcileError::DuplicateCounty { name: county.name });
            }
            counties.push(county);
        }
        Ok(CountyRegistry {
            counties,
            by_normalized,
        })
    }

    pub fn len(&self) -> usize {
        self.counties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counties.is_empty()
    }

    /// The counties, in registry order.
    pub fn counties(&self) -> &[County] {
        &self.counties
    }

    pub fn by_index(&self, index: usize) -> ReconcileResult<&County> {
        self.counties
            .get(index)
            .ok_or(ReconcileError::UnknownCountyIndex { index })
    }

    pub fn name_for_index(&self, index: usize) -> ReconcileResult<&str> {
        Ok(self.by_index(index)?.name.as_str())
    }

    /// The canonical name for a normalized (uppercase) name.
    pub fn name_for_normalized(&self, normalized: &str) -> ReconcileResult<&str> {
        self.by_normalized
            .get(normalized)
            .map(|idx| self.counties[*idx].name.as_str())
            .ok_or_else(|| ReconcileError::UnknownCounty {
                name: normalized.to_string(),
            })
    }

    /// Checks that a canonical name belongs to the registry.
    pub fn canonical(&self, name: &str) -> ReconcileResult<&str> {
        match self.name_for_normalized(&normalize(name)) {
            Ok(n) if n == name => Ok(n),
            _ => Err(ReconcileError::UnknownCounty {
                name: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A registry with the given names, and made-up identifiers.
    pub(crate) fn registry(names: &[&str]) -> CountyRegistry {
        let records: Vec<String> = names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                format!(
                    "{}|{}|{}|11/16/2020 3:48:35 PM EST|16",
                    name.replace(' ', "_"),
                    105371 + idx,
                    271560 + idx
                )
            })
            .collect();
        CountyRegistry::from_records(&records).unwrap()
    }

    pub(crate) fn georgia_like() -> CountyRegistry {
        let mut names: Vec<String> = vec![
            "Appling".to_string(),
            "Ben Hill".to_string(),
            "Gwinnett".to_string(),
        ];
        for idx in names.len()..EXPECTED_COUNTY_COUNT {
            names.push(format!("County{:03}", idx));
        }
        let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        registry(&refs)
    }

    #[test]
    fn parse_record() {
        let c = County::parse(1, "Ben_Hill|105376|271565|11/16/2020 3:48:35 PM EST|16").unwrap();
        assert_eq!(c.index, 1);
        assert_eq!(c.name, "Ben Hill");
        assert_eq!(c.normalized_name, "BEN HILL");
        assert_eq!(c.id1, "105376");
        assert_eq!(c.id2, "271565");
    }

    #[test]
    fn short_record() {
        let res = CountyRegistry::from_records(&["Appling|105371|271560", "Atkinson|105372"]);
        assert_eq!(
            res,
            Err(ReconcileError::MalformedCountyRecord {
                index: 1,
                record: "Atkinson|105372".to_string()
            })
        );
    }

    #[test]
    fn duplicate_county() {
        let res = CountyRegistry::from_records(&["Clay|1|2", "CLAY|3|4"]);
        assert_eq!(
            res,
            Err(ReconcileError::DuplicateCounty {
                name: "CLAY".to_string()
            })
        );
    }

    #[test]
    fn positional_indexes() {
        let reg = georgia_like();
        assert_eq!(reg.len(), 159);
        for (idx, c) in reg.counties().iter().enumerate() {
            assert_eq!(c.index, idx);
        }
        assert_eq!(reg.name_for_index(0), Ok("Appling"));
        assert_eq!(reg.name_for_index(158), Ok("County158"));
        assert_eq!(
            reg.name_for_index(159),
            Err(ReconcileError::UnknownCountyIndex { index: 159 })
        );
    }

    #[test]
    fn normalized_lookup() {
        let reg = georgia_like();
        assert_eq!(reg.name_for_normalized("BEN HILL"), Ok("Ben Hill"));
        assert_eq!(reg.canonical("Gwinnett"), Ok("Gwinnett"));
        assert!(reg.name_for_normalized("Ben Hill").is_err());
        assert_eq!(
            reg.name_for_normalized("FULTON"),
            Err(ReconcileError::UnknownCounty {
                name: "FULTON".to_string()
            })
        );
        assert_eq!(
            reg.canonical("GWINNETT").map_err(|e| e.kind()),
            Err(ErrorKind::SourceMismatch)
        );
    }
}
