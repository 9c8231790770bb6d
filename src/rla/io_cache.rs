// Intermediate totals, saved between runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rla_tally::*;
use serde::Serialize;
use snafu::prelude::*;

use crate::rla::io_common::path_str;
use crate::rla::*;

/// Where the computed totals are kept, by key.
pub trait CacheStore {
    fn load(&self, key: &str) -> RlaResult<Option<String>>;

    fn save(&self, key: &str, contents: &str) -> RlaResult<()>;
}

/// One JSON file per key in a directory.
#[derive(Debug, Clone)]
pub struct DirCacheStore {
    dir: PathBuf,
}

impl DirCacheStore {
    pub fn new(dir: &Path) -> DirCacheStore {
        DirCacheStore {
            dir: dir.to_path_buf(),
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl CacheStore for DirCacheStore {
    fn load(&self, key: &str) -> RlaResult<Option<String>> {
        let p = self.path(key);
        if !p.exists() {
            return Ok(None);
        }
        info!("Using cached data: {}", path_str(&p));
        let contents = fs::read_to_string(&p).context(OpeningFileSnafu { path: path_str(&p) })?;
        Ok(Some(contents))
    }

    fn save(&self, key: &str, contents: &str) -> RlaResult<()> {
        let p = self.path(key);
        fs::create_dir_all(&self.dir).context(WritingFileSnafu {
            path: path_str(&self.dir),
        })?;
        info!("Writing cached data: {}", path_str(&p));
        fs::write(&p, contents).context(WritingFileSnafu { path: path_str(&p) })
    }
}

/// Always computes.
#[derive(Debug, Clone)]
pub struct NoCache {}

impl CacheStore for NoCache {
    fn load(&self, _key: &str) -> RlaResult<Option<String>> {
        Ok(None)
    }

    fn save(&self, _key: &str, _contents: &str) -> RlaResult<()> {
        Ok(())
    }
}

type JsonTotals = BTreeMap<String, BTreeMap<String, u64>>;

/// Pretty JSON, with sorted keys and an indentation of 4 spaces.
pub fn totals_to_json<C: Category>(totals: &TotalsSet<C>, key: &str) -> RlaResult<String> {
    let js: JsonTotals = totals
        .iter()
        .map(|(name, vt)| {
            let counts: BTreeMap<String, u64> =
                vt.iter().map(|(c, n)| (c.key().to_string(), n)).collect();
            (name.clone(), counts)
        })
        .collect();
    let mut out: Vec<u8> = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    js.serialize(&mut ser)
        .context(SerializingJsonSnafu { key })?;
    Ok(String::from_utf8_lossy(&out).to_string())
}

/// Decodes cached totals, with the same checks as the sources: known counties and
/// every category present.
pub fn totals_from_json<C: Category>(
    contents: &str,
    registry: &CountyRegistry,
    key: &str,
) -> RlaResult<TotalsSet<C>> {
    let label = format!("cache entry {}", key);
    let js: JsonTotals = serde_json::from_str(contents).context(ParsingJsonSnafu {
        path: label.clone(),
    })?;
    let mut res: TotalsSet<C> = TotalsSet::new();
    for (name, counts) in js.iter() {
        let name = registry
            .canonical(name)
            .context(ReconcileFileSnafu {
                path: label.clone(),
            })?;
        for k in counts.keys() {
            if C::from_key(k).is_none() {
                whatever!("{}: county {}: unknown category {:?}", label, name, k);
            }
        }
        let mut vt: VoteTotals<C> = VoteTotals::zero();
        for c in C::VALUES {
            match counts.get(c.key()) {
                Some(n) => vt.add(*c, *n),
                None => {
                    return Err(ReconcileError::MissingCategory {
                        county: name.to_string(),
                        category: c.key().to_string(),
                    })
                    .context(ReconcileFileSnafu {
                        path: label.clone(),
                    })
                }
            }
        }
        res.insert(name.to_string(), vt);
    }
    Ok(res)
}

/// Returns the totals stored under `key`, or computes and stores them.
pub fn compute_or_load<C, F>(
    store: &dyn CacheStore,
    registry: &CountyRegistry,
    key: &str,
    compute: F,
) -> RlaResult<TotalsSet<C>>
where
    C: Category,
    F: FnOnce() -> RlaResult<TotalsSet<C>>,
{
    if let Some(contents) = store.load(key)? {
        let totals = totals_from_json(&contents, registry, key)?;
        debug!("compute_or_load: {}: {} cached counties", key, totals.len());
        return Ok(totals);
    }
    let totals = compute()?;
    store.save(key, &totals_to_json(&totals, key)?)?;
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore {
        entries: RefCell<HashMap<String, String>>,
    }

    impl CacheStore for MemoryStore {
        fn load(&self, key: &str) -> RlaResult<Option<String>> {
            Ok(self.entries.borrow().get(key).cloned())
        }

        fn save(&self, key: &str, contents: &str) -> RlaResult<()> {
            self.entries
                .borrow_mut()
                .insert(key.to_string(), contents.to_string());
            Ok(())
        }
    }

    fn registry() -> CountyRegistry {
        CountyRegistry::from_records(&["Appling|1|2", "Ben_Hill|3|4"]).unwrap()
    }

    fn sample() -> TotalsSet<OfficialCategory> {
        let mut appling: VoteTotals<OfficialCategory> = VoteTotals::zero();
        appling.add(OfficialCategory::Tbj, 8366);
        appling.add(OfficialCategory::Bc, 8452);
        appling.add(OfficialCategory::Und, 25);
        let mut res = TotalsSet::new();
        res.insert("Appling".to_string(), appling);
        res.insert("Ben Hill".to_string(), VoteTotals::zero());
        res
    }

    #[test]
    fn computes_once() {
        let store = MemoryStore::default();
        let reg = registry();
        let calls = Cell::new(0);
        for _ in 0..2 {
            let totals = compute_or_load(&store, &reg, "detailxml", || {
                calls.set(calls.get() + 1);
                Ok(sample())
            })
            .unwrap();
            assert_eq!(totals, sample());
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn json_format() {
        let s = totals_to_json(&sample(), "detailxml").unwrap();
        assert!(s.starts_with("{\n    \"Appling\": {\n        \"BC\": 8452,"));
        assert!(s.contains("\"Ben Hill\""));
    }

    #[test]
    fn missing_category() {
        let contents = r#"{"Appling": {"TBJ": 1, "BC": 2, "Und": 0}}"#;
        let err = totals_from_json::<OfficialCategory>(contents, &registry(), "detailxml")
            .unwrap_err();
        match err {
            RlaError::ReconcileFile { source, .. } => assert_eq!(
                source,
                ReconcileError::MissingCategory {
                    county: "Appling".to_string(),
                    category: "Ovr".to_string()
                }
            ),
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn unknown_names() {
        let contents = r#"{"APPLING": {"TBJ": 1, "BC": 2, "Und": 0, "Ovr": 0}}"#;
        assert!(totals_from_json::<OfficialCategory>(contents, &registry(), "k").is_err());
        let contents = r#"{"Appling": {"TBJ": 1, "BC": 2, "Und": 0, "Ovr": 0, "InvW": 3}}"#;
        assert!(totals_from_json::<OfficialCategory>(contents, &registry(), "k").is_err());
        assert!(totals_from_json::<AuditCategory>(contents, &registry(), "k").is_err());
    }

    #[test]
    fn dir_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirCacheStore::new(&dir.path().join("cache"));
        assert_eq!(store.load("rla-totals").unwrap(), None);
        store.save("rla-totals", "{}").unwrap();
        assert!(dir.path().join("cache").join("rla-totals.json").exists());
        assert_eq!(store.load("rla-totals").unwrap(), Some("{}".to_string()));

        let no_cache = NoCache {};
        no_cache.save("rla-totals", "{}").unwrap();
        assert_eq!(no_cache.load("rla-totals").unwrap(), None);
    }
}
