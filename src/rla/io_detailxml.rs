// Reader for the detail.xml files of the results website, one per county.

use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use log::{debug, info};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use rla_tally::*;
use snafu::prelude::*;

use crate::rla::io_common::{file_index, path_str, simplify_file_name};
use crate::rla::*;

const VOTER_TURNOUT: &[u8] = b"VoterTurnout";
const CONTEST: &[u8] = b"Contest";
const VOTE_TYPE: &[u8] = b"VoteType";
const CHOICE: &[u8] = b"Choice";

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

fn get_attr(e: &BytesStart, attribute: &str, path: &str) -> RlaResult<String> {
    for a in e.attributes().flatten() {
        if a.key.as_ref() == attribute.as_bytes() {
            let raw = String::from_utf8_lossy(&a.value).to_string();
            let value = match quick_xml::escape::unescape(&raw) {
                Ok(v) => v.to_string(),
                Err(_) => raw,
            };
            return Ok(value);
        }
    }
    XmlMissingAttributeSnafu {
        path,
        element: element_name(e),
        attribute,
    }
    .fail()
}

fn get_count_attr(e: &BytesStart, attribute: &str, path: &str) -> RlaResult<u64> {
    let content = get_attr(e, attribute, path)?;
    match content.trim().parse::<u64>() {
        Ok(x) => Ok(x),
        Err(_) => XmlNotANumberSnafu {
            path,
            element: element_name(e),
            attribute,
            content,
        }
        .fail(),
    }
}

/// Handles an element found under `stack`, the names of the open elements from the root.
fn read_element(
    e: &BytesStart,
    stack: &[Vec<u8>],
    ballots_cast: &mut Option<u64>,
    contests: &mut Vec<ContestRecord>,
    path: &str,
) -> RlaResult<()> {
    let name = e.name();
    let name = name.as_ref();
    if stack.len() == 1 && name == VOTER_TURNOUT {
        *ballots_cast = Some(get_count_attr(e, "ballotsCast", path)?);
    } else if stack.len() == 1 && name == CONTEST {
        contests.push(ContestRecord {
            name: get_attr(e, "text", path)?,
            vote_types: vec![],
            choices: vec![],
        });
    } else if stack.len() == 2 && stack[1] == CONTEST {
        if let Some(contest) = contests.last_mut() {
            if name == VOTE_TYPE {
                let vt_name = get_attr(e, "name", path)?;
                let votes = get_count_attr(e, "votes", path)?;
                contest.vote_types.push((vt_name, votes));
            } else if name == CHOICE {
                let text = get_attr(e, "text", path)?;
                let votes = get_count_attr(e, "totalVotes", path)?;
                contest.choices.push((text, votes));
            }
        }
    }
    Ok(())
}

/// Reads the ballots cast and the contests of a detail.xml document.
///
/// Only the direct children of the root element and of the contests are read: the
/// vote types nested under each choice are breakdowns of the choice totals.
pub fn parse_detail<R: BufRead>(mut reader: Reader<R>, path: &str) -> RlaResult<DetailRecord> {
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut ballots_cast: Option<u64> = None;
    let mut contests: Vec<ContestRecord> = Vec::new();

    loop {
        match reader
            .read_event_into(&mut buf)
            .context(XmlParseSnafu { path })?
        {
            Event::Start(ref e) => {
                read_element(e, &stack, &mut ballots_cast, &mut contests, path)?;
                stack.push(e.name().as_ref().to_vec());
            }
            Event::Empty(ref e) => {
                read_element(e, &stack, &mut ballots_cast, &mut contests, path)?;
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let ballots_cast = ballots_cast.context(XmlMissingElementSnafu {
        path,
        element: "VoterTurnout",
    })?;
    debug!(
        "parse_detail: {}: ballots cast: {} contests: {}",
        path,
        ballots_cast,
        contests.len()
    );
    Ok(DetailRecord {
        ballots_cast,
        contests,
    })
}

pub fn read_detail_file(path: &Path) -> RlaResult<DetailRecord> {
    let path_s = path_str(path);
    let reader = Reader::from_file(path).context(XmlParseSnafu {
        path: path_s.clone(),
    })?;
    parse_detail(reader, &path_s)
}

/// The detail files of a directory, in file name order, with the name of their county.
///
/// Files without an extension (`.gitkeep`) are skipped.
pub fn county_files(dir: &Path, registry: &CountyRegistry) -> RlaResult<Vec<(PathBuf, String)>> {
    let dir_s = path_str(dir);
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).context(ReadingDirSnafu {
        path: dir_s.clone(),
    })? {
        let entry = entry.context(ReadingDirSnafu {
            path: dir_s.clone(),
        })?;
        let p = entry.path();
        if p.is_file() && p.extension().is_some() {
            paths.push(p);
        }
    }
    paths.sort();

    let mut res: Vec<(PathBuf, String)> = Vec::with_capacity(paths.len());
    for p in paths {
        let index = file_index(&p).context(FileIndexSnafu { path: path_str(&p) })?;
        let name = registry
            .name_for_index(index)
            .context(ReconcileFileSnafu { path: path_str(&p) })?;
        res.push((p, name.to_string()));
    }
    Ok(res)
}

/// The official totals of all the counties found in a directory.
pub fn read_official_totals(
    dir: &Path,
    registry: &CountyRegistry,
    rules: &ContestRules,
) -> RlaResult<TotalsSet<OfficialCategory>> {
    let mut totals: TotalsSet<OfficialCategory> = TotalsSet::new();
    for (p, name) in county_files(dir, registry)? {
        let record = read_detail_file(&p)?;
        add_official_county(&mut totals, &name, &record, rules)
            .context(ReconcileFileSnafu { path: path_str(&p) })?;
        debug!(
            "read_official_totals: {}: {:?}",
            simplify_file_name(&p),
            totals.get(&name)
        );
    }
    info!("Read the official totals of {} counties", totals.len());
    Ok(totals)
}
