//! Deterministic gazetteer tagging for sampled text.
//!
//! A small, list-backed recognizer: no model, no network. Tags are emitted
//! only when a meaningful share of the inspected values match, which keeps
//! precision high on short identifier-like strings.

use std::collections::HashSet;
use std::sync::OnceLock;

/// Fraction of inspected values that must match before a tag is emitted.
const MIN_MATCH_RATIO: f64 = 0.3;
const MIN_MATCHES: usize = 2;

const PERSON_GIVEN_NAMES: &[&str] = &[
    "alice", "anna", "bob", "carlos", "carol", "chen", "claire", "david", "elena", "emma",
    "frank", "george", "hans", "henry", "ivan", "james", "jane", "john", "jose", "juan", "julia",
    "karen", "laura", "linda", "lisa", "maria", "mark", "mary", "michael", "mohammed", "nina",
    "olga", "paul", "peter", "robert", "sarah", "sofia", "thomas", "wei", "yuki",
];

const ORG_SUFFIXES: &[&str] = &[
    "ag", "bank", "co", "corp", "corporation", "gmbh", "group", "holdings", "inc", "industries",
    "llc", "llp", "ltd", "partners", "plc", "sa", "solutions", "systems", "technologies",
];

const LOCATION_NAMES: &[&str] = &[
    "amsterdam", "australia", "berlin", "boston", "brazil", "canada", "chicago", "china",
    "dallas", "denver", "dubai", "england", "france", "germany", "india", "italy", "japan",
    "london", "madrid", "mexico", "milan", "moscow", "munich", "netherlands", "paris", "poland",
    "rome", "seattle", "shanghai", "singapore", "spain", "sydney", "texas", "tokyo", "toronto",
    "vienna", "zurich",
];

struct Gazetteers {
    person: HashSet<&'static str>,
    org: HashSet<&'static str>,
    location: HashSet<&'static str>,
}

fn gazetteers() -> &'static Gazetteers {
    static CELL: OnceLock<Gazetteers> = OnceLock::new();
    CELL.get_or_init(|| Gazetteers {
        person: PERSON_GIVEN_NAMES.iter().copied().collect(),
        org: ORG_SUFFIXES.iter().copied().collect(),
        location: LOCATION_NAMES.iter().copied().collect(),
    })
}

fn value_tags(value: &str) -> [bool; 3] {
    let gaz = gazetteers();
    let mut person = false;
    let mut org = false;
    let mut location = false;
    for token in value
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        let lower = token.to_lowercase();
        person |= gaz.person.contains(lower.as_str());
        org |= gaz.org.contains(lower.as_str());
        location |= gaz.location.contains(lower.as_str());
    }
    [person, org, location]
}

/// Tag a set of sampled text values. Returns a subset of
/// `{person, organization, location}` ordered deterministically.
pub fn tag_values<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut counts = [0usize; 3];
    let mut total = 0usize;
    for value in values {
        total += 1;
        let tags = value_tags(value);
        for (count, hit) in counts.iter_mut().zip(tags) {
            *count += usize::from(hit);
        }
    }
    if total == 0 {
        return Vec::new();
    }

    const LABELS: [&str; 3] = ["person", "organization", "location"];
    counts
        .iter()
        .zip(LABELS)
        .filter(|(count, _)| {
            **count >= MIN_MATCHES && (**count as f64 / total as f64) >= MIN_MATCH_RATIO
        })
        .map(|(_, label)| label.to_string())
        .collect()
}

#[cfg(test)]
#[path = "ner_test.rs"]
mod tests;
