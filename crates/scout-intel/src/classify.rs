//! Table archetype classification and summaries.
//!
//! Rules apply in order: bridge, fact, dimension, reference, operational.
//! The dimension rule depends on which tables came out as facts, so
//! classification runs in two passes over the whole card.

use scout_core::card::{SubjectArea, TableProfile};
use scout_core::roles::{ColumnRole, TableArchetype};
use scout_core::text::{is_archive_label, tokens_from_text};
use scout_core::TableKey;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Row-count ceiling for the reference archetype.
const REFERENCE_MAX_ROWS: u64 = 10_000;

/// Name tokens marking generic system or lookup tables.
const GENERIC_TOKENS: &[&str] = &[
    "audit", "code", "codes", "log", "logs", "lookup", "lookups", "parameter", "parameters",
    "ref", "reference", "status", "statuses", "sys", "system", "temp", "tmp", "type", "types",
];

fn is_bridge(profile: &TableProfile) -> bool {
    if profile.fks.len() != 2 || profile.pk_cols.is_empty() {
        return false;
    }
    let fk_cols: BTreeSet<&str> = profile.fks.iter().map(|(col, _, _)| col.as_str()).collect();
    let pk_cols: BTreeSet<&str> = profile.pk_cols.iter().map(|c| c.as_str()).collect();
    fk_cols == pk_cols
}

fn is_fact(profile: &TableProfile) -> bool {
    profile.fks.len() >= 2 && profile.n_metrics >= 1
}

/// Classify every table in the card and write archetypes in place.
pub fn classify_tables(tables: &mut BTreeMap<TableKey, TableProfile>) {
    // First pass: archetypes that depend only on the table itself.
    let mut facts: HashSet<TableKey> = HashSet::new();
    for (key, profile) in tables.iter_mut() {
        profile.is_archive = is_archive_label(key.as_str());
        if is_bridge(profile) {
            profile.archetype = Some(TableArchetype::Bridge);
        } else if is_fact(profile) {
            profile.archetype = Some(TableArchetype::Fact);
            facts.insert(key.clone());
        }
    }

    // Tables referenced by at least one fact.
    let mut referenced_by_fact: HashSet<TableKey> = HashSet::new();
    for fact in &facts {
        if let Some(profile) = tables.get(fact) {
            for (_, ref_table, _) in &profile.fks {
                referenced_by_fact.insert(ref_table.clone());
            }
        }
    }

    // Second pass: the remaining rules in order.
    for (key, profile) in tables.iter_mut() {
        if profile.archetype.is_some() {
            continue;
        }
        if !profile.pk_cols.is_empty() && referenced_by_fact.contains(key) {
            profile.archetype = Some(TableArchetype::Dimension);
        } else if profile.approx_rowcount.unwrap_or(u64::MAX) <= REFERENCE_MAX_ROWS
            && profile.fks.is_empty()
        {
            profile.archetype = Some(TableArchetype::Reference);
        } else {
            profile.archetype = Some(TableArchetype::Operational);
        }
    }
}

/// Flag generic high-centrality tables without measures as audit-like.
/// The centrality threshold is the 80th percentile across the card.
pub fn flag_audit_like(tables: &mut BTreeMap<TableKey, TableProfile>) {
    let mut centralities: Vec<f64> = tables.values().map(|t| t.centrality).collect();
    centralities.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let threshold = if centralities.is_empty() {
        0.0
    } else {
        let idx = (centralities.len() * 4) / 5;
        centralities[idx.min(centralities.len() - 1)]
    };

    for profile in tables.values_mut() {
        let has_generic_token = tokens_from_text(&profile.name)
            .iter()
            .any(|t| GENERIC_TOKENS.contains(&t.as_str()));
        let central_without_measures = profile.centrality >= threshold
            && threshold > 0.0
            && profile.n_metrics == 0
            && profile.n_dates == 0;
        profile.is_audit_like = has_generic_token || central_without_measures;
    }
}

/// One-sentence summary: archetype, dominant roles, subject area.
pub fn summarize_table(profile: &TableProfile, areas: &BTreeMap<String, SubjectArea>) -> String {
    let archetype = profile
        .archetype
        .map(|a| a.as_str())
        .unwrap_or("operational");

    let mut parts: Vec<String> = Vec::new();
    let dates: Vec<&str> = profile
        .columns_with_role(ColumnRole::Date)
        .map(|c| c.name.as_str())
        .take(2)
        .collect();
    if !dates.is_empty() {
        parts.push(format!("dates {}", dates.join(", ")));
    }
    let metrics: Vec<&str> = profile
        .columns_with_role(ColumnRole::Metric)
        .map(|c| c.name.as_str())
        .take(4)
        .collect();
    if !metrics.is_empty() {
        parts.push(format!("measures {}", metrics.join(", ")));
    }
    let dims: Vec<&str> = profile
        .columns
        .iter()
        .filter(|c| matches!(c.role, Some(ColumnRole::Category) | Some(ColumnRole::Text)))
        .map(|c| c.name.as_str())
        .take(4)
        .collect();
    if !dims.is_empty() {
        parts.push(format!("dimensions {}", dims.join(", ")));
    }

    let area_name = profile
        .subject_area
        .as_ref()
        .and_then(|id| areas.get(id))
        .map(|a| a.name.as_str())
        .unwrap_or("unassigned");

    let detail = if parts.is_empty() {
        String::new()
    } else {
        format!(" with {}", parts.join("; "))
    };
    format!(
        "{}.{} is a {archetype} table{detail} in the {area_name} area",
        profile.schema, profile.name
    )
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
