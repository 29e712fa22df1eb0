//! Graph expansion from seed tables along FK edges.

use crate::retrieval::RetrievalHit;
use scout_core::card::SchemaCard;
use scout_core::config::{ExpanderKind, ExplorerConfig};
use scout_core::plan::ExpansionOrigin;
use scout_core::roles::TableArchetype;
use scout_core::TableKey;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// Utility weights from the expansion score.
const W_PROXIMITY: f64 = 0.5;
const W_ARCHETYPE: f64 = 0.3;
const W_CENTRALITY: f64 = 0.2;

/// A table selected for the plan, seeds and expansions alike.
#[derive(Debug, Clone)]
pub struct ExpandedTable {
    pub table: TableKey,
    pub origin: ExpansionOrigin,
    /// Retrieval score for seeds; retrieval + utility for expansions.
    pub score: f64,
    pub lexical: f64,
    pub embedding: f64,
    pub utility: f64,
}

/// FK-following expander over a schema card.
pub struct GraphExpander<'c> {
    card: &'c SchemaCard,
    strategy: ExpanderKind,
    strict_archive_exclude: bool,
    /// Undirected adjacency, deterministic neighbor order.
    adjacency: BTreeMap<TableKey, Vec<TableKey>>,
}

impl<'c> GraphExpander<'c> {
    pub fn new(card: &'c SchemaCard, config: &ExplorerConfig) -> Self {
        let mut adjacency: BTreeMap<TableKey, Vec<TableKey>> = BTreeMap::new();
        for (src, dst, _) in &card.edges {
            adjacency.entry(src.clone()).or_default().push(dst.clone());
            adjacency.entry(dst.clone()).or_default().push(src.clone());
        }
        for neighbors in adjacency.values_mut() {
            neighbors.sort();
            neighbors.dedup();
        }
        Self {
            card,
            strategy: config.expander,
            strict_archive_exclude: config.strict_archive_exclude,
            adjacency,
        }
    }

    /// Expand the seed set up to `max_tables` selected tables. All seeds
    /// are preserved; candidates fill the remaining budget by combined
    /// retrieval-plus-utility score.
    pub fn expand(&self, hits: &[RetrievalHit], max_tables: usize) -> Vec<ExpandedTable> {
        let seed_count = hits.len().min(max_tables);
        let seeds: Vec<&RetrievalHit> = hits
            .iter()
            .take(seed_count)
            .filter(|h| self.card.tables.contains_key(&h.table))
            .collect();
        if seeds.is_empty() {
            return Vec::new();
        }
        let retrieval_scores: HashMap<&TableKey, &RetrievalHit> =
            hits.iter().map(|h| (&h.table, h)).collect();

        let seed_set: HashSet<TableKey> = seeds.iter().map(|h| h.table.clone()).collect();
        let anchor_archetype = seeds
            .first()
            .and_then(|h| self.card.tables.get(&h.table))
            .and_then(|t| t.archetype);

        let max_depth = match self.strategy {
            ExpanderKind::FkFollowing => 2,
            ExpanderKind::Simple => 1,
        };
        let depths = self.bfs_depths(&seed_set, max_depth);

        let mut selected: Vec<ExpandedTable> = seeds
            .iter()
            .map(|h| ExpandedTable {
                table: h.table.clone(),
                origin: ExpansionOrigin::Seed,
                score: h.score,
                lexical: h.lexical,
                embedding: h.embedding,
                utility: 0.0,
            })
            .collect();

        let mut candidates: Vec<ExpandedTable> = depths
            .into_iter()
            .filter(|(key, _)| !seed_set.contains(key))
            .filter_map(|(key, depth)| {
                let profile = self.card.tables.get(&key)?;
                if profile.is_archive && self.strict_archive_exclude {
                    return None;
                }
                let proximity = if depth <= 1 { 1.0 } else { 0.5 };
                let bonus = archetype_bonus(anchor_archetype, profile.archetype);
                let utility = W_PROXIMITY * proximity
                    + W_ARCHETYPE * bonus
                    + W_CENTRALITY * profile.centrality;
                let hit = retrieval_scores.get(&key);
                Some(ExpandedTable {
                    score: hit.map(|h| h.score).unwrap_or(0.0) + utility,
                    lexical: hit.map(|h| h.lexical).unwrap_or(0.0),
                    embedding: hit.map(|h| h.embedding).unwrap_or(0.0),
                    utility,
                    origin: ExpansionOrigin::Expanded,
                    table: key,
                })
            })
            .collect();
        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.table.cmp(&b.table))
        });

        for candidate in candidates {
            if selected.len() >= max_tables {
                break;
            }
            selected.push(candidate);
        }
        selected
    }

    /// Depth of every table reachable from the seed set within the limit.
    fn bfs_depths(&self, seeds: &HashSet<TableKey>, max_depth: usize) -> BTreeMap<TableKey, usize> {
        let mut depths: BTreeMap<TableKey, usize> = BTreeMap::new();
        let mut queue: VecDeque<(TableKey, usize)> = VecDeque::new();
        let mut sorted_seeds: Vec<&TableKey> = seeds.iter().collect();
        sorted_seeds.sort();
        for seed in sorted_seeds {
            depths.insert(seed.clone(), 0);
            queue.push_back((seed.clone(), 0));
        }
        while let Some((key, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            let Some(neighbors) = self.adjacency.get(&key) else {
                continue;
            };
            for neighbor in neighbors {
                if !depths.contains_key(neighbor) {
                    depths.insert(neighbor.clone(), depth + 1);
                    queue.push_back((neighbor.clone(), depth + 1));
                }
            }
        }
        depths
    }
}

/// Complementary archetypes attract: facts pull dimensions in and
/// dimensions pull facts.
fn archetype_bonus(anchor: Option<TableArchetype>, candidate: Option<TableArchetype>) -> f64 {
    match (anchor, candidate) {
        (Some(TableArchetype::Fact), Some(TableArchetype::Dimension))
        | (Some(TableArchetype::Dimension), Some(TableArchetype::Fact)) => 1.0,
        (_, Some(TableArchetype::Fact)) | (_, Some(TableArchetype::Dimension)) => 0.6,
        _ => 0.4,
    }
}

#[cfg(test)]
#[path = "expand_test.rs"]
mod tests;
