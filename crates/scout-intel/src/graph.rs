//! FK graph construction, centrality, and subject-area partitioning.
//!
//! Tables are nodes, foreign keys are undirected edges weighted by the
//! number of FK columns. Centrality is eigenvector centrality by power
//! iteration, falling back to degree centrality when the iteration does
//! not converge. Communities come from greedy modularity merging, then
//! small communities fold into their best-connected neighbor.

use log::debug;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use scout_core::card::{SubjectArea, TableProfile};
use scout_core::fingerprint::subject_area_id;
use scout_core::text::normalize_identifier;
use scout_core::TableKey;
use std::collections::{BTreeMap, HashMap, HashSet};

const POWER_ITERATIONS: usize = 100;
const CONVERGENCE_TOLERANCE: f64 = 1e-6;

/// Undirected FK graph over table keys.
pub struct FkGraph {
    graph: UnGraph<TableKey, f64>,
    nodes: HashMap<TableKey, NodeIndex>,
}

impl FkGraph {
    /// Build the graph from table profiles. Parallel FKs between the same
    /// pair of tables accumulate edge weight.
    pub fn build(tables: &BTreeMap<TableKey, TableProfile>) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut nodes = HashMap::new();
        for key in tables.keys() {
            let idx = graph.add_node(key.clone());
            nodes.insert(key.clone(), idx);
        }
        for (key, profile) in tables {
            for (_, ref_table, _) in &profile.fks {
                let (Some(&a), Some(&b)) = (nodes.get(key), nodes.get(ref_table)) else {
                    continue;
                };
                if a == b {
                    continue;
                }
                match graph.find_edge(a, b) {
                    Some(edge) => graph[edge] += 1.0,
                    None => {
                        graph.add_edge(a, b, 1.0);
                    }
                }
            }
        }
        Self { graph, nodes }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn neighbors(&self, key: &TableKey) -> Vec<TableKey> {
        let Some(&idx) = self.nodes.get(key) else {
            return Vec::new();
        };
        self.graph
            .neighbors(idx)
            .map(|n| self.graph[n].clone())
            .collect()
    }

    /// Total edge weight between a table and a set of tables.
    pub fn weight_to_set(&self, key: &TableKey, set: &HashSet<TableKey>) -> f64 {
        let Some(&idx) = self.nodes.get(key) else {
            return 0.0;
        };
        self.graph
            .edges(idx)
            .filter(|e| {
                let other = if e.source() == idx { e.target() } else { e.source() };
                set.contains(&self.graph[other])
            })
            .map(|e| *e.weight())
            .sum()
    }

    /// Centrality per table, scaled to [0, 1].
    pub fn centrality(&self) -> HashMap<TableKey, f64> {
        let scores = self
            .eigenvector_centrality()
            .unwrap_or_else(|| {
                debug!("eigenvector centrality did not converge; using degree centrality");
                self.degree_centrality()
            });
        scale_to_unit(scores)
    }

    fn degree_centrality(&self) -> HashMap<TableKey, f64> {
        let n = self.graph.node_count();
        let denom = if n > 1 { (n - 1) as f64 } else { 1.0 };
        self.nodes
            .iter()
            .map(|(key, &idx)| (key.clone(), self.graph.neighbors(idx).count() as f64 / denom))
            .collect()
    }

    fn eigenvector_centrality(&self) -> Option<HashMap<TableKey, f64>> {
        let n = self.graph.node_count();
        if n == 0 {
            return Some(HashMap::new());
        }
        if self.graph.edge_count() == 0 {
            return None;
        }

        let mut x = vec![1.0 / (n as f64).sqrt(); n];
        for _ in 0..POWER_ITERATIONS {
            let mut next = vec![0.0f64; n];
            for edge in self.graph.edge_indices() {
                let (a, b) = self.graph.edge_endpoints(edge)?;
                let w = self.graph[edge];
                next[a.index()] += w * x[b.index()];
                next[b.index()] += w * x[a.index()];
            }
            let norm = next.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm == 0.0 {
                return None;
            }
            for v in &mut next {
                *v /= norm;
            }
            let delta: f64 = next
                .iter()
                .zip(&x)
                .map(|(a, b)| (a - b).abs())
                .sum();
            x = next;
            if delta < CONVERGENCE_TOLERANCE {
                return Some(
                    self.nodes
                        .iter()
                        .map(|(key, &idx)| (key.clone(), x[idx.index()]))
                        .collect(),
                );
            }
        }
        None
    }

    /// Community partition by greedy modularity merging. Isolated tables
    /// come back as singleton communities.
    pub fn communities(&self) -> Vec<Vec<TableKey>> {
        let n = self.graph.node_count();
        if n == 0 {
            return Vec::new();
        }

        // community id per node, community -> member node indexes
        let mut community_of: Vec<usize> = (0..n).collect();
        let mut members: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();

        let total_weight: f64 = self.graph.edge_indices().map(|e| self.graph[e]).sum();
        if total_weight > 0.0 {
            let two_m = 2.0 * total_weight;
            let degree: Vec<f64> = (0..n)
                .map(|i| {
                    self.graph
                        .edges(NodeIndex::new(i))
                        .map(|e| *e.weight())
                        .sum()
                })
                .collect();
            let mut community_degree: Vec<f64> = degree.clone();

            loop {
                // weight between community pairs
                let mut between: HashMap<(usize, usize), f64> = HashMap::new();
                for edge in self.graph.edge_indices() {
                    let (a, b) = match self.graph.edge_endpoints(edge) {
                        Some(pair) => pair,
                        None => continue,
                    };
                    let (ca, cb) = (community_of[a.index()], community_of[b.index()]);
                    if ca != cb {
                        let key = (ca.min(cb), ca.max(cb));
                        *between.entry(key).or_insert(0.0) += self.graph[edge];
                    }
                }

                let best = between
                    .iter()
                    .map(|(&(ca, cb), &w)| {
                        let delta =
                            2.0 * (w / two_m - (community_degree[ca] * community_degree[cb]) / (two_m * two_m));
                        (delta, ca, cb)
                    })
                    .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

                match best {
                    Some((delta, ca, cb)) if delta > 0.0 => {
                        let moved = std::mem::take(&mut members[cb]);
                        for idx in &moved {
                            community_of[*idx] = ca;
                        }
                        members[ca].extend(moved);
                        community_degree[ca] += community_degree[cb];
                        community_degree[cb] = 0.0;
                    }
                    _ => break,
                }
            }
        }

        let mut out: Vec<Vec<TableKey>> = members
            .into_iter()
            .filter(|m| !m.is_empty())
            .map(|m| {
                let mut keys: Vec<TableKey> = m
                    .into_iter()
                    .map(|i| self.graph[NodeIndex::new(i)].clone())
                    .collect();
                keys.sort();
                keys
            })
            .collect();
        out.sort();
        out
    }
}

fn scale_to_unit(scores: HashMap<TableKey, f64>) -> HashMap<TableKey, f64> {
    let max = scores.values().cloned().fold(0.0f64, f64::max);
    if max <= 0.0 {
        return scores;
    }
    scores.into_iter().map(|(k, v)| (k, v / max)).collect()
}

/// Partition tables into subject areas: communities, small-community
/// merging, and optional archive coalescing. Returns the area map and
/// writes the area id onto each table profile.
pub fn assign_subject_areas(
    tables: &mut BTreeMap<TableKey, TableProfile>,
    graph: &FkGraph,
    min_area_size: usize,
    merge_archive_areas: bool,
) -> BTreeMap<String, SubjectArea> {
    let mut communities = graph.communities();

    // Merge communities below the size floor into the neighbor community
    // sharing the most edge weight. Communities with no connected neighbor
    // stay as they are.
    let mut merged = true;
    while merged && communities.len() > 1 {
        merged = false;
        let small_positions: Vec<usize> = (0..communities.len())
            .filter(|&pos| communities[pos].len() < min_area_size)
            .collect();
        for small_pos in small_positions {
            let small = communities[small_pos].clone();
            let best = communities
                .iter()
                .enumerate()
                .filter(|(pos, _)| *pos != small_pos)
                .map(|(pos, community)| {
                    let set: HashSet<TableKey> = community.iter().cloned().collect();
                    let weight: f64 = small.iter().map(|k| graph.weight_to_set(k, &set)).sum();
                    (weight, pos)
                })
                .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
            if let Some((weight, target)) = best {
                if weight > 0.0 {
                    let small = communities.remove(small_pos);
                    let target = if target > small_pos { target - 1 } else { target };
                    communities[target].extend(small);
                    communities[target].sort();
                    merged = true;
                    break;
                }
            }
        }
    }

    // Coalesce archive-majority communities into one.
    if merge_archive_areas {
        let (archive, keep): (Vec<_>, Vec<_>) = communities.into_iter().partition(|community| {
            let archived = community
                .iter()
                .filter(|k| tables.get(*k).map(|t| t.is_archive).unwrap_or(false))
                .count();
            archived * 2 > community.len()
        });
        communities = keep;
        if !archive.is_empty() {
            let mut all: Vec<TableKey> = archive.into_iter().flatten().collect();
            all.sort();
            communities.push(all);
        }
    }

    let mut areas = BTreeMap::new();
    for community in communities {
        let member_strings: Vec<String> = community.iter().map(|k| k.to_string()).collect();
        let id = subject_area_id(&member_strings);

        // Name the area after its highest-centrality member.
        let anchor = community
            .iter()
            .max_by(|a, b| {
                let ca = tables.get(*a).map(|t| t.centrality).unwrap_or(0.0);
                let cb = tables.get(*b).map(|t| t.centrality).unwrap_or(0.0);
                ca.partial_cmp(&cb)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| b.cmp(a))
            })
            .cloned()
            .unwrap_or_else(|| community[0].clone());
        let name = normalize_identifier(anchor.table());

        for key in &community {
            if let Some(profile) = tables.get_mut(key) {
                profile.subject_area = Some(id.clone());
            }
        }
        areas.insert(
            id,
            SubjectArea {
                name,
                tables: community,
                summary: String::new(),
            },
        );
    }
    areas
}

/// Fill in area summaries once archetypes are known.
pub fn summarize_subject_areas(
    areas: &mut BTreeMap<String, SubjectArea>,
    tables: &BTreeMap<TableKey, TableProfile>,
) {
    for area in areas.values_mut() {
        let mut by_centrality: Vec<&TableKey> = area.tables.iter().collect();
        by_centrality.sort_by(|a, b| {
            let ca = tables.get(*a).map(|t| t.centrality).unwrap_or(0.0);
            let cb = tables.get(*b).map(|t| t.centrality).unwrap_or(0.0);
            cb.partial_cmp(&ca)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.cmp(b))
        });
        let key_tables: Vec<String> = by_centrality
            .iter()
            .take(5)
            .map(|k| k.to_string())
            .collect();

        let mut archetype_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for key in &area.tables {
            if let Some(archetype) = tables.get(key).and_then(|t| t.archetype) {
                *archetype_counts.entry(archetype.as_str()).or_insert(0) += 1;
            }
        }
        let archetypes: Vec<String> = archetype_counts
            .iter()
            .map(|(k, v)| format!("{k}:{v}"))
            .collect();

        area.summary = format!(
            "Key tables: {}; archetypes: {}",
            key_tables.join(", "),
            archetypes.join(", ")
        );
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
