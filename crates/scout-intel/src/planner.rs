//! Query planning: from request text to a structured, deterministic plan.

use crate::expand::{ExpandedTable, GraphExpander};
use crate::retrieval::RetrievalEngine;
use scout_core::card::SchemaCard;
use scout_core::config::{ExplorerConfig, PlanBudget};
use scout_core::plan::{
    Clarification, ClarificationCode, FilterCandidate, JoinEdge, PlanResult, PredicateShape,
    RankedTable, ScoreComponents, SelectedColumn,
};
use scout_core::roles::{ColumnRole, RetrievalApproach, TableArchetype};
use scout_core::text::{
    has_cue, tokens_from_text, year_in_text, AGG_CUE_TOKENS, RELATIVE_TIME_TOKENS, TIME_CUE_TOKENS,
};
use scout_core::TableKey;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::sync::Arc;

/// Confidence floor for emitting draft SQL.
const DRAFT_CONFIDENCE_THRESHOLD: f64 = 0.6;
/// Relative score gap under which the main table is considered unclear.
const AMBIGUITY_GAP: f64 = 0.05;
/// Cap on enumerated values echoed into a filter example.
const FILTER_VALUE_CAP: usize = 8;

/// A planning request with its per-request budget.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub request: String,
    pub approach: RetrievalApproach,
    pub alpha: f64,
    pub budget: PlanBudget,
    /// Free-form caller constraints, echoed into assumptions.
    pub constraints: BTreeMap<String, String>,
}

impl PlanRequest {
    pub fn new(request: impl Into<String>) -> Self {
        Self {
            request: request.into(),
            approach: RetrievalApproach::Combined,
            alpha: 0.7,
            budget: PlanBudget::default(),
            constraints: BTreeMap::new(),
        }
    }
}

/// Query planner bound to one schema card.
pub struct Planner {
    card: Arc<SchemaCard>,
}

struct Intent {
    temporal: bool,
    aggregation: bool,
    relative_time: bool,
    year: Option<i32>,
}

impl Intent {
    fn of(request: &str) -> Self {
        let tokens = tokens_from_text(request);
        let year = year_in_text(request);
        Self {
            temporal: has_cue(&tokens, TIME_CUE_TOKENS) || year.is_some(),
            aggregation: has_cue(&tokens, AGG_CUE_TOKENS),
            relative_time: has_cue(&tokens, RELATIVE_TIME_TOKENS),
            year,
        }
    }
}

impl Planner {
    pub fn new(card: Arc<SchemaCard>) -> Self {
        Self { card }
    }

    /// Produce a plan. Identical requests against the same card yield
    /// identical plans.
    pub fn plan(
        &self,
        engine: &RetrievalEngine,
        config: &ExplorerConfig,
        req: &PlanRequest,
    ) -> PlanResult {
        let intent = Intent::of(&req.request);
        let mut assumptions: Vec<String> = req
            .constraints
            .iter()
            .map(|(k, v)| format!("caller constraint: {k}={v}"))
            .collect();

        let hits = engine.retrieve(
            &req.request,
            req.approach,
            req.budget.tables.saturating_mul(2).max(req.budget.tables),
            req.alpha,
        );
        if hits.is_empty() {
            return self.empty_plan(req, "no tables matched the request");
        }

        let expander = GraphExpander::new(&self.card, config);
        let chosen = expander.expand(&hits, req.budget.tables);
        if chosen.is_empty() {
            return self.empty_plan(req, "retrieval hits resolved to no known tables");
        }

        let mut clarifications: Vec<Clarification> = Vec::new();

        let main_table = self.choose_main_table(&req.request, &chosen);
        self.check_ambiguity(&chosen, &main_table, &mut clarifications);

        let (join_plan, reached) = self.derive_join_plan(&chosen, &main_table);
        let chosen_keys: Vec<TableKey> = chosen.iter().map(|t| t.table.clone()).collect();
        let orphans: Vec<String> = chosen_keys
            .iter()
            .filter(|k| !reached.contains(*k))
            .map(|k| k.to_string())
            .collect();
        if !orphans.is_empty() {
            clarifications.push(Clarification {
                question: format!(
                    "these tables have no FK path to {main_table}: {}; should they be joined another way or dropped?",
                    orphans.join(", ")
                ),
                code: ClarificationCode::UnjoinableSubset,
                blocking: true,
            });
        }

        let key_columns = self.derive_key_columns(&chosen_keys, &join_plan);
        let group_by_candidates = self.derive_group_by(&main_table, &join_plan);
        let filter_candidates = self.derive_filters(&chosen_keys, &intent);
        let selected_columns = self.derive_selected_columns(&chosen_keys, req.budget.columns_per_table);

        self.check_intent_coverage(&intent, &chosen_keys, &mut clarifications);

        let confidence = self.confidence(&chosen, &intent, &chosen_keys, reached.len());

        if let Some(year) = intent.year {
            assumptions.push(format!("interpreting {year} as the calendar year {year}"));
        }

        let draft_sql = if clarifications.is_empty() && confidence >= DRAFT_CONFIDENCE_THRESHOLD {
            Some(self.build_draft_sql(
                &main_table,
                &join_plan,
                &selected_columns,
                &filter_candidates,
            ))
        } else {
            None
        };

        let relevant_tables = chosen
            .iter()
            .map(|t| self.ranked_table(t))
            .collect();

        PlanResult {
            request: req.request.clone(),
            relevant_tables,
            main_table: Some(main_table),
            join_plan,
            key_columns,
            group_by_candidates,
            filter_candidates,
            selected_columns,
            clarifications,
            assumptions,
            confidence,
            draft_sql,
        }
    }

    fn empty_plan(&self, req: &PlanRequest, reason: &str) -> PlanResult {
        PlanResult {
            request: req.request.clone(),
            relevant_tables: Vec::new(),
            main_table: None,
            join_plan: Vec::new(),
            key_columns: BTreeMap::new(),
            group_by_candidates: Vec::new(),
            filter_candidates: Vec::new(),
            selected_columns: Vec::new(),
            clarifications: vec![Clarification {
                question: format!("{reason}; can you name the business entities involved?"),
                code: ClarificationCode::NoTables,
                blocking: true,
            }],
            assumptions: Vec::new(),
            confidence: 0.0,
            draft_sql: None,
        }
    }

    fn ranked_table(&self, t: &ExpandedTable) -> RankedTable {
        let profile = self.card.tables.get(&t.table);
        RankedTable {
            table: t.table.clone(),
            score: t.score,
            components: ScoreComponents {
                lexical: t.lexical,
                embedding: t.embedding,
                centrality: profile.map(|p| p.centrality).unwrap_or(0.0),
                archetype_bonus: t.utility,
                origin: t.origin,
            },
            summary: profile.and_then(|p| p.summary.clone()),
        }
    }

    /// Fact-likeness score used to anchor the plan: measures and dates
    /// dominate, the fact archetype and centrality help, and lexical
    /// overlap with the request breaks ties toward what was asked about.
    fn main_table_score(&self, request: &str, t: &ExpandedTable) -> f64 {
        let Some(profile) = self.card.tables.get(&t.table) else {
            return 0.0;
        };
        let mut score = 0.0;
        if profile.n_metrics > 0 {
            score += 2.0;
        }
        if profile.n_dates > 0 {
            score += 1.0;
        }
        if profile.archetype == Some(TableArchetype::Fact) {
            score += 1.5;
        }
        score += 0.3 * profile.centrality;
        let query_tokens = tokens_from_text(request);
        let name_tokens = tokens_from_text(t.table.as_str());
        let overlap = query_tokens
            .iter()
            .filter(|q| name_tokens.contains(q))
            .count();
        if overlap > 0 {
            score += 0.4 + 0.1 * (overlap.saturating_sub(1)).min(2) as f64;
        }
        score
    }

    /// The most fact-like table anchors the query; a fact table in the set
    /// always outranks non-facts through its archetype weight. Ties fall
    /// back to combined score, then lexical key order.
    fn choose_main_table(&self, request: &str, chosen: &[ExpandedTable]) -> TableKey {
        chosen
            .iter()
            .max_by(|a, b| {
                self.main_table_score(request, a)
                    .partial_cmp(&self.main_table_score(request, b))
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| {
                        a.score
                            .partial_cmp(&b.score)
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .then_with(|| b.table.cmp(&a.table))
            })
            .map(|t| t.table.clone())
            .unwrap_or_else(|| chosen[0].table.clone())
    }

    fn check_ambiguity(
        &self,
        chosen: &[ExpandedTable],
        main_table: &TableKey,
        clarifications: &mut Vec<Clarification>,
    ) {
        if chosen.len() < 2 {
            return;
        }
        // A fact-like anchor (measures present or classified fact) is a
        // clear main table even when retrieval scores are close.
        let main_is_fact_like = self
            .card
            .tables
            .get(main_table)
            .map(|p| p.archetype == Some(TableArchetype::Fact) || p.n_metrics > 0)
            .unwrap_or(false);
        if main_is_fact_like {
            return;
        }
        let top = chosen[0].score;
        let second = chosen[1].score;
        if top > 0.0 && (top - second) / top < AMBIGUITY_GAP {
            clarifications.push(Clarification {
                question: format!(
                    "both {} and {} match the request about equally; which is the intended subject?",
                    chosen[0].table, chosen[1].table
                ),
                code: ClarificationCode::AmbiguousIntent,
                blocking: true,
            });
        }
    }

    /// Minimum spanning set of FK edges connecting the chosen tables to the
    /// main table: BFS over FK edges restricted to the chosen set, edges
    /// explored lowest-weight-first with lexical tie-break for determinism.
    fn derive_join_plan(
        &self,
        chosen: &[ExpandedTable],
        main_table: &TableKey,
    ) -> (Vec<JoinEdge>, HashSet<TableKey>) {
        let chosen_set: HashSet<&TableKey> = chosen.iter().map(|t| &t.table).collect();

        // FK column pairs between chosen tables, grouped per table pair.
        let mut pair_columns: BTreeMap<(TableKey, TableKey), Vec<(String, String)>> =
            BTreeMap::new();
        for (key, profile) in &self.card.tables {
            if !chosen_set.contains(key) {
                continue;
            }
            for (col, ref_table, ref_col) in &profile.fks {
                if chosen_set.contains(ref_table) {
                    pair_columns
                        .entry((key.clone(), ref_table.clone()))
                        .or_default()
                        .push((col.clone(), ref_col.clone()));
                }
            }
        }

        // Undirected adjacency with edge weight = number of FK columns.
        let mut adjacency: BTreeMap<&TableKey, Vec<(usize, &TableKey, &(TableKey, TableKey))>> =
            BTreeMap::new();
        for (pair, columns) in &pair_columns {
            let (src, dst) = pair;
            adjacency
                .entry(src)
                .or_default()
                .push((columns.len(), dst, pair));
            adjacency
                .entry(dst)
                .or_default()
                .push((columns.len(), src, pair));
        }
        for edges in adjacency.values_mut() {
            edges.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
        }

        let mut reached: HashSet<TableKey> = HashSet::new();
        reached.insert(main_table.clone());
        let mut join_plan: Vec<JoinEdge> = Vec::new();
        let mut queue: VecDeque<TableKey> = VecDeque::new();
        queue.push_back(main_table.clone());

        while let Some(current) = queue.pop_front() {
            let Some(edges) = adjacency.get(&current) else {
                continue;
            };
            for (_, neighbor, pair) in edges {
                if reached.contains(*neighbor) {
                    continue;
                }
                reached.insert((*neighbor).clone());
                queue.push_back((*neighbor).clone());
                let (src, dst) = pair;
                for (col, ref_col) in &pair_columns[*pair] {
                    join_plan.push(JoinEdge {
                        left: format!("{src}.{col}"),
                        right: format!("{dst}.{ref_col}"),
                    });
                }
            }
        }
        (join_plan, reached)
    }

    fn derive_key_columns(
        &self,
        chosen: &[TableKey],
        join_plan: &[JoinEdge],
    ) -> BTreeMap<TableKey, Vec<String>> {
        let mut out: BTreeMap<TableKey, Vec<String>> = BTreeMap::new();
        for key in chosen {
            if let Some(profile) = self.card.tables.get(key) {
                out.insert(key.clone(), profile.pk_cols.clone());
            }
        }
        for edge in join_plan {
            for qualified in [&edge.left, &edge.right] {
                if let Some((table, column)) = split_qualified(qualified) {
                    if let Some(columns) = out.get_mut(&table) {
                        if !columns.contains(&column) {
                            columns.push(column);
                        }
                    }
                }
            }
        }
        out
    }

    /// Category and date columns from the main table and the tables it
    /// joins to directly. Bridge tables contribute nothing to group keys.
    fn derive_group_by(&self, main_table: &TableKey, join_plan: &[JoinEdge]) -> Vec<SelectedColumn> {
        let mut tables: Vec<TableKey> = vec![main_table.clone()];
        for edge in join_plan {
            let touches_main = [&edge.left, &edge.right]
                .iter()
                .filter_map(|q| split_qualified(q))
                .any(|(table, _)| table == *main_table);
            if !touches_main {
                continue;
            }
            for qualified in [&edge.left, &edge.right] {
                if let Some((table, _)) = split_qualified(qualified) {
                    let groupable = self
                        .card
                        .tables
                        .get(&table)
                        .map(|p| p.archetype != Some(TableArchetype::Bridge))
                        .unwrap_or(false);
                    if groupable && !tables.contains(&table) {
                        tables.push(table);
                    }
                }
            }
        }

        let mut out = Vec::new();
        for table in tables {
            if let Some(profile) = self.card.tables.get(&table) {
                for column in &profile.columns {
                    if matches!(column.role, Some(ColumnRole::Category) | Some(ColumnRole::Date)) {
                        out.push(SelectedColumn {
                            table: table.clone(),
                            column: column.name.clone(),
                            role: column.role.expect("matched above"),
                        });
                    }
                }
            }
        }
        out
    }

    fn derive_filters(&self, chosen: &[TableKey], intent: &Intent) -> Vec<FilterCandidate> {
        let mut out = Vec::new();
        for key in chosen {
            let Some(profile) = self.card.tables.get(key) else {
                continue;
            };
            for column in &profile.columns {
                if column.role == Some(ColumnRole::Date) {
                    let (predicate, example) = match intent.year {
                        Some(year) => (
                            PredicateShape::Between,
                            Some(format!(
                                "{key}.{} BETWEEN '{year}-01-01' AND '{}-01-01'",
                                column.name,
                                year + 1
                            )),
                        ),
                        None => (PredicateShape::Range, None),
                    };
                    out.push(FilterCandidate {
                        table: key.clone(),
                        column: column.name.clone(),
                        predicate,
                        values: Vec::new(),
                        example,
                    });
                } else if let Some(values) = &column.distinct_values {
                    let shape = if values.len() == 1 {
                        PredicateShape::Eq
                    } else {
                        PredicateShape::In
                    };
                    let shown: Vec<String> =
                        values.iter().take(FILTER_VALUE_CAP).cloned().collect();
                    let example = match shape {
                        PredicateShape::Eq => {
                            Some(format!("{key}.{} = '{}'", column.name, shown[0]))
                        }
                        _ => Some(format!(
                            "{key}.{} IN ({})",
                            column.name,
                            shown
                                .iter()
                                .map(|v| format!("'{v}'"))
                                .collect::<Vec<_>>()
                                .join(", ")
                        )),
                    };
                    out.push(FilterCandidate {
                        table: key.clone(),
                        column: column.name.clone(),
                        predicate: shape,
                        values: shown,
                        example,
                    });
                } else if let Some((min, max)) = &column.value_range {
                    if column.role == Some(ColumnRole::Metric) {
                        out.push(FilterCandidate {
                            table: key.clone(),
                            column: column.name.clone(),
                            predicate: PredicateShape::Between,
                            values: vec![min.clone(), max.clone()],
                            example: Some(format!(
                                "{key}.{} BETWEEN {min} AND {max}",
                                column.name
                            )),
                        });
                    }
                }
            }
        }
        out
    }

    /// Keys first, then the highest-priority profile columns per table.
    fn derive_selected_columns(
        &self,
        chosen: &[TableKey],
        columns_per_table: usize,
    ) -> Vec<SelectedColumn> {
        let mut out = Vec::new();
        for key in chosen {
            let Some(profile) = self.card.tables.get(key) else {
                continue;
            };
            let mut picked: BTreeSet<String> = BTreeSet::new();
            for pk in &profile.pk_cols {
                if let Some(column) = profile.column(pk) {
                    if picked.insert(column.name.clone()) {
                        out.push(SelectedColumn {
                            table: key.clone(),
                            column: column.name.clone(),
                            role: column.role.unwrap_or(ColumnRole::Key),
                        });
                    }
                }
            }
            let mut rest: Vec<_> = profile
                .columns
                .iter()
                .filter(|c| !picked.contains(&c.name) && c.role.is_some())
                .collect();
            rest.sort_by_key(|c| {
                (
                    c.role.map(|r| r.select_priority()).unwrap_or(u8::MAX),
                    c.name.clone(),
                )
            });
            for column in rest.into_iter().take(columns_per_table) {
                out.push(SelectedColumn {
                    table: key.clone(),
                    column: column.name.clone(),
                    role: column.role.expect("filtered on is_some"),
                });
            }
        }
        out
    }

    fn check_intent_coverage(
        &self,
        intent: &Intent,
        chosen: &[TableKey],
        clarifications: &mut Vec<Clarification>,
    ) {
        let has_date = chosen.iter().any(|k| {
            self.card
                .tables
                .get(k)
                .map(|p| p.n_dates > 0)
                .unwrap_or(false)
        });
        let has_metric = chosen.iter().any(|k| {
            self.card
                .tables
                .get(k)
                .map(|p| p.n_metrics > 0)
                .unwrap_or(false)
        });

        if intent.temporal && !has_date {
            clarifications.push(Clarification {
                question: "the request implies a time scope but no date column was found; which column carries the event time?".to_string(),
                code: ClarificationCode::NoDateDimension,
                blocking: true,
            });
        }
        if intent.aggregation && !has_metric {
            clarifications.push(Clarification {
                question: "the request implies aggregation but no numeric measure was found; what should be aggregated?".to_string(),
                code: ClarificationCode::NoMetric,
                blocking: true,
            });
        }
        if intent.relative_time && intent.year.is_none() {
            clarifications.push(Clarification {
                question: "the time range is relative; what absolute date range should be used?".to_string(),
                code: ClarificationCode::AmbiguousTimeRange,
                blocking: true,
            });
        }
        if intent.temporal {
            let date_columns: usize = chosen
                .iter()
                .filter_map(|k| self.card.tables.get(k))
                .map(|p| p.n_dates)
                .sum();
            if date_columns > 1 {
                clarifications.push(Clarification {
                    question: "several date columns are available; which one defines the requested period?".to_string(),
                    code: ClarificationCode::MultipleDateCandidates,
                    blocking: false,
                });
            }
        }
    }

    fn confidence(
        &self,
        chosen: &[ExpandedTable],
        intent: &Intent,
        chosen_keys: &[TableKey],
        reached: usize,
    ) -> f64 {
        let top = chosen.iter().map(|t| t.score).fold(0.0f64, f64::max);
        let bottom = chosen
            .iter()
            .map(|t| t.score)
            .fold(f64::INFINITY, f64::min);
        let dispersion = if top > 0.0 {
            ((top - bottom) / top).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let mut required = 0usize;
        let mut present = 0usize;
        if intent.temporal {
            required += 1;
            if chosen_keys.iter().any(|k| {
                self.card.tables.get(k).map(|p| p.n_dates > 0).unwrap_or(false)
            }) {
                present += 1;
            }
        }
        if intent.aggregation {
            required += 1;
            if chosen_keys.iter().any(|k| {
                self.card.tables.get(k).map(|p| p.n_metrics > 0).unwrap_or(false)
            }) {
                present += 1;
            }
        }
        let role_coverage = if required == 0 {
            1.0
        } else if present == required {
            1.0
        } else if present > 0 {
            0.5
        } else {
            0.0
        };

        let connectivity = if chosen_keys.is_empty() {
            0.0
        } else {
            reached as f64 / chosen_keys.len() as f64
        };

        (0.4 * dispersion + 0.3 * role_coverage + 0.3 * connectivity).clamp(0.0, 1.0)
    }

    /// Draft SQL from the join plan, selected columns, and the unambiguous
    /// filters. Identifiers are always fully qualified; the projection is
    /// always explicit.
    fn build_draft_sql(
        &self,
        main_table: &TableKey,
        join_plan: &[JoinEdge],
        selected_columns: &[SelectedColumn],
        filter_candidates: &[FilterCandidate],
    ) -> String {
        let projection: Vec<String> = selected_columns
            .iter()
            .map(|c| format!("{}.{}", c.table, c.column))
            .collect();
        // The projection is always explicit; a plan without profiled
        // columns degrades to a row probe rather than SELECT *.
        let projection = if projection.is_empty() {
            "1".to_string()
        } else {
            projection.join(", ")
        };

        let mut sql = format!("SELECT {projection} FROM {main_table}");

        // One JOIN per table pair, all column pairs in its ON clause.
        let mut joined: Vec<TableKey> = vec![main_table.clone()];
        let mut by_pair: Vec<(TableKey, Vec<String>)> = Vec::new();
        for edge in join_plan {
            let (left_table, _) = match split_qualified(&edge.left) {
                Some(pair) => pair,
                None => continue,
            };
            let (right_table, _) = match split_qualified(&edge.right) {
                Some(pair) => pair,
                None => continue,
            };
            let new_table = if joined.contains(&left_table) && !joined.contains(&right_table) {
                right_table
            } else if joined.contains(&right_table) && !joined.contains(&left_table) {
                left_table
            } else {
                // Another column pair for a join already in progress.
                if let Some(entry) = by_pair
                    .iter_mut()
                    .find(|(t, _)| *t == left_table || *t == right_table)
                {
                    entry.1.push(format!("{} = {}", edge.left, edge.right));
                }
                continue;
            };
            joined.push(new_table.clone());
            by_pair.push((new_table, vec![format!("{} = {}", edge.left, edge.right)]));
        }
        for (table, conditions) in by_pair {
            sql.push_str(&format!(" JOIN {table} ON {}", conditions.join(" AND ")));
        }

        let year_filters: Vec<&str> = filter_candidates
            .iter()
            .filter(|f| f.predicate == PredicateShape::Between && f.example.is_some())
            .filter_map(|f| f.example.as_deref())
            .filter(|e| e.contains("-01-01"))
            .collect();
        if let Some(first) = year_filters.first() {
            sql.push_str(&format!(" WHERE {first}"));
        }
        sql
    }
}

fn split_qualified(qualified: &str) -> Option<(TableKey, String)> {
    let (table_part, column) = qualified.rsplit_once('.')?;
    TableKey::parse(table_part).map(|key| (key, column.to_string()))
}

#[cfg(test)]
#[path = "planner_test.rs"]
mod tests;
