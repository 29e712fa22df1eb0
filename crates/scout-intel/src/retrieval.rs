//! Query-driven table retrieval over a schema card.
//!
//! Three signal families: lexical cosine over token-frequency weights,
//! table-level embeddings, and column-level embeddings max-pooled per
//! table. The combined strategy fuses lexical and embedding scores after
//! min-max normalization. Every strategy degrades silently to lexical when
//! the embedding capability is absent, and archive tables take a
//! multiplicative penalty unless the query asks for them.

use crate::embed::{SemanticIndex, TextEncoder};
use scout_core::card::SchemaCard;
use scout_core::config::ExplorerConfig;
use scout_core::roles::RetrievalApproach;
use scout_core::text::{has_cue, is_archive_label, tokens_from_text, ARCHIVE_CUE_TOKENS};
use scout_core::TableKey;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Multiplicative penalty on archive tables.
const ARCHIVE_PENALTY: f64 = 0.5;
/// Candidate pool floor before truncation to k.
const CANDIDATE_POOL: usize = 50;

/// One ranked table with its per-signal scores.
#[derive(Debug, Clone)]
pub struct RetrievalHit {
    pub table: TableKey,
    pub score: f64,
    pub lexical: f64,
    pub embedding: f64,
}

/// Retrieval engine bound to one schema card.
///
/// Built once per (reflection hash, planner config) and shared across
/// requests; all internal state is immutable after construction.
pub struct RetrievalEngine {
    card: Arc<SchemaCard>,
    lexical_cache: BTreeMap<TableKey, HashMap<String, f64>>,
    lexical_norms: HashMap<TableKey, f64>,
    encoder: Option<Arc<dyn TextEncoder>>,
    table_index: Option<SemanticIndex>,
    column_index: Option<SemanticIndex>,
}

impl RetrievalEngine {
    pub fn build(
        card: Arc<SchemaCard>,
        encoder: Option<Arc<dyn TextEncoder>>,
        config: &ExplorerConfig,
    ) -> Self {
        let mut lexical_cache = BTreeMap::new();
        let mut lexical_norms = HashMap::new();
        for (key, profile) in &card.tables {
            let mut weights: HashMap<String, f64> = HashMap::new();
            for token in tokens_from_text(&profile.name) {
                *weights.entry(token).or_insert(0.0) += 2.0;
            }
            for token in tokens_from_text(&profile.schema) {
                *weights.entry(token).or_insert(0.0) += 0.5;
            }
            for column in &profile.columns {
                for token in tokens_from_text(&column.name) {
                    *weights.entry(token).or_insert(0.0) += 1.0;
                }
                if let Some(role) = column.role {
                    *weights.entry(role.as_str().to_string()).or_insert(0.0) += 0.5;
                }
            }
            let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
            lexical_norms.insert(key.clone(), norm);
            lexical_cache.insert(key.clone(), weights);
        }

        let (table_index, column_index) = match &encoder {
            Some(encoder) => {
                let table_index = build_table_index(&card, encoder.as_ref());
                let column_index = if config.build_column_index {
                    Some(build_column_index(
                        &card,
                        encoder.as_ref(),
                        config.max_cols_for_embeddings,
                    ))
                } else {
                    None
                };
                (Some(table_index), column_index)
            }
            None => (None, None),
        };

        Self {
            card,
            lexical_cache,
            lexical_norms,
            encoder,
            table_index,
            column_index,
        }
    }

    pub fn embeddings_enabled(&self) -> bool {
        self.encoder.is_some() && self.table_index.is_some()
    }

    pub fn card(&self) -> &Arc<SchemaCard> {
        &self.card
    }

    /// Retrieve the top-k tables for a query under the given strategy.
    pub fn retrieve(
        &self,
        query: &str,
        approach: RetrievalApproach,
        k: usize,
        alpha: f64,
    ) -> Vec<RetrievalHit> {
        if k == 0 || self.card.tables.is_empty() {
            return Vec::new();
        }
        let effective = if self.embeddings_enabled() {
            approach
        } else {
            RetrievalApproach::Lexical
        };

        let hits = match effective {
            RetrievalApproach::Lexical => {
                let lex = self.lexical_scores(query);
                lex.into_iter()
                    .map(|(table, score)| RetrievalHit {
                        table,
                        score,
                        lexical: score,
                        embedding: 0.0,
                    })
                    .collect()
            }
            RetrievalApproach::EmbeddingTable => {
                let emb = self.table_embedding_scores(query);
                emb.into_iter()
                    .map(|(table, score)| RetrievalHit {
                        table,
                        score,
                        lexical: 0.0,
                        embedding: score,
                    })
                    .collect()
            }
            RetrievalApproach::EmbeddingColumn => {
                let emb = self.column_embedding_scores(query);
                emb.into_iter()
                    .map(|(table, score)| RetrievalHit {
                        table,
                        score,
                        lexical: 0.0,
                        embedding: score,
                    })
                    .collect()
            }
            RetrievalApproach::Combined => self.combined_scores(query, alpha),
        };

        self.finalize(query, hits, k)
    }

    /// Apply the archive penalty, order deterministically, truncate to k.
    fn finalize(&self, query: &str, mut hits: Vec<RetrievalHit>, k: usize) -> Vec<RetrievalHit> {
        let query_tokens = tokens_from_text(query);
        let archive_requested = has_cue(&query_tokens, ARCHIVE_CUE_TOKENS);
        if !archive_requested {
            for hit in &mut hits {
                if is_archive_label(hit.table.as_str()) {
                    hit.score *= ARCHIVE_PENALTY;
                }
            }
        }
        hits.retain(|h| h.score > 0.0);
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.table.cmp(&b.table))
        });
        hits.truncate(k);
        hits
    }

    fn lexical_scores(&self, query: &str) -> Vec<(TableKey, f64)> {
        let tokens = tokens_from_text(query);
        if tokens.is_empty() {
            return Vec::new();
        }
        let mut q_weights: HashMap<String, f64> = HashMap::new();
        for token in &tokens {
            *q_weights.entry(token.clone()).or_insert(0.0) += 1.0;
            // Cheap singular/plural morphology.
            if let Some(stripped) = token.strip_suffix('s') {
                if stripped.len() >= 3 {
                    *q_weights.entry(stripped.to_string()).or_insert(0.0) += 0.3;
                }
            } else if token.len() >= 3 {
                *q_weights.entry(format!("{token}s")).or_insert(0.0) += 0.3;
            }
        }
        let q_norm = q_weights.values().map(|w| w * w).sum::<f64>().sqrt();

        self.lexical_cache
            .iter()
            .map(|(key, weights)| {
                let dot: f64 = weights
                    .iter()
                    .map(|(token, w)| w * q_weights.get(token).copied().unwrap_or(0.0))
                    .sum();
                let norm = self.lexical_norms.get(key).copied().unwrap_or(0.0);
                let score = if norm > 0.0 && q_norm > 0.0 {
                    dot / (norm * q_norm)
                } else {
                    0.0
                };
                (key.clone(), score)
            })
            .collect()
    }

    fn table_embedding_scores(&self, query: &str) -> Vec<(TableKey, f64)> {
        let (Some(encoder), Some(index)) = (&self.encoder, &self.table_index) else {
            return self.lexical_scores(query);
        };
        let vector = encoder.encode(query);
        index
            .query(&vector, CANDIDATE_POOL)
            .into_iter()
            .filter_map(|(label, score)| {
                TableKey::parse(&label).map(|key| (key, f64::from(score).max(0.0)))
            })
            .collect()
    }

    fn column_embedding_scores(&self, query: &str) -> Vec<(TableKey, f64)> {
        let (Some(encoder), Some(index)) = (&self.encoder, &self.column_index) else {
            return self.lexical_scores(query);
        };
        let vector = encoder.encode(query);
        // Max-pool column similarities per table.
        let mut per_table: HashMap<TableKey, f64> = HashMap::new();
        for (label, score) in index.query(&vector, CANDIDATE_POOL) {
            let Some(table_part) = label.split("::").next() else {
                continue;
            };
            let Some(key) = TableKey::parse(table_part) else {
                continue;
            };
            let entry = per_table.entry(key).or_insert(0.0);
            *entry = entry.max(f64::from(score).max(0.0));
        }
        per_table.into_iter().collect()
    }

    /// Column search: the column embedding index when available, lexical
    /// token overlap otherwise. Scores are comparable only within one call.
    pub fn find_columns(
        &self,
        keyword: &str,
        limit: usize,
        by_table: Option<&TableKey>,
    ) -> Vec<(TableKey, String, f64)> {
        let mut out: Vec<(TableKey, String, f64)> = Vec::new();

        if let (Some(encoder), Some(index)) = (&self.encoder, &self.column_index) {
            let vector = encoder.encode(keyword);
            for (label, score) in index.query(&vector, limit.saturating_mul(2).max(CANDIDATE_POOL)) {
                let Some((table_part, column)) = label.split_once("::") else {
                    continue;
                };
                let Some(key) = TableKey::parse(table_part) else {
                    continue;
                };
                if by_table.is_some_and(|t| *t != key) {
                    continue;
                }
                out.push((key, column.to_string(), f64::from(score)));
                if out.len() >= limit {
                    return out;
                }
            }
        }

        let tokens: Vec<String> = tokens_from_text(keyword);
        if tokens.is_empty() {
            return out;
        }
        let mut scored: Vec<(TableKey, String, f64)> = Vec::new();
        for (key, profile) in &self.card.tables {
            if by_table.is_some_and(|t| t != key) {
                continue;
            }
            for column in &profile.columns {
                if out.iter().any(|(k, c, _)| k == key && c == &column.name) {
                    continue;
                }
                let name_tokens = tokens_from_text(&column.name);
                let mut score = 0.0;
                if tokens.iter().any(|t| name_tokens.contains(t)) {
                    score += 1.0;
                }
                if let Some(role) = column.role {
                    if tokens.iter().any(|t| t == role.as_str()) {
                        score += 0.3;
                    }
                }
                if score > 0.0 {
                    scored.push((key.clone(), column.name.clone(), score));
                }
            }
        }
        scored.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
                .then_with(|| a.1.cmp(&b.1))
        });
        out.extend(scored.into_iter().take(limit.saturating_sub(out.len())));
        out
    }

    fn combined_scores(&self, query: &str, alpha: f64) -> Vec<RetrievalHit> {
        let alpha = alpha.clamp(0.0, 1.0);
        let lexical = min_max_normalize(self.lexical_scores(query));
        let embedding = min_max_normalize(self.table_embedding_scores(query));

        let mut keys: Vec<TableKey> = lexical.keys().chain(embedding.keys()).cloned().collect();
        keys.sort();
        keys.dedup();

        keys.into_iter()
            .map(|key| {
                let lex = lexical.get(&key).copied().unwrap_or(0.0);
                let emb = embedding.get(&key).copied().unwrap_or(0.0);
                RetrievalHit {
                    score: alpha * lex + (1.0 - alpha) * emb,
                    lexical: lex,
                    embedding: emb,
                    table: key,
                }
            })
            .collect()
    }
}

fn min_max_normalize(scores: Vec<(TableKey, f64)>) -> HashMap<TableKey, f64> {
    if scores.is_empty() {
        return HashMap::new();
    }
    let min = scores.iter().map(|(_, s)| *s).fold(f64::INFINITY, f64::min);
    let max = scores.iter().map(|(_, s)| *s).fold(f64::NEG_INFINITY, f64::max);
    let range = (max - min).max(1e-8);
    scores
        .into_iter()
        .map(|(key, score)| (key, (score - min) / range))
        .collect()
}

fn build_table_index(card: &SchemaCard, encoder: &dyn TextEncoder) -> SemanticIndex {
    let mut labels = Vec::new();
    let mut vectors = Vec::new();
    for (key, profile) in &card.tables {
        let column_bag: Vec<String> = profile
            .columns
            .iter()
            .take(12)
            .map(|c| {
                let role = c.role.map(|r| r.as_str()).unwrap_or("");
                format!("{}({role})", c.name)
            })
            .collect();
        let text = format!(
            "{key}: {}. Columns: {}",
            profile.summary.as_deref().unwrap_or(""),
            column_bag.join(", ")
        );
        labels.push(key.to_string());
        vectors.push(encoder.encode(&text));
    }
    SemanticIndex::build(labels, vectors)
}

fn build_column_index(
    card: &SchemaCard,
    encoder: &dyn TextEncoder,
    max_cols: usize,
) -> SemanticIndex {
    let mut labels = Vec::new();
    let mut vectors = Vec::new();
    for (key, profile) in &card.tables {
        for column in profile.columns.iter().take(max_cols) {
            let role = column.role.map(|r| r.as_str()).unwrap_or("");
            let tags = column.semantic_tags.join(",");
            let text = format!(
                "{key}.{}: role={role}; type={}; tags={tags}",
                column.name, column.vendor_type
            );
            labels.push(format!("{key}::{}", column.name));
            vectors.push(encoder.encode(&text));
        }
    }
    SemanticIndex::build(labels, vectors)
}

#[cfg(test)]
#[path = "retrieval_test.rs"]
mod tests;
