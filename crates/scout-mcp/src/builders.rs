//! Response assembly for the discovery tools.

use scout_core::card::SchemaCard;
use scout_core::plan::{
    ColumnInfo, DatabaseOverview, RelationshipInfo, SubjectAreaItem, TableColumnHit, TableHit,
    TableInfo,
};
use scout_core::roles::ColumnRole;
use scout_core::TableKey;
use scout_intel::{RetrievalEngine, RetrievalHit};

/// High-level overview of the card.
pub fn database_overview(
    card: &SchemaCard,
    include_subject_areas: bool,
    area_limit: usize,
) -> DatabaseOverview {
    let mut areas: Vec<SubjectAreaItem> = Vec::new();
    if include_subject_areas {
        let mut sorted: Vec<(&String, &scout_core::SubjectArea)> =
            card.subject_areas.iter().collect();
        sorted.sort_by(|a, b| b.1.tables.len().cmp(&a.1.tables.len()).then_with(|| a.0.cmp(b.0)));
        areas = sorted
            .into_iter()
            .take(area_limit.max(1))
            .map(|(id, area)| SubjectAreaItem {
                id: id.clone(),
                name: area.name.clone(),
                tables: area.tables.clone(),
                summary: area.summary.clone(),
            })
            .collect();
    }

    let mut by_centrality: Vec<(&TableKey, f64)> = card
        .tables
        .iter()
        .map(|(key, profile)| (key, profile.centrality))
        .collect();
    by_centrality.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });

    DatabaseOverview {
        dialect: card.dialect.clone(),
        schemas: card.schemas.clone(),
        table_count: card.table_count(),
        subject_areas: areas,
        most_connected_tables: by_centrality
            .into_iter()
            .take(5)
            .map(|(key, _)| key.clone())
            .collect(),
    }
}

/// Detailed table response; `None` when the key does not resolve.
pub fn table_info(
    card: &SchemaCard,
    table_key: &TableKey,
    include_samples: bool,
    column_role_filter: &[ColumnRole],
    max_sample_values: usize,
    relationship_limit: Option<usize>,
) -> Option<TableInfo> {
    let profile = card.table(table_key)?;

    let columns: Vec<ColumnInfo> = profile
        .columns
        .iter()
        .filter(|c| {
            column_role_filter.is_empty()
                || c.role.map(|r| column_role_filter.contains(&r)).unwrap_or(false)
        })
        .map(|c| {
            let mut constraints = Vec::new();
            if let Some(values) = &c.distinct_values {
                constraints.push(format!("one of: {}", values.join(", ")));
            }
            if let Some((min, max)) = &c.value_range {
                constraints.push(format!("range: {min}..{max}"));
            }
            for pattern in &c.sample_patterns {
                constraints.push(pattern.clone());
            }
            ColumnInfo {
                name: c.name.clone(),
                vendor_type: c.vendor_type.clone(),
                nullable: c.nullable,
                is_pk: c.is_pk,
                is_fk: c.is_fk,
                role: c.role,
                sample_values: if include_samples {
                    c.distinct_values
                        .as_ref()
                        .map(|v| v.iter().take(max_sample_values).cloned().collect())
                        .unwrap_or_default()
                } else {
                    Vec::new()
                },
                constraints,
            }
        })
        .collect();

    let mut relationships: Vec<RelationshipInfo> = profile
        .fks
        .iter()
        .map(|(col, ref_table, ref_col)| RelationshipInfo {
            column: col.clone(),
            ref_table: ref_table.clone(),
            ref_column: ref_col.clone(),
            join_sql: format!("JOIN {ref_table} ON {table_key}.{col} = {ref_table}.{ref_col}"),
        })
        .collect();
    // Incoming references complete the join picture.
    for (src, dst, _) in &card.edges {
        if dst == table_key && src != table_key {
            if let Some(src_profile) = card.table(src) {
                for (col, ref_table, ref_col) in &src_profile.fks {
                    if ref_table == table_key {
                        relationships.push(RelationshipInfo {
                            column: ref_col.clone(),
                            ref_table: src.clone(),
                            ref_column: col.clone(),
                            join_sql: format!(
                                "JOIN {src} ON {table_key}.{ref_col} = {src}.{col}"
                            ),
                        });
                    }
                }
            }
        }
    }
    relationships.sort_by(|a, b| a.ref_table.cmp(&b.ref_table).then_with(|| a.column.cmp(&b.column)));
    relationships.dedup_by(|a, b| a.ref_table == b.ref_table && a.column == b.column);
    if let Some(limit) = relationship_limit {
        relationships.truncate(limit);
    }

    let common_filters: Vec<String> = profile
        .columns
        .iter()
        .filter_map(|c| {
            c.distinct_values.as_ref().map(|values| {
                let shown: Vec<String> = values
                    .iter()
                    .take(max_sample_values.max(1))
                    .map(|v| format!("'{v}'"))
                    .collect();
                format!("{table_key}.{} IN ({})", c.name, shown.join(", "))
            })
        })
        .collect();

    Some(TableInfo {
        table: table_key.clone(),
        summary: profile.summary.clone(),
        archetype: profile.archetype.map(|a| a.as_str().to_string()),
        subject_area: profile.subject_area.clone(),
        columns,
        pk_cols: profile.pk_cols.clone(),
        relationships,
        common_filters,
        approx_rowcount: profile.approx_rowcount,
    })
}

pub fn table_hits(card: &SchemaCard, hits: &[RetrievalHit]) -> Vec<TableHit> {
    hits.iter()
        .map(|h| TableHit {
            table: h.table.clone(),
            score: h.score,
            lexical: h.lexical,
            embedding: h.embedding,
            summary: card.table(&h.table).and_then(|p| p.summary.clone()),
        })
        .collect()
}

pub fn column_hits(
    card: &SchemaCard,
    engine: &RetrievalEngine,
    keyword: &str,
    limit: usize,
    by_table: Option<&TableKey>,
) -> Vec<TableColumnHit> {
    engine
        .find_columns(keyword, limit, by_table)
        .into_iter()
        .map(|(table, column, score)| {
            let profile = card.table(&table).and_then(|t| t.column(&column).cloned());
            TableColumnHit {
                table,
                column,
                score,
                role: profile.as_ref().and_then(|c| c.role),
                vendor_type: profile.map(|c| c.vendor_type),
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "builders_test.rs"]
mod tests;
