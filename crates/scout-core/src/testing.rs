//! Hand-built schema card fixtures shared by unit tests across the
//! workspace. Not part of the public API surface proper; kept as a normal
//! module so downstream crates can exercise planner and retrieval logic
//! without a live database.

use crate::card::{BuildMeta, ColumnProfile, FkRef, SchemaCard, SubjectArea, TableProfile};
use crate::key::TableKey;
use crate::roles::{ColumnRole, SampledState, TableArchetype};
use chrono::Utc;
use std::collections::BTreeMap;

/// Bare column profile with a vendor type and no sampling data.
pub fn column(name: &str, vendor_type: &str) -> ColumnProfile {
    ColumnProfile::structural(name, vendor_type, true)
}

/// Bare table profile with the given columns.
pub fn table(schema: &str, name: &str, columns: Vec<ColumnProfile>) -> TableProfile {
    TableProfile {
        schema: schema.to_string(),
        name: name.to_string(),
        columns,
        pk_cols: Vec::new(),
        fks: Vec::new(),
        approx_rowcount: None,
        sampled: SampledState::None,
        n_rows_sampled: 0,
        archetype: None,
        summary: None,
        subject_area: None,
        centrality: 0.0,
        n_metrics: 0,
        n_dates: 0,
        is_archive: false,
        is_audit_like: false,
    }
}

/// Wrap profiled tables into a card with one subject area per distinct
/// `subject_area` id found on the tables (tables without one share `"0"`).
pub fn card_from_tables(tables: Vec<TableProfile>) -> SchemaCard {
    let mut by_key: BTreeMap<TableKey, TableProfile> = BTreeMap::new();
    let mut edges = Vec::new();
    for mut t in tables {
        if t.subject_area.is_none() {
            t.subject_area = Some("0".to_string());
        }
        let key = t.key();
        for (col, ref_table, ref_col) in &t.fks {
            edges.push((
                key.clone(),
                ref_table.clone(),
                format!("{key}.{col}->{ref_table}.{ref_col}"),
            ));
        }
        by_key.insert(key, t);
    }

    let mut areas: BTreeMap<String, SubjectArea> = BTreeMap::new();
    for (key, t) in &by_key {
        let id = t.subject_area.clone().unwrap_or_else(|| "0".to_string());
        areas
            .entry(id.clone())
            .or_insert_with(|| SubjectArea {
                name: format!("area {id}"),
                tables: Vec::new(),
                summary: String::new(),
            })
            .tables
            .push(key.clone());
    }

    let schemas: Vec<String> = by_key
        .values()
        .map(|t| t.schema.clone())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();

    SchemaCard {
        dialect: "generic".to_string(),
        connection_fingerprint: "fixture".to_string(),
        schemas,
        subject_areas: areas,
        tables: by_key,
        edges,
        built_at: Utc::now(),
        reflection_hash: "fixturehash0000".to_string(),
        build_meta: BuildMeta {
            version: env!("CARGO_PKG_VERSION").to_string(),
            embeddings_enabled: false,
            fast_start: false,
        },
        warnings: Vec::new(),
    }
}

/// The two-table sales schema used across planner and retrieval tests:
/// `sales.orders(id PK, customer_id FK, order_date, amount)` joined to
/// `sales.customers(id PK, region)`.
pub fn sales_card() -> SchemaCard {
    let customers_key = TableKey::new("sales", "customers");

    let mut orders = table(
        "sales",
        "orders",
        vec![
            column("id", "integer"),
            column("customer_id", "integer"),
            column("order_date", "date"),
            column("amount", "decimal(18,2)"),
        ],
    );
    orders.pk_cols = vec!["id".to_string()];
    orders.fks = vec![(
        "customer_id".to_string(),
        customers_key.clone(),
        "id".to_string(),
    )];
    orders.columns[0].is_pk = true;
    orders.columns[0].role = Some(ColumnRole::Key);
    orders.columns[1].is_fk = true;
    orders.columns[1].fk_ref = Some(FkRef {
        table: customers_key.clone(),
        column: "id".to_string(),
    });
    orders.columns[1].role = Some(ColumnRole::Id);
    orders.columns[2].role = Some(ColumnRole::Date);
    orders.columns[3].role = Some(ColumnRole::Metric);
    orders.archetype = Some(TableArchetype::Fact);
    orders.summary = Some("fact table of order amounts by customer and date".to_string());
    orders.n_metrics = 1;
    orders.n_dates = 1;
    orders.centrality = 0.8;

    let mut customers = table(
        "sales",
        "customers",
        vec![column("id", "integer"), column("region", "varchar")],
    );
    customers.pk_cols = vec!["id".to_string()];
    customers.columns[0].is_pk = true;
    customers.columns[0].role = Some(ColumnRole::Key);
    customers.columns[1].role = Some(ColumnRole::Category);
    customers.columns[1].distinct_values = Some(vec![
        "east".to_string(),
        "north".to_string(),
        "south".to_string(),
        "west".to_string(),
    ]);
    customers.archetype = Some(TableArchetype::Dimension);
    customers.summary = Some("dimension table of customers and their region".to_string());
    customers.centrality = 0.6;

    card_from_tables(vec![orders, customers])
}
