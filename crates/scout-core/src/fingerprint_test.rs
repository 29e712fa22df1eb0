use super::*;
use crate::key::TableKey;
use crate::raw::{RawColumn, RawFk, RawSchema, RawTable};
use std::collections::BTreeMap;

fn raw_fixture() -> RawSchema {
    let mut tables = BTreeMap::new();
    tables.insert(
        TableKey::new("sales", "orders"),
        RawTable {
            schema: "sales".to_string(),
            name: "orders".to_string(),
            columns: vec![
                RawColumn {
                    name: "id".to_string(),
                    vendor_type: "integer".to_string(),
                    nullable: false,
                },
                RawColumn {
                    name: "customer_id".to_string(),
                    vendor_type: "integer".to_string(),
                    nullable: true,
                },
            ],
            pk_cols: vec!["id".to_string()],
            fks: vec![RawFk {
                column: "customer_id".to_string(),
                ref_table: TableKey::new("sales", "customers"),
                ref_column: "id".to_string(),
            }],
            approx_rowcount: Some(100),
        },
    );
    RawSchema {
        dialect: "duckdb".to_string(),
        schemas: vec!["sales".to_string()],
        tables,
        warnings: Vec::new(),
    }
}

#[test]
fn test_reflection_hash_is_deterministic() {
    let raw = raw_fixture();
    let config = ExplorerConfig::default();
    assert_eq!(reflection_hash(&raw, &config), reflection_hash(&raw, &config));
}

#[test]
fn test_reflection_hash_tracks_structure() {
    let raw = raw_fixture();
    let config = ExplorerConfig::default();
    let base = reflection_hash(&raw, &config);

    let mut changed = raw.clone();
    changed
        .tables
        .get_mut("sales.orders")
        .unwrap()
        .columns
        .push(RawColumn {
            name: "status".to_string(),
            vendor_type: "varchar".to_string(),
            nullable: true,
        });
    assert_ne!(base, reflection_hash(&changed, &config));
}

#[test]
fn test_reflection_hash_tracks_profiling_params() {
    let raw = raw_fixture();
    let base = reflection_hash(&raw, &ExplorerConfig::default());
    let tuned = ExplorerConfig {
        value_constraint_threshold: 99,
        ..ExplorerConfig::default()
    };
    assert_ne!(base, reflection_hash(&raw, &tuned));
}

#[test]
fn test_reflection_hash_ignores_query_time_knobs() {
    let raw = raw_fixture();
    let base = reflection_hash(&raw, &ExplorerConfig::default());
    let tuned = ExplorerConfig {
        embeddings_enabled: false,
        strict_archive_exclude: false,
        ..ExplorerConfig::default()
    };
    assert_eq!(base, reflection_hash(&raw, &tuned));
}

#[test]
fn test_connection_fingerprint_shape() {
    let fp = connection_fingerprint("duckdb:///tmp/warehouse.db");
    assert_eq!(fp.len(), 10);
    assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_subject_area_id_stable_under_membership() {
    let members = vec!["sales.customers".to_string(), "sales.orders".to_string()];
    assert_eq!(subject_area_id(&members), subject_area_id(&members));
    let other = vec!["sales.customers".to_string()];
    assert_ne!(subject_area_id(&members), subject_area_id(&other));
}
