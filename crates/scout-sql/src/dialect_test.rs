use super::*;

#[test]
fn test_from_name_accepts_aliases() {
    assert_eq!(SqlDialect::from_name("postgresql").unwrap(), SqlDialect::Postgres);
    assert_eq!(SqlDialect::from_name("mssql").unwrap(), SqlDialect::Tsql);
    assert_eq!(SqlDialect::from_name("SQL").unwrap(), SqlDialect::Generic);
}

#[test]
fn test_from_name_rejects_unknown() {
    assert!(matches!(
        SqlDialect::from_name("clickhouse"),
        Err(SqlError::UnknownDialect { .. })
    ));
}

#[test]
fn test_from_driver_falls_back_to_generic() {
    assert_eq!(SqlDialect::from_driver("duckdb"), SqlDialect::Generic);
    assert_eq!(SqlDialect::from_driver("postgresql"), SqlDialect::Postgres);
}

#[test]
fn test_oracle_is_approximated() {
    assert!(SqlDialect::Oracle.is_approximated());
    assert!(!SqlDialect::Postgres.is_approximated());
}

#[test]
fn test_all_contains_every_dialect() {
    assert_eq!(SqlDialect::ALL.len(), 8);
}
