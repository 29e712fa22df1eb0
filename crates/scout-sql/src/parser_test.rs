use super::*;

#[test]
fn test_parse_select() {
    let parser = SqlParser::new();
    let stmts = parser
        .parse("SELECT id, name FROM users WHERE id = 1", SqlDialect::Generic)
        .unwrap();
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_parse_multiple_statements() {
    let parser = SqlParser::new();
    let stmts = parser
        .parse("SELECT 1; SELECT 2;", SqlDialect::Generic)
        .unwrap();
    assert_eq!(stmts.len(), 2);
}

#[test]
fn test_parse_empty() {
    let parser = SqlParser::new();
    assert!(matches!(
        parser.parse("   ", SqlDialect::Generic),
        Err(SqlError::EmptySql)
    ));
}

#[test]
fn test_parse_error() {
    let parser = SqlParser::new();
    assert!(matches!(
        parser.parse("SELECT FROM WHERE", SqlDialect::Generic),
        Err(SqlError::ParseError { .. })
    ));
}

#[test]
fn test_parse_single_rejects_multi() {
    let parser = SqlParser::new();
    assert!(matches!(
        parser.parse_single("SELECT 1; SELECT 2", SqlDialect::Generic),
        Err(SqlError::MultiStatement)
    ));
}

#[test]
fn test_cache_returns_same_tree() {
    let parser = SqlParser::new();
    let a = parser.parse("SELECT 1", SqlDialect::Generic).unwrap();
    let b = parser.parse("SELECT 1", SqlDialect::Generic).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_cache_is_dialect_scoped() {
    let parser = SqlParser::new();
    let a = parser.parse("SELECT 1", SqlDialect::Generic).unwrap();
    let b = parser.parse("SELECT 1", SqlDialect::Postgres).unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
}

#[test]
fn test_tsql_top_parses() {
    let parser = SqlParser::new();
    assert!(parser
        .parse("SELECT TOP 5 id FROM users", SqlDialect::Tsql)
        .is_ok());
}
