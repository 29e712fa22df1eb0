use super::*;

#[test]
fn test_validate_good_sql() {
    let parser = SqlParser::new();
    let outcome = validate(&parser, "select id from users", SqlDialect::Generic);
    assert!(outcome.is_valid);
    assert_eq!(outcome.normalized_sql.unwrap(), "SELECT id FROM users");
}

#[test]
fn test_validate_bad_sql() {
    let parser = SqlParser::new();
    let outcome = validate(&parser, "select from from", SqlDialect::Generic);
    assert!(!outcome.is_valid);
    assert!(outcome.error_message.unwrap().contains("[S002]"));
    assert!(outcome.normalized_sql.is_none());
}

#[test]
fn test_validate_oracle_notes_approximation() {
    let parser = SqlParser::new();
    let outcome = validate(&parser, "SELECT 1 FROM dual", SqlDialect::Oracle);
    assert!(outcome.is_valid);
    assert!(!outcome.notes.is_empty());
}

#[test]
fn test_transpile_renders_canonical_form() {
    let parser = SqlParser::new();
    let outcome = transpile(
        &parser,
        "select  id   from users;",
        SqlDialect::Postgres,
        SqlDialect::Generic,
    )
    .unwrap();
    assert_eq!(outcome.sql, "SELECT id FROM users");
    assert_eq!(outcome.source, SqlDialect::Postgres);
}

#[test]
fn test_auto_transpile_prefers_target() {
    let parser = SqlParser::new();
    let outcome = auto_transpile(&parser, "SELECT id FROM users", SqlDialect::Postgres).unwrap();
    assert_eq!(outcome.source, SqlDialect::Postgres);
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_auto_transpile_idempotent_on_target_dialect() {
    let parser = SqlParser::new();
    let first = auto_transpile(&parser, "SELECT a, b FROM t WHERE a > 1", SqlDialect::Generic)
        .unwrap();
    let second = auto_transpile(&parser, &first.sql, SqlDialect::Generic).unwrap();
    assert_eq!(first.sql, second.sql);
}

#[test]
fn test_auto_transpile_unparseable_everywhere() {
    let parser = SqlParser::new();
    assert!(auto_transpile(&parser, "not sql at all ~~~", SqlDialect::Generic).is_err());
}
