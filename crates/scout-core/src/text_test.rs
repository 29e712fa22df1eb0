use super::*;

#[test]
fn test_normalize_snake_case() {
    assert_eq!(normalize_identifier("customer_orders"), "customer orders");
}

#[test]
fn test_normalize_camel_case() {
    assert_eq!(normalize_identifier("CustomerOrders"), "customer orders");
    assert_eq!(normalize_identifier("orderDate"), "order date");
}

#[test]
fn test_normalize_acronym_run_stays_together() {
    assert_eq!(normalize_identifier("XMLHttpRequest"), "xmlhttp request");
}

#[test]
fn test_tokens_drop_stop_words() {
    let tokens = tokens_from_text("total revenue by region for 2024");
    assert_eq!(tokens, vec!["total", "revenue", "region", "2024"]);
}

#[test]
fn test_tokens_from_identifier() {
    assert_eq!(tokens_from_text("order_line_items"), vec!["order", "line", "items"]);
}

#[test]
fn test_archive_label_detection() {
    assert!(is_archive_label("sales.orders_archive"));
    assert!(is_archive_label("sales.order_history"));
    assert!(is_archive_label("audit.change_log"));
    assert!(!is_archive_label("sales.orders"));
    // Token boundaries: "historic" is not the token "hist".
    assert!(!is_archive_label("geo.historic_sites"));
}

#[test]
fn test_archive_label_with_column_suffix() {
    assert!(is_archive_label("sales.orders_archive::id"));
}

#[test]
fn test_year_extraction() {
    assert_eq!(year_in_text("revenue for 2024"), Some(2024));
    assert_eq!(year_in_text("revenue in q1 1999"), Some(1999));
    assert_eq!(year_in_text("top 10 customers"), None);
    assert_eq!(year_in_text("order 123456"), None);
}

#[test]
fn test_has_cue() {
    let tokens = tokens_from_text("total revenue by region");
    assert!(has_cue(&tokens, AGG_CUE_TOKENS));
    assert!(!has_cue(&tokens, TIME_CUE_TOKENS));
}
