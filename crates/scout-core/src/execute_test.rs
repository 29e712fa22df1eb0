use super::*;

#[test]
fn test_code_categories() {
    assert_eq!(ErrorCode::ServiceNotReady.category(), ErrorCategory::Readiness);
    assert_eq!(ErrorCode::NonSelectStatement.category(), ErrorCategory::Safety);
    assert_eq!(ErrorCode::UnresolvedIdentifier.category(), ErrorCategory::Parse);
    assert_eq!(ErrorCode::Timeout.category(), ErrorCategory::Runtime);
    assert_eq!(ErrorCode::NoMetric.category(), ErrorCategory::Coverage);
}

#[test]
fn test_safety_codes_are_not_recoverable() {
    assert!(!ErrorCode::NonSelectStatement.recoverable());
    assert!(!ErrorCode::MultiStatement.recoverable());
    assert!(ErrorCode::ParseError.recoverable());
    assert!(ErrorCode::DriverError.recoverable());
}

#[test]
fn test_error_code_wire_form() {
    let json = serde_json::to_string(&ErrorCode::NonSelectStatement).unwrap();
    assert_eq!(json, "\"NON_SELECT_STATEMENT\"");
}

#[test]
fn test_failure_result_shape() {
    let err = ToolError::new(ErrorCode::MultiStatement, "two statements");
    let result = ExecuteResult::failure("SELECT 1; SELECT 2", err, NextAction::RefinePlan);
    assert_eq!(result.status, ExecuteStatus::Error);
    assert_eq!(result.rows_returned, 0);
    assert!(!result.truncated);
    let err = result.error.unwrap();
    assert_eq!(err.category, ErrorCategory::Safety);
    assert!(!err.recoverable);
}
