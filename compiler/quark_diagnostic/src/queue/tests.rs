use super::*;
use crate::Severity;
use quark_ir::Span;

fn error(code: ErrorCode, message: &str) -> Diagnostic {
    Diagnostic::error(code).with_message(message)
}

#[test]
fn flush_sorts_by_position_stably() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    queue.add(error(ErrorCode::E2001, "third"), 3, 1);
    queue.add(error(ErrorCode::E2002, "first"), 1, 5);
    queue.add(error(ErrorCode::E2005, "second-a"), 2, 2);
    queue.add(error(ErrorCode::E2001, "second-b"), 2, 2);

    let messages: Vec<String> = queue.flush().into_iter().map(|d| d.message).collect();
    assert_eq!(messages, vec!["first", "second-a", "second-b", "third"]);
    assert!(queue.is_empty());
    assert!(queue.has_errors().is_none());
}

#[test]
fn same_line_syntax_errors_are_deduplicated() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(error(ErrorCode::E1001, "unexpected `)`"), 4, 3));
    assert!(!queue.add(error(ErrorCode::E1002, "expected expression"), 4, 9));
    assert!(queue.add(error(ErrorCode::E1001, "unexpected `}`"), 5, 1));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn repeated_semantic_messages_are_deduplicated() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(error(ErrorCode::E2002, "cannot find `y` in this scope"), 2, 5));
    assert!(!queue.add(error(ErrorCode::E2002, "cannot find `y` in this scope"), 2, 9));
    assert!(queue.add(error(ErrorCode::E2002, "cannot find `y` in this scope"), 3, 9));
}

#[test]
fn error_limit_drops_and_reports() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 2,
        deduplicate: false,
    });
    queue.add(error(ErrorCode::E2001, "a"), 1, 1);
    queue.add(error(ErrorCode::E2001, "b"), 2, 1);
    assert!(queue.limit_reached());
    assert!(!queue.add(error(ErrorCode::E2001, "c"), 3, 1));

    let flushed = queue.flush();
    assert_eq!(flushed.len(), 3);
    let last = &flushed[2];
    assert_eq!(last.code, ErrorCode::E9002);
    assert_eq!(last.severity, Severity::Note);
    assert!(last.message.contains("1 further error"));
}

#[test]
fn warnings_do_not_count_as_errors() {
    let mut queue = DiagnosticQueue::new();
    queue.add(
        Diagnostic::warning(ErrorCode::E2100).with_message("unreachable code"),
        1,
        1,
    );
    assert!(queue.has_errors().is_none());
    assert_eq!(queue.warning_count(), 1);
    assert_eq!(queue.len(), 1);
}

#[test]
fn add_with_table_positions_by_primary_span() {
    let source = "fn f() {\n  return y;\n}";
    let table = LineOffsetTable::build(source);
    let mut queue = DiagnosticQueue::new();
    queue.add_with_table(
        error(ErrorCode::E2002, "late").with_label(Span::new(18, 19), "here"),
        &table,
        source,
    );
    queue.add_with_table(
        error(ErrorCode::E2001, "early").with_label(Span::new(3, 4), "here"),
        &table,
        source,
    );
    let flushed = queue.flush();
    assert_eq!(flushed[0].message, "early");
    assert_eq!(flushed[1].message, "late");
}

#[test]
fn emit_error_returns_guarantee() {
    let mut queue = DiagnosticQueue::new();
    let _proof = queue.emit_error(error(ErrorCode::E2001, "boom"), 1, 1);
    assert!(queue.has_errors().is_some());
}
