use super::*;
use folio_ir::{FileId, VirtualPath};
use pretty_assertions::assert_eq;

fn file() -> FileId {
    FileId::new(None, VirtualPath::new("queue-tests.fol"))
}

#[test]
fn test_duplicates_are_dropped() {
    let mut queue = DiagnosticQueue::new();
    let span = Span::new(file(), 0, 3);
    let warn = Diagnostic::warning(ErrorCode::W6003)
        .with_message("label `<a>` is not attached to anything")
        .with_label(span, "");
    assert!(queue.add(warn.clone()));
    assert!(!queue.add(warn));
    assert_eq!(queue.warning_count(), 1);
    assert_eq!(queue.flush().len(), 1);
}

#[test]
fn test_unlimited_keeps_duplicates() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    let diag = Diagnostic::error(ErrorCode::E6007).with_message("cannot divide by zero");
    assert!(queue.add(diag.clone()));
    assert!(queue.add(diag));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn test_error_limit() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 2,
        deduplicate: false,
    });
    for i in 0..4 {
        queue.add(Diagnostic::error(ErrorCode::E6099).with_message(format!("error {i}")));
    }
    assert!(queue.limit_reached());
    assert_eq!(queue.error_count(), 2);

    // Warnings still pass once the error limit is reached.
    assert!(queue.add(Diagnostic::warning(ErrorCode::W6001).with_message("w")));
}

#[test]
fn test_flush_sorts_by_position() {
    let mut queue = DiagnosticQueue::new();
    let id = file();
    queue.add(
        Diagnostic::error(ErrorCode::E6002)
            .with_message("second")
            .with_label(Span::new(id, 20, 21), ""),
    );
    queue.add(Diagnostic::error(ErrorCode::E6002).with_message("detached"));
    queue.add(
        Diagnostic::error(ErrorCode::E6002)
            .with_message("first")
            .with_label(Span::new(id, 2, 3), ""),
    );

    let messages: Vec<_> = queue.flush().into_iter().map(|d| d.message).collect();
    assert_eq!(messages, vec!["first", "second", "detached"]);
    assert!(!queue.has_errors());
}

#[test]
fn test_too_many_errors() {
    let diag = too_many_errors(10);
    assert_eq!(diag.code, ErrorCode::E9001);
    assert!(diag.message.contains("10"));
}
