use folio_diagnostic::{ErrorCode, Severity};
use folio_ir::{FileId, Span, VirtualPath};
use pretty_assertions::assert_eq;

use super::*;

fn file() -> FileId {
    FileId::new(None, VirtualPath::new("/errors.fol"))
}

#[test]
fn factories_render_their_kind() {
    assert_eq!(division_by_zero().message, "cannot divide by zero");
    assert_eq!(unknown_variable("range").message, "unknown variable: range");
    assert_eq!(missing_argument("x").message, "missing argument: x");
    assert_eq!(
        unexpected_argument(ArgSlot::Positional(2)).message,
        "unexpected positional argument at index 2"
    );
    assert_eq!(
        unexpected_argument(ArgSlot::Named("key".into())).message,
        "unexpected argument: key"
    );
    assert_eq!(
        type_mismatch("boolean", "integer").message,
        "expected boolean, found integer"
    );
    assert_eq!(
        forbidden_flow(FlowKind::Return).message,
        "cannot return outside of function"
    );
}

#[test]
fn kinds_map_to_codes() {
    assert_eq!(type_mismatch("a", "b").code(), ErrorCode::E6001);
    assert_eq!(missing_argument("x").code(), ErrorCode::E6004);
    assert_eq!(recursion_limit("show rule", 64).code(), ErrorCode::E6011);
    assert_eq!(redefinition("x").code(), ErrorCode::E6017);
    assert_eq!(EvalError::new("boom").code(), ErrorCode::E6099);
}

#[test]
fn at_keeps_the_innermost_span() {
    let inner = Span::new(file(), 4, 6);
    let outer = Span::new(file(), 0, 10);
    let result: SourceResult<()> = Err(division_by_zero().with_span(inner));
    assert_eq!(result.at(outer).map_err(|e| e.span), Err(inner));

    let result: SourceResult<()> = Err(division_by_zero());
    assert_eq!(result.at(outer).map_err(|e| e.span), Err(outer));
}

#[test]
fn string_errors_become_custom() {
    let span = Span::new(file(), 1, 2);
    let result: Result<(), String> = Err("nope".into());
    let error = result.at(span).err();
    assert_eq!(error.map(|e| (e.code(), e.message, e.span)), Some((ErrorCode::E6099, "nope".to_string(), span)));
}

#[test]
fn trace_skips_calls_enclosing_the_error() {
    let call = Span::new(file(), 0, 20);
    let body = Span::new(file(), 40, 50);

    let result: SourceResult<()> = Err(division_by_zero().with_span(Span::new(file(), 5, 6)));
    let error = result.trace(|| Tracepoint::Call(Some("f".into())), call).err();
    assert_eq!(error.map(|e| e.trace.len()), Some(0));

    let result: SourceResult<()> = Err(division_by_zero().with_span(body));
    let error = result.trace(|| Tracepoint::Call(Some("f".into())), call).err();
    assert_eq!(
        error.map(|e| e.trace),
        Some(vec![Spanned::new(Tracepoint::Call(Some("f".into())), call)])
    );
}

#[test]
fn diagnostics_carry_labels_trace_and_hints() {
    let span = Span::new(file(), 3, 4);
    let call = Span::new(file(), 10, 15);
    let mut error = redefinition("x").with_span(span);
    error.trace.push(Spanned::new(Tracepoint::Import, call));
    let diag = error.to_diagnostic();
    assert_eq!(diag.code, ErrorCode::E6017);
    assert_eq!(diag.severity, Severity::Error);
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.primary_span(), Some(span));
    assert_eq!(diag.hints, vec!["shadowing is only allowed in a nested block".to_string()]);
}

#[test]
fn warnings_without_location_have_no_label() {
    let diag = warning(ErrorCode::W6003, Span::detached(), "label `<x>` is not attached");
    assert!(!diag.is_error());
    assert!(diag.labels.is_empty());
}
