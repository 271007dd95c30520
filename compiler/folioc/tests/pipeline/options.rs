//! Compile options: limits, inspection and denied warnings.

use folio_diagnostic::{ErrorCode, Severity};
use folio_eval::{Limits, Value, World};
use folioc::inspect::expr_at;
use folioc::{compile, CompileOptions, MemoryWorld};
use pretty_assertions::assert_eq;

use crate::common::{compiled, error_codes, failure};

fn with_limits(limits: Limits) -> CompileOptions {
    CompileOptions {
        limits,
        ..CompileOptions::default()
    }
}

#[test]
fn warnings_accompany_successful_output() {
    let result = compiled(&MemoryWorld::new("<lonely> a ** b"));
    let codes: Vec<_> = result.warnings.iter().map(|diag| diag.code).collect();
    assert_eq!(codes, vec![ErrorCode::W6003, ErrorCode::W6001]);
    assert!(result.warnings.iter().all(|diag| diag.severity == Severity::Warning));
}

#[test]
fn denied_warnings_become_errors() {
    let world = MemoryWorld::new("a ** b");
    let options = CompileOptions {
        deny_warnings: true,
        ..CompileOptions::default()
    };
    let diagnostics = failure(&world, &options);
    assert_eq!(error_codes(&diagnostics), vec![ErrorCode::W6001]);
    assert!(diagnostics[0].notes.iter().any(|note| note.contains("denied")));

    assert!(compile(&MemoryWorld::new("a *b*"), &options).is_ok());
}

#[test]
fn warnings_precede_the_error_that_stopped_compilation() {
    let diagnostics = failure(&MemoryWorld::new("a ** b #nope"), &CompileOptions::default());
    let codes: Vec<_> = diagnostics.iter().map(|diag| diag.code).collect();
    assert_eq!(codes, vec![ErrorCode::W6001, ErrorCode::E6002]);
}

#[test]
fn every_syntax_error_is_reported() {
    let diagnostics = failure(&MemoryWorld::new("*a\n\n_b"), &CompileOptions::default());
    assert_eq!(diagnostics.len(), 2, "{diagnostics:#?}");
    assert!(diagnostics.iter().all(|diag| diag.code.as_str().starts_with("E1")));
}

#[test]
fn iteration_limit() {
    let text = "#for i in range(20) []";
    let tight = with_limits(Limits {
        max_iterations: 5,
        ..Limits::default()
    });
    let diagnostics = failure(&MemoryWorld::new(text), &tight);
    assert_eq!(error_codes(&diagnostics), vec![ErrorCode::E6009]);
    assert!(compile(&MemoryWorld::new(text), &CompileOptions::default()).is_ok());
}

#[test]
fn call_depth_limit() {
    let text = "#let down(n) = if n > 0 { down(n - 1) } else { n }\n#down(20)";
    let tight = with_limits(Limits {
        max_call_depth: 8,
        ..Limits::default()
    });
    let diagnostics = failure(&MemoryWorld::new(text), &tight);
    assert_eq!(error_codes(&diagnostics), vec![ErrorCode::E6011]);
    assert_eq!(
        compiled(&MemoryWorld::new(text)).content.plain_text().trim(),
        "0"
    );
}

#[test]
fn oversized_repetition_is_an_error() {
    for text in ["#{\"ab\" * 9223372036854775807}", "#{(0,) * 9223372036854775807}"] {
        let diagnostics = failure(&MemoryWorld::new(text), &CompileOptions::default());
        assert_eq!(error_codes(&diagnostics), vec![ErrorCode::E6025]);
        assert_eq!(diagnostics[0].message, "value is too large");
    }
}

/// Compile with the expression at a zero-based position inspected.
fn inspect(text: &str, line: usize, column: usize) -> Vec<Value> {
    let world = MemoryWorld::new(text);
    let Ok(source) = world.source(world.main()) else {
        panic!("main file must load");
    };
    let Some(span) = expr_at(&source, line, column) else {
        panic!("no expression at {line}:{column}");
    };
    let options = CompileOptions {
        inspect: Some(span),
        ..CompileOptions::default()
    };
    match compile(&world, &options) {
        Ok(compiled) => compiled.traced,
        Err(diagnostics) => panic!("compilation failed: {diagnostics:#?}"),
    }
}

#[test]
fn inspection_records_every_value() {
    let text = "#let x = 10\n#for i in range(3) [#(i * x)]";
    assert_eq!(inspect(text, 1, 22), vec![Value::Int(0), Value::Int(1), Value::Int(2)]);
    assert_eq!(inspect(text, 0, 9), vec![Value::Int(10)]);
}

#[test]
fn inspecting_dead_code_records_nothing() {
    assert_eq!(inspect("#if false { 7 }", 0, 12), Vec::<Value>::new());
}
