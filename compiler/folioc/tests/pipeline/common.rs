//! Shared helpers for pipeline tests.

use folio_diagnostic::{Diagnostic, ErrorCode};
use folio_eval::{Content, Elem};
use folioc::{compile, CompileOptions, Compiled, MemoryWorld};

/// Compile `world` with default options, panicking on failure.
pub fn compiled(world: &MemoryWorld) -> Compiled {
    match compile(world, &CompileOptions::default()) {
        Ok(compiled) => compiled,
        Err(diagnostics) => panic!("compilation failed: {diagnostics:#?}"),
    }
}

/// The realized content of a single-file document.
pub fn content(text: &str) -> Content {
    compiled(&MemoryWorld::new(text)).content
}

/// The realized plain text of a single-file document, trimmed.
pub fn plain(text: &str) -> String {
    content(text).plain_text().trim().to_string()
}

/// The diagnostics of a document that must fail to compile.
pub fn failure(world: &MemoryWorld, options: &CompileOptions) -> Vec<Diagnostic> {
    match compile(world, options) {
        Ok(compiled) => panic!("compilation succeeded: {}", compiled.content.repr()),
        Err(diagnostics) => diagnostics,
    }
}

/// The codes of the errors among `diagnostics`.
pub fn error_codes(diagnostics: &[Diagnostic]) -> Vec<ErrorCode> {
    diagnostics
        .iter()
        .filter(|diag| diag.is_error())
        .map(|diag| diag.code)
        .collect()
}

/// The only element of `content`.
pub fn single(content: &Content) -> Elem {
    match content.to_single() {
        Some(elem) => elem.clone(),
        None => panic!("expected one element, got {}", content.repr()),
    }
}
