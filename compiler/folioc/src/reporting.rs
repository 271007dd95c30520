//! Rendering diagnostics with source excerpts.
//!
//! The sources a diagnostic points into are fetched from the world on
//! demand, so excerpts work for imported files and packages as well.

use std::io::Write;

use folio_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use folio_diagnostic::Diagnostic;
use folio_eval::World;
use rustc_hash::FxHashSet;

/// Emit `diagnostics` followed by an error/warning summary.
pub fn emit<W: Write>(world: &dyn World, emitter: &mut TerminalEmitter<W>, diagnostics: &[Diagnostic]) {
    let mut registered = FxHashSet::default();
    for label in diagnostics.iter().flat_map(|diag| &diag.labels) {
        let Some(id) = label.span.id() else {
            continue;
        };
        if registered.insert(id) {
            if let Ok(source) = world.source(id) {
                emitter.add_source(source);
            }
        }
    }

    emitter.emit_all(diagnostics);
    let errors = diagnostics.iter().filter(|diag| diag.is_error()).count();
    emitter.emit_summary(errors, diagnostics.len() - errors);
    emitter.flush();
}

/// Render diagnostics into a string without colors.
pub fn render(world: &dyn World, diagnostics: &[Diagnostic]) -> String {
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
    emit(world, &mut emitter, diagnostics);
    String::from_utf8_lossy(&emitter.into_inner()).into_owned()
}

/// Write diagnostics to stderr, colored when it is a terminal.
pub fn report(world: &dyn World, diagnostics: &[Diagnostic], mode: ColorMode) {
    let is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());
    let mut emitter = TerminalEmitter::stderr(mode, is_tty);
    emit(world, &mut emitter, diagnostics);
}

#[cfg(test)]
mod tests;
