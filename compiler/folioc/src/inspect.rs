//! Locating expressions by position, for value inspection.

use folio_ir::visitor::{walk_expr, Visitor};
use folio_ir::{ExprArena, ExprId, Source, Span};

/// The span of the innermost expression covering a zero-based line and
/// column (in characters).
pub fn expr_at(source: &Source, line: usize, column: usize) -> Option<Span> {
    let offset = offset_of(source.text(), line, column)?;
    let mut finder = Innermost { offset, best: None };
    finder.visit_expr(source.root(), source.arena());
    finder.best
}

/// The byte offset of a zero-based line and character column.
fn offset_of(text: &str, line: usize, column: usize) -> Option<u32> {
    let start = match line {
        0 => 0,
        n => text.match_indices('\n').nth(n - 1).map(|(i, _)| i + 1)?,
    };
    let rest = text.get(start..)?;
    let within = rest
        .char_indices()
        .take_while(|&(_, c)| c != '\n')
        .nth(column)
        .map(|(i, _)| i)?;
    u32::try_from(start + within).ok()
}

struct Innermost {
    offset: u32,
    best: Option<Span>,
}

impl Visitor for Innermost {
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
        let span = arena.span(id);
        if !span.contains(self.offset) {
            return;
        }
        if self.best.map_or(true, |best| span.len() <= best.len()) {
            self.best = Some(span);
        }
        walk_expr(self, id, arena);
    }
}

#[cfg(test)]
mod tests;
