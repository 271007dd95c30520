//! The `inspect` command: show the values an expression evaluates to.

use folio_eval::World;

use super::{open_world, report_or_exit, CliOptions};
use crate::compile;
use crate::inspect::expr_at;

/// Print every value produced by the expression at a one-based
/// `line:column` position of the main file.
pub fn inspect_file(path: &str, position: &str, options: &CliOptions) {
    let Some((line, column)) = parse_position(position) else {
        eprintln!("error: invalid position '{position}', expected <line>:<column>");
        std::process::exit(1);
    };

    let world = open_world(path, options);
    let source = match world.source(world.main()) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };
    let Some(span) = expr_at(&source, line - 1, column - 1) else {
        eprintln!("error: no expression at {path}:{line}:{column}");
        std::process::exit(1);
    };

    let mut compile_options = options.compile.clone();
    compile_options.inspect = Some(span);
    let compiled = match compile(&world, &compile_options) {
        Ok(compiled) => compiled,
        Err(diagnostics) => {
            report_or_exit(&world, &diagnostics, options.color);
            std::process::exit(1);
        }
    };

    let text = source.get(span).unwrap_or_default();
    if compiled.traced.is_empty() {
        println!("`{text}` was never evaluated");
    }
    for value in &compiled.traced {
        println!("`{text}` = {}", value.repr());
    }
}

/// Parse a one-based `line:column`.
pub(super) fn parse_position(text: &str) -> Option<(usize, usize)> {
    let (line, column) = text.split_once(':')?;
    let line: usize = line.parse().ok()?;
    let column: usize = column.parse().ok()?;
    (line > 0 && column > 0).then_some((line, column))
}
