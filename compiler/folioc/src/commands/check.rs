//! The `check` command: compile a file and only report diagnostics.

use super::{open_world, report_or_exit, CliOptions};
use crate::compile;

/// Compile a file, reporting every diagnostic.
pub fn check_file(path: &str, options: &CliOptions) {
    let world = open_world(path, options);
    let warnings = match compile(&world, &options.compile) {
        Ok(compiled) => compiled.warnings,
        Err(diagnostics) => {
            report_or_exit(&world, &diagnostics, options.color);
            std::process::exit(1);
        }
    };
    report_or_exit(&world, &warnings, options.color);
    match warnings.len() {
        0 => println!("OK: {path}"),
        1 => println!("OK: {path} (1 warning)"),
        n => println!("OK: {path} ({n} warnings)"),
    }
}
