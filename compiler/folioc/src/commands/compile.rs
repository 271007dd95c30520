//! The `compile` command: evaluate and realize a file, print its content.

use super::{open_world, report_or_exit, CliOptions};
use crate::compile;

/// How realized content is printed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// The element tree, e.g. `strong(body: [a])`.
    #[default]
    Tree,
    /// Only the text.
    Plain,
}

/// Compile a file and print the realized content to stdout.
pub fn compile_file(path: &str, options: &CliOptions, format: OutputFormat) {
    let world = open_world(path, options);
    match compile(&world, &options.compile) {
        Ok(compiled) => {
            report_or_exit(&world, &compiled.warnings, options.color);
            match format {
                OutputFormat::Tree => println!("{}", compiled.content.repr()),
                OutputFormat::Plain => println!("{}", compiled.content.plain_text()),
            }
        }
        Err(diagnostics) => {
            report_or_exit(&world, &diagnostics, options.color);
            std::process::exit(1);
        }
    }
}
