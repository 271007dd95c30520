//! Command handlers for the `folio` CLI.
//!
//! Each submodule implements one command. Option parsing and world setup
//! shared between them live here.

use std::path::{Path, PathBuf};

use folio_diagnostic::emitter::ColorMode;
use folio_diagnostic::Diagnostic;

use crate::{reporting, CompileOptions, SystemWorld};

mod check;
mod compile;
mod inspect;

pub use check::check_file;
pub use compile::{compile_file, OutputFormat};
pub use inspect::inspect_file;

/// Options shared by every command that compiles a file.
#[derive(Clone, Debug, Default)]
pub struct CliOptions {
    pub compile: CompileOptions,
    pub color: ColorMode,
    /// Project root; defaults to the directory of the main file.
    pub root: Option<PathBuf>,
    /// Local package store; defaults to `FOLIO_PACKAGE_PATH`.
    pub package_path: Option<PathBuf>,
}

impl CliOptions {
    /// Apply one flag. Returns `false` for flags this type does not know.
    pub fn apply(&mut self, arg: &str) -> Result<bool, String> {
        if arg == "--deny-warnings" {
            self.compile.deny_warnings = true;
        } else if let Some(mode) = arg.strip_prefix("--color=") {
            self.color = match mode {
                "auto" => ColorMode::Auto,
                "always" => ColorMode::Always,
                "never" => ColorMode::Never,
                other => return Err(format!("unknown color mode '{other}'")),
            };
        } else if let Some(root) = arg.strip_prefix("--root=") {
            self.root = Some(PathBuf::from(root));
        } else if let Some(path) = arg.strip_prefix("--package-path=") {
            self.package_path = Some(PathBuf::from(path));
        } else if let Some(limit) = arg.strip_prefix("--max-iterations=") {
            self.compile.limits.max_iterations = parse_limit(limit)?;
        } else if let Some(limit) = arg.strip_prefix("--max-show-depth=") {
            self.compile.limits.max_show_depth = parse_limit(limit)?;
        } else if let Some(limit) = arg.strip_prefix("--max-call-depth=") {
            self.compile.limits.max_call_depth = parse_limit(limit)?;
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}

fn parse_limit(text: &str) -> Result<usize, String> {
    text.parse()
        .map_err(|_| format!("'{text}' is not a valid limit"))
}

/// Build the world for a main file.
pub(crate) fn open_world(path: &str, options: &CliOptions) -> SystemWorld {
    let path = Path::new(path);
    let world = match &options.root {
        Some(root) => {
            let main = path.strip_prefix(root).unwrap_or(path);
            SystemWorld::new(root, &main.to_string_lossy())
        }
        None => SystemWorld::for_file(path),
    };
    let store = options
        .package_path
        .clone()
        .or_else(|| std::env::var_os("FOLIO_PACKAGE_PATH").map(PathBuf::from));
    match store {
        Some(store) => world.with_package_store(store),
        None => world,
    }
}

/// Report diagnostics and exit when any of them is an error.
pub(crate) fn report_or_exit(world: &SystemWorld, diagnostics: &[Diagnostic], color: ColorMode) {
    if diagnostics.is_empty() {
        return;
    }
    reporting::report(world, diagnostics, color);
    if diagnostics.iter().any(Diagnostic::is_error) {
        std::process::exit(1);
    }
}
