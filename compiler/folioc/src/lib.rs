//! Folio Compiler Driver
//!
//! Ties the phases together for hosts and the `folio` binary:
//!
//! ```text
//! World::source(main)
//!     │
//!     ▼
//! folio_parse ──► Source (syntax errors stop here)
//!     │
//!     ▼
//! folio_eval::eval ──► Module (bindings + content)
//!     │
//!     ▼
//! folio_eval::realize ──► realized Content + warnings
//! ```
//!
//! Two worlds are provided: [`MemoryWorld`] keeps every file in memory and
//! is what tests and embedders use; [`SystemWorld`] reads a project
//! directory and a local package store.

use std::sync::Once;

pub mod commands;
mod compile;
pub mod inspect;
pub mod reporting;
mod world;

pub use compile::{compile, CompileOptions, Compiled};
pub use world::{MemoryWorld, SystemWorld};

static TRACING_INIT: Once = Once::new();

/// Install a stderr subscriber filtered by `FOLIO_LOG` (or `RUST_LOG`).
///
/// Safe to call more than once. Does nothing when neither variable is set,
/// e.g. `FOLIO_LOG=folio_eval=debug folio compile main.fol`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let Some(directives) = ["FOLIO_LOG", "RUST_LOG"]
            .iter()
            .find_map(|var| std::env::var(var).ok())
        else {
            return;
        };
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::new(directives))
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .try_init();
    });
}
