//! End-to-end pipeline tests.
//!
//! Every test compiles a document through [`folioc::compile`] against an
//! in-memory world: parse, evaluate, realize.
//!
//! # Organization
//!
//! - `scenarios` - whole documents and the content they realize to
//! - `packages` - imports from files and packages
//! - `options` - limits, inspection and denied warnings
//! - `laws` - properties that hold for every document
//! - `common` - shared helpers
//!
//! ```bash
//! cargo test -p folioc --test pipeline
//! ```

#[path = "pipeline/common.rs"]
mod common;

#[path = "pipeline/scenarios.rs"]
mod scenarios;

#[path = "pipeline/packages.rs"]
mod packages;

#[path = "pipeline/options.rs"]
mod options;

#[path = "pipeline/laws.rs"]
mod laws;
