//! The evaluator's view of the outside world.
//!
//! [`World`] is the capability set a host provides: the standard library,
//! parsed sources, raw files, the current date and package resolution. The
//! evaluator never touches the file system or the clock itself.
//!
//! [`Engine`] bundles a world with the per-run mutable state: the warning
//! [`Sink`], the inspection [`Tracer`], the configured [`Limits`], the
//! import route used for cycle detection, the closure call depth and the
//! recipe id counter. It is built with [`Engine::builder`].

use std::fmt;

use folio_diagnostic::{Diagnostic, ErrorCode};
use folio_ir::{FileId, PackageSpec, Source, Span};
use rustc_hash::FxHashSet;

use crate::errors::{
    cyclic_import, file_not_found, file_read_error, package_not_found, recursion_limit,
    warning, EvalError, SourceResult,
};
use crate::scope::Library;
use crate::styles::{RecipeId, StyleChain};
use crate::value::{Bytes, Datetime, Value};

/// Result of a world file operation.
pub type FileResult<T> = Result<T, FileError>;

/// Why a world could not provide a file.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum FileError {
    #[error("file not found (searched at {0})")]
    NotFound(String),
    #[error("package not found: {0}")]
    PackageNotFound(String),
    #[error("file is not valid utf-8")]
    InvalidUtf8,
    #[error("{0}")]
    Other(String),
}

impl FileError {
    /// Convert into an evaluation error about `id`.
    pub fn into_eval(self, id: FileId) -> EvalError {
        match self {
            FileError::NotFound(path) => file_not_found(path),
            FileError::PackageNotFound(spec) => package_not_found(spec),
            other => file_read_error(format!("{id:?}"), other.to_string()),
        }
    }
}

/// The capabilities evaluation needs from its host.
pub trait World {
    /// The standard library.
    fn library(&self) -> &Library;

    /// The file evaluation starts at.
    fn main(&self) -> FileId;

    /// A parsed source file.
    fn source(&self, id: FileId) -> FileResult<Source>;

    /// The raw bytes of a file.
    fn file(&self, id: FileId) -> FileResult<Bytes>;

    /// The current date, moved by `offset_days` days when given.
    fn today(&self, offset_days: Option<i32>) -> Option<Datetime>;

    /// The root of a package: `Ok` when the package is available.
    fn resolve_package(&self, spec: &PackageSpec) -> FileResult<FileId>;
}

/// Configurable evaluation limits.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Limits {
    /// Iterations a single `while` or `for` loop may run.
    pub max_iterations: usize,
    /// Nested show-rule applications during realization.
    pub max_show_depth: usize,
    /// Nested closure calls.
    pub max_call_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_iterations: 10_000,
            max_show_depth: 64,
            max_call_depth: 256,
        }
    }
}

/// Collects warnings, dropping exact repeats.
#[derive(Default)]
pub struct Sink {
    warnings: Vec<Diagnostic>,
    seen: FxHashSet<(Option<Span>, String)>,
}

impl Sink {
    pub fn new() -> Self {
        Sink::default()
    }

    /// Push a warning unless one with the same span and message exists.
    pub fn warn(&mut self, diag: Diagnostic) {
        let key = (diag.primary_span(), diag.message.clone());
        if !self.seen.insert(key) {
            return;
        }
        tracing::warn!(code = diag.code.as_str(), message = %diag.message, "evaluation warning");
        self.warnings.push(diag);
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Take the collected warnings, leaving the sink empty.
    pub fn take_warnings(&mut self) -> Vec<Diagnostic> {
        self.seen.clear();
        std::mem::take(&mut self.warnings)
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sink({} warnings)", self.warnings.len())
    }
}

/// Records the values produced at one inspected span.
#[derive(Clone, Default, Debug)]
pub struct Tracer {
    inspected: Option<Span>,
    values: Vec<Value>,
}

impl Tracer {
    pub fn new(inspected: Option<Span>) -> Self {
        Tracer {
            inspected,
            values: Vec::new(),
        }
    }

    pub fn inspected(&self) -> Option<Span> {
        self.inspected
    }

    /// Record a value if it was produced at the inspected span.
    pub fn value(&mut self, value: &Value, span: Span) {
        if self.inspected == Some(span) {
            self.values.push(value.clone());
        }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// Shared state of one evaluation run.
pub struct Engine<'a> {
    pub world: &'a dyn World,
    pub sink: Sink,
    pub tracer: Tracer,
    pub limits: Limits,
    /// Files currently being evaluated, outermost first.
    route: Vec<FileId>,
    call_depth: usize,
    /// The id the next show rule receives.
    next_recipe: u64,
}

impl<'a> Engine<'a> {
    /// Start configuring an engine.
    pub fn builder(world: &'a dyn World) -> EngineBuilder<'a> {
        EngineBuilder {
            world,
            limits: Limits::default(),
            inspect: None,
        }
    }

    /// An engine with default limits.
    pub fn new(world: &'a dyn World) -> Self {
        Engine::builder(world).build()
    }

    /// Push a warning.
    pub fn warn(&mut self, code: ErrorCode, span: Span, message: impl Into<String>) {
        self.sink.warn(warning(code, span, message));
    }

    /// Enter a file; fails if it is already being evaluated.
    pub fn enter_file(&mut self, id: FileId) -> SourceResult<()> {
        if self.route.contains(&id) {
            return Err(cyclic_import(format!("{id:?}")));
        }
        self.route.push(id);
        Ok(())
    }

    pub fn exit_file(&mut self) {
        self.route.pop();
    }

    /// The file evaluated innermost.
    pub fn current_file(&self) -> Option<FileId> {
        self.route.last().copied()
    }

    /// Enter a closure call, enforcing the call-depth limit.
    pub fn enter_call(&mut self) -> SourceResult<()> {
        if self.call_depth >= self.limits.max_call_depth {
            return Err(recursion_limit("function call", self.limits.max_call_depth));
        }
        self.call_depth += 1;
        Ok(())
    }

    pub fn exit_call(&mut self) {
        self.call_depth = self.call_depth.saturating_sub(1);
    }

    /// A recipe id unique within this engine's run.
    pub fn recipe_id(&mut self) -> RecipeId {
        let id = RecipeId::from_raw(self.next_recipe);
        self.next_recipe += 1;
        id
    }

    /// Resolve a path written in the file `span` points into.
    pub fn locate(&self, span: Span, path: &str) -> FileId {
        let base = span
            .id()
            .or_else(|| self.current_file())
            .unwrap_or_else(|| self.world.main());
        base.join(path)
    }

    /// Load a file's bytes through the world.
    pub fn load(&self, id: FileId) -> SourceResult<Bytes> {
        self.world.file(id).map_err(|err| err.into_eval(id))
    }
}

impl fmt::Debug for Engine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("sink", &self.sink)
            .field("limits", &self.limits)
            .field("route", &self.route)
            .field("call_depth", &self.call_depth)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Engine`].
pub struct EngineBuilder<'a> {
    world: &'a dyn World,
    limits: Limits,
    inspect: Option<Span>,
}

impl<'a> EngineBuilder<'a> {
    #[must_use]
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Record every value produced at `span`.
    #[must_use]
    pub fn inspect(mut self, span: Option<Span>) -> Self {
        self.inspect = span;
        self
    }

    pub fn build(self) -> Engine<'a> {
        Engine {
            world: self.world,
            sink: Sink::new(),
            tracer: Tracer::new(self.inspect),
            limits: self.limits,
            route: Vec::new(),
            call_depth: 0,
            next_recipe: 0,
        }
    }
}

/// What is known about the surroundings of an evaluation.
///
/// Inside `context` expressions and show-rule transformations the style
/// chain is known; everywhere else it is not.
#[derive(Clone, Default, Debug)]
pub struct Context {
    styles: Option<StyleChain>,
}

impl Context {
    pub fn new(styles: Option<StyleChain>) -> Self {
        Context { styles }
    }

    /// A context without style knowledge.
    pub fn none() -> Self {
        Context::default()
    }

    /// The active style chain.
    pub fn styles(&self) -> SourceResult<&StyleChain> {
        self.styles.as_ref().ok_or_else(|| {
            EvalError::new("can only be used when context is known")
                .with_hint("try wrapping this in a `context` expression")
        })
    }
}

#[cfg(test)]
mod tests;
