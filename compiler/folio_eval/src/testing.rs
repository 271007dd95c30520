//! Shared fixtures for unit tests: an in-memory world with a small library
//! and helpers that parse, evaluate and realize snippets.

use folio_diagnostic::Diagnostic;
use folio_ir::{FileId, PackageSpec, Source, VirtualPath};
use rustc_hash::FxHashMap;

use crate::content::{Content, ElemKind};
use crate::engine::{Context, Engine, FileError, FileResult, World};
use crate::errors::{EvalError, SourceResult};
use crate::func::Func;
use crate::scope::{Library, Module, Scope, Scopes};
use crate::styles::StyleChain;
use crate::value::{Bytes, Datetime, Symbol, Type, Value};
use crate::vm::Vm;

/// A world holding its files in memory.
pub(crate) struct TestWorld {
    library: Library,
    main: FileId,
    files: FxHashMap<FileId, String>,
}

impl TestWorld {
    pub(crate) fn new(main: &str) -> Self {
        let id = FileId::new(None, VirtualPath::new("/main.fol"));
        let mut files = FxHashMap::default();
        files.insert(id, main.to_string());
        TestWorld {
            library: library(),
            main: id,
            files,
        }
    }

    /// Add a project file.
    pub(crate) fn with_file(mut self, path: &str, text: &str) -> Self {
        self.files
            .insert(FileId::new(None, VirtualPath::new(path)), text.to_string());
        self
    }

    /// Add a file to a package, e.g. `("@preview/demo:0.1.0", "/lib.fol", ..)`.
    pub(crate) fn with_package_file(mut self, spec: &str, path: &str, text: &str) -> Self {
        if let Ok(spec) = spec.parse::<PackageSpec>() {
            self.files
                .insert(FileId::new(Some(spec), VirtualPath::new(path)), text.to_string());
        }
        self
    }
}

impl World for TestWorld {
    fn library(&self) -> &Library {
        &self.library
    }

    fn main(&self) -> FileId {
        self.main
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        match self.files.get(&id) {
            Some(text) => Ok(folio_parse::parse(text, id)),
            None => Err(FileError::NotFound(id.vpath().to_string())),
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        match self.files.get(&id) {
            Some(text) => Ok(Bytes::from(text.as_bytes())),
            None => Err(FileError::NotFound(id.vpath().to_string())),
        }
    }

    fn today(&self, offset_days: Option<i32>) -> Option<Datetime> {
        Datetime::from_ymd(2024, 5, 17)?.shift_days(offset_days.unwrap_or(0))
    }

    fn resolve_package(&self, spec: &PackageSpec) -> FileResult<FileId> {
        if self.files.keys().any(|id| id.package() == Some(spec)) {
            Ok(FileId::new(Some(spec.clone()), VirtualPath::new("/")))
        } else {
            Err(FileError::PackageNotFound(spec.to_string()))
        }
    }
}

/// Element functions and types, plus one math symbol.
pub(crate) fn library() -> Library {
    let mut global = Scope::new();
    for &kind in ElemKind::ALL {
        if kind.name().contains('.') || matches!(kind, ElemKind::Styled | ElemKind::Context) {
            continue;
        }
        global.define(kind.name(), Value::Func(Func::Native(kind.func())));
    }
    for &ty in Type::ALL {
        global.define(ty.name(), Value::Type(ty));
    }

    let mut math = Scope::new();
    math.define("alpha", Value::Symbol(Symbol::single('α')));

    Library {
        global: Module::new("global", global),
        math: Module::new("math", math),
    }
}

/// Evaluate the main file of a world, returning the module and warnings.
pub(crate) fn eval_world(world: &TestWorld) -> (SourceResult<Module>, Vec<Diagnostic>) {
    let mut engine = Engine::new(world);
    let result = world
        .source(world.main())
        .map_err(|err| err.into_eval(world.main()))
        .and_then(|source| crate::eval(&mut engine, &source));
    (result, engine.sink.take_warnings())
}

/// Evaluate markup into content.
pub(crate) fn eval_markup(text: &str) -> SourceResult<Content> {
    let world = TestWorld::new(text);
    eval_world(&world).0.map(|module| module.content().clone())
}

/// Evaluate markup, returning the warnings as well.
pub(crate) fn eval_markup_warnings(text: &str) -> (SourceResult<Content>, Vec<Diagnostic>) {
    let world = TestWorld::new(text);
    let (result, warnings) = eval_world(&world);
    (result.map(|module| module.content().clone()), warnings)
}

/// Evaluate and realize markup under an empty style chain.
pub(crate) fn realize_markup(text: &str) -> SourceResult<Content> {
    let world = TestWorld::new(text);
    let mut engine = Engine::new(&world);
    let source = folio_parse::parse(text, world.main());
    let module = crate::eval(&mut engine, &source)?;
    crate::realize(&mut engine, module.content(), &StyleChain::new())
}

/// Evaluate a code snippet to its value.
pub(crate) fn eval_code(text: &str) -> SourceResult<Value> {
    let world = TestWorld::new("");
    let source = folio_parse::parse_code(text, world.main());
    if let Some(error) = source.errors().first() {
        return Err(EvalError::new(error.message.clone()).with_span(error.span));
    }
    let mut engine = Engine::new(&world);
    let context = Context::none();
    let scopes = Scopes::new(Some(world.library()));
    let mut vm = Vm::new(
        &mut engine,
        &context,
        scopes,
        source.arena().clone(),
        Some(source.id()),
    );
    vm.eval(source.root())
}
