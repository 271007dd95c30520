//! Test fixtures: a world backed by the real library and in-memory files.

use folio_eval::errors::{EvalError, EvalErrorKind, SourceResult};
use folio_eval::value::{Bytes, Datetime, Value};
use folio_eval::{Context, Engine, FileError, FileResult, Library, Scopes, Vm, World};
use folio_ir::{FileId, PackageSpec, Source, VirtualPath};

pub(crate) struct TestWorld {
    library: Library,
    main: FileId,
    files: Vec<(FileId, Vec<u8>)>,
}

impl TestWorld {
    pub(crate) fn new() -> Self {
        TestWorld {
            library: crate::library(),
            main: FileId::new(None, VirtualPath::new("/main.fol")),
            files: Vec::new(),
        }
    }

    pub(crate) fn with_file(mut self, path: &str, data: impl AsRef<[u8]>) -> Self {
        let id = FileId::new(None, VirtualPath::new(path));
        self.files.push((id, data.as_ref().to_vec()));
        self
    }

    fn get(&self, id: FileId) -> FileResult<&[u8]> {
        self.files
            .iter()
            .find(|(file, _)| *file == id)
            .map(|(_, data)| data.as_slice())
            .ok_or_else(|| FileError::NotFound(id.vpath().to_string()))
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
        let data = self.get(id)?;
        let text = std::str::from_utf8(data).map_err(|_| FileError::InvalidUtf8)?;
        Ok(folio_parse::parse(text, id))
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        self.get(id).map(Bytes::from)
    }

    fn today(&self, offset_days: Option<i32>) -> Option<Datetime> {
        Datetime::from_ymd(2024, 5, 17)?.shift_days(offset_days.unwrap_or(0))
    }

    fn resolve_package(&self, spec: &PackageSpec) -> FileResult<FileId> {
        Err(FileError::PackageNotFound(spec.to_string()))
    }
}

/// Evaluate a code snippet against the standard library.
pub(crate) fn eval(text: &str) -> SourceResult<Value> {
    eval_in(&TestWorld::new(), text)
}

/// Evaluate a code snippet as if it were written in the world's main file.
pub(crate) fn eval_in(world: &TestWorld, text: &str) -> SourceResult<Value> {
    let source = folio_parse::parse_code(text, world.main());
    if let Some(error) = source.errors().first() {
        return Err(EvalError::new(error.message.clone()).with_span(error.span));
    }
    let mut engine = Engine::new(world);
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

/// The kind of the error a snippet fails with.
pub(crate) fn error_kind(text: &str) -> Option<EvalErrorKind> {
    eval(text).err().map(|error| error.kind)
}
