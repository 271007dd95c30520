use folio_diagnostic::ErrorCode;
use folio_ir::{FileId, PackageSpec, Source, Span, VirtualPath};
use pretty_assertions::assert_eq;

use super::*;
use crate::errors::EvalErrorKind;
use crate::scope::{Module, Scope};

struct EmptyWorld {
    library: Library,
}

impl EmptyWorld {
    fn new() -> Self {
        EmptyWorld {
            library: Library {
                global: Module::new("global", Scope::new()),
                math: Module::new("math", Scope::new()),
            },
        }
    }
}

impl World for EmptyWorld {
    fn library(&self) -> &Library {
        &self.library
    }

    fn main(&self) -> FileId {
        FileId::new(None, VirtualPath::new("/main.fol"))
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        Err(FileError::NotFound(format!("{id:?}")))
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(format!("{id:?}")))
    }

    fn today(&self, offset_days: Option<i32>) -> Option<Datetime> {
        Datetime::from_ymd(2024, 5, 17)?.shift_days(offset_days.unwrap_or(0))
    }

    fn resolve_package(&self, spec: &PackageSpec) -> FileResult<FileId> {
        Err(FileError::PackageNotFound(spec.to_string()))
    }
}

fn span(start: u32) -> Span {
    Span::new(FileId::new(None, VirtualPath::new("/main.fol")), start, start + 1)
}

#[test]
fn default_limits() {
    let limits = Limits::default();
    assert_eq!(limits.max_iterations, 10_000);
    assert_eq!(limits.max_show_depth, 64);
    assert_eq!(limits.max_call_depth, 256);
}

#[test]
fn sink_drops_repeated_warnings() {
    let world = EmptyWorld::new();
    let mut engine = Engine::new(&world);
    engine.warn(ErrorCode::W6003, span(1), "label `<a>` is not attached to anything");
    engine.warn(ErrorCode::W6003, span(1), "label `<a>` is not attached to anything");
    engine.warn(ErrorCode::W6003, span(2), "label `<a>` is not attached to anything");
    assert_eq!(engine.sink.warnings().len(), 2);
    assert_eq!(engine.sink.take_warnings().len(), 2);
    assert!(engine.sink.warnings().is_empty());
}

#[test]
fn tracer_only_records_inspected_span() {
    let world = EmptyWorld::new();
    let mut engine = Engine::builder(&world).inspect(Some(span(4))).build();
    engine.tracer.value(&Value::Int(1), span(3));
    engine.tracer.value(&Value::Int(2), span(4));
    engine.tracer.value(&Value::Int(3), span(4));
    assert_eq!(engine.tracer.values(), &[Value::Int(2), Value::Int(3)]);
}

#[test]
fn recipe_ids_count_per_engine() {
    let world = EmptyWorld::new();
    let mut first = Engine::new(&world);
    let mut second = Engine::new(&world);
    let a = first.recipe_id();
    let b = first.recipe_id();
    assert_ne!(a, b);
    assert_eq!(second.recipe_id(), a);
}

#[test]
fn cyclic_files_are_rejected() {
    let world = EmptyWorld::new();
    let mut engine = Engine::new(&world);
    let main = world.main();
    assert!(engine.enter_file(main).is_ok());
    let again = engine.enter_file(main);
    assert!(matches!(
        again.err().map(|e| e.kind),
        Some(EvalErrorKind::CyclicImport { .. })
    ));
    engine.exit_file();
    assert_eq!(engine.current_file(), None);
}

#[test]
fn call_depth_is_limited() {
    let world = EmptyWorld::new();
    let limits = Limits {
        max_call_depth: 2,
        ..Limits::default()
    };
    let mut engine = Engine::builder(&world).limits(limits).build();
    assert!(engine.enter_call().is_ok());
    assert!(engine.enter_call().is_ok());
    let err = engine.enter_call().err();
    assert_eq!(
        err.map(|e| e.message),
        Some("maximum function call depth exceeded (2)".to_string())
    );
    engine.exit_call();
    assert!(engine.enter_call().is_ok());
}

#[test]
fn locate_resolves_against_the_span_file() {
    let world = EmptyWorld::new();
    let engine = Engine::new(&world);
    let id = engine.locate(span(0), "data/values.json");
    assert_eq!(id.vpath().as_rootless_str(), "data/values.json");
    let detached = engine.locate(Span::detached(), "/other.fol");
    assert_eq!(detached.vpath().as_rootless_str(), "other.fol");
}

#[test]
fn context_without_styles_is_an_error() {
    let context = Context::none();
    let err = context.styles().err();
    assert_eq!(
        err.as_ref().map(|e| e.message.as_str()),
        Some("can only be used when context is known")
    );
    assert_eq!(err.map(|e| e.hints.len()), Some(1));
    assert!(Context::new(Some(StyleChain::new())).styles().is_ok());
}

#[test]
fn file_errors_map_to_eval_errors() {
    let id = FileId::new(None, VirtualPath::new("/x.json"));
    let err = FileError::NotFound("/x.json".into()).into_eval(id);
    assert!(matches!(err.kind, EvalErrorKind::FileNotFound { .. }));
    let err = FileError::InvalidUtf8.into_eval(id);
    assert!(matches!(err.kind, EvalErrorKind::FileReadError { .. }));
}
