//! Folio Eval - evaluator and realization engine for the Folio typesetting
//! language.
//!
//! Evaluation turns a parsed [`Source`] into a [`Module`]: the bindings the
//! file defines plus the content it produces. Realization then drives the
//! show rules of that content to a fixpoint under a style chain.
//!
//! # Architecture
//!
//! - `value`: the dynamic value model and its casts
//! - `content`: the flat content tree and element kinds
//! - `scope` / `capture`: bindings, scope stacks and closure capture
//! - `args` / `func`: the argument protocol and callables
//! - `ops` / `methods`: operators, fields and methods
//! - `vm`: the tree-walking evaluator for markup, code and math
//! - `styles` / `realize`: set rules, show rules and realization
//! - `engine`: the host `World`, warnings, tracing and limits
//! - `errors`: the error taxonomy

pub mod args;
pub mod capture;
pub mod content;
pub mod engine;
pub mod errors;
pub mod func;
pub mod methods;
pub mod ops;
pub mod realize;
pub mod scope;
pub mod styles;
pub mod value;
pub mod vm;

#[cfg(test)]
pub(crate) mod testing;

use folio_ir::Source;

pub use args::{Arg, Args};
pub use content::{Content, Elem, ElemKind};
pub use engine::{Context, Engine, FileError, FileResult, Limits, Sink, Tracer, World};
pub use errors::{At, EvalError, EvalErrorKind, SourceResult};
pub use func::{Func, NativeFunc, ParamInfo};
pub use realize::realize;
pub use scope::{Binding, Library, Module, Scope, Scopes};
pub use styles::{Recipe, Selector, SetRule, StyleChain, Styles, Transformation};
pub use value::{FromValue, Type, Value};
pub use vm::Vm;

/// Evaluate a source file into a module.
///
/// The first syntax error of the source aborts evaluation. A `break`,
/// `continue` or `return` that reaches the top level is an error.
#[tracing::instrument(level = "debug", skip_all, fields(file = ?source.id()))]
pub fn eval(engine: &mut Engine, source: &Source) -> SourceResult<Module> {
    if let Some(error) = source.errors().first() {
        let mut eval_error = EvalError::new(error.message.clone()).with_span(error.span);
        for hint in &error.hints {
            eval_error = eval_error.with_hint(hint.clone());
        }
        return Err(eval_error);
    }

    let id = source.id();
    engine.enter_file(id)?;
    let result = eval_file_body(engine, source);
    engine.exit_file();
    result
}

fn eval_file_body(engine: &mut Engine, source: &Source) -> SourceResult<Module> {
    let world = engine.world;
    let context = Context::none();
    let scopes = Scopes::new(Some(world.library()));
    let mut vm = Vm::new(engine, &context, scopes, source.arena().clone(), Some(source.id()));

    let output = vm.eval(source.root())?;
    if let Some(event) = vm.flow.take() {
        return Err(event.forbidden());
    }

    let name = source.id().vpath().file_stem().unwrap_or("main").to_string();
    let scope = vm.into_scopes().top;
    tracing::debug!(module = %name, bindings = scope.len(), "evaluated module");
    Ok(Module::new(name, scope).with_content(output.display()))
}
