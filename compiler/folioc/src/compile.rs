//! The compile pipeline: parse, evaluate and realize the main file.

use folio_diagnostic::queue::{DiagnosticConfig, DiagnosticQueue};
use folio_diagnostic::{Diagnostic, Severity};
use folio_eval::{Content, Engine, Limits, StyleChain, Value, World};
use folio_ir::Span;

/// How a document is compiled.
#[derive(Clone, Debug, Default)]
pub struct CompileOptions {
    /// Loop, show-rule and call limits.
    pub limits: Limits,
    /// Record every value produced by the expression at this span.
    pub inspect: Option<Span>,
    /// Fail the compilation if any warning is emitted.
    pub deny_warnings: bool,
}

/// A successfully compiled document.
#[derive(Clone, Debug)]
pub struct Compiled {
    /// The realized content of the main file.
    pub content: Content,
    /// Warnings emitted along the way, sorted by position.
    pub warnings: Vec<Diagnostic>,
    /// Values recorded for [`CompileOptions::inspect`].
    pub traced: Vec<Value>,
}

/// Compile the main file of `world`.
///
/// On failure, returns every diagnostic: all syntax errors of the main file,
/// or the evaluation error together with the warnings emitted before it.
#[tracing::instrument(level = "debug", skip_all, fields(main = ?world.main()))]
pub fn compile(world: &dyn World, options: &CompileOptions) -> Result<Compiled, Vec<Diagnostic>> {
    let main = world.main();
    let source = world
        .source(main)
        .map_err(|err| vec![err.into_eval(main).to_diagnostic()])?;

    if !source.errors().is_empty() {
        tracing::debug!(errors = source.errors().len(), "main file has syntax errors");
        let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
        queue.extend(source.errors().iter().map(folio_parse::to_diagnostic));
        return Err(queue.flush());
    }

    let mut engine = Engine::builder(world)
        .limits(options.limits)
        .inspect(options.inspect)
        .build();
    let result = folio_eval::eval(&mut engine, &source)
        .and_then(|module| folio_eval::realize(&mut engine, module.content(), &StyleChain::new()));

    let mut queue = DiagnosticQueue::new();
    queue.extend(engine.sink.take_warnings());
    let content = match result {
        Ok(content) => content,
        Err(error) => {
            tracing::debug!(error = %error, "compilation failed");
            queue.add(error.to_diagnostic());
            return Err(queue.flush());
        }
    };

    let warnings = queue.flush();
    if options.deny_warnings && !warnings.is_empty() {
        return Err(warnings.into_iter().map(deny).collect());
    }

    tracing::debug!(elems = content.len(), warnings = warnings.len(), "compiled");
    Ok(Compiled {
        content,
        warnings,
        traced: engine.tracer.values().to_vec(),
    })
}

/// Promote a warning to an error.
fn deny(warning: Diagnostic) -> Diagnostic {
    Diagnostic {
        severity: Severity::Error,
        ..warning
    }
    .with_note("warnings are denied for this compilation")
}
