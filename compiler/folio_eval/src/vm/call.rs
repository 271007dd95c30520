//! Field access, calls, arguments and closures.

use std::sync::Arc;

use folio_diagnostic::ErrorCode;
use folio_ir::{Arg as ArgNode, ArgRange, ClosureId, ExprArena, ExprId, ExprKind, Name, Param, PatternKind, Span};
use folio_stack::ensure_sufficient_stack;

use super::{FlowEvent, Vm};
use crate::args::Args;
use crate::capture::CapturesVisitor;
use crate::content::Content;
use crate::engine::{Context, Engine};
use crate::errors::{not_callable, unknown_method, At, EvalError, SourceResult, Trace, Tracepoint};
use crate::func::{Closure, ClosureNode, Func};
use crate::methods;
use crate::scope::{Binding, Capturer, Scopes};
use crate::value::Value;

impl Vm<'_, '_> {
    /// `target.field`.
    ///
    /// On an element function, a settable field reads the active style
    /// chain: `text.fill` needs a known context.
    pub(super) fn eval_field_access(&mut self, target: ExprId, field: Name, span: Span) -> SourceResult<Value> {
        let value = self.eval(target)?;
        if let Value::Func(func) = &value {
            if let Some(kind) = func.element() {
                if let Some(param) = kind.param(field.as_str()).filter(|param| param.settable) {
                    let styles = self.context.styles().at(span)?;
                    return Ok(styles
                        .get(kind, param.name)
                        .or_else(|| param.default_value())
                        .unwrap_or(Value::None));
                }
            }
        }
        methods::field(&value, field.as_str()).at(span)
    }

    pub(super) fn eval_call(&mut self, callee: ExprId, args: ArgRange, span: Span) -> SourceResult<Value> {
        if let ExprKind::FieldAccess { target, field } = self.arena.kind(callee) {
            if methods::is_mutating(field.as_str()) && is_place(&self.arena, target) {
                let args = self.eval_args(args, span)?;
                let place = self.access(target)?;
                if matches!(place, Value::Array(_) | Value::Dict(_)) {
                    return methods::call_mut(place, field.as_str(), args, span);
                }
                let receiver = place.clone();
                return self.call_field(receiver, field, args, span);
            }
            if !is_math_callee(&self.arena, callee) {
                let receiver = self.eval(target)?;
                let args = self.eval_args(args, span)?;
                return self.call_field(receiver, field, args, span);
            }
        }

        let func = self.eval(callee)?;
        let args = self.eval_args(args, span)?;
        if is_math_callee(&self.arena, callee) && !matches!(func, Value::Func(_) | Value::Type(_)) {
            return Ok(Value::Content(math_call_fallback(func, args)));
        }
        self.call_value(func, args, span)
    }

    /// `receiver.name(args)`: a method, or a function stored in a module,
    /// type or function scope.
    fn call_field(&mut self, receiver: Value, field: Name, args: Args, span: Span) -> SourceResult<Value> {
        let name = field.as_str();
        match &receiver {
            Value::Module(_) | Value::Type(_) => {
                let callee = methods::field(&receiver, name).at(span)?;
                return self.call_value(callee, args, span);
            }
            Value::Func(_) if !methods::has_method(&receiver, name) => {
                let callee = methods::field(&receiver, name).at(span)?;
                return self.call_value(callee, args, span);
            }
            Value::Dict(dict) if !methods::has_method(&receiver, name) => {
                if matches!(dict.get(name), Some(Value::Func(_))) {
                    return Err(unknown_method("dictionary", name).with_span(span).with_hint(
                        "to call the function stored in the dictionary, surround the field access with parentheses, e.g. `(dict.f)(..)`",
                    ));
                }
            }
            _ => {}
        }
        methods::call(self.engine, self.context, receiver, name, args)
    }

    /// Call a function or type value.
    pub(super) fn call_value(&mut self, callee: Value, args: Args, span: Span) -> SourceResult<Value> {
        match callee {
            Value::Func(func) => func
                .call(self.engine, self.context, args)
                .trace(|| Tracepoint::Call(func.name().map(str::to_string)), span),
            Value::Type(ty) => ty.construct(args).at(span),
            other => Err(not_callable(other.ty().long_name()).with_span(span)),
        }
    }

    /// Evaluate call arguments, resolving spreads.
    pub(super) fn eval_args(&mut self, range: ArgRange, span: Span) -> SourceResult<Args> {
        let arena = self.arena.clone();
        let mut args = Args::new(span);
        for arg in arena.args(range) {
            match *arg {
                ArgNode::Pos(expr) => {
                    let value = self.eval(expr)?;
                    args.push(arena.span(expr), value);
                }
                ArgNode::Named { name, expr, span } => {
                    let value = self.eval(expr)?;
                    args.push_named(name, span, value);
                }
                ArgNode::Spread { expr, span } => match self.eval(expr)? {
                    Value::None => {}
                    Value::Array(array) => {
                        for value in array {
                            args.push(span, value);
                        }
                    }
                    Value::Dict(dict) => {
                        for (key, value) in dict {
                            args.push_named(key, span, value);
                        }
                    }
                    Value::Args(spread) => args.items.extend(spread.items),
                    other => {
                        return Err(EvalError::new(format!(
                            "cannot spread {}",
                            other.ty().long_name()
                        ))
                        .with_span(span))
                    }
                },
            }
        }
        Ok(args)
    }

    /// Create a closure value: evaluate defaults now, capture free locals.
    pub(super) fn eval_closure(&mut self, id: ClosureId) -> SourceResult<Value> {
        let arena = self.arena.clone();
        let def = *arena.closure(id);

        let mut defaults = Vec::new();
        for param in arena.params(def.params) {
            if let Param::Named { default, .. } = *param {
                defaults.push(self.eval(default)?);
            }
        }

        let captured = {
            let mut visitor = CapturesVisitor::new(Some(&self.scopes), Capturer::Function);
            visitor.visit_closure_def(id, &arena);
            visitor.finish()
        };

        let closure = Closure {
            node: ClosureNode::Func(id),
            arena,
            file: self.file,
            captured,
            defaults,
            name: def.name,
        };
        Ok(Value::Func(Func::Closure(Arc::new(closure))))
    }
}

/// Call a user-defined function.
pub fn call_closure(
    func: &Func,
    closure: &Closure,
    engine: &mut Engine,
    context: &Context,
    args: Args,
) -> SourceResult<Value> {
    engine.enter_call().at(args.span)?;
    let result = ensure_sufficient_stack(|| run_closure(func, closure, engine, context, args));
    engine.exit_call();
    result
}

fn run_closure(
    func: &Func,
    closure: &Closure,
    engine: &mut Engine,
    context: &Context,
    mut args: Args,
) -> SourceResult<Value> {
    let world = engine.world;
    let mut scopes = Scopes::new(Some(world.library()));
    scopes.top = closure.captured.clone();
    if let (ClosureNode::Func(id), Some(name)) = (closure.node, closure.name) {
        let binding = Binding::new(Value::Func(func.clone()), closure.arena.closure(id).span);
        scopes.top.insert(name, binding.captured(Capturer::Function));
    }
    scopes.enter();

    let arena = closure.arena.clone();
    let mut vm = Vm::new(engine, context, scopes, arena.clone(), closure.file);

    let body = match closure.node {
        ClosureNode::Context(body) => {
            args.finish()?;
            body
        }
        ClosureNode::Func(id) => {
            let def = *arena.closure(id);
            bind_params(&mut vm, &arena, id, closure, &mut args)?;
            args.finish()?;
            def.body
        }
    };

    let output = vm.eval(body)?;
    match vm.flow.take() {
        None => Ok(output),
        Some(FlowEvent::Return {
            span,
            value: Some(value),
            conditional,
        }) => {
            if !conditional && matches!(&output, Value::Content(content) if !content.is_empty()) {
                vm.engine.warn(
                    ErrorCode::W6006,
                    span,
                    "this return unconditionally discards the content before it",
                );
            }
            Ok(value)
        }
        Some(FlowEvent::Return { value: None, .. }) => Ok(output),
        Some(event) => Err(event.forbidden()),
    }
}

/// Bind a closure's parameters from the call arguments.
///
/// Named parameters are taken first so that an argument sink never
/// swallows them; positional parameters and the sink then follow in
/// declaration order.
fn bind_params(
    vm: &mut Vm,
    arena: &ExprArena,
    id: ClosureId,
    closure: &Closure,
    args: &mut Args,
) -> SourceResult<()> {
    let params = arena.params(arena.closure(id).params);

    let mut defaults = closure.defaults.iter();
    for param in params {
        if let Param::Named { name, span, .. } = *param {
            let default = defaults.next().cloned().unwrap_or(Value::None);
            let value = args.named::<Value>(name.as_str())?.unwrap_or(default);
            vm.scopes.bind(name, Binding::new(value, span)).at(span)?;
        }
    }

    for (i, param) in params.iter().enumerate() {
        match *param {
            Param::Pos(pattern) => {
                let pattern_kind = arena.pattern(pattern).kind;
                let ident = match pattern_kind {
                    PatternKind::Normal(expr) => match arena.kind(expr) {
                        ExprKind::Ident(name) => Some(name),
                        _ => None,
                    },
                    _ => None,
                };
                let value = match ident {
                    Some(name) => args.expect::<Value>(name.as_str())?,
                    None => args.expect::<Value>("pattern parameter")?,
                };
                vm.bind_pattern(pattern, value)?;
            }
            Param::Sink { name, span } => {
                let after = params[i + 1..]
                    .iter()
                    .filter(|param| matches!(param, Param::Pos(_)))
                    .count();
                let mut available = args.count_positional().saturating_sub(after);
                let mut sink = Args::new(args.span);
                let mut kept = Vec::new();
                for item in std::mem::take(&mut args.items) {
                    if item.name.is_some() {
                        sink.items.push(item);
                    } else if available > 0 {
                        available -= 1;
                        sink.items.push(item);
                    } else {
                        kept.push(item);
                    }
                }
                args.items = kept;
                if let Some(name) = name {
                    vm.scopes.bind(name, Binding::new(Value::Args(sink), span)).at(span)?;
                }
            }
            Param::Named { .. } => {}
        }
    }
    Ok(())
}

/// Whether an expression names a place that can be mutated in place.
fn is_place(arena: &ExprArena, expr: ExprId) -> bool {
    match arena.kind(expr) {
        ExprKind::Ident(_) => true,
        ExprKind::Parenthesized(inner) => is_place(arena, inner),
        ExprKind::FieldAccess { target, .. } => is_place(arena, target),
        ExprKind::FuncCall { callee, .. } => match arena.kind(callee) {
            ExprKind::FieldAccess { target, field } => field.as_str() == "at" && is_place(arena, target),
            _ => false,
        },
        _ => false,
    }
}

/// Whether a call was written in math, where calling a non-function
/// renders the call literally.
fn is_math_callee(arena: &ExprArena, callee: ExprId) -> bool {
    match arena.kind(callee) {
        ExprKind::MathIdent(_) => true,
        ExprKind::FieldAccess { target, .. } => is_math_callee(arena, target),
        _ => false,
    }
}

/// `f(a, b)` in math where `f` is not callable: the callee followed by
/// its parenthesized arguments.
fn math_call_fallback(callee: Value, args: Args) -> Content {
    let mut content = super::math::math_display(callee);
    content.extend(Content::text("("));
    let mut first = true;
    for arg in args.items {
        if !first {
            content.extend(Content::text(","));
        }
        first = false;
        content.extend(super::math::math_display(arg.value.v));
    }
    content.extend(Content::text(")"));
    content
}
