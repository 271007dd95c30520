//! The tree-walking evaluator.
//!
//! A [`Vm`] evaluates the expressions of one arena: a source file, or the
//! body of a closure defined in one. Evaluation is a single dispatch on the
//! `Copy` [`ExprKind`] of each node; the markup, code and math layers share
//! the dispatch because they share the node type.
//!
//! # Module Structure
//!
//! - `markup`: markup lists and markup nodes, label attachment
//! - `code`: code blocks, operators, conditionals and loops
//! - `call`: field access, calls, arguments and closures
//! - `pattern`: `let`, destructuring and assignment
//! - `rules`: set rules, show rules and `context`
//! - `math`: equations
//! - `import`: module imports, includes and packages
//! - `scope_guard`: the RAII frame guard
//!
//! # Control Flow
//!
//! `break`, `continue` and `return` do not unwind through Rust errors.
//! They set [`Vm::flow`]; every list evaluator stops at the first pending
//! event and the construct that owns the event (a loop or a closure call)
//! consumes it. An event that reaches the top of a file is an error.

mod call;
mod code;
mod import;
mod markup;
mod math;
mod pattern;
mod rules;
mod scope_guard;

pub use call::call_closure;
pub(crate) use scope_guard::ScopedVm;

use folio_ir::{ExprId, ExprKind, FileId, SharedArena, Span, Unit};
use folio_stack::ensure_sufficient_stack;

use crate::engine::{Context, Engine};
use crate::errors::{forbidden_flow, At, EvalError, FlowKind, SourceResult};
use crate::scope::Scopes;
use crate::value::{Angle, Fraction, Label, Length, Ratio, Value};

/// A pending control-flow event.
#[derive(Clone, Debug, PartialEq)]
pub enum FlowEvent {
    Break(Span),
    Continue(Span),
    Return {
        span: Span,
        value: Option<Value>,
        /// Whether the `return` sits inside a conditional or loop body.
        conditional: bool,
    },
}

impl FlowEvent {
    /// The error for an event that escaped every construct able to
    /// consume it.
    pub fn forbidden(&self) -> EvalError {
        match self {
            FlowEvent::Break(span) => forbidden_flow(FlowKind::Break).with_span(*span),
            FlowEvent::Continue(span) => forbidden_flow(FlowKind::Continue).with_span(*span),
            FlowEvent::Return { span, .. } => forbidden_flow(FlowKind::Return).with_span(*span),
        }
    }
}

/// Evaluation state for one arena.
pub struct Vm<'a, 'w> {
    pub engine: &'a mut Engine<'w>,
    pub context: &'a Context,
    pub scopes: Scopes<'w>,
    /// The pending control-flow event, if any.
    pub flow: Option<FlowEvent>,
    arena: SharedArena,
    /// The file being evaluated, for closures defined in it.
    file: Option<FileId>,
}

impl<'a, 'w> Vm<'a, 'w> {
    pub fn new(
        engine: &'a mut Engine<'w>,
        context: &'a Context,
        scopes: Scopes<'w>,
        arena: SharedArena,
        file: Option<FileId>,
    ) -> Self {
        Vm {
            engine,
            context,
            scopes,
            flow: None,
            arena,
            file,
        }
    }

    pub fn arena(&self) -> &SharedArena {
        &self.arena
    }

    /// Consume the VM, yielding its outermost frame.
    pub fn into_scopes(self) -> Scopes<'w> {
        self.scopes
    }

    /// Evaluate an expression.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn eval(&mut self, id: ExprId) -> SourceResult<Value> {
        let value = ensure_sufficient_stack(|| self.eval_expr(id))?;
        if self.engine.tracer.inspected().is_some() {
            let span = self.arena.span(id);
            self.engine.tracer.value(&value, span);
        }
        Ok(value)
    }

    fn eval_expr(&mut self, id: ExprId) -> SourceResult<Value> {
        let span = self.arena.span(id);
        let kind = self.arena.kind(id);
        match kind {
            ExprKind::Label(name) => Ok(Value::Label(Label(name))),
            ExprKind::Markup(_)
            | ExprKind::Text(_)
            | ExprKind::Space
            | ExprKind::Linebreak
            | ExprKind::Parbreak
            | ExprKind::Escape(_)
            | ExprKind::Shorthand(_)
            | ExprKind::SmartQuote { .. }
            | ExprKind::Strong(_)
            | ExprKind::Emph(_)
            | ExprKind::Raw { .. }
            | ExprKind::Link(_)
            | ExprKind::Ref { .. }
            | ExprKind::Heading { .. }
            | ExprKind::ListItem(_)
            | ExprKind::EnumItem { .. }
            | ExprKind::TermItem { .. }
            | ExprKind::Equation { .. } => self.eval_markup_node(id, kind).map(Value::Content),

            ExprKind::MathIdent(name) => self.scopes.get_in_math(name).at(span),
            ExprKind::Math(_)
            | ExprKind::MathText(_)
            | ExprKind::MathShorthand(_)
            | ExprKind::MathAlignPoint
            | ExprKind::MathDelimited { .. }
            | ExprKind::MathAttach { .. }
            | ExprKind::MathFrac { .. }
            | ExprKind::MathRoot { .. } => self.eval_math_node(id, kind).map(Value::Content),

            ExprKind::Ident(name) => self.scopes.get(name).cloned().at(span),
            ExprKind::None => Ok(Value::None),
            ExprKind::Auto => Ok(Value::Auto),
            ExprKind::Bool(v) => Ok(Value::Bool(v)),
            ExprKind::Int(v) => Ok(Value::Int(v)),
            ExprKind::Float(bits) => Ok(Value::Float(f64::from_bits(bits))),
            ExprKind::Numeric { value, unit } => Ok(numeric(f64::from_bits(value), unit)),
            ExprKind::Str(s) => Ok(Value::str(s.as_str())),

            ExprKind::CodeBlock(range) => {
                let arena = self.arena.clone();
                let mut scoped = self.scoped();
                scoped.eval_code(arena.expr_list(range))
            }
            ExprKind::ContentBlock(body) => {
                let mut scoped = self.scoped();
                let value = scoped.eval(body)?;
                Ok(Value::Content(value.display()))
            }
            ExprKind::Parenthesized(inner) => self.eval(inner),
            ExprKind::Array(items) => self.eval_array(items),
            ExprKind::Dict(items) => self.eval_dict(items),
            ExprKind::Unary { op, expr } => self.eval_unary(op, expr, span),
            ExprKind::Binary { op, lhs, rhs } => self.eval_binary(op, lhs, rhs, span),

            ExprKind::FieldAccess { target, field } => self.eval_field_access(target, field, span),
            ExprKind::FuncCall { callee, args } => self.eval_call(callee, args, span),
            ExprKind::Closure(closure) => self.eval_closure(closure),

            ExprKind::Let { kind, init } => self.eval_let(kind, init, span),
            ExprKind::DestructAssign { pattern, value } => self.eval_destruct_assign(pattern, value),

            ExprKind::Set { .. } | ExprKind::Show { .. } => self.eval_rule(id).map(Value::Styles),
            ExprKind::Contextual(body) => self.eval_contextual(body, span),

            ExprKind::Conditional {
                condition,
                if_body,
                else_body,
            } => self.eval_conditional(condition, if_body, else_body),
            ExprKind::While { condition, body } => self.eval_while(condition, body, span),
            ExprKind::For {
                pattern,
                iterable,
                body,
            } => self.eval_for(pattern, iterable, body, span),

            ExprKind::Import {
                source,
                new_name,
                imports,
            } => self.eval_import(source, new_name, imports, span),
            ExprKind::Include(source) => self.eval_include(source, span),

            ExprKind::Break => {
                self.raise(FlowEvent::Break(span));
                Ok(Value::None)
            }
            ExprKind::Continue => {
                self.raise(FlowEvent::Continue(span));
                Ok(Value::None)
            }
            ExprKind::Return(value) => {
                let value = value.map(|expr| self.eval(expr)).transpose()?;
                self.raise(FlowEvent::Return {
                    span,
                    value,
                    conditional: false,
                });
                Ok(Value::None)
            }
        }
    }

    /// Record a control-flow event unless one is already pending.
    fn raise(&mut self, event: FlowEvent) {
        if self.flow.is_none() {
            self.flow = Some(event);
        }
    }

    /// Mark a pending `return` as sitting in a branch.
    fn mark_conditional(&mut self) {
        if let Some(FlowEvent::Return { conditional, .. }) = &mut self.flow {
            *conditional = true;
        }
    }
}

/// The value of a numeric literal with a unit.
fn numeric(value: f64, unit: Unit) -> Value {
    match unit {
        Unit::Pt => Value::Length(Length::pt(value)),
        Unit::Mm => Value::Length(Length::mm(value)),
        Unit::Cm => Value::Length(Length::cm(value)),
        Unit::In => Value::Length(Length::inches(value)),
        Unit::Em => Value::Length(Length::em(value)),
        Unit::Deg => Value::Angle(Angle::deg(value)),
        Unit::Rad => Value::Angle(Angle::rad(value)),
        Unit::Fr => Value::Fraction(Fraction(value)),
        Unit::Percent => Value::Ratio(Ratio(value / 100.0)),
    }
}

#[cfg(test)]
mod tests;
