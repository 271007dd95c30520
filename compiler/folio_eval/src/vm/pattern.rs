//! Bindings, destructuring and assignment.

use folio_ir::{BinaryOp, ExprId, ExprKind, LetKind, Name, PatternId, PatternItem, PatternKind, Span};

use super::code::apply_binary;
use super::Vm;
use crate::errors::{unknown_method, At, EvalError, SourceResult};
use crate::scope::Binding;
use crate::value::{Array, Dict, Str, Value};

impl Vm<'_, '_> {
    pub(super) fn eval_let(&mut self, kind: LetKind, init: Option<ExprId>, span: Span) -> SourceResult<Value> {
        let value = match init {
            Some(init) => self.eval(init)?,
            None => Value::None,
        };
        match kind {
            LetKind::Normal(pattern) => self.bind_pattern(pattern, value)?,
            LetKind::Closure(name) => self.scopes.bind(name, Binding::new(value, span)).at(span)?,
        }
        Ok(Value::None)
    }

    /// Bind the names of a pattern in the innermost frame.
    pub(super) fn bind_pattern(&mut self, pattern: PatternId, value: Value) -> SourceResult<()> {
        self.destructure(pattern, value, &mut |vm, expr, value| {
            let span = vm.arena.span(expr);
            match vm.arena.kind(expr) {
                ExprKind::Ident(name) => vm.scopes.bind(name, Binding::new(value, span)).at(span),
                _ => Err(EvalError::new("expected an identifier").with_span(span)),
            }
        })
    }

    pub(super) fn eval_destruct_assign(&mut self, pattern: PatternId, value: ExprId) -> SourceResult<Value> {
        let value = self.eval(value)?;
        self.destructure(pattern, value, &mut |vm, expr, value| {
            let place = vm.access(expr)?;
            *place = value;
            Ok(())
        })?;
        Ok(Value::None)
    }

    /// `x = v`, `x += v` and friends. The right side is evaluated first.
    pub(super) fn eval_assign(
        &mut self,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
        span: Span,
    ) -> SourceResult<Value> {
        let rhs = self.eval(rhs)?;
        let place = self.access(lhs)?;
        match op.compound_base() {
            Some(base) => *place = apply_binary(base, place.clone(), rhs).at(span)?,
            None => *place = rhs,
        }
        Ok(Value::None)
    }

    /// Resolve an assignable expression to the value it names.
    ///
    /// Places are variables, dictionary fields (created on write) and
    /// existing array or dictionary entries reached through `.at()`.
    pub(super) fn access(&mut self, expr: ExprId) -> SourceResult<&mut Value> {
        let span = self.arena.span(expr);
        match self.arena.kind(expr) {
            ExprKind::Ident(name) => self.scopes.get_mut(name).at(span),
            ExprKind::Parenthesized(inner) => self.access(inner),
            ExprKind::FieldAccess { target, field } => match self.access(target)? {
                Value::Dict(dict) => Ok(dict.entry_mut(Str::from(field))),
                other => Err(EvalError::new(format!(
                    "cannot mutate fields on {}",
                    other.ty().long_name()
                ))
                .with_span(span)),
            },
            ExprKind::FuncCall { callee, args } => {
                let ExprKind::FieldAccess { target, field } = self.arena.kind(callee) else {
                    return Err(temporary(span));
                };
                if field.as_str() != "at" {
                    return Err(temporary(span));
                }
                let mut args = self.eval_args(args, span)?;
                match self.access(target)? {
                    Value::Array(array) => {
                        let index = args.expect::<i64>("index")?;
                        args.finish()?;
                        array.at_mut(index).at(span)
                    }
                    Value::Dict(dict) => {
                        let key = args.expect::<Str>("key")?;
                        args.finish()?;
                        dict.at_mut(&key).at(span)
                    }
                    other => Err(unknown_method(other.ty().long_name(), "at").with_span(span)),
                }
            }
            _ => Err(temporary(span)),
        }
    }

    /// Walk a pattern against a value, handing each leaf expression and
    /// its part of the value to `f`.
    fn destructure<F>(&mut self, pattern: PatternId, value: Value, f: &mut F) -> SourceResult<()>
    where
        F: FnMut(&mut Self, ExprId, Value) -> SourceResult<()>,
    {
        let arena = self.arena.clone();
        let pattern = *arena.pattern(pattern);
        match pattern.kind {
            PatternKind::Normal(expr) => f(self, expr, value),
            PatternKind::Placeholder => Ok(()),
            PatternKind::Parenthesized(inner) => self.destructure(inner, value, f),
            PatternKind::Destructuring(items) => {
                let items = arena.pattern_items(items);
                match value {
                    Value::Array(array) => self.destructure_array(items, &array, pattern.span, f),
                    Value::Dict(dict) => self.destructure_dict(items, &dict, pattern.span, f),
                    other => Err(EvalError::new(format!(
                        "cannot destructure {}",
                        other.ty().long_name()
                    ))
                    .with_span(pattern.span)),
                }
            }
        }
    }

    fn destructure_array<F>(
        &mut self,
        items: &[PatternItem],
        array: &Array,
        span: Span,
        f: &mut F,
    ) -> SourceResult<()>
    where
        F: FnMut(&mut Self, ExprId, Value) -> SourceResult<()>,
    {
        let values = array.as_slice();
        let len = values.len();
        let mut i = 0;
        for item in items {
            match *item {
                PatternItem::Pattern(pattern) => {
                    let Some(value) = values.get(i) else {
                        return Err(wrong_count(len, items, span));
                    };
                    self.destructure(pattern, value.clone(), f)?;
                    i += 1;
                }
                PatternItem::Spread { target, .. } => {
                    let sunk = (len + 1).saturating_sub(items.len());
                    let end = (i + sunk).min(len);
                    if let Some(target) = target {
                        f(self, target, Value::Array(values[i..end].iter().cloned().collect()))?;
                    }
                    i = end;
                }
                PatternItem::Named { span, .. } => {
                    return Err(EvalError::new("cannot destructure named pattern from an array")
                        .with_span(span))
                }
            }
        }
        if i < len {
            return Err(wrong_count(len, items, span));
        }
        Ok(())
    }

    fn destructure_dict<F>(
        &mut self,
        items: &[PatternItem],
        dict: &Dict,
        span: Span,
        f: &mut F,
    ) -> SourceResult<()>
    where
        F: FnMut(&mut Self, ExprId, Value) -> SourceResult<()>,
    {
        let arena = self.arena.clone();
        let shorthand = |pattern: PatternId| -> Option<(ExprId, Name)> {
            let PatternKind::Normal(expr) = arena.pattern(pattern).kind else {
                return None;
            };
            match arena.kind(expr) {
                ExprKind::Ident(name) => Some((expr, name)),
                _ => None,
            }
        };

        let mut used: Vec<Name> = Vec::new();
        for item in items {
            match *item {
                PatternItem::Pattern(pattern) => {
                    if let Some((_, name)) = shorthand(pattern) {
                        used.push(name);
                    }
                }
                PatternItem::Named { name, .. } => used.push(name),
                PatternItem::Spread { .. } => {}
            }
        }

        for item in items {
            match *item {
                PatternItem::Pattern(pattern) => {
                    let Some((expr, name)) = shorthand(pattern) else {
                        return Err(EvalError::new("cannot destructure unnamed pattern from dictionary")
                            .with_span(arena.pattern(pattern).span));
                    };
                    let value = dict.at(name.as_str()).at(span)?.clone();
                    f(self, expr, value)?;
                }
                PatternItem::Named { name, pattern, span } => {
                    let value = dict.at(name.as_str()).at(span)?.clone();
                    self.destructure(pattern, value, f)?;
                }
                PatternItem::Spread { target, .. } => {
                    let Some(target) = target else {
                        continue;
                    };
                    let rest: Dict = dict
                        .iter()
                        .filter(|(key, _)| !used.iter().any(|name| name.as_str() == key.as_str()))
                        .map(|(key, value)| (key.clone(), value.clone()))
                        .collect();
                    f(self, target, Value::Dict(rest))?;
                }
            }
        }
        Ok(())
    }
}

#[cold]
fn temporary(span: Span) -> EvalError {
    EvalError::new("cannot mutate a temporary value").with_span(span)
}

#[cold]
fn wrong_count(len: usize, items: &[PatternItem], span: Span) -> EvalError {
    let expected = items
        .iter()
        .filter(|item| matches!(item, PatternItem::Pattern(_)))
        .count();
    let spread = items.iter().any(|item| matches!(item, PatternItem::Spread { .. }));
    let message = if len > expected {
        "too many elements to destructure"
    } else {
        "not enough elements to destructure"
    };
    let quantifier = if spread { "at least " } else { "" };
    EvalError::new(message).with_span(span).with_hint(format!(
        "the provided array has a length of {len}, but the pattern expects {quantifier}{expected} elements"
    ))
}
