//! Code evaluation: blocks, collections, operators, conditionals and loops.

use folio_ir::visitor::{walk_expr, Visitor};
use folio_ir::{
    ArrayItem, ArrayItemRange, BinaryOp, DictItem, DictItemRange, ExprArena, ExprId, ExprKind,
    PatternId, PatternKind, Span, UnaryOp,
};
use unicode_segmentation::UnicodeSegmentation;

use super::{FlowEvent, Vm};
use crate::errors::{
    infinite_loop, iteration_cap, operand_mismatch, type_mismatch, At, EvalError, SourceResult,
};
use crate::ops;
use crate::value::{Array, Dict, Str, Value};

impl Vm<'_, '_> {
    /// Evaluate the expressions of a code block and join their values.
    pub(crate) fn eval_code(&mut self, exprs: &[ExprId]) -> SourceResult<Value> {
        let mut output = Value::None;
        let mut iter = exprs.iter();
        while let Some(&expr) = iter.next() {
            let span = self.arena.span(expr);
            let (value, rest_consumed) = match self.arena.kind(expr) {
                ExprKind::Set { .. } | ExprKind::Show { .. } => {
                    let styles = self.eval_rule(expr)?;
                    if self.flow.is_some() {
                        break;
                    }
                    let tail = self.eval_code(iter.as_slice())?.display();
                    let value = if tail.is_empty() {
                        Value::None
                    } else {
                        Value::Content(tail.styled(styles))
                    };
                    (value, true)
                }
                _ => (self.eval(expr)?, false),
            };
            output = ops::join(output, value).at(span)?;
            if rest_consumed || self.flow.is_some() {
                break;
            }
        }
        Ok(output)
    }

    pub(super) fn eval_array(&mut self, items: ArrayItemRange) -> SourceResult<Value> {
        let arena = self.arena.clone();
        let mut array = Array::new();
        for item in arena.array_items(items) {
            match *item {
                ArrayItem::Pos(expr) => array.push(self.eval(expr)?),
                ArrayItem::Spread { expr, span } => match self.eval(expr)? {
                    Value::None => {}
                    Value::Array(items) => array.extend(items),
                    other => {
                        return Err(EvalError::new(format!(
                            "cannot spread {} into array",
                            other.ty().long_name()
                        ))
                        .with_span(span))
                    }
                },
            }
        }
        Ok(Value::Array(array))
    }

    pub(super) fn eval_dict(&mut self, items: DictItemRange) -> SourceResult<Value> {
        let arena = self.arena.clone();
        let mut dict = Dict::new();
        for item in arena.dict_items(items) {
            match *item {
                DictItem::Named { name, expr, .. } => {
                    let value = self.eval(expr)?;
                    dict.insert(Str::from(name), value);
                }
                DictItem::Keyed { key, expr, .. } => {
                    let key = match self.eval(key)? {
                        Value::Str(key) => key,
                        other => {
                            return Err(type_mismatch("string", other.ty().long_name())
                                .with_span(arena.span(key)))
                        }
                    };
                    let value = self.eval(expr)?;
                    dict.insert(key, value);
                }
                DictItem::Spread { expr, span } => match self.eval(expr)? {
                    Value::None => {}
                    Value::Dict(other) => dict.extend(other),
                    other => {
                        return Err(EvalError::new(format!(
                            "cannot spread {} into dictionary",
                            other.ty().long_name()
                        ))
                        .with_span(span))
                    }
                },
            }
        }
        Ok(Value::Dict(dict))
    }

    pub(super) fn eval_unary(&mut self, op: UnaryOp, expr: ExprId, span: Span) -> SourceResult<Value> {
        let value = self.eval(expr)?;
        match op {
            UnaryOp::Pos => ops::pos(value),
            UnaryOp::Neg => ops::neg(value),
            UnaryOp::Not => ops::not(value),
        }
        .at(span)
    }

    pub(super) fn eval_binary(
        &mut self,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
        span: Span,
    ) -> SourceResult<Value> {
        if op.is_assignment() {
            return self.eval_assign(op, lhs, rhs, span);
        }
        if matches!(op, BinaryOp::And | BinaryOp::Or) {
            return self.eval_logic(op, lhs, rhs, span);
        }
        let lhs = self.eval(lhs)?;
        let rhs = self.eval(rhs)?;
        apply_binary(op, lhs, rhs).at(span)
    }

    /// `and` and `or` only evaluate their right side when it matters.
    fn eval_logic(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId, span: Span) -> SourceResult<Value> {
        let verb = if op == BinaryOp::And { "apply 'and' to" } else { "apply 'or' to" };
        let left = match self.eval(lhs)? {
            Value::Bool(b) => b,
            other => return Err(operand_mismatch(verb, other.ty().long_name(), "boolean").with_span(span)),
        };
        match (op, left) {
            (BinaryOp::And, false) => return Ok(Value::Bool(false)),
            (BinaryOp::Or, true) => return Ok(Value::Bool(true)),
            _ => {}
        }
        match self.eval(rhs)? {
            Value::Bool(b) => Ok(Value::Bool(b)),
            other => Err(operand_mismatch(verb, "boolean", other.ty().long_name()).with_span(span)),
        }
    }

    pub(super) fn eval_conditional(
        &mut self,
        condition: ExprId,
        if_body: ExprId,
        else_body: Option<ExprId>,
    ) -> SourceResult<Value> {
        let output = if self.eval_condition(condition)? {
            self.eval(if_body)?
        } else if let Some(else_body) = else_body {
            self.eval(else_body)?
        } else {
            Value::None
        };
        self.mark_conditional();
        Ok(output)
    }

    pub(super) fn eval_condition(&mut self, condition: ExprId) -> SourceResult<bool> {
        match self.eval(condition)? {
            Value::Bool(b) => Ok(b),
            other => Err(type_mismatch("boolean", other.ty().long_name())
                .with_span(self.arena.span(condition))),
        }
    }

    pub(super) fn eval_while(&mut self, condition: ExprId, body: ExprId, span: Span) -> SourceResult<Value> {
        let limit = self.engine.limits.max_iterations;
        let mut output = Value::None;
        let mut iterations = 0;
        while self.eval_condition(condition)? {
            if iterations == 0
                && is_invariant(&self.arena, condition)
                && !can_diverge(&self.arena, body)
            {
                return Err(infinite_loop().with_span(self.arena.span(condition)));
            }
            if iterations >= limit {
                return Err(iteration_cap(limit).with_span(span));
            }
            iterations += 1;

            let value = self.eval(body)?;
            output = ops::join(output, value).at(span)?;
            if self.finish_iteration() {
                break;
            }
        }
        self.mark_conditional();
        Ok(output)
    }

    pub(super) fn eval_for(
        &mut self,
        pattern: PatternId,
        iterable: ExprId,
        body: ExprId,
        span: Span,
    ) -> SourceResult<Value> {
        let iterable_span = self.arena.span(iterable);
        let destructuring = matches!(
            self.arena.pattern(pattern).kind,
            PatternKind::Destructuring(_)
        );
        let items: Vec<Value> = match self.eval(iterable)? {
            Value::Array(array) => array.into_iter().collect(),
            Value::Dict(dict) => dict
                .into_iter()
                .map(|(key, value)| Value::Array([Value::Str(key), value].into_iter().collect()))
                .collect(),
            Value::Str(s) if !destructuring => s.graphemes(true).map(Value::str).collect(),
            Value::Bytes(bytes) if !destructuring => bytes
                .as_slice()
                .iter()
                .map(|&byte| Value::Int(i64::from(byte)))
                .collect(),
            value @ (Value::Str(_) | Value::Bytes(_)) => {
                return Err(EvalError::new(format!(
                    "cannot destructure values of {}",
                    value.ty().long_name()
                ))
                .with_span(self.arena.pattern(pattern).span))
            }
            other => {
                return Err(EvalError::new(format!(
                    "cannot loop over {}",
                    other.ty().long_name()
                ))
                .with_span(iterable_span))
            }
        };

        let limit = self.engine.limits.max_iterations;
        let mut output = Value::None;
        for (i, item) in items.into_iter().enumerate() {
            if i >= limit {
                return Err(iteration_cap(limit).with_span(span));
            }
            let value = {
                let mut scoped = self.scoped();
                scoped.bind_pattern(pattern, item)?;
                scoped.eval(body)?
            };
            output = ops::join(output, value).at(span)?;
            if self.finish_iteration() {
                break;
            }
        }
        self.mark_conditional();
        Ok(output)
    }

    /// Consume a loop's `break` or `continue`; returns whether the loop
    /// must stop. A `return` stays pending for the enclosing closure.
    fn finish_iteration(&mut self) -> bool {
        match self.flow.take() {
            None | Some(FlowEvent::Continue(_)) => false,
            Some(FlowEvent::Break(_)) => true,
            Some(event @ FlowEvent::Return { .. }) => {
                self.flow = Some(event);
                true
            }
        }
    }
}

/// Apply a non-assigning, non-short-circuiting binary operator.
pub(super) fn apply_binary(op: BinaryOp, lhs: Value, rhs: Value) -> SourceResult<Value> {
    match op {
        BinaryOp::Add => ops::add(lhs, rhs),
        BinaryOp::Sub => ops::sub(lhs, rhs),
        BinaryOp::Mul => ops::mul(lhs, rhs),
        BinaryOp::Div => ops::div(lhs, rhs),
        BinaryOp::Eq => Ok(Value::Bool(ops::equal(&lhs, &rhs))),
        BinaryOp::NotEq => Ok(Value::Bool(!ops::equal(&lhs, &rhs))),
        BinaryOp::Lt => ops::lt(&lhs, &rhs),
        BinaryOp::LtEq => ops::leq(&lhs, &rhs),
        BinaryOp::Gt => ops::gt(&lhs, &rhs),
        BinaryOp::GtEq => ops::geq(&lhs, &rhs),
        BinaryOp::In => Ok(Value::Bool(ops::contains(&lhs, &rhs)?)),
        BinaryOp::NotIn => Ok(Value::Bool(!ops::contains(&lhs, &rhs)?)),
        BinaryOp::And
        | BinaryOp::Or
        | BinaryOp::Assign
        | BinaryOp::AddAssign
        | BinaryOp::SubAssign
        | BinaryOp::MulAssign
        | BinaryOp::DivAssign => Err(EvalError::new(format!(
            "`{}` does not produce a value from two operands",
            op.as_str()
        ))),
    }
}

/// Finds the first node satisfying a predicate.
struct Finder<F> {
    pred: F,
    found: bool,
}

impl<F: Fn(ExprKind) -> bool> Visitor for Finder<F> {
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
        if self.found {
            return;
        }
        if (self.pred)(arena.kind(id)) {
            self.found = true;
            return;
        }
        walk_expr(self, id, arena);
    }
}

fn contains_node(arena: &ExprArena, id: ExprId, pred: impl Fn(ExprKind) -> bool) -> bool {
    let mut finder = Finder { pred, found: false };
    finder.visit_expr(id, arena);
    finder.found
}

/// A condition that reads no variable always evaluates the same.
fn is_invariant(arena: &ExprArena, condition: ExprId) -> bool {
    !contains_node(arena, condition, |kind| {
        matches!(kind, ExprKind::Ident(_) | ExprKind::MathIdent(_))
    })
}

/// Whether a loop body contains a way out.
fn can_diverge(arena: &ExprArena, body: ExprId) -> bool {
    contains_node(arena, body, |kind| {
        matches!(kind, ExprKind::Break | ExprKind::Return(_))
    })
}
