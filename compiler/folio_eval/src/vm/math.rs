//! Math evaluation.
//!
//! Math nodes build plain content elements (`frac`, `attach`, `lr`, ...).
//! Single letters that are not bound resolve to symbols, so `$x$` works
//! without a definition.

use folio_ir::{ExprId, ExprKind};

use super::Vm;
use crate::content::{Content, Elem, ElemKind};
use crate::errors::SourceResult;
use crate::value::Value;

impl Vm<'_, '_> {
    pub(super) fn eval_math_node(&mut self, id: ExprId, kind: ExprKind) -> SourceResult<Content> {
        let span = self.arena.span(id);
        let elem = match kind {
            ExprKind::Math(range) => {
                let arena = self.arena.clone();
                let mut seq = Content::empty();
                for &expr in arena.expr_list(range) {
                    let value = self.eval(expr)?;
                    seq.extend(math_display(value).spanned(arena.span(expr)));
                    if self.flow.is_some() {
                        break;
                    }
                }
                return Ok(seq);
            }
            ExprKind::MathText(text) => Elem::text(text),
            ExprKind::MathShorthand(c) => Elem::symbol(c),
            ExprKind::MathAlignPoint => Elem::new(ElemKind::AlignPoint),
            ExprKind::MathDelimited { open, body, close } => {
                let mut inner = self.eval_math_operand(open)?;
                inner.extend(self.eval_math_operand(body)?);
                inner.extend(self.eval_math_operand(close)?);
                Elem::new(ElemKind::Lr).with_field("body", Value::Content(inner))
            }
            ExprKind::MathAttach {
                base,
                bottom,
                top,
                primes,
            } => {
                let base = self.eval_math_operand(base)?;
                let mut elem = Elem::new(ElemKind::Attach).with_field("base", Value::Content(base));
                if let Some(bottom) = bottom {
                    let bottom = self.eval_math_operand(bottom)?;
                    elem.push_field("b", Value::Content(bottom));
                }
                if let Some(top) = top {
                    let top = self.eval_math_operand(top)?;
                    elem.push_field("t", Value::Content(top));
                }
                if primes > 0 {
                    elem.push_field("primes", Value::Int(i64::from(primes)));
                }
                elem
            }
            ExprKind::MathFrac { num, denom } => {
                let num = self.eval_math_operand(num)?;
                let denom = self.eval_math_operand(denom)?;
                Elem::new(ElemKind::Frac)
                    .with_field("num", Value::Content(num))
                    .with_field("denom", Value::Content(denom))
            }
            ExprKind::MathRoot { index, radicand } => {
                let index = match index {
                    Some(n) => Value::Content(Content::text(n.to_string())),
                    None => Value::None,
                };
                let radicand = self.eval_math_operand(radicand)?;
                Elem::new(ElemKind::Root)
                    .with_field("index", index)
                    .with_field("radicand", Value::Content(radicand))
            }
            _ => return Ok(math_display(self.eval(id)?)),
        };
        Ok(elem.spanned(span).pack())
    }

    fn eval_math_operand(&mut self, id: ExprId) -> SourceResult<Content> {
        Ok(math_display(self.eval(id)?))
    }
}

/// Display a value inside an equation: symbols become symbol elements.
pub(super) fn math_display(value: Value) -> Content {
    match value {
        Value::Symbol(symbol) => Elem::symbol(symbol.get()).pack(),
        other => other.display(),
    }
}
