//! Set rules, show rules and contextual expressions.

use std::sync::Arc;

use folio_ir::{ArgRange, ExprId, ExprKind, Span};

use super::Vm;
use crate::capture::CapturesVisitor;
use crate::content::{set_args, Content};
use crate::errors::{At, EvalError, SourceResult};
use crate::func::{Closure, ClosureNode, Func};
use crate::scope::Capturer;
use crate::styles::{Recipe, Selector, SetRule, Styles, Transformation};
use crate::value::{FromValue, Value};

impl Vm<'_, '_> {
    /// Evaluate a `set` or `show` rule into the styles it contributes.
    pub(super) fn eval_rule(&mut self, id: ExprId) -> SourceResult<Styles> {
        let span = self.arena.span(id);
        match self.arena.kind(id) {
            ExprKind::Set {
                target,
                args,
                condition,
            } => self.eval_set(target, args, condition, span),
            ExprKind::Show {
                selector,
                transform,
            } => self.eval_show(selector, transform, span),
            _ => Ok(Styles::new()),
        }
    }

    fn eval_set(
        &mut self,
        target: ExprId,
        args: ArgRange,
        condition: Option<ExprId>,
        span: Span,
    ) -> SourceResult<Styles> {
        if let Some(condition) = condition {
            if !self.eval_condition(condition)? {
                return Ok(Styles::new());
            }
        }

        let target_span = self.arena.span(target);
        let elem = match self.eval(target)? {
            Value::Func(func) => func.element(),
            _ => None,
        };
        let Some(elem) = elem else {
            return Err(EvalError::new("only element functions can be used in set rules")
                .with_span(target_span));
        };

        let mut args = self.eval_args(args, span)?;
        let settings = set_args(elem, &mut args)?;
        args.finish()?;
        if settings.is_empty() {
            return Ok(Styles::new());
        }

        tracing::trace!(target = elem.name(), fields = settings.items.len(), "set rule");
        Ok(Styles::from_rule(SetRule {
            target: elem,
            args: settings,
            span,
            liftable: true,
        }))
    }

    fn eval_show(&mut self, selector: Option<ExprId>, transform: ExprId, span: Span) -> SourceResult<Styles> {
        let selector = match selector {
            Some(expr) => {
                let value = self.eval(expr)?;
                Some(Selector::from_value(value).at(self.arena.span(expr))?)
            }
            None => None,
        };

        let transform = match self.eval(transform)? {
            Value::Styles(styles) => Transformation::SetStyles(styles),
            Value::Func(func) => Transformation::ApplyFn(func),
            Value::None => Transformation::Hide,
            Value::Content(content) => Transformation::Replace(content),
            other => Transformation::Replace(other.display()),
        };

        if let Some(selector) = &selector {
            tracing::trace!(selector = %selector.repr(), "show rule");
        }
        let id = self.engine.recipe_id();
        Ok(Styles::from_recipe(Recipe::new(id, selector, transform, span)))
    }

    /// `context body`: defer the body until the style chain is known.
    pub(super) fn eval_contextual(&mut self, body: ExprId, span: Span) -> SourceResult<Value> {
        let arena = self.arena.clone();
        let captured = {
            let mut visitor = CapturesVisitor::new(Some(&self.scopes), Capturer::Context);
            folio_ir::visitor::Visitor::visit_expr(&mut visitor, body, &arena);
            visitor.finish()
        };

        let closure = Closure {
            node: ClosureNode::Context(body),
            arena,
            file: self.file,
            captured,
            defaults: Vec::new(),
            name: None,
        };
        let func = Func::Closure(Arc::new(closure));
        Ok(Value::Content(Content::contextual(func).spanned(span)))
    }
}
