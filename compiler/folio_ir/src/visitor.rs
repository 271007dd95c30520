//! AST Visitor Pattern
//!
//! Provides generic traversal of the AST. Based on the arena-allocated
//! structure where expressions are referenced by `ExprId` indices.
//!
//! # Design
//!
//! A single `Visitor` trait is provided for AST traversal. The visitor
//! can mutate its own state during traversal, but the AST remains immutable.
//!
//! Default implementations call `walk_*` functions that traverse children in
//! source order. Override `visit_*` methods to add custom behavior at
//! specific nodes and call the matching `walk_*` to continue.
//!
//! # Example
//!
//! ```text
//! struct CountIdents {
//!     count: usize,
//! }
//!
//! impl Visitor for CountIdents {
//!     fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
//!         if let ExprKind::Ident(_) = arena.kind(id) {
//!             self.count += 1;
//!         }
//!         walk_expr(self, id, arena);
//!     }
//! }
//! ```

use crate::ast::{
    Arg, ArrayItem, ClosureId, DictItem, ExprId, ExprKind, LetKind, Param, PatternId, PatternItem,
    PatternKind,
};
use crate::ExprArena;

/// AST Visitor trait.
pub trait Visitor {
    /// Visit an expression.
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
        walk_expr(self, id, arena);
    }

    /// Visit a binding or assignment pattern.
    fn visit_pattern(&mut self, id: PatternId, arena: &ExprArena) {
        walk_pattern(self, id, arena);
    }

    /// Visit a closure definition.
    fn visit_closure(&mut self, id: ClosureId, arena: &ExprArena) {
        walk_closure(self, id, arena);
    }
}

/// Visit the children of an expression in source order.
pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, id: ExprId, arena: &ExprArena) {
    match arena.kind(id) {
        ExprKind::Text(_)
        | ExprKind::Space
        | ExprKind::Linebreak
        | ExprKind::Parbreak
        | ExprKind::Escape(_)
        | ExprKind::Shorthand(_)
        | ExprKind::SmartQuote { .. }
        | ExprKind::Raw { .. }
        | ExprKind::Link(_)
        | ExprKind::Label(_)
        | ExprKind::MathIdent(_)
        | ExprKind::MathText(_)
        | ExprKind::MathShorthand(_)
        | ExprKind::MathAlignPoint
        | ExprKind::Ident(_)
        | ExprKind::None
        | ExprKind::Auto
        | ExprKind::Bool(_)
        | ExprKind::Int(_)
        | ExprKind::Float(_)
        | ExprKind::Numeric { .. }
        | ExprKind::Str(_)
        | ExprKind::Break
        | ExprKind::Continue => {}

        ExprKind::Markup(range) | ExprKind::Math(range) | ExprKind::CodeBlock(range) => {
            for &child in arena.expr_list(range) {
                visitor.visit_expr(child, arena);
            }
        }

        ExprKind::Strong(body)
        | ExprKind::Emph(body)
        | ExprKind::Heading { body, .. }
        | ExprKind::ListItem(body)
        | ExprKind::EnumItem { body, .. }
        | ExprKind::Equation { body, .. }
        | ExprKind::ContentBlock(body)
        | ExprKind::Parenthesized(body)
        | ExprKind::Unary { expr: body, .. }
        | ExprKind::FieldAccess { target: body, .. }
        | ExprKind::Contextual(body)
        | ExprKind::Include(body)
        | ExprKind::MathRoot { radicand: body, .. } => visitor.visit_expr(body, arena),

        ExprKind::Ref { supplement, .. } => {
            if let Some(supplement) = supplement {
                visitor.visit_expr(supplement, arena);
            }
        }
        ExprKind::TermItem { term, description } => {
            visitor.visit_expr(term, arena);
            visitor.visit_expr(description, arena);
        }
        ExprKind::MathDelimited { open, body, close } => {
            visitor.visit_expr(open, arena);
            visitor.visit_expr(body, arena);
            visitor.visit_expr(close, arena);
        }
        ExprKind::MathAttach {
            base, bottom, top, ..
        } => {
            visitor.visit_expr(base, arena);
            if let Some(bottom) = bottom {
                visitor.visit_expr(bottom, arena);
            }
            if let Some(top) = top {
                visitor.visit_expr(top, arena);
            }
        }
        ExprKind::MathFrac { num, denom } => {
            visitor.visit_expr(num, arena);
            visitor.visit_expr(denom, arena);
        }

        ExprKind::Array(range) => {
            for item in arena.array_items(range) {
                match *item {
                    ArrayItem::Pos(expr) | ArrayItem::Spread { expr, .. } => {
                        visitor.visit_expr(expr, arena);
                    }
                }
            }
        }
        ExprKind::Dict(range) => {
            for item in arena.dict_items(range) {
                match *item {
                    DictItem::Named { expr, .. } | DictItem::Spread { expr, .. } => {
                        visitor.visit_expr(expr, arena);
                    }
                    DictItem::Keyed { key, expr, .. } => {
                        visitor.visit_expr(key, arena);
                        visitor.visit_expr(expr, arena);
                    }
                }
            }
        }
        ExprKind::Binary { lhs, rhs, .. } => {
            visitor.visit_expr(lhs, arena);
            visitor.visit_expr(rhs, arena);
        }
        ExprKind::FuncCall { callee, args } => {
            visitor.visit_expr(callee, arena);
            walk_args(visitor, args, arena);
        }
        ExprKind::Closure(closure) => visitor.visit_closure(closure, arena),
        ExprKind::Let { kind, init } => {
            if let Some(init) = init {
                visitor.visit_expr(init, arena);
            }
            if let LetKind::Normal(pattern) = kind {
                visitor.visit_pattern(pattern, arena);
            }
        }
        ExprKind::DestructAssign { pattern, value } => {
            visitor.visit_expr(value, arena);
            visitor.visit_pattern(pattern, arena);
        }
        ExprKind::Set {
            target,
            args,
            condition,
        } => {
            visitor.visit_expr(target, arena);
            walk_args(visitor, args, arena);
            if let Some(condition) = condition {
                visitor.visit_expr(condition, arena);
            }
        }
        ExprKind::Show {
            selector,
            transform,
        } => {
            if let Some(selector) = selector {
                visitor.visit_expr(selector, arena);
            }
            visitor.visit_expr(transform, arena);
        }
        ExprKind::Conditional {
            condition,
            if_body,
            else_body,
        } => {
            visitor.visit_expr(condition, arena);
            visitor.visit_expr(if_body, arena);
            if let Some(else_body) = else_body {
                visitor.visit_expr(else_body, arena);
            }
        }
        ExprKind::While { condition, body } => {
            visitor.visit_expr(condition, arena);
            visitor.visit_expr(body, arena);
        }
        ExprKind::For {
            pattern,
            iterable,
            body,
        } => {
            visitor.visit_expr(iterable, arena);
            visitor.visit_pattern(pattern, arena);
            visitor.visit_expr(body, arena);
        }
        ExprKind::Import { source, .. } => visitor.visit_expr(source, arena),
        ExprKind::Return(value) => {
            if let Some(value) = value {
                visitor.visit_expr(value, arena);
            }
        }
    }
}

/// Visit the argument expressions of a call or set rule.
pub fn walk_args<V: Visitor + ?Sized>(
    visitor: &mut V,
    args: crate::ArgRange,
    arena: &ExprArena,
) {
    for arg in arena.args(args) {
        match *arg {
            Arg::Pos(expr) | Arg::Named { expr, .. } | Arg::Spread { expr, .. } => {
                visitor.visit_expr(expr, arena);
            }
        }
    }
}

/// Visit the expressions inside a pattern.
pub fn walk_pattern<V: Visitor + ?Sized>(visitor: &mut V, id: PatternId, arena: &ExprArena) {
    match arena.pattern(id).kind {
        PatternKind::Normal(expr) => visitor.visit_expr(expr, arena),
        PatternKind::Placeholder => {}
        PatternKind::Parenthesized(inner) => visitor.visit_pattern(inner, arena),
        PatternKind::Destructuring(items) => {
            for item in arena.pattern_items(items) {
                match *item {
                    PatternItem::Pattern(pattern) | PatternItem::Named { pattern, .. } => {
                        visitor.visit_pattern(pattern, arena);
                    }
                    PatternItem::Spread { target, .. } => {
                        if let Some(target) = target {
                            visitor.visit_expr(target, arena);
                        }
                    }
                }
            }
        }
    }
}

/// Visit parameter defaults, parameter patterns and the body of a closure.
pub fn walk_closure<V: Visitor + ?Sized>(visitor: &mut V, id: ClosureId, arena: &ExprArena) {
    let closure = arena.closure(id);
    for param in arena.params(closure.params) {
        match *param {
            Param::Pos(pattern) => visitor.visit_pattern(pattern, arena),
            Param::Named { default, .. } => visitor.visit_expr(default, arena),
            Param::Sink { .. } => {}
        }
    }
    visitor.visit_expr(closure.body, arena);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Name, Span};

    struct CountIdents {
        count: usize,
    }

    impl Visitor for CountIdents {
        fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
            if let ExprKind::Ident(_) = arena.kind(id) {
                self.count += 1;
            }
            walk_expr(self, id, arena);
        }
    }

    #[test]
    fn walks_binary_and_call_children() {
        let mut arena = ExprArena::new();
        let x = arena.alloc_expr(ExprKind::Ident(Name::new("x")), Span::detached());
        let y = arena.alloc_expr(ExprKind::Ident(Name::new("y")), Span::detached());
        let f = arena.alloc_expr(ExprKind::Ident(Name::new("f")), Span::detached());
        let args = arena.alloc_args([
            Arg::Pos(x),
            Arg::Named {
                name: Name::new("k"),
                expr: y,
                span: Span::detached(),
            },
        ]);
        let call = arena.alloc_expr(ExprKind::FuncCall { callee: f, args }, Span::detached());
        let mut counter = CountIdents { count: 0 };
        counter.visit_expr(call, &arena);
        assert_eq!(counter.count, 3);
    }
}
