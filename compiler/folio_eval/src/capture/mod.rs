//! Free-variable analysis for closures and `context` expressions.
//!
//! [`CapturesVisitor`] walks a closure's parameters and body, tracking the
//! names the closure binds itself, and records every other identifier that
//! resolves to a *local* binding of the defining scopes. Library names are
//! never captured: a closure looks them up in the library at call time.
//!
//! The result is the minimal environment the closure needs; the defining
//! frames themselves are never kept alive.

use folio_ir::visitor::{walk_expr, Visitor};
use folio_ir::{
    ClosureId, ExprArena, ExprId, ExprKind, Imports, LetKind, Name, Param, PatternId, PatternItem,
    PatternKind,
};
use rustc_hash::FxHashSet;

use crate::scope::{Capturer, Scope, Scopes};

/// Collects the captures of a closure or context body.
pub struct CapturesVisitor<'a> {
    /// The scopes the closure is defined in.
    external: Option<&'a Scopes<'a>>,
    /// Names bound inside the analyzed code, innermost frame last.
    internal: Vec<FxHashSet<Name>>,
    captures: Scope,
    capturer: Capturer,
}

impl<'a> CapturesVisitor<'a> {
    pub fn new(external: Option<&'a Scopes<'a>>, capturer: Capturer) -> Self {
        CapturesVisitor {
            external,
            internal: vec![FxHashSet::default()],
            captures: Scope::new(),
            capturer,
        }
    }

    /// The captured bindings.
    pub fn finish(self) -> Scope {
        self.captures
    }

    /// Analyze a closure definition: defaults, then parameters and body.
    pub fn visit_closure_def(&mut self, id: ClosureId, arena: &ExprArena) {
        let closure = arena.closure(id);

        // Defaults see the defining scope, not sibling parameters.
        for param in arena.params(closure.params) {
            if let Param::Named { default, .. } = *param {
                self.visit_expr(default, arena);
            }
        }

        self.enter();
        if let Some(name) = closure.name {
            self.bind(name);
        }
        for param in arena.params(closure.params) {
            match *param {
                Param::Pos(pattern) => self.bind_pattern(pattern, arena),
                Param::Named { name, .. } => self.bind(name),
                Param::Sink { name: Some(name), .. } => self.bind(name),
                Param::Sink { name: None, .. } => {}
            }
        }
        self.visit_expr(closure.body, arena);
        self.exit();
    }

    fn enter(&mut self) {
        self.internal.push(FxHashSet::default());
    }

    fn exit(&mut self) {
        self.internal.pop();
    }

    fn bind(&mut self, name: Name) {
        if let Some(frame) = self.internal.last_mut() {
            frame.insert(name);
        }
    }

    fn is_internal(&self, name: Name) -> bool {
        self.internal.iter().any(|frame| frame.contains(&name))
    }

    /// Record `name` if it refers to a local binding of the defining scope.
    fn capture(&mut self, name: Name) {
        if self.is_internal(name) {
            return;
        }
        let Some(binding) = self.external.and_then(|scopes| scopes.local(name)) else {
            return;
        };
        self.captures.define_captured(name, binding, self.capturer);
    }

    /// Bind the names a `let`, `for` or parameter pattern introduces.
    fn bind_pattern(&mut self, id: PatternId, arena: &ExprArena) {
        match arena.pattern(id).kind {
            PatternKind::Normal(expr) => match arena.kind(expr) {
                ExprKind::Ident(name) => self.bind(name),
                _ => self.visit_expr(expr, arena),
            },
            PatternKind::Placeholder => {}
            PatternKind::Parenthesized(inner) => self.bind_pattern(inner, arena),
            PatternKind::Destructuring(items) => {
                for item in arena.pattern_items(items) {
                    match *item {
                        PatternItem::Pattern(pattern) | PatternItem::Named { pattern, .. } => {
                            self.bind_pattern(pattern, arena);
                        }
                        PatternItem::Spread {
                            target: Some(target),
                            ..
                        } => match arena.kind(target) {
                            ExprKind::Ident(name) => self.bind(name),
                            _ => self.visit_expr(target, arena),
                        },
                        PatternItem::Spread { target: None, .. } => {}
                    }
                }
            }
        }
    }
}

impl Visitor for CapturesVisitor<'_> {
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
        match arena.kind(id) {
            ExprKind::Ident(name) | ExprKind::MathIdent(name) => self.capture(name),

            ExprKind::CodeBlock(_) | ExprKind::ContentBlock(_) => {
                self.enter();
                walk_expr(self, id, arena);
                self.exit();
            }

            ExprKind::Let { kind, init } => {
                if let Some(init) = init {
                    self.visit_expr(init, arena);
                }
                match kind {
                    LetKind::Normal(pattern) => self.bind_pattern(pattern, arena),
                    LetKind::Closure(name) => self.bind(name),
                }
            }

            ExprKind::For {
                pattern,
                iterable,
                body,
            } => {
                self.visit_expr(iterable, arena);
                self.enter();
                self.bind_pattern(pattern, arena);
                self.visit_expr(body, arena);
                self.exit();
            }

            ExprKind::Import {
                source,
                new_name,
                imports,
            } => {
                self.visit_expr(source, arena);
                if let Some(name) = new_name {
                    self.bind(name);
                }
                if let Imports::Items(items) = imports {
                    for item in arena.import_items(items) {
                        self.bind(item.bound_name());
                    }
                }
            }

            _ => walk_expr(self, id, arena),
        }
    }

    fn visit_closure(&mut self, id: ClosureId, arena: &ExprArena) {
        self.visit_closure_def(id, arena);
    }
}

#[cfg(test)]
mod tests;
