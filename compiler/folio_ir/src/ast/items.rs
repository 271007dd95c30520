//! Side-table items referenced from expressions: arguments, collection
//! items, closure parameters, binding patterns and imports.

use std::fmt;

use super::{ExprId, ParamRange, PatternItemRange};
use crate::{Name, Span};

/// An argument to a function call or set rule.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Arg {
    /// A positional argument: `12`.
    Pos(ExprId),
    /// A named argument: `draw: false`.
    Named { name: Name, expr: ExprId, span: Span },
    /// A spread argument: `..things`.
    Spread { expr: ExprId, span: Span },
}

/// An item of an array literal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ArrayItem {
    Pos(ExprId),
    Spread { expr: ExprId, span: Span },
}

/// An item of a dictionary literal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DictItem {
    /// `name: value`.
    Named { name: Name, expr: ExprId, span: Span },
    /// `"key": value` or `(expr): value`.
    Keyed {
        key: ExprId,
        expr: ExprId,
        span: Span,
    },
    /// `..other`.
    Spread { expr: ExprId, span: Span },
}

/// A closure parameter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Param {
    /// A positional parameter, possibly destructuring: `x`, `(a, b)`.
    Pos(PatternId),
    /// A named parameter with a default: `draw: false`.
    Named {
        name: Name,
        default: ExprId,
        span: Span,
    },
    /// An argument sink: `..args` or a bare `..`.
    Sink { name: Option<Name>, span: Span },
}

/// Index of a closure definition in the arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct ClosureId(u32);

impl ClosureId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ClosureId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A closure definition: `(x, y) => x + y` or the function of `let f(x) = ..`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ClosureDef {
    /// The name for recursive self-reference (`let f(x) = ..`).
    pub name: Option<Name>,
    pub params: ParamRange,
    pub body: ExprId,
    pub span: Span,
}

/// Index of a pattern in the arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct PatternId(u32);

impl PatternId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        PatternId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PatternId({})", self.0)
    }
}

/// A binding pattern with its source location.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

/// Binding pattern variants.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PatternKind {
    /// A single expression: an identifier in bindings, any assignable
    /// expression in destructuring assignments.
    Normal(ExprId),
    /// `_`.
    Placeholder,
    /// A pattern in parentheses: `(x)`.
    Parenthesized(PatternId),
    /// A destructuring pattern: `(x, _, ..y)`, `(a: x, b)`.
    Destructuring(PatternItemRange),
}

/// An item of a destructuring pattern.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PatternItem {
    /// A positional sub-pattern.
    Pattern(PatternId),
    /// A named sub-pattern: `key: pattern`.
    Named {
        name: Name,
        pattern: PatternId,
        span: Span,
    },
    /// A spread: `..rest` binds the remainder, a bare `..` skips it.
    Spread { target: Option<ExprId>, span: Span },
}

/// What a let binding binds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LetKind {
    /// `let pattern = init`.
    Normal(PatternId),
    /// `let name(params) = body`; the init is the closure expression.
    Closure(Name),
}

/// The item list of an import.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Imports {
    /// `import "x.fol"` binds the module under its file stem (or `as` name).
    None,
    /// `import "x.fol": *`.
    Wildcard,
    /// `import "x.fol": a, b as c`.
    Items(super::ImportItemRange),
}

/// A single imported name, possibly renamed.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ImportItem {
    pub name: Name,
    pub rename: Option<Name>,
    pub span: Span,
}

impl ImportItem {
    /// The name the item is bound under.
    pub fn bound_name(&self) -> Name {
        self.rename.unwrap_or(self.name)
    }
}
