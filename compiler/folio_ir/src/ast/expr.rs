//! Expression nodes.
//!
//! Markup, code and math share one node type: a markup document is an
//! `ExprKind::Markup` list whose children are markup nodes, embedded code
//! (`#expr`) appears inline as ordinary code nodes, and equations hold an
//! `ExprKind::Math` list.

use std::fmt;

use super::{
    ArgRange, ArrayItemRange, BinaryOp, ClosureId, DictItemRange, ExprRange, Imports, LetKind,
    PatternId, UnaryOp, Unit,
};
use crate::{Name, Span};

/// Index of an expression in an [`ExprArena`](crate::ExprArena).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// An expression with its source location.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// Expression variants.
///
/// Children are stored as indices into the owning arena. Floats are stored
/// as their bit patterns.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    // Markup
    /// A sequence of markup nodes.
    Markup(ExprRange),
    /// Plain text, including inline spaces between words.
    Text(Name),
    /// Whitespace containing at most one newline.
    Space,
    /// A forced line break: `\`.
    Linebreak,
    /// A paragraph break: a blank line.
    Parbreak,
    /// An escape sequence: `\#`, `\u{1F600}`.
    Escape(char),
    /// A shorthand for a Unicode codepoint: `~`, `--`, `...`.
    Shorthand(char),
    /// A smart quote: `'` or `"`.
    SmartQuote { double: bool },
    /// Strong content: `*Strong*`.
    Strong(ExprId),
    /// Emphasized content: `_Emphasized_`.
    Emph(ExprId),
    /// Raw text: `` `code` `` or fenced with a language tag.
    Raw {
        text: Name,
        lang: Option<Name>,
        block: bool,
    },
    /// A hyperlink: `https://example.com`.
    Link(Name),
    /// A label: `<intro>`.
    Label(Name),
    /// A reference: `@target`, optionally with `[supplement]`.
    Ref {
        target: Name,
        supplement: Option<ExprId>,
    },
    /// A section heading: `= Introduction`.
    Heading { level: u8, body: ExprId },
    /// A bullet list item: `- ...`.
    ListItem(ExprId),
    /// A numbered list item: `+ ...` or `1. ...`.
    EnumItem { number: Option<u64>, body: ExprId },
    /// A term list item: `/ Term: Details`.
    TermItem { term: ExprId, description: ExprId },
    /// A mathematical equation: `$x$`, `$ x^2 $`.
    Equation { block: bool, body: ExprId },

    // Math
    /// A sequence of math nodes.
    Math(ExprRange),
    /// An identifier in math: `pi`, `x`.
    MathIdent(Name),
    /// Literal math text that is not an identifier: digits, punctuation.
    MathText(Name),
    /// A math shorthand: `->`, `<=`.
    MathShorthand(char),
    /// An alignment point: `&`.
    MathAlignPoint,
    /// Matched delimiters around content: `(x + 1)`.
    MathDelimited {
        open: ExprId,
        body: ExprId,
        close: ExprId,
    },
    /// A base with optional attachments and prime marks: `a_1^2`, `f'`.
    MathAttach {
        base: ExprId,
        bottom: Option<ExprId>,
        top: Option<ExprId>,
        primes: u32,
    },
    /// A fraction: `x/2`.
    MathFrac { num: ExprId, denom: ExprId },
    /// A root: `√x`, `∛x`.
    MathRoot { index: Option<u8>, radicand: ExprId },

    // Code
    /// An identifier: `left`.
    Ident(Name),
    /// The `none` literal.
    None,
    /// The `auto` literal.
    Auto,
    /// A boolean literal.
    Bool(bool),
    /// An integer literal.
    Int(i64),
    /// A floating-point literal, stored as bits.
    Float(u64),
    /// A numeric literal with a unit, stored as bits: `12pt`, `50%`.
    Numeric { value: u64, unit: Unit },
    /// A string literal with escapes resolved.
    Str(Name),
    /// A code block: `{ let x = 1; x + 2 }`.
    CodeBlock(ExprRange),
    /// A content block: `[*Hi* there!]`; the body is a markup node.
    ContentBlock(ExprId),
    /// A grouped expression: `(1 + 2)`.
    Parenthesized(ExprId),
    /// An array: `(1, "hi", 12cm)`.
    Array(ArrayItemRange),
    /// A dictionary: `(thickness: 3pt, dash: "solid")`.
    Dict(DictItemRange),
    /// A unary operation: `-x`.
    Unary { op: UnaryOp, expr: ExprId },
    /// A binary operation, including assignments: `a + b`, `x += 1`.
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    /// A field access: `properties.age`.
    FieldAccess { target: ExprId, field: Name },
    /// An invocation of a function or method: `f(x, y)`.
    FuncCall { callee: ExprId, args: ArgRange },
    /// A closure: `(x, y) => z`.
    Closure(ClosureId),
    /// A let binding: `let x = 1`, `let f(x) = x`.
    Let {
        kind: LetKind,
        init: Option<ExprId>,
    },
    /// A destructuring assignment: `(x, y) = (1, 2)`.
    DestructAssign { pattern: PatternId, value: ExprId },
    /// A set rule: `set text(14pt)`, optionally conditional.
    Set {
        target: ExprId,
        args: ArgRange,
        condition: Option<ExprId>,
    },
    /// A show rule: `show heading: it => emph(it.body)`.
    Show {
        selector: Option<ExprId>,
        transform: ExprId,
    },
    /// A contextual expression: `context text.lang`.
    Contextual(ExprId),
    /// An if-else conditional.
    Conditional {
        condition: ExprId,
        if_body: ExprId,
        else_body: Option<ExprId>,
    },
    /// A while loop.
    While { condition: ExprId, body: ExprId },
    /// A for loop.
    For {
        pattern: PatternId,
        iterable: ExprId,
        body: ExprId,
    },
    /// A module import: `import "utils.fol": a, b as c`.
    Import {
        source: ExprId,
        new_name: Option<Name>,
        imports: Imports,
    },
    /// A module include: `include "chapter1.fol"`.
    Include(ExprId),
    /// `break`.
    Break,
    /// `continue`.
    Continue,
    /// `return`, optionally with a value.
    Return(Option<ExprId>),
}

impl ExprKind {
    /// Whether this node belongs to the markup layer.
    pub fn is_markup(&self) -> bool {
        matches!(
            self,
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
                | ExprKind::Label(_)
                | ExprKind::Ref { .. }
                | ExprKind::Heading { .. }
                | ExprKind::ListItem(_)
                | ExprKind::EnumItem { .. }
                | ExprKind::TermItem { .. }
                | ExprKind::Equation { .. }
        )
    }

    /// Whether evaluating this node can only ever yield the same value.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            ExprKind::None
                | ExprKind::Auto
                | ExprKind::Bool(_)
                | ExprKind::Int(_)
                | ExprKind::Float(_)
                | ExprKind::Numeric { .. }
                | ExprKind::Str(_)
        )
    }
}
