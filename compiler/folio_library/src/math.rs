//! The math module, consulted first inside equations.
//!
//! It holds the math element functions (`frac`, `attach`, `mat`, ...),
//! accent shorthands such as `hat(x)`, `sqrt`, text operators (`sin`,
//! `lim`), double-struck set letters and every named symbol of the `sym`
//! module, so `$alpha$` and `$arrow.r$` work without a prefix.
//!
//! `vec` is the column vector; the arrow accent is written
//! `accent(x, "\u{20d7}")`. The accents `dot` and `tilde` shadow the
//! symbols of the same name, which stay reachable as `sym.dot` and
//! `sym.tilde`.

use folio_eval::errors::{missing_argument, type_mismatch, SourceResult};
use folio_eval::value::{Symbol, Type, Value};
use folio_eval::{Args, Content, Elem, ElemKind, Func, Module, NativeFunc, ParamInfo, Scope};

use crate::symbols;

/// Build the module.
pub(crate) fn module() -> Module {
    let mut scope = Scope::new();
    symbols::define(&mut scope);

    for kind in [
        ElemKind::Frac,
        ElemKind::Root,
        ElemKind::Attach,
        ElemKind::Lr,
        ElemKind::Mat,
        ElemKind::Vec,
        ElemKind::Cases,
        ElemKind::Limits,
        ElemKind::Accent,
        ElemKind::Op,
        ElemKind::Equation,
    ] {
        scope.define(kind.name(), Func::Native(kind.func()));
    }
    scope.define("sqrt", Func::Native(&SQRT));

    define_accents(&mut scope);
    for &(name, limits) in OPERATORS {
        scope.define(name, Value::Content(operator(name, limits)));
    }
    for &(name, c) in SETS {
        scope.define(name, Value::Symbol(Symbol::single(c)));
    }

    Module::new("math", scope)
}

/// Define the accent shorthands, which are also global.
pub(crate) fn define_accents(scope: &mut Scope) {
    for &accent in ACCENTS {
        scope.define(accent.name, Func::Native(accent));
    }
}

static SQRT: NativeFunc = NativeFunc {
    name: "sqrt",
    params: &[ParamInfo::positional("radicand", &[Type::Content])],
    func: |_, _, args| {
        let span = args.span;
        let radicand = args.expect::<Content>("radicand")?;
        let root = Elem::new(ElemKind::Root)
            .spanned(span)
            .with_field("index", Value::None)
            .with_field("radicand", Value::Content(radicand));
        Ok(Value::Content(root.pack()))
    },
    element: None,
    scope: None,
};

/// Declare accent shorthands: `hat(x)` is `accent(x, "\u{302}")`.
macro_rules! accents {
    ($($static:ident => $name:literal, $mark:literal;)*) => {
        $(static $static: NativeFunc = NativeFunc {
            name: $name,
            params: &[ParamInfo::positional("base", &[Type::Content])],
            func: |_, _, args| accent(args, $mark),
            element: None,
            scope: None,
        };)*

        static ACCENTS: &[&NativeFunc] = &[$(&$static),*];
    };
}

accents! {
    GRAVE => "grave", '\u{300}';
    ACUTE => "acute", '\u{301}';
    HAT => "hat", '\u{302}';
    TILDE => "tilde", '\u{303}';
    BAR => "bar", '\u{304}';
    OVERLINE => "overline", '\u{305}';
    BREVE => "breve", '\u{306}';
    DOT => "dot", '\u{307}';
    DDOT => "ddot", '\u{308}';
}

fn accent(args: &mut Args, mark: char) -> SourceResult<Value> {
    let span = args.span;
    let Some(given) = args.eat_spanned() else {
        return Err(missing_argument("base").with_span(span));
    };
    let base = match given.v {
        Value::Symbol(symbol) => Elem::symbol(symbol.get()).pack(),
        Value::Content(content) => content,
        Value::Str(text) => Content::text(text),
        other => {
            return Err(type_mismatch("content", other.ty().long_name()).with_span(given.span));
        }
    };
    let elem = Elem::new(ElemKind::Accent)
        .spanned(span)
        .with_field("base", Value::Content(base))
        .with_field("accent", Value::str(mark));
    Ok(Value::Content(elem.pack()))
}

/// Text operators and whether they take their attachments as limits.
const OPERATORS: &[(&str, bool)] = &[
    ("arccos", false),
    ("arcsin", false),
    ("arctan", false),
    ("arg", false),
    ("cos", false),
    ("cosh", false),
    ("cot", false),
    ("deg", false),
    ("det", true),
    ("dim", false),
    ("exp", false),
    ("gcd", true),
    ("inf", true),
    ("ker", false),
    ("lg", false),
    ("lim", true),
    ("liminf", true),
    ("limsup", true),
    ("ln", false),
    ("log", false),
    ("max", true),
    ("min", true),
    ("mod", false),
    ("sec", false),
    ("sin", false),
    ("sinh", false),
    ("sup", true),
    ("tan", false),
    ("tanh", false),
];

fn operator(name: &str, limits: bool) -> Content {
    Elem::new(ElemKind::Op)
        .with_field("text", Value::Content(Content::text(name)))
        .with_field("limits", Value::Bool(limits))
        .pack()
}

/// Double-struck letters for the number sets.
const SETS: &[(&str, char)] = &[
    ("NN", 'ℕ'),
    ("ZZ", 'ℤ'),
    ("QQ", 'ℚ'),
    ("RR", 'ℝ'),
    ("CC", 'ℂ'),
];

#[cfg(test)]
mod tests;
