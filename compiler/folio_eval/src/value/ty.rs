//! First-class type objects.

use std::fmt;

/// The type of a value.
///
/// Types are values themselves (`type(1) == int`) and callable as
/// constructors; see [`Type::construct`](super::construct).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Type {
    None,
    Auto,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    Length,
    Angle,
    Ratio,
    Relative,
    Fraction,
    Color,
    Datetime,
    Duration,
    Decimal,
    Version,
    Symbol,
    Label,
    Array,
    Dict,
    Args,
    Content,
    Func,
    Type,
    Module,
    Styles,
    Selector,
    Regex,
    Alignment,
    Direction,
}

impl Type {
    /// Every type, in declaration order.
    pub const ALL: &'static [Type] = &[
        Type::None,
        Type::Auto,
        Type::Bool,
        Type::Int,
        Type::Float,
        Type::Str,
        Type::Bytes,
        Type::Length,
        Type::Angle,
        Type::Ratio,
        Type::Relative,
        Type::Fraction,
        Type::Color,
        Type::Datetime,
        Type::Duration,
        Type::Decimal,
        Type::Version,
        Type::Symbol,
        Type::Label,
        Type::Array,
        Type::Dict,
        Type::Args,
        Type::Content,
        Type::Func,
        Type::Type,
        Type::Module,
        Type::Styles,
        Type::Selector,
        Type::Regex,
        Type::Alignment,
        Type::Direction,
    ];

    /// The name under which the type is bound in the prelude.
    pub const fn name(self) -> &'static str {
        match self {
            Type::None => "none",
            Type::Auto => "auto",
            Type::Bool => "bool",
            Type::Int => "int",
            Type::Float => "float",
            Type::Str => "str",
            Type::Bytes => "bytes",
            Type::Length => "length",
            Type::Angle => "angle",
            Type::Ratio => "ratio",
            Type::Relative => "relative",
            Type::Fraction => "fraction",
            Type::Color => "color",
            Type::Datetime => "datetime",
            Type::Duration => "duration",
            Type::Decimal => "decimal",
            Type::Version => "version",
            Type::Symbol => "symbol",
            Type::Label => "label",
            Type::Array => "array",
            Type::Dict => "dictionary",
            Type::Args => "arguments",
            Type::Content => "content",
            Type::Func => "function",
            Type::Type => "type",
            Type::Module => "module",
            Type::Styles => "styles",
            Type::Selector => "selector",
            Type::Regex => "regex",
            Type::Alignment => "alignment",
            Type::Direction => "direction",
        }
    }

    /// Look a type up by its prelude name.
    pub fn from_name(name: &str) -> Option<Type> {
        Type::ALL.iter().copied().find(|ty| ty.name() == name)
    }

    /// Long name used in diagnostics (`integer` rather than `int`).
    pub const fn long_name(self) -> &'static str {
        match self {
            Type::Bool => "boolean",
            Type::Int => "integer",
            Type::Str => "string",
            Type::Func => "function",
            other => other.name(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
