//! Runtime values.
//!
//! [`Value`] is the closed sum of everything an expression can evaluate to.
//! Heap-backed variants (`Str`, `Array`, `Dict`, `Content`, ...) share their
//! storage through `Arc` and copy on write, so cloning a value is cheap and
//! clones are observationally independent.
//!
//! # Equality and Hashing
//!
//! Equality is structural and goes through [`ops::equal`](crate::ops::equal):
//! integers, floats and decimals compare by numeric value. Hashing respects
//! that: an integral float or decimal hashes exactly like the integer it
//! equals.

mod array;
mod cast;
mod color;
mod construct;
mod dict;
mod layout;
mod str;
mod symbol;
mod time;
mod ty;
mod version;

use std::fmt;
use std::hash::{Hash, Hasher};

use rust_decimal::prelude::ToPrimitive;
pub use rust_decimal::Decimal;

pub use self::array::Array;
pub(crate) use self::cast::mismatch;
pub use self::cast::{FromValue, Smart};
pub use self::color::Color;
pub use self::dict::Dict;
pub use self::layout::{
    Alignment, Angle, Direction, Fraction, HAlignment, Length, Ratio, Relative, VAlignment,
};
pub use self::str::{Bytes, Label, Regex, Str};
pub use self::symbol::{Symbol, SymbolTable};
pub use self::time::{Datetime, Duration};
pub use self::ty::Type;
pub use self::version::Version;

use crate::args::Args;
use crate::content::Content;
use crate::func::Func;
use crate::scope::Module;
use crate::styles::{Selector, Styles};

/// A value produced by evaluation.
#[derive(Clone, Default)]
pub enum Value {
    /// The absence of a meaningful value; collapses in joins.
    #[default]
    None,
    /// A value that a built-in resolves to something sensible.
    Auto,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Str),
    Bytes(Bytes),
    Length(Length),
    Angle(Angle),
    Ratio(Ratio),
    Relative(Relative),
    Fraction(Fraction),
    Color(Color),
    Datetime(Datetime),
    Duration(Duration),
    Decimal(Decimal),
    Version(Version),
    Symbol(Symbol),
    Label(Label),
    Array(Array),
    Dict(Dict),
    /// A captured argument bundle: `(..args) => args`.
    Args(Args),
    Content(Content),
    Func(Func),
    Type(Type),
    Module(Module),
    /// Styles produced by set and show rules.
    Styles(Styles),
    Selector(Selector),
    Regex(Regex),
    Alignment(Alignment),
    Direction(Direction),
}

impl Value {
    /// A string value.
    pub fn str(s: impl Into<Str>) -> Self {
        Value::Str(s.into())
    }

    /// The type of this value.
    pub fn ty(&self) -> Type {
        match self {
            Value::None => Type::None,
            Value::Auto => Type::Auto,
            Value::Bool(_) => Type::Bool,
            Value::Int(_) => Type::Int,
            Value::Float(_) => Type::Float,
            Value::Str(_) => Type::Str,
            Value::Bytes(_) => Type::Bytes,
            Value::Length(_) => Type::Length,
            Value::Angle(_) => Type::Angle,
            Value::Ratio(_) => Type::Ratio,
            Value::Relative(_) => Type::Relative,
            Value::Fraction(_) => Type::Fraction,
            Value::Color(_) => Type::Color,
            Value::Datetime(_) => Type::Datetime,
            Value::Duration(_) => Type::Duration,
            Value::Decimal(_) => Type::Decimal,
            Value::Version(_) => Type::Version,
            Value::Symbol(_) => Type::Symbol,
            Value::Label(_) => Type::Label,
            Value::Array(_) => Type::Array,
            Value::Dict(_) => Type::Dict,
            Value::Args(_) => Type::Args,
            Value::Content(_) => Type::Content,
            Value::Func(_) => Type::Func,
            Value::Type(_) => Type::Type,
            Value::Module(_) => Type::Module,
            Value::Styles(_) => Type::Styles,
            Value::Selector(_) => Type::Selector,
            Value::Regex(_) => Type::Regex,
            Value::Alignment(_) => Type::Alignment,
            Value::Direction(_) => Type::Direction,
        }
    }

    /// Whether the value counts as true in a condition-free position
    /// (`array.filter`, selector `where` results).
    ///
    /// Everything except `none`, `false` and empty strings, arrays and
    /// dictionaries is truthy.
    pub fn truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Dict(d) => !d.is_empty(),
            _ => true,
        }
    }

    /// Convert the value into content for insertion into markup.
    pub fn display(self) -> Content {
        match self {
            Value::None | Value::Styles(_) => Content::empty(),
            Value::Int(v) => Content::text(v.to_string()),
            Value::Float(v) => Content::text(format_float(v)),
            Value::Decimal(v) => Content::text(v.to_string()),
            Value::Str(v) => Content::text(v),
            Value::Symbol(v) => Content::text(v.get().to_string()),
            Value::Version(v) => Content::text(v.to_string()),
            Value::Content(v) => v,
            other => Content::text(other.repr()),
        }
    }

    /// The value as it would be written in code.
    pub fn repr(&self) -> String {
        match self {
            Value::None => "none".into(),
            Value::Auto => "auto".into(),
            Value::Bool(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => repr_float(*v),
            Value::Str(v) => v.repr(),
            Value::Bytes(v) => format!("{v:?}"),
            Value::Length(v) => v.to_string(),
            Value::Angle(v) => v.to_string(),
            Value::Ratio(v) => v.to_string(),
            Value::Relative(v) => v.to_string(),
            Value::Fraction(v) => v.to_string(),
            Value::Color(v) => v.to_string(),
            Value::Datetime(v) => v.to_string(),
            Value::Duration(v) => v.to_string(),
            Value::Decimal(v) => format!("decimal(\"{v}\")"),
            Value::Version(v) => v.repr(),
            Value::Symbol(v) => format!("{v:?}"),
            Value::Label(v) => v.to_string(),
            Value::Array(v) => v.repr(),
            Value::Dict(v) => v.repr(),
            Value::Args(v) => v.repr(),
            Value::Content(v) => v.repr(),
            Value::Func(v) => v.repr(),
            Value::Type(v) => v.name().into(),
            Value::Module(v) => format!("<module {}>", v.name()),
            Value::Styles(_) => "..".into(),
            Value::Selector(v) => v.repr(),
            Value::Regex(v) => format!("{v:?}"),
            Value::Alignment(v) => v.to_string(),
            Value::Direction(v) => v.to_string(),
        }
    }

    /// Try to view the value as a float, accepting integers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to view the value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to view the value as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Try to view the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        crate::ops::equal(self, other)
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Integral numbers hash alike regardless of their kind.
        if let Some(int) = integral(self) {
            Type::Int.hash(state);
            int.hash(state);
            return;
        }
        self.ty().hash(state);
        match self {
            Value::None | Value::Auto => {}
            Value::Bool(v) => v.hash(state),
            Value::Int(v) => v.hash(state),
            Value::Float(v) => hash_f64(*v, state),
            Value::Str(v) => v.hash(state),
            Value::Bytes(v) => v.hash(state),
            Value::Length(v) => v.hash(state),
            Value::Angle(v) => v.hash(state),
            Value::Ratio(v) => v.hash(state),
            Value::Relative(v) => v.hash(state),
            Value::Fraction(v) => v.hash(state),
            Value::Color(v) => v.hash(state),
            Value::Datetime(v) => v.hash(state),
            Value::Duration(v) => v.hash(state),
            Value::Decimal(v) => v.normalize().hash(state),
            Value::Version(v) => v.hash(state),
            Value::Symbol(v) => v.hash(state),
            Value::Label(v) => v.hash(state),
            Value::Array(v) => v.hash(state),
            Value::Dict(v) => v.hash(state),
            Value::Args(v) => v.hash(state),
            Value::Content(v) => v.hash(state),
            Value::Func(v) => v.hash(state),
            Value::Type(v) => v.hash(state),
            Value::Module(v) => v.hash(state),
            Value::Styles(v) => v.hash(state),
            Value::Selector(v) => v.hash(state),
            Value::Regex(v) => v.hash(state),
            Value::Alignment(v) => v.hash(state),
            Value::Direction(v) => v.hash(state),
        }
    }
}

/// The integer a numeric value equals, if it is integral.
fn integral(value: &Value) -> Option<i64> {
    match value {
        Value::Int(v) => Some(*v),
        Value::Float(v) if v.fract() == 0.0 && v.abs() < 9.2e18 => Some(*v as i64),
        Value::Decimal(v) if v.fract().is_zero() => v.to_i64(),
        _ => None,
    }
}

/// Hash a float so that `0.0` and `-0.0` collide.
pub(crate) fn hash_f64<H: Hasher>(v: f64, state: &mut H) {
    let normalized = if v == 0.0 { 0.0 } else { v };
    normalized.to_bits().hash(state);
}

/// Format a float for display: integral values without a fractional part.
pub(crate) fn format_float(v: f64) -> String {
    if v.is_nan() {
        "nan".into()
    } else if v.is_infinite() {
        let s = if v > 0.0 { "inf" } else { "-inf" };
        s.into()
    } else if v == 0.0 {
        "0".into()
    } else {
        format!("{v}")
    }
}

/// Format a float as a literal: integral values keep a `.0`.
pub(crate) fn repr_float(v: f64) -> String {
    let s = format_float(v);
    if v.is_finite() && v.fract() == 0.0 {
        format!("{s}.0")
    } else {
        s
    }
}

macro_rules! impl_from_value_variant {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }
    )*};
}

impl_from_value_variant! {
    bool => Bool,
    i64 => Int,
    f64 => Float,
    Str => Str,
    Bytes => Bytes,
    Length => Length,
    Angle => Angle,
    Ratio => Ratio,
    Relative => Relative,
    Fraction => Fraction,
    Color => Color,
    Datetime => Datetime,
    Duration => Duration,
    Decimal => Decimal,
    Version => Version,
    Symbol => Symbol,
    Label => Label,
    Array => Array,
    Dict => Dict,
    Args => Args,
    Content => Content,
    Func => Func,
    Type => Type,
    Module => Module,
    Styles => Styles,
    Selector => Selector,
    Regex => Regex,
    Alignment => Alignment,
    Direction => Direction,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v.into())
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Str(v.into())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::None, Into::into)
    }
}

impl<T: Into<Value>> From<Smart<T>> for Value {
    fn from(v: Smart<T>) -> Self {
        match v {
            Smart::Auto => Value::Auto,
            Smart::Custom(v) => v.into(),
        }
    }
}

#[cfg(test)]
mod tests;
