//! Casting values into Rust types.
//!
//! Natives extract their arguments through [`FromValue`]; a failed cast
//! yields a `TypeMismatch` naming what was accepted. The caller attaches
//! the argument's span.

use super::{
    Alignment, Angle, Array, Bytes, Color, Datetime, Decimal, Dict, Direction, Duration,
    Fraction, Label, Length, Ratio, Regex, Relative, Str, Symbol, Type, Value, Version,
};
use crate::args::Args;
use crate::content::Content;
use crate::errors::{constructor_error, type_mismatch, EvalError, SourceResult};
use crate::func::Func;
use crate::scope::Module;
use crate::styles::Styles;

/// A type that can be extracted from a [`Value`].
pub trait FromValue: Sized {
    /// What the cast accepts, as shown in errors (`"integer"`).
    fn describe() -> String;

    fn from_value(value: Value) -> SourceResult<Self>;
}

/// The mismatch error for a value that does not fit `T`.
#[cold]
pub(crate) fn mismatch<T: FromValue>(value: &Value) -> EvalError {
    type_mismatch(T::describe(), value.ty().long_name())
}

impl FromValue for Value {
    fn describe() -> String {
        "any".into()
    }

    fn from_value(value: Value) -> SourceResult<Self> {
        Ok(value)
    }
}

/// Implement `FromValue` for types held directly by one variant.
macro_rules! cast_variant {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl FromValue for $ty {
            fn describe() -> String {
                Type::$variant.long_name().into()
            }

            fn from_value(value: Value) -> SourceResult<Self> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(mismatch::<Self>(&other)),
                }
            }
        }
    )*};
}

cast_variant! {
    bool => Bool,
    i64 => Int,
    Bytes => Bytes,
    Length => Length,
    Angle => Angle,
    Ratio => Ratio,
    Fraction => Fraction,
    Color => Color,
    Datetime => Datetime,
    Duration => Duration,
    Version => Version,
    Symbol => Symbol,
    Label => Label,
    Array => Array,
    Dict => Dict,
    Args => Args,
    Func => Func,
    Type => Type,
    Module => Module,
    Styles => Styles,
    Regex => Regex,
    Alignment => Alignment,
    Direction => Direction,
}

impl FromValue for f64 {
    fn describe() -> String {
        "float".into()
    }

    fn from_value(value: Value) -> SourceResult<Self> {
        match value {
            Value::Int(v) => Ok(v as f64),
            Value::Float(v) => Ok(v),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for usize {
    fn describe() -> String {
        "integer".into()
    }

    fn from_value(value: Value) -> SourceResult<Self> {
        match value {
            Value::Int(v) => {
                usize::try_from(v).map_err(|_| constructor_error("number must be at least zero"))
            }
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for u32 {
    fn describe() -> String {
        "integer".into()
    }

    fn from_value(value: Value) -> SourceResult<Self> {
        match value {
            Value::Int(v) => u32::try_from(v)
                .map_err(|_| constructor_error("number must be between 0 and 4294967295")),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for Decimal {
    fn describe() -> String {
        "decimal".into()
    }

    fn from_value(value: Value) -> SourceResult<Self> {
        match value {
            Value::Int(v) => Ok(Decimal::from(v)),
            Value::Decimal(v) => Ok(v),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for Str {
    fn describe() -> String {
        "string".into()
    }

    fn from_value(value: Value) -> SourceResult<Self> {
        match value {
            Value::Str(v) => Ok(v),
            Value::Symbol(v) => Ok(Str::from(v.get())),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for char {
    fn describe() -> String {
        "string".into()
    }

    fn from_value(value: Value) -> SourceResult<Self> {
        let s = Str::from_value(value)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(constructor_error("expected exactly one character")),
        }
    }
}

impl FromValue for Relative {
    fn describe() -> String {
        "relative length".into()
    }

    fn from_value(value: Value) -> SourceResult<Self> {
        match value {
            Value::Relative(v) => Ok(v),
            Value::Length(v) => Ok(v.into()),
            Value::Ratio(v) => Ok(v.into()),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for Content {
    fn describe() -> String {
        "content".into()
    }

    fn from_value(value: Value) -> SourceResult<Self> {
        match value {
            Value::None
            | Value::Int(_)
            | Value::Float(_)
            | Value::Decimal(_)
            | Value::Str(_)
            | Value::Symbol(_)
            | Value::Content(_) => Ok(value.display()),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn describe() -> String {
        format!("{} or none", T::describe())
    }

    fn from_value(value: Value) -> SourceResult<Self> {
        match value {
            Value::None => Ok(None),
            other => T::from_value(other)
                .map(Some)
                .map_err(|err| widen::<Self>(err)),
        }
    }
}

/// A value that may be left to a built-in's judgement.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Smart<T> {
    Auto,
    Custom(T),
}

impl<T> Smart<T> {
    pub fn is_auto(&self) -> bool {
        matches!(self, Smart::Auto)
    }

    pub fn custom(self) -> Option<T> {
        match self {
            Smart::Auto => None,
            Smart::Custom(v) => Some(v),
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.custom().unwrap_or(default)
    }
}

impl<T> Default for Smart<T> {
    fn default() -> Self {
        Smart::Auto
    }
}

impl<T: FromValue> FromValue for Smart<T> {
    fn describe() -> String {
        format!("{} or auto", T::describe())
    }

    fn from_value(value: Value) -> SourceResult<Self> {
        match value {
            Value::Auto => Ok(Smart::Auto),
            other => T::from_value(other)
                .map(Smart::Custom)
                .map_err(|err| widen::<Self>(err)),
        }
    }
}

/// Rewrite an inner mismatch so the message lists the wrapper's options.
fn widen<T: FromValue>(err: EvalError) -> EvalError {
    match err.kind {
        crate::errors::EvalErrorKind::TypeMismatch { got, .. } => type_mismatch(T::describe(), got),
        _ => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn float_accepts_integers() {
        assert_eq!(f64::from_value(Value::Int(2)).ok(), Some(2.0));
    }

    #[test]
    fn mismatch_names_long_type() {
        let err = i64::from_value(Value::str("x")).err();
        assert_eq!(
            err.map(|e| e.message),
            Some("expected integer, found string".to_string())
        );
    }

    #[test]
    fn option_lists_none_in_message() {
        let err = Option::<i64>::from_value(Value::Bool(true)).err();
        assert_eq!(
            err.map(|e| e.message),
            Some("expected integer or none, found boolean".to_string())
        );
        assert_eq!(Option::<i64>::from_value(Value::None).ok(), Some(None));
    }

    #[test]
    fn smart_passes_auto_through() {
        assert_eq!(
            Smart::<i64>::from_value(Value::Auto).ok(),
            Some(Smart::Auto)
        );
        assert_eq!(
            Smart::<i64>::from_value(Value::Int(3)).ok(),
            Some(Smart::Custom(3))
        );
    }

    #[test]
    fn content_displays_strings() {
        let content = Content::from_value(Value::str("hi")).ok();
        assert_eq!(content.map(|c| c.plain_text()), Some("hi".to_string()));
    }

    #[test]
    fn single_character() {
        assert_eq!(char::from_value(Value::str(";")).ok(), Some(';'));
        assert!(char::from_value(Value::str(";;")).is_err());
    }
}
