//! Types as constructors: `int("12")`, `str(255, base: 16)`,
//! `datetime(year: 2024, month: 5, day: 17)`.
//!
//! Calling a type converts its single argument into a value of that type,
//! or builds one from named parts. Types that have no sensible conversion
//! (`length`, `content`, ...) refuse to be called.

use folio_ir::Spanned;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use super::{
    format_float, mismatch, Array, Bytes, Color, Datetime, Decimal, Dict, Duration, FromValue,
    Label, Ratio, Regex, Smart, Str, Symbol, Type, Value, Version,
};
use crate::args::Args;
use crate::engine::{Context, Engine};
use crate::errors::{constructor_error, show_rule_error, type_mismatch, At, EvalError, SourceResult};
use crate::func::{Func, NativeFunc, ParamInfo};
use crate::scope::Scope;
use crate::styles::Selector;

impl Type {
    /// Call the type with `args`, consuming all of them.
    pub fn construct(self, mut args: Args) -> SourceResult<Value> {
        let span = args.span;
        let value = match self {
            Type::Int => int(&mut args)?,
            Type::Float => float(&mut args)?,
            Type::Str => string(&mut args)?,
            Type::Bool => boolean(&mut args)?,
            Type::Bytes => bytes(&mut args)?,
            Type::Array => array(&mut args)?,
            Type::Dict => dictionary(&mut args)?,
            Type::Label => label(&mut args)?,
            Type::Version => version(&mut args)?,
            Type::Datetime => datetime(&mut args)?,
            Type::Duration => duration(&mut args)?,
            Type::Decimal => decimal(&mut args)?,
            Type::Regex => regex(&mut args)?,
            Type::Selector => Value::Selector(args.expect::<Selector>("target")?),
            Type::Symbol => symbol(&mut args)?,
            Type::Type => Value::Type(args.expect::<Value>("value")?.ty()),
            Type::Args => Value::Args(args.take()),
            Type::Color => color(&mut args)?,
            other => {
                return Err(constructor_error(format!(
                    "type {} cannot be called as a constructor",
                    other.name()
                ))
                .with_span(span))
            }
        };
        args.finish()?;
        Ok(value)
    }

    /// Definitions scoped under the type, reachable through field access.
    pub fn scope(self) -> Option<Scope> {
        let mut scope = Scope::new();
        match self {
            Type::Str => {
                scope.define("from-unicode", Func::Native(&FROM_UNICODE));
                scope.define("to-unicode", Func::Native(&TO_UNICODE));
            }
            Type::Datetime => scope.define("today", Func::Native(&TODAY)),
            Type::Color => {
                scope.define("rgb", Func::Native(&RGB));
                scope.define("luma", Func::Native(&LUMA));
            }
            _ => return None,
        }
        Some(scope)
    }
}

fn int(args: &mut Args) -> SourceResult<Value> {
    let Some(value) = args.eat_spanned() else {
        return Err(crate::errors::missing_argument("value").with_span(args.span));
    };
    let span = value.span;
    let int = match value.v {
        Value::Bool(v) => i64::from(v),
        Value::Int(v) => v,
        Value::Float(v) => {
            let truncated = v.trunc();
            if !truncated.is_finite() || truncated.abs() >= i64::MAX as f64 {
                return Err(constructor_error("number does not fit into a 64-bit integer").with_span(span));
            }
            truncated as i64
        }
        Value::Decimal(v) => v
            .trunc()
            .to_i64()
            .ok_or_else(|| constructor_error("number does not fit into a 64-bit integer"))
            .at(span)?,
        Value::Str(s) => parse_int(&s).at(span)?,
        other => {
            return Err(type_mismatch("boolean, integer, float, decimal or string", other.ty().long_name())
                .with_span(span))
        }
    };
    Ok(Value::Int(int))
}

fn parse_int(s: &str) -> SourceResult<i64> {
    let normalized = s.trim().replace('\u{2212}', "-");
    normalized
        .parse::<i64>()
        .map_err(|_| constructor_error(format!("invalid integer: {s}")))
}

fn float(args: &mut Args) -> SourceResult<Value> {
    let Some(value) = args.eat_spanned() else {
        return Err(crate::errors::missing_argument("value").with_span(args.span));
    };
    let span = value.span;
    let float = match value.v {
        Value::Bool(v) => f64::from(u8::from(v)),
        Value::Int(v) => v as f64,
        Value::Float(v) => v,
        Value::Ratio(v) => v.0,
        Value::Decimal(v) => v.to_f64().unwrap_or(f64::NAN),
        Value::Str(s) => {
            let normalized = s.trim().replace('\u{2212}', "-");
            normalized
                .parse::<f64>()
                .map_err(|_| constructor_error(format!("invalid float: {s}")))
                .at(span)?
        }
        other => {
            return Err(type_mismatch(
                "boolean, integer, float, decimal, ratio or string",
                other.ty().long_name(),
            )
            .with_span(span))
        }
    };
    Ok(Value::Float(float))
}

fn string(args: &mut Args) -> SourceResult<Value> {
    let base = args.named::<i64>("base")?;
    let Some(value) = args.eat_spanned() else {
        return Err(crate::errors::missing_argument("value").with_span(args.span));
    };
    let span = value.span;
    let out: Str = match value.v {
        Value::Int(v) => match base {
            Some(base) => format_radix(v, base).at(span)?.into(),
            None => v.to_string().into(),
        },
        _ if base.is_some() => {
            return Err(constructor_error("base is only supported for integers").with_span(span))
        }
        Value::Float(v) => format_float(v).into(),
        Value::Decimal(v) => v.to_string().into(),
        Value::Str(v) => v,
        Value::Symbol(v) => Str::from(v.get()),
        Value::Label(v) => v.as_str().into(),
        Value::Version(v) => v.to_string().into(),
        Value::Type(v) => v.name().into(),
        Value::Bytes(v) => std::str::from_utf8(v.as_slice())
            .map_err(|_| constructor_error("bytes are not valid utf-8"))
            .at(span)?
            .into(),
        other => {
            return Err(type_mismatch(
                "integer, float, decimal, version, bytes, label, type or string",
                other.ty().long_name(),
            )
            .with_span(span))
        }
    };
    Ok(Value::Str(out))
}

/// Format an integer in a base between 2 and 36.
fn format_radix(mut n: i64, base: i64) -> SourceResult<String> {
    if !(2..=36).contains(&base) {
        return Err(constructor_error("base must be between 2 and 36"));
    }
    if n == 0 {
        return Ok("0".into());
    }
    let negative = n < 0;
    let mut digits = Vec::new();
    while n != 0 {
        let digit = (n % base).unsigned_abs();
        digits.push(char::from_digit(digit as u32, base as u32).unwrap_or('?'));
        n /= base;
    }
    if negative {
        digits.push('-');
    }
    Ok(digits.into_iter().rev().collect())
}

fn boolean(args: &mut Args) -> SourceResult<Value> {
    let Some(value) = args.eat_spanned() else {
        return Err(crate::errors::missing_argument("value").with_span(args.span));
    };
    match value.v {
        Value::Bool(v) => Ok(Value::Bool(v)),
        Value::Str(s) if s.as_str() == "true" => Ok(Value::Bool(true)),
        Value::Str(s) if s.as_str() == "false" => Ok(Value::Bool(false)),
        Value::Str(s) => Err(constructor_error(format!("invalid boolean: {s}")).with_span(value.span)),
        other => Err(type_mismatch("boolean or string", other.ty().long_name()).with_span(value.span)),
    }
}

fn bytes(args: &mut Args) -> SourceResult<Value> {
    let Some(value) = args.eat_spanned() else {
        return Err(crate::errors::missing_argument("value").with_span(args.span));
    };
    let span = value.span;
    let out = match value.v {
        Value::Str(s) => Bytes::from(s.as_bytes()),
        Value::Bytes(b) => b,
        Value::Array(items) => {
            let mut buf = Vec::with_capacity(items.len());
            for item in items.iter() {
                let byte = match item {
                    Value::Int(v) => u8::try_from(*v).ok(),
                    _ => None,
                };
                match byte {
                    Some(byte) => buf.push(byte),
                    None => {
                        return Err(constructor_error("array must only contain integers between 0 and 255")
                            .with_span(span))
                    }
                }
            }
            Bytes::from(buf)
        }
        other => {
            return Err(type_mismatch("string, bytes or array", other.ty().long_name()).with_span(span))
        }
    };
    Ok(Value::Bytes(out))
}

fn array(args: &mut Args) -> SourceResult<Value> {
    let Some(value) = args.eat_spanned() else {
        return Err(crate::errors::missing_argument("value").with_span(args.span));
    };
    let out: Array = match value.v {
        Value::Array(items) => items,
        Value::Bytes(b) => b.iter().map(|byte| Value::Int(i64::from(*byte))).collect(),
        Value::Version(v) => v.components().iter().map(|c| Value::Int(i64::from(*c))).collect(),
        Value::Args(a) => a.to_pos(),
        other => {
            return Err(type_mismatch("array, bytes, version or arguments", other.ty().long_name())
                .with_span(value.span))
        }
    };
    Ok(Value::Array(out))
}

fn dictionary(args: &mut Args) -> SourceResult<Value> {
    let Some(value) = args.eat_spanned() else {
        return Err(crate::errors::missing_argument("value").with_span(args.span));
    };
    let out: Dict = match value.v {
        Value::Dict(d) => d,
        Value::Module(m) => m
            .scope()
            .iter()
            .map(|(name, binding)| (Str::from(name), binding.read().clone()))
            .collect(),
        Value::Args(a) => a.to_named(),
        other => {
            return Err(type_mismatch("dictionary, module or arguments", other.ty().long_name())
                .with_span(value.span))
        }
    };
    Ok(Value::Dict(out))
}

fn label(args: &mut Args) -> SourceResult<Value> {
    let name: Str = args.expect("name")?;
    if name.is_empty() {
        return Err(constructor_error("label name must not be empty").with_span(args.span));
    }
    Ok(Value::Label(Label::new(&name)))
}

fn version(args: &mut Args) -> SourceResult<Value> {
    let mut components = Vec::new();
    for item in args.all_spanned() {
        match item.v {
            Value::Int(v) => components.push(u32::from_value(Value::Int(v)).at(item.span)?),
            Value::Array(parts) => {
                for part in parts {
                    components.push(u32::from_value(part).at(item.span)?);
                }
            }
            other => {
                return Err(type_mismatch("integer or array", other.ty().long_name()).with_span(item.span))
            }
        }
    }
    Ok(Value::Version(Version::new(components)))
}

fn datetime(args: &mut Args) -> SourceResult<Value> {
    let year = args.named::<i64>("year")?;
    let month = args.named::<u32>("month")?;
    let day = args.named::<u32>("day")?;
    let hour = args.named::<u32>("hour")?;
    let minute = args.named::<u32>("minute")?;
    let second = args.named::<u32>("second")?;
    let date = match (year, month, day) {
        (Some(y), Some(m), Some(d)) => Some((i32::try_from(y).unwrap_or(i32::MAX), m, d)),
        (None, None, None) => None,
        _ => return Err(constructor_error("date is incomplete").with_span(args.span)),
    };
    let time = match (hour, minute, second) {
        (Some(h), Some(m), Some(s)) => Some((h, m, s)),
        (None, None, None) => None,
        _ => return Err(constructor_error("time is incomplete").with_span(args.span)),
    };
    let built = match (date, time) {
        (Some((y, m, d)), Some((h, mi, s))) => Datetime::from_ymd_hms(y, m, d, h, mi, s),
        (Some((y, m, d)), None) => Datetime::from_ymd(y, m, d),
        (None, Some((h, mi, s))) => Datetime::from_hms(h, mi, s),
        (None, None) => {
            return Err(constructor_error("at least one of date or time must be fully specified")
                .with_span(args.span))
        }
    };
    built
        .map(Value::Datetime)
        .ok_or_else(|| constructor_error("datetime is invalid").with_span(args.span))
}

fn duration(args: &mut Args) -> SourceResult<Value> {
    let mut part = |name| args.named::<i64>(name).map(Option::unwrap_or_default);
    let seconds = part("seconds")?;
    let minutes = part("minutes")?;
    let hours = part("hours")?;
    let days = part("days")?;
    let weeks = part("weeks")?;
    Duration::from_parts(weeks, days, hours, minutes, seconds)
        .map(Value::Duration)
        .ok_or_else(|| constructor_error("duration is out of range").with_span(args.span))
}

fn decimal(args: &mut Args) -> SourceResult<Value> {
    let Some(value) = args.eat_spanned() else {
        return Err(crate::errors::missing_argument("value").with_span(args.span));
    };
    let span = value.span;
    let out = match value.v {
        Value::Decimal(v) => v,
        Value::Int(v) => Decimal::from(v),
        Value::Float(v) => Decimal::from_f64(v)
            .ok_or_else(|| constructor_error("float is not a valid decimal"))
            .at(span)?,
        Value::Bool(v) => Decimal::from(u8::from(v)),
        Value::Str(s) => {
            let normalized = s.trim().replace('\u{2212}', "-");
            normalized
                .parse::<Decimal>()
                .map_err(|_| constructor_error(format!("invalid decimal: {s}")))
                .at(span)?
        }
        other => {
            return Err(type_mismatch("integer, float, boolean, decimal or string", other.ty().long_name())
                .with_span(span))
        }
    };
    Ok(Value::Decimal(out))
}

fn regex(args: &mut Args) -> SourceResult<Value> {
    let pattern: Spanned<Str> = spanned(args, "regex")?;
    Regex::new(&pattern.v)
        .map(Value::Regex)
        .map_err(|message| show_rule_error(message).with_span(pattern.span))
}

fn symbol(args: &mut Args) -> SourceResult<Value> {
    let mut variants: Vec<(Str, char)> = Vec::new();
    for item in args.all_spanned() {
        match item.v {
            Value::Array(pair) => {
                let [modifiers, c] = pair.as_slice() else {
                    return Err(constructor_error("variant must be a pair of modifiers and a character")
                        .with_span(item.span));
                };
                let modifiers = Str::from_value(modifiers.clone()).at(item.span)?;
                let c = char::from_value(c.clone()).at(item.span)?;
                variants.push((modifiers, c));
            }
            other => variants.push((Str::new(), char::from_value(other).at(item.span)?)),
        }
    }
    if variants.is_empty() {
        return Err(constructor_error("expected at least one variant").with_span(args.span));
    }
    Ok(Value::Symbol(Symbol::runtime(variants)))
}

/// `color(..)` accepts a hex string like `rgb` does.
fn color(args: &mut Args) -> SourceResult<Value> {
    let hex: Spanned<Str> = spanned(args, "hex")?;
    Color::from_hex(&hex.v).map(Value::Color).at(hex.span)
}

fn spanned<T: FromValue>(args: &mut Args, what: &str) -> SourceResult<Spanned<T>> {
    let Some(item) = args.eat_spanned() else {
        return Err(crate::errors::missing_argument(what).with_span(args.span));
    };
    let span = item.span;
    Ok(Spanned::new(T::from_value(item.v).at(span)?, span))
}

// Scoped definitions

static FROM_UNICODE: NativeFunc = NativeFunc {
    name: "from-unicode",
    params: &[ParamInfo::positional("value", &[Type::Int])],
    func: |_, _, args| {
        let code: Spanned<i64> = spanned(args, "value")?;
        u32::try_from(code.v)
            .ok()
            .and_then(char::from_u32)
            .map(Value::from)
            .ok_or_else(|| constructor_error(format!("{} is not a valid codepoint", code.v)))
            .at(code.span)
    },
    element: None,
    scope: None,
};

static TO_UNICODE: NativeFunc = NativeFunc {
    name: "to-unicode",
    params: &[ParamInfo::positional("character", &[Type::Str])],
    func: |_, _, args| {
        let c: char = args.expect("character")?;
        Ok(Value::Int(i64::from(u32::from(c))))
    },
    element: None,
    scope: None,
};

static TODAY: NativeFunc = NativeFunc {
    name: "today",
    params: &[ParamInfo::named("offset", &[Type::Auto, Type::Int], || Value::Auto)],
    func: today,
    element: None,
    scope: None,
};

fn today(engine: &mut Engine, _: &Context, args: &mut Args) -> SourceResult<Value> {
    let offset = args.named::<Smart<i64>>("offset")?.and_then(Smart::custom);
    let offset = offset
        .map(i32::try_from)
        .transpose()
        .map_err(|_| EvalError::new("offset is out of range").with_span(args.span))?;
    engine
        .world
        .today(offset)
        .map(Value::Datetime)
        .ok_or_else(|| EvalError::new("unable to get the current date").with_span(args.span))
}

/// `rgb(r, g, b, a)`, `rgb("#239dad")`.
pub static RGB: NativeFunc = NativeFunc {
    name: "rgb",
    params: &[ParamInfo::variadic("components", &[Type::Int, Type::Ratio, Type::Str])],
    func: rgb,
    element: None,
    scope: None,
};

fn rgb(_: &mut Engine, _: &Context, args: &mut Args) -> SourceResult<Value> {
    let span = args.span;
    let items = args.all_spanned();
    if let [hex] = items.as_slice() {
        if let Value::Str(hex) = &hex.v {
            return Color::from_hex(hex).map(Value::Color).at(span);
        }
    }
    let mut channels = Vec::with_capacity(4);
    for item in items {
        channels.push(channel(item.v).at(item.span)?);
    }
    match channels.as_slice() {
        [r, g, b] => Ok(Value::Color(Color::rgb(*r, *g, *b))),
        [r, g, b, a] => Ok(Value::Color(Color::rgba(*r, *g, *b, *a))),
        _ => Err(constructor_error("expected three or four color components").with_span(span)),
    }
}

/// `luma(128)`, `luma(50%)`.
pub static LUMA: NativeFunc = NativeFunc {
    name: "luma",
    params: &[ParamInfo::positional("lightness", &[Type::Int, Type::Ratio])],
    func: |_, _, args| {
        let Some(item) = args.eat_spanned() else {
            return Err(crate::errors::missing_argument("lightness").with_span(args.span));
        };
        Ok(Value::Color(Color::luma(channel(item.v).at(item.span)?)))
    },
    element: None,
    scope: None,
};

/// A color channel: an integer in 0..=255 or a ratio in 0%..=100%.
fn channel(value: Value) -> SourceResult<u8> {
    match value {
        Value::Int(v) => u8::try_from(v)
            .map_err(|_| constructor_error("number must be between 0 and 255")),
        Value::Ratio(Ratio(r)) if (0.0..=1.0).contains(&r) => Ok((r * 255.0).round() as u8),
        Value::Ratio(_) => Err(constructor_error("ratio must be between 0% and 100%")),
        other => Err(mismatch::<Ratio>(&other)),
    }
}
