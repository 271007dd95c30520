//! The `calc` module: numeric constants and functions.
//!
//! Functions keep integers integral where the result allows it (`abs`,
//! `pow` with a non-negative exponent, `floor`, `quo`) and fall back to
//! floats otherwise. Decimals stay decimals. A result that is not a real
//! number is an error rather than a silent `nan`.

use std::cmp::Ordering;

use folio_eval::errors::{
    constructor_error, division_by_zero, integer_overflow, type_mismatch, At, EvalError,
    SourceResult,
};
use folio_eval::value::{Angle, Decimal, Fraction, FromValue, Ratio, Type, Value};
use folio_eval::{ops, Args, Func, Module, NativeFunc, ParamInfo, Scope};
use rust_decimal::prelude::ToPrimitive;

/// Build the module.
pub(crate) fn module() -> Module {
    let mut scope = Scope::new();
    scope.define("pi", Value::Float(std::f64::consts::PI));
    scope.define("tau", Value::Float(std::f64::consts::TAU));
    scope.define("e", Value::Float(std::f64::consts::E));
    scope.define("inf", Value::Float(f64::INFINITY));
    scope.define("nan", Value::Float(f64::NAN));

    for &func in FUNCS {
        scope.define(func.name, Func::Native(func));
    }
    Module::new("calc", scope)
}

static FUNCS: &[&NativeFunc] = &[
    &ABS, &POW, &EXP, &SQRT, &ROOT, &LOG, &LN, &SIN, &COS, &TAN, &ASIN, &ACOS, &ATAN, &ATAN2,
    &SINH, &COSH, &TANH, &FLOOR, &CEIL, &ROUND, &TRUNC, &MIN, &MAX, &CLAMP, &REM, &QUO,
];

const NUM: &[Type] = &[Type::Int, Type::Float, Type::Decimal];
const FLOAT: &[Type] = &[Type::Int, Type::Float];
const ANGLE: &[Type] = &[Type::Int, Type::Float, Type::Angle];

/// Declare a native whose errors point at the call's arguments.
macro_rules! calc_funcs {
    ($($static:ident => $name:literal, [$($param:expr),* $(,)?], $body:path;)*) => {$(
        static $static: NativeFunc = NativeFunc {
            name: $name,
            params: &[$($param),*],
            func: |_, _, args| {
                let span = args.span;
                $body(args).at(span)
            },
            element: None,
            scope: None,
        };
    )*};
}

calc_funcs! {
    ABS => "abs", [ParamInfo::positional("value", &[])], abs;
    POW => "pow", [
        ParamInfo::positional("base", NUM),
        ParamInfo::positional("exponent", NUM),
    ], pow;
    EXP => "exp", [ParamInfo::positional("exponent", FLOAT)], exp;
    SQRT => "sqrt", [ParamInfo::positional("value", FLOAT)], sqrt;
    ROOT => "root", [
        ParamInfo::positional("radicand", FLOAT),
        ParamInfo::positional("index", &[Type::Int]),
    ], root;
    LOG => "log", [
        ParamInfo::positional("value", FLOAT),
        ParamInfo::named("base", FLOAT, || Value::Float(10.0)),
    ], log;
    LN => "ln", [ParamInfo::positional("value", FLOAT)], ln;
    SIN => "sin", [ParamInfo::positional("angle", ANGLE)], sin;
    COS => "cos", [ParamInfo::positional("angle", ANGLE)], cos;
    TAN => "tan", [ParamInfo::positional("angle", ANGLE)], tan;
    ASIN => "asin", [ParamInfo::positional("value", FLOAT)], asin;
    ACOS => "acos", [ParamInfo::positional("value", FLOAT)], acos;
    ATAN => "atan", [ParamInfo::positional("value", FLOAT)], atan;
    ATAN2 => "atan2", [
        ParamInfo::positional("x", FLOAT),
        ParamInfo::positional("y", FLOAT),
    ], atan2;
    SINH => "sinh", [ParamInfo::positional("value", FLOAT)], sinh;
    COSH => "cosh", [ParamInfo::positional("value", FLOAT)], cosh;
    TANH => "tanh", [ParamInfo::positional("value", FLOAT)], tanh;
    FLOOR => "floor", [ParamInfo::positional("value", NUM)], floor;
    CEIL => "ceil", [ParamInfo::positional("value", NUM)], ceil;
    ROUND => "round", [
        ParamInfo::positional("value", NUM),
        ParamInfo::named("digits", &[Type::Int], || Value::Int(0)),
    ], round;
    TRUNC => "trunc", [ParamInfo::positional("value", NUM)], trunc;
    MIN => "min", [ParamInfo::variadic("values", &[])], min;
    MAX => "max", [ParamInfo::variadic("values", &[])], max;
    CLAMP => "clamp", [
        ParamInfo::positional("value", NUM),
        ParamInfo::positional("min", NUM),
        ParamInfo::positional("max", NUM),
    ], clamp;
    REM => "rem", [
        ParamInfo::positional("dividend", NUM),
        ParamInfo::positional("divisor", NUM),
    ], rem;
    QUO => "quo", [
        ParamInfo::positional("dividend", NUM),
        ParamInfo::positional("divisor", NUM),
    ], quo;
}

/// An integer, float or decimal argument.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Num {
    Int(i64),
    Float(f64),
    Decimal(Decimal),
}

impl Num {
    fn float(self) -> f64 {
        match self {
            Num::Int(v) => v as f64,
            Num::Float(v) => v,
            Num::Decimal(v) => v.to_f64().unwrap_or(f64::NAN),
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Num::Int(v) => v == 0,
            Num::Float(v) => v == 0.0,
            Num::Decimal(v) => v.is_zero(),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Num::Int(v) => Value::Int(v),
            Num::Float(v) => Value::Float(v),
            Num::Decimal(v) => Value::Decimal(v),
        }
    }
}

impl FromValue for Num {
    fn describe() -> String {
        "integer, float or decimal".into()
    }

    fn from_value(value: Value) -> SourceResult<Self> {
        match value {
            Value::Int(v) => Ok(Num::Int(v)),
            Value::Float(v) => Ok(Num::Float(v)),
            Value::Decimal(v) => Ok(Num::Decimal(v)),
            other => Err(type_mismatch(Self::describe(), other.ty().long_name())),
        }
    }
}

/// A pair of numbers brought to a common representation.
enum Pair {
    Ints(i64, i64),
    Floats(f64, f64),
    Decimals(Decimal, Decimal),
}

impl Pair {
    fn new(a: Num, b: Num) -> SourceResult<Pair> {
        Ok(match (a, b) {
            (Num::Int(a), Num::Int(b)) => Pair::Ints(a, b),
            (Num::Decimal(a), Num::Decimal(b)) => Pair::Decimals(a, b),
            (Num::Decimal(a), Num::Int(b)) => Pair::Decimals(a, Decimal::from(b)),
            (Num::Int(a), Num::Decimal(b)) => Pair::Decimals(Decimal::from(a), b),
            (Num::Decimal(_), Num::Float(_)) | (Num::Float(_), Num::Decimal(_)) => {
                return Err(constructor_error("cannot mix decimals and floats; convert one explicitly"))
            }
            (a, b) => Pair::Floats(a.float(), b.float()),
        })
    }
}

/// Reject results that are not real numbers.
fn real(value: f64) -> SourceResult<Value> {
    if value.is_nan() {
        Err(constructor_error("the result is not a real number"))
    } else {
        Ok(Value::Float(value))
    }
}

/// Convert a float that should be integral into an integer.
fn float_to_int(value: f64) -> SourceResult<Value> {
    if !value.is_finite() || value.abs() >= i64::MAX as f64 {
        return Err(constructor_error("the result is too large"));
    }
    Ok(Value::Int(value as i64))
}

fn angle_radians(args: &mut Args) -> SourceResult<f64> {
    match args.expect::<Value>("angle")? {
        Value::Int(v) => Ok(v as f64),
        Value::Float(v) => Ok(v),
        Value::Angle(angle) => Ok(angle.to_rad()),
        other => Err(type_mismatch("integer, float or angle", other.ty().long_name())),
    }
}

fn abs(args: &mut Args) -> SourceResult<Value> {
    Ok(match args.expect::<Value>("value")? {
        Value::Int(v) => Value::Int(v.checked_abs().ok_or_else(integer_overflow)?),
        Value::Float(v) => Value::Float(v.abs()),
        Value::Decimal(v) => Value::Decimal(v.abs()),
        Value::Angle(v) => Value::Angle(Angle(v.0.abs())),
        Value::Ratio(v) => Value::Ratio(Ratio(v.0.abs())),
        Value::Fraction(v) => Value::Fraction(Fraction(v.0.abs())),
        other => {
            return Err(type_mismatch(
                "integer, float, decimal, angle, ratio or fraction",
                other.ty().long_name(),
            ))
        }
    })
}

fn pow(args: &mut Args) -> SourceResult<Value> {
    let base = args.expect::<Num>("base")?;
    let exponent = args.expect::<Num>("exponent")?;
    if base.is_zero() && exponent.float() < 0.0 {
        return Err(division_by_zero());
    }

    match (base, exponent) {
        (Num::Int(b), Num::Int(e)) if e >= 0 => {
            let e = u32::try_from(e).map_err(|_| integer_overflow())?;
            b.checked_pow(e).map(Value::Int).ok_or_else(integer_overflow)
        }
        (Num::Decimal(b), Num::Int(e)) => {
            let mut out = decimal_pow(b, e.unsigned_abs())?;
            if e < 0 {
                out = Decimal::ONE.checked_div(out).ok_or_else(division_by_zero)?;
            }
            Ok(Value::Decimal(out))
        }
        (Num::Decimal(_), _) | (_, Num::Decimal(_)) => {
            Err(constructor_error("exponent of a decimal must be an integer"))
        }
        (b, e) => real(b.float().powf(e.float())),
    }
}

/// Exponentiation by squaring.
fn decimal_pow(mut base: Decimal, mut exponent: u64) -> SourceResult<Decimal> {
    let mut out = Decimal::ONE;
    while exponent > 0 {
        if exponent & 1 == 1 {
            out = out.checked_mul(base).ok_or_else(integer_overflow)?;
        }
        exponent >>= 1;
        if exponent > 0 {
            base = base.checked_mul(base).ok_or_else(integer_overflow)?;
        }
    }
    Ok(out)
}

fn exp(args: &mut Args) -> SourceResult<Value> {
    real(args.expect::<f64>("exponent")?.exp())
}

fn sqrt(args: &mut Args) -> SourceResult<Value> {
    let value = args.expect::<f64>("value")?;
    if value < 0.0 {
        return Err(constructor_error("cannot take square root of negative number"));
    }
    Ok(Value::Float(value.sqrt()))
}

fn root(args: &mut Args) -> SourceResult<Value> {
    let radicand = args.expect::<f64>("radicand")?;
    let index = args.expect::<i64>("index")?;
    match index {
        0 => Err(constructor_error("cannot take the 0th root of a number")),
        1 => Ok(Value::Float(radicand)),
        2 => {
            if radicand < 0.0 {
                return Err(constructor_error("cannot take square root of negative number"));
            }
            Ok(Value::Float(radicand.sqrt()))
        }
        n if radicand < 0.0 && n % 2 == 0 => Err(constructor_error(
            "negative numbers do not have a real nth root when n is even",
        )),
        n => {
            let magnitude = radicand.abs().powf(1.0 / n as f64);
            Ok(Value::Float(magnitude.copysign(radicand)))
        }
    }
}

fn log(args: &mut Args) -> SourceResult<Value> {
    let value = args.expect::<f64>("value")?;
    let base = args.named::<f64>("base")?.unwrap_or(10.0);
    if value <= 0.0 {
        return Err(constructor_error("value must be strictly positive"));
    }
    if base == 0.0 {
        return Err(constructor_error("base may not be zero"));
    }
    let result = if base == 2.0 {
        value.log2()
    } else if base == 10.0 {
        value.log10()
    } else {
        value.ln() / base.ln()
    };
    if result.is_finite() {
        Ok(Value::Float(result))
    } else {
        Err(constructor_error("the result is not a real number"))
    }
}

fn ln(args: &mut Args) -> SourceResult<Value> {
    let value = args.expect::<f64>("value")?;
    if value <= 0.0 {
        return Err(constructor_error("value must be strictly positive"));
    }
    Ok(Value::Float(value.ln()))
}

fn sin(args: &mut Args) -> SourceResult<Value> {
    Ok(Value::Float(angle_radians(args)?.sin()))
}

fn cos(args: &mut Args) -> SourceResult<Value> {
    Ok(Value::Float(angle_radians(args)?.cos()))
}

fn tan(args: &mut Args) -> SourceResult<Value> {
    Ok(Value::Float(angle_radians(args)?.tan()))
}

/// An argument of `asin` or `acos`.
fn unit_interval(args: &mut Args) -> SourceResult<f64> {
    let value = args.expect::<f64>("value")?;
    if !(-1.0..=1.0).contains(&value) {
        return Err(constructor_error("value must be between -1 and 1"));
    }
    Ok(value)
}

fn asin(args: &mut Args) -> SourceResult<Value> {
    Ok(Value::Angle(Angle::rad(unit_interval(args)?.asin())))
}

fn acos(args: &mut Args) -> SourceResult<Value> {
    Ok(Value::Angle(Angle::rad(unit_interval(args)?.acos())))
}

fn atan(args: &mut Args) -> SourceResult<Value> {
    Ok(Value::Angle(Angle::rad(args.expect::<f64>("value")?.atan())))
}

fn atan2(args: &mut Args) -> SourceResult<Value> {
    let x = args.expect::<f64>("x")?;
    let y = args.expect::<f64>("y")?;
    Ok(Value::Angle(Angle::rad(y.atan2(x))))
}

fn sinh(args: &mut Args) -> SourceResult<Value> {
    Ok(Value::Float(args.expect::<f64>("value")?.sinh()))
}

fn cosh(args: &mut Args) -> SourceResult<Value> {
    Ok(Value::Float(args.expect::<f64>("value")?.cosh()))
}

fn tanh(args: &mut Args) -> SourceResult<Value> {
    Ok(Value::Float(args.expect::<f64>("value")?.tanh()))
}

fn floor(args: &mut Args) -> SourceResult<Value> {
    match args.expect::<Num>("value")? {
        Num::Int(v) => Ok(Value::Int(v)),
        Num::Float(v) => float_to_int(v.floor()),
        Num::Decimal(v) => Ok(Value::Decimal(v.floor())),
    }
}

fn ceil(args: &mut Args) -> SourceResult<Value> {
    match args.expect::<Num>("value")? {
        Num::Int(v) => Ok(Value::Int(v)),
        Num::Float(v) => float_to_int(v.ceil()),
        Num::Decimal(v) => Ok(Value::Decimal(v.ceil())),
    }
}

fn trunc(args: &mut Args) -> SourceResult<Value> {
    match args.expect::<Num>("value")? {
        Num::Int(v) => Ok(Value::Int(v)),
        Num::Float(v) => float_to_int(v.trunc()),
        Num::Decimal(v) => Ok(Value::Decimal(v.trunc())),
    }
}

/// `round(value, digits: n)`: floats stay floats, integers stay integers.
fn round(args: &mut Args) -> SourceResult<Value> {
    let value = args.expect::<Num>("value")?;
    let digits = args.named::<u32>("digits")?.unwrap_or(0);
    Ok(match value {
        Num::Int(v) => Value::Int(v),
        Num::Float(v) if digits == 0 => Value::Float(v.round()),
        Num::Float(v) => {
            let factor = 10f64.powi(digits.min(300) as i32);
            Value::Float((v * factor).round() / factor)
        }
        Num::Decimal(v) => Value::Decimal(v.round_dp(digits)),
    })
}

fn min(args: &mut Args) -> SourceResult<Value> {
    extremum(args, Ordering::Less)
}

fn max(args: &mut Args) -> SourceResult<Value> {
    extremum(args, Ordering::Greater)
}

/// The first value that no other value beats in direction `goal`.
fn extremum(args: &mut Args, goal: Ordering) -> SourceResult<Value> {
    let mut values = args.all_spanned().into_iter();
    let Some(first) = values.next() else {
        return Err(EvalError::new("expected at least one value"));
    };
    let mut best = first.v;
    for item in values {
        if ops::compare(&item.v, &best).at(item.span)? == goal {
            best = item.v;
        }
    }
    Ok(best)
}

fn clamp(args: &mut Args) -> SourceResult<Value> {
    let value = args.expect::<Num>("value")?.into_value();
    let min = args.expect::<Num>("min")?.into_value();
    let max = args.expect::<Num>("max")?.into_value();
    if ops::compare(&max, &min)? == Ordering::Less {
        return Err(constructor_error("max must be greater than or equal to min"));
    }
    if ops::compare(&value, &min)? == Ordering::Less {
        Ok(min)
    } else if ops::compare(&value, &max)? == Ordering::Greater {
        Ok(max)
    } else {
        Ok(value)
    }
}

/// The remainder of a truncating division; its sign follows the dividend.
fn rem(args: &mut Args) -> SourceResult<Value> {
    let dividend = args.expect::<Num>("dividend")?;
    let divisor = args.expect::<Num>("divisor")?;
    if divisor.is_zero() {
        return Err(division_by_zero());
    }
    match Pair::new(dividend, divisor)? {
        Pair::Ints(a, b) => a.checked_rem(b).map(Value::Int).ok_or_else(integer_overflow),
        Pair::Floats(a, b) => real(a % b),
        Pair::Decimals(a, b) => a.checked_rem(b).map(Value::Decimal).ok_or_else(integer_overflow),
    }
}

/// The quotient of a division, rounded towards negative infinity.
fn quo(args: &mut Args) -> SourceResult<Value> {
    let dividend = args.expect::<Num>("dividend")?;
    let divisor = args.expect::<Num>("divisor")?;
    if divisor.is_zero() {
        return Err(division_by_zero());
    }
    match Pair::new(dividend, divisor)? {
        Pair::Ints(a, b) => {
            let q = a.checked_div(b).ok_or_else(integer_overflow)?;
            let adjust = a % b != 0 && ((a < 0) != (b < 0));
            Ok(Value::Int(if adjust { q - 1 } else { q }))
        }
        Pair::Floats(a, b) => float_to_int((a / b).floor()),
        Pair::Decimals(a, b) => {
            let q = a.checked_div(b).ok_or_else(integer_overflow)?;
            Ok(Value::Decimal(q.floor()))
        }
    }
}

#[cfg(test)]
mod tests;
