//! Operators on values.
//!
//! Every operator dispatches with one `match` over the operand pair. The
//! set of value kinds is closed, so a missing arm is a type error rather
//! than an extension point. Integer arithmetic is checked; decimals are
//! checked too; floats follow IEEE semantics except that dividing by zero
//! is an error for every numeric kind.

use std::cmp::Ordering;

use crate::errors::{
    division_by_zero, integer_overflow, operand_mismatch, unary_mismatch, EvalError,
    SourceResult,
};
use crate::value::{Angle, Fraction, Ratio, Value};

// Unary operators

/// `+v`: the identity on numbers and dimensions.
pub fn pos(value: Value) -> SourceResult<Value> {
    match value {
        Value::Int(_)
        | Value::Float(_)
        | Value::Decimal(_)
        | Value::Length(_)
        | Value::Angle(_)
        | Value::Ratio(_)
        | Value::Relative(_)
        | Value::Fraction(_) => Ok(value),
        other => Err(unary_mismatch("+", other.ty().long_name())),
    }
}

/// `-v`.
pub fn neg(value: Value) -> SourceResult<Value> {
    Ok(match value {
        Value::Int(v) => Value::Int(v.checked_neg().ok_or_else(integer_overflow)?),
        Value::Float(v) => Value::Float(-v),
        Value::Decimal(v) => Value::Decimal(-v),
        Value::Length(v) => Value::Length(-v),
        Value::Angle(v) => Value::Angle(Angle(-v.0)),
        Value::Ratio(v) => Value::Ratio(Ratio(-v.0)),
        Value::Relative(v) => Value::Relative(-v),
        Value::Fraction(v) => Value::Fraction(Fraction(-v.0)),
        Value::Duration(v) => Value::Duration(v.neg()),
        other => return Err(unary_mismatch("-", other.ty().long_name())),
    })
}

/// `not v`.
pub fn not(value: Value) -> SourceResult<Value> {
    match value {
        Value::Bool(v) => Ok(Value::Bool(!v)),
        other => Err(unary_mismatch("not", other.ty().long_name())),
    }
}

// Arithmetic

#[cold]
fn mismatch(verb: &str, lhs: &Value, rhs: &Value) -> EvalError {
    operand_mismatch(verb, lhs.ty().long_name(), rhs.ty().long_name())
}

#[cold]
fn out_of_range() -> EvalError {
    EvalError::new("the result is out of range")
}

/// `lhs + rhs`.
pub fn add(lhs: Value, rhs: Value) -> SourceResult<Value> {
    use Value::*;
    Ok(match (lhs, rhs) {
        (None, other) | (other, None) => other,

        (Int(a), Int(b)) => Int(a.checked_add(b).ok_or_else(integer_overflow)?),
        (Int(a), Float(b)) => Float(a as f64 + b),
        (Float(a), Int(b)) => Float(a + b as f64),
        (Float(a), Float(b)) => Float(a + b),
        (Decimal(a), Decimal(b)) => Decimal(a.checked_add(b).ok_or_else(integer_overflow)?),
        (Decimal(a), Int(b)) | (Int(b), Decimal(a)) => Decimal(
            a.checked_add(crate::value::Decimal::from(b))
                .ok_or_else(integer_overflow)?,
        ),

        (Str(a), Str(b)) => Str(a.concat(&b)),
        (Symbol(a), Str(b)) => Str(crate::value::Str::from(a.get()).concat(&b)),
        (Str(a), Symbol(b)) => Str(a.concat(&b.get().to_string())),
        (Symbol(a), Symbol(b)) => Str(format!("{}{}", a.get(), b.get()).into()),
        (Bytes(a), Bytes(b)) => Bytes(a.concat(&b)),

        (Content(a), Content(b)) => Content(a.join(&b)),
        (Content(a), b @ (Str(_) | Symbol(_) | Int(_) | Float(_) | Decimal(_))) => {
            Content(a.join(&b.display()))
        }
        (a @ (Str(_) | Symbol(_) | Int(_) | Float(_) | Decimal(_)), Content(b)) => {
            Content(a.display().join(&b))
        }

        (Array(mut a), Array(b)) => {
            a.extend(b);
            Array(a)
        }
        (Dict(mut a), Dict(b)) => {
            a.extend(b);
            Dict(a)
        }
        (Args(mut a), Args(b)) => {
            a.items.extend(b.items);
            Args(a)
        }

        (Length(a), Length(b)) => Length(a + b),
        (Angle(a), Angle(b)) => Angle(crate::value::Angle(a.0 + b.0)),
        (Ratio(a), Ratio(b)) => Ratio(crate::value::Ratio(a.0 + b.0)),
        (Length(a), Ratio(b)) | (Ratio(b), Length(a)) => Relative(crate::value::Relative {
            rel: b,
            abs: a,
        }),
        (Relative(a), Relative(b)) => Relative(a + b),
        (Relative(a), Length(b)) | (Length(b), Relative(a)) => Relative(a + b.into()),
        (Relative(a), Ratio(b)) | (Ratio(b), Relative(a)) => Relative(a + b.into()),
        (Fraction(a), Fraction(b)) => Fraction(crate::value::Fraction(a.0 + b.0)),

        (Datetime(a), Duration(b)) | (Duration(b), Datetime(a)) => {
            Datetime(a.checked_add(b).ok_or_else(out_of_range)?)
        }
        (Duration(a), Duration(b)) => Duration(a.checked_add(b).ok_or_else(out_of_range)?),

        (Alignment(a), Alignment(b)) => Alignment(a.combine(b).map_err(EvalError::new)?),

        (a, b) => return Err(mismatch("add", &a, &b)),
    })
}

/// `lhs - rhs`.
pub fn sub(lhs: Value, rhs: Value) -> SourceResult<Value> {
    use Value::*;
    Ok(match (lhs, rhs) {
        (Int(a), Int(b)) => Int(a.checked_sub(b).ok_or_else(integer_overflow)?),
        (Int(a), Float(b)) => Float(a as f64 - b),
        (Float(a), Int(b)) => Float(a - b as f64),
        (Float(a), Float(b)) => Float(a - b),
        (Decimal(a), Decimal(b)) => Decimal(a.checked_sub(b).ok_or_else(integer_overflow)?),
        (Decimal(a), Int(b)) => Decimal(
            a.checked_sub(crate::value::Decimal::from(b))
                .ok_or_else(integer_overflow)?,
        ),
        (Int(a), Decimal(b)) => Decimal(
            crate::value::Decimal::from(a)
                .checked_sub(b)
                .ok_or_else(integer_overflow)?,
        ),

        (Length(a), Length(b)) => Length(a - b),
        (Angle(a), Angle(b)) => Angle(crate::value::Angle(a.0 - b.0)),
        (Ratio(a), Ratio(b)) => Ratio(crate::value::Ratio(a.0 - b.0)),
        (Length(a), Ratio(b)) => Relative(crate::value::Relative {
            rel: crate::value::Ratio(-b.0),
            abs: a,
        }),
        (Ratio(a), Length(b)) => Relative(crate::value::Relative { rel: a, abs: -b }),
        (Relative(a), Relative(b)) => Relative(a + -b),
        (Relative(a), Length(b)) => Relative(a + (-b).into()),
        (Length(a), Relative(b)) => Relative(crate::value::Relative::from(a) + -b),
        (Relative(a), Ratio(b)) => Relative(a + crate::value::Ratio(-b.0).into()),
        (Ratio(a), Relative(b)) => Relative(crate::value::Relative::from(a) + -b),
        (Fraction(a), Fraction(b)) => Fraction(crate::value::Fraction(a.0 - b.0)),

        (Datetime(a), Duration(b)) => Datetime(a.checked_add(b.neg()).ok_or_else(out_of_range)?),
        (Datetime(a), Datetime(b)) => match a.since(b) {
            Some(duration) => Duration(duration),
            Option::None => {
                return Err(EvalError::new(
                    "cannot subtract datetimes of different kinds",
                ))
            }
        },
        (Duration(a), Duration(b)) => Duration(a.checked_sub(b).ok_or_else(out_of_range)?),

        (a, b) => return Err(mismatch("subtract", &a, &b)),
    })
}

/// `lhs * rhs`.
pub fn mul(lhs: Value, rhs: Value) -> SourceResult<Value> {
    use Value::*;
    Ok(match (lhs, rhs) {
        (Int(a), Int(b)) => Int(a.checked_mul(b).ok_or_else(integer_overflow)?),
        (Int(a), Float(b)) => Float(a as f64 * b),
        (Float(a), Int(b)) => Float(a * b as f64),
        (Float(a), Float(b)) => Float(a * b),
        (Decimal(a), Decimal(b)) => Decimal(a.checked_mul(b).ok_or_else(integer_overflow)?),
        (Decimal(a), Int(b)) | (Int(b), Decimal(a)) => Decimal(
            a.checked_mul(crate::value::Decimal::from(b))
                .ok_or_else(integer_overflow)?,
        ),

        (Str(a), Int(n)) | (Int(n), Str(a)) => {
            Str(a.repeat(repetitions(n, "string")?).ok_or_else(integer_overflow)?)
        }
        (Array(a), Int(n)) | (Int(n), Array(a)) => {
            Array(a.repeat(repetitions(n, "array")?).ok_or_else(integer_overflow)?)
        }
        (Content(a), Int(n)) | (Int(n), Content(a)) => {
            Content(a.repeat(repetitions(n, "content")?).ok_or_else(integer_overflow)?)
        }

        (Length(a), b @ (Int(_) | Float(_))) | (b @ (Int(_) | Float(_)), Length(a)) => {
            Length(a * factor(&b))
        }
        (Angle(a), b @ (Int(_) | Float(_))) | (b @ (Int(_) | Float(_)), Angle(a)) => {
            Angle(crate::value::Angle(a.0 * factor(&b)))
        }
        (Ratio(a), b @ (Int(_) | Float(_))) | (b @ (Int(_) | Float(_)), Ratio(a)) => {
            Ratio(crate::value::Ratio(a.0 * factor(&b)))
        }
        (Relative(a), b @ (Int(_) | Float(_))) | (b @ (Int(_) | Float(_)), Relative(a)) => {
            Relative(a * factor(&b))
        }
        (Fraction(a), b @ (Int(_) | Float(_))) | (b @ (Int(_) | Float(_)), Fraction(a)) => {
            Fraction(crate::value::Fraction(a.0 * factor(&b)))
        }
        (Ratio(a), Ratio(b)) => Ratio(crate::value::Ratio(a.0 * b.0)),
        (Length(a), Ratio(b)) | (Ratio(b), Length(a)) => {
            Relative(crate::value::Relative::from(a * b.0))
        }
        (Duration(a), b @ (Int(_) | Float(_))) | (b @ (Int(_) | Float(_)), Duration(a)) => {
            Duration(a.scale(factor(&b)).ok_or_else(out_of_range)?)
        }

        (a, b) => return Err(mismatch("multiply", &a, &b)),
    })
}

/// `lhs / rhs`.
pub fn div(lhs: Value, rhs: Value) -> SourceResult<Value> {
    use Value::*;
    if is_zero(&rhs) {
        return Err(division_by_zero());
    }
    Ok(match (lhs, rhs) {
        (Int(a), Int(b)) => match a.checked_rem(b) {
            Some(0) => Int(a.checked_div(b).ok_or_else(integer_overflow)?),
            Some(_) => Float(a as f64 / b as f64),
            Option::None => return Err(integer_overflow()),
        },
        (Int(a), Float(b)) => Float(a as f64 / b),
        (Float(a), Int(b)) => Float(a / b as f64),
        (Float(a), Float(b)) => Float(a / b),
        (Decimal(a), Decimal(b)) => Decimal(a.checked_div(b).ok_or_else(integer_overflow)?),
        (Decimal(a), Int(b)) => Decimal(
            a.checked_div(crate::value::Decimal::from(b))
                .ok_or_else(integer_overflow)?,
        ),
        (Int(a), Decimal(b)) => Decimal(
            crate::value::Decimal::from(a)
                .checked_div(b)
                .ok_or_else(integer_overflow)?,
        ),

        (Length(a), b @ (Int(_) | Float(_))) => Length(a / factor(&b)),
        (Angle(a), b @ (Int(_) | Float(_))) => Angle(crate::value::Angle(a.0 / factor(&b))),
        (Ratio(a), b @ (Int(_) | Float(_))) => Ratio(crate::value::Ratio(a.0 / factor(&b))),
        (Relative(a), b @ (Int(_) | Float(_))) => Relative(a * (1.0 / factor(&b))),
        (Fraction(a), b @ (Int(_) | Float(_))) => {
            Fraction(crate::value::Fraction(a.0 / factor(&b)))
        }
        (Duration(a), b @ (Int(_) | Float(_))) => {
            Duration(a.scale(1.0 / factor(&b)).ok_or_else(out_of_range)?)
        }

        (Length(a), Length(b)) => {
            if a.em != 0.0 || b.em != 0.0 {
                return Err(EvalError::new(format!("cannot divide {a} by {b}")));
            }
            Float(a.abs / b.abs)
        }
        (Angle(a), Angle(b)) => Float(a.0 / b.0),
        (Ratio(a), Ratio(b)) => Float(a.0 / b.0),
        (Fraction(a), Fraction(b)) => Float(a.0 / b.0),

        (a, b) => return Err(mismatch("divide", &a, &b)),
    })
}

fn factor(value: &Value) -> f64 {
    value.as_float().unwrap_or(1.0)
}

fn repetitions(n: i64, what: &str) -> SourceResult<usize> {
    usize::try_from(n)
        .map_err(|_| EvalError::new(format!("cannot repeat this {what} a negative number of times")))
}

/// Whether a divisor is zero of any numeric or dimensional kind.
fn is_zero(value: &Value) -> bool {
    match value {
        Value::Int(v) => *v == 0,
        Value::Float(v) => *v == 0.0,
        Value::Decimal(v) => v.is_zero(),
        Value::Length(v) => v.is_zero(),
        Value::Angle(v) => v.0 == 0.0,
        Value::Ratio(v) => v.is_zero(),
        Value::Relative(v) => v.rel.is_zero() && v.abs.is_zero(),
        Value::Fraction(v) => v.0 == 0.0,
        _ => false,
    }
}

// Comparison

/// Structural equality.
///
/// Integers, floats and decimals compare by numeric value; values of
/// otherwise different kinds are unequal.
pub fn equal(lhs: &Value, rhs: &Value) -> bool {
    use Value::*;
    match (lhs, rhs) {
        (None, None) | (Auto, Auto) => true,
        (Bool(a), Bool(b)) => a == b,
        (Int(a), Int(b)) => a == b,
        (Float(a), Float(b)) => a == b,
        (Int(a), Float(b)) | (Float(b), Int(a)) => *a as f64 == *b,
        (Decimal(a), Decimal(b)) => a == b,
        (Decimal(a), Int(b)) | (Int(b), Decimal(a)) => *a == crate::value::Decimal::from(*b),
        (Decimal(a), Float(b)) | (Float(b), Decimal(a)) => {
            b.fract() == 0.0 && crate::value::Decimal::try_from(*b).is_ok_and(|b| b == *a)
        }
        (Str(a), Str(b)) => a == b,
        (Bytes(a), Bytes(b)) => a == b,
        (Length(a), Length(b)) => a == b,
        (Angle(a), Angle(b)) => a == b,
        (Ratio(a), Ratio(b)) => a == b,
        (Relative(a), Relative(b)) => a == b,
        (Relative(a), Length(b)) | (Length(b), Relative(a)) => {
            *a == crate::value::Relative::from(*b)
        }
        (Relative(a), Ratio(b)) | (Ratio(b), Relative(a)) => {
            *a == crate::value::Relative::from(*b)
        }
        (Fraction(a), Fraction(b)) => a == b,
        (Color(a), Color(b)) => a == b,
        (Datetime(a), Datetime(b)) => a == b,
        (Duration(a), Duration(b)) => a == b,
        (Version(a), Version(b)) => a == b,
        (Symbol(a), Symbol(b)) => a.get() == b.get(),
        (Label(a), Label(b)) => a == b,
        (Array(a), Array(b)) => a == b,
        (Dict(a), Dict(b)) => a == b,
        (Args(a), Args(b)) => a == b,
        (Content(a), Content(b)) => a == b,
        (Func(a), Func(b)) => a == b,
        (Type(a), Type(b)) => a == b,
        (Module(a), Module(b)) => a == b,
        (Styles(a), Styles(b)) => a == b,
        (Selector(a), Selector(b)) => a == b,
        (Regex(a), Regex(b)) => a == b,
        (Alignment(a), Alignment(b)) => a == b,
        (Direction(a), Direction(b)) => a == b,
        _ => false,
    }
}

/// Order two values, if they are comparable.
pub fn compare(lhs: &Value, rhs: &Value) -> SourceResult<Ordering> {
    use Value::*;
    let ordering = match (lhs, rhs) {
        (Int(a), Int(b)) => Some(a.cmp(b)),
        (Decimal(a), Decimal(b)) => Some(a.cmp(b)),
        (Decimal(a), Int(b)) => Some(a.cmp(&crate::value::Decimal::from(*b))),
        (Int(a), Decimal(b)) => Some(crate::value::Decimal::from(*a).cmp(b)),
        (Int(_) | Float(_), Int(_) | Float(_)) => {
            let (a, b) = (lhs.as_float(), rhs.as_float());
            a.zip(b).and_then(|(a, b)| a.partial_cmp(&b))
        }
        (Str(a), Str(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
        (Length(a), Length(b)) => a.try_cmp(*b),
        (Angle(a), Angle(b)) => a.0.partial_cmp(&b.0),
        (Ratio(a), Ratio(b)) => a.0.partial_cmp(&b.0),
        (Relative(a), Relative(b)) if a.rel == b.rel => a.abs.try_cmp(b.abs),
        (Fraction(a), Fraction(b)) => a.0.partial_cmp(&b.0),
        (Datetime(a), Datetime(b)) => a.try_cmp(*b),
        (Duration(a), Duration(b)) => Some(a.cmp(b)),
        (Version(a), Version(b)) => Some(a.cmp(b)),
        (Bool(a), Bool(b)) => Some(a.cmp(b)),
        (Array(a), Array(b)) => {
            for (x, y) in a.iter().zip(b.iter()) {
                match compare(x, y)? {
                    Ordering::Equal => {}
                    other => return Ok(other),
                }
            }
            Some(a.len().cmp(&b.len()))
        }
        _ => Option::None,
    };
    ordering.ok_or_else(|| {
        EvalError::new(format!("cannot compare {} and {}", lhs.repr(), rhs.repr()))
    })
}

pub fn lt(lhs: &Value, rhs: &Value) -> SourceResult<Value> {
    Ok(Value::Bool(compare(lhs, rhs)?.is_lt()))
}

pub fn leq(lhs: &Value, rhs: &Value) -> SourceResult<Value> {
    Ok(Value::Bool(compare(lhs, rhs)?.is_le()))
}

pub fn gt(lhs: &Value, rhs: &Value) -> SourceResult<Value> {
    Ok(Value::Bool(compare(lhs, rhs)?.is_gt()))
}

pub fn geq(lhs: &Value, rhs: &Value) -> SourceResult<Value> {
    Ok(Value::Bool(compare(lhs, rhs)?.is_ge()))
}

/// `lhs in rhs`.
pub fn contains(lhs: &Value, rhs: &Value) -> SourceResult<bool> {
    match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => Ok(b.contains(a.as_str())),
        (Value::Symbol(a), Value::Str(b)) => Ok(b.contains(a.get())),
        (Value::Regex(re), Value::Str(b)) => Ok(re.is_match(b)),
        (value, Value::Array(items)) => Ok(items.iter().any(|item| equal(value, item))),
        (Value::Str(key), Value::Dict(dict)) => Ok(dict.contains(key)),
        (a, b) => Err(mismatch("check containment of", a, b)),
    }
}

// Joining

/// Join the results of consecutive expressions in a block or loop body.
pub fn join(lhs: Value, rhs: Value) -> SourceResult<Value> {
    use Value::*;
    Ok(match (lhs, rhs) {
        (a, None) => a,
        (None, b) => b,
        (Symbol(a), Symbol(b)) => Str(format!("{}{}", a.get(), b.get()).into()),
        (Str(a), Str(b)) => Str(a.concat(&b)),
        (Str(a), Symbol(b)) => Str(a.concat(&b.get().to_string())),
        (Symbol(a), Str(b)) => Str(crate::value::Str::from(a.get()).concat(&b)),
        (Bytes(a), Bytes(b)) => Bytes(a.concat(&b)),
        (Content(a), Content(b)) => Content(a.join(&b)),
        (Content(a), b @ (Symbol(_) | Str(_))) => Content(a.join(&b.display())),
        (a @ (Symbol(_) | Str(_)), Content(b)) => Content(a.display().join(&b)),
        (Array(mut a), Array(b)) => {
            a.extend(b);
            Array(a)
        }
        (Dict(mut a), Dict(b)) => {
            a.extend(b);
            Dict(a)
        }
        (Args(mut a), Args(b)) => {
            a.items.extend(b.items);
            Args(a)
        }
        (Styles(mut a), Styles(b)) => {
            a.extend(b);
            Styles(a)
        }
        (a, b) => {
            return Err(EvalError::new(format!(
                "cannot join {} with {}",
                a.ty().long_name(),
                b.ty().long_name()
            )))
        }
    })
}
