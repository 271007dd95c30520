//! Built-in methods and fields of values.
//!
//! Dispatch is a direct match on the receiver's variant; the set of
//! receiver types is closed, so there is no method table to register into.
//!
//! # Module Structure
//!
//! - [`collections`]: strings, arrays, dictionaries, bytes and arguments
//! - [`units`]: lengths, colors, datetimes, durations, versions, directions
//! - [`content`]: content, functions and selectors
//!
//! Mutating methods (`push`, `insert`, ...) need a place rather than a
//! value and go through [`call_mut`]; the evaluator decides which entry
//! point to use with [`is_mutating`].

mod collections;
mod content;
mod units;

use folio_ir::Span;

use crate::args::Args;
use crate::engine::{Context, Engine};
use crate::errors::{key_not_found, unknown_field, unknown_method, At, EvalError, SourceResult};
use crate::func::Func;
use crate::value::{FromValue, Str, Value};

/// Call a non-mutating method on `receiver`.
pub fn call(
    engine: &mut Engine,
    context: &Context,
    receiver: Value,
    name: &str,
    mut args: Args,
) -> SourceResult<Value> {
    let span = args.span;
    let ty = receiver.ty();
    let output = match receiver {
        Value::Str(s) => collections::str(engine, context, &s, name, &mut args),
        Value::Array(array) => collections::array(engine, context, &array, name, &mut args),
        Value::Dict(dict) => collections::dict(&dict, name, &mut args),
        Value::Bytes(bytes) => collections::bytes(&bytes, name, &mut args),
        Value::Args(arguments) => collections::args(&arguments, name),
        Value::Content(content) => content::content(&content, name, &mut args),
        Value::Func(func) => content::func(func, name, &mut args),
        Value::Selector(selector) => content::selector(selector, name, &mut args),
        Value::Length(length) => units::length(length, name),
        Value::Color(color) => units::color(color, name, &mut args),
        Value::Datetime(datetime) => units::datetime(datetime, name, &mut args),
        Value::Duration(duration) => units::duration(duration, name),
        Value::Version(version) => units::version(&version, name, &mut args),
        Value::Direction(dir) => units::direction(dir, name),
        Value::Alignment(align) => units::alignment(align, name),
        _ => None,
    };
    let Some(output) = output else {
        return Err(unknown_method(ty.long_name(), name).with_span(span));
    };
    let output = output.at(span)?;
    args.finish()?;
    Ok(output)
}

/// Whether `name` is a method that modifies its receiver in place.
pub fn is_mutating(name: &str) -> bool {
    matches!(name, "push" | "pop" | "insert" | "remove")
}

/// Call a mutating method on the value stored at a place.
pub fn call_mut(receiver: &mut Value, name: &str, mut args: Args, span: Span) -> SourceResult<Value> {
    let ty = receiver.ty();
    let output = match receiver {
        Value::Array(array) => match name {
            "push" => {
                let value = args.expect::<Value>("value")?;
                array.push(value);
                Some(Value::None)
            }
            "pop" => Some(
                array
                    .pop()
                    .ok_or_else(|| EvalError::new("array is empty"))
                    .at(span)?,
            ),
            "insert" => {
                let index = args.expect::<i64>("index")?;
                let value = args.expect::<Value>("value")?;
                array.insert(index, value).at(span)?;
                Some(Value::None)
            }
            "remove" => {
                let index = args.expect::<i64>("index")?;
                let default = args.named::<Value>("default")?;
                match (array.remove(index), default) {
                    (Ok(value), _) => Some(value),
                    (Err(_), Some(default)) => Some(default),
                    (Err(error), None) => return Err(error.with_span(span)),
                }
            }
            _ => None,
        },
        Value::Dict(dict) => match name {
            "insert" => {
                let key = args.expect::<Str>("key")?;
                let value = args.expect::<Value>("value")?;
                dict.insert(key, value);
                Some(Value::None)
            }
            "remove" => {
                let key = args.expect::<Str>("key")?;
                let default = args.named::<Value>("default")?;
                match (dict.remove(&key), default) {
                    (Some(value), _) => Some(value),
                    (None, Some(default)) => Some(default),
                    (None, None) => return Err(key_not_found(&key).with_span(span)),
                }
            }
            _ => None,
        },
        _ => None,
    };
    let Some(output) = output else {
        return Err(unknown_method(ty.long_name(), name).with_span(span));
    };
    args.finish()?;
    Ok(output)
}

/// Access a field of a value: dictionary keys, module members, element
/// fields, scoped definitions and symbol modifiers. Methods are exposed as
/// bound functions.
pub fn field(value: &Value, name: &str) -> SourceResult<Value> {
    let found = match value {
        Value::Dict(dict) => return dict.at(name).cloned(),
        Value::Module(module) => return module.field(name).cloned(),
        Value::Content(content) => content::field(content, name),
        Value::Symbol(symbol) => {
            return symbol
                .modified(name)
                .map(Value::Symbol)
                .map_err(EvalError::new)
        }
        Value::Func(func) => scoped(func.scope(), name),
        Value::Type(ty) => scoped(ty.scope(), name),
        Value::Version(version) => units::version_field(version, name),
        Value::Length(length) => units::length_field(*length, name),
        Value::Relative(rel) => match name {
            "ratio" => Some(Value::Ratio(rel.rel)),
            "length" => Some(Value::Length(rel.abs)),
            _ => None,
        },
        Value::Alignment(align) => units::alignment_field(*align, name),
        _ => None,
    };
    if let Some(found) = found {
        return Ok(found);
    }
    if has_method(value, name) {
        return Ok(Value::Func(Func::Method(std::sync::Arc::new((
            value.clone(),
            Str::from(name),
        )))));
    }
    Err(unknown_field(value.ty().long_name(), name))
}

fn scoped(scope: Option<crate::scope::Scope>, name: &str) -> Option<Value> {
    let scope = scope?;
    let binding = scope.get(folio_ir::Name::new(name))?;
    Some(binding.read().clone())
}

/// Whether `value` has a method named `name`.
pub fn has_method(value: &Value, name: &str) -> bool {
    let names: &[&str] = match value {
        Value::Str(_) => collections::STR_METHODS,
        Value::Array(_) => collections::ARRAY_METHODS,
        Value::Dict(_) => collections::DICT_METHODS,
        Value::Bytes(_) => collections::BYTES_METHODS,
        Value::Args(_) => collections::ARGS_METHODS,
        Value::Content(_) => content::CONTENT_METHODS,
        Value::Func(_) => content::FUNC_METHODS,
        Value::Selector(_) => content::SELECTOR_METHODS,
        Value::Length(_) => units::LENGTH_METHODS,
        Value::Color(_) => units::COLOR_METHODS,
        Value::Datetime(_) => units::DATETIME_METHODS,
        Value::Duration(_) => units::DURATION_METHODS,
        Value::Version(_) => units::VERSION_METHODS,
        Value::Direction(_) => units::DIRECTION_METHODS,
        Value::Alignment(_) => units::ALIGNMENT_METHODS,
        _ => &[],
    };
    names.contains(&name)
}

/// Consume an optional named `default` and fall back to it when `result`
/// failed.
fn or_default(result: SourceResult<Value>, args: &mut Args) -> SourceResult<Value> {
    let default = args.named::<Value>("default")?;
    match (result, default) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default),
        (Err(error), None) => Err(error),
    }
}

/// Call `func` with positional values.
fn apply(
    engine: &mut Engine,
    context: &Context,
    func: &Func,
    span: Span,
    values: impl IntoIterator<Item = Value>,
) -> SourceResult<Value> {
    func.call(engine, context, Args::positional(span, values))
}

/// Call a predicate and require a boolean answer.
fn test(
    engine: &mut Engine,
    context: &Context,
    func: &Func,
    span: Span,
    value: Value,
) -> SourceResult<bool> {
    let output = apply(engine, context, func, span, [value])?;
    bool::from_value(output).at(span)
}

#[cfg(test)]
mod tests;
