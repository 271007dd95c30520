//! Methods on strings, arrays, dictionaries, bytes and arguments.

use std::cmp::Ordering;

use unicode_segmentation::UnicodeSegmentation;

use super::{apply, or_default, test};
use crate::args::Args;
use crate::engine::{Context, Engine};
use crate::errors::{index_out_of_bounds, integer_overflow, unknown_method, At, EvalError, SourceResult};
use crate::func::Func;
use crate::ops;
use crate::value::{mismatch, Alignment, Array, Bytes, Dict, FromValue, Regex, Str, Value};

pub(super) const STR_METHODS: &[&str] = &[
    "len",
    "first",
    "last",
    "at",
    "slice",
    "clusters",
    "codepoints",
    "contains",
    "starts-with",
    "ends-with",
    "find",
    "position",
    "match",
    "matches",
    "replace",
    "trim",
    "split",
    "rev",
];

pub(super) const ARRAY_METHODS: &[&str] = &[
    "len",
    "first",
    "last",
    "at",
    "slice",
    "contains",
    "find",
    "position",
    "filter",
    "map",
    "enumerate",
    "zip",
    "fold",
    "sum",
    "product",
    "any",
    "all",
    "flatten",
    "rev",
    "split",
    "join",
    "intersperse",
    "chunks",
    "sorted",
    "dedup",
    "push",
    "pop",
    "insert",
    "remove",
];

pub(super) const DICT_METHODS: &[&str] = &[
    "len", "at", "keys", "values", "pairs", "insert", "remove",
];

pub(super) const BYTES_METHODS: &[&str] = &["len", "at", "slice"];

pub(super) const ARGS_METHODS: &[&str] = &["pos", "named"];

/// What string methods search for.
enum Pattern {
    Str(Str),
    Regex(Regex),
}

impl FromValue for Pattern {
    fn describe() -> String {
        "string or regex".into()
    }

    fn from_value(value: Value) -> SourceResult<Self> {
        match value {
            Value::Regex(regex) => Ok(Pattern::Regex(regex)),
            Value::Str(text) => Ok(Pattern::Str(text)),
            Value::Symbol(symbol) => Ok(Pattern::Str(symbol.get().into())),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Pattern {
    /// All non-overlapping matches as (start, text, captures). An empty
    /// string matches at every character boundary.
    fn find_all<'a>(&self, haystack: &'a str) -> Vec<(usize, &'a str, Array)> {
        match self {
            Pattern::Str(needle) => haystack
                .match_indices(needle.as_str())
                .map(|(start, text)| (start, text, Array::new()))
                .collect(),
            Pattern::Regex(regex) => regex
                .captures_iter(haystack)
                .filter_map(|caps| {
                    let whole = caps.get(0)?;
                    let groups = caps
                        .iter()
                        .skip(1)
                        .map(|group| group.map_or(Value::None, |m| Value::str(m.as_str())))
                        .collect();
                    Some((whole.start(), whole.as_str(), groups))
                })
                .collect(),
        }
    }

    fn find_first<'a>(&self, haystack: &'a str) -> Option<(usize, &'a str, Array)> {
        self.find_all(haystack).into_iter().next()
    }
}

fn match_dict(start: usize, text: &str, captures: Array) -> Value {
    let mut dict = Dict::new();
    dict.insert("start".into(), Value::from(start));
    dict.insert("end".into(), Value::from(start + text.len()));
    dict.insert("text".into(), Value::str(text));
    dict.insert("captures".into(), Value::Array(captures));
    Value::Dict(dict)
}

/// Resolve a possibly negative byte index into a string.
fn locate_byte(s: &str, index: i64, end_ok: bool) -> SourceResult<usize> {
    let len = s.len();
    let resolved = if index >= 0 {
        usize::try_from(index).ok()
    } else {
        len.checked_sub(index.unsigned_abs() as usize)
    };
    match resolved {
        Some(i) if i < len || (end_ok && i == len) => {
            if s.is_char_boundary(i) {
                Ok(i)
            } else {
                Err(EvalError::new(format!(
                    "string index {index} is not a character boundary"
                )))
            }
        }
        _ => Err(index_out_of_bounds(index, len)),
    }
}

fn int(n: usize) -> Value {
    Value::from(n)
}

pub(super) fn str(
    engine: &mut Engine,
    context: &Context,
    s: &Str,
    name: &str,
    args: &mut Args,
) -> Option<SourceResult<Value>> {
    STR_METHODS
        .contains(&name)
        .then(|| str_method(engine, context, s, name, args))
}

fn str_method(
    engine: &mut Engine,
    context: &Context,
    s: &Str,
    name: &str,
    args: &mut Args,
) -> SourceResult<Value> {
    let empty = || EvalError::new("string is empty");
    Ok(match name {
        "len" => int(s.len()),
        "first" => Value::str(s.graphemes(true).next().ok_or_else(empty)?),
        "last" => Value::str(s.graphemes(true).next_back().ok_or_else(empty)?),
        "at" => {
            let index = args.expect::<i64>("index")?;
            let found = locate_byte(s, index, false).and_then(|i| {
                s[i..]
                    .graphemes(true)
                    .next()
                    .map(Value::str)
                    .ok_or_else(|| index_out_of_bounds(index, s.len()))
            });
            or_default(found, args)?
        }
        "slice" => {
            let start = args.expect::<i64>("start")?;
            let end = args.eat::<i64>()?;
            let count = args.named::<i64>("count")?;
            let start = locate_byte(s, start, true)?;
            let end = match (end, count) {
                (Some(end), _) => locate_byte(s, end, true)?,
                (None, Some(count)) => {
                    let target = i64::try_from(start).unwrap_or(i64::MAX).saturating_add(count);
                    locate_byte(s, target, true)?
                }
                (None, None) => s.len(),
            };
            Value::str(&s[start..end.max(start)])
        }
        "clusters" => Value::Array(s.graphemes(true).map(Value::str).collect()),
        "codepoints" => Value::Array(s.chars().map(Value::str).collect()),
        "contains" => {
            let pattern = args.expect::<Pattern>("pattern")?;
            Value::Bool(match pattern {
                Pattern::Str(needle) => s.contains(needle.as_str()),
                Pattern::Regex(regex) => regex.is_match(s),
            })
        }
        "starts-with" => {
            let pattern = args.expect::<Pattern>("pattern")?;
            Value::Bool(match pattern {
                Pattern::Str(needle) => s.starts_with(needle.as_str()),
                Pattern::Regex(regex) => regex.find(s).is_some_and(|m| m.start() == 0),
            })
        }
        "ends-with" => {
            let pattern = args.expect::<Pattern>("pattern")?;
            Value::Bool(match pattern {
                Pattern::Str(needle) => s.ends_with(needle.as_str()),
                Pattern::Regex(regex) => regex.find_iter(s).any(|m| m.end() == s.len()),
            })
        }
        "find" => {
            let pattern = args.expect::<Pattern>("pattern")?;
            pattern
                .find_first(s)
                .map_or(Value::None, |(_, text, _)| Value::str(text))
        }
        "position" => {
            let pattern = args.expect::<Pattern>("pattern")?;
            pattern
                .find_first(s)
                .map_or(Value::None, |(start, _, _)| int(start))
        }
        "match" => {
            let pattern = args.expect::<Pattern>("pattern")?;
            pattern
                .find_first(s)
                .map_or(Value::None, |(start, text, caps)| match_dict(start, text, caps))
        }
        "matches" => {
            let pattern = args.expect::<Pattern>("pattern")?;
            Value::Array(
                pattern
                    .find_all(s)
                    .into_iter()
                    .map(|(start, text, caps)| match_dict(start, text, caps))
                    .collect(),
            )
        }
        "replace" => {
            let pattern = args.expect::<Pattern>("pattern")?;
            let replacement = args.expect::<Value>("replacement")?;
            let count = args.named::<usize>("count")?.unwrap_or(usize::MAX);
            let mut out = String::with_capacity(s.len());
            let mut last = 0;
            for (start, text, caps) in pattern.find_all(s).into_iter().take(count) {
                out.push_str(&s[last..start]);
                match &replacement {
                    Value::Func(func) => {
                        let found = match_dict(start, text, caps);
                        let output = apply(engine, context, func, args.span, [found])?;
                        out.push_str(&Str::from_value(output).at(args.span)?);
                    }
                    other => out.push_str(&Str::from_value(other.clone())?),
                }
                last = start + text.len();
            }
            out.push_str(&s[last..]);
            Value::str(out)
        }
        "trim" => {
            let pattern = args.eat::<Pattern>()?;
            let at = args.named::<Alignment>("at")?;
            let repeat = args.named::<bool>("repeat")?.unwrap_or(true);
            let (start, end) = match at {
                None => (true, true),
                Some(Alignment::START) => (true, false),
                Some(Alignment::END) => (false, true),
                Some(_) => {
                    return Err(EvalError::new("expected either `start` or `end`"));
                }
            };
            Value::str(trim(s, pattern.as_ref(), start, end, repeat))
        }
        "split" => {
            let pattern = args.eat::<Pattern>()?;
            let parts: Array = match pattern {
                None => s.split_whitespace().map(Value::str).collect(),
                Some(Pattern::Str(sep)) => s.split(sep.as_str()).map(Value::str).collect(),
                Some(Pattern::Regex(regex)) => regex.split(s).map(Value::str).collect(),
            };
            Value::Array(parts)
        }
        "rev" => Value::str(s.graphemes(true).rev().collect::<String>()),
        _ => return Err(unknown_method("string", name)),
    })
}

fn trim(s: &str, pattern: Option<&Pattern>, start: bool, end: bool, repeat: bool) -> String {
    let Some(pattern) = pattern else {
        let out = match (start, end) {
            (true, true) => s.trim(),
            (true, false) => s.trim_start(),
            _ => s.trim_end(),
        };
        return out.to_string();
    };
    let mut text = s;
    loop {
        let before = text.len();
        match pattern {
            Pattern::Str(needle) if needle.is_empty() => break,
            Pattern::Str(needle) => {
                if start {
                    text = text.strip_prefix(needle.as_str()).unwrap_or(text);
                }
                if end {
                    text = text.strip_suffix(needle.as_str()).unwrap_or(text);
                }
            }
            Pattern::Regex(regex) => {
                if start {
                    if let Some(m) = regex.find(text).filter(|m| m.start() == 0 && !m.is_empty()) {
                        text = &text[m.end()..];
                    }
                }
                if end {
                    if let Some(m) = regex
                        .find_iter(text)
                        .find(|m| m.end() == text.len() && !m.is_empty())
                    {
                        text = &text[..m.start()];
                    }
                }
            }
        }
        if !repeat || text.len() == before {
            break;
        }
    }
    text.to_string()
}

pub(super) fn array(
    engine: &mut Engine,
    context: &Context,
    array: &Array,
    name: &str,
    args: &mut Args,
) -> Option<SourceResult<Value>> {
    (ARRAY_METHODS.contains(&name) && !super::is_mutating(name))
        .then(|| array_method(engine, context, array, name, args))
}

#[allow(clippy::too_many_lines)]
fn array_method(
    engine: &mut Engine,
    context: &Context,
    array: &Array,
    name: &str,
    args: &mut Args,
) -> SourceResult<Value> {
    let span = args.span;
    let empty = || EvalError::new("array is empty");
    Ok(match name {
        "len" => int(array.len()),
        "first" => array.as_slice().first().cloned().ok_or_else(empty)?,
        "last" => array.as_slice().last().cloned().ok_or_else(empty)?,
        "at" => {
            let index = args.expect::<i64>("index")?;
            or_default(array.at(index).cloned(), args)?
        }
        "slice" => {
            let start = args.expect::<i64>("start")?;
            let end = args.eat::<i64>()?;
            let count = args.named::<i64>("count")?;
            let end = match (end, count) {
                (Some(end), _) => Some(end),
                (None, Some(count)) => {
                    let first = array.locate(start, true)?;
                    Some(i64::try_from(first).unwrap_or(i64::MAX).saturating_add(count))
                }
                (None, None) => None,
            };
            Value::Array(array.slice(start, end)?)
        }
        "contains" => {
            let needle = args.expect::<Value>("value")?;
            Value::Bool(array.iter().any(|item| ops::equal(item, &needle)))
        }
        "find" => {
            let func = args.expect::<Func>("searcher")?;
            for item in array.iter() {
                if test(engine, context, &func, span, item.clone())? {
                    return Ok(item.clone());
                }
            }
            Value::None
        }
        "position" => {
            let func = args.expect::<Func>("searcher")?;
            for (i, item) in array.iter().enumerate() {
                if test(engine, context, &func, span, item.clone())? {
                    return Ok(int(i));
                }
            }
            Value::None
        }
        "filter" => {
            let func = args.expect::<Func>("test")?;
            let mut out = Array::new();
            for item in array.iter() {
                if test(engine, context, &func, span, item.clone())? {
                    out.push(item.clone());
                }
            }
            Value::Array(out)
        }
        "map" => {
            let func = args.expect::<Func>("mapper")?;
            let mut out = Array::new();
            for item in array.iter() {
                out.push(apply(engine, context, &func, span, [item.clone()])?);
            }
            Value::Array(out)
        }
        "enumerate" => {
            let start = args.named::<i64>("start")?.unwrap_or(0);
            let mut out = Array::new();
            for (i, item) in array.iter().enumerate() {
                let index = i64::try_from(i)
                    .ok()
                    .and_then(|i| i.checked_add(start))
                    .ok_or_else(integer_overflow)?;
                out.push(Value::Array(Array::from(vec![Value::Int(index), item.clone()])));
            }
            Value::Array(out)
        }
        "zip" => {
            let others = args.all::<Array>()?;
            let len = others.iter().map(Array::len).fold(array.len(), usize::min);
            let mut out = Array::new();
            for i in 0..len {
                let mut row = vec![array.as_slice()[i].clone()];
                row.extend(others.iter().map(|other| other.as_slice()[i].clone()));
                out.push(Value::Array(Array::from(row)));
            }
            Value::Array(out)
        }
        "fold" => {
            let mut acc = args.expect::<Value>("init")?;
            let func = args.expect::<Func>("folder")?;
            for item in array.iter() {
                acc = apply(engine, context, &func, span, [acc, item.clone()])?;
            }
            acc
        }
        "sum" | "product" => {
            let default = args.named::<Value>("default")?;
            let op = if name == "sum" { ops::add } else { ops::mul };
            let mut items = array.iter().cloned();
            let Some(mut acc) = items.next().or(default) else {
                return Err(EvalError::new(format!(
                    "cannot calculate {name} of empty array with no default"
                )));
            };
            for item in items {
                acc = op(acc, item)?;
            }
            acc
        }
        "any" | "all" => {
            let func = args.expect::<Func>("test")?;
            let want = name == "any";
            for item in array.iter() {
                if test(engine, context, &func, span, item.clone())? == want {
                    return Ok(Value::Bool(want));
                }
            }
            Value::Bool(!want)
        }
        "flatten" => {
            let mut out = Array::new();
            flatten_into(array, &mut out);
            Value::Array(out)
        }
        "rev" => Value::Array(array.iter().rev().cloned().collect()),
        "split" => {
            let at = args.expect::<Value>("at")?;
            let mut out = Array::new();
            let mut current = Array::new();
            for item in array.iter() {
                if ops::equal(item, &at) {
                    out.push(Value::Array(std::mem::take(&mut current)));
                } else {
                    current.push(item.clone());
                }
            }
            out.push(Value::Array(current));
            Value::Array(out)
        }
        "join" => {
            let separator = args.eat::<Value>()?;
            let last = args.named::<Value>("last")?;
            let len = array.len();
            let mut acc = Value::None;
            for (i, item) in array.iter().enumerate() {
                if i > 0 {
                    let sep = if i + 1 == len {
                        last.as_ref().or(separator.as_ref())
                    } else {
                        separator.as_ref()
                    };
                    if let Some(sep) = sep {
                        acc = ops::join(acc, sep.clone())?;
                    }
                }
                acc = ops::join(acc, item.clone())?;
            }
            acc
        }
        "intersperse" => {
            let separator = args.expect::<Value>("separator")?;
            let mut out = Array::new();
            for (i, item) in array.iter().enumerate() {
                if i > 0 {
                    out.push(separator.clone());
                }
                out.push(item.clone());
            }
            Value::Array(out)
        }
        "chunks" => {
            let size = args.expect::<usize>("chunk-size")?;
            let exact = args.named::<bool>("exact")?.unwrap_or(false);
            if size == 0 {
                return Err(EvalError::new("number must be positive"));
            }
            let chunks = array.as_slice().chunks(size);
            Value::Array(
                chunks
                    .filter(|chunk| !exact || chunk.len() == size)
                    .map(|chunk| Value::Array(chunk.iter().cloned().collect()))
                    .collect(),
            )
        }
        "sorted" => {
            let key = args.named::<Func>("key")?;
            let mut pairs = Vec::with_capacity(array.len());
            for item in array.iter() {
                let k = match &key {
                    Some(func) => apply(engine, context, func, span, [item.clone()])?,
                    None => item.clone(),
                };
                pairs.push((k, item.clone()));
            }
            let mut error = None;
            pairs.sort_by(|a, b| {
                ops::compare(&a.0, &b.0).unwrap_or_else(|e| {
                    error.get_or_insert(e);
                    Ordering::Equal
                })
            });
            if let Some(error) = error {
                return Err(error);
            }
            Value::Array(pairs.into_iter().map(|(_, item)| item).collect())
        }
        "dedup" => {
            let key = args.named::<Func>("key")?;
            let mut seen: Vec<Value> = Vec::new();
            let mut out = Array::new();
            for item in array.iter() {
                let k = match &key {
                    Some(func) => apply(engine, context, func, span, [item.clone()])?,
                    None => item.clone(),
                };
                if !seen.iter().any(|s| ops::equal(s, &k)) {
                    seen.push(k);
                    out.push(item.clone());
                }
            }
            Value::Array(out)
        }
        _ => return Err(unknown_method("array", name)),
    })
}

fn flatten_into(array: &Array, out: &mut Array) {
    for item in array.iter() {
        match item {
            Value::Array(nested) => flatten_into(nested, out),
            other => out.push(other.clone()),
        }
    }
}

pub(super) fn dict(dict: &Dict, name: &str, args: &mut Args) -> Option<SourceResult<Value>> {
    let output = match name {
        "len" => Ok(int(dict.len())),
        "at" => args
            .expect::<Str>("key")
            .and_then(|key| or_default(dict.at(&key).cloned(), args)),
        "keys" => Ok(Value::Array(dict.keys().cloned().map(Value::Str).collect())),
        "values" => Ok(Value::Array(dict.values().cloned().collect())),
        "pairs" => Ok(Value::Array(
            dict.iter()
                .map(|(k, v)| Value::Array(Array::from(vec![Value::Str(k.clone()), v.clone()])))
                .collect(),
        )),
        _ => return None,
    };
    Some(output)
}

pub(super) fn bytes(bytes: &Bytes, name: &str, args: &mut Args) -> Option<SourceResult<Value>> {
    let as_array = || bytes.iter().map(|b| Value::Int(i64::from(*b))).collect::<Array>();
    let output = match name {
        "len" => Ok(int(bytes.len())),
        "at" => args.expect::<i64>("index").and_then(|index| {
            let found = as_array().at(index).cloned();
            or_default(found, args)
        }),
        "slice" => bytes_slice(bytes, args),
        _ => return None,
    };
    Some(output)
}

fn bytes_slice(bytes: &Bytes, args: &mut Args) -> SourceResult<Value> {
    let start = args.expect::<i64>("start")?;
    let end = args.eat::<i64>()?;
    let items: Array = bytes.iter().map(|b| Value::Int(i64::from(*b))).collect();
    let first = items.locate(start, true)?;
    let last = match end {
        Some(end) => items.locate(end, true)?.max(first),
        None => items.len(),
    };
    Ok(Value::Bytes(Bytes::from(&bytes[first..last])))
}

pub(super) fn args(arguments: &Args, name: &str) -> Option<SourceResult<Value>> {
    match name {
        "pos" => Some(Ok(Value::Array(arguments.to_pos()))),
        "named" => Some(Ok(Value::Dict(arguments.to_named()))),
        _ => None,
    }
}
