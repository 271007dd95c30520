//! Methods on content, functions and selectors.

use std::sync::Arc;

use crate::args::Args;
use crate::content::Content;
use crate::errors::{unknown_field, EvalError, SourceResult};
use crate::func::Func;
use crate::styles::Selector;
use crate::value::{Array, Str, Value};

pub(super) const CONTENT_METHODS: &[&str] = &["func", "has", "at", "fields"];
pub(super) const FUNC_METHODS: &[&str] = &["with", "where"];
pub(super) const SELECTOR_METHODS: &[&str] = &["or", "and", "before", "after"];

pub(super) fn content(content: &Content, name: &str, args: &mut Args) -> Option<SourceResult<Value>> {
    let single = || {
        content
            .to_single()
            .ok_or_else(|| EvalError::new("expected a single element, found a sequence"))
    };
    Some(match name {
        "func" => single().map(|elem| Value::Func(Func::Native(elem.kind().func()))),
        "has" => args.expect::<Str>("field").map(|field| {
            Value::Bool(content.to_single().is_some_and(|elem| {
                (field.as_str() == "label" && elem.label().is_some()) || elem.field(&field).is_some()
            }))
        }),
        "at" => args.expect::<Str>("field").and_then(|field| {
            let found = single().and_then(|_| {
                self::field(content, &field)
                    .ok_or_else(|| unknown_field("content", &field))
            });
            super::or_default(found, args)
        }),
        "fields" => single().map(|elem| Value::Dict(elem.fields_dict())),
        _ => return None,
    })
}

/// A field of content: the element's fields and label, or the children of
/// a sequence.
pub(super) fn field(content: &Content, name: &str) -> Option<Value> {
    let Some(elem) = content.to_single() else {
        return (name == "children").then(|| {
            Value::Array(
                content
                    .iter()
                    .map(|elem| Value::Content(elem.clone().pack()))
                    .collect::<Array>(),
            )
        });
    };
    if name == "label" {
        return elem.label().map(Value::Label);
    }
    elem.get(name)
}

pub(super) fn func(func: Func, name: &str, args: &mut Args) -> Option<SourceResult<Value>> {
    Some(match name {
        "with" => Ok(Value::Func(func.with(args.take()))),
        "where" => match func.element() {
            Some(kind) => Ok(Value::Selector(Selector::with_where(kind, args.take()))),
            None => Err(EvalError::new("`where()` can only be called on element functions")),
        },
        _ => return None,
    })
}

pub(super) fn selector(
    selector: Selector,
    name: &str,
    args: &mut Args,
) -> Option<SourceResult<Value>> {
    let combine = |args: &mut Args, and: bool| -> SourceResult<Value> {
        let mut list = vec![selector.clone()];
        list.extend(args.all::<Selector>()?);
        let list: Arc<[Selector]> = list.into();
        Ok(Value::Selector(if and {
            Selector::And(list)
        } else {
            Selector::Or(list)
        }))
    };
    let bound = |args: &mut Args, what: &str| -> SourceResult<(Arc<Selector>, bool)> {
        let other = args.expect::<Selector>(what)?;
        let inclusive = args.named::<bool>("inclusive")?.unwrap_or(true);
        Ok((Arc::new(other), inclusive))
    };
    Some(match name {
        "or" => combine(args, false),
        "and" => combine(args, true),
        "before" => bound(args, "end").map(|(end, inclusive)| {
            Value::Selector(Selector::Before {
                selector: Arc::new(selector.clone()),
                end,
                inclusive,
            })
        }),
        "after" => bound(args, "start").map(|(start, inclusive)| {
            Value::Selector(Selector::After {
                selector: Arc::new(selector.clone()),
                start,
                inclusive,
            })
        }),
        _ => return None,
    })
}
