//! Call arguments and the protocol natives use to consume them.
//!
//! Natives pull their parameters out of an [`Args`] one by one: `eat` for
//! the next positional argument, `named` for a named one, `expect` for a
//! required parameter. Whatever is left when [`Args::finish`] runs is an
//! error, so an argument is never silently ignored and never read twice.

use std::fmt;

use folio_ir::{Span, Spanned};

use crate::errors::{missing_argument, unexpected_argument, ArgSlot, At, SourceResult};
use crate::value::{Array, Dict, FromValue, Str, Value};

/// One argument of a call.
#[derive(Clone, PartialEq, Hash)]
pub struct Arg {
    /// The span of the whole argument, including its name.
    pub span: Span,
    pub name: Option<Str>,
    pub value: Spanned<Value>,
}

/// The arguments of a call, in source order.
#[derive(Clone, PartialEq, Hash)]
pub struct Args {
    /// The span of the argument list.
    pub span: Span,
    pub items: Vec<Arg>,
    /// Positional arguments consumed so far.
    eaten: usize,
}

impl Args {
    pub fn new(span: Span) -> Self {
        Args {
            span,
            items: Vec::new(),
            eaten: 0,
        }
    }

    /// Positional arguments from plain values.
    pub fn positional(span: Span, values: impl IntoIterator<Item = Value>) -> Self {
        Args {
            span,
            items: values
                .into_iter()
                .map(|value| Arg {
                    span,
                    name: None,
                    value: Spanned::new(value, span),
                })
                .collect(),
            eaten: 0,
        }
    }

    pub fn push(&mut self, span: Span, value: Value) {
        self.items.push(Arg {
            span,
            name: None,
            value: Spanned::new(value, span),
        });
    }

    pub fn push_named(&mut self, name: impl Into<Str>, span: Span, value: Value) {
        self.items.push(Arg {
            span,
            name: Some(name.into()),
            value: Spanned::new(value, span),
        });
    }

    /// The number of positional arguments left.
    pub fn count_positional(&self) -> usize {
        self.items.iter().filter(|arg| arg.name.is_none()).count()
    }

    /// Consume the next positional argument, keeping its span.
    pub fn eat_spanned(&mut self) -> Option<Spanned<Value>> {
        let index = self.items.iter().position(|arg| arg.name.is_none())?;
        self.eaten += 1;
        Some(self.items.remove(index).value)
    }

    /// Consume and cast the next positional argument.
    pub fn eat<T: FromValue>(&mut self) -> SourceResult<Option<T>> {
        match self.eat_spanned() {
            Some(Spanned { v, span }) => T::from_value(v).at(span).map(Some),
            None => Ok(None),
        }
    }

    /// Consume a required argument: named `what` if given, otherwise the
    /// next positional one.
    pub fn expect<T: FromValue>(&mut self, what: &str) -> SourceResult<T> {
        if let Some(value) = self.named(what)? {
            return Ok(value);
        }
        match self.eat()? {
            Some(value) => Ok(value),
            None => Err(missing_argument(what).with_span(self.span)),
        }
    }

    /// Consume every argument named `name`; the last one wins.
    pub fn named_spanned(&mut self, name: &str) -> Option<Spanned<Value>> {
        let mut found = None;
        let mut index = 0;
        while index < self.items.len() {
            if self.items[index].name.as_deref() == Some(name) {
                found = Some(self.items.remove(index).value);
            } else {
                index += 1;
            }
        }
        found
    }

    /// Consume and cast a named argument.
    pub fn named<T: FromValue>(&mut self, name: &str) -> SourceResult<Option<T>> {
        match self.named_spanned(name) {
            Some(Spanned { v, span }) => T::from_value(v).at(span).map(Some),
            None => Ok(None),
        }
    }

    /// Look at a named argument without consuming it.
    pub fn find<T: FromValue>(&self, name: &str) -> SourceResult<Option<T>> {
        match self
            .items
            .iter()
            .rev()
            .find(|arg| arg.name.as_deref() == Some(name))
        {
            Some(arg) => T::from_value(arg.value.v.clone()).at(arg.value.span).map(Some),
            None => Ok(None),
        }
    }

    /// Consume every remaining positional argument, keeping spans.
    pub fn all_spanned(&mut self) -> Vec<Spanned<Value>> {
        let mut out = Vec::new();
        let eaten = &mut self.eaten;
        self.items.retain(|arg| {
            if arg.name.is_none() {
                *eaten += 1;
                out.push(arg.value.clone());
                false
            } else {
                true
            }
        });
        out
    }

    /// Consume and cast every remaining positional argument.
    pub fn all<T: FromValue>(&mut self) -> SourceResult<Vec<T>> {
        self.all_spanned()
            .into_iter()
            .map(|Spanned { v, span }| T::from_value(v).at(span))
            .collect()
    }

    /// Take all remaining arguments, leaving this bundle empty.
    pub fn take(&mut self) -> Args {
        Args {
            span: self.span,
            items: std::mem::take(&mut self.items),
            eaten: self.eaten,
        }
    }

    /// Fail on the first argument nobody consumed. A positional one is
    /// reported by its index in the original call.
    pub fn finish(self) -> SourceResult<()> {
        let Some(arg) = self.items.into_iter().next() else {
            return Ok(());
        };
        let slot = match arg.name {
            Some(name) => ArgSlot::Named(name.to_string()),
            None => ArgSlot::Positional(self.eaten),
        };
        Err(unexpected_argument(slot).with_span(arg.span))
    }

    /// The positional arguments as an array.
    pub fn to_pos(&self) -> Array {
        self.items
            .iter()
            .filter(|arg| arg.name.is_none())
            .map(|arg| arg.value.v.clone())
            .collect()
    }

    /// The named arguments as a dictionary.
    pub fn to_named(&self) -> Dict {
        self.items
            .iter()
            .filter_map(|arg| Some((arg.name.clone()?, arg.value.v.clone())))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn repr(&self) -> String {
        let parts: Vec<String> = self
            .items
            .iter()
            .map(|arg| match &arg.name {
                Some(name) => format!("{name}: {}", arg.value.v.repr()),
                None => arg.value.v.repr(),
            })
            .collect();
        format!("arguments({})", parts.join(", "))
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}
