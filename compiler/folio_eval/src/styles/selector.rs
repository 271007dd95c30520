use std::fmt;
use std::sync::Arc;

use crate::args::Args;
use crate::content::{Content, ElemKind};
use crate::engine::{Context, Engine};
use crate::errors::{show_rule_error, SourceResult};
use crate::func::{Func, NativeFunc};
use crate::value::{mismatch, FromValue, Label, Regex, Str, Value};

/// Describes which elements a show rule applies to.
#[derive(Clone, PartialEq, Hash)]
pub enum Selector {
    /// Elements of a kind, optionally filtered: `heading.where(level: 1)`.
    Elem { kind: ElemKind, filter: Option<Func> },
    /// Elements carrying a label.
    Label(Label),
    /// Occurrences of a literal in text.
    Text(Str),
    /// Matches of a regular expression in text.
    Regex(Regex),
    /// Elements for which a function returns a truthy value.
    Predicate(Func),
    Or(Arc<[Selector]>),
    And(Arc<[Selector]>),
    /// Matches of `selector` located before the first match of `end`.
    Before {
        selector: Arc<Selector>,
        end: Arc<Selector>,
        inclusive: bool,
    },
    /// Matches of `selector` located after the first match of `start`.
    After {
        selector: Arc<Selector>,
        start: Arc<Selector>,
        inclusive: bool,
    },
}

static WHERE: NativeFunc = NativeFunc {
    name: "where",
    params: &[],
    func: where_matches,
    element: None,
    scope: None,
};

/// Compare an element's fields against the pre-applied named arguments.
fn where_matches(_: &mut Engine, _: &Context, args: &mut Args) -> SourceResult<Value> {
    let content: Content = args.expect("element")?;
    let fields = args.take();
    let Some(elem) = content.to_single() else {
        return Ok(Value::Bool(false));
    };
    let matches = fields.items.iter().all(|arg| match &arg.name {
        Some(name) if name.as_str() == "label" => {
            matches!(&arg.value.v, Value::Label(l) if elem.label() == Some(*l))
        }
        Some(name) => elem.get(name).as_ref() == Some(&arg.value.v),
        None => true,
    });
    Ok(Value::Bool(matches))
}

impl Selector {
    pub fn elem(kind: ElemKind) -> Self {
        Selector::Elem { kind, filter: None }
    }

    /// Select elements of `kind` whose fields equal the named `fields`.
    pub fn with_where(kind: ElemKind, fields: Args) -> Self {
        Selector::Elem {
            kind,
            filter: Some(Func::Native(&WHERE).with(fields)),
        }
    }

    pub fn repr(&self) -> String {
        match self {
            Selector::Elem { kind, filter: None } => kind.name().into(),
            Selector::Elem {
                kind,
                filter: Some(filter),
            } => match filter {
                Func::With(with) if with.0 == Func::Native(&WHERE) => {
                    let inner = with.1.repr();
                    let fields = inner
                        .strip_prefix("arguments")
                        .unwrap_or(&inner)
                        .to_string();
                    format!("{}.where{fields}", kind.name())
                }
                _ => format!("{}.where(..)", kind.name()),
            },
            Selector::Label(label) => label.to_string(),
            Selector::Text(text) => text.repr(),
            Selector::Regex(regex) => format!("{regex:?}"),
            Selector::Predicate(func) => format!("selector({})", func.repr()),
            Selector::Or(list) => format!("selector.or({})", join(list)),
            Selector::And(list) => format!("selector.and({})", join(list)),
            Selector::Before {
                selector,
                end,
                inclusive,
            } => format!(
                "{}.before({}, inclusive: {inclusive})",
                selector.repr(),
                end.repr()
            ),
            Selector::After {
                selector,
                start,
                inclusive,
            } => format!(
                "{}.after({}, inclusive: {inclusive})",
                selector.repr(),
                start.repr()
            ),
        }
    }
}

fn join(list: &[Selector]) -> String {
    list.iter()
        .map(Selector::repr)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

impl FromValue for Selector {
    fn describe() -> String {
        "selector, label, string, regex or function".into()
    }

    fn from_value(value: Value) -> SourceResult<Self> {
        match value {
            Value::Selector(selector) => Ok(selector),
            Value::Label(label) => Ok(Selector::Label(label)),
            Value::Str(text) if text.is_empty() => Err(show_rule_error("text selector is empty")),
            Value::Str(text) => Ok(Selector::Text(text)),
            Value::Symbol(symbol) => Ok(Selector::Text(symbol.get().into())),
            Value::Regex(regex) => Ok(Selector::Regex(regex)),
            Value::Func(func) => Ok(match func.element() {
                Some(kind) => Selector::elem(kind),
                None => Selector::Predicate(func),
            }),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}
