//! The content tree.
//!
//! [`Content`] is a flat sequence of [`Elem`]s. Joining splices sequences,
//! so a `Content` never contains a nested sequence; hierarchy comes from
//! element fields (`strong.body`, `list.children`). Elements are shared
//! through `Arc` and copied on write, so content is cheap to clone and
//! rebuilding a transformed tree leaves the original intact.

mod kind;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use folio_ir::Span;
use smallvec::SmallVec;

pub use self::kind::{build, set_args, ElemKind};
pub(crate) use self::kind::{cast_field, describe_types};

use crate::styles::{RecipeId, StyleChain, Styles};
use crate::value::{Array, Dict, Label, Str, Value};

/// One node of the content tree.
#[derive(Clone)]
pub struct Elem(Arc<Inner>);

#[derive(Clone)]
struct Inner {
    kind: ElemKind,
    /// Explicitly given fields, in construction order.
    fields: Vec<(&'static str, Value)>,
    span: Span,
    label: Option<Label>,
    /// Recipes that already transformed this element.
    guards: SmallVec<[RecipeId; 1]>,
}

impl Elem {
    pub fn new(kind: ElemKind) -> Self {
        Elem(Arc::new(Inner {
            kind,
            fields: Vec::new(),
            span: Span::detached(),
            label: None,
            guards: SmallVec::new(),
        }))
    }

    /// A text element.
    pub fn text(text: impl Into<Str>) -> Self {
        Elem::new(ElemKind::Text).with_field("text", Value::Str(text.into()))
    }

    /// A math symbol element.
    pub fn symbol(c: char) -> Self {
        Elem::new(ElemKind::Symbol).with_field("text", Value::Str(c.into()))
    }

    fn inner_mut(&mut self) -> &mut Inner {
        Arc::make_mut(&mut self.0)
    }

    pub fn kind(&self) -> ElemKind {
        self.0.kind
    }

    pub fn span(&self) -> Span {
        self.0.span
    }

    /// Attach a span unless the element already has one.
    #[must_use]
    pub fn spanned(mut self, span: Span) -> Self {
        if self.0.span.is_detached() && !span.is_detached() {
            self.inner_mut().span = span;
        }
        self
    }

    pub fn label(&self) -> Option<Label> {
        self.0.label
    }

    pub fn set_label(&mut self, label: Label) {
        self.inner_mut().label = Some(label);
    }

    /// Builder form of [`Elem::push_field`].
    #[must_use]
    pub fn with_field(mut self, name: &'static str, value: Value) -> Self {
        self.push_field(name, value);
        self
    }

    /// Set a field, replacing an earlier value.
    pub fn push_field(&mut self, name: &'static str, value: Value) {
        let fields = &mut self.inner_mut().fields;
        match fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => fields.push((name, value)),
        }
    }

    /// An explicitly given field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0
            .fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// A field's value: the explicit one or the kind's default.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.field(name)
            .cloned()
            .or_else(|| self.kind().default_of(name))
    }

    /// A field's value as seen under a style chain: explicit value, then
    /// set rules, then the default.
    pub fn resolve(&self, name: &str, chain: &StyleChain) -> Option<Value> {
        if let Some(value) = self.field(name) {
            return Some(value.clone());
        }
        chain
            .get(self.kind(), name)
            .or_else(|| self.kind().default_of(name))
    }

    /// A content-valued field.
    pub fn content_field(&self, name: &str) -> Option<Content> {
        match self.field(name) {
            Some(Value::Content(content)) => Some(content.clone()),
            _ => None,
        }
    }

    /// The explicit fields, in construction order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.0.fields.iter().map(|(n, v)| (*n, v))
    }

    /// The explicit fields plus the label as a dictionary.
    pub fn fields_dict(&self) -> Dict {
        let mut dict: Dict = self
            .fields()
            .map(|(n, v)| (Str::from(n), v.clone()))
            .collect();
        if let Some(label) = self.label() {
            dict.insert("label".into(), Value::Label(label));
        }
        dict
    }

    /// Replace every content field through `f`, in construction order.
    pub fn map_children<E>(
        &self,
        mut f: impl FnMut(&Content) -> Result<Content, E>,
    ) -> Result<Elem, E> {
        let mut out = self.clone();
        let mut changed = Vec::new();
        for (index, (_, value)) in self.0.fields.iter().enumerate() {
            match value {
                Value::Content(content) => {
                    changed.push((index, Value::Content(f(content)?)));
                }
                Value::Array(items) if items.iter().any(|v| matches!(v, Value::Content(_))) => {
                    let mut mapped = Array::new();
                    for item in items.iter() {
                        mapped.push(match item {
                            Value::Content(content) => Value::Content(f(content)?),
                            other => other.clone(),
                        });
                    }
                    changed.push((index, Value::Array(mapped)));
                }
                _ => {}
            }
        }
        if !changed.is_empty() {
            let fields = &mut out.inner_mut().fields;
            for (index, value) in changed {
                fields[index].1 = value;
            }
        }
        Ok(out)
    }

    /// Whether the recipe already transformed this element.
    pub fn is_guarded(&self, id: RecipeId) -> bool {
        self.0.guards.contains(&id)
    }

    /// Mark the element as transformed by the recipe.
    #[must_use]
    pub fn guarded(mut self, id: RecipeId) -> Self {
        if !self.is_guarded(id) {
            self.inner_mut().guards.push(id);
        }
        self
    }

    /// A stable identity for document-order bookkeeping.
    pub(crate) fn location(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    /// Wrap the element into content.
    pub fn pack(self) -> Content {
        Content(Arc::new(vec![self]))
    }

    /// The element's text, for text-like kinds.
    pub fn text_str(&self) -> Option<&Str> {
        match self.field("text") {
            Some(Value::Str(text)) => Some(text),
            _ => None,
        }
    }

    fn plain_text_into(&self, out: &mut String) {
        match self.kind() {
            ElemKind::Text | ElemKind::Symbol | ElemKind::Raw => {
                if let Some(text) = self.text_str() {
                    out.push_str(text);
                }
            }
            ElemKind::Space => out.push(' '),
            ElemKind::Linebreak => out.push('\n'),
            ElemKind::Parbreak => out.push_str("\n\n"),
            ElemKind::SmartQuote => {
                let double = self.get("double").and_then(|v| v.as_bool()).unwrap_or(true);
                out.push(if double { '"' } else { '\'' });
            }
            _ => {
                for (_, value) in self.fields() {
                    match value {
                        Value::Content(content) => content.plain_text_into(out),
                        Value::Array(items) => {
                            for item in items.iter() {
                                if let Value::Content(content) = item {
                                    content.plain_text_into(out);
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    pub fn repr(&self) -> String {
        let mut out = match self.kind() {
            ElemKind::Text => format!("[{}]", self.text_str().map_or("", |t| t.as_str())),
            ElemKind::Space => "[ ]".into(),
            _ => {
                let fields: Vec<String> = self
                    .fields()
                    .map(|(name, value)| format!("{name}: {}", value.repr()))
                    .collect();
                format!("{}({})", self.kind().name(), fields.join(", "))
            }
        };
        if let Some(label) = self.label() {
            out.push(' ');
            out.push_str(&label.to_string());
        }
        out
    }
}

impl PartialEq for Elem {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        self.kind() == other.kind()
            && self.label() == other.label()
            && self.0.fields.len() == other.0.fields.len()
            && self
                .fields()
                .all(|(name, value)| other.field(name) == Some(value))
    }
}

impl Hash for Elem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        self.label().hash(state);
        let mut fields: Vec<_> = self.fields().collect();
        fields.sort_by_key(|(name, _)| *name);
        fields.hash(state);
    }
}

impl fmt::Debug for Elem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

/// What happened to a label written after some content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LabelAttach {
    Attached,
    /// The element already had a label; the new one replaced it.
    Double(Label),
    /// No labellable element precedes the label.
    Dangling,
}

/// A flat sequence of elements.
#[derive(Clone, Default)]
pub struct Content(Arc<Vec<Elem>>);

fn shared(kind: ElemKind, cell: &'static OnceLock<Elem>) -> Content {
    cell.get_or_init(|| Elem::new(kind)).clone().pack()
}

impl Content {
    pub fn empty() -> Self {
        Content::default()
    }

    /// A single text element.
    pub fn text(text: impl Into<Str>) -> Self {
        Elem::text(text).pack()
    }

    /// The shared space element.
    pub fn space() -> Self {
        static SPACE: OnceLock<Elem> = OnceLock::new();
        shared(ElemKind::Space, &SPACE)
    }

    /// The shared paragraph break.
    pub fn parbreak() -> Self {
        static PARBREAK: OnceLock<Elem> = OnceLock::new();
        shared(ElemKind::Parbreak, &PARBREAK)
    }

    pub fn linebreak() -> Self {
        static LINEBREAK: OnceLock<Elem> = OnceLock::new();
        shared(ElemKind::Linebreak, &LINEBREAK)
    }

    /// Concatenate many contents into one flat sequence.
    pub fn sequence(parts: impl IntoIterator<Item = Content>) -> Self {
        let mut out = Content::empty();
        for part in parts {
            out.extend(part);
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn elems(&self) -> &[Elem] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Elem> {
        self.0.iter()
    }

    /// The only element, if there is exactly one.
    pub fn to_single(&self) -> Option<&Elem> {
        match self.0.as_slice() {
            [elem] => Some(elem),
            _ => None,
        }
    }

    pub fn push(&mut self, elem: Elem) {
        Arc::make_mut(&mut self.0).push(elem);
    }

    pub fn extend(&mut self, other: Content) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = other;
            return;
        }
        let elems = Arc::make_mut(&mut self.0);
        match Arc::try_unwrap(other.0) {
            Ok(owned) => elems.extend(owned),
            Err(shared) => elems.extend(shared.iter().cloned()),
        }
    }

    /// The content `n` times in a row; `None` if the result cannot be
    /// allocated.
    pub fn repeat(&self, n: usize) -> Option<Content> {
        if self.is_empty() {
            return Some(Content::empty());
        }
        let mut elems = Vec::new();
        elems.try_reserve_exact(self.len().checked_mul(n)?).ok()?;
        for _ in 0..n {
            elems.extend(self.iter().cloned());
        }
        Some(Content(Arc::new(elems)))
    }

    /// The concatenation of two contents.
    #[must_use]
    pub fn join(&self, other: &Content) -> Content {
        let mut out = self.clone();
        out.extend(other.clone());
        out
    }

    /// Apply styles to the content by wrapping it.
    #[must_use]
    pub fn styled(self, styles: Styles) -> Content {
        if styles.is_empty() {
            return self;
        }
        Elem::new(ElemKind::Styled)
            .with_field("child", Value::Content(self))
            .with_field("styles", Value::Styles(styles))
            .pack()
    }

    /// Give every element without a span this one.
    #[must_use]
    pub fn spanned(self, span: Span) -> Content {
        if span.is_detached() || self.iter().all(|elem| !elem.span().is_detached()) {
            return self;
        }
        Content(Arc::new(
            self.iter().map(|elem| elem.clone().spanned(span)).collect(),
        ))
    }

    /// Attach a label to the last labellable element. Spaces between that
    /// element and the label are dropped.
    pub fn attach_label(&mut self, label: Label) -> LabelAttach {
        let Some(index) = self.0.iter().rposition(|e| e.kind().is_labellable()) else {
            return LabelAttach::Dangling;
        };
        let elems = Arc::make_mut(&mut self.0);
        let trailing = elems.split_off(index + 1);
        elems.extend(trailing.into_iter().filter(|e| e.kind() != ElemKind::Space));
        let elem = &mut elems[index];
        let previous = elem.label();
        elem.set_label(label);
        match previous {
            Some(old) => LabelAttach::Double(old),
            None => LabelAttach::Attached,
        }
    }

    /// The content's text without markup.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.plain_text_into(&mut out);
        out
    }

    fn plain_text_into(&self, out: &mut String) {
        for elem in self.iter() {
            elem.plain_text_into(out);
        }
    }

    /// Wrap the content in a contextual element calling `func` once the
    /// style chain is known.
    pub fn contextual(func: crate::func::Func) -> Content {
        Elem::new(ElemKind::Context)
            .with_field("func", Value::Func(func))
            .pack()
    }

    pub fn repr(&self) -> String {
        match self.0.as_slice() {
            [] => "[]".into(),
            [elem] => elem.repr(),
            elems => {
                let parts: Vec<String> = elems.iter().map(Elem::repr).collect();
                format!("sequence({})", parts.join(", "))
            }
        }
    }
}

impl From<Elem> for Content {
    fn from(elem: Elem) -> Self {
        elem.pack()
    }
}

impl FromIterator<Elem> for Content {
    fn from_iter<I: IntoIterator<Item = Elem>>(iter: I) -> Self {
        Content(Arc::new(iter.into_iter().collect()))
    }
}

impl<'a> IntoIterator for &'a Content {
    type Item = &'a Elem;
    type IntoIter = std::slice::Iter<'a, Elem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for Content {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Hash for Content {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}
