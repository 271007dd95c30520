//! Markup evaluation.

use folio_diagnostic::ErrorCode;
use folio_ir::{ExprId, ExprKind, Span};

use super::Vm;
use crate::content::{Content, Elem, ElemKind, LabelAttach};
use crate::errors::SourceResult;
use crate::value::{Label, Value};

impl Vm<'_, '_> {
    /// Evaluate a markup list into one flat content.
    ///
    /// A set or show rule styles everything after it in the same list: the
    /// remaining nodes are evaluated first and then wrapped.
    pub(crate) fn eval_markup(&mut self, exprs: &[ExprId]) -> SourceResult<Content> {
        let mut seq = Content::empty();
        let mut iter = exprs.iter();
        while let Some(&expr) = iter.next() {
            let span = self.arena.span(expr);
            match self.arena.kind(expr) {
                ExprKind::Set { .. } | ExprKind::Show { .. } => {
                    let styles = self.eval_rule(expr)?;
                    if self.flow.is_some() {
                        break;
                    }
                    let tail = self.eval_markup(iter.as_slice())?;
                    seq.extend(tail.styled(styles));
                    break;
                }
                ExprKind::Label(name) => self.attach_label(&mut seq, Label(name), span),
                _ => match self.eval(expr)? {
                    Value::Label(label) => self.attach_label(&mut seq, label, span),
                    Value::Styles(_) => self.engine.warn(
                        ErrorCode::W6005,
                        span,
                        "set and show rules have no effect when used as a value here",
                    ),
                    value => seq.extend(value.display().spanned(span)),
                },
            }
            if self.flow.is_some() {
                break;
            }
        }
        Ok(seq)
    }

    fn attach_label(&mut self, seq: &mut Content, label: Label, span: Span) {
        match seq.attach_label(label) {
            LabelAttach::Attached => {}
            LabelAttach::Double(old) => self.engine.warn(
                ErrorCode::W6004,
                span,
                format!("content labelled multiple times; {old} is replaced by {label}"),
            ),
            LabelAttach::Dangling => self.engine.warn(
                ErrorCode::W6003,
                span,
                format!("label {label} is not attached to anything"),
            ),
        }
    }

    /// Evaluate a single markup node.
    pub(super) fn eval_markup_node(&mut self, id: ExprId, kind: ExprKind) -> SourceResult<Content> {
        let span = self.arena.span(id);
        let elem = match kind {
            ExprKind::Markup(range) => {
                let arena = self.arena.clone();
                return self.eval_markup(arena.expr_list(range));
            }
            ExprKind::Text(text) => Elem::text(text),
            ExprKind::Space => return Ok(Content::space()),
            ExprKind::Linebreak => return Ok(Content::linebreak()),
            ExprKind::Parbreak => return Ok(Content::parbreak()),
            ExprKind::Escape(c) | ExprKind::Shorthand(c) => Elem::text(c),
            ExprKind::SmartQuote { double } => {
                Elem::new(ElemKind::SmartQuote).with_field("double", Value::Bool(double))
            }
            ExprKind::Strong(body) => {
                let body = self.eval_body(body)?;
                if body.is_empty() {
                    self.engine.warn(ErrorCode::W6001, span, "no text within stars");
                }
                Elem::new(ElemKind::Strong).with_field("body", Value::Content(body))
            }
            ExprKind::Emph(body) => {
                let body = self.eval_body(body)?;
                if body.is_empty() {
                    self.engine.warn(ErrorCode::W6002, span, "no text within underscores");
                }
                Elem::new(ElemKind::Emph).with_field("body", Value::Content(body))
            }
            ExprKind::Raw { text, lang, block } => {
                let mut elem = Elem::new(ElemKind::Raw)
                    .with_field("text", Value::str(text))
                    .with_field("block", Value::Bool(block));
                if let Some(lang) = lang {
                    elem.push_field("lang", Value::str(lang));
                }
                elem
            }
            ExprKind::Link(url) => Elem::new(ElemKind::Link)
                .with_field("dest", Value::str(url))
                .with_field("body", Value::Content(Content::text(url))),
            ExprKind::Ref { target, supplement } => {
                let mut elem =
                    Elem::new(ElemKind::Ref).with_field("target", Value::Label(Label(target)));
                if let Some(supplement) = supplement {
                    let supplement = self.eval_body(supplement)?;
                    elem.push_field("supplement", Value::Content(supplement));
                }
                elem
            }
            ExprKind::Heading { level, body } => {
                let body = self.eval_body(body)?;
                Elem::new(ElemKind::Heading)
                    .with_field("level", Value::Int(i64::from(level)))
                    .with_field("body", Value::Content(body))
            }
            ExprKind::ListItem(body) => {
                let body = self.eval_body(body)?;
                Elem::new(ElemKind::ListItem).with_field("body", Value::Content(body))
            }
            ExprKind::EnumItem { number, body } => {
                let number = match number.map(i64::try_from) {
                    Some(Ok(n)) => Value::Int(n),
                    _ => Value::None,
                };
                let body = self.eval_body(body)?;
                Elem::new(ElemKind::EnumItem)
                    .with_field("number", number)
                    .with_field("body", Value::Content(body))
            }
            ExprKind::TermItem { term, description } => {
                let term = self.eval_body(term)?;
                let description = self.eval_body(description)?;
                Elem::new(ElemKind::TermsItem)
                    .with_field("term", Value::Content(term))
                    .with_field("description", Value::Content(description))
            }
            ExprKind::Equation { block, body } => {
                let body = self.eval_body(body)?;
                Elem::new(ElemKind::Equation)
                    .with_field("block", Value::Bool(block))
                    .with_field("body", Value::Content(body))
            }
            _ => return Ok(self.eval(id)?.display()),
        };
        Ok(elem.spanned(span).pack())
    }

    /// Evaluate a nested body into content.
    pub(super) fn eval_body(&mut self, id: ExprId) -> SourceResult<Content> {
        Ok(self.eval(id)?.display())
    }
}
