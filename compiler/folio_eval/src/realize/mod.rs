//! Realization: driving show rules over a content tree.
//!
//! [`realize`] walks evaluated content under a style chain. Styled wrappers
//! extend the chain for their child, contextual elements are called with the
//! chain they end up in, and every other element is tested against the
//! chain's recipes, innermost first. A recipe that fires marks its output so
//! it never fires on that output again, and the output is realized once more
//! without it. Elements no recipe claims keep their kind and have their
//! children realized.
//!
//! Realized trees are a fixpoint: realizing one again under the same chain
//! yields an equal tree.

use std::ops::Range;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::args::Args;
use crate::content::{Content, Elem, ElemKind};
use crate::engine::{Context, Engine};
use crate::errors::{recursion_limit, SourceResult, Trace, Tracepoint};
use crate::func::Func;
use crate::styles::{Recipe, RecipeId, Selector, StyleChain, Styles, Transformation};
use crate::value::{Array, Value};

/// Realize `content` under `chain`.
#[tracing::instrument(level = "debug", skip_all, fields(elems = content.len()))]
pub fn realize(engine: &mut Engine, content: &Content, chain: &StyleChain) -> SourceResult<Content> {
    let mut realizer = Realizer::new(engine, content);
    let output = realizer.realize_content(content, chain, false)?;
    Ok(collapse_spaces(&output, true, true))
}

/// How a selector matched an element.
enum Verdict {
    Reject,
    Accept,
    /// Byte ranges of the matches inside a text element.
    Text(Vec<Range<usize>>),
}

impl Verdict {
    fn from_bool(matched: bool) -> Self {
        if matched {
            Verdict::Accept
        } else {
            Verdict::Reject
        }
    }

    fn from_ranges(ranges: Vec<Range<usize>>) -> Self {
        if ranges.is_empty() {
            Verdict::Reject
        } else {
            Verdict::Text(ranges)
        }
    }

    fn is_match(&self) -> bool {
        !matches!(self, Verdict::Reject)
    }
}

struct Realizer<'a, 'w> {
    engine: &'a mut Engine<'w>,
    /// Document position of every element in the input, by identity.
    positions: FxHashMap<usize, usize>,
    /// The input elements in document order; keeps their identities alive.
    order: Vec<Elem>,
    /// Position of the first match of a `before`/`after` anchor selector.
    anchors: FxHashMap<usize, Option<usize>>,
    /// Recipes that must not fire while their own output is realized.
    excluded: Vec<RecipeId>,
    depth: usize,
}

impl<'a, 'w> Realizer<'a, 'w> {
    fn new(engine: &'a mut Engine<'w>, content: &Content) -> Self {
        let mut realizer = Realizer {
            engine,
            positions: FxHashMap::default(),
            order: Vec::new(),
            anchors: FxHashMap::default(),
            excluded: Vec::new(),
            depth: 0,
        };
        realizer.record(content);
        realizer
    }

    fn record(&mut self, content: &Content) {
        for elem in content {
            let index = self.order.len();
            self.positions.entry(elem.location()).or_insert(index);
            self.order.push(elem.clone());
            for (_, value) in elem.fields() {
                match value {
                    Value::Content(child) => self.record(child),
                    Value::Array(items) => {
                        for item in items.iter() {
                            if let Value::Content(child) = item {
                                self.record(child);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn realize_content(&mut self, content: &Content, chain: &StyleChain, in_list: bool) -> SourceResult<Content> {
        let grouped = if in_list { content.clone() } else { group_lists(content) };
        let mut out = Content::empty();
        for elem in &grouped {
            out.extend(self.realize_elem(elem, chain, 0)?);
        }
        Ok(out)
    }

    /// Realize one element, trying the recipes from index `start` on.
    fn realize_elem(&mut self, elem: &Elem, chain: &StyleChain, start: usize) -> SourceResult<Content> {
        match elem.kind() {
            ElemKind::Styled => return self.realize_styled(elem, chain),
            ElemKind::Context => return self.realize_context(elem, chain),
            _ => {}
        }

        let recipes: Vec<&Recipe> = chain.recipes().into_iter().rev().collect();
        for (index, recipe) in recipes.iter().enumerate().skip(start) {
            let Some(selector) = &recipe.selector else {
                continue;
            };
            if elem.is_guarded(recipe.id) || self.excluded.contains(&recipe.id) {
                continue;
            }
            match self.verdict(selector, elem, chain)? {
                Verdict::Reject => {}
                Verdict::Accept => return self.apply(recipe, elem.clone(), chain),
                Verdict::Text(ranges) => return self.split_text(elem, &ranges, recipe, index, chain),
            }
        }
        self.realize_children(elem, chain)
    }

    fn realize_children(&mut self, elem: &Elem, chain: &StyleChain) -> SourceResult<Content> {
        let in_list = matches!(elem.kind(), ElemKind::List | ElemKind::Enum | ElemKind::Terms);
        let mapped = elem.map_children(|child| self.realize_content(child, chain, in_list))?;
        Ok(mapped.pack())
    }

    /// Extend the chain for a styled child. Recipes without a selector
    /// transform the whole child once and are not kept.
    fn realize_styled(&mut self, elem: &Elem, chain: &StyleChain) -> SourceResult<Content> {
        let Some(Value::Styles(styles)) = elem.field("styles") else {
            return self.realize_children(elem, chain);
        };
        let mut child = elem.content_field("child").unwrap_or_default();

        let mut kept = Styles::new();
        kept.rules.clone_from(&styles.rules);
        let mut everything = Vec::new();
        for recipe in &styles.recipes {
            if recipe.selector.is_some() {
                kept.recipes.push(recipe.clone());
            } else {
                everything.push(recipe.clone());
            }
        }

        let inner = chain.chain(&kept);
        for recipe in &everything {
            child = self.transform_rest(recipe, child, &inner)?;
        }

        let realized = self.realize_content(&child, &inner, false)?;
        if kept.is_empty() {
            return Ok(realized);
        }
        Ok(realized.styled(kept).spanned(elem.span()))
    }

    /// Apply a `show: ..` rule to the rest of the content.
    fn transform_rest(&mut self, recipe: &Recipe, content: Content, chain: &StyleChain) -> SourceResult<Content> {
        self.check_depth(recipe.span)?;
        Ok(match &recipe.transform {
            Transformation::SetStyles(styles) => content.styled(styles.clone()),
            Transformation::ApplyFn(func) => {
                let context = Context::new(Some(chain.clone()));
                let args = Args::positional(recipe.span, [Value::Content(content)]);
                func.call(self.engine, &context, args)
                    .trace(|| Tracepoint::Show("content".into()), recipe.span)?
                    .display()
            }
            Transformation::Replace(replacement) => replacement.clone(),
            Transformation::Hide => Content::empty(),
        })
    }

    /// Call a contextual element's function with the chain it sits in.
    fn realize_context(&mut self, elem: &Elem, chain: &StyleChain) -> SourceResult<Content> {
        let Some(Value::Func(func)) = elem.field("func") else {
            return Ok(Content::empty());
        };
        let func = func.clone();
        let span = elem.span();
        self.check_depth(span)?;

        let context = Context::new(Some(chain.clone()));
        let output = func.call(self.engine, &context, Args::new(span))?.display().spanned(span);

        self.depth += 1;
        let result = self.realize_content(&output, chain, false);
        self.depth -= 1;
        result
    }

    /// Transform an element with a recipe and realize the result.
    fn apply(&mut self, recipe: &Recipe, elem: Elem, chain: &StyleChain) -> SourceResult<Content> {
        let span = elem.span();
        self.check_depth(span)?;

        let kind = elem.kind();
        tracing::trace!(kind = kind.name(), depth = self.depth, "applying show rule");
        let target = elem.guarded(recipe.id);
        let output = match &recipe.transform {
            Transformation::SetStyles(styles) => target.pack().styled(styles.clone()),
            Transformation::ApplyFn(func) => {
                let context = Context::new(Some(chain.clone()));
                let value = Value::Content(materialize(&target, chain).pack());
                let args = Args::positional(span, [value]);
                func.call(self.engine, &context, args)
                    .trace(|| Tracepoint::Show(kind.name().into()), span)?
                    .display()
            }
            Transformation::Replace(content) => content.clone(),
            Transformation::Hide => Content::empty(),
        };
        let output: Content = output
            .spanned(span)
            .iter()
            .map(|elem| elem.clone().guarded(recipe.id))
            .collect();

        self.depth += 1;
        self.excluded.push(recipe.id);
        let result = self.realize_content(&output, chain, false);
        self.excluded.pop();
        self.depth -= 1;
        result
    }

    /// Split a text element around the matches of a text selector.
    fn split_text(
        &mut self,
        elem: &Elem,
        ranges: &[Range<usize>],
        recipe: &Recipe,
        index: usize,
        chain: &StyleChain,
    ) -> SourceResult<Content> {
        let text = elem.text_str().map(|text| text.as_str().to_string()).unwrap_or_default();
        let span = elem.span();
        let mut out = Content::empty();
        let mut cursor = 0;
        for range in ranges {
            if range.start > cursor {
                let piece = Elem::text(&text[cursor..range.start]).spanned(span);
                out.extend(self.realize_elem(&piece, chain, index + 1)?);
            }
            let matched = Elem::text(&text[range.clone()]).spanned(span);
            out.extend(self.apply(recipe, matched, chain)?);
            cursor = range.end;
        }
        if cursor < text.len() {
            let piece = Elem::text(&text[cursor..]).spanned(span);
            out.extend(self.realize_elem(&piece, chain, index + 1)?);
        }
        Ok(out)
    }

    fn check_depth(&self, span: folio_ir::Span) -> SourceResult<()> {
        let limit = self.engine.limits.max_show_depth;
        if self.depth >= limit {
            return Err(recursion_limit("show rule", limit).with_span(span));
        }
        Ok(())
    }

    fn verdict(&mut self, selector: &Selector, elem: &Elem, chain: &StyleChain) -> SourceResult<Verdict> {
        Ok(match selector {
            Selector::Elem { kind, filter } => {
                if elem.kind() != *kind {
                    Verdict::Reject
                } else if let Some(filter) = filter {
                    Verdict::from_bool(self.test(filter, elem, chain)?)
                } else {
                    Verdict::Accept
                }
            }
            Selector::Label(label) => Verdict::from_bool(elem.label() == Some(*label)),
            Selector::Text(needle) => match text_of(elem) {
                Some(text) => Verdict::from_ranges(
                    text.match_indices(needle.as_str())
                        .map(|(start, found)| start..start + found.len())
                        .collect(),
                ),
                None => Verdict::Reject,
            },
            Selector::Regex(regex) => match text_of(elem) {
                Some(text) => Verdict::from_ranges(
                    regex
                        .find_iter(text)
                        .filter(|found| !found.is_empty())
                        .map(|found| found.range())
                        .collect(),
                ),
                None => Verdict::Reject,
            },
            Selector::Predicate(func) => Verdict::from_bool(self.test(func, elem, chain)?),
            Selector::Or(list) => {
                for sub in list.iter() {
                    let verdict = self.verdict(sub, elem, chain)?;
                    if verdict.is_match() {
                        return Ok(verdict);
                    }
                }
                Verdict::Reject
            }
            Selector::And(list) => {
                let mut last = Verdict::Reject;
                for sub in list.iter() {
                    last = self.verdict(sub, elem, chain)?;
                    if !last.is_match() {
                        return Ok(Verdict::Reject);
                    }
                }
                last
            }
            Selector::Before {
                selector,
                end,
                inclusive,
            } => {
                let verdict = self.verdict(selector, elem, chain)?;
                if !verdict.is_match() {
                    return Ok(verdict);
                }
                let Some(position) = self.positions.get(&elem.location()).copied() else {
                    return Ok(Verdict::Reject);
                };
                match self.anchor(end, chain)? {
                    None => verdict,
                    Some(anchor) if position < anchor || (*inclusive && position == anchor) => verdict,
                    Some(_) => Verdict::Reject,
                }
            }
            Selector::After {
                selector,
                start,
                inclusive,
            } => {
                let verdict = self.verdict(selector, elem, chain)?;
                if !verdict.is_match() {
                    return Ok(verdict);
                }
                let Some(position) = self.positions.get(&elem.location()).copied() else {
                    return Ok(Verdict::Reject);
                };
                match self.anchor(start, chain)? {
                    Some(anchor) if position > anchor || (*inclusive && position == anchor) => verdict,
                    _ => Verdict::Reject,
                }
            }
        })
    }

    /// The document position of the first element matching `selector`.
    fn anchor(&mut self, selector: &Arc<Selector>, chain: &StyleChain) -> SourceResult<Option<usize>> {
        let key = Arc::as_ptr(selector) as usize;
        if let Some(&cached) = self.anchors.get(&key) {
            return Ok(cached);
        }
        let mut found = None;
        for index in 0..self.order.len() {
            let candidate = self.order[index].clone();
            if self.verdict(selector, &candidate, chain)?.is_match() {
                found = Some(index);
                break;
            }
        }
        self.anchors.insert(key, found);
        Ok(found)
    }

    /// Call a `where` filter or predicate with the element.
    fn test(&mut self, func: &Func, elem: &Elem, chain: &StyleChain) -> SourceResult<bool> {
        let context = Context::new(Some(chain.clone()));
        let value = Value::Content(materialize(elem, chain).pack());
        let args = Args::positional(elem.span(), [value]);
        Ok(func.call(self.engine, &context, args)?.truthy())
    }
}

fn text_of(elem: &Elem) -> Option<&str> {
    match elem.kind() {
        ElemKind::Text => elem.text_str().map(|text| text.as_str()),
        _ => None,
    }
}

/// Copy set-rule values for unset fields into the element, so show-rule
/// functions see the fields in effect.
fn materialize(elem: &Elem, chain: &StyleChain) -> Elem {
    let mut out = elem.clone();
    for param in elem.kind().params().iter().filter(|param| param.settable) {
        if elem.field(param.name).is_some() {
            continue;
        }
        if let Some(value) = chain.get(elem.kind(), param.name) {
            out.push_field(param.name, value);
        }
    }
    out
}

/// Group runs of list, enum and term items into their containers.
///
/// Items of one kind separated only by spaces or paragraph breaks form one
/// container; a paragraph break between two items makes it non-tight.
fn group_lists(content: &Content) -> Content {
    if !content.iter().any(|elem| elem.kind().is_list_item()) {
        return content.clone();
    }

    let elems = content.elems();
    let is_blank = |elem: &Elem| matches!(elem.kind(), ElemKind::Space | ElemKind::Parbreak);
    let mut out = Content::empty();
    let mut i = 0;
    while i < elems.len() {
        let first = &elems[i];
        let Some(container) = first.kind().list_container() else {
            out.push(first.clone());
            i += 1;
            continue;
        };

        let kind = first.kind();
        let mut items = vec![first.clone()];
        let mut tight = true;
        let mut next = i + 1;
        while next < elems.len() {
            if elems[next].kind() == kind {
                items.push(elems[next].clone());
                next += 1;
                continue;
            }
            let mut lookahead = next;
            let mut parbreak = false;
            while lookahead < elems.len() && is_blank(&elems[lookahead]) {
                parbreak |= elems[lookahead].kind() == ElemKind::Parbreak;
                lookahead += 1;
            }
            if lookahead > next && lookahead < elems.len() && elems[lookahead].kind() == kind {
                tight &= !parbreak;
                next = lookahead;
                continue;
            }
            break;
        }

        let children: Array = items
            .into_iter()
            .map(|item| Value::Content(item.pack()))
            .collect();
        let mut list = Elem::new(container)
            .with_field("children", Value::Array(children))
            .spanned(first.span());
        if !tight {
            list.push_field("tight", Value::Bool(false));
        }
        out.push(list);
        i = next;
    }
    out
}

/// Normalize spaces: no space next to another space or a paragraph break,
/// and none at the trimmed edges. Styled wrappers at a trimmed edge are
/// trimmed inside.
fn collapse_spaces(content: &Content, trim_start: bool, trim_end: bool) -> Content {
    let mut out: Vec<Elem> = Vec::with_capacity(content.len());
    for elem in content {
        match elem.kind() {
            ElemKind::Space => match out.last().map(Elem::kind) {
                None if trim_start => continue,
                Some(ElemKind::Space | ElemKind::Parbreak) => continue,
                _ => {}
            },
            ElemKind::Parbreak => {
                while out.last().is_some_and(|last| last.kind() == ElemKind::Space) {
                    out.pop();
                }
                match out.last().map(Elem::kind) {
                    None if trim_start => continue,
                    Some(ElemKind::Parbreak) => continue,
                    _ => {}
                }
            }
            _ => {}
        }
        out.push(elem.clone());
    }
    if trim_end {
        while out
            .last()
            .is_some_and(|last| matches!(last.kind(), ElemKind::Space | ElemKind::Parbreak))
        {
            out.pop();
        }
    }

    let len = out.len();
    for (i, elem) in out.iter_mut().enumerate() {
        let first = trim_start && i == 0;
        let last = trim_end && i + 1 == len;
        if elem.kind() == ElemKind::Styled && (first || last) {
            if let Some(child) = elem.content_field("child") {
                elem.push_field("child", Value::Content(collapse_spaces(&child, first, last)));
            }
        }
    }
    out.into_iter().collect()
}

#[cfg(test)]
mod tests;
