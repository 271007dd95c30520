use std::sync::Arc;

use super::{Recipe, Styles};
use crate::content::ElemKind;
use crate::value::Value;

/// A persistent stack of style frames, innermost first.
///
/// Extending a chain never changes it: [`StyleChain::chain`] returns a new
/// head sharing the old links, so every earlier head stays valid.
#[derive(Clone, Default, Debug)]
pub struct StyleChain(Option<Arc<Link>>);

#[derive(Debug)]
struct Link {
    styles: Styles,
    tail: StyleChain,
}

impl StyleChain {
    /// The empty chain.
    pub fn new() -> Self {
        StyleChain(None)
    }

    /// Push a frame on top. Empty styles return the chain unchanged.
    #[must_use]
    pub fn chain(&self, styles: &Styles) -> StyleChain {
        if styles.is_empty() {
            return self.clone();
        }
        StyleChain(Some(Arc::new(Link {
            styles: styles.clone(),
            tail: self.clone(),
        })))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// The frames, innermost first.
    pub fn frames(&self) -> impl Iterator<Item = &Styles> {
        let mut cursor = self.0.as_deref();
        std::iter::from_fn(move || {
            let link = cursor?;
            cursor = link.tail.0.as_deref();
            Some(&link.styles)
        })
    }

    /// Look up a set-rule value: inner frames win, and within a frame the
    /// later rule wins.
    pub fn get(&self, kind: ElemKind, field: &str) -> Option<Value> {
        self.frames().find_map(|styles| styles.get(kind, field))
    }

    /// All recipes, outermost frame first.
    pub fn recipes(&self) -> Vec<&Recipe> {
        let frames: Vec<&Styles> = self.frames().collect();
        frames
            .into_iter()
            .rev()
            .flat_map(|styles| styles.recipes.iter())
            .collect()
    }

    /// Flatten the chain into one set of styles, outermost first.
    pub fn all_styles(&self) -> Styles {
        let frames: Vec<&Styles> = self.frames().collect();
        let mut out = Styles::new();
        for styles in frames.into_iter().rev() {
            out.extend(styles.clone());
        }
        out
    }

    /// Number of frames.
    pub fn depth(&self) -> usize {
        self.frames().count()
    }
}

impl PartialEq for StyleChain {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) if Arc::ptr_eq(a, b) => true,
            _ => self.frames().eq(other.frames()),
        }
    }
}
