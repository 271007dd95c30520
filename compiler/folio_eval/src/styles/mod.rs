//! Set rules, show rules and the style chain.
//!
//! A set rule stores default field values for an element kind; a recipe
//! (show rule) pairs a selector with a transformation. Both travel inside
//! [`Styles`], which markup attaches to content through styled wrappers.
//! During realization the wrappers are stacked into a [`StyleChain`].

mod chain;
mod selector;

use std::fmt;
use std::hash::{Hash, Hasher};

use folio_ir::Span;

pub use self::chain::StyleChain;
pub use self::selector::Selector;

use crate::args::Args;
use crate::content::{Content, ElemKind};
use crate::func::Func;

/// Defaults for the fields of one element kind.
#[derive(Clone, PartialEq, Hash, Debug)]
pub struct SetRule {
    pub target: ElemKind,
    /// Named arguments holding the field values.
    pub args: Args,
    pub span: Span,
    /// Whether the rule may be lifted out of its container to affect
    /// enclosing layout (page-level effects).
    pub liftable: bool,
}

/// Identifies a recipe across clones. Ids are handed out by the engine
/// that evaluated the show rule.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct RecipeId(u64);

impl RecipeId {
    pub const fn from_raw(raw: u64) -> Self {
        RecipeId(raw)
    }
}

/// What a show rule does with the content it matched.
#[derive(Clone, PartialEq, Hash, Debug)]
pub enum Transformation {
    /// Apply styles to the matched element.
    SetStyles(Styles),
    /// Call a function with the matched element.
    ApplyFn(Func),
    /// Replace the element with fixed content.
    Replace(Content),
    /// Remove the element.
    Hide,
}

/// A show rule.
#[derive(Clone, Debug)]
pub struct Recipe {
    pub id: RecipeId,
    /// `None` for `show: ..`, which applies to the rest of the content.
    pub selector: Option<Selector>,
    pub transform: Transformation,
    pub span: Span,
}

impl Recipe {
    pub fn new(
        id: RecipeId,
        selector: Option<Selector>,
        transform: Transformation,
        span: Span,
    ) -> Self {
        Recipe {
            id,
            selector,
            transform,
            span,
        }
    }
}

/// Recipes compare by what they do; the id only tells clones apart from
/// other recipes during realization.
impl PartialEq for Recipe {
    fn eq(&self, other: &Self) -> bool {
        self.span == other.span
            && self.selector == other.selector
            && self.transform == other.transform
    }
}

impl Hash for Recipe {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.span.hash(state);
        self.selector.hash(state);
        self.transform.hash(state);
    }
}

/// A set of set rules and recipes.
#[derive(Clone, Default, PartialEq, Hash)]
pub struct Styles {
    pub rules: Vec<SetRule>,
    pub recipes: Vec<Recipe>,
}

impl Styles {
    pub fn new() -> Self {
        Styles::default()
    }

    pub fn from_rule(rule: SetRule) -> Self {
        Styles {
            rules: vec![rule],
            recipes: Vec::new(),
        }
    }

    pub fn from_recipe(recipe: Recipe) -> Self {
        Styles {
            rules: Vec::new(),
            recipes: vec![recipe],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.recipes.is_empty()
    }

    /// Append another set of styles; later entries take precedence.
    pub fn extend(&mut self, other: Styles) {
        self.rules.extend(other.rules);
        self.recipes.extend(other.recipes);
    }

    /// The last value a rule in this set gives for a field.
    pub fn get(&self, kind: ElemKind, field: &str) -> Option<crate::value::Value> {
        self.rules
            .iter()
            .rev()
            .filter(|rule| rule.target == kind)
            .find_map(|rule| rule.args.find(field).ok().flatten())
    }
}

impl fmt::Debug for Styles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Styles[")?;
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let fields: Vec<String> = rule
                .args
                .items
                .iter()
                .map(|arg| {
                    format!(
                        "{}.{}={}",
                        rule.target.name(),
                        arg.name.as_deref().unwrap_or("_"),
                        arg.value.v.repr()
                    )
                })
                .collect();
            f.write_str(&fields.join(", "))?;
        }
        if !self.recipes.is_empty() {
            if !self.rules.is_empty() {
                f.write_str(", ")?;
            }
            write!(f, "{} show rule(s)", self.recipes.len())?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests;
