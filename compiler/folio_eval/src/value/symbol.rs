//! Symbols: characters with optional modifier variants (`arrow.r.double`).

use std::fmt;
use std::sync::Arc;

use super::Str;

/// A symbol variant table: each entry is a dot-separated modifier set and
/// the character it selects. The entry with the empty modifier set is the
/// default.
pub type SymbolTable = &'static [(&'static str, char)];

/// A single character, possibly chosen from a set of variants.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Symbol(Repr);

#[derive(Clone, Eq, PartialEq, Hash)]
enum Repr {
    Single(char),
    Static(SymbolTable, Str),
    Runtime(Arc<[(Str, char)]>, Str),
}

impl Symbol {
    pub const fn single(c: char) -> Self {
        Symbol(Repr::Single(c))
    }

    /// A symbol with compile-time variants.
    pub fn table(variants: SymbolTable) -> Self {
        Symbol(Repr::Static(variants, Str::new()))
    }

    /// A symbol with variants defined at runtime.
    pub fn runtime(variants: Vec<(Str, char)>) -> Self {
        Symbol(Repr::Runtime(variants.into(), Str::new()))
    }

    fn variants(&self) -> Box<dyn Iterator<Item = (&str, char)> + '_> {
        match &self.0 {
            Repr::Single(c) => Box::new(std::iter::once(("", *c))),
            Repr::Static(list, _) => Box::new(list.iter().map(|(m, c)| (*m, *c))),
            Repr::Runtime(list, _) => Box::new(list.iter().map(|(m, c)| (m.as_str(), *c))),
        }
    }

    fn modifiers(&self) -> &str {
        match &self.0 {
            Repr::Single(_) => "",
            Repr::Static(_, m) | Repr::Runtime(_, m) => m,
        }
    }

    /// The character selected by the applied modifiers.
    ///
    /// Picks the variant containing all applied modifiers with the fewest
    /// extra ones; ties go to the earlier variant.
    pub fn get(&self) -> char {
        if let Repr::Single(c) = self.0 {
            return c;
        }
        let applied: Vec<&str> = split(self.modifiers()).collect();
        let mut best: Option<(usize, char)> = None;
        for (mods, c) in self.variants() {
            let set: Vec<&str> = split(mods).collect();
            if applied.iter().all(|m| set.contains(m)) {
                let extra = set.len() - applied.len();
                if best.map_or(true, |(n, _)| extra < n) {
                    best = Some((extra, c));
                }
            }
        }
        best.map_or(' ', |(_, c)| c)
    }

    /// Apply another modifier.
    pub fn modified(&self, modifier: &str) -> Result<Symbol, String> {
        let applied = match self.modifiers() {
            "" => modifier.to_string(),
            mods => format!("{mods}.{modifier}"),
        };
        let wanted: Vec<&str> = split(&applied).collect();
        let exists = self.variants().any(|(mods, _)| {
            let set: Vec<&str> = split(mods).collect();
            wanted.iter().all(|m| set.contains(m))
        });
        if !exists {
            return Err(format!("unknown symbol modifier: {modifier}"));
        }
        Ok(Symbol(match &self.0 {
            Repr::Single(c) => Repr::Single(*c),
            Repr::Static(list, _) => Repr::Static(list, Str::from(applied)),
            Repr::Runtime(list, _) => Repr::Runtime(list.clone(), Str::from(applied)),
        }))
    }
}

fn split(modifiers: &str) -> impl Iterator<Item = &str> {
    modifiers.split('.').filter(|m| !m.is_empty())
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "symbol({})", Str::from(self.get()).repr())
    }
}
