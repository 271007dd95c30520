//! Named symbols: the `sym` module.
//!
//! A symbol is a character with optional modifier variants. `arrow` is
//! `→`, `arrow.l.double` is `⇐`. Each table lists its variants as
//! dot-separated modifier sets; when no variant has the empty set, the
//! first variant is the default.

use folio_eval::value::{Symbol, SymbolTable, Value};
use folio_eval::{Module, Scope};

/// Build the `sym` module.
pub(crate) fn module() -> Module {
    let mut scope = Scope::new();
    define(&mut scope);
    Module::new("sym", scope)
}

/// Define every symbol into `scope`.
pub(crate) fn define(scope: &mut Scope) {
    for &(name, table) in SYMBOLS {
        scope.define(name, Value::Symbol(symbol(table)));
    }
}

fn symbol(table: SymbolTable) -> Symbol {
    match table {
        [("", c)] => Symbol::single(*c),
        _ => Symbol::table(table),
    }
}

pub(crate) const SYMBOLS: &[(&str, SymbolTable)] = &[
    // Arrows.
    ("arrow", &[
        ("r", '→'),
        ("l", '←'),
        ("t", '↑'),
        ("b", '↓'),
        ("l.r", '↔'),
        ("t.b", '↕'),
        ("tr", '↗'),
        ("br", '↘'),
        ("tl", '↖'),
        ("bl", '↙'),
        ("r.double", '⇒'),
        ("l.double", '⇐'),
        ("l.r.double", '⇔'),
        ("r.long", '⟶'),
        ("l.long", '⟵'),
        ("r.long.double", '⟹'),
        ("l.long.double", '⟸'),
        ("r.bar", '↦'),
        ("r.hook", '↪'),
        ("l.hook", '↩'),
        ("r.squiggly", '⇝'),
        ("r.dashed", '⇢'),
        ("r.twohead", '↠'),
        ("r.tail", '↣'),
    ]),
    // Operators.
    ("plus", &[
        ("", '+'),
        ("circle", '⊕'),
        ("minus", '±'),
        ("square", '⊞'),
    ]),
    ("minus", &[("", '−'), ("plus", '∓'), ("circle", '⊖')]),
    ("times", &[("", '×'), ("circle", '⊗'), ("big", '⨉'), ("div", '⋇')]),
    ("div", &[("", '÷'), ("circle", '⨸')]),
    ("dot", &[("op", '⋅'), ("c", '·'), ("circle", '⊙'), ("basic", '.')]),
    ("ast", &[("op", '∗'), ("basic", '*'), ("circle", '⊛')]),
    ("star", &[("op", '⋆'), ("stroked", '☆'), ("filled", '★')]),
    ("wedge", &[("", '∧'), ("big", '⋀')]),
    ("vee", &[("", '∨'), ("big", '⋁')]),
    // Relations.
    ("eq", &[
        ("", '='),
        ("not", '≠'),
        ("def", '≝'),
        ("quest", '≟'),
        ("triple", '≡'),
        ("colon", '≕'),
    ]),
    ("lt", &[
        ("", '<'),
        ("eq", '≤'),
        ("not", '≮'),
        ("double", '≪'),
        ("tilde", '≲'),
    ]),
    ("gt", &[
        ("", '>'),
        ("eq", '≥'),
        ("not", '≯'),
        ("double", '≫'),
        ("tilde", '≳'),
    ]),
    ("approx", &[("", '≈'), ("not", '≉'), ("eq", '≊')]),
    ("tilde", &[("op", '∼'), ("eq", '≃'), ("equiv", '≅'), ("basic", '~')]),
    ("subset", &[("", '⊂'), ("eq", '⊆'), ("not", '⊄'), ("neq", '⊊')]),
    ("supset", &[("", '⊃'), ("eq", '⊇'), ("not", '⊅'), ("neq", '⊋')]),
    ("parallel", &[("", '∥'), ("not", '∦')]),
    ("perp", &[("", '⟂')]),
    ("divides", &[("", '∣'), ("not", '∤')]),
    // Sets and logic.
    ("union", &[("", '∪'), ("big", '⋃'), ("plus", '⊎')]),
    ("sect", &[("", '∩'), ("big", '⋂')]),
    ("emptyset", &[("", '∅')]),
    ("forall", &[("", '∀')]),
    ("exists", &[("", '∃'), ("not", '∄')]),
    ("top", &[("", '⊤')]),
    ("bot", &[("", '⊥')]),
    // Big operators and calculus.
    ("sum", &[("", '∑'), ("integral", '⨋')]),
    ("product", &[("", '∏'), ("co", '∐')]),
    ("integral", &[
        ("", '∫'),
        ("double", '∬'),
        ("triple", '∭'),
        ("cont", '∮'),
    ]),
    ("partial", &[("", '∂')]),
    ("nabla", &[("", '∇')]),
    ("infinity", &[("", '∞')]),
    ("dots", &[
        ("h", '…'),
        ("v", '⋮'),
        ("c", '⋯'),
        ("down", '⋱'),
        ("up", '⋰'),
    ]),
    // Letter-like.
    ("aleph", &[("", 'ℵ')]),
    ("ell", &[("", 'ℓ')]),
    ("planck", &[("", 'ℎ'), ("reduce", 'ℏ')]),
    // Punctuation and marks.
    ("dash", &[("en", '–'), ("em", '—'), ("fig", '‒'), ("wave", '〜')]),
    ("quote", &[
        ("double", '"'),
        ("single", '\''),
        ("l.double", '“'),
        ("r.double", '”'),
        ("l.single", '‘'),
        ("r.single", '’'),
    ]),
    ("prime", &[("", '′'), ("double", '″'), ("triple", '‴')]),
    ("bullet", &[("", '•')]),
    ("dagger", &[("", '†'), ("double", '‡')]),
    ("degree", &[("", '°')]),
    ("angle", &[("", '∠'), ("right", '∟')]),
    ("section", &[("", '§')]),
    ("pilcrow", &[("", '¶')]),
    ("copyright", &[("", '©')]),
    ("checkmark", &[("", '✓')]),
    ("ballot", &[("", '☐'), ("x", '☒')]),
    ("colon", &[("", ':'), ("eq", '≔')]),
    // Greek.
    ("alpha", &[("", 'α')]),
    ("beta", &[("", 'β'), ("alt", 'ϐ')]),
    ("gamma", &[("", 'γ')]),
    ("delta", &[("", 'δ')]),
    ("epsilon", &[("", 'ε'), ("alt", 'ϵ')]),
    ("zeta", &[("", 'ζ')]),
    ("eta", &[("", 'η')]),
    ("theta", &[("", 'θ'), ("alt", 'ϑ')]),
    ("iota", &[("", 'ι')]),
    ("kappa", &[("", 'κ'), ("alt", 'ϰ')]),
    ("lambda", &[("", 'λ')]),
    ("mu", &[("", 'μ')]),
    ("nu", &[("", 'ν')]),
    ("xi", &[("", 'ξ')]),
    ("omicron", &[("", 'ο')]),
    ("pi", &[("", 'π'), ("alt", 'ϖ')]),
    ("rho", &[("", 'ρ'), ("alt", 'ϱ')]),
    ("sigma", &[("", 'σ'), ("alt", 'ς')]),
    ("tau", &[("", 'τ')]),
    ("upsilon", &[("", 'υ')]),
    ("phi", &[("", 'φ'), ("alt", 'ϕ')]),
    ("chi", &[("", 'χ')]),
    ("psi", &[("", 'ψ')]),
    ("omega", &[("", 'ω')]),
    ("Alpha", &[("", 'Α')]),
    ("Beta", &[("", 'Β')]),
    ("Gamma", &[("", 'Γ')]),
    ("Delta", &[("", 'Δ')]),
    ("Epsilon", &[("", 'Ε')]),
    ("Zeta", &[("", 'Ζ')]),
    ("Eta", &[("", 'Η')]),
    ("Theta", &[("", 'Θ')]),
    ("Iota", &[("", 'Ι')]),
    ("Kappa", &[("", 'Κ')]),
    ("Lambda", &[("", 'Λ')]),
    ("Mu", &[("", 'Μ')]),
    ("Nu", &[("", 'Ν')]),
    ("Xi", &[("", 'Ξ')]),
    ("Omicron", &[("", 'Ο')]),
    ("Pi", &[("", 'Π')]),
    ("Rho", &[("", 'Ρ')]),
    ("Sigma", &[("", 'Σ')]),
    ("Tau", &[("", 'Τ')]),
    ("Upsilon", &[("", 'Υ')]),
    ("Phi", &[("", 'Φ')]),
    ("Chi", &[("", 'Χ')]),
    ("Psi", &[("", 'Ψ')]),
    ("Omega", &[("", 'Ω')]),
];

#[cfg(test)]
mod tests;
