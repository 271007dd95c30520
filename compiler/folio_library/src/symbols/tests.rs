use folio_eval::value::Value;
use pretty_assertions::assert_eq;

use crate::testing::eval;

use super::SYMBOLS;

fn char_of(code: &str) -> Option<char> {
    match eval(code) {
        Ok(Value::Symbol(symbol)) => Some(symbol.get()),
        _ => None,
    }
}

#[test]
fn defaults() {
    assert_eq!(char_of("sym.arrow"), Some('→'));
    assert_eq!(char_of("sym.dot"), Some('⋅'));
    assert_eq!(char_of("sym.dash"), Some('–'));
    assert_eq!(char_of("sym.plus"), Some('+'));
    assert_eq!(char_of("sym.alpha"), Some('α'));
    assert_eq!(char_of("sym.Omega"), Some('Ω'));
}

#[test]
fn modifiers_select_variants() {
    assert_eq!(char_of("sym.arrow.l"), Some('←'));
    assert_eq!(char_of("sym.arrow.l.double"), Some('⇐'));
    assert_eq!(char_of("sym.arrow.double.l"), Some('⇐'));
    assert_eq!(char_of("sym.arrow.r.long"), Some('⟶'));
    assert_eq!(char_of("sym.eq.not"), Some('≠'));
    assert_eq!(char_of("sym.epsilon.alt"), Some('ϵ'));
}

#[test]
fn unknown_modifiers_fail() {
    let Some(error) = eval("sym.arrow.sideways").err() else {
        panic!("expected an error");
    };
    assert_eq!(error.message, "unknown symbol modifier: sideways");
    assert!(eval("sym.alpha.alt").is_err());
}

#[test]
fn symbols_are_available_in_math() {
    let Ok(Value::Content(content)) = eval("[$alpha arrow.r beta$]") else {
        panic!("expected content");
    };
    assert_eq!(content.plain_text(), "α→β");
}

#[test]
fn names_are_unique() {
    let mut names: Vec<&str> = SYMBOLS.iter().map(|(name, _)| *name).collect();
    let total = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), total);
}

#[test]
fn variants_within_a_table_are_unique() {
    for (name, table) in SYMBOLS {
        let mut mods: Vec<&str> = table.iter().map(|(mods, _)| *mods).collect();
        let total = mods.len();
        mods.sort_unstable();
        mods.dedup();
        assert_eq!(mods.len(), total, "duplicate variant in `{name}`");
    }
}
