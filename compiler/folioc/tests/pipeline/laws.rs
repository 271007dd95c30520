//! Properties that hold for every document.

use folio_eval::{Content, Engine, StyleChain};
use folioc::{compile, CompileOptions, MemoryWorld};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::compiled;

const FRAGMENTS: &[&str] = &[
    "word",
    "*a*",
    "_b_",
    "#(1 + 2)",
    "$x^2$",
    "- item",
    "= Head",
    "`raw`",
    "<l>",
    "#show strong: it => [!#it!]\n",
    "#set strong(delta: 1)\n",
    "#let v = 4\n#v",
    "**",
];

const SEPARATORS: &[&str] = &[" ", "\n", "\n\n"];

fn document() -> impl Strategy<Value = String> {
    let piece = prop::sample::select(FRAGMENTS);
    let separator = prop::sample::select(SEPARATORS);
    prop::collection::vec((piece, separator), 1..8).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(piece, separator)| format!("{piece}{separator}"))
            .collect()
    })
}

/// Realize already realized content once more.
fn realize_again(world: &MemoryWorld, content: &Content) -> Content {
    let mut engine = Engine::builder(world).build();
    match folio_eval::realize(&mut engine, content, &StyleChain::new()) {
        Ok(content) => content,
        Err(error) => panic!("realizing twice failed: {error}"),
    }
}

#[test]
fn realized_documents_are_stable() {
    let world = MemoryWorld::new(
        "#show heading: it => [Title: #it.body]\n= One\n- a\n- b\n\n#set strong(delta: 5)\n*c* $x_1$",
    );
    let first = compiled(&world).content;
    assert_eq!(realize_again(&world, &first), first);
}

#[test]
fn show_rules_compile_to_equal_documents() {
    let world = MemoryWorld::new("#show strong: it => [!#it!]\n*a*");
    assert_eq!(compiled(&world).content, compiled(&world).content);

    let world = MemoryWorld::new("#let f(x) = x\n#show emph: f\n_b_");
    assert_eq!(compiled(&world).content, compiled(&world).content);
}

proptest! {
    #[test]
    fn compilation_is_deterministic(text in document()) {
        let world = MemoryWorld::new(&text);
        let options = CompileOptions::default();
        let first = compile(&world, &options).map(|c| (c.content, c.warnings));
        let second = compile(&world, &options).map(|c| (c.content, c.warnings));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn realization_is_a_fixpoint(text in document()) {
        let world = MemoryWorld::new(&text);
        if let Ok(result) = compile(&world, &CompileOptions::default()) {
            prop_assert_eq!(realize_again(&world, &result.content), result.content);
        }
    }

    #[test]
    fn empty_set_rules_are_transparent(text in document()) {
        let options = CompileOptions::default();
        let plain = compile(&MemoryWorld::new(&text), &options).map(|c| c.content);
        let with_rule = compile(&MemoryWorld::new(&format!("#set text()\n{text}")), &options)
            .map(|c| c.content);
        prop_assert_eq!(plain.ok(), with_rule.ok());
    }
}
