use pretty_assertions::assert_eq;

use super::*;
use crate::errors::{EvalErrorKind, SourceResult};
use crate::testing::{realize_markup, TestWorld};
use crate::World;

fn realized_text(text: &str) -> SourceResult<String> {
    realize_markup(text).map(|content| content.plain_text())
}

fn text(text: &str) -> Option<String> {
    realized_text(text).ok()
}

#[test]
fn replacing_an_element() {
    assert_eq!(text("#show heading: [X]\n= A\nB"), Some("X B".into()));
}

#[test]
fn show_functions_receive_the_element() {
    assert_eq!(text("#show heading: it => [(#it.body)]\n= A"), Some("(A)".into()));
}

#[test]
fn show_rules_scope_to_the_rest() {
    assert_eq!(
        text("*a*#show strong: [b]\n*c*"),
        Some("a b".into())
    );
}

#[test]
fn recipes_do_not_fire_on_their_own_output() {
    let Ok(content) = realize_markup("#show strong: it => strong(it.body)\n*a*") else {
        panic!("realization must terminate");
    };
    assert_eq!(content.plain_text(), "a");
}

#[test]
fn text_selectors_split_text() {
    assert_eq!(text("#show \"a\": [o]\nbanana"), Some("bonono".into()));
    assert_eq!(text("#show \"x\": [o]\nbanana"), Some("banana".into()));
}

#[test]
fn regex_selectors() {
    assert_eq!(
        text("#show regex(\"[0-9]+\"): [N]\na1b22"),
        Some("aNbN".into())
    );
}

#[test]
fn empty_text_selectors_are_rejected() {
    assert!(matches!(
        realized_text("#show \"\": [x]\na").err().map(|e| e.kind),
        Some(EvalErrorKind::ShowRuleError { .. })
    ));
}

#[test]
fn label_selectors() {
    assert_eq!(text("#show <x>: [Y]\n*a* <x> *b*"), Some("Y b".into()));
}

#[test]
fn where_filters() {
    assert_eq!(
        text("#show heading.where(level: 2): [two]\n= one\n== x"),
        Some("one two".into())
    );
}

#[test]
fn or_selectors() {
    assert_eq!(
        text("#show heading.where(level: 2).or(strong): [Z]\n= a\n== b\n*c*"),
        Some("a Z Z".into())
    );
}

#[test]
fn predicate_selectors_see_the_element() {
    assert_eq!(
        text("#let bold(it) = it.func() == strong\n#show bold: [S]\n*a* _b_"),
        Some("S b".into())
    );
}

#[test]
fn before_and_after() {
    let doc = "= a\n= b <stop>\n= c";
    assert_eq!(
        text(&format!("#show heading.where(level: 1).before(<stop>): [H]\n{doc}")),
        Some("H H c".into())
    );
    assert_eq!(
        text(&format!("#show heading.where(level: 1).after(<stop>): [H]\n{doc}")),
        Some("a b H".into())
    );
    assert_eq!(
        text(&format!("#show heading.where(level: 1).after(<missing>): [H]\n{doc}")),
        Some("a b c".into())
    );
    assert_eq!(
        text(&format!("#show heading.where(level: 1).before(<missing>): [H]\n{doc}")),
        Some("H H H".into())
    );
}

#[test]
fn show_set_styles_the_match() {
    let Ok(content) = realize_markup("#show strong: set strong(delta: 1)\n*a*") else {
        panic!("realization must succeed");
    };
    assert_eq!(content.plain_text(), "a");
    let Some(outer) = content.to_single() else {
        panic!("expected the show rule's wrapper");
    };
    let inner = outer.content_field("child").unwrap_or_default();
    assert_eq!(inner.elems()[0].kind(), ElemKind::Styled);
}

#[test]
fn show_everything() {
    assert_eq!(text("#show: body => [pre #body]\nmain"), Some("pre main".into()));
    assert_eq!(text("#show: [gone]\nmain"), Some("gone".into()));
}

#[test]
fn hiding() {
    assert_eq!(text("#show strong: none\na *b* c"), Some("a c".into()));
}

#[test]
fn context_reads_the_style_chain() {
    assert_eq!(text("#context strong.delta"), Some("300".into()));
    assert_eq!(
        text("#set strong(delta: 7)\n#context strong.delta"),
        Some("7".into())
    );
}

#[test]
fn settable_fields_need_context() {
    assert!(realized_text("#strong.delta").is_err());
}

#[test]
fn show_functions_see_set_values() {
    assert_eq!(
        text("#set strong(delta: 5)\n#show strong: it => [#it.delta]\n*a*"),
        Some("5".into())
    );
}

#[test]
fn runaway_context_hits_the_depth_limit() {
    assert_eq!(
        realized_text("#let f(n) = context f(n + 1)\n#f(0)")
            .err()
            .map(|e| e.kind),
        Some(EvalErrorKind::RecursionLimit {
            what: "show rule",
            limit: 64
        })
    );
}

#[test]
fn errors_in_show_functions_propagate() {
    assert!(realized_text("#show strong: it => 1 + \"a\"\n*a*").is_err());
}

#[test]
fn list_items_group_into_lists() {
    let Ok(content) = realize_markup("- a\n- b") else {
        panic!("realization must succeed");
    };
    let Some(list) = content.to_single() else {
        panic!("expected one list");
    };
    assert_eq!(list.kind(), ElemKind::List);
    assert_eq!(list.field("tight"), None);
    let Some(Value::Array(children)) = list.field("children") else {
        panic!("lists hold their items");
    };
    assert_eq!(children.len(), 2);
}

#[test]
fn parbreaks_make_lists_loose() {
    let Ok(content) = realize_markup("+ a\n\n+ b") else {
        panic!("realization must succeed");
    };
    let Some(list) = content.to_single() else {
        panic!("expected one enum");
    };
    assert_eq!(list.kind(), ElemKind::Enum);
    assert_eq!(list.field("tight"), Some(&Value::Bool(false)));
}

#[test]
fn different_items_form_different_lists() {
    let Ok(content) = realize_markup("- a\n+ b") else {
        panic!("realization must succeed");
    };
    let kinds: Vec<ElemKind> = content.iter().map(Elem::kind).collect();
    assert_eq!(kinds, vec![ElemKind::List, ElemKind::Space, ElemKind::Enum]);
}

#[test]
fn spaces_collapse() {
    let content = Content::sequence([
        Content::space(),
        Content::text("a"),
        Content::space(),
        Content::space(),
        Content::parbreak(),
        Content::text("b"),
        Content::space(),
    ]);
    let collapsed = collapse_spaces(&content, true, true);
    let kinds: Vec<ElemKind> = collapsed.iter().map(Elem::kind).collect();
    assert_eq!(kinds, vec![ElemKind::Text, ElemKind::Parbreak, ElemKind::Text]);
}

#[test]
fn realization_is_a_fixpoint() {
    let docs = [
        "#show heading: [X]\n= A\nB",
        "#show \"a\": [o]\nbanana",
        "#show strong: set strong(delta: 1)\n*a*",
        "#show <x>: it => [#it!]\n*a* <x>",
        "- a\n- b\n\nc",
        "#set strong(delta: 7)\n#context strong.delta",
    ];
    for doc in docs {
        let world = TestWorld::new(doc);
        let mut engine = Engine::new(&world);
        let source = folio_parse::parse(doc, world.main());
        let Ok(module) = crate::eval(&mut engine, &source) else {
            panic!("{doc:?} must evaluate");
        };
        let chain = StyleChain::new();
        let once = realize(&mut engine, module.content(), &chain).ok();
        let twice = once
            .as_ref()
            .and_then(|content| realize(&mut engine, content, &chain).ok());
        assert!(once.is_some(), "{doc:?} must realize");
        assert_eq!(once, twice, "{doc:?}");
    }
}
