use folio_ir::Span;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::value::{Color, FromValue, Label, Regex, Value};

fn fill(color: Color) -> Styles {
    let mut args = Args::new(Span::detached());
    args.push_named("fill", Span::detached(), Value::Color(color));
    Styles::from_rule(SetRule {
        target: ElemKind::Text,
        args,
        span: Span::detached(),
        liftable: true,
    })
}

fn size(pt: f64) -> Styles {
    let mut args = Args::new(Span::detached());
    args.push_named(
        "size",
        Span::detached(),
        Value::Length(crate::value::Length::pt(pt)),
    );
    Styles::from_rule(SetRule {
        target: ElemKind::Text,
        args,
        span: Span::detached(),
        liftable: true,
    })
}

fn hide(id: u64, kind: ElemKind) -> Styles {
    Styles::from_recipe(Recipe::new(
        RecipeId::from_raw(id),
        Some(Selector::elem(kind)),
        Transformation::Hide,
        Span::detached(),
    ))
}

#[test]
fn inner_frames_override_outer_ones() {
    let chain = StyleChain::new()
        .chain(&fill(Color::RED))
        .chain(&fill(Color::BLUE));
    assert_eq!(
        chain.get(ElemKind::Text, "fill"),
        Some(Value::Color(Color::BLUE))
    );
}

#[test]
fn later_rules_in_a_frame_win() {
    let mut styles = fill(Color::RED);
    styles.extend(fill(Color::GREEN));
    assert_eq!(styles.get(ElemKind::Text, "fill"), Some(Value::Color(Color::GREEN)));
}

#[test]
fn unrelated_fields_fall_through() {
    let chain = StyleChain::new().chain(&size(12.0)).chain(&fill(Color::RED));
    assert!(chain.get(ElemKind::Text, "size").is_some());
    assert_eq!(chain.get(ElemKind::Strong, "fill"), None);
}

#[test]
fn extending_with_nothing_keeps_the_chain() {
    let chain = StyleChain::new().chain(&fill(Color::RED));
    let same = chain.chain(&Styles::new());
    assert_eq!(same, chain);
    assert_eq!(same.depth(), 1);
}

#[test]
fn recipes_come_outermost_first() {
    let outer = hide(0, ElemKind::Strong);
    let inner = hide(1, ElemKind::Emph);
    let chain = StyleChain::new().chain(&outer).chain(&inner);
    let kinds: Vec<_> = chain
        .recipes()
        .into_iter()
        .map(|recipe| recipe.selector.clone())
        .collect();
    assert_eq!(
        kinds,
        vec![
            Some(Selector::elem(ElemKind::Strong)),
            Some(Selector::elem(ElemKind::Emph)),
        ]
    );
}

#[test]
fn all_styles_flattens_in_order() {
    let chain = StyleChain::new()
        .chain(&fill(Color::RED))
        .chain(&hide(0, ElemKind::Emph));
    let flat = chain.all_styles();
    assert_eq!(flat.rules.len(), 1);
    assert_eq!(flat.recipes.len(), 1);
}

#[test]
fn recipes_compare_by_what_they_do() {
    let a = Recipe::new(RecipeId::from_raw(0), None, Transformation::Hide, Span::detached());
    let b = Recipe::new(RecipeId::from_raw(7), None, Transformation::Hide, Span::detached());
    assert_eq!(a, b);

    let c = Recipe::new(
        RecipeId::from_raw(0),
        Some(Selector::elem(ElemKind::Strong)),
        Transformation::Hide,
        Span::detached(),
    );
    assert_ne!(a, c);
}

mod selectors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn values_cast_to_selectors() {
        let label = Selector::from_value(Value::Label(Label::new("a"))).ok();
        assert_eq!(label, Some(Selector::Label(Label::new("a"))));
        let text = Selector::from_value(Value::str("hi")).ok();
        assert_eq!(text, Some(Selector::Text("hi".into())));
        assert!(Selector::from_value(Value::Int(1)).is_err());
    }

    #[test]
    fn empty_text_selectors_are_rejected() {
        let err = Selector::from_value(Value::str("")).err();
        assert_eq!(err.map(|e| e.message), Some("text selector is empty".to_string()));
    }

    #[test]
    fn element_functions_select_their_kind() {
        let func = Value::Func(crate::func::Func::Native(ElemKind::Heading.func()));
        assert_eq!(
            Selector::from_value(func).ok(),
            Some(Selector::elem(ElemKind::Heading))
        );
    }

    #[test]
    fn repr() {
        let mut fields = Args::new(Span::detached());
        fields.push_named("level", Span::detached(), Value::Int(1));
        let selector = Selector::with_where(ElemKind::Heading, fields);
        assert_eq!(selector.repr(), "heading.where(level: 1)");
        let regex = Regex::new("a+").map(Selector::Regex);
        assert_eq!(regex.map(|s| s.repr()), Ok("regex(\"a+\")".to_string()));
    }
}

proptest! {
    #[test]
    fn empty_chain_is_an_identity(red: bool) {
        let styles = if red { fill(Color::RED) } else { size(10.0) };
        let chain = StyleChain::new().chain(&styles);
        prop_assert_eq!(chain.chain(&Styles::new()), chain.clone());
        prop_assert_eq!(StyleChain::new().chain(&styles), chain);
    }

    #[test]
    fn frames_keep_their_order(n in 1usize..6) {
        let mut chain = StyleChain::new();
        for i in 0..n {
            chain = chain.chain(&size(i as f64));
        }
        let sizes: Vec<_> = chain
            .frames()
            .filter_map(|styles| styles.get(ElemKind::Text, "size"))
            .collect();
        let expected: Vec<_> = (0..n)
            .rev()
            .map(|i| Value::Length(crate::value::Length::pt(i as f64)))
            .collect();
        prop_assert_eq!(sizes, expected);
    }
}
