//! Whole documents and what they realize to.

use folio_diagnostic::ErrorCode;
use folio_eval::value::{Color, Label};
use folio_eval::{ElemKind, Value};
use folioc::{CompileOptions, MemoryWorld};
use pretty_assertions::assert_eq;

use crate::common::{content, error_codes, failure, plain, single};

#[test]
fn variables_interpolate_into_text() {
    assert_eq!(plain("#let x = 3\nThe value is #x."), "The value is 3.");
}

#[test]
fn loops_join_their_bodies() {
    assert_eq!(plain("#for i in range(3) [#i ]"), "0 1 2");
}

#[test]
fn set_rules_wrap_the_rest_in_styles() {
    let realized = content("#set text(fill: red)\n*Hi*");
    let styled = single(&realized);
    assert_eq!(styled.kind(), ElemKind::Styled);

    let Some(Value::Styles(styles)) = styled.field("styles") else {
        panic!("styled element without styles: {}", realized.repr());
    };
    assert_eq!(styles.get(ElemKind::Text, "fill"), Some(Value::Color(Color::RED)));

    let child = styled.content_field("child").unwrap_or_default();
    let strong = single(&child);
    assert_eq!(strong.kind(), ElemKind::Strong);
    assert_eq!(strong.content_field("body").map(|body| body.plain_text()), Some("Hi".into()));
}

#[test]
fn show_rules_transform_each_match_once() {
    let realized = content("#show strong: it => [!#it!]\n*a* *b*");
    assert_eq!(realized.plain_text(), "!a! !b!");
}

#[test]
fn closures_with_named_defaults() {
    let f = "#let f(x, y: 10) = x + y\n";
    assert_eq!(plain(&format!("{f}#f(3)")), "13");
    assert_eq!(plain(&format!("{f}#f(3, y: 4)")), "7");

    let diagnostics = failure(&MemoryWorld::new(&format!("{f}#f()")), &CompileOptions::default());
    assert_eq!(error_codes(&diagnostics), vec![ErrorCode::E6004]);
    assert_eq!(diagnostics[0].message, "missing argument: x");
}

#[test]
fn extra_arguments_are_reported_by_name_or_index() {
    let f = "#let f(x) = x\n";
    let diagnostics = failure(&MemoryWorld::new(&format!("{f}#f(1, 2)")), &CompileOptions::default());
    assert_eq!(error_codes(&diagnostics), vec![ErrorCode::E6005]);
    assert_eq!(diagnostics[0].message, "unexpected positional argument at index 1");

    let diagnostics = failure(&MemoryWorld::new(&format!("{f}#f(1, y: 2)")), &CompileOptions::default());
    assert_eq!(diagnostics[0].message, "unexpected argument: y");
}

#[test]
fn parameters_may_share_the_function_name() {
    assert_eq!(plain("#let f(f) = f\n#f(1)"), "1");
}

#[test]
fn equations_build_math_elements() {
    let realized = content("$1/2 + x^2$");
    let equation = single(&realized);
    assert_eq!(equation.kind(), ElemKind::Equation);
    assert_eq!(equation.get("block"), Some(Value::Bool(false)));

    let body = equation.content_field("body").unwrap_or_default();
    let kinds: Vec<_> = body.iter().map(|elem| elem.kind()).collect();
    assert_eq!(kinds, vec![ElemKind::Frac, ElemKind::Symbol, ElemKind::Attach]);

    let frac = &body.elems()[0];
    assert_eq!(frac.content_field("num").map(|c| c.plain_text()), Some("1".into()));
    assert_eq!(frac.content_field("denom").map(|c| c.plain_text()), Some("2".into()));
    assert_eq!(body.elems()[1].field("text"), Some(&Value::str("+")));

    let attach = &body.elems()[2];
    assert_eq!(attach.content_field("base").map(|c| c.plain_text()), Some("x".into()));
    assert_eq!(attach.content_field("t").map(|c| c.plain_text()), Some("2".into()));
}

#[test]
fn equations_on_their_own_lines_are_blocks() {
    let block = single(&content("$\nx\n$"));
    assert_eq!(block.get("block"), Some(Value::Bool(true)));

    let inline = single(&content("$ x $"));
    assert_eq!(inline.get("block"), Some(Value::Bool(false)));
}

#[test]
fn math_composites_and_accents_are_global() {
    assert_eq!(plain("#mat((1, 2), (3, 4)).delim"), "(");
    assert_eq!(plain("#(math.mat((1, 2)).delim == \"(\")"), "true");

    let accent = single(&content("#hat[x]"));
    assert_eq!(accent.kind(), ElemKind::Accent);
    assert_eq!(accent.field("accent"), Some(&Value::str("\u{302}")));
}

#[test]
fn lists_labels_and_references() {
    let realized = content("*Intro* <intro>\n- a\n- b\n\nSee @intro.");
    let kinds: Vec<_> = realized.iter().map(|elem| elem.kind()).collect();
    assert_eq!(kinds.first(), Some(&ElemKind::Strong));
    assert!(kinds.contains(&ElemKind::List), "{}", realized.repr());
    assert!(kinds.contains(&ElemKind::Ref), "{}", realized.repr());
    assert_eq!(realized.elems()[0].label(), Some(Label::new("intro")));
}

#[test]
fn references_point_at_labelled_headings() {
    let realized = content("= H <h>\n@h[sup]");
    let heading = &realized.elems()[0];
    assert_eq!(heading.kind(), ElemKind::Heading);
    assert_eq!(heading.label(), Some(Label::new("h")));
    assert_eq!(heading.content_field("body").map(|body| body.plain_text()), Some("H".into()));

    let Some(reference) = realized.iter().find(|elem| elem.kind() == ElemKind::Ref) else {
        panic!("no reference in {}", realized.repr());
    };
    assert_eq!(reference.field("target"), Some(&Value::Label(Label::new("h"))));
    assert_eq!(realized.plain_text(), "H sup");
}

#[test]
fn context_reads_styles_at_its_position() {
    assert_eq!(plain("#set strong(delta: 100)\n#context strong.delta"), "100");
}

#[test]
fn data_loading_reads_world_files() {
    let world = MemoryWorld::new("#let d = json(\"data.json\")\n#d.name has #d.tags.len() tags")
        .with_file("/data.json", r#"{"name": "folio", "tags": ["a", "b"]}"#);
    let compiled = crate::common::compiled(&world);
    assert_eq!(compiled.content.plain_text().trim(), "folio has 2 tags");
}
