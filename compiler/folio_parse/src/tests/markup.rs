use folio_ir::SyntaxErrorKind;
use pretty_assertions::assert_eq;

use super::{markup_errors, markup_tree};

#[test]
fn text_spaces_and_paragraphs() {
    assert_eq!(
        markup_tree("a  b\nc\n\nd"),
        r#"(markup "a b" space "c" parbreak "d")"#
    );
}

#[test]
fn comments_are_trivia() {
    assert_eq!(
        markup_tree("a // note\nb /* x */ c"),
        r#"(markup "a" space "b" space "c")"#
    );
}

#[test]
fn strong_and_emph() {
    assert_eq!(
        markup_tree("*bold* and _it_"),
        r#"(markup (strong (markup "bold")) space "and" space (emph (markup "it")))"#
    );
}

#[test]
fn underscore_inside_word_is_text() {
    assert_eq!(markup_tree("snake_case"), r#"(markup "snake_case")"#);
}

#[test]
fn unclosed_strong_is_reported() {
    assert_eq!(markup_errors("*a"), vec![SyntaxErrorKind::UnclosedDelimiter]);
    assert_eq!(
        markup_errors("*a\n\nb*"),
        vec![SyntaxErrorKind::UnclosedDelimiter]
    );
}

#[test]
fn headings() {
    assert_eq!(
        markup_tree("= Intro\nBody"),
        r#"(markup (heading 1 (markup "Intro")) space "Body")"#
    );
    assert_eq!(
        markup_tree("== Sub"),
        r#"(markup (heading 2 (markup "Sub")))"#
    );
    assert_eq!(markup_tree("a=b"), r#"(markup "a=b")"#);
}

#[test]
fn list_items_and_nesting() {
    assert_eq!(
        markup_tree("- a\n- b"),
        r#"(markup (item (markup "a")) space (item (markup "b")))"#
    );
    assert_eq!(
        markup_tree("- a\n  - b\n- c"),
        r#"(markup (item (markup "a" space (item (markup "b")))) space (item (markup "c")))"#
    );
}

#[test]
fn enum_and_term_items() {
    assert_eq!(
        markup_tree("+ x\n2. y"),
        r#"(markup (enum none (markup "x")) space (enum 2 (markup "y")))"#
    );
    assert_eq!(
        markup_tree("/ Term: desc"),
        r#"(markup (term (markup "Term") (markup "desc")))"#
    );
}

#[test]
fn raw_text() {
    assert_eq!(markup_tree("`x`"), r#"(markup (raw "x"))"#);
    assert_eq!(
        markup_tree("```rust\n  fn f() {}\n```"),
        r#"(markup (raw rust "fn f() {}" block))"#
    );
    assert_eq!(markup_errors("`open"), vec![SyntaxErrorKind::Unterminated]);
}

#[test]
fn escapes_and_linebreaks() {
    assert_eq!(
        markup_tree("a\\#b \\\nc"),
        r#"(markup "a" (escape '#') "b" space linebreak space "c")"#
    );
    assert_eq!(
        markup_tree("\\u{41}"),
        r#"(markup (escape 'A'))"#
    );
}

#[test]
fn shorthands_and_quotes() {
    assert_eq!(
        markup_tree("a--b---c..."),
        "(markup \"a\" (shorthand '\u{2013}') \"b\" (shorthand '\u{2014}') \"c\" (shorthand '\u{2026}'))"
    );
    assert_eq!(markup_tree("\"hi\""), r#"(markup dquote "hi" dquote)"#);
}

#[test]
fn labels_and_references() {
    assert_eq!(
        markup_tree("= A <intro>\nSee @intro."),
        r#"(markup (heading 1 (markup "A")) space <intro> space "See" space (ref intro) ".")"#
    );
    assert_eq!(
        markup_tree("= A<intro>"),
        r#"(markup (heading 1 (markup "A")) <intro>)"#
    );
    assert_eq!(
        markup_tree("= A <x> B"),
        r#"(markup (heading 1 (markup "A" space <x> space "B")))"#
    );
    assert_eq!(
        markup_tree("@fig[Figure]"),
        r#"(markup (ref fig [(markup "Figure")]))"#
    );
}

#[test]
fn links_drop_trailing_punctuation() {
    assert_eq!(
        markup_tree("see https://x.org/a."),
        r#"(markup "see" space (link "https://x.org/a") ".")"#
    );
}

#[test]
fn embedded_expressions_are_atomic() {
    assert_eq!(markup_tree("#x + 1"), r#"(markup x space "+ 1")"#);
    assert_eq!(markup_tree("#a.b."), r#"(markup (. a b) ".")"#);
    assert_eq!(
        markup_tree("#f(a)[b] c"),
        r#"(markup (call f a [(markup "b")]) space "c")"#
    );
}

#[test]
fn embedded_statements_end_at_newline() {
    assert_eq!(
        markup_tree("#let x = 1\nText"),
        r#"(markup (let x 1) space "Text")"#
    );
    assert_eq!(
        markup_tree("#set text(fill: red)\n*Hi*"),
        r#"(markup (set text fill: red) space (strong (markup "Hi")))"#
    );
    assert_eq!(
        markup_tree("#show strong: it => [!#it!]\n*a*"),
        r#"(markup (show strong (closure (it) [(markup "!" it "!")])) space (strong (markup "a")))"#
    );
}

#[test]
fn hash_without_expression_is_text() {
    assert_eq!(markup_tree("# 1"), r##"(markup "# 1")"##);
}

#[test]
fn content_blocks_balance_brackets() {
    assert_eq!(
        markup_tree("#[a [b] c]"),
        r#"(markup [(markup "a" space "[" "b" "]" space "c")])"#
    );
}

#[test]
fn equations_inline_and_block() {
    assert_eq!(markup_tree("$x$"), "(markup (equation (math x)))");
    assert_eq!(markup_tree("$ x $"), "(markup (equation (math x)))");
    assert_eq!(
        markup_tree("$\nx\n$"),
        "(markup (equation block (math x)))"
    );
    assert_eq!(markup_errors("$x"), vec![SyntaxErrorKind::UnclosedDelimiter]);
}
