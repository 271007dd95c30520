use folio_ir::SyntaxErrorKind;
use pretty_assertions::assert_eq;

use super::{code_errors, code_tree};

#[test]
fn binary_precedence_and_associativity() {
    assert_eq!(code_tree("1 + 2 * 3"), "(block (+ 1 (* 2 3)))");
    assert_eq!(code_tree("1 - 2 - 3"), "(block (- (- 1 2) 3))");
    assert_eq!(code_tree("-a * b"), "(block (* (- a) b))");
    assert_eq!(code_tree("not a and b"), "(block (and (not a) b))");
    assert_eq!(code_tree("a not in b"), "(block (not in a b))");
    assert_eq!(code_tree("x += 1"), "(block (+= x 1))");
}

#[test]
fn newlines_separate_statements_outside_parens() {
    assert_eq!(code_tree("let a = 1\na + 2"), "(block (let a 1) (+ a 2))");
    assert_eq!(code_tree("(1 +\n 2)"), "(block (paren (+ 1 2)))");
}

#[test]
fn literals() {
    assert_eq!(
        code_tree("12pt; 50%; 1.5; \"a\"; <l>; none; auto; true"),
        r#"(block 12pt 50% 1.5 "a" <l> none auto true)"#
    );
}

#[test]
fn collections() {
    assert_eq!(
        code_tree("(); (:); (1,); (a: 1, ..b)"),
        "(block (array) (dict) (array 1) (dict a: 1 ..b))"
    );
    assert_eq!(
        code_tree("(1, ..xs); (\"k\": 2)"),
        r#"(block (array 1 ..xs) (dict "k": 2))"#
    );
}

#[test]
fn closures() {
    assert_eq!(
        code_tree("(x, y: 2, ..rest) => x"),
        "(block (closure (x y: 2 ..rest) x))"
    );
    assert_eq!(code_tree("x => x + 1"), "(block (closure (x) (+ x 1)))");
    assert_eq!(code_tree("(a, b)"), "(block (array a b))");
    assert_eq!(
        code_tree("let f(x) = x * 2"),
        "(block (let f (closure f (x) (* x 2))))"
    );
}

#[test]
fn destructuring() {
    assert_eq!(
        code_tree("let (a, (b, _), ..c) = v"),
        "(block (let (destruct a (destruct b _) ..c) v))"
    );
    assert_eq!(
        code_tree("(a, b) = (b, a)"),
        "(block (= (destruct a b) (array b a)))"
    );
}

#[test]
fn set_and_show_rules() {
    assert_eq!(
        code_tree("set text(fill: red) if x"),
        "(block (set text fill: red if x))"
    );
    assert_eq!(
        code_tree("show heading: it => emph(it.body)"),
        "(block (show heading (closure (it) (call emph (. it body)))))"
    );
    assert_eq!(
        code_tree("show: rest => rest"),
        "(block (show (closure (rest) rest)))"
    );
    assert_eq!(
        code_tree("context text.lang"),
        "(block (context (. text lang)))"
    );
}

#[test]
fn control_flow() {
    assert_eq!(
        code_tree("if a { 1 } else if b { 2 } else { 3 }"),
        "(block (if a (block 1) (if b (block 2) (block 3))))"
    );
    assert_eq!(
        code_tree("for (k, v) in d { k }"),
        "(block (for (destruct k v) d (block k)))"
    );
    assert_eq!(
        code_tree("while true { break }"),
        "(block (while true (block break)))"
    );
    assert_eq!(code_tree("{ return }"), "(block (block return))");
    assert_eq!(code_tree("return x"), "(block (return x))");
}

#[test]
fn imports() {
    assert_eq!(
        code_tree("import \"a.fol\": x, y as z"),
        r#"(block (import "a.fol" (x y->z)))"#
    );
    assert_eq!(
        code_tree("import \"m.fol\" as m: *"),
        r#"(block (import "m.fol" as m *))"#
    );
    assert_eq!(
        code_tree("include \"ch.fol\""),
        r#"(block (include "ch.fol"))"#
    );
}

#[test]
fn postfix_chains() {
    assert_eq!(code_tree("a.b(1).c"), "(block (. (call (. a b) 1) c))");
    assert_eq!(code_tree("s.or(t)"), "(block (call (. s or) t))");
    assert_eq!(
        code_tree("f(..args, key: 1)[body]"),
        r#"(block (call f ..args key: 1 [(markup "body")]))"#
    );
}

#[test]
fn syntax_errors() {
    assert_eq!(code_errors("1 +"), vec![SyntaxErrorKind::ExpectedExpression]);
    assert_eq!(code_errors("(1, 2"), vec![SyntaxErrorKind::UnclosedDelimiter]);
    assert_eq!(code_errors("let x = 1 2"), vec![SyntaxErrorKind::UnexpectedToken]);
    assert_eq!(code_errors("\"open"), vec![SyntaxErrorKind::Unterminated]);
}
