use super::*;
use pretty_assertions::assert_eq;

fn kinds(text: &str) -> Vec<TokenKind> {
    let mut pos = 0;
    let mut out = Vec::new();
    loop {
        let token = lex(text, pos);
        if token.kind == TokenKind::End {
            return out;
        }
        pos = token.end;
        out.push(token.kind);
    }
}

#[test]
fn keywords_and_idents() {
    assert_eq!(
        kinds("let x-y = not none"),
        vec![
            TokenKind::Let,
            TokenKind::Ident("x-y".into()),
            TokenKind::Eq,
            TokenKind::Not,
            TokenKind::None,
        ]
    );
}

#[test]
fn numbers_and_units() {
    assert_eq!(
        kinds("12 1.5 12pt 50% 2fr 0xff 1e3 .5"),
        vec![
            TokenKind::Int(12),
            TokenKind::Float(1.5),
            TokenKind::Numeric(12.0, Unit::Pt),
            TokenKind::Numeric(50.0, Unit::Percent),
            TokenKind::Numeric(2.0, Unit::Fr),
            TokenKind::Int(255),
            TokenKind::Float(1000.0),
            TokenKind::Float(0.5),
        ]
    );
}

#[test]
fn field_access_after_int_is_not_a_float() {
    assert_eq!(
        kinds("1.abs"),
        vec![TokenKind::Int(1), TokenKind::Dot, TokenKind::Ident("abs".into())]
    );
    assert_eq!(
        kinds("1..2"),
        vec![TokenKind::Int(1), TokenKind::Dots, TokenKind::Int(2)]
    );
}

#[test]
fn strings_with_escapes() {
    assert_eq!(
        kinds(r#""a\n\"b\u{41}""#),
        vec![TokenKind::Str("a\n\"bA".into())]
    );
    assert_eq!(kinds(r#""open"#), vec![TokenKind::Error("unclosed string")]);
}

#[test]
fn operators() {
    assert_eq!(
        kinds("== != <= >= => += -= *= /= < >"),
        vec![
            TokenKind::EqEq,
            TokenKind::ExclEq,
            TokenKind::LtEq,
            TokenKind::GtEq,
            TokenKind::Arrow,
            TokenKind::PlusEq,
            TokenKind::HyphEq,
            TokenKind::StarEq,
            TokenKind::SlashEq,
            TokenKind::Lt,
            TokenKind::Gt,
        ]
    );
}

#[test]
fn labels_versus_less_than() {
    assert_eq!(kinds("<intro>"), vec![TokenKind::Label("intro".into())]);
    assert_eq!(
        kinds("a < b"),
        vec![
            TokenKind::Ident("a".into()),
            TokenKind::Lt,
            TokenKind::Ident("b".into()),
        ]
    );
}

#[test]
fn trivia_flags() {
    let token = lex("  // note\n  x", 0);
    assert_eq!(token.kind, TokenKind::Ident("x".into()));
    assert!(token.space_before);
    assert!(token.newline_before);

    let token = lex("/* a /* nested */ */x", 0);
    assert_eq!(token.kind, TokenKind::Ident("x".into()));
    assert!(!token.newline_before);

    let token = lex("x", 0);
    assert!(!token.space_before);
}

#[test]
fn underscore_placeholder() {
    assert_eq!(kinds("_"), vec![TokenKind::Underscore]);
    assert_eq!(kinds("_a"), vec![TokenKind::Ident("_a".into())]);
}
