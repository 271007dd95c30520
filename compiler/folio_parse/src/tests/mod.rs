//! Parser tests.
//!
//! Tests are organized into modules by syntactic mode:
//! - `markup`: text, emphasis, headings, lists, raw, links, embedded code
//! - `code`: operators, collections, closures and statements
//! - `math`: attachments, fractions, groups and math calls
//!
//! Trees are compared through a compact S-expression rendering produced by
//! [`sexpr`].

mod code;
mod markup;

use folio_ir::{
    Arg, ArrayItem, DictItem, ExprArena, ExprId, ExprKind, FileId, Imports, LetKind, Param,
    PatternId, PatternItem, PatternKind, Source, SyntaxErrorKind, VirtualPath,
};
use proptest::prelude::*;

use crate::{parse, parse_code, parse_math};

fn test_file() -> FileId {
    FileId::new(None, VirtualPath::new("/test.fol"))
}

/// Render the markup parse of `text`, asserting that it is error-free.
fn markup_tree(text: &str) -> String {
    render(&parse(text, test_file()))
}

fn code_tree(text: &str) -> String {
    render(&parse_code(text, test_file()))
}

fn math_tree(text: &str) -> String {
    render(&parse_math(text, test_file()))
}

fn render(source: &Source) -> String {
    assert!(
        source.errors().is_empty(),
        "unexpected errors: {:?}",
        source.errors()
    );
    sexpr(source.arena(), source.root())
}

/// The kinds of the syntax errors in the markup parse of `text`.
fn markup_errors(text: &str) -> Vec<SyntaxErrorKind> {
    let source = parse(text, test_file());
    source.errors().iter().map(|error| error.kind).collect()
}

fn code_errors(text: &str) -> Vec<SyntaxErrorKind> {
    let source = parse_code(text, test_file());
    source.errors().iter().map(|error| error.kind).collect()
}

fn list(arena: &ExprArena, head: &str, items: &[ExprId]) -> String {
    let mut out = format!("({head}");
    for &item in items {
        out.push(' ');
        out.push_str(&sexpr(arena, item));
    }
    out.push(')');
    out
}

fn sexpr(arena: &ExprArena, id: ExprId) -> String {
    match arena.kind(id) {
        ExprKind::Markup(range) => list(arena, "markup", arena.expr_list(range)),
        ExprKind::Text(text) => format!("{:?}", text.as_str()),
        ExprKind::Space => "space".into(),
        ExprKind::Linebreak => "linebreak".into(),
        ExprKind::Parbreak => "parbreak".into(),
        ExprKind::Escape(c) => format!("(escape {c:?})"),
        ExprKind::Shorthand(c) => format!("(shorthand {c:?})"),
        ExprKind::SmartQuote { double } => (if double { "dquote" } else { "quote" }).into(),
        ExprKind::Strong(body) => format!("(strong {})", sexpr(arena, body)),
        ExprKind::Emph(body) => format!("(emph {})", sexpr(arena, body)),
        ExprKind::Raw { text, lang, block } => {
            let lang = lang.map(|lang| format!(" {lang}")).unwrap_or_default();
            let block = if block { " block" } else { "" };
            format!("(raw{lang} {:?}{block})", text.as_str())
        }
        ExprKind::Link(url) => format!("(link {:?})", url.as_str()),
        ExprKind::Label(name) => format!("<{name}>"),
        ExprKind::Ref { target, supplement } => match supplement {
            Some(body) => format!("(ref {target} {})", sexpr(arena, body)),
            None => format!("(ref {target})"),
        },
        ExprKind::Heading { level, body } => format!("(heading {level} {})", sexpr(arena, body)),
        ExprKind::ListItem(body) => format!("(item {})", sexpr(arena, body)),
        ExprKind::EnumItem { number, body } => {
            let number = number.map_or_else(|| "none".to_string(), |n| n.to_string());
            format!("(enum {number} {})", sexpr(arena, body))
        }
        ExprKind::TermItem { term, description } => format!(
            "(term {} {})",
            sexpr(arena, term),
            sexpr(arena, description)
        ),
        ExprKind::Equation { block, body } => {
            let block = if block { " block" } else { "" };
            format!("(equation{block} {})", sexpr(arena, body))
        }
        ExprKind::Math(range) => list(arena, "math", arena.expr_list(range)),
        ExprKind::MathIdent(name) | ExprKind::MathText(name) => name.to_string(),
        ExprKind::MathShorthand(c) => c.to_string(),
        ExprKind::MathAlignPoint => "&".into(),
        ExprKind::MathDelimited { open, body, close } => format!(
            "(delim {} {} {})",
            sexpr(arena, open),
            sexpr(arena, body),
            sexpr(arena, close)
        ),
        ExprKind::MathAttach {
            base,
            bottom,
            top,
            primes,
        } => {
            let mut out = format!("(attach {}", sexpr(arena, base));
            if let Some(bottom) = bottom {
                out.push_str(&format!(" b:{}", sexpr(arena, bottom)));
            }
            if let Some(top) = top {
                out.push_str(&format!(" t:{}", sexpr(arena, top)));
            }
            if primes > 0 {
                out.push_str(&format!(" primes:{primes}"));
            }
            out.push(')');
            out
        }
        ExprKind::MathFrac { num, denom } => {
            format!("(frac {} {})", sexpr(arena, num), sexpr(arena, denom))
        }
        ExprKind::MathRoot { index, radicand } => match index {
            Some(index) => format!("(root {index} {})", sexpr(arena, radicand)),
            None => format!("(root {})", sexpr(arena, radicand)),
        },
        ExprKind::Ident(name) => name.to_string(),
        ExprKind::None => "none".into(),
        ExprKind::Auto => "auto".into(),
        ExprKind::Bool(v) => v.to_string(),
        ExprKind::Int(v) => v.to_string(),
        ExprKind::Float(bits) => f64::from_bits(bits).to_string(),
        ExprKind::Numeric { value, unit } => {
            format!("{}{}", f64::from_bits(value), unit.as_str())
        }
        ExprKind::Str(text) => format!("{:?}", text.as_str()),
        ExprKind::CodeBlock(range) => list(arena, "block", arena.expr_list(range)),
        ExprKind::ContentBlock(body) => format!("[{}]", sexpr(arena, body)),
        ExprKind::Parenthesized(inner) => format!("(paren {})", sexpr(arena, inner)),
        ExprKind::Array(range) => {
            let mut out = String::from("(array");
            for item in arena.array_items(range) {
                out.push(' ');
                match *item {
                    ArrayItem::Pos(expr) => out.push_str(&sexpr(arena, expr)),
                    ArrayItem::Spread { expr, .. } => {
                        out.push_str(&format!("..{}", sexpr(arena, expr)));
                    }
                }
            }
            out.push(')');
            out
        }
        ExprKind::Dict(range) => {
            let mut out = String::from("(dict");
            for item in arena.dict_items(range) {
                out.push(' ');
                match *item {
                    DictItem::Named { name, expr, .. } => {
                        out.push_str(&format!("{name}: {}", sexpr(arena, expr)));
                    }
                    DictItem::Keyed { key, expr, .. } => {
                        out.push_str(&format!("{}: {}", sexpr(arena, key), sexpr(arena, expr)));
                    }
                    DictItem::Spread { expr, .. } => {
                        out.push_str(&format!("..{}", sexpr(arena, expr)));
                    }
                }
            }
            out.push(')');
            out
        }
        ExprKind::Unary { op, expr } => format!("({op} {})", sexpr(arena, expr)),
        ExprKind::Binary { op, lhs, rhs } => {
            format!("({op} {} {})", sexpr(arena, lhs), sexpr(arena, rhs))
        }
        ExprKind::FieldAccess { target, field } => format!("(. {} {field})", sexpr(arena, target)),
        ExprKind::FuncCall { callee, args } => {
            let mut out = format!("(call {}", sexpr(arena, callee));
            for arg in arena.args(args) {
                out.push(' ');
                match *arg {
                    Arg::Pos(expr) => out.push_str(&sexpr(arena, expr)),
                    Arg::Named { name, expr, .. } => {
                        out.push_str(&format!("{name}: {}", sexpr(arena, expr)));
                    }
                    Arg::Spread { expr, .. } => {
                        out.push_str(&format!("..{}", sexpr(arena, expr)));
                    }
                }
            }
            out.push(')');
            out
        }
        ExprKind::Closure(id) => {
            let closure = arena.closure(id);
            let name = closure
                .name
                .map(|name| format!(" {name}"))
                .unwrap_or_default();
            let params: Vec<String> = arena
                .params(closure.params)
                .iter()
                .map(|param| match *param {
                    Param::Pos(pattern) => pattern_sexpr(arena, pattern),
                    Param::Named { name, default, .. } => {
                        format!("{name}: {}", sexpr(arena, default))
                    }
                    Param::Sink { name, .. } => {
                        format!("..{}", name.map(|n| n.to_string()).unwrap_or_default())
                    }
                })
                .collect();
            format!(
                "(closure{name} ({}) {})",
                params.join(" "),
                sexpr(arena, closure.body)
            )
        }
        ExprKind::Let { kind, init } => {
            let binding = match kind {
                LetKind::Normal(pattern) => pattern_sexpr(arena, pattern),
                LetKind::Closure(name) => name.to_string(),
            };
            match init {
                Some(init) => format!("(let {binding} {})", sexpr(arena, init)),
                None => format!("(let {binding})"),
            }
        }
        ExprKind::DestructAssign { pattern, value } => format!(
            "(= {} {})",
            pattern_sexpr(arena, pattern),
            sexpr(arena, value)
        ),
        ExprKind::Set {
            target,
            args,
            condition,
        } => {
            let call = arena.args(args).iter().fold(
                format!("(set {}", sexpr(arena, target)),
                |mut out, arg| {
                    out.push(' ');
                    match *arg {
                        Arg::Pos(expr) => out.push_str(&sexpr(arena, expr)),
                        Arg::Named { name, expr, .. } => {
                            out.push_str(&format!("{name}: {}", sexpr(arena, expr)));
                        }
                        Arg::Spread { expr, .. } => {
                            out.push_str(&format!("..{}", sexpr(arena, expr)));
                        }
                    }
                    out
                },
            );
            match condition {
                Some(condition) => format!("{call} if {})", sexpr(arena, condition)),
                None => format!("{call})"),
            }
        }
        ExprKind::Show {
            selector,
            transform,
        } => match selector {
            Some(selector) => format!(
                "(show {} {})",
                sexpr(arena, selector),
                sexpr(arena, transform)
            ),
            None => format!("(show {})", sexpr(arena, transform)),
        },
        ExprKind::Contextual(body) => format!("(context {})", sexpr(arena, body)),
        ExprKind::Conditional {
            condition,
            if_body,
            else_body,
        } => match else_body {
            Some(else_body) => format!(
                "(if {} {} {})",
                sexpr(arena, condition),
                sexpr(arena, if_body),
                sexpr(arena, else_body)
            ),
            None => format!(
                "(if {} {})",
                sexpr(arena, condition),
                sexpr(arena, if_body)
            ),
        },
        ExprKind::While { condition, body } => format!(
            "(while {} {})",
            sexpr(arena, condition),
            sexpr(arena, body)
        ),
        ExprKind::For {
            pattern,
            iterable,
            body,
        } => format!(
            "(for {} {} {})",
            pattern_sexpr(arena, pattern),
            sexpr(arena, iterable),
            sexpr(arena, body)
        ),
        ExprKind::Import {
            source,
            new_name,
            imports,
        } => {
            let mut out = format!("(import {}", sexpr(arena, source));
            if let Some(name) = new_name {
                out.push_str(&format!(" as {name}"));
            }
            match imports {
                Imports::None => {}
                Imports::Wildcard => out.push_str(" *"),
                Imports::Items(range) => {
                    let items: Vec<String> = arena
                        .import_items(range)
                        .iter()
                        .map(|item| match item.rename {
                            Some(rename) => format!("{}->{rename}", item.name),
                            None => item.name.to_string(),
                        })
                        .collect();
                    out.push_str(&format!(" ({})", items.join(" ")));
                }
            }
            out.push(')');
            out
        }
        ExprKind::Include(source) => format!("(include {})", sexpr(arena, source)),
        ExprKind::Break => "break".into(),
        ExprKind::Continue => "continue".into(),
        ExprKind::Return(value) => match value {
            Some(value) => format!("(return {})", sexpr(arena, value)),
            None => "return".into(),
        },
    }
}

fn pattern_sexpr(arena: &ExprArena, id: PatternId) -> String {
    match arena.pattern(id).kind {
        PatternKind::Normal(expr) => sexpr(arena, expr),
        PatternKind::Placeholder => "_".into(),
        PatternKind::Parenthesized(inner) => format!("(paren {})", pattern_sexpr(arena, inner)),
        PatternKind::Destructuring(range) => {
            let items: Vec<String> = arena
                .pattern_items(range)
                .iter()
                .map(|item| match *item {
                    PatternItem::Pattern(pattern) => pattern_sexpr(arena, pattern),
                    PatternItem::Named { name, pattern, .. } => {
                        format!("{name}: {}", pattern_sexpr(arena, pattern))
                    }
                    PatternItem::Spread { target, .. } => format!(
                        "..{}",
                        target.map(|t| sexpr(arena, t)).unwrap_or_default()
                    ),
                })
                .collect();
            format!("(destruct {})", items.join(" "))
        }
    }
}

proptest! {
    #[test]
    fn markup_parsing_never_panics(text in "[#*_`$=+/<>@()\\[\\]{}\"'\\\\a-c0-9 .:,;\n-]{0,48}") {
        let source = parse(&text, test_file());
        prop_assert!(source.arena().len() > 0);
    }

    #[test]
    fn code_parsing_never_panics(text in "[(){}\\[\\]=>.,:;+*/ a-c0-9\"\n-]{0,40}") {
        let _ = parse_code(&text, test_file());
    }

    #[test]
    fn math_parsing_never_panics(text in "[()\\[\\]{}_^/'&,;#\\\\a-cx0-9 \n-]{0,40}") {
        let _ = parse_math(&text, test_file());
    }

    #[test]
    fn plain_words_parse_to_one_text_node(words in prop::collection::vec("[a-z]{1,6}", 1..6)) {
        let text = words.join(" ");
        prop_assert_eq!(markup_tree(&text), format!("(markup {text:?})"));
    }
}
