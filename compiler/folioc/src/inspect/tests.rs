use folio_ir::{FileId, VirtualPath};
use pretty_assertions::assert_eq;

use super::{expr_at, offset_of};

fn source(text: &str) -> folio_ir::Source {
    folio_parse::parse(text, FileId::new(None, VirtualPath::new("/inspect.fol")))
}

fn covered(text: &str, line: usize, column: usize) -> Option<String> {
    let source = source(text);
    let span = expr_at(&source, line, column)?;
    source.get(span).map(str::to_string)
}

#[test]
fn offsets_count_characters() {
    assert_eq!(offset_of("abc", 0, 1), Some(1));
    assert_eq!(offset_of("ab\ncd", 1, 1), Some(4));
    assert_eq!(offset_of("äb\ncd", 0, 1), Some(2));
    assert_eq!(offset_of("ab\ncd", 2, 0), None);
    assert_eq!(offset_of("ab\ncd", 0, 5), None);
}

#[test]
fn finds_the_innermost_expression() {
    assert_eq!(covered("#let x = 1 + 2", 0, 13), Some("2".into()));
    assert_eq!(covered("#let x = 1 + 2", 0, 9), Some("1".into()));
    assert_eq!(covered("Hi\n#foo(bar)", 1, 6), Some("bar".into()));
}

#[test]
fn positions_outside_the_text_find_nothing() {
    assert_eq!(covered("#x", 3, 0), None);
}
