use super::*;
use crate::{ExprKind, VirtualPath};

fn source(text: &str) -> Source {
    let id = FileId::new(None, VirtualPath::new("source-tests.fol"));
    let mut arena = ExprArena::new();
    let root = arena.alloc_expr(ExprKind::None, Span::new(id, 0, 0));
    Source::new(id, text, arena, root, Vec::new())
}

#[test]
fn line_and_column_lookup() {
    let src = source("ab\ncd\n\nxyz");
    assert_eq!(src.byte_to_line(0), 0);
    assert_eq!(src.byte_to_line(3), 1);
    assert_eq!(src.byte_to_line(7), 3);
    assert_eq!(src.byte_to_column(4), 1);
    assert_eq!(src.line(1), Some("cd"));
    assert_eq!(src.line(2), Some(""));
    assert_eq!(src.line(3), Some("xyz"));
    assert_eq!(src.line(4), None);
}

#[test]
fn columns_count_characters() {
    let src = source("äöü x");
    assert_eq!(src.byte_to_column(7), 4);
}

#[test]
fn get_checks_file() {
    let src = source("hello world");
    assert_eq!(src.get(Span::new(src.id(), 6, 11)), Some("world"));
    assert_eq!(src.get(Span::raw(6, 11)), None);
}
