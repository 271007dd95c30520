use folio_eval::errors::EvalErrorKind;
use folio_eval::value::Value;
use folio_eval::ElemKind;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::lorem;
use crate::testing::{error_kind, eval};

#[test]
fn lorem_is_a_sentence() {
    assert_eq!(lorem(0).as_str(), "");
    assert_eq!(lorem(3).as_str(), "Lorem ipsum dolor.");
    assert_eq!(lorem(5).as_str(), "Lorem ipsum dolor sit amet.");
}

#[test]
fn lorem_is_deterministic() {
    assert_eq!(eval("lorem(12) == lorem(12)").ok(), Some(Value::Bool(true)));
    assert_eq!(eval("lorem(2)").ok(), Some(Value::str("Lorem ipsum.")));
}

#[test]
fn lorem_rejects_negative_counts() {
    assert!(matches!(
        error_kind("lorem(-1)"),
        Some(EvalErrorKind::ConstructorError { .. })
    ));
}

#[test]
fn case_conversion_of_strings() {
    assert_eq!(eval("upper(\"abc\")").ok(), Some(Value::str("ABC")));
    assert_eq!(eval("lower(\"ÄB\")").ok(), Some(Value::str("äb")));
}

#[test]
fn case_conversion_of_content_keeps_structure() {
    let Ok(Value::Content(content)) = eval("upper([*a* b])") else {
        panic!("expected content");
    };
    assert_eq!(content.plain_text(), "A B");
    assert_eq!(content.elems().first().map(|e| e.kind()), Some(ElemKind::Strong));
}

#[test]
fn case_conversion_rejects_numbers() {
    assert!(matches!(
        error_kind("upper(1)"),
        Some(EvalErrorKind::TypeMismatch { .. })
    ));
}

proptest! {
    #[test]
    fn lorem_has_the_requested_word_count(words in 0usize..400) {
        prop_assert_eq!(lorem(words).split_whitespace().count(), words);
    }
}
