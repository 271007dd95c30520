use std::hash::{BuildHasher, Hash, Hasher};

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn hash(value: &Value) -> u64 {
    let state = rustc_hash::FxBuildHasher;
    let mut hasher = state.build_hasher();
    value.hash(&mut hasher);
    hasher.finish()
}

mod truthiness {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn falsy_values() {
        for value in [
            Value::None,
            Value::Bool(false),
            Value::str(""),
            Value::Array(Array::new()),
            Value::Dict(Dict::new()),
        ] {
            assert!(!value.truthy(), "{value:?} should be falsy");
        }
    }

    #[test]
    fn everything_else_is_truthy() {
        for value in [
            Value::Auto,
            Value::Int(0),
            Value::Float(0.0),
            Value::str("x"),
            Value::Content(Content::empty()),
        ] {
            assert!(value.truthy(), "{value:?} should be truthy");
        }
    }
}

mod display {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numbers_display_plainly() {
        assert_eq!(Value::Int(3).display().plain_text(), "3");
        assert_eq!(Value::Float(2.0).display().plain_text(), "2");
        assert_eq!(Value::Float(0.5).display().plain_text(), "0.5");
    }

    #[test]
    fn none_displays_as_nothing() {
        assert!(Value::None.display().is_empty());
    }

    #[test]
    fn repr_keeps_float_point() {
        assert_eq!(Value::Float(2.0).repr(), "2.0");
        assert_eq!(Value::Float(f64::INFINITY).repr(), "inf");
        assert_eq!(Value::str("a\"b").repr(), "\"a\\\"b\"");
        assert_eq!(Value::Type(Type::Dict).repr(), "dictionary");
    }

    #[test]
    fn container_repr() {
        let array = Value::Array(Array::from(vec![Value::Int(1), Value::str("a")]));
        assert_eq!(array.repr(), "(1, \"a\")");
        let mut dict = Dict::new();
        dict.insert("k".into(), Value::Bool(true));
        assert_eq!(Value::Dict(dict).repr(), "(k: true)");
    }

    #[test]
    fn colors_and_durations() {
        assert_eq!(Value::Color(Color::rgb(0x23, 0x9d, 0xad)).repr(), "rgb(\"#239dad\")");
        let span = Duration::from_parts(1, 0, 2, 0, 5);
        assert_eq!(
            span.map(|d| d.to_string()),
            Some("duration(weeks: 1, hours: 2, seconds: 5)".to_string())
        );
    }
}

mod equality {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn none_and_auto_are_distinct() {
        assert_eq!(Value::None, Value::None);
        assert_eq!(Value::Auto, Value::Auto);
        assert_ne!(Value::None, Value::Auto);
    }

    #[test]
    fn integral_numbers_hash_alike() {
        assert_eq!(hash(&Value::Int(4)), hash(&Value::Float(4.0)));
        assert_eq!(hash(&Value::Int(4)), hash(&Value::Decimal(Decimal::from(4))));
        assert_eq!(hash(&Value::Float(0.0)), hash(&Value::Float(-0.0)));
    }

    #[test]
    fn containers_compare_deeply() {
        let a = Value::Array(Array::from(vec![Value::Int(1), Value::Float(2.0)]));
        let b = Value::Array(Array::from(vec![Value::Float(1.0), Value::Int(2)]));
        assert_eq!(a, b);
    }

    #[test]
    fn versions_ignore_trailing_zeros() {
        assert_eq!(Version::new([1, 2]), Version::new([1, 2, 0]));
        assert!(Version::new([1, 10]) > Version::new([1, 9, 9]));
    }
}

mod containers {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn negative_indices_count_from_the_end() {
        let array = Array::from(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(array.at(-1).ok(), Some(&Value::Int(3)));
        assert!(array.at(3).is_err());
        assert_eq!(array.slice(1, None).ok().map(|a| a.len()), Some(2));
    }

    #[test]
    fn clones_are_independent() {
        let original = Array::from(vec![Value::Int(1)]);
        let mut copy = original.clone();
        copy.push(Value::Int(2));
        assert_eq!(original.len(), 1);
        assert_eq!(copy.len(), 2);
    }

    #[test]
    fn dicts_keep_insertion_order() {
        let mut dict = Dict::new();
        for key in ["z", "a", "m"] {
            dict.insert(key.into(), Value::None);
        }
        let keys: Vec<&str> = dict.keys().map(Str::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
        dict.remove("a");
        let keys: Vec<&str> = dict.keys().map(Str::as_str).collect();
        assert_eq!(keys, ["z", "m"]);
    }

    #[test]
    fn missing_dict_key() {
        let dict = Dict::new();
        assert_eq!(
            dict.at("nope").err().map(|e| e.message),
            Some("dictionary does not contain key \"nope\"".to_string())
        );
    }
}

mod misc {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hex_colors() {
        assert_eq!(Color::from_hex("#f00").ok(), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::from_hex("00ff0080").ok(), Some(Color::rgba(0, 255, 0, 128)));
        assert!(Color::from_hex("#12").is_err());
    }

    #[test]
    fn datetime_patterns() {
        let date = Datetime::from_ymd(2024, 5, 7);
        assert_eq!(
            date.and_then(|d| d.display(None).ok()),
            Some("2024-05-07".to_string())
        );
        assert_eq!(
            date.and_then(|d| d.display(Some("[month repr:long] [day padding:none]")).ok()),
            Some("May 7".to_string())
        );
    }

    #[test]
    fn shifting_by_days() {
        let date = Datetime::from_ymd(2024, 2, 28);
        assert_eq!(date.and_then(|d| d.shift_days(1)), Datetime::from_ymd(2024, 2, 29));
        assert_eq!(date.and_then(|d| d.shift_days(-28)), Datetime::from_ymd(2024, 1, 31));
        assert_eq!(date.and_then(|d| d.shift_days(i32::MAX)), None);

        let noon = Datetime::from_hms(12, 0, 0);
        assert_eq!(noon.and_then(|t| t.shift_days(3)), noon);
    }

    #[test]
    fn symbol_modifiers() {
        const ARROW: SymbolTable = &[("r", '→'), ("l", '←'), ("r.double", '⇒')];
        let arrow = Symbol::table(ARROW);
        assert_eq!(arrow.modified("r").map(|s| s.get()), Ok('→'));
        let double = arrow.modified("double");
        assert_eq!(double.map(|s| s.get()), Ok('⇒'));
        assert!(arrow.modified("up").is_err());
    }

    #[test]
    fn type_names_round_trip() {
        for ty in Type::ALL {
            assert_eq!(Type::from_name(ty.name()), Some(*ty));
        }
    }
}

proptest! {
    #[test]
    fn int_float_equality_agrees_with_hash(v in -100_000i64..100_000) {
        let int = Value::Int(v);
        let float = Value::Float(v as f64);
        prop_assert_eq!(&int, &float);
        prop_assert_eq!(hash(&int), hash(&float));
    }

    #[test]
    fn truthiness_is_total(v in any::<i64>(), b: bool, s in "[a-z]{0,3}") {
        for value in [Value::Int(v), Value::Bool(b), Value::str(s.as_str())] {
            let _ = value.truthy();
        }
        prop_assert_eq!(Value::Bool(b).truthy(), b);
    }
}
