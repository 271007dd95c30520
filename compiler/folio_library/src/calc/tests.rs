use folio_eval::errors::EvalErrorKind;
use folio_eval::value::{Angle, Decimal, Value};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::testing::{error_kind, eval};

fn float(code: &str) -> f64 {
    match eval(code) {
        Ok(Value::Float(v)) => v,
        other => panic!("`{code}` gave {other:?}"),
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn constants() {
    assert!(close(float("calc.pi"), std::f64::consts::PI));
    assert!(close(float("calc.e"), std::f64::consts::E));
    assert!(float("calc.inf").is_infinite());
    assert!(float("calc.nan").is_nan());
}

#[test]
fn abs_keeps_the_type() {
    assert_eq!(eval("calc.abs(-3)").ok(), Some(Value::Int(3)));
    assert_eq!(eval("calc.abs(-2.5)").ok(), Some(Value::Float(2.5)));
    assert_eq!(
        eval("calc.abs(decimal(\"-1.5\"))").ok(),
        Some(Value::Decimal(Decimal::new(15, 1)))
    );
    assert!(matches!(
        error_kind("calc.abs(\"x\")"),
        Some(EvalErrorKind::TypeMismatch { .. })
    ));
}

#[test]
fn pow_is_integral_for_integers() {
    assert_eq!(eval("calc.pow(2, 10)").ok(), Some(Value::Int(1024)));
    assert_eq!(eval("calc.pow(2, -1)").ok(), Some(Value::Float(0.5)));
    assert_eq!(eval("calc.pow(2.0, 3)").ok(), Some(Value::Float(8.0)));
    assert_eq!(error_kind("calc.pow(2, 64)"), Some(EvalErrorKind::IntegerOverflow));
    assert_eq!(error_kind("calc.pow(0, -1)"), Some(EvalErrorKind::DivisionByZero));
}

#[test]
fn pow_of_decimals() {
    assert_eq!(
        eval("calc.pow(decimal(\"1.5\"), 2)").ok(),
        Some(Value::Decimal(Decimal::new(225, 2)))
    );
}

#[test]
fn roots_and_logarithms() {
    assert_eq!(eval("calc.sqrt(16)").ok(), Some(Value::Float(4.0)));
    assert!(close(float("calc.root(27, 3)"), 3.0));
    assert!(close(float("calc.root(-8, 3)"), -2.0));
    assert!(close(float("calc.log(1000)"), 3.0));
    assert!(close(float("calc.log(8, base: 2)"), 3.0));
    assert!(close(float("calc.ln(calc.e)"), 1.0));
    assert!(close(float("calc.exp(0)"), 1.0));
}

#[test]
fn domain_errors() {
    for code in [
        "calc.sqrt(-1)",
        "calc.root(-4, 2)",
        "calc.root(2, 0)",
        "calc.log(0)",
        "calc.ln(-1)",
        "calc.asin(2)",
        "calc.log(10, base: 0)",
    ] {
        assert!(
            matches!(error_kind(code), Some(EvalErrorKind::ConstructorError { .. })),
            "`{code}` should fail"
        );
    }
}

#[test]
fn trigonometry_accepts_angles_and_numbers() {
    assert!(close(float("calc.sin(90deg)"), 1.0));
    assert!(close(float("calc.cos(0)"), 1.0));
    assert!(close(float("calc.tan(45deg)"), 1.0));
    assert!(close(float("calc.tanh(0)"), 0.0));
    assert!(close(float("calc.cosh(0)"), 1.0));
}

#[test]
fn inverse_trigonometry_returns_angles() {
    let Ok(Value::Angle(angle)) = eval("calc.asin(1)") else {
        panic!("expected an angle");
    };
    assert!(close(angle.to_deg(), 90.0));
    let Ok(Value::Angle(angle)) = eval("calc.atan2(1, 1)") else {
        panic!("expected an angle");
    };
    assert!(close(angle.to_rad(), Angle::deg(45.0).to_rad()));
}

#[test]
fn rounding() {
    assert_eq!(eval("calc.floor(2.7)").ok(), Some(Value::Int(2)));
    assert_eq!(eval("calc.ceil(2.1)").ok(), Some(Value::Int(3)));
    assert_eq!(eval("calc.trunc(-2.7)").ok(), Some(Value::Int(-2)));
    assert_eq!(eval("calc.floor(-2.5)").ok(), Some(Value::Int(-3)));
    assert_eq!(eval("calc.round(2.5)").ok(), Some(Value::Float(3.0)));
    assert_eq!(eval("calc.round(3.14159, digits: 2)").ok(), Some(Value::Float(3.14)));
    assert_eq!(eval("calc.round(7)").ok(), Some(Value::Int(7)));
    assert!(error_kind("calc.floor(calc.inf)").is_some());
}

#[test]
fn min_max_and_clamp() {
    assert_eq!(eval("calc.min(3, 1, 2)").ok(), Some(Value::Int(1)));
    assert_eq!(eval("calc.max(3, 1.5, 2)").ok(), Some(Value::Int(3)));
    assert_eq!(eval("calc.max(\"a\", \"c\", \"b\")").ok(), Some(Value::str("c")));
    assert!(matches!(error_kind("calc.min()"), Some(EvalErrorKind::Custom { .. })));
    assert_eq!(eval("calc.clamp(5, 0, 3)").ok(), Some(Value::Int(3)));
    assert_eq!(eval("calc.clamp(-1, 0, 3)").ok(), Some(Value::Int(0)));
    assert_eq!(eval("calc.clamp(2, 0, 3)").ok(), Some(Value::Int(2)));
    assert!(matches!(
        error_kind("calc.clamp(1, 3, 0)"),
        Some(EvalErrorKind::ConstructorError { .. })
    ));
}

#[test]
fn remainder_and_quotient() {
    assert_eq!(eval("calc.rem(7, 3)").ok(), Some(Value::Int(1)));
    assert_eq!(eval("calc.rem(-7, 3)").ok(), Some(Value::Int(-1)));
    assert_eq!(eval("calc.rem(7.5, 2)").ok(), Some(Value::Float(1.5)));
    assert_eq!(eval("calc.quo(7, 2)").ok(), Some(Value::Int(3)));
    assert_eq!(eval("calc.quo(-7, 2)").ok(), Some(Value::Int(-4)));
    assert_eq!(eval("calc.quo(7.5, 2)").ok(), Some(Value::Int(3)));
    assert_eq!(error_kind("calc.rem(1, 0)"), Some(EvalErrorKind::DivisionByZero));
    assert_eq!(error_kind("calc.quo(1, 0.0)"), Some(EvalErrorKind::DivisionByZero));
}

proptest! {
    #[test]
    fn quo_and_rem_reconstruct_the_dividend(a in -1000i64..1000, b in 1i64..50) {
        let code = format!("calc.quo({a}, {b}) * {b} + calc.rem({a}, {b}) - {a}");
        let Ok(Value::Int(diff)) = eval(&code) else {
            return Err(TestCaseError::fail("expected an integer"));
        };
        // Floor quotient and truncated remainder differ by one divisor when
        // the signs disagree.
        prop_assert!(diff == 0 || diff == -b);
    }

    #[test]
    fn floor_never_exceeds_ceil(x in -1.0e6f64..1.0e6) {
        let code = format!("calc.ceil({x:.3}) - calc.floor({x:.3})");
        let Ok(Value::Int(gap)) = eval(&code) else {
            return Err(TestCaseError::fail("expected an integer"));
        };
        prop_assert!(gap == 0 || gap == 1);
    }
}
