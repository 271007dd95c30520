use super::*;

#[test]
fn precedence_orders_operators() {
    assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
    assert!(BinaryOp::Add.precedence() > BinaryOp::Eq.precedence());
    assert!(BinaryOp::Eq.precedence() > BinaryOp::And.precedence());
    assert!(BinaryOp::And.precedence() > BinaryOp::Or.precedence());
    assert!(BinaryOp::Or.precedence() > BinaryOp::Assign.precedence());
    assert!(UnaryOp::Neg.precedence() > BinaryOp::Mul.precedence());
}

#[test]
fn assignments_are_right_associative() {
    assert_eq!(BinaryOp::AddAssign.assoc(), Assoc::Right);
    assert_eq!(BinaryOp::Sub.assoc(), Assoc::Left);
    assert_eq!(BinaryOp::MulAssign.compound_base(), Some(BinaryOp::Mul));
    assert_eq!(BinaryOp::Assign.compound_base(), None);
}

#[test]
fn unit_suffixes_roundtrip() {
    for unit in [Unit::Pt, Unit::Mm, Unit::Cm, Unit::In, Unit::Deg, Unit::Fr, Unit::Percent] {
        assert_eq!(Unit::from_suffix(unit.as_str()), Some(unit));
    }
    assert_eq!(Unit::from_suffix("px"), None);
}

#[test]
fn markup_classification() {
    assert!(ExprKind::Space.is_markup());
    assert!(ExprKind::Heading {
        level: 1,
        body: ExprId::new(0)
    }
    .is_markup());
    assert!(!ExprKind::Int(3).is_markup());
    assert!(ExprKind::Int(3).is_literal());
    assert!(!ExprKind::Break.is_literal());
}
