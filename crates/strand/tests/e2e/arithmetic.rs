//! Scalar arithmetic through the full pipeline.

use super::assert_scalar;
use strand::{EvalError, Value, VmError};

#[test]
fn add() {
    assert_scalar("return 2 + 3", 5.0);
}

#[test]
fn sub() {
    assert_scalar("return 10 - 3", 7.0);
}

#[test]
fn mul() {
    assert_scalar("return 6 * 7", 42.0);
}

#[test]
fn div() {
    assert_scalar("return 20 / 4", 5.0);
}

#[test]
fn precedence() {
    assert_scalar("return 1 + 2 * 3", 7.0);
    assert_scalar("return 10 - 4 / 2", 8.0);
}

#[test]
fn grouping() {
    assert_scalar("return (1 + 2) * 3", 9.0);
}

#[test]
fn unary_minus() {
    assert_scalar("return -5", -5.0);
    assert_scalar("return --5", 5.0);
    assert_scalar("return 3 + -2", 1.0);
}

#[test]
fn decimals() {
    assert_scalar("return 0.5 + 0.25", 0.75);
}

#[test]
fn globals() {
    assert_scalar("let x = 4 let y = 5 return x * y", 20.0);
}

#[test]
fn global_reuse() {
    assert_scalar("let x = 2 let y = x * x return y + x", 6.0);
}

#[test]
fn comments_are_ignored() {
    assert_scalar(
        "// doubles nothing\nlet x = 21 // the answer, halved\nreturn x * 2",
        42.0,
    );
}

#[test]
fn division_by_zero() {
    assert_eq!(
        strand::eval("return 1 / 0"),
        Err(EvalError::Run(VmError::DivisionByZero))
    );
}

#[test]
fn division_by_nonzero_result_of_expression() {
    assert_scalar("return 10 / (4 - 2)", 5.0);
}

#[test]
fn result_is_single_value() {
    // Exactly one value on top after a halting program.
    let value = strand::eval("return 1 + 1").unwrap();
    assert_eq!(value, Value::Scalar(2.0));
}
