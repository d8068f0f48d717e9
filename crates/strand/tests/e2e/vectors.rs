//! Vector operations through the full pipeline.

use super::{assert_scalar, assert_vec3};

#[test]
fn vec3_literal() {
    assert_vec3("return vec3(1, 2, 3)", 1.0, 2.0, 3.0);
}

#[test]
fn vec3_component_expressions() {
    assert_vec3("return vec3(1 + 1, 2 * 2, 9 / 3)", 2.0, 4.0, 3.0);
}

#[test]
fn vector_addition() {
    assert_vec3("return vec3(1, 2, 3) + vec3(4, 5, 6)", 5.0, 7.0, 9.0);
}

#[test]
fn vector_subtraction() {
    assert_vec3("return vec3(4, 5, 6) - vec3(1, 2, 3)", 3.0, 3.0, 3.0);
}

#[test]
fn dot_product() {
    assert_scalar("return dot(vec3(1, 2, 3), vec3(4, 5, 6))", 32.0);
}

#[test]
fn cross_product() {
    assert_vec3("return cross(vec3(1, 0, 0), vec3(0, 1, 0))", 0.0, 0.0, 1.0);
}

#[test]
fn magnitude() {
    assert_scalar("return mag(vec3(3, 4, 0))", 5.0);
}

#[test]
fn scaling_via_mul() {
    assert_vec3("return vec3(1, 2, 3) * 2", 2.0, 4.0, 6.0);
    assert_vec3("return 2 * vec3(1, 2, 3)", 2.0, 4.0, 6.0);
}

#[test]
fn negated_vector() {
    assert_vec3("return -vec3(1, 2, 3)", -1.0, -2.0, -3.0);
}

#[test]
fn vectors_in_variables() {
    assert_scalar(
        "let a = vec3(1, 2, 3)
         let b = vec3(4, 5, 6)
         return dot(a, b)",
        32.0,
    );
}

#[test]
fn composed_vector_expression() {
    // |(v1 + v2) x v3| with orthogonal inputs
    assert_scalar(
        "let v1 = vec3(1, 0, 0)
         let v2 = vec3(0, 0, 0)
         let v3 = vec3(0, 1, 0)
         return mag(cross(v1 + v2, v3))",
        1.0,
    );
}
