//! User-defined functions through the full pipeline.

use super::{assert_scalar, assert_vec3};

#[test]
fn simple_call() {
    assert_scalar("fn double(x) { return x * 2 } return double(5)", 10.0);
}

#[test]
fn multiple_parameters() {
    assert_scalar(
        "fn add3(a, b, c) { return a + b + c } return add3(1, 2, 3)",
        6.0,
    );
}

#[test]
fn function_locals() {
    assert_scalar(
        "fn compute(x) {
            let a = x + 1
            let b = a * 2
            return b
        }
        return compute(5)",
        12.0,
    );
}

#[test]
fn nested_calls() {
    assert_scalar(
        "fn double(x) { return x * 2 }
        fn quad(x) { return double(double(x)) }
        return quad(3)",
        12.0,
    );
}

#[test]
fn call_in_expression() {
    assert_scalar(
        "fn average(a, b) { return (a + b) / 2 } return average(10, 20) + 1",
        16.0,
    );
}

#[test]
fn function_calling_builtin() {
    assert_scalar(
        "fn magnitude(v) { return mag(v) } return magnitude(vec3(3, 4, 0))",
        5.0,
    );
}

#[test]
fn vector_arguments_and_results() {
    assert_vec3(
        "fn scale_vec(v, s) { return v * s } return scale_vec(vec3(1, 2, 3), 2)",
        2.0,
        4.0,
        6.0,
    );
}

#[test]
fn several_functions() {
    assert_scalar(
        "fn add(a, b) { return a + b }
        fn sub(a, b) { return a - b }
        fn calc() {
            let x = add(10, 5)
            let y = sub(20, 8)
            return x + y
        }
        return calc()",
        27.0,
    );
}

#[test]
fn no_parameters() {
    assert_scalar("fn answer() { return 42 } return answer()", 42.0);
}

#[test]
fn implicit_return() {
    assert_scalar("fn quiet() { let x = 5 } return quiet()", 0.0);
}

#[test]
fn forward_reference() {
    assert_scalar(
        "fn first() { return second() + 1 }
        fn second() { return 41 }
        return first()",
        42.0,
    );
}

#[test]
fn parameter_shadows_global_name() {
    assert_scalar("let x = 100 fn f(x) { return x * 2 } return f(5)", 10.0);
}

#[test]
fn call_result_feeds_call() {
    assert_scalar(
        "fn inc(x) { return x + 1 } return inc(inc(inc(0)))",
        3.0,
    );
}
