//! End-to-end compilation and execution tests.
//!
//! These tests verify the complete source → compile → execute path.
//! Tests are organized into modules by functionality.

use strand::Value;

// Test modules
mod arithmetic;
mod batches;
mod errors;
mod functions;
mod vectors;

// ============================================================================
// Test Helpers
// ============================================================================

/// Evaluate source and return the result value.
pub fn eval(source: &str) -> Value {
    strand::eval(source).unwrap_or_else(|e| panic!("eval failed for '{source}': {e}"))
}

/// Evaluate source and check the scalar result.
pub fn assert_scalar(source: &str, expected: f64) {
    match eval(source) {
        Value::Scalar(v) => assert!(
            (v - expected).abs() < 1e-10,
            "'{source}': expected {expected}, got {v}"
        ),
        other => panic!("'{source}': expected scalar, got {other}"),
    }
}

/// Evaluate source and check the vec3 result.
pub fn assert_vec3(source: &str, x: f64, y: f64, z: f64) {
    match eval(source) {
        Value::Vec3(v) => {
            assert_eq!((v.x, v.y, v.z), (x, y, z), "'{source}'");
        }
        other => panic!("'{source}': expected vec3, got {other}"),
    }
}
