//! Runtime values.
//!
//! Every value carries its variant tag; opcode handlers match on the tags
//! and fail with a type mismatch when an operand has the wrong shape.
//! Vector payloads are inlined in the enum, so constructing a vec3 never
//! allocates.

use std::fmt;

use crate::vector::{Vec3, Vec3Batch};

/// A value on the operand stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    /// IEEE-754 double.
    Scalar(f64),
    /// Boolean.
    Bool(bool),
    /// Nil.
    Nil,
    /// 3D vector.
    Vec3(Vec3),
    /// Four 3D vectors in structure-of-arrays layout.
    Batch(Vec3Batch),
}

impl Value {
    /// Short tag name, used in type-mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Bool(_) => "bool",
            Value::Nil => "nil",
            Value::Vec3(_) => "vec3",
            Value::Batch(_) => "batch",
        }
    }

    /// True if this is a scalar.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    /// True if this is a vec3.
    pub fn is_vec3(&self) -> bool {
        matches!(self, Value::Vec3(_))
    }

    /// True if this is a batch.
    pub fn is_batch(&self) -> bool {
        matches!(self, Value::Batch(_))
    }

    /// The scalar payload, if this is a scalar.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// The vector payload, if this is a vec3.
    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            Value::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    /// The batch payload, if this is a batch.
    pub fn as_batch(&self) -> Option<Vec3Batch> {
        match self {
            Value::Batch(b) => Some(*b),
            _ => None,
        }
    }

    /// Truthiness: booleans are themselves, scalars are non-zero, nil is
    /// false, vectors and batches are always true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Scalar(v) => *v != 0.0,
            Value::Bool(b) => *b,
            Value::Nil => false,
            Value::Vec3(_) | Value::Batch(_) => true,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Nil => write!(f, "nil"),
            Value::Vec3(v) => write!(f, "{v}"),
            Value::Batch(b) => write!(f, "{b}"),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Value::Vec3(v)
    }
}

impl From<Vec3Batch> for Value {
    fn from(b: Vec3Batch) -> Self {
        Value::Batch(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_type_name() {
        assert_eq!(Value::Scalar(1.0).type_name(), "scalar");
        assert_eq!(Value::Bool(true).type_name(), "bool");
        assert_eq!(Value::Nil.type_name(), "nil");
        assert_eq!(Value::Vec3(Vec3::default()).type_name(), "vec3");
        assert_eq!(Value::Batch(Vec3Batch::new()).type_name(), "batch");
    }

    #[test]
    fn value_as_scalar_is_strict() {
        assert_eq!(Value::Scalar(3.5).as_scalar(), Some(3.5));
        // Booleans do not coerce; arithmetic on them is a type error.
        assert_eq!(Value::Bool(true).as_scalar(), None);
        assert_eq!(Value::Nil.as_scalar(), None);
    }

    #[test]
    fn value_as_vec3() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Value::Vec3(v).as_vec3(), Some(v));
        assert_eq!(Value::Scalar(1.0).as_vec3(), None);
    }

    #[test]
    fn value_is_truthy() {
        assert!(Value::Scalar(1.0).is_truthy());
        assert!(!Value::Scalar(0.0).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Nil.is_truthy());
        assert!(Value::Vec3(Vec3::default()).is_truthy());
    }

    #[test]
    fn value_from_primitives() {
        let v: Value = 2.5.into();
        assert_eq!(v, Value::Scalar(2.5));
        let v: Value = Vec3::new(1.0, 2.0, 3.0).into();
        assert!(v.is_vec3());
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::Scalar(2.5).to_string(), "2.5");
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(
            Value::Vec3(Vec3::new(1.0, 2.0, 3.0)).to_string(),
            "vec3(1, 2, 3)"
        );
    }
}
