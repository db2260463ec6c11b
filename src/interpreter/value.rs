use std::fmt::Display;

use crate::{ast::types::Type, errors::errors::ErrorImpl};

/// A runtime value.
///
/// Arrays own their elements; cloning a value copies the whole array, so
/// assigning an array variable never aliases another one.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Array(Vec<Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Bool(_) => "Bool",
            Value::String(_) => "String",
            Value::Array(_) => "Array",
        }
    }

    /// The type a variable takes when its first value is stored without an
    /// annotation.
    pub fn type_of(&self) -> Type {
        match self {
            Value::Int(_) => Type::Int,
            Value::Float(_) => Type::Float,
            Value::Bool(_) => Type::Bool,
            Value::String(_) => Type::String,
            Value::Array(elements) => Type::Array(Box::new(
                elements.first().map(Value::type_of).unwrap_or(Type::Unknown),
            )),
        }
    }

    /// Numeric values as `f64`, the representation all arithmetic uses.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_) | Value::Bool(_))
    }

    /// Converts a value for storage in a slot of type `ty`.
    ///
    /// `Int` truncates floats toward zero and rejects those outside its range,
    /// `Float` widens ints and arrays convert element by element. An unknown
    /// type accepts anything.
    pub fn coerce(self, ty: &Type) -> Result<Value, ErrorImpl> {
        match (ty, self) {
            (Type::Unknown, value) => Ok(value),
            (Type::Int, Value::Int(value)) => Ok(Value::Int(value)),
            (Type::Int, Value::Float(value)) => {
                let truncated = value.trunc();
                // 2^63 itself is already out of range
                if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
                    Ok(Value::Int(truncated as i64))
                } else {
                    Err(ErrorImpl::IntegerOverflow {
                        value: format!("{:e}", value),
                    })
                }
            }
            (Type::Float, Value::Float(value)) => Ok(Value::Float(value)),
            (Type::Float, Value::Int(value)) => Ok(Value::Float(value as f64)),
            (Type::Bool, Value::Bool(value)) => Ok(Value::Bool(value)),
            (Type::String, Value::String(value)) => Ok(Value::String(value)),
            (Type::Array(element), Value::Array(values)) => values
                .into_iter()
                .map(|value| value.coerce(element))
                .collect::<Result<Vec<Value>, ErrorImpl>>()
                .map(Value::Array),
            (ty, value) => Err(ErrorImpl::TypeMismatch {
                expected: ty.to_string(),
                received: value.type_name().to_string(),
            }),
        }
    }
}

/// The text `print` writes for a value.
impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{:.2}", value),
            Value::Bool(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "{}", value),
            Value::Array(elements) => {
                let elements: Vec<String> = elements.iter().map(|value| value.to_string()).collect();
                write!(f, "[{}]", elements.join(", "))
            }
        }
    }
}
