//! Literal values carried by criteria and actions

use serde::Serialize;

/// Numeric literal. Keeps the integer/float distinction from the source
/// text; a float with zero fraction still counts as an integer wherever the
/// grammar asks, matching the legacy numeric model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// The integer behind this literal, if it has one. `3` and `3.0` both
    /// yield `Some(3)`; `3.5` yields `None`.
    pub fn as_integer(self) -> Option<i64> {
        match self {
            Number::Integer(value) => Some(value),
            Number::Float(value) => {
                if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
                    Some(value as i64)
                } else {
                    None
                }
            }
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(value) => value as f64,
            Number::Float(value) => value,
        }
    }

    pub fn negated(self) -> Number {
        match self {
            Number::Integer(value) => Number::Integer(-value),
            Number::Float(value) => Number::Float(-value),
        }
    }

    /// Collapse an integral float back to an integer literal.
    pub fn normalized(self) -> Number {
        match self.as_integer() {
            Some(value) => Number::Integer(value),
            None => self,
        }
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Integer(value) => write!(f, "{}", value),
            Number::Float(value) => write!(f, "{}", value),
        }
    }
}

/// Scalar literal: the value of an `equals` criterion or a `set` action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl From<Number> for Scalar {
    fn from(number: Number) -> Self {
        match number.normalized() {
            Number::Integer(value) => Scalar::Integer(value),
            Number::Float(value) => Scalar::Float(value),
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::String(value) => write!(f, "\"{}\"", value),
            Scalar::Integer(value) => write!(f, "{}", value),
            Scalar::Float(value) => write!(f, "{}", value),
            Scalar::Boolean(value) => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_count_as_integers() {
        assert_eq!(Number::Float(3.0).as_integer(), Some(3));
        assert_eq!(Number::Float(3.5).as_integer(), None);
        assert_eq!(Number::Integer(-7).as_integer(), Some(-7));
    }

    #[test]
    fn scalars_serialize_as_bare_json_values() {
        assert_eq!(
            serde_json::to_value(Scalar::String("hi".into())).unwrap(),
            serde_json::json!("hi")
        );
        assert_eq!(
            serde_json::to_value(Scalar::Integer(4)).unwrap(),
            serde_json::json!(4)
        );
        assert_eq!(
            serde_json::to_value(Scalar::Boolean(true)).unwrap(),
            serde_json::json!(true)
        );
        assert_eq!(
            serde_json::to_value(Number::Float(0.25)).unwrap(),
            serde_json::json!(0.25)
        );
    }

    #[test]
    fn scalar_from_number_normalizes() {
        assert_eq!(Scalar::from(Number::Float(3.0)), Scalar::Integer(3));
        assert_eq!(Scalar::from(Number::Float(0.5)), Scalar::Float(0.5));
    }
}
