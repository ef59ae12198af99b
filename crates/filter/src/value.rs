// crates/filter/src/value.rs

use std::fmt;
use std::str::FromStr;

use crate::ast::Selector;
use crate::Error;

/// Comparison operators a leaf expression may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl Operator {
    /// Name of the operator on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "Equal",
            Self::NotEqual => "NotEqual",
            Self::Greater => "Greater",
            Self::GreaterOrEqual => "GreaterOrEqual",
            Self::Less => "Less",
            Self::LessOrEqual => "LessOrEqual",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Error> {
        match name {
            "Equal" => Ok(Self::Equal),
            "NotEqual" => Ok(Self::NotEqual),
            "Greater" => Ok(Self::Greater),
            "GreaterOrEqual" => Ok(Self::GreaterOrEqual),
            "Less" => Ok(Self::Less),
            "LessOrEqual" => Ok(Self::LessOrEqual),
            other => Err(Error::UnknownOperator(other.to_owned())),
        }
    }
}

/// How the canonical string value of a leaf is read before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Text,
    Decimal,
    Boolean,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Decimal => "Decimal",
            Self::Boolean => "Boolean",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Error> {
        match name {
            "Text" => Ok(Self::Text),
            "Decimal" => Ok(Self::Decimal),
            "Boolean" => Ok(Self::Boolean),
            other => Err(Error::UnknownValueType(other.to_owned())),
        }
    }
}

/// A leaf value after coercion from its canonical string form.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercedValue {
    Text(String),
    Decimal(f64),
    Boolean(bool),
}

/// Coerce the canonical string `value` into the concrete type named by
/// `value_type`.
///
/// Decimal values must parse as finite base-10 doubles; Boolean values must
/// be exactly `"true"` or `"false"`. Text passes through unchanged. The
/// selector is only used to name the offending leaf on failure.
pub fn coerce(selector: &Selector, value: &str, value_type: ValueType) -> Result<CoercedValue, Error> {
    let mismatch = || Error::ValueMismatch {
        selector: selector.to_string(),
        value: value.to_owned(),
        value_type,
    };

    match value_type {
        ValueType::Text => Ok(CoercedValue::Text(value.to_owned())),
        ValueType::Decimal => value
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .map(CoercedValue::Decimal)
            .ok_or_else(mismatch),
        ValueType::Boolean => match value {
            "true" => Ok(CoercedValue::Boolean(true)),
            "false" => Ok(CoercedValue::Boolean(false)),
            _ => Err(mismatch()),
        },
    }
}
