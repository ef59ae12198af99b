// crates/filter/src/ast.rs

use std::fmt;

use crate::value::{coerce, Operator, ValueType};
use crate::Error;

/// Ordered path of field names locating a value inside a nested JSON
/// document, e.g. `["csaf", "document", "title"]`.
///
/// A selector always has at least one segment. Segments are opaque strings;
/// they are never checked against a document schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector(Vec<String>);

impl Selector {
    pub fn new<I, S>(segments: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(Error::EmptySelector);
        }
        Ok(Self(segments))
    }

    /// Single-segment selector for a top-level field.
    pub fn field(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// Append one segment, descending into a nested object.
    pub fn child(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    /// Read-only view of the path segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Leaf expression comparing one document field against a typed literal.
///
/// The literal is stored in canonical string form (`"123.45"`, `"true"`) and
/// only coerced to its concrete type when the expression is compiled or
/// evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorExpression {
    selector: Selector,
    operator: Operator,
    value: String,
    value_type: ValueType,
}

impl OperatorExpression {
    /// Build a leaf from raw parts, checking once that `value` is readable
    /// as `value_type`.
    pub fn new(
        selector: Selector,
        operator: Operator,
        value: impl Into<String>,
        value_type: ValueType,
    ) -> Result<Self, Error> {
        let value = value.into();
        coerce(&selector, &value, value_type)?;
        Ok(Self {
            selector,
            operator,
            value,
            value_type,
        })
    }

    /// Text comparison leaf.
    pub fn text(selector: Selector, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            selector,
            operator,
            value: value.into(),
            value_type: ValueType::Text,
        }
    }

    /// Decimal comparison leaf. The literal is stored as the shortest
    /// round-tripping string form of `value`; non-finite doubles are
    /// rejected when the leaf is compiled or evaluated.
    pub fn decimal(selector: Selector, operator: Operator, value: f64) -> Self {
        Self {
            selector,
            operator,
            value: value.to_string(),
            value_type: ValueType::Decimal,
        }
    }

    /// Boolean comparison leaf.
    pub fn boolean(selector: Selector, operator: Operator, value: bool) -> Self {
        Self {
            selector,
            operator,
            value: value.to_string(),
            value_type: ValueType::Boolean,
        }
    }

    pub fn equal(selector: Selector, value: impl Into<String>) -> Self {
        Self::text(selector, Operator::Equal, value)
    }

    pub fn equal_decimal(selector: Selector, value: f64) -> Self {
        Self::decimal(selector, Operator::Equal, value)
    }

    pub fn equal_boolean(selector: Selector, value: bool) -> Self {
        Self::boolean(selector, Operator::Equal, value)
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }
}

/// Filter tree:
/// - Operator(leaf comparison)
/// - And([...])
/// - Or([...])
///
/// Composite nodes own their children; an empty child list is legal (And is
/// vacuously true, Or vacuously false). Trees are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    And(Vec<Expression>),
    Or(Vec<Expression>),
    Operator(OperatorExpression),
}

impl Expression {
    pub fn and(expressions: Vec<Expression>) -> Self {
        Self::And(expressions)
    }

    pub fn or(expressions: Vec<Expression>) -> Self {
        Self::Or(expressions)
    }
}

impl From<OperatorExpression> for Expression {
    fn from(leaf: OperatorExpression) -> Self {
        Self::Operator(leaf)
    }
}
