pub mod ast;
pub mod codec;
pub mod eval;
pub mod value;

use thiserror::Error;

pub use ast::{Expression, OperatorExpression, Selector};
pub use codec::{decode, expression_from_json, expression_to_json};
pub use eval::evaluate;
pub use value::{coerce, CoercedValue, Operator, ValueType};

#[derive(Debug, Error)]
pub enum Error {
    #[error("expression must be a JSON object")]
    ExpectedObject,

    #[error("missing `type` discriminator in expression")]
    MissingType,

    #[error("unknown expression type `{0}`")]
    UnknownType(String),

    #[error("missing field `{field}` in `{variant}` expression")]
    MissingField {
        variant: &'static str,
        field: &'static str,
    },

    #[error("unrecognized field `{field}` in `{variant}` expression")]
    UnrecognizedField {
        variant: &'static str,
        field: String,
    },

    #[error("invalid expression: {0}")]
    InvalidExpression(String),

    #[error("unknown operator `{0}`")]
    UnknownOperator(String),

    #[error("unknown value type `{0}`")]
    UnknownValueType(String),

    #[error("selector must have at least one segment")]
    EmptySelector,

    #[error("value `{value}` cannot be read as {value_type} for selector `{selector}`")]
    ValueMismatch {
        selector: String,
        value: String,
        value_type: ValueType,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
