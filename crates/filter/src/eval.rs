// crates/filter/src/eval.rs
//
// Reference semantics for filter expressions, evaluated directly against an
// in-memory JSON document. Mirrors what the compiled CouchDB selector would
// match, so compiler behavior can be checked without a live store. Not used
// on the production query path.

use serde_json::Value as Json;

use crate::ast::{Expression, OperatorExpression, Selector};
use crate::value::{coerce, CoercedValue, Operator};
use crate::Error;

/// Resolve a selector into a nested JSON value.
///
/// Returns `None` if any segment is missing.
fn field_value<'a>(doc: &'a Json, selector: &Selector) -> Option<&'a Json> {
    let mut current = doc;
    for segment in selector.segments() {
        current = current.get(segment)?;
    }
    Some(current)
}

/// Evaluate a full expression tree against a document.
///
/// And/Or short-circuit; an empty And is true, an empty Or false. A leaf
/// whose field is absent from the document is false, never an error. A leaf
/// whose literal cannot be coerced to its declared type is an error, same as
/// at compile time.
pub fn evaluate(expression: &Expression, doc: &Json) -> Result<bool, Error> {
    match expression {
        Expression::And(children) => {
            for child in children {
                if !evaluate(child, doc)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Expression::Or(children) => {
            for child in children {
                if evaluate(child, doc)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Expression::Operator(leaf) => evaluate_leaf(leaf, doc),
    }
}

fn evaluate_leaf(leaf: &OperatorExpression, doc: &Json) -> Result<bool, Error> {
    let expected = coerce(leaf.selector(), leaf.value(), leaf.value_type())?;

    let Some(actual) = field_value(doc, leaf.selector()) else {
        return Ok(false);
    };

    // A document value of a different JSON type never satisfies the leaf.
    Ok(match (&expected, actual) {
        (CoercedValue::Text(expected), Json::String(actual)) => {
            apply(leaf.operator(), actual.as_str(), expected.as_str())
        }
        (CoercedValue::Decimal(expected), Json::Number(actual)) => match actual.as_f64() {
            Some(actual) => apply(leaf.operator(), &actual, expected),
            None => false,
        },
        (CoercedValue::Boolean(expected), Json::Bool(actual)) => {
            apply(leaf.operator(), actual, expected)
        }
        _ => false,
    })
}

fn apply<T: PartialOrd + ?Sized>(operator: Operator, actual: &T, expected: &T) -> bool {
    match operator {
        Operator::Equal => actual == expected,
        Operator::NotEqual => actual != expected,
        Operator::Greater => actual > expected,
        Operator::GreaterOrEqual => actual >= expected,
        Operator::Less => actual < expected,
        Operator::LessOrEqual => actual <= expected,
    }
}
