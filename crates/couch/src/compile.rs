// crates/couch/src/compile.rs
//
// Translation of a filter expression tree into a CouchDB Mango selector.
// Compilation is all-or-nothing: any coercion or path-encoding failure
// aborts the whole translation, identifying the offending leaf.

use serde_json::{json, Map, Value as Json};
use tracing::trace;

use filter::{coerce, CoercedValue, Expression, Operator, OperatorExpression, Selector};

use crate::Error;

/// Mango name for each comparison operator.
fn mango_operator(operator: Operator) -> &'static str {
    match operator {
        Operator::Equal => "$eq",
        Operator::NotEqual => "$ne",
        Operator::Greater => "$gt",
        Operator::GreaterOrEqual => "$gte",
        Operator::Less => "$lt",
        Operator::LessOrEqual => "$lte",
    }
}

/// Selector matching every document. `_id` is mandatory in CouchDB, so a
/// `$gt: null` bound on it is always satisfied.
pub fn match_all() -> Json {
    json!({ "_id": { "$gt": null } })
}

/// Selector matching no document.
pub fn match_none() -> Json {
    json!({ "_id": { "$exists": false } })
}

/// Compile an expression tree into a Mango selector object.
pub fn compile(expression: &Expression) -> Result<Json, Error> {
    let selector = compile_expression(expression)?;
    trace!(%selector, "compiled filter expression");
    Ok(selector)
}

fn compile_expression(expression: &Expression) -> Result<Json, Error> {
    match expression {
        Expression::And(children) if children.is_empty() => Ok(match_all()),
        Expression::Or(children) if children.is_empty() => Ok(match_none()),
        Expression::And(children) => Ok(json!({ "$and": compile_children(children)? })),
        Expression::Or(children) => Ok(json!({ "$or": compile_children(children)? })),
        Expression::Operator(leaf) => compile_leaf(leaf),
    }
}

fn compile_children(children: &[Expression]) -> Result<Vec<Json>, Error> {
    children.iter().map(compile_expression).collect()
}

fn compile_leaf(leaf: &OperatorExpression) -> Result<Json, Error> {
    let path = encode_path(leaf.selector())?;

    let value = match coerce(leaf.selector(), leaf.value(), leaf.value_type())? {
        CoercedValue::Text(text) => Json::String(text),
        CoercedValue::Decimal(number) => serde_json::Number::from_f64(number)
            .map(Json::Number)
            .ok_or_else(|| {
                Error::Internal(format!(
                    "decimal `{}` for selector `{}` has no JSON representation",
                    leaf.value(),
                    leaf.selector()
                ))
            })?,
        CoercedValue::Boolean(flag) => Json::Bool(flag),
    };

    let mut comparison = Map::new();
    comparison.insert(mango_operator(leaf.operator()).to_owned(), value);

    let mut field = Map::new();
    field.insert(path, Json::Object(comparison));
    Ok(Json::Object(field))
}

/// Dot-join the selector into Mango's nested-field syntax, escaping the
/// characters that syntax reserves so a literal field name `"a.b"` is never
/// read as two segments.
fn encode_path(selector: &Selector) -> Result<String, Error> {
    let mut parts = Vec::with_capacity(selector.segments().len());
    for segment in selector.segments() {
        if segment.is_empty() {
            return Err(Error::PathEncoding {
                selector: selector.to_string(),
                segment: segment.clone(),
            });
        }
        parts.push(escape_segment(segment));
    }
    Ok(parts.join("."))
}

fn escape_segment(segment: &str) -> String {
    let mut escaped = String::with_capacity(segment.len());
    for ch in segment.chars() {
        if ch == '.' || ch == '\\' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
