// crates/couch/src/search.rs

use serde_json::Value as Json;
use tracing::debug;

use filter::{expression_from_json, Expression, OperatorExpression};

use crate::compile::compile;
use crate::field::{CouchDbField, DbField, ObjectType};
use crate::Error;

/// Guard leaf restricting a query to documents of one stored object type.
fn type_guard(object_type: ObjectType) -> Expression {
    Expression::from(OperatorExpression::equal(
        CouchDbField::Type.selector(),
        object_type.as_str(),
    ))
}

/// Build the CouchDB selector for a search request.
///
/// With no expression, or a blank one, the selector matches every document of
/// `object_type`. Otherwise the caller expression is decoded from its wire
/// JSON form and And-combined with the type guard, so a search can never
/// escape its object type.
pub fn build_search_selector(
    expression: Option<&str>,
    object_type: ObjectType,
) -> Result<Json, Error> {
    let guard = type_guard(object_type);

    let combined = match expression {
        Some(raw) if !raw.trim().is_empty() => {
            let parsed = expression_from_json(raw).map_err(|error| {
                debug!(%error, "rejecting invalid filter expression");
                error
            })?;
            Expression::and(vec![guard, parsed])
        }
        _ => guard,
    };

    compile(&combined)
}
