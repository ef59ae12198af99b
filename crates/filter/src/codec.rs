// crates/filter/src/codec.rs
//
// Wire format of a filter expression, discriminated by the `type` field:
//
//   { "type": "AND",      "expressions": [ ... ] }
//   { "type": "OR",       "expressions": [ ... ] }
//   { "type": "Operator", "selector": [ ... ], "operatorType": "...",
//     "value": "...", "valueType": "..." }
//
// Decoding is strict: unknown fields for the resolved variant fail loudly,
// naming the field. Encoding emits fields in the order shown above.

use serde::de;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as Json};

use crate::ast::{Expression, OperatorExpression, Selector};
use crate::Error;

/// Convert an expression tree to its wire JSON string.
pub fn expression_to_json(expression: &Expression) -> Result<String, Error> {
    serde_json::to_string(expression).map_err(Error::Json)
}

/// Parse a wire JSON string into an expression tree.
pub fn expression_from_json(raw: &str) -> Result<Expression, Error> {
    let value: Json = serde_json::from_str(raw)?;
    decode(&value)
}

/// Decode an already-parsed JSON value into an expression tree.
pub fn decode(value: &Json) -> Result<Expression, Error> {
    let fields = value.as_object().ok_or(Error::ExpectedObject)?;

    let kind = match fields.get("type") {
        Some(Json::String(kind)) => kind.as_str(),
        Some(_) => {
            return Err(Error::InvalidExpression(
                "`type` discriminator must be a string".into(),
            ))
        }
        None => return Err(Error::MissingType),
    };

    match kind {
        "AND" => Ok(Expression::And(decode_combinator(fields, "AND")?)),
        "OR" => Ok(Expression::Or(decode_combinator(fields, "OR")?)),
        "Operator" => decode_operator(fields),
        other => Err(Error::UnknownType(other.to_owned())),
    }
}

fn require<'a>(
    fields: &'a Map<String, Json>,
    variant: &'static str,
    field: &'static str,
) -> Result<&'a Json, Error> {
    fields.get(field).ok_or(Error::MissingField { variant, field })
}

fn reject_unknown_fields(
    fields: &Map<String, Json>,
    variant: &'static str,
    known: &[&str],
) -> Result<(), Error> {
    for field in fields.keys() {
        if !known.contains(&field.as_str()) {
            return Err(Error::UnrecognizedField {
                variant,
                field: field.clone(),
            });
        }
    }
    Ok(())
}

/// AND and OR share one shape: a `type` tag plus an `expressions` array.
fn decode_combinator(
    fields: &Map<String, Json>,
    variant: &'static str,
) -> Result<Vec<Expression>, Error> {
    reject_unknown_fields(fields, variant, &["type", "expressions"])?;

    let children = require(fields, variant, "expressions")?
        .as_array()
        .ok_or_else(|| {
            Error::InvalidExpression(format!("`expressions` must be an array in `{variant}`"))
        })?;

    children.iter().map(decode).collect()
}

fn decode_operator(fields: &Map<String, Json>) -> Result<Expression, Error> {
    const VARIANT: &str = "Operator";
    reject_unknown_fields(
        fields,
        VARIANT,
        &["type", "selector", "operatorType", "value", "valueType"],
    )?;

    let segments = require(fields, VARIANT, "selector")?
        .as_array()
        .ok_or_else(|| Error::InvalidExpression("`selector` must be an array of strings".into()))?
        .iter()
        .map(|segment| {
            segment.as_str().map(str::to_owned).ok_or_else(|| {
                Error::InvalidExpression("`selector` must be an array of strings".into())
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let selector = Selector::new(segments)?;

    let operator = require(fields, VARIANT, "operatorType")?
        .as_str()
        .ok_or_else(|| Error::InvalidExpression("`operatorType` must be a string".into()))?
        .parse()?;

    let value = require(fields, VARIANT, "value")?
        .as_str()
        .ok_or_else(|| Error::InvalidExpression("`value` must be a string".into()))?;

    let value_type = require(fields, VARIANT, "valueType")?
        .as_str()
        .ok_or_else(|| Error::InvalidExpression("`valueType` must be a string".into()))?
        .parse()?;

    Ok(Expression::Operator(OperatorExpression::new(
        selector, operator, value, value_type,
    )?))
}

impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Expression::And(children) => {
                let mut state = serializer.serialize_struct("Expression", 2)?;
                state.serialize_field("type", "AND")?;
                state.serialize_field("expressions", children)?;
                state.end()
            }
            Expression::Or(children) => {
                let mut state = serializer.serialize_struct("Expression", 2)?;
                state.serialize_field("type", "OR")?;
                state.serialize_field("expressions", children)?;
                state.end()
            }
            Expression::Operator(leaf) => {
                let mut state = serializer.serialize_struct("Expression", 5)?;
                state.serialize_field("type", "Operator")?;
                state.serialize_field("selector", leaf.selector().segments())?;
                state.serialize_field("operatorType", leaf.operator().as_str())?;
                state.serialize_field("value", leaf.value())?;
                state.serialize_field("valueType", leaf.value_type().as_str())?;
                state.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Expression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Json::deserialize(deserializer)?;
        decode(&value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Operator, ValueType};
    use serde_json::json;

    fn canonical_tree() -> Expression {
        Expression::and(vec![Expression::from(OperatorExpression::equal_decimal(
            Selector::field("document"),
            123.45,
        ))])
    }

    const CANONICAL_WIRE: &str = concat!(
        r#"{"type":"AND","expressions":[{"type":"Operator","selector":["document"],"#,
        r#""operatorType":"Equal","value":"123.45","valueType":"Decimal"}]}"#,
    );

    // ─────────────────────────────────────────────────────────────
    // Encoding
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn encoding_emits_fields_in_stable_order() {
        let encoded = expression_to_json(&canonical_tree()).expect("encode");
        assert_eq!(encoded, CANONICAL_WIRE);
    }

    #[test]
    fn or_encodes_with_its_own_tag() {
        let tree = Expression::or(vec![]);
        let encoded = expression_to_json(&tree).expect("encode");
        assert_eq!(encoded, r#"{"type":"OR","expressions":[]}"#);
    }

    // ─────────────────────────────────────────────────────────────
    // Decoding – happy path
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn canonical_wire_decodes_to_expected_tree() {
        let decoded = expression_from_json(CANONICAL_WIRE).expect("decode");

        match &decoded {
            Expression::And(children) => {
                assert_eq!(children.len(), 1);
                match &children[0] {
                    Expression::Operator(leaf) => {
                        assert_eq!(leaf.selector().segments(), ["document"]);
                        assert_eq!(leaf.operator(), Operator::Equal);
                        assert_eq!(leaf.value(), "123.45");
                        assert_eq!(leaf.value_type(), ValueType::Decimal);
                    }
                    other => panic!("expected Operator child, got: {other:?}"),
                }
            }
            other => panic!("expected top-level And, got: {other:?}"),
        }

        // Re-encoding reproduces the input byte for byte.
        assert_eq!(expression_to_json(&decoded).expect("encode"), CANONICAL_WIRE);
    }

    #[test]
    fn nested_selector_round_trips() {
        let wire = json!({
            "type": "Operator",
            "selector": ["document", "version"],
            "operatorType": "Equal",
            "value": "123.45",
            "valueType": "Decimal"
        });

        let decoded = decode(&wire).expect("decode");
        match &decoded {
            Expression::Operator(leaf) => {
                assert_eq!(leaf.selector().segments(), ["document", "version"]);
            }
            other => panic!("expected Operator, got: {other:?}"),
        }
    }

    #[test]
    fn deep_mixed_tree_round_trips() {
        let tree = Expression::and(vec![
            Expression::from(OperatorExpression::equal(
                Selector::field("type"),
                "Advisory",
            )),
            Expression::or(vec![
                Expression::from(OperatorExpression::decimal(
                    Selector::new(["csaf", "document", "tracking", "version"]).expect("selector"),
                    Operator::GreaterOrEqual,
                    2.0,
                )),
                Expression::and(vec![
                    Expression::from(OperatorExpression::boolean(
                        Selector::field("final"),
                        Operator::NotEqual,
                        false,
                    )),
                    Expression::from(OperatorExpression::text(
                        Selector::new(["csaf", "document", "title"]).expect("selector"),
                        Operator::Less,
                        "zzz",
                    )),
                ]),
            ]),
            Expression::and(vec![]),
        ]);

        let encoded = expression_to_json(&tree).expect("encode");
        let decoded = expression_from_json(&encoded).expect("decode");
        assert_eq!(decoded, tree);
    }

    #[test]
    fn serde_entry_points_agree_with_codec() {
        let via_serde: Expression = serde_json::from_str(CANONICAL_WIRE).expect("deserialize");
        assert_eq!(via_serde, canonical_tree());
        assert_eq!(
            serde_json::to_string(&via_serde).expect("serialize"),
            CANONICAL_WIRE
        );
    }

    // ─────────────────────────────────────────────────────────────
    // Decoding – strictness
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn unrecognized_field_in_combinator_fails_naming_it() {
        let wire = json!({
            "type": "AND",
            "expressi": []
        });

        let err = decode(&wire).unwrap_err();
        match err {
            Error::UnrecognizedField { variant, field } => {
                assert_eq!(variant, "AND");
                assert_eq!(field, "expressi");
            }
            other => panic!("expected UnrecognizedField, got: {other:?}"),
        }
    }

    #[test]
    fn unrecognized_field_in_operator_fails_naming_it() {
        let wire = json!({
            "type": "Operator",
            "pathInJson": ["document"],
            "selector": ["document"],
            "operatorType": "Equal",
            "value": "1",
            "valueType": "Decimal"
        });

        let err = decode(&wire).unwrap_err();
        match err {
            Error::UnrecognizedField { variant, field } => {
                assert_eq!(variant, "Operator");
                assert_eq!(field, "pathInJson");
            }
            other => panic!("expected UnrecognizedField, got: {other:?}"),
        }
    }

    #[test]
    fn missing_required_field_fails_naming_it() {
        let wire = json!({
            "type": "Operator",
            "operatorType": "Equal",
            "value": "1",
            "valueType": "Decimal"
        });

        let err = decode(&wire).unwrap_err();
        match err {
            Error::MissingField { variant, field } => {
                assert_eq!(variant, "Operator");
                assert_eq!(field, "selector");
            }
            other => panic!("expected MissingField, got: {other:?}"),
        }
    }

    #[test]
    fn missing_discriminator_fails() {
        let err = decode(&json!({ "expressions": [] })).unwrap_err();
        matches!(err, Error::MissingType);
    }

    #[test]
    fn unknown_discriminator_fails() {
        let err = decode(&json!({ "type": "XOR", "expressions": [] })).unwrap_err();
        match err {
            Error::UnknownType(name) => assert_eq!(name, "XOR"),
            other => panic!("expected UnknownType, got: {other:?}"),
        }
    }

    #[test]
    fn non_object_expression_fails() {
        assert!(matches!(
            decode(&json!(["AND"])).unwrap_err(),
            Error::ExpectedObject
        ));
        assert!(matches!(
            expression_from_json("not json at all").unwrap_err(),
            Error::Json(_)
        ));
    }

    #[test]
    fn unknown_operator_and_value_type_names_fail() {
        let bad_operator = json!({
            "type": "Operator",
            "selector": ["document"],
            "operatorType": "Matches",
            "value": "1",
            "valueType": "Decimal"
        });
        matches!(decode(&bad_operator).unwrap_err(), Error::UnknownOperator(_));

        let bad_value_type = json!({
            "type": "Operator",
            "selector": ["document"],
            "operatorType": "Equal",
            "value": "1",
            "valueType": "Number"
        });
        matches!(
            decode(&bad_value_type).unwrap_err(),
            Error::UnknownValueType(_)
        );
    }

    #[test]
    fn value_type_disagreement_fails_at_decode_time() {
        let wire = json!({
            "type": "Operator",
            "selector": ["csaf", "document", "final"],
            "operatorType": "Equal",
            "value": "yes",
            "valueType": "Boolean"
        });

        let err = decode(&wire).unwrap_err();
        match err {
            Error::ValueMismatch { selector, value, .. } => {
                assert_eq!(selector, "csaf.document.final");
                assert_eq!(value, "yes");
            }
            other => panic!("expected ValueMismatch, got: {other:?}"),
        }
    }

    #[test]
    fn empty_selector_fails_at_decode_time() {
        let wire = json!({
            "type": "Operator",
            "selector": [],
            "operatorType": "Equal",
            "value": "1",
            "valueType": "Decimal"
        });

        matches!(decode(&wire).unwrap_err(), Error::EmptySelector);
    }

    #[test]
    fn selector_segments_must_be_strings() {
        let wire = json!({
            "type": "Operator",
            "selector": ["document", 1],
            "operatorType": "Equal",
            "value": "1",
            "valueType": "Decimal"
        });

        matches!(decode(&wire).unwrap_err(), Error::InvalidExpression(_));
    }

    #[test]
    fn strictness_applies_to_nested_expressions() {
        let wire = json!({
            "type": "AND",
            "expressions": [
                {
                    "type": "OR",
                    "expressions": [
                        { "type": "Operator", "selector": ["a"], "operatorType": "Equal",
                          "value": "1", "valueType": "Decimal", "extra": true }
                    ]
                }
            ]
        });

        let err = decode(&wire).unwrap_err();
        match err {
            Error::UnrecognizedField { variant, field } => {
                assert_eq!(variant, "Operator");
                assert_eq!(field, "extra");
            }
            other => panic!("expected UnrecognizedField, got: {other:?}"),
        }
    }
}
