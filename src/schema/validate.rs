//! Declarative argument validation against a [`SchemaNode`].

use serde_json::{Map, Number, Value};

use super::{SchemaNode, SchemaType};

/// A violated schema constraint. `field` is a path such as `messages[1].role`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("field '{field}' must be one of [{allowed}], got {actual}")]
    NotInEnum {
        field: String,
        allowed: String,
        actual: String,
    },

    #[error("field '{field}' must be >= {minimum}, got {actual}")]
    BelowMinimum {
        field: String,
        minimum: f64,
        actual: f64,
    },

    #[error("field '{field}' must be <= {maximum}, got {actual}")]
    AboveMaximum {
        field: String,
        maximum: f64,
        actual: f64,
    },

    #[error("field '{field}' does not match any accepted form")]
    NoMatchingAlternative { field: String },

    #[error("field '{field}' must have at least {minimum} item(s), got {actual}")]
    TooFewItems {
        field: String,
        minimum: usize,
        actual: usize,
    },

    #[error("field '{field}' must be an integer, got {actual}")]
    NotAnInteger { field: String, actual: f64 },
}

/// Check `arguments` against `schema` and return the effective arguments.
///
/// The returned map is a copy of `arguments` with declared defaults filled
/// in for absent fields; `arguments` itself is never modified. Only required
/// fields, enum membership, numeric bounds, array lengths, integer-ness of numbers and
/// `oneOf` alternatives are checked. Integral floats sent for integer fields
/// (`2.0`) become integers in the copy. Values are otherwise accepted as sent.
pub fn validate(
    schema: &SchemaNode,
    arguments: &Map<String, Value>,
) -> Result<Map<String, Value>, ValidationError> {
    let mut effective = arguments.clone();
    check_object(schema, &mut effective, "")?;
    Ok(effective)
}

fn check_object(
    schema: &SchemaNode,
    object: &mut Map<String, Value>,
    path: &str,
) -> Result<(), ValidationError> {
    if let Some(properties) = &schema.properties {
        for (name, node) in properties {
            if is_absent(object.get(name)) {
                if let Some(default) = &node.default {
                    object.insert(name.clone(), default.clone());
                }
            }
        }
    }

    for name in &schema.required {
        if is_absent(object.get(name)) {
            return Err(ValidationError::MissingField {
                field: join(path, name),
            });
        }
    }

    if let Some(properties) = &schema.properties {
        for (name, node) in properties {
            if let Some(value) = object.get_mut(name) {
                if !value.is_null() {
                    check_value(node, value, &join(path, name))?;
                }
            }
        }
    }

    Ok(())
}

fn check_value(schema: &SchemaNode, value: &mut Value, path: &str) -> Result<(), ValidationError> {
    if let Some(alternatives) = &schema.one_of {
        let accepted = alternatives.iter().find_map(|alt| {
            if alt.kind.is_some_and(|kind| !kind.matches(value)) {
                return None;
            }
            let mut candidate = value.clone();
            check_value(alt, &mut candidate, path).ok().map(|()| candidate)
        });
        match accepted {
            Some(candidate) => *value = candidate,
            None => {
                return Err(ValidationError::NoMatchingAlternative {
                    field: path.to_string(),
                });
            }
        }
    }

    if schema.kind == Some(SchemaType::Integer) {
        normalize_integer(value, path)?;
    }

    if let Some(allowed) = &schema.enum_values {
        if !allowed.contains(value) {
            return Err(ValidationError::NotInEnum {
                field: path.to_string(),
                allowed: allowed
                    .iter()
                    .map(Value::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
                actual: value.to_string(),
            });
        }
    }

    if let Some(actual) = value.as_f64() {
        if let Some(minimum) = schema.minimum {
            if actual < minimum {
                return Err(ValidationError::BelowMinimum {
                    field: path.to_string(),
                    minimum,
                    actual,
                });
            }
        }
        if let Some(maximum) = schema.maximum {
            if actual > maximum {
                return Err(ValidationError::AboveMaximum {
                    field: path.to_string(),
                    maximum,
                    actual,
                });
            }
        }
    }

    match value {
        Value::Array(elements) => {
            if let Some(minimum) = schema.min_items {
                if elements.len() < minimum {
                    return Err(ValidationError::TooFewItems {
                        field: path.to_string(),
                        minimum,
                        actual: elements.len(),
                    });
                }
            }
            if let Some(items) = &schema.items {
                for (i, element) in elements.iter_mut().enumerate() {
                    if !element.is_null() {
                        check_value(items, element, &format!("{path}[{i}]"))?;
                    }
                }
            }
        }
        Value::Object(object) => {
            if schema.properties.is_some() || !schema.required.is_empty() {
                check_object(schema, object, path)?;
            }
        }
        _ => {}
    }

    Ok(())
}

/// Rewrite `2.0` as `2`. Non-numbers are left for the adapter to reject.
fn normalize_integer(value: &mut Value, path: &str) -> Result<(), ValidationError> {
    let Value::Number(number) = value else {
        return Ok(());
    };
    if number.is_i64() || number.is_u64() {
        return Ok(());
    }
    let actual = number.as_f64().unwrap_or(f64::NAN);
    if actual.fract() != 0.0 || actual.abs() > 9_007_199_254_740_992.0 {
        return Err(ValidationError::NotAnInteger {
            field: path.to_string(),
            actual,
        });
    }
    #[allow(clippy::cast_possible_truncation)]
    let integral = actual as i64;
    *value = Value::Number(Number::from(integral));
    Ok(())
}

fn is_absent(value: Option<&Value>) -> bool {
    value.is_none_or(Value::is_null)
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn image_schema() -> SchemaNode {
        SchemaNode::object()
            .required_property("prompt", SchemaNode::string())
            .property(
                "size",
                SchemaNode::string()
                    .enumerate(["256x256", "1024x1024"])
                    .with_default("1024x1024"),
            )
            .property("n", SchemaNode::integer().range(1.0, 10.0).with_default(1))
            .property("temperature", SchemaNode::number().range(0.0, 2.0))
    }

    #[test]
    fn test_fills_defaults_without_touching_input() {
        let input = args(json!({ "prompt": "a cat" }));
        let effective = validate(&image_schema(), &input).unwrap();

        assert_eq!(effective["size"], json!("1024x1024"));
        assert_eq!(effective["n"], json!(1));
        assert!(!effective.contains_key("temperature"));
        assert_eq!(input, args(json!({ "prompt": "a cat" })));
    }

    #[test]
    fn test_missing_required_field() {
        let err = validate(&image_schema(), &args(json!({ "n": 2 }))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "prompt".to_string()
            }
        );
    }

    #[test]
    fn test_null_counts_as_absent() {
        let err = validate(&image_schema(), &args(json!({ "prompt": null }))).unwrap_err();
        assert!(matches!(err, ValidationError::MissingField { .. }));
    }

    #[test]
    fn test_enum_violation() {
        let err = validate(
            &image_schema(),
            &args(json!({ "prompt": "x", "size": "999x999" })),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "field 'size' must be one of [\"256x256\", \"1024x1024\"], got \"999x999\""
        );
    }

    #[test]
    fn test_numeric_bounds() {
        let low = validate(&image_schema(), &args(json!({ "prompt": "x", "n": 0 }))).unwrap_err();
        assert!(matches!(low, ValidationError::BelowMinimum { .. }));

        let high = validate(
            &image_schema(),
            &args(json!({ "prompt": "x", "temperature": 2.5 })),
        )
        .unwrap_err();
        assert!(matches!(high, ValidationError::AboveMaximum { .. }));

        assert!(validate(&image_schema(), &args(json!({ "prompt": "x", "temperature": 2 }))).is_ok());
    }

    #[test]
    fn test_nested_array_items_are_checked() {
        let schema = SchemaNode::object().required_property(
            "messages",
            SchemaNode::array(
                SchemaNode::object()
                    .required_property("role", SchemaNode::string().enumerate(["user", "model"]))
                    .required_property("content", SchemaNode::string()),
            ),
        );

        let ok = args(json!({ "messages": [{ "role": "user", "content": "hi" }] }));
        assert!(validate(&schema, &ok).is_ok());

        let bad_role = args(json!({ "messages": [
            { "role": "user", "content": "hi" },
            { "role": "assistant", "content": "hello" }
        ]}));
        let err = validate(&schema, &bad_role).unwrap_err();
        assert!(matches!(err, ValidationError::NotInEnum { ref field, .. } if field == "messages[1].role"));

        let missing = args(json!({ "messages": [{ "role": "user" }] }));
        let err = validate(&schema, &missing).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "messages[0].content".to_string()
            }
        );
    }

    #[test]
    fn test_one_of_alternatives() {
        let schema = SchemaNode::object().required_property(
            "input",
            SchemaNode::one_of(vec![
                SchemaNode::string(),
                SchemaNode::array(SchemaNode::string()),
            ]),
        );

        assert!(validate(&schema, &args(json!({ "input": "a" }))).is_ok());
        assert!(validate(&schema, &args(json!({ "input": ["a", "b"] }))).is_ok());

        let err = validate(&schema, &args(json!({ "input": 42 }))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NoMatchingAlternative {
                field: "input".to_string()
            }
        );
    }

    #[test]
    fn test_integral_float_becomes_integer() {
        let effective = validate(&image_schema(), &args(json!({ "prompt": "x", "n": 2.0 }))).unwrap();
        assert_eq!(effective["n"], json!(2));
        assert!(effective["n"].is_u64());

        let err = validate(&image_schema(), &args(json!({ "prompt": "x", "n": 2.5 }))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotAnInteger {
                field: "n".to_string(),
                actual: 2.5
            }
        );
        assert_eq!(err.to_string(), "field 'n' must be an integer, got 2.5");
    }

    #[test]
    fn test_integer_bounds_apply_after_normalizing() {
        let err = validate(&image_schema(), &args(json!({ "prompt": "x", "n": 11.0 }))).unwrap_err();
        assert!(matches!(err, ValidationError::AboveMaximum { .. }));
    }

    #[test]
    fn test_min_items() {
        let schema = SchemaNode::object()
            .required_property("tags", SchemaNode::array(SchemaNode::string()).min_items(1));

        assert!(validate(&schema, &args(json!({ "tags": ["a"] }))).is_ok());
        let err = validate(&schema, &args(json!({ "tags": [] }))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooFewItems {
                field: "tags".to_string(),
                minimum: 1,
                actual: 0
            }
        );
    }

    #[test]
    fn test_free_form_values_pass_through() {
        let schema = SchemaNode::object().property("prompt", SchemaNode::string());
        let input = args(json!({ "prompt": 7, "extra": { "anything": true } }));
        assert_eq!(validate(&schema, &input).unwrap(), input);
    }
}
