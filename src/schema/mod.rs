//! Structural input schemas for tools.
//!
//! A [`SchemaNode`] serializes to the JSON-Schema shape advertised in the
//! tool listing and is the only input of the [`validate`] function. Only the
//! constraint kinds the tool tables actually declare are modelled: required
//! fields, enums, numeric bounds, defaults, `oneOf` alternatives, array items
//! and their minimum count, and nested object properties.

mod validate;

pub use validate::{ValidationError, validate};

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// JSON type of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

impl SchemaType {
    /// Whether a JSON value has this type. Integral floats count as integers.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }
}

/// One node of a tool's input schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<SchemaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<SchemaNode>>,
}

impl SchemaNode {
    fn typed(kind: SchemaType) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// An object with no properties yet. Serializes `properties: {}`.
    #[must_use]
    pub fn object() -> Self {
        Self {
            properties: Some(BTreeMap::new()),
            ..Self::typed(SchemaType::Object)
        }
    }

    #[must_use]
    pub fn string() -> Self {
        Self::typed(SchemaType::String)
    }

    #[must_use]
    pub fn number() -> Self {
        Self::typed(SchemaType::Number)
    }

    #[must_use]
    pub fn integer() -> Self {
        Self::typed(SchemaType::Integer)
    }

    #[must_use]
    pub fn array(items: SchemaNode) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::typed(SchemaType::Array)
        }
    }

    /// An untyped node accepting any of the given alternatives.
    #[must_use]
    pub fn one_of(alternatives: Vec<SchemaNode>) -> Self {
        Self {
            one_of: Some(alternatives),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add an optional property.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.properties
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), node);
        self
    }

    /// Add a property and mark it required.
    #[must_use]
    pub fn required_property(self, name: impl Into<String>, node: SchemaNode) -> Self {
        let name = name.into();
        let mut out = self.property(name.clone(), node);
        if !out.required.contains(&name) {
            out.required.push(name);
        }
        out
    }

    /// Restrict values to the given literals.
    #[must_use]
    pub fn enumerate<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn min(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    #[must_use]
    pub fn max(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    #[must_use]
    pub fn range(self, minimum: f64, maximum: f64) -> Self {
        self.min(minimum).max(maximum)
    }

    #[must_use]
    pub fn min_items(mut self, count: usize) -> Self {
        self.min_items = Some(count);
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Look up a direct property.
    pub fn get_property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties.as_ref().and_then(|p| p.get(name))
    }

    /// The node as a JSON object, as carried by MCP tool listings.
    pub fn to_json_object(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_json_schema_shape() {
        let schema = SchemaNode::object()
            .required_property("prompt", SchemaNode::string().describe("What to draw"))
            .property(
                "n",
                SchemaNode::integer().range(1.0, 10.0).with_default(1),
            )
            .property("size", SchemaNode::string().enumerate(["small", "large"]));

        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "object",
                "properties": {
                    "n": { "type": "integer", "minimum": 1.0, "maximum": 10.0, "default": 1 },
                    "prompt": { "type": "string", "description": "What to draw" },
                    "size": { "type": "string", "enum": ["small", "large"] }
                },
                "required": ["prompt"]
            })
        );
    }

    #[test]
    fn test_empty_object_keeps_properties() {
        let value = serde_json::to_value(SchemaNode::object()).unwrap();
        assert_eq!(value, json!({ "type": "object", "properties": {} }));
    }

    #[test]
    fn test_one_of_serializes_camel_case() {
        let node = SchemaNode::one_of(vec![
            SchemaNode::string(),
            SchemaNode::array(SchemaNode::string()),
        ]);
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({ "oneOf": [
                { "type": "string" },
                { "type": "array", "items": { "type": "string" } }
            ]})
        );
    }

    #[test]
    fn test_min_items_serializes_camel_case() {
        let node = SchemaNode::array(SchemaNode::string()).min_items(1);
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({ "type": "array", "items": { "type": "string" }, "minItems": 1 })
        );
    }

    #[test]
    fn test_required_is_a_set() {
        let schema = SchemaNode::object()
            .required_property("a", SchemaNode::string())
            .required_property("a", SchemaNode::string());
        assert_eq!(schema.required, vec!["a".to_string()]);
    }

    #[test]
    fn test_integer_matches_integral_float() {
        assert!(SchemaType::Integer.matches(&json!(3)));
        assert!(SchemaType::Integer.matches(&json!(3.0)));
        assert!(!SchemaType::Integer.matches(&json!(3.5)));
        assert!(!SchemaType::Integer.matches(&json!("3")));
    }
}
