/// Tool Input Schemas
///
/// A small declarative description of a tool's arguments. The same
/// description is rendered as the JSON Schema advertised by `tools/list`
/// and used to validate the raw arguments of `tools/call` before a handler
/// ever sees them.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::core::error::ToolError;

/// Type and constraints of a single argument.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// A string, optionally of an exact character length.
    String { exact_len: Option<usize> },
    /// A JSON number, optionally bounded (inclusive).
    Number { min: Option<f64>, max: Option<f64> },
    /// A string restricted to a fixed set of values.
    Enum(&'static [&'static str]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: FieldKind,
}

/// Shape of a tool's `arguments` object. Every declared field is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    properties: Vec<Property>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        self.properties.push(Property { name, description, kind });
        self
    }

    /// Render as the JSON Schema object advertised in `inputSchema`.
    pub fn to_json(&self) -> Value {
        let mut properties = Map::new();
        for prop in &self.properties {
            let mut field = Map::new();
            match &prop.kind {
                FieldKind::String { .. } => {
                    field.insert("type".into(), "string".into());
                }
                FieldKind::Number { .. } => {
                    field.insert("type".into(), "number".into());
                }
                FieldKind::Enum(variants) => {
                    field.insert("type".into(), "string".into());
                    field.insert("enum".into(), Value::from(variants.to_vec()));
                }
            }
            field.insert("description".into(), prop.description.into());
            properties.insert(prop.name.to_string(), Value::Object(field));
        }

        let required: Vec<&str> = self.properties.iter().map(|p| p.name).collect();

        let mut schema = Map::new();
        schema.insert("type".into(), "object".into());
        schema.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".into(), Value::from(required));
        }
        Value::Object(schema)
    }

    /// Check `args` against this schema.
    ///
    /// Returns only the declared properties; anything else the caller sent is
    /// dropped rather than rejected.
    pub fn validate(&self, args: &Value) -> Result<Map<String, Value>, ToolError> {
        let object = args.as_object().ok_or_else(|| {
            ToolError::validation(format!("expected object, got {}", value_type_name(args)))
        })?;

        let mut parsed = Map::new();
        for prop in &self.properties {
            match object.get(prop.name) {
                None | Some(Value::Null) => {
                    return Err(ToolError::validation(format!("{}: required", prop.name)));
                }
                Some(value) => {
                    prop.kind
                        .check(value)
                        .map_err(|msg| ToolError::validation(format!("{}: {}", prop.name, msg)))?;
                    parsed.insert(prop.name.to_string(), value.clone());
                }
            }
        }
        Ok(parsed)
    }
}

impl FieldKind {
    fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            FieldKind::String { exact_len } => {
                let s = value
                    .as_str()
                    .ok_or_else(|| format!("expected string, got {}", value_type_name(value)))?;
                match exact_len {
                    Some(len) if s.chars().count() != *len => {
                        Err(format!("must be exactly {} characters", len))
                    }
                    _ => Ok(()),
                }
            }
            FieldKind::Number { min, max } => {
                let n = value
                    .as_f64()
                    .ok_or_else(|| format!("expected number, got {}", value_type_name(value)))?;
                if let Some(min) = min {
                    if n < *min {
                        return Err(format!("must be at least {}", min));
                    }
                }
                if let Some(max) = max {
                    if n > *max {
                        return Err(format!("must be at most {}", max));
                    }
                }
                Ok(())
            }
            FieldKind::Enum(variants) => {
                let s = value
                    .as_str()
                    .ok_or_else(|| format!("expected string, got {}", value_type_name(value)))?;
                if variants.contains(&s) {
                    Ok(())
                } else {
                    Err(format!(
                        "invalid value '{}', expected one of: {}",
                        s,
                        variants.join(", ")
                    ))
                }
            }
        }
    }
}

/// Validate `args` against `schema`, then deserialize into the handler's typed arguments.
pub fn parse_args<T: DeserializeOwned>(schema: &ObjectSchema, args: &Value) -> Result<T, ToolError> {
    let parsed = schema.validate(args)?;
    serde_json::from_value(Value::Object(parsed)).map_err(|e| ToolError::validation(e.to_string()))
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;

    fn coords() -> ObjectSchema {
        ObjectSchema::new()
            .required("lat", FieldKind::Number { min: Some(-90.0), max: Some(90.0) }, "Latitude")
    }

    #[test]
    fn renders_json_schema() {
        let schema = ObjectSchema::new()
            .required("op", FieldKind::Enum(&["add", "sub"]), "Operation")
            .required("code", FieldKind::String { exact_len: Some(2) }, "Code");

        assert_eq!(
            schema.to_json(),
            json!({
                "type": "object",
                "properties": {
                    "op": { "type": "string", "enum": ["add", "sub"], "description": "Operation" },
                    "code": { "type": "string", "description": "Code" }
                },
                "required": ["op", "code"]
            })
        );
    }

    #[test]
    fn empty_schema_has_no_required_list() {
        assert_eq!(ObjectSchema::new().to_json(), json!({ "type": "object", "properties": {} }));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let err = coords().validate(&json!({})).unwrap_err();
        assert_eq!(err, ToolError::validation("lat: required"));
    }

    #[test]
    fn null_counts_as_missing() {
        let err = coords().validate(&json!({ "lat": null })).unwrap_err();
        assert_eq!(err, ToolError::validation("lat: required"));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let err = coords().validate(&json!({ "lat": "north" })).unwrap_err();
        assert_eq!(err, ToolError::validation("lat: expected number, got string"));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(coords().validate(&json!({ "lat": 90 })).is_ok());
        assert!(coords().validate(&json!({ "lat": -90.0 })).is_ok());
        let err = coords().validate(&json!({ "lat": 90.5 })).unwrap_err();
        assert_eq!(err, ToolError::validation("lat: must be at most 90"));
    }

    #[test]
    fn exact_length_counts_characters() {
        let schema = ObjectSchema::new().required("s", FieldKind::String { exact_len: Some(2) }, "");
        assert!(schema.validate(&json!({ "s": "ca" })).is_ok());
        assert!(schema.validate(&json!({ "s": "éa" })).is_ok());
        let err = schema.validate(&json!({ "s": "CAL" })).unwrap_err();
        assert_eq!(err, ToolError::validation("s: must be exactly 2 characters"));
    }

    #[test]
    fn non_object_arguments_are_rejected() {
        let err = coords().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(err, ToolError::validation("expected object, got array"));
    }

    #[test]
    fn unknown_fields_are_dropped() {
        let parsed = coords().validate(&json!({ "lat": 1, "extra": true })).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed.contains_key("lat"));
    }

    #[test]
    fn parse_args_yields_typed_struct() {
        #[derive(Deserialize)]
        struct Args {
            lat: f64,
            name: String,
        }

        let schema = coords().required("name", FieldKind::String { exact_len: None }, "Name");
        let args: Args = parse_args(&schema, &json!({ "lat": 12.5, "name": "Key West" })).unwrap();
        assert_eq!(args.lat, 12.5);
        assert_eq!(args.name, "Key West");
    }

    #[test]
    fn every_declared_field_is_listed_as_required() {
        let schema = coords().required("name", FieldKind::String { exact_len: None }, "Name");
        assert_eq!(schema.to_json()["required"], json!(["lat", "name"]));
        let err = schema.validate(&json!({ "lat": 1 })).unwrap_err();
        assert_eq!(err, ToolError::validation("name: required"));
    }
}
