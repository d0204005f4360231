//! String schemas: `enum`, whitelisted `format`, length and pattern

use serde_json::{Map as JsonMap, Value as JsonValue};

use super::{HandlerError, SchemaHandler, copy_keywords, declared_type, default_type};
use crate::schema::SchemaConverter;

/// JSON Schema formats plus the common OpenAPI additions. Anything else is dropped.
pub const KNOWN_STRING_FORMATS: &[&str] = &[
    "date",
    "date-time",
    "time",
    "duration",
    "email",
    "idn-email",
    "hostname",
    "idn-hostname",
    "ipv4",
    "ipv6",
    "uri",
    "uri-reference",
    "iri",
    "iri-reference",
    "uuid",
    "json-pointer",
    "relative-json-pointer",
    "regex",
    "byte",
    "binary",
    "password",
];

pub struct StringSchemaHandler;

impl SchemaHandler for StringSchemaHandler {
    fn name(&self) -> &'static str {
        "StringSchemaHandler"
    }

    fn can_handle(&self, schema: &JsonMap<String, JsonValue>) -> bool {
        declared_type(schema) == Some("string")
    }

    fn handle(
        &self,
        _converter: &SchemaConverter<'_>,
        openapi_schema: &JsonMap<String, JsonValue>,
        json_schema: &mut JsonMap<String, JsonValue>,
    ) -> Result<(), HandlerError> {
        default_type(json_schema, JsonValue::from("string"));

        copy_keywords(&["enum"], openapi_schema, json_schema);

        if let Some(format) = openapi_schema.get("format").and_then(JsonValue::as_str) {
            if KNOWN_STRING_FORMATS.contains(&format) {
                json_schema.insert("format".to_string(), JsonValue::from(format));
            }
        }

        copy_keywords(
            &["pattern", "minLength", "maxLength"],
            openapi_schema,
            json_schema,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::convert_schema;
    use serde_json::{Value as JsonValue, json};

    #[test]
    fn test_string_enum_and_constraints() {
        let spec = json!({});
        let result = convert_schema(
            &json!({
                "type": "string",
                "enum": ["active", "inactive", "pending"],
                "pattern": "^[a-z]+$",
                "minLength": 1,
                "maxLength": 16
            }),
            &spec,
        );
        assert_eq!(
            JsonValue::Object(result),
            json!({
                "type": "string",
                "enum": ["active", "inactive", "pending"],
                "pattern": "^[a-z]+$",
                "minLength": 1,
                "maxLength": 16
            })
        );
    }

    #[test]
    fn test_known_formats_are_kept() {
        let spec = json!({});
        for format in ["date-time", "uuid", "binary", "password", "ipv6"] {
            let result = convert_schema(&json!({"type": "string", "format": format}), &spec);
            assert_eq!(result["format"], json!(format));
        }
    }

    #[test]
    fn test_unknown_formats_are_dropped() {
        let spec = json!({});
        for format in [json!("phone-number"), json!("int64"), json!(7)] {
            let result = convert_schema(&json!({"type": "string", "format": format}), &spec);
            assert!(!result.contains_key("format"));
        }
    }
}
