//! Array schemas: `items` plus size constraints

use serde_json::{Map as JsonMap, Value as JsonValue};

use super::{HandlerError, SchemaHandler, copy_keywords, declared_type, default_type};
use crate::schema::SchemaConverter;

pub struct ArraySchemaHandler;

impl SchemaHandler for ArraySchemaHandler {
    fn name(&self) -> &'static str {
        "ArraySchemaHandler"
    }

    fn can_handle(&self, schema: &JsonMap<String, JsonValue>) -> bool {
        declared_type(schema) == Some("array") || schema.contains_key("items")
    }

    fn handle(
        &self,
        converter: &SchemaConverter<'_>,
        openapi_schema: &JsonMap<String, JsonValue>,
        json_schema: &mut JsonMap<String, JsonValue>,
    ) -> Result<(), HandlerError> {
        default_type(json_schema, JsonValue::from("array"));

        let items = match openapi_schema.get("items") {
            Some(items) => converter.convert(items),
            None => JsonMap::new(),
        };
        json_schema.insert("items".to_string(), JsonValue::Object(items));

        copy_keywords(
            &["minItems", "maxItems", "uniqueItems"],
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
    fn test_array_without_items_gets_empty_items() {
        let spec = json!({});
        let result = convert_schema(&json!({"type": "array"}), &spec);
        assert_eq!(JsonValue::Object(result), json!({"type": "array", "items": {}}));
    }

    #[test]
    fn test_array_constraints_copied() {
        let spec = json!({});
        let result = convert_schema(
            &json!({
                "type": "array",
                "items": {"type": "string", "format": "uuid"},
                "minItems": 1,
                "maxItems": 10,
                "uniqueItems": true
            }),
            &spec,
        );
        assert_eq!(
            JsonValue::Object(result),
            json!({
                "type": "array",
                "items": {"type": "string", "format": "uuid"},
                "minItems": 1,
                "maxItems": 10,
                "uniqueItems": true
            })
        );
    }

    #[test]
    fn test_nested_arrays() {
        let spec = json!({});
        let result = convert_schema(&json!({"items": {"items": {"type": "number"}}}), &spec);
        assert_eq!(
            JsonValue::Object(result),
            json!({"type": "array", "items": {"type": "array", "items": {"type": "number"}}})
        );
    }
}
