//! Integer and number schemas.
//!
//! `exclusiveMinimum` / `exclusiveMaximum` come in two flavours: the OpenAPI
//! 3.0 boolean flag that qualifies `minimum` / `maximum`, and the JSON Schema
//! (and OpenAPI 3.1) numeric bound. Both end up as the numeric form.

use serde_json::{Map as JsonMap, Value as JsonValue};

use super::{HandlerError, SchemaHandler, copy_keywords, declared_type, default_type};
use crate::schema::SchemaConverter;

pub struct NumberSchemaHandler;

impl SchemaHandler for NumberSchemaHandler {
    fn name(&self) -> &'static str {
        "NumberSchemaHandler"
    }

    fn can_handle(&self, schema: &JsonMap<String, JsonValue>) -> bool {
        matches!(declared_type(schema), Some("integer" | "number"))
    }

    fn handle(
        &self,
        _converter: &SchemaConverter<'_>,
        openapi_schema: &JsonMap<String, JsonValue>,
        json_schema: &mut JsonMap<String, JsonValue>,
    ) -> Result<(), HandlerError> {
        if let Some(schema_type) = openapi_schema.get("type") {
            default_type(json_schema, schema_type.clone());
        }

        copy_keywords(
            &["format", "minimum", "maximum", "multipleOf"],
            openapi_schema,
            json_schema,
        );

        exclusive_bound(openapi_schema, json_schema, "exclusiveMinimum", "minimum");
        exclusive_bound(openapi_schema, json_schema, "exclusiveMaximum", "maximum");
        Ok(())
    }
}

fn exclusive_bound(
    openapi_schema: &JsonMap<String, JsonValue>,
    json_schema: &mut JsonMap<String, JsonValue>,
    keyword: &str,
    bound: &str,
) {
    match openapi_schema.get(keyword) {
        None | Some(JsonValue::Bool(false)) => {}
        Some(JsonValue::Bool(true)) => {
            if let Some(value) = openapi_schema.get(bound) {
                json_schema.insert(keyword.to_string(), value.clone());
            }
        }
        Some(number @ JsonValue::Number(_)) => {
            json_schema.insert(keyword.to_string(), number.clone());
        }
        Some(_) => {
            json_schema.remove(keyword);
        }
    }
}
