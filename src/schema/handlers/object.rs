//! Object schemas: `properties`, `required`, `additionalProperties`

use serde_json::{Map as JsonMap, Value as JsonValue};

use super::{HandlerError, SchemaHandler, declared_type, default_type};
use crate::schema::SchemaConverter;

pub struct ObjectSchemaHandler;

impl SchemaHandler for ObjectSchemaHandler {
    fn name(&self) -> &'static str {
        "ObjectSchemaHandler"
    }

    fn can_handle(&self, schema: &JsonMap<String, JsonValue>) -> bool {
        declared_type(schema) == Some("object") || schema.contains_key("properties")
    }

    fn handle(
        &self,
        converter: &SchemaConverter<'_>,
        openapi_schema: &JsonMap<String, JsonValue>,
        json_schema: &mut JsonMap<String, JsonValue>,
    ) -> Result<(), HandlerError> {
        default_type(json_schema, JsonValue::from("object"));

        let mut properties = JsonMap::new();
        let malformed_properties = match openapi_schema.get("properties") {
            Some(JsonValue::Object(source_properties)) => {
                for (name, property) in source_properties {
                    properties.insert(name.clone(), JsonValue::Object(converter.convert(property)));
                }
                None
            }
            Some(other) => Some(other),
            None => None,
        };
        json_schema.insert("properties".to_string(), JsonValue::Object(properties));
        json_schema.insert(
            "required".to_string(),
            openapi_schema
                .get("required")
                .cloned()
                .unwrap_or_else(|| JsonValue::Array(Vec::new())),
        );

        match openapi_schema.get("additionalProperties") {
            Some(JsonValue::Bool(allowed)) => {
                json_schema.insert("additionalProperties".to_string(), JsonValue::Bool(*allowed));
            }
            Some(JsonValue::Object(schema)) => {
                json_schema.insert(
                    "additionalProperties".to_string(),
                    JsonValue::Object(converter.convert_map(schema)),
                );
            }
            _ => {}
        }

        match malformed_properties {
            Some(other) => Err(HandlerError::Malformed {
                keyword: "properties",
                detail: format!("expected an object, got {other}"),
            }),
            None => Ok(()),
        }
    }
}
