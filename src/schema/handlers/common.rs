//! Keywords shared by every schema type, plus `nullable`.
//!
//! Runs last so that `nullable` sees the type chosen by the other handlers.

use serde_json::{Map as JsonMap, Value as JsonValue};

use super::{HandlerError, SchemaHandler, copy_keywords};
use crate::core::utils::is_truthy;
use crate::schema::SchemaConverter;

const COMMON_KEYWORDS: [&str; 6] = [
    "description",
    "title",
    "default",
    "readOnly",
    "writeOnly",
    "deprecated",
];

pub struct CommonSchemaHandler;

impl SchemaHandler for CommonSchemaHandler {
    fn name(&self) -> &'static str {
        "CommonSchemaHandler"
    }

    fn can_handle(&self, _schema: &JsonMap<String, JsonValue>) -> bool {
        true
    }

    fn handle(
        &self,
        _converter: &SchemaConverter<'_>,
        openapi_schema: &JsonMap<String, JsonValue>,
        json_schema: &mut JsonMap<String, JsonValue>,
    ) -> Result<(), HandlerError> {
        copy_keywords(&COMMON_KEYWORDS, openapi_schema, json_schema);

        // JSON Schema spells it as a list
        if let Some(example) = openapi_schema.get("example") {
            json_schema.insert(
                "examples".to_string(),
                JsonValue::Array(vec![example.clone()]),
            );
        }

        if openapi_schema.get("nullable").is_some_and(is_truthy) {
            apply_nullable(json_schema);
        }
        Ok(())
    }
}

/// Widen `type` to also accept `null`. No-op without a type; never adds `null` twice.
pub fn apply_nullable(json_schema: &mut JsonMap<String, JsonValue>) {
    let Some(current) = json_schema.get_mut("type") else {
        return;
    };

    match current {
        JsonValue::Array(types) => {
            if !types.iter().any(|t| t == "null") {
                types.push(JsonValue::from("null"));
            }
        }
        JsonValue::String(t) if t.as_str() == "null" => {}
        other => {
            let single = other.take();
            *other = JsonValue::Array(vec![single, JsonValue::from("null")]);
        }
    }
}
