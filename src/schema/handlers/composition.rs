//! `allOf` / `oneOf` / `anyOf` / `not`

use serde_json::{Map as JsonMap, Value as JsonValue};

use super::{HandlerError, SchemaHandler};
use crate::schema::SchemaConverter;

const LIST_KEYWORDS: [&str; 3] = ["allOf", "oneOf", "anyOf"];

pub struct CompositionHandler;

impl SchemaHandler for CompositionHandler {
    fn name(&self) -> &'static str {
        "CompositionHandler"
    }

    fn can_handle(&self, schema: &JsonMap<String, JsonValue>) -> bool {
        LIST_KEYWORDS
            .iter()
            .chain(std::iter::once(&"not"))
            .any(|key| schema.contains_key(*key))
    }

    fn handle(
        &self,
        converter: &SchemaConverter<'_>,
        openapi_schema: &JsonMap<String, JsonValue>,
        json_schema: &mut JsonMap<String, JsonValue>,
    ) -> Result<(), HandlerError> {
        for keyword in LIST_KEYWORDS {
            let Some(JsonValue::Array(members)) = openapi_schema.get(keyword) else {
                continue;
            };

            // Non-object members are dropped; the keyword is only emitted if something survives
            let converted: Vec<JsonValue> = members
                .iter()
                .filter_map(JsonValue::as_object)
                .map(|member| JsonValue::Object(converter.convert_map(member)))
                .collect();
            if !converted.is_empty() {
                json_schema.insert(keyword.to_string(), JsonValue::Array(converted));
            }
        }

        if let Some(JsonValue::Object(negated)) = openapi_schema.get("not") {
            json_schema.insert(
                "not".to_string(),
                JsonValue::Object(converter.convert_map(negated)),
            );
        }

        Ok(())
    }
}
