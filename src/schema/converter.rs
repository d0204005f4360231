//! The conversion entry point and handler dispatch.

use std::cell::Cell;

use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::{debug, warn};

use crate::core::utils::is_truthy;
use crate::schema::handlers::{
    ArraySchemaHandler, CommonSchemaHandler, CompositionHandler, NumberSchemaHandler,
    ObjectSchemaHandler, ReferenceHandler, SchemaHandler, StringSchemaHandler,
    reference::{CYCLIC_PREFIX, NOT_AN_OBJECT_PREFIX, UNRESOLVED_PREFIX},
};

/// Marker key set on any fragment whose expansion hit a reference cycle
pub const CYCLIC_MARKER: &str = "_is_cyclic_reference";

/// Description prefix of the placeholder returned when the depth guard trips
pub const DEPTH_EXCEEDED_PREFIX: &str = "Maximum schema depth exceeded:";

/// Whether a description is one of the placeholder texts produced for broken
/// references or the depth guard.
pub fn is_placeholder_description(description: &str) -> bool {
    [
        UNRESOLVED_PREFIX,
        CYCLIC_PREFIX,
        NOT_AN_OBJECT_PREFIX,
        DEPTH_EXCEEDED_PREFIX,
    ]
    .iter()
    .any(|prefix| description.starts_with(prefix))
}

/// Converts OpenAPI schema fragments into JSON Schema fragments.
///
/// Holds the full document for `$ref` resolution. The reference handler keeps
/// every `$ref` it has expanded for the lifetime of the converter, so a
/// target seen once is reported as cyclic on any later encounter, including
/// non-cyclic diamond shapes and later calls to [`SchemaConverter::convert`].
/// Use a fresh converter (or [`convert_schema`]) when that history must not
/// carry over.
pub struct SchemaConverter<'a> {
    full_spec: &'a JsonValue,
    handlers: Vec<Box<dyn SchemaHandler>>,
    max_depth: Option<usize>,
    depth: Cell<usize>,
}

impl<'a> SchemaConverter<'a> {
    /// Create a converter with no recursion limit
    pub fn new(full_spec: &'a JsonValue) -> Self {
        Self::with_max_depth(full_spec, None)
    }

    /// Create a converter that stops descending past `max_depth` nested fragments
    pub fn with_max_depth(full_spec: &'a JsonValue, max_depth: Option<usize>) -> Self {
        Self {
            full_spec,
            // Order matters: later handlers rely on `type` set by earlier ones,
            // and the common handler must see the final type.
            handlers: vec![
                Box::new(ReferenceHandler::new()),
                Box::new(CompositionHandler),
                Box::new(ObjectSchemaHandler),
                Box::new(ArraySchemaHandler),
                Box::new(StringSchemaHandler),
                Box::new(NumberSchemaHandler),
                Box::new(CommonSchemaHandler),
            ],
            max_depth,
            depth: Cell::new(0),
        }
    }

    /// The complete document `$ref`s are resolved against
    pub fn full_spec(&self) -> &'a JsonValue {
        self.full_spec
    }

    /// Convert any value. Non-object input yields an empty schema.
    pub fn convert(&self, openapi_schema: &JsonValue) -> JsonMap<String, JsonValue> {
        match openapi_schema.as_object() {
            Some(schema) => self.convert_map(schema),
            None => {
                debug!("Invalid schema input provided to converter (expected object)");
                JsonMap::new()
            }
        }
    }

    /// Convert an object fragment
    pub fn convert_map(
        &self,
        openapi_schema: &JsonMap<String, JsonValue>,
    ) -> JsonMap<String, JsonValue> {
        let depth = self.depth.get();
        if let Some(max_depth) = self.max_depth {
            if depth >= max_depth {
                warn!(max_depth, "Schema nesting exceeds configured depth, truncating");
                let mut placeholder = JsonMap::new();
                placeholder.insert(
                    "description".to_string(),
                    JsonValue::String(format!("{DEPTH_EXCEEDED_PREFIX} {max_depth}")),
                );
                return placeholder;
            }
        }

        self.depth.set(depth + 1);
        let json_schema = self.apply_handlers(openapi_schema);
        self.depth.set(depth);
        json_schema
    }

    fn apply_handlers(
        &self,
        openapi_schema: &JsonMap<String, JsonValue>,
    ) -> JsonMap<String, JsonValue> {
        let mut json_schema = JsonMap::new();
        let mut is_cyclic_reference = false;

        let schema_type = openapi_schema
            .get("type")
            .filter(|t| is_truthy(t))
            .cloned()
            .or_else(|| infer_type(openapi_schema));
        if let Some(schema_type) = schema_type {
            json_schema.insert("type".to_string(), schema_type);
        }

        for handler in &self.handlers {
            if !handler.can_handle(openapi_schema) {
                continue;
            }

            match handler.handle(self, openapi_schema, &mut json_schema) {
                Ok(()) => {
                    if json_schema.get(CYCLIC_MARKER).is_some_and(is_truthy) {
                        is_cyclic_reference = true;
                    }
                }
                Err(e) => {
                    warn!(handler = handler.name(), error = %e, "Error in schema handler");
                }
            }
        }

        if is_cyclic_reference {
            json_schema.insert(CYCLIC_MARKER.to_string(), JsonValue::Bool(true));
        }

        json_schema
    }
}

/// Infer `type` for fragments that leave it out
fn infer_type(openapi_schema: &JsonMap<String, JsonValue>) -> Option<JsonValue> {
    if openapi_schema.contains_key("properties") {
        Some(JsonValue::from("object"))
    } else if openapi_schema.contains_key("items") {
        Some(JsonValue::from("array"))
    } else {
        None
    }
}

/// Convert a fragment with a one-off converter.
///
/// Reference history is not shared with any other call.
pub fn convert_schema(
    openapi_schema: &JsonValue,
    full_spec: &JsonValue,
) -> JsonMap<String, JsonValue> {
    SchemaConverter::new(full_spec).convert(openapi_schema)
}
