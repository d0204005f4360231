//! Schema handlers.
//!
//! Each handler recognizes one shape of OpenAPI Schema Object and writes the
//! matching JSON Schema keywords into the output being built. The converter
//! runs every applicable handler in a fixed order; handlers that set `type`
//! only do so when an earlier step has not already set it.

use serde_json::{Map as JsonMap, Value as JsonValue};
use thiserror::Error;

use crate::schema::SchemaConverter;

pub mod array;
pub mod common;
pub mod composition;
pub mod number;
pub mod object;
pub mod reference;
pub mod string;

pub use array::ArraySchemaHandler;
pub use common::CommonSchemaHandler;
pub use composition::CompositionHandler;
pub use number::NumberSchemaHandler;
pub use object::ObjectSchemaHandler;
pub use reference::{ReferenceHandler, ReferenceResolver, ResolveError};
pub use string::StringSchemaHandler;

/// Failure of a single handler. The converter logs it and moves on.
#[derive(Debug, Error, PartialEq)]
pub enum HandlerError {
    #[error("'$ref' must be a string, got {0}")]
    InvalidRef(String),

    #[error("{keyword} has unexpected shape: {detail}")]
    Malformed {
        keyword: &'static str,
        detail: String,
    },
}

/// One step of schema conversion
pub trait SchemaHandler {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Whether this handler applies to the source fragment
    fn can_handle(&self, schema: &JsonMap<String, JsonValue>) -> bool;

    /// Write this handler's keywords into `json_schema`.
    ///
    /// `converter` is the recursion entry point for nested fragments.
    fn handle(
        &self,
        converter: &SchemaConverter<'_>,
        openapi_schema: &JsonMap<String, JsonValue>,
        json_schema: &mut JsonMap<String, JsonValue>,
    ) -> Result<(), HandlerError>;
}

/// Copy `keys` from `from` to `to` when present
pub(crate) fn copy_keywords(
    keys: &[&str],
    from: &JsonMap<String, JsonValue>,
    to: &mut JsonMap<String, JsonValue>,
) {
    for key in keys {
        if let Some(value) = from.get(*key) {
            to.insert((*key).to_string(), value.clone());
        }
    }
}

/// Set `type` unless an earlier step already did
pub(crate) fn default_type(json_schema: &mut JsonMap<String, JsonValue>, schema_type: JsonValue) {
    if !json_schema.contains_key("type") {
        json_schema.insert("type".to_string(), schema_type);
    }
}

/// The source fragment's `type` when it is a plain string
pub(crate) fn declared_type(schema: &JsonMap<String, JsonValue>) -> Option<&str> {
    schema.get("type").and_then(JsonValue::as_str)
}
