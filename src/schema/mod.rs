//! OpenAPI Schema Object to JSON Schema conversion.
//!
//! [`SchemaConverter`] walks an untyped OpenAPI schema fragment and builds the
//! equivalent JSON Schema fragment by running an ordered chain of
//! [`handlers::SchemaHandler`]s. Same-document `$ref`s are expanded in place,
//! with cycle detection scoped to the converter instance.
//!
//! Conversion never fails as a whole: unusable input yields an empty schema,
//! and broken references degrade to placeholder fragments whose `description`
//! explains what went wrong.

pub mod converter;
pub mod handlers;

pub use converter::{
    CYCLIC_MARKER, DEPTH_EXCEEDED_PREFIX, SchemaConverter, convert_schema,
    is_placeholder_description,
};
pub use handlers::{HandlerError, ReferenceResolver, ResolveError, SchemaHandler};
