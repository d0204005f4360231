//! Infrastructure layer - loading documents from the outside world

pub mod openapi;

pub use openapi::{CompositeOpenApiLoader, FileOpenApiLoader, HttpOpenApiLoader, OpenApiLoader};
