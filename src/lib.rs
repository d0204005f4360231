//! # toolmap
//!
//! Turns an OpenAPI 3.x document into a manifest of invocable tools, each with
//! a JSON Schema describing its input.
//!
//! ```
//! use serde_json::json;
//! use toolmap::mapping::Mapper;
//!
//! let spec = json!({
//!     "paths": {"/pets/{petId}": {"get": {"parameters": [
//!         {"name": "petId", "in": "path", "required": true, "schema": {"type": "integer"}}
//!     ]}}}
//! });
//! let tools = Mapper::new(&spec)?.map_tools()?;
//! assert_eq!(tools[0].name, "get_pets_by_petId");
//! assert_eq!(tools[0].required(), vec!["petId"]);
//! # Ok::<(), toolmap::Error>(())
//! ```

pub mod core;
pub mod infrastructure;
pub mod manifest;
pub mod mapping;
pub mod schema;

pub use crate::core::{Config, Error, Result};
pub use manifest::ToolManifest;
