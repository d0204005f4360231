//! OpenAPI operations to tool definitions

pub mod mapper;
pub mod types;

pub use mapper::{Mapper, map_tools};
pub use types::{
    HttpMethod, ParameterLocation, ProcessedParameter, ProcessedRequestBody, ToolDefinition,
};
