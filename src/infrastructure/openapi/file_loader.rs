//! File-based OpenAPI spec loader

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tokio::fs;
use tracing::debug;

use super::{OpenApiLoader, SpecFormat, parse_document};
use crate::core::error::{Error, Result};

/// Loads OpenAPI specifications from local files
#[derive(Debug, Default, Clone, Copy)]
pub struct FileOpenApiLoader;

impl FileOpenApiLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OpenApiLoader for FileOpenApiLoader {
    async fn load(&self, source: &str) -> Result<JsonValue> {
        let content = fs::read_to_string(source)
            .await
            .map_err(|e| Error::load(format!("Failed to read OpenAPI spec {source}: {e}")))?;
        debug!(source = %source, bytes = content.len(), "Read OpenAPI spec from file");

        parse_document(&content, SpecFormat::from_source(source))
    }
}
