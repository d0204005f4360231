//! Picks a loader based on the shape of the source

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use super::http_loader::is_http_url;
use super::{FileOpenApiLoader, HttpOpenApiLoader, OpenApiLoader};
use crate::core::error::Result;

/// URLs go over HTTP, anything else is read from disk
#[derive(Debug, Clone)]
pub struct CompositeOpenApiLoader {
    http: HttpOpenApiLoader,
    file: FileOpenApiLoader,
}

impl CompositeOpenApiLoader {
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: HttpOpenApiLoader::new()?,
            file: FileOpenApiLoader::new(),
        })
    }
}

#[async_trait]
impl OpenApiLoader for CompositeOpenApiLoader {
    async fn load(&self, source: &str) -> Result<JsonValue> {
        if is_http_url(source) {
            tracing::debug!("CompositeOpenApiLoader: Using HTTP loader for {source}");
            self.http.load(source).await
        } else {
            tracing::debug!("CompositeOpenApiLoader: Using file loader for {source}");
            self.file.load(source).await
        }
    }
}
