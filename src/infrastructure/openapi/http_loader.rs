//! HTTP-based OpenAPI spec loader

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::debug;

use super::{OpenApiLoader, SpecFormat, parse_document};
use crate::core::error::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Loads OpenAPI specifications from HTTP/HTTPS URLs
#[derive(Debug, Clone)]
pub struct HttpOpenApiLoader {
    client: Client,
}

impl HttpOpenApiLoader {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| Error::load(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl OpenApiLoader for HttpOpenApiLoader {
    async fn load(&self, source: &str) -> Result<JsonValue> {
        if !is_http_url(source) {
            return Err(Error::load(format!(
                "HttpOpenApiLoader only handles HTTP(S) URLs, got: {source}"
            )));
        }

        let response = self
            .client
            .get(source)
            .send()
            .await
            .map_err(|e| Error::load(format!("Failed to fetch OpenAPI spec from {source}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::load(format!("HTTP {status} when fetching {source}")));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let content = response
            .text()
            .await
            .map_err(|e| Error::load(format!("Failed to read response body: {e}")))?;
        debug!(source = %source, content_type = %content_type, "Fetched OpenAPI spec");

        let format = if content_type.contains("json") {
            SpecFormat::Json
        } else if content_type.contains("yaml") {
            SpecFormat::Yaml
        } else {
            SpecFormat::from_source(source)
        };
        parse_document(&content, format)
    }
}

pub(crate) fn is_http_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
