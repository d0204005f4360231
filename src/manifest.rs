//! Everything a generated server needs to know about the API it fronts.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::core::config::Config;
use crate::core::error::Result;
use crate::mapping::{Mapper, ToolDefinition};

pub const DEFAULT_SERVER_NAME: &str = "openapi-mcp-server";
pub const DEFAULT_SERVER_VERSION: &str = "1.0.0";
pub const BASE_URL_PLACEHOLDER: &str = "YOUR_API_BASE_URL_HERE";

/// Server identity plus the mapped tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolManifest {
    pub server_name: String,
    pub server_version: String,
    pub api_base_url: String,
    pub tools: Vec<ToolDefinition>,
}

impl ToolManifest {
    /// Map `spec` and apply the overrides and tool filters from `config`.
    ///
    /// # Errors
    ///
    /// Fails only where [`Mapper`] fails: a non-object document or a
    /// non-object `paths`.
    pub fn build(spec: &JsonValue, config: &Config) -> Result<Self> {
        let tools: Vec<ToolDefinition> = Mapper::new(spec)?
            .with_max_schema_depth(config.max_schema_depth)
            .map_tools()?
            .into_iter()
            .filter(|tool| config.keeps_tool(&tool.name))
            .collect();

        let info = spec.get("info");
        Ok(Self {
            server_name: server_name(config.server_name.as_deref(), info),
            server_version: server_version(config.server_version.as_deref(), info),
            api_base_url: base_url(config.base_url.as_deref(), spec),
            tools,
        })
    }

    /// Look up a tool by name
    pub fn tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|tool| tool.name == name)
    }
}

fn info_str<'a>(info: Option<&'a JsonValue>, key: &str) -> Option<&'a str> {
    info?.get(key)?.as_str().filter(|s| !s.is_empty())
}

fn server_name(provided: Option<&str>, info: Option<&JsonValue>) -> String {
    if let Some(name) = provided.filter(|s| !s.is_empty()) {
        return name.to_string();
    }
    if let Some(title) = info_str(info, "title") {
        info!(server_name = %title, "Using server name from OpenAPI spec info.title");
        return title.to_string();
    }
    warn!(
        default = DEFAULT_SERVER_NAME,
        "Server name not provided and not found in spec title, using default"
    );
    DEFAULT_SERVER_NAME.to_string()
}

fn server_version(provided: Option<&str>, info: Option<&JsonValue>) -> String {
    if let Some(version) = provided.filter(|s| !s.is_empty()) {
        return version.to_string();
    }
    if let Some(version) = info_str(info, "version") {
        info!(server_version = %version, "Using server version from OpenAPI spec info.version");
        return version.to_string();
    }
    warn!(
        default = DEFAULT_SERVER_VERSION,
        "Server version not provided and not found in spec version, using default"
    );
    DEFAULT_SERVER_VERSION.to_string()
}

fn base_url(provided: Option<&str>, spec: &JsonValue) -> String {
    if let Some(url) = provided.filter(|s| !s.is_empty()) {
        return url.to_string();
    }
    match spec.get("servers").and_then(JsonValue::as_array) {
        Some(servers) if !servers.is_empty() => {
            if let Some(url) = servers[0].get("url").and_then(JsonValue::as_str) {
                info!(base_url = %url, "Using base URL from spec servers[0].url");
                return url.to_string();
            }
            warn!("First server object in spec lacks a valid 'url' string, using placeholder");
        }
        _ => warn!("No 'servers' array found or it's empty in the spec, using placeholder"),
    }
    BASE_URL_PLACEHOLDER.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracing_test::traced_test;

    fn petstore() -> JsonValue {
        json!({
            "openapi": "3.0.0",
            "info": {"title": "Petstore", "version": "2.1.0"},
            "servers": [{"url": "https://petstore.example.com/v1"}],
            "paths": {
                "/pets": {
                    "get": {"operationId": "listPets"},
                    "post": {"operationId": "createPet"}
                },
                "/pets/{petId}": {
                    "delete": {"operationId": "deletePet"}
                }
            }
        })
    }

    #[test]
    fn test_build_uses_spec_metadata() {
        let manifest = ToolManifest::build(&petstore(), &Config::default()).unwrap();
        assert_eq!(manifest.server_name, "Petstore");
        assert_eq!(manifest.server_version, "2.1.0");
        assert_eq!(manifest.api_base_url, "https://petstore.example.com/v1");
        assert_eq!(manifest.tools.len(), 3);
        assert!(manifest.tool("deletePet").is_some());
    }

    #[test]
    fn test_build_applies_overrides() {
        let config = Config {
            server_name: Some("pets".to_string()),
            server_version: Some("9.9.9".to_string()),
            base_url: Some("http://localhost:8080".to_string()),
            ..Config::default()
        };
        let manifest = ToolManifest::build(&petstore(), &config).unwrap();
        assert_eq!(manifest.server_name, "pets");
        assert_eq!(manifest.server_version, "9.9.9");
        assert_eq!(manifest.api_base_url, "http://localhost:8080");
    }

    #[test]
    fn test_build_filters_tools() {
        let config = Config {
            include_operations: vec!["listPets".to_string(), "deletePet".to_string()],
            exclude_operations: vec!["deletePet".to_string()],
            ..Config::default()
        };
        let manifest = ToolManifest::build(&petstore(), &config).unwrap();
        let names: Vec<&str> = manifest.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["listPets"]);
    }

    #[test]
    #[traced_test]
    fn test_build_falls_back_to_defaults() {
        let spec = json!({
            "info": {"title": ""},
            "servers": [{"description": "no url"}],
            "paths": {}
        });
        let manifest = ToolManifest::build(&spec, &Config::default()).unwrap();
        assert_eq!(manifest.server_name, DEFAULT_SERVER_NAME);
        assert_eq!(manifest.server_version, DEFAULT_SERVER_VERSION);
        assert_eq!(manifest.api_base_url, BASE_URL_PLACEHOLDER);
        assert!(manifest.tools.is_empty());
        assert!(logs_contain("lacks a valid 'url' string"));
    }

    #[test]
    #[traced_test]
    fn test_build_without_servers() {
        let manifest = ToolManifest::build(&json!({"paths": {}}), &Config::default()).unwrap();
        assert_eq!(manifest.api_base_url, BASE_URL_PLACEHOLDER);
        assert!(logs_contain("No 'servers' array found"));
    }

    #[test]
    fn test_build_propagates_mapping_errors() {
        assert!(ToolManifest::build(&json!({"paths": 5}), &Config::default()).is_err());
    }

    #[test]
    fn test_manifest_serialization() {
        let manifest = ToolManifest::build(&petstore(), &Config::default()).unwrap();
        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(value["server_name"], "Petstore");
        assert_eq!(value["tools"][0]["name"], "listPets");
        assert_eq!(value["tools"][0]["_original_method"], "GET");
    }
}
