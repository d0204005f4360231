//! Tool definitions handed to the code generator

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

/// HTTP methods an OpenAPI path item may declare operations for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    /// Get all HTTP methods as an array
    pub fn all() -> &'static [HttpMethod] {
        &[
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Delete,
            HttpMethod::Patch,
            HttpMethod::Options,
            HttpMethod::Head,
            HttpMethod::Trace,
        ]
    }

    /// Lower-case form used in path items and tool names
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Trace => "trace",
        }
    }

    /// Upper-case form recorded as provenance
    pub fn as_upper(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        HttpMethod::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == lower)
            .ok_or_else(|| format!("Unknown HTTP method: {s}"))
    }
}

/// Where a parameter travels. Cookie parameters are not mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
}

impl ParameterLocation {
    pub fn parse(location: &str) -> Option<Self> {
        match location {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            _ => None,
        }
    }
}

/// Normalized view of an OpenAPI parameter, independent of its schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedParameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub required: bool,
}

/// Which media type's schema was used for the request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedRequestBody {
    pub required: bool,
    /// `None` when the body is required but no usable schema was found
    pub content_type: Option<String>,
}

/// One invocable operation.
///
/// `input_schema` is a JSON Schema object; the `original_*` fields are
/// provenance for the generator and serialize with a leading underscore to set
/// them apart from schema data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonMap<String, JsonValue>,
    #[serde(rename = "_original_method")]
    pub original_method: String,
    #[serde(rename = "_original_path")]
    pub original_path: String,
    #[serde(rename = "_original_parameters")]
    pub original_parameters: Vec<ProcessedParameter>,
    #[serde(rename = "_original_request_body")]
    pub original_request_body: Option<ProcessedRequestBody>,
}

impl ToolDefinition {
    /// Names listed in the input schema's `required`
    pub fn required(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(JsonValue::as_array)
            .map(|names| names.iter().filter_map(JsonValue::as_str).collect())
            .unwrap_or_default()
    }

    /// Converted schema of one input property
    pub fn property(&self, name: &str) -> Option<&JsonValue> {
        self.input_schema.get("properties")?.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_method_parse_is_case_insensitive() {
        assert_eq!("GET".parse::<HttpMethod>(), Ok(HttpMethod::Get));
        assert_eq!("PoSt".parse::<HttpMethod>(), Ok(HttpMethod::Post));
        assert_eq!("trace".parse::<HttpMethod>(), Ok(HttpMethod::Trace));
        assert!("parameters".parse::<HttpMethod>().is_err());
        assert_eq!(HttpMethod::all().len(), 8);
    }

    #[test]
    fn test_http_method_forms() {
        assert_eq!(HttpMethod::Delete.to_string(), "delete");
        assert_eq!(HttpMethod::Delete.as_upper(), "DELETE");
    }

    #[test]
    fn test_parameter_location_parse() {
        assert_eq!(ParameterLocation::parse("path"), Some(ParameterLocation::Path));
        assert_eq!(ParameterLocation::parse("header"), Some(ParameterLocation::Header));
        assert_eq!(ParameterLocation::parse("cookie"), None);
    }

    #[test]
    fn test_tool_definition_serialization() {
        let tool = ToolDefinition {
            name: "getPet".to_string(),
            description: "Get a pet".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {"petId": {"type": "integer"}},
                "required": ["petId"]
            })
            .as_object()
            .unwrap()
            .clone(),
            original_method: "GET".to_string(),
            original_path: "/pets/{petId}".to_string(),
            original_parameters: vec![ProcessedParameter {
                name: "petId".to_string(),
                location: ParameterLocation::Path,
                required: true,
            }],
            original_request_body: None,
        };

        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "getPet",
                "description": "Get a pet",
                "inputSchema": {
                    "type": "object",
                    "properties": {"petId": {"type": "integer"}},
                    "required": ["petId"]
                },
                "_original_method": "GET",
                "_original_path": "/pets/{petId}",
                "_original_parameters": [{"name": "petId", "in": "path", "required": true}],
                "_original_request_body": null
            })
        );
        assert_eq!(tool.required(), vec!["petId"]);
        assert_eq!(tool.property("petId"), Some(&json!({"type": "integer"})));
    }
}
