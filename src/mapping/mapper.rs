//! Maps OpenAPI operations to tool definitions.
//!
//! Only a malformed top-level `paths` object is fatal. Everything below it is
//! handled with partial-success semantics: a broken path item, operation or
//! parameter is logged and skipped, and the rest of the document still maps.
//!
//! Reference state is deliberately *not* shared between schemas here: each
//! parameter schema and each request-body schema is converted by its own
//! [`SchemaConverter`], and every parameter / request-body `$ref` is looked up
//! with a fresh [`ReferenceResolver`]. Within one of those schemas the
//! converter's "seen once" history still applies.

use std::collections::BTreeSet;

use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::{debug, error, warn};

use crate::core::error::{Error, Result};
use crate::core::utils::{generate_tool_name, is_truthy};
use crate::mapping::types::{
    HttpMethod, ParameterLocation, ProcessedParameter, ProcessedRequestBody, ToolDefinition,
};
use crate::schema::{ReferenceResolver, SchemaConverter};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Input schema under construction for one operation
#[derive(Debug, Default)]
struct InputSchemaBuilder {
    properties: JsonMap<String, JsonValue>,
    required: Vec<String>,
}

impl InputSchemaBuilder {
    fn insert(&mut self, name: &str, schema: JsonMap<String, JsonValue>, required: bool) {
        self.properties
            .insert(name.to_string(), JsonValue::Object(schema));
        if required {
            self.required.push(name.to_string());
        }
    }

    /// Finish with `required` deduplicated and sorted
    fn build(self) -> JsonMap<String, JsonValue> {
        let required: BTreeSet<String> = self.required.into_iter().collect();

        let mut schema = JsonMap::new();
        schema.insert("type".to_string(), JsonValue::from("object"));
        schema.insert("properties".to_string(), JsonValue::Object(self.properties));
        schema.insert(
            "required".to_string(),
            JsonValue::Array(required.into_iter().map(JsonValue::String).collect()),
        );
        schema
    }
}

/// Maps every operation of a parsed OpenAPI document to a [`ToolDefinition`]
#[derive(Debug, Clone)]
pub struct Mapper<'a> {
    spec: &'a JsonValue,
    max_schema_depth: Option<usize>,
}

impl<'a> Mapper<'a> {
    /// Create a mapper over a parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Mapping`] if the document is not an object.
    pub fn new(spec: &'a JsonValue) -> Result<Self> {
        if !spec.is_object() {
            return Err(Error::mapping(
                "Invalid OpenAPI specification provided to Mapper.",
            ));
        }
        Ok(Self {
            spec,
            max_schema_depth: None,
        })
    }

    /// Bound schema nesting for every converted parameter and body
    pub fn with_max_schema_depth(mut self, max_schema_depth: Option<usize>) -> Self {
        self.max_schema_depth = max_schema_depth;
        self
    }

    /// Produce one tool per well-formed operation, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Mapping`] if `paths` is present but not an object.
    pub fn map_tools(&self) -> Result<Vec<ToolDefinition>> {
        let paths = match self.spec.get("paths") {
            None => return Ok(Vec::new()),
            Some(JsonValue::Object(paths)) => paths,
            Some(_) => return Err(Error::mapping("Invalid 'paths' object in OpenAPI spec.")),
        };

        let mut tools = Vec::new();
        for (path, path_item) in paths {
            let Some(path_item) = path_item.as_object() else {
                debug!(path = %path, "Skipping non-object path item");
                continue;
            };

            for (method_key, operation) in path_item {
                let Ok(method) = method_key.parse::<HttpMethod>() else {
                    continue;
                };
                let Some(operation) = operation.as_object() else {
                    debug!(method = %method_key, path = %path, "Skipping non-object operation");
                    continue;
                };

                match self.map_operation(method_key, method, path, operation) {
                    Ok(tool) => tools.push(tool),
                    Err(e) => {
                        error!(
                            method = %method.as_upper(),
                            path = %path,
                            error = %e,
                            "Failed to map operation"
                        );
                    }
                }
            }
        }

        debug!("Mapped {} operations to tools", tools.len());
        Ok(tools)
    }

    fn map_operation(
        &self,
        method_key: &str,
        method: HttpMethod,
        path: &str,
        operation: &'a JsonMap<String, JsonValue>,
    ) -> Result<ToolDefinition> {
        let name = match operation.get("operationId") {
            Some(JsonValue::String(id)) if !id.is_empty() => id.clone(),
            Some(id) if is_truthy(id) => {
                return Err(Error::mapping(format!(
                    "operationId must be a string, got {id}"
                )));
            }
            _ => generate_tool_name(method_key, path),
        };

        let description = non_empty_str(operation.get("summary"))
            .or_else(|| operation.get("description").and_then(JsonValue::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} operation for {path}", method.as_upper()));

        let mut input_schema = InputSchemaBuilder::default();

        let parameters = match operation.get("parameters") {
            None => &[][..],
            Some(JsonValue::Array(parameters)) => parameters.as_slice(),
            Some(other) => {
                warn!(
                    method = %method.as_upper(),
                    path = %path,
                    found = json_type_name(other),
                    "Invalid 'parameters' format (expected list), skipping parameter processing"
                );
                &[][..]
            }
        };
        let original_parameters = self.process_parameters(parameters, &mut input_schema)?;

        let original_request_body =
            self.process_request_body(operation.get("requestBody"), &mut input_schema)?;

        Ok(ToolDefinition {
            name,
            description,
            input_schema: input_schema.build(),
            original_method: method_key.to_uppercase(),
            original_path: path.to_string(),
            original_parameters,
            original_request_body,
        })
    }

    /// Follow a `$ref` on a parameter or request body, if there is one.
    ///
    /// `Ok(None)` means the reference could not be resolved and the entry should be skipped.
    fn resolve_maybe_ref(
        &self,
        entry: &'a JsonMap<String, JsonValue>,
    ) -> Result<Option<&'a JsonMap<String, JsonValue>>> {
        match entry.get("$ref") {
            None => Ok(Some(entry)),
            Some(JsonValue::String(ref_path)) => {
                match ReferenceResolver::new(self.spec).resolve(ref_path) {
                    Ok(resolved) => Ok(Some(resolved)),
                    Err(e) => {
                        debug!(ref_path = %ref_path, error = %e, "Skipping unresolved reference");
                        Ok(None)
                    }
                }
            }
            Some(other) => Err(Error::mapping(format!("'$ref' must be a string, got {other}"))),
        }
    }

    /// Convert one fragment with a converter of its own
    fn convert(&self, schema: &JsonValue) -> JsonMap<String, JsonValue> {
        SchemaConverter::with_max_depth(self.spec, self.max_schema_depth).convert(schema)
    }

    fn process_parameters(
        &self,
        parameters: &'a [JsonValue],
        input_schema: &mut InputSchemaBuilder,
    ) -> Result<Vec<ProcessedParameter>> {
        let mut processed = Vec::new();

        for parameter in parameters {
            let Some(parameter) = parameter.as_object() else {
                continue;
            };
            let Some(parameter) = self.resolve_maybe_ref(parameter)? else {
                continue;
            };

            let name = match parameter.get("name") {
                Some(JsonValue::String(name)) if !name.is_empty() => name,
                Some(other) if is_truthy(other) => {
                    warn!(name = %other, "Skipping parameter with non-string name");
                    continue;
                }
                _ => continue,
            };
            let Some(location) = parameter
                .get("in")
                .and_then(JsonValue::as_str)
                .and_then(ParameterLocation::parse)
            else {
                continue;
            };

            let empty = JsonValue::Object(JsonMap::new());
            let mut schema = self.convert(parameter.get("schema").unwrap_or(&empty));
            if let Some(description) = parameter.get("description") {
                schema.insert("description".to_string(), description.clone());
            }

            let required = parameter.get("required").is_some_and(is_truthy);
            input_schema.insert(name, schema, required);

            processed.push(ProcessedParameter {
                name: name.clone(),
                location,
                required,
            });
        }

        Ok(processed)
    }

    fn process_request_body(
        &self,
        request_body: Option<&'a JsonValue>,
        input_schema: &mut InputSchemaBuilder,
    ) -> Result<Option<ProcessedRequestBody>> {
        let Some(request_body) = request_body.and_then(JsonValue::as_object) else {
            return Ok(None);
        };
        let Some(request_body) = self.resolve_maybe_ref(request_body)? else {
            return Ok(None);
        };

        let content = match request_body.get("content") {
            None => return Ok(self.body_without_schema(request_body)),
            Some(JsonValue::Object(content)) => content,
            Some(_) => return Ok(None),
        };
        let required = request_body.get("required").is_some_and(is_truthy);

        let chosen = match content.get(JSON_CONTENT_TYPE) {
            Some(JsonValue::Object(media)) => Some((JSON_CONTENT_TYPE, media)),
            _ => content.iter().next().and_then(|(content_type, media)| {
                let media = media.as_object()?;
                warn!(
                    content_type = %content_type,
                    "application/json not found, using first declared content type for request body"
                );
                Some((content_type.as_str(), media))
            }),
        };

        match chosen.and_then(|(content_type, media)| {
            media
                .get("schema")
                .filter(|schema| schema.is_object())
                .map(|schema| (content_type, schema))
        }) {
            Some((content_type, schema)) => {
                input_schema.insert("requestBody", self.convert(schema), required);
                Ok(Some(ProcessedRequestBody {
                    required,
                    content_type: Some(content_type.to_string()),
                }))
            }
            None => Ok(self.body_without_schema(request_body)),
        }
    }

    /// Provenance for a body that has no usable schema.
    ///
    /// A required body is still recorded, but nothing is added to the input
    /// schema: neither a `requestBody` property nor a `required` entry.
    fn body_without_schema(
        &self,
        request_body: &JsonMap<String, JsonValue>,
    ) -> Option<ProcessedRequestBody> {
        if request_body.get("required").is_some_and(is_truthy) {
            warn!(
                "Required requestBody defined but no valid schema found under 'content'. Input schema may be incomplete."
            );
            Some(ProcessedRequestBody {
                required: true,
                content_type: None,
            })
        } else {
            None
        }
    }
}

fn non_empty_str(value: Option<&JsonValue>) -> Option<&str> {
    value.and_then(JsonValue::as_str).filter(|s| !s.is_empty())
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Map every operation in `spec`
pub fn map_tools(spec: &JsonValue) -> Result<Vec<ToolDefinition>> {
    Mapper::new(spec)?.map_tools()
}
