//! `$ref` expansion with cycle detection.
//!
//! Only same-document pointers (`#/a/b/c`) are supported. Segments are
//! percent-decoded, arrays are indexed by integer and objects by key.

use std::cell::RefCell;
use std::collections::HashSet;

use serde_json::{Map as JsonMap, Value as JsonValue};
use thiserror::Error;
use tracing::{debug, warn};

use super::{HandlerError, SchemaHandler};
use crate::schema::converter::{CYCLIC_MARKER, SchemaConverter, is_placeholder_description};

pub(crate) const UNRESOLVED_PREFIX: &str = "Unresolved reference:";
pub(crate) const NOT_AN_OBJECT_PREFIX: &str = "Resolved reference is not an object:";
pub(crate) const CYCLIC_PREFIX: &str = "Cyclic reference detected:";

/// Why a `$ref` could not be expanded.
///
/// The display text doubles as the `description` of the placeholder fragment
/// left in the output schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Not a `#/` pointer into the current document
    #[error("Unresolved reference: {0}")]
    External(String),

    /// A segment did not lead anywhere
    #[error("Unresolved reference: {0}")]
    Unresolved(String),

    /// The pointer landed on a scalar or array
    #[error("Resolved reference is not an object: {0}")]
    NotAnObject(String),

    /// The target has already been expanded by this resolver
    #[error("Cyclic reference detected: {0}")]
    Cyclic(String),
}

impl ResolveError {
    /// The fragment that stands in for the unresolvable target
    pub fn placeholder(&self) -> JsonMap<String, JsonValue> {
        let mut placeholder = JsonMap::new();
        placeholder.insert(
            "description".to_string(),
            JsonValue::String(self.to_string()),
        );
        if matches!(self, ResolveError::Cyclic(_)) {
            placeholder.insert(CYCLIC_MARKER.to_string(), JsonValue::Bool(true));
        }
        placeholder
    }
}

/// Walks a `#/...` pointer through the full document. Stateless.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    full_spec: &'a JsonValue,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(full_spec: &'a JsonValue) -> Self {
        Self { full_spec }
    }

    /// Resolve `ref_path` to the object it points at
    pub fn resolve(&self, ref_path: &str) -> Result<&'a JsonMap<String, JsonValue>, ResolveError> {
        let Some(pointer) = ref_path.strip_prefix("#/") else {
            warn!(
                ref_path,
                "Reference not resolved (external or complex refs not supported)"
            );
            return Err(ResolveError::External(ref_path.to_string()));
        };

        let mut current = self.full_spec;
        for segment in pointer.split('/') {
            current = step(current, segment).ok_or_else(|| {
                warn!(ref_path, segment, "Reference could not be resolved");
                ResolveError::Unresolved(ref_path.to_string())
            })?;
        }

        current.as_object().ok_or_else(|| {
            warn!(ref_path, "Resolved reference is not an object");
            ResolveError::NotAnObject(ref_path.to_string())
        })
    }
}

/// Descend one pointer segment
fn step<'v>(current: &'v JsonValue, segment: &str) -> Option<&'v JsonValue> {
    let decoded = urlencoding::decode(segment).ok()?;
    match current {
        JsonValue::Object(map) => map.get(decoded.as_ref()),
        JsonValue::Array(items) => {
            let index: i64 = decoded.trim().parse().ok()?;
            // Negative indices count from the end
            let index = if index < 0 {
                items.len().checked_sub(index.unsigned_abs() as usize)?
            } else {
                usize::try_from(index).ok()?
            };
            items.get(index)
        }
        _ => None,
    }
}

/// Expands `$ref` fragments.
///
/// Every expanded target is remembered for the lifetime of the handler and is
/// never forgotten, so the set records "seen at least once" rather than "on
/// the current expansion path".
#[derive(Debug, Default)]
pub struct ReferenceHandler {
    visited_refs: RefCell<HashSet<String>>,
}

impl ReferenceHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `ref_path` has been expanded by this handler
    pub fn has_visited(&self, ref_path: &str) -> bool {
        self.visited_refs.borrow().contains(ref_path)
    }
}

impl SchemaHandler for ReferenceHandler {
    fn name(&self) -> &'static str {
        "ReferenceHandler"
    }

    fn can_handle(&self, schema: &JsonMap<String, JsonValue>) -> bool {
        schema.contains_key("$ref")
    }

    fn handle(
        &self,
        converter: &SchemaConverter<'_>,
        openapi_schema: &JsonMap<String, JsonValue>,
        json_schema: &mut JsonMap<String, JsonValue>,
    ) -> Result<(), HandlerError> {
        let ref_path = match openapi_schema.get("$ref") {
            Some(JsonValue::String(ref_path)) => ref_path,
            Some(other) => return Err(HandlerError::InvalidRef(other.to_string())),
            None => return Ok(()),
        };

        // The borrow ends before recursing into the target
        let first_visit = self.visited_refs.borrow_mut().insert(ref_path.clone());
        if !first_visit {
            warn!(ref_path = %ref_path, "Cyclic reference detected, returning placeholder");
            json_schema.extend(ResolveError::Cyclic(ref_path.clone()).placeholder());
            return Ok(());
        }

        let resolved = match ReferenceResolver::new(converter.full_spec()).resolve(ref_path) {
            Ok(resolved) => resolved,
            Err(e) => {
                json_schema.extend(e.placeholder());
                return Ok(());
            }
        };

        debug!(ref_path = %ref_path, "Expanding reference");
        let result = converter.convert_map(resolved);
        let result_is_cyclic = result.get(CYCLIC_MARKER) == Some(&JsonValue::Bool(true));

        let is_recursive_error = result
            .get("description")
            .and_then(JsonValue::as_str)
            .is_some_and(is_placeholder_description);
        json_schema.extend(result);
        if result_is_cyclic {
            json_schema.insert(CYCLIC_MARKER.to_string(), JsonValue::Bool(true));
        }
        if is_recursive_error {
            return Ok(());
        }

        if !json_schema.contains_key("description") {
            let annotation = match openapi_schema
                .get("description")
                .and_then(JsonValue::as_str)
                .filter(|d| !d.is_empty())
            {
                Some(original) => format!("{original} (from ref: {ref_path})"),
                None => format!("(from ref: {ref_path})"),
            };
            json_schema.insert("description".to_string(), JsonValue::String(annotation));
        }

        Ok(())
    }
}
