//! Identifier and value helpers shared by the schema and mapping layers

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value as JsonValue;

static PATH_PARAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^}]+)\}").expect("path parameter regex is valid"));
static PARAM_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.-]").expect("parameter separator regex is valid"));
static INVALID_CHAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_]").expect("invalid character regex is valid"));
static UNDERSCORE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_+").expect("underscore run regex is valid"));

/// Derives a stable tool name from an HTTP method and a URL path.
///
/// Path parameters in braces become `_by_<param>`, a query string is kept
/// behind a `_query_` marker (only the value for `key=value` queries) and every
/// other character outside `[A-Za-z0-9_]` collapses into a single underscore.
///
/// # Examples
/// ```
/// use toolmap::core::utils::generate_tool_name;
///
/// assert_eq!(generate_tool_name("GET", "/"), "get_root");
/// assert_eq!(generate_tool_name("POST", "/users"), "post_users");
/// assert_eq!(generate_tool_name("GET", "/users/{userId}"), "get_users_by_userId");
/// assert_eq!(generate_tool_name("GET", "/a-@!#$-b"), "get_a_b");
/// ```
pub fn generate_tool_name(method: &str, path: &str) -> String {
    let method_part = method.to_lowercase();

    let path_part = match path.split_once('?') {
        Some((base, rest)) => {
            // Anything after a second '?' is dropped
            let query = rest.split('?').next().unwrap_or_default();
            let query_value = match query.split_once('=') {
                Some((_, value)) => value.split('=').next().unwrap_or_default(),
                None => query,
            };
            format!("{}_query_{}", base.trim_matches('/'), query_value)
        }
        None => path.trim_matches('/').to_string(),
    };

    if path_part.is_empty() {
        return format!("{method_part}_root");
    }

    let path_part = PATH_PARAM_RE.replace_all(&path_part, |caps: &Captures| {
        format!("_by_{}", PARAM_SEPARATOR_RE.replace_all(&caps[1], "_"))
    });
    let path_part = INVALID_CHAR_RE.replace_all(&path_part, "_");
    let path_part = UNDERSCORE_RUN_RE.replace_all(&path_part, "_");
    let path_part = path_part.trim_start_matches('_');

    format!("{method_part}_{path_part}")
}

/// Loose truthiness for values read out of an untyped document.
///
/// `null`, `false`, `0`, empty strings and empty containers are falsy.
pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(a) => !a.is_empty(),
        JsonValue::Object(o) => !o.is_empty(),
    }
}
