//! File-backed configuration for tool mapping.
//!
//! A [`Config`] is read from TOML. Every field is optional; a missing file
//! simply yields the defaults. Lookup order when no explicit path is given:
//!
//! 1. `./toolmap.toml`
//! 2. `<config dir>/toolmap/config.toml` (e.g. `~/.config/toolmap/config.toml`)
//!
//! # Example
//!
//! ```toml
//! server_name = "petstore"
//! exclude_operations = ["deletePet"]
//! max_schema_depth = 64
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::core::error::{Error, Result};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "toolmap.toml";

/// Configuration for mapping a spec to a tool manifest
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Tool names to keep (empty keeps every tool)
    pub include_operations: Vec<String>,

    /// Tool names to drop, applied after `include_operations`
    pub exclude_operations: Vec<String>,

    /// Overrides `info.title`
    pub server_name: Option<String>,

    /// Overrides `info.version`
    pub server_version: Option<String>,

    /// Overrides `servers[0].url`
    pub base_url: Option<String>,

    /// Maximum schema nesting before conversion stops descending
    pub max_schema_depth: Option<usize>,
}

impl Config {
    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config from an explicit path
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Reading configuration file");
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load the explicit path if given, otherwise the first default location that exists
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_locations().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Candidate config file locations in priority order
    pub fn default_locations() -> Vec<PathBuf> {
        let mut locations = Vec::new();

        if let Ok(current_dir) = std::env::current_dir() {
            locations.push(current_dir.join(LOCAL_CONFIG_FILE));
        }

        if let Some(config_dir) = dirs::config_dir() {
            locations.push(config_dir.join("toolmap").join("config.toml"));
        }

        locations
    }

    /// Whether a tool with this name survives the include/exclude filters
    pub fn keeps_tool(&self, name: &str) -> bool {
        let included = self.include_operations.is_empty()
            || self.include_operations.iter().any(|op| op == name);
        included && !self.exclude_operations.iter().any(|op| op == name)
    }

    fn validate(&self) -> Result<()> {
        if self.max_schema_depth == Some(0) {
            return Err(Error::config("max_schema_depth must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.include_operations.is_empty());
        assert!(config.exclude_operations.is_empty());
        assert!(config.server_name.is_none());
        assert!(config.max_schema_depth.is_none());
    }

    #[test]
    fn test_config_from_toml() {
        let config = Config::from_toml_str(
            r#"
            server_name = "petstore"
            server_version = "2.0.0"
            include_operations = ["getPet", "listPets"]
            exclude_operations = ["listPets"]
            max_schema_depth = 32
            "#,
        )
        .unwrap();

        assert_eq!(config.server_name.as_deref(), Some("petstore"));
        assert_eq!(config.server_version.as_deref(), Some("2.0.0"));
        assert_eq!(config.max_schema_depth, Some(32));
        assert!(config.keeps_tool("getPet"));
        assert!(!config.keeps_tool("listPets"));
        assert!(!config.keeps_tool("deletePet"));
    }

    #[test]
    fn test_config_rejects_unknown_keys() {
        let result = Config::from_toml_str("not_a_field = true");
        assert!(matches!(result, Err(Error::Toml(_))));
    }

    #[test]
    fn test_config_rejects_zero_depth() {
        let result = Config::from_toml_str("max_schema_depth = 0");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_keeps_tool_without_filters() {
        let config = Config::default();
        assert!(config.keeps_tool("anything"));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        temp_file
            .write_all(b"base_url = \"https://api.example.com\"\n")
            .expect("Failed to write temp file");
        temp_file.flush().expect("Failed to flush temp file");

        let config = Config::discover(Some(temp_file.path())).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://api.example.com"));
    }

    #[test]
    fn test_config_missing_explicit_file() {
        let result = Config::discover(Some(Path::new("/nonexistent/toolmap.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
