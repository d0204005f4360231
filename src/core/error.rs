//! Error handling for the toolmap library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. Only structural problems surface
//! here: a single malformed operation or schema fragment is recovered from where
//! it occurs and never reaches the caller as an `Error`.
//!
//! # Examples
//!
//! ```
//! use toolmap::core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     Err(Error::mapping("Invalid 'paths' object in OpenAPI spec."))
//! }
//!
//! assert!(might_fail().is_err());
//! ```

use thiserror::Error;

/// Result type for toolmap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for toolmap operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Structural problem while mapping operations to tools
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Spec could not be fetched or parsed
    #[error("OpenAPI loading error: {0}")]
    Load(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new mapping error
    pub fn mapping<S: Into<String>>(msg: S) -> Self {
        Self::Mapping(msg.into())
    }

    /// Create a new loading error
    pub fn load<S: Into<String>>(msg: S) -> Self {
        Self::Load(msg.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}
