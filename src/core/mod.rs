//! Core building blocks shared by the rest of the crate: errors,
//! configuration and identifier helpers.

pub mod config;
pub mod error;
pub mod utils;

pub use config::Config;
pub use error::{Error, Result};
