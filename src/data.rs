//! Loading template variables from TOML data files
//!
//! A data file's top-level table becomes the environment: every key is a
//! variable, nested tables become Mappings and arrays become Sequences.
//!
//! ```toml
//! title = "Release notes"
//!
//! [[changes]]
//! kind = "fix"
//! summary = "Escape quotes in attributes"
//! ```

use std::path::Path;

use indexmap::IndexMap;
use thiserror::Error;

use crate::env::Environment;
use crate::value::Value;

/// Errors that can occur when loading a data file
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read data file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse data TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Load an environment from a TOML file
pub fn load_file(path: &Path) -> Result<Environment, DataError> {
    let content = std::fs::read_to_string(path)?;
    load_str(&content)
}

/// Load an environment from TOML text
pub fn load_str(content: &str) -> Result<Environment, DataError> {
    let vars: IndexMap<String, Value> = toml::from_str(content)?;
    Ok(Environment::from(vars))
}

/// Parse a `KEY=VALUE` binding; the value is always a string
pub fn parse_binding(binding: &str) -> Option<(String, Value)> {
    let (key, value) = binding.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), Value::from(value)))
}
