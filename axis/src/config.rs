//! Run configuration
//!
//! Defaults live here; a TOML file can override them and CLI flags override
//! the file.
//!
//! ```toml
//! max_call_depth = 2000
//! show_result = true
//! ```

use crate::error::{AxisError, Result};
use serde::Deserialize;
use std::path::Path;

/// Default limit on nested user-function calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Settings for one interpreter run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Maximum number of simultaneously active user-function calls
    pub max_call_depth: usize,
    /// Print the program's final value after a successful run
    pub show_result: bool,
}

impl RunConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            show_result: false,
        }
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| AxisError::config_error(e.to_string()))
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AxisError::io_error(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Set maximum call depth
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Set whether the final value is printed
    pub fn show_result(mut self, show: bool) -> Self {
        self.show_result = show;
        self
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new()
    }
}
