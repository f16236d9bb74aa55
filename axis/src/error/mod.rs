//! Error types for the launcher-facing API

use crate::interp::{ErrorKind, RuntimeError};
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, AxisError>;

/// Anything that can stop a run before, during or after execution
#[derive(Debug, Error)]
pub enum AxisError {
    /// Program or configuration file could not be read
    #[error("IO error: {message}")]
    Io { message: String },

    /// Configuration file is not valid
    #[error("Config error: {message}")]
    Config { message: String },

    /// Loading or executing the program failed
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl AxisError {
    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Runtime error kind, if the failure came from the interpreter
    pub fn runtime_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Runtime(e) => Some(e.kind),
            Self::Io { .. } | Self::Config { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            AxisError::io_error("prog.json: not found").to_string(),
            "IO error: prog.json: not found"
        );
        assert_eq!(
            AxisError::config_error("bad key").to_string(),
            "Config error: bad key"
        );
    }

    #[test]
    fn test_runtime_is_transparent() {
        let err: AxisError = RuntimeError::division_by_zero().into();
        assert_eq!(err.to_string(), "Runtime error: division by zero");
        assert_eq!(err.runtime_kind(), Some(ErrorKind::DivisionByZero));
        assert_eq!(AxisError::io_error("x").runtime_kind(), None);
    }
}
