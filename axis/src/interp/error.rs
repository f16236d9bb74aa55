//! Runtime errors for the interpreter

use thiserror::Error;

/// Runtime error during interpretation
#[derive(Debug, Clone, Error)]
#[error("Runtime error: {message}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Identifier read before it was ever bound in the current frame
    UnboundName,
    /// Call to a name that is neither a builtin nor a user function
    UnknownFunction,
    /// Operator or builtin applied to values of the wrong kind
    TypeError,
    /// Division or remainder by zero
    DivisionByZero,
    /// Too few arguments for a call
    ArityMismatch,
    /// AST does not match the node schema
    MalformedAst,
    /// IO error
    IoError,
    /// Sequence index outside the sequence
    IndexOutOfBounds,
    /// Mapping lookup for a key that is not present
    KeyNotFound,
    /// Call depth exceeded the configured limit
    StackOverflow,
}

impl RuntimeError {
    pub fn unbound_name(name: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::UnboundName,
            message: format!("unbound name: {name}"),
        }
    }

    pub fn unknown_function(name: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::UnknownFunction,
            message: format!("unknown function: {name}"),
        }
    }

    pub fn type_error(expected: &str, got: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::TypeError,
            message: format!("type error: expected {expected}, got {got}"),
        }
    }

    pub fn division_by_zero() -> Self {
        RuntimeError {
            kind: ErrorKind::DivisionByZero,
            message: "division by zero".to_string(),
        }
    }

    pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> Self {
        RuntimeError {
            kind: ErrorKind::ArityMismatch,
            message: format!("function {name} expects {expected} argument(s), got {got}"),
        }
    }

    pub fn malformed_ast(msg: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::MalformedAst,
            message: format!("malformed AST: {msg}"),
        }
    }

    pub fn io_error(msg: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::IoError,
            message: format!("IO error: {msg}"),
        }
    }

    pub fn index_out_of_bounds(index: f64, len: usize) -> Self {
        RuntimeError {
            kind: ErrorKind::IndexOutOfBounds,
            message: format!("index {index} out of bounds for length {len}"),
        }
    }

    pub fn key_not_found(key: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::KeyNotFound,
            message: format!("key not found: {key:?}"),
        }
    }

    pub fn stack_overflow(limit: usize) -> Self {
        RuntimeError {
            kind: ErrorKind::StackOverflow,
            message: format!("stack overflow: call depth exceeded {limit}"),
        }
    }
}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbound_name() {
        let err = RuntimeError::unbound_name("foo");
        assert_eq!(err.kind, ErrorKind::UnboundName);
        assert_eq!(err.message, "unbound name: foo");
    }

    #[test]
    fn test_unknown_function() {
        let err = RuntimeError::unknown_function("bar");
        assert_eq!(err.kind, ErrorKind::UnknownFunction);
        assert_eq!(err.message, "unknown function: bar");
    }

    #[test]
    fn test_type_error_message_format() {
        let err = RuntimeError::type_error("number", "text");
        assert_eq!(err.kind, ErrorKind::TypeError);
        assert_eq!(err.message, "type error: expected number, got text");
    }

    #[test]
    fn test_arity_mismatch_message_format() {
        let err = RuntimeError::arity_mismatch("add", 2, 1);
        assert_eq!(err.kind, ErrorKind::ArityMismatch);
        assert_eq!(err.message, "function add expects 2 argument(s), got 1");
    }

    #[test]
    fn test_index_out_of_bounds() {
        let err = RuntimeError::index_out_of_bounds(5.0, 3);
        assert_eq!(err.kind, ErrorKind::IndexOutOfBounds);
        assert_eq!(err.message, "index 5 out of bounds for length 3");
    }

    #[test]
    fn test_key_not_found() {
        let err = RuntimeError::key_not_found("age");
        assert_eq!(err.kind, ErrorKind::KeyNotFound);
        assert_eq!(err.message, r#"key not found: "age""#);
    }

    #[test]
    fn test_display() {
        let err = RuntimeError::division_by_zero();
        assert_eq!(err.to_string(), "Runtime error: division by zero");
    }

    #[test]
    fn test_display_all_constructors() {
        let errors = vec![
            RuntimeError::unbound_name("x"),
            RuntimeError::unknown_function("f"),
            RuntimeError::type_error("number", "boolean"),
            RuntimeError::division_by_zero(),
            RuntimeError::arity_mismatch("fn", 2, 3),
            RuntimeError::malformed_ast("missing field"),
            RuntimeError::io_error("err"),
            RuntimeError::index_out_of_bounds(-1.0, 3),
            RuntimeError::key_not_found("k"),
            RuntimeError::stack_overflow(10),
        ];
        for err in errors {
            assert!(err.to_string().starts_with("Runtime error:"));
        }
    }

    #[test]
    fn test_error_is_std_error() {
        let err = RuntimeError::io_error("disk full");
        let std_err: &dyn std::error::Error = &err;
        assert!(std_err.source().is_none());
        assert_eq!(err.message, "IO error: disk full");
    }
}
